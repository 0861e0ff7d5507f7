//!
//! Read-only projection shapes returned by the query layer.
//!
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::information::{FieldName, GetFields, GetTableName, TableName};
use crate::value::{FromValue, Value};

/// Username and age of one member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberDto {
    pub username: Option<String>,
    pub age: i32,
}

impl GetTableName for MemberDto {
    fn table_name() -> TableName {
        TableName::from("member")
    }
}

impl GetFields for MemberDto {
    fn fields() -> Vec<FieldName> {
        vec![FieldName::from("username"), FieldName::from("age")]
    }
}

impl FromValue for MemberDto {
    fn from_value_opt(value: &Value) -> Result<Self> {
        Ok(MemberDto {
            username: value.get_obj("username")?,
            age: value.get_obj("age")?,
        })
    }
}

/// Same projection under different field names, filled via column aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub name: Option<String>,
    pub age: i32,
}

impl GetTableName for UserDto {
    fn table_name() -> TableName {
        TableName::from("member")
    }
}

impl GetFields for UserDto {
    fn fields() -> Vec<FieldName> {
        vec![FieldName::from("name"), FieldName::from("age")]
    }
}

impl FromValue for UserDto {
    fn from_value_opt(value: &Value) -> Result<Self> {
        Ok(UserDto {
            name: value.get_obj("name")?,
            age: value.get_obj("age")?,
        })
    }
}

/// One flattened member row with its (possibly absent) team. Constructed
/// only by the query layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberTeamDto {
    pub member_id: i64,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
}

impl FromValue for MemberTeamDto {
    fn from_value_opt(value: &Value) -> Result<Self> {
        Ok(MemberTeamDto {
            member_id: value.get_obj("member_id")?,
            username: value.get_obj("username")?,
            age: value.get_obj("age")?,
            team_id: value.get_obj("team_id")?,
            team_name: value.get_obj("team_name")?,
        })
    }
}
