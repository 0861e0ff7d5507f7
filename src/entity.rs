/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */

//!
//! The demo entities: members grouped into teams, many members to one team.
//!
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::information::{FieldName, GetFields, GetTableName, TableName};
use crate::value::{FromValue, IntoValue, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
}

impl Member {
    pub fn new<S: Into<String>>(username: S, age: i32) -> Self {
        Member {
            id: None,
            username: Some(username.into()),
            age,
            team_id: None,
        }
    }

    /// A member with no username, used by ordering scenarios.
    pub fn anonymous(age: i32) -> Self {
        Member {
            id: None,
            username: None,
            age,
            team_id: None,
        }
    }

    pub fn with_team(mut self, team_id: Option<i64>) -> Self {
        self.team_id = team_id;
        self
    }
}

impl GetTableName for Member {
    fn table_name() -> TableName {
        TableName::from("member")
    }
}

impl GetFields for Member {
    fn fields() -> Vec<FieldName> {
        vec![
            FieldName::table_id("id"),
            FieldName::from("username"),
            FieldName::from("age"),
            FieldName::from("team_id"),
        ]
    }
}

impl IntoValue for Member {
    fn into_value(&self) -> Value {
        let mut map = IndexMap::new();
        map.insert("id".to_string(), self.id.into());
        map.insert("username".to_string(), self.username.clone().into());
        map.insert("age".to_string(), self.age.into());
        map.insert("team_id".to_string(), self.team_id.into());
        Value::Object(map)
    }
}

impl FromValue for Member {
    fn from_value_opt(value: &Value) -> Result<Self> {
        Ok(Member {
            id: value.get_obj("id")?,
            username: value.get_obj("username")?,
            age: value.get_obj("age")?,
            team_id: value.get_obj("team_id")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: Option<i64>,
    pub name: String,
}

impl Team {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Team {
            id: None,
            name: name.into(),
        }
    }
}

impl GetTableName for Team {
    fn table_name() -> TableName {
        TableName::from("team")
    }
}

impl GetFields for Team {
    fn fields() -> Vec<FieldName> {
        vec![FieldName::table_id("id"), FieldName::from("name")]
    }
}

impl IntoValue for Team {
    fn into_value(&self) -> Value {
        let mut map = IndexMap::new();
        map.insert("id".to_string(), self.id.into());
        map.insert("name".to_string(), self.name.clone().into());
        Value::Object(map)
    }
}

impl FromValue for Team {
    fn from_value_opt(value: &Value) -> Result<Self> {
        Ok(Team {
            id: value.get_obj("id")?,
            name: value.get_obj::<Option<String>>("name")?.unwrap_or_default(),
        })
    }
}

/// Smoke-test entity with nothing but an identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hello {
    pub id: Option<i64>,
}

impl GetTableName for Hello {
    fn table_name() -> TableName {
        TableName::from("hello")
    }
}

impl GetFields for Hello {
    fn fields() -> Vec<FieldName> {
        vec![FieldName::table_id("id")]
    }
}

impl IntoValue for Hello {
    fn into_value(&self) -> Value {
        let mut map = IndexMap::new();
        map.insert("id".to_string(), self.id.into());
        Value::Object(map)
    }
}

impl FromValue for Hello {
    fn from_value_opt(value: &Value) -> Result<Self> {
        Ok(Hello {
            id: value.get_obj("id")?,
        })
    }
}
