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
//! Table and column metadata.
//!
use serde::{Deserialize, Serialize};

/// Table

pub trait GetTableName {
    /// extract the table name from a struct
    fn table_name() -> TableName;
}

pub trait GetFields {
    /// extract the columns from struct
    fn fields() -> Vec<FieldName>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct TableName {
    /// table name
    pub name: String,
    /// table of schema
    pub schema: Option<String>,
    /// table alias
    pub alias: Option<String>,
}

impl TableName {
    /// create table with name, accepting `schema.table` notation
    pub fn from(name: &str) -> Self {
        let name = name.trim();
        if let Some((schema, table)) = name.split_once('.') {
            TableName {
                name: table.to_owned(),
                schema: Some(schema.to_owned()),
                alias: None,
            }
        } else {
            TableName {
                name: name.to_owned(),
                schema: None,
                alias: None,
            }
        }
    }

    pub fn name(&self) -> String {
        self.name.to_string()
    }

    /// return the long name of the table using schema.table_name
    pub fn complete_name(&self) -> String {
        match self.schema {
            Some(ref schema) => format!("{}.{}", schema, self.name),
            None => self.name.to_owned(),
        }
    }
}

/// Field

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct FieldName {
    pub name: String,
    pub alias: Option<String>,
    /// exist in actual table
    pub exist: bool,
    pub field_type: FieldType,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum FieldType {
    TableId(IdentifierType),
    TableField,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum IdentifierType {
    Auto,
    Input,
}

impl FieldName {
    /// create an ordinary column
    pub fn from(name: &str) -> Self {
        FieldName {
            name: name.to_owned(),
            alias: None,
            exist: true,
            field_type: FieldType::TableField,
        }
    }

    /// create the primary key column with an auto generated identifier
    pub fn table_id(name: &str) -> Self {
        FieldName {
            name: name.to_owned(),
            alias: None,
            exist: true,
            field_type: FieldType::TableId(IdentifierType::Auto),
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_owned());
        self
    }

    /// the actual column name in the table
    pub fn column_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn is_table_id(&self) -> bool {
        matches!(self.field_type, FieldType::TableId(_))
    }
}
