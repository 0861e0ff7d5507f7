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
use std::fmt::Formatter;
use std::slice;

use indexmap::IndexMap;

use crate::errors::{Result, ShibaError};
use crate::value::{FromValue, Value};

/// A single result record: column names plus the decoded values, in
/// statement order.
#[derive(Debug, PartialEq, Clone)]
pub struct Row {
    pub columns: Vec<String>,
    pub data: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, data: Vec<Value>) -> Self {
        Self { columns, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn columns_ref(&self) -> &[String] {
        &self.columns
    }

    /// Non panicking positional access.
    pub fn as_ref(&self, index: usize) -> Option<&Value> {
        self.data.get(index)
    }

    /// Convert the value of a named column.
    pub fn get_obj<T: FromValue>(&self, column: &str) -> Result<T> {
        match self.index_of(column) {
            Some(idx) => T::from_value_opt(&self.data[idx]),
            None => Err(ShibaError::MissingField(format!(
                "no such column: {}",
                column
            ))),
        }
    }

    /// Convert the value of a named column, treating a missing column as
    /// `Null`.
    pub fn get_obj_opt<T: FromValue>(&self, column: &str) -> Result<T> {
        match self.index_of(column) {
            Some(idx) => T::from_value_opt(&self.data[idx]),
            None => T::from_value_opt(&Value::Null),
        }
    }

    fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Bundle the row into an `Object` value keyed by column name.
    pub fn to_object(&self) -> Value {
        let mut map = IndexMap::with_capacity(self.columns.len());
        for (column, value) in self.columns.iter().zip(self.data.iter()) {
            map.insert(column.to_owned(), value.clone());
        }
        Value::Object(map)
    }
}

/// Records retrieved from the database.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Rows {
    pub data: Vec<Row>,
    /// can be optionally set, indicates how many total rows are there in the table
    pub count: Option<usize>,
}

impl Rows {
    pub fn new() -> Self {
        Rows {
            data: vec![],
            count: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn push(&mut self, row: Row) {
        self.data.push(row)
    }

    pub fn iter(&self) -> RowsIter<'_> {
        RowsIter {
            inner: self.data.iter(),
        }
    }

    /// Iterate rows as `Object` values, ready for `FromValue` decoding.
    pub fn object_iter(&self) -> impl Iterator<Item = Value> + '_ {
        self.data.iter().map(Row::to_object)
    }
}

impl std::fmt::Display for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "<==    Columns: {}",
            self.data
                .iter()
                .next()
                .map(|r| r.columns.join(", "))
                .unwrap_or_else(|| "[]".to_string())
        )?;
        for row in self.data.iter() {
            writeln!(
                f,
                "<==        Row: {}",
                row.data
                    .iter()
                    .map(|v| format!("{}", v))
                    .collect::<Vec<String>>()
                    .join(", ")
            )?;
        }
        write!(f, "<==      Total: {}", self.count.unwrap_or(self.data.len()))
    }
}

pub struct RowsIter<'a> {
    inner: slice::Iter<'a, Row>,
}

impl<'a> Iterator for RowsIter<'a> {
    type Item = &'a Row;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a> IntoIterator for &'a Rows {
    type Item = &'a Row;
    type IntoIter = RowsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_row() -> Row {
        Row::new(
            vec!["id".to_string(), "name".to_string()],
            vec![Value::Bigint(1), Value::Text("teamA".to_string())],
        )
    }

    #[test]
    fn get_by_column_name() {
        let row = sample_row();
        let id: i64 = row.get_obj("id").unwrap();
        let name: String = row.get_obj("name").unwrap();
        assert_eq!(id, 1);
        assert_eq!(name, "teamA");
        assert!(row.get_obj::<i64>("missing").is_err());
    }

    #[test]
    fn to_object_round_trip() {
        let row = sample_row();
        let obj = row.to_object();
        let name: Option<String> = obj.get_obj("name").unwrap();
        assert_eq!(name.as_deref(), Some("teamA"));
    }
}
