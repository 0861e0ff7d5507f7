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
use serde::{Deserialize, Serialize};

use crate::data::Rows;
use crate::errors::{Result, ShibaError};
use crate::information::{GetFields, GetTableName};
use crate::value::{FromValue, IntoValue, Params, Value};
use crate::wrapper::Wrapper;

/// A validated pagination request. Offsets and sizes arrive as signed
/// integers so out-of-range requests surface as errors instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(offset: i64, size: i64) -> Result<Self> {
        if offset < 0 {
            return Err(ShibaError::InvalidPageRequest(format!(
                "offset must not be negative, got {}",
                offset
            )));
        }
        if size <= 0 {
            return Err(ShibaError::InvalidPageRequest(format!(
                "size must be positive, got {}",
                size
            )));
        }
        Ok(PageRequest {
            offset: offset as u64,
            size: size as u64,
        })
    }
}

/// One page of records plus the total count across all matching rows.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: u64,
    pub size: u64,
    pub offset: u64,
    pub records: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(offset: u64, size: u64, total: u64, records: Vec<T>) -> Self {
        Self {
            total,
            size,
            offset,
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether more rows exist beyond this page.
    pub fn has_next(&self) -> bool {
        self.offset + (self.records.len() as u64) < self.total
    }
}

pub trait ShibaMapper {
    /// Get all the table of records
    fn list<T>(&self, wrapper: Wrapper) -> Result<Vec<T>>
    where
        T: GetTableName + GetFields + FromValue;

    /// Get one the table of records
    fn select_one<T>(&self, wrapper: Wrapper) -> Result<Option<T>>
    where
        T: GetTableName + GetFields + FromValue;

    /// Get one the table of records by id
    fn select_by_id<T, I>(&self, id: I) -> Result<Option<T>>
    where
        T: GetTableName + GetFields + FromValue,
        I: Into<Value>;

    /// Get a page of records. The total count is always computed, then the
    /// page content is fetched when the count is non-zero.
    fn page<T>(&self, offset: i64, size: i64, wrapper: Wrapper) -> Result<Page<T>>
    where
        T: GetTableName + GetFields + FromValue;

    /// Get the total count of records
    fn count<T>(&self, wrapper: Wrapper) -> Result<u64>
    where
        T: GetTableName + GetFields;

    /// Insert one record, returning the generated identifier.
    fn save<T, I>(&self, entity: &T) -> Result<Option<I>>
    where
        T: GetTableName + GetFields + IntoValue,
        I: FromValue;

    /// Insert many records in one statement.
    fn save_batch<T>(&self, entities: &[T]) -> Result<()>
    where
        T: GetTableName + GetFields + IntoValue;

    /// Update records selected by the wrapper. Set operations on the wrapper
    /// win; otherwise every non-id column of `entity` is written.
    fn update<T>(&self, entity: &T, wrapper: Wrapper) -> Result<u64>
    where
        T: GetTableName + GetFields + IntoValue;

    /// Update one record by its identifier column.
    fn update_by_id<T>(&self, entity: &T) -> Result<u64>
    where
        T: GetTableName + GetFields + IntoValue;

    /// Remove records selected by the wrapper.
    fn remove<T>(&self, wrapper: Wrapper) -> Result<u64>
    where
        T: GetTableName + GetFields;

    /// Remove one record by its identifier column.
    fn remove_by_id<T, I>(&self, id: I) -> Result<u64>
    where
        T: GetTableName + GetFields,
        I: Into<Value>;

    /// Run a raw statement and collect its rows.
    fn exec_iter<S: Into<String>, P: Into<Params>>(&self, sql: S, params: P) -> Result<Rows>;

    /// Run a raw statement for its side effect.
    fn exec_drop<S: Into<String>, P: Into<Params>>(&self, sql: S, params: P) -> Result<u64>;

    /// First column of the first row, converted. Errors when no row comes back.
    fn exec_first<R, S, P>(&self, sql: S, params: P) -> Result<R>
    where
        R: FromValue,
        S: Into<String>,
        P: Into<Params>,
    {
        match self.exec_first_opt(sql, params)? {
            Some(v) => Ok(v),
            None => Err(ShibaError::DataError("Zero record returned".to_string())),
        }
    }

    /// First column of the first row, or `None` when no row comes back.
    fn exec_first_opt<R, S, P>(&self, sql: S, params: P) -> Result<Option<R>>
    where
        R: FromValue,
        S: Into<String>,
        P: Into<Params>,
    {
        let rows = self.exec_iter(sql, params)?;
        match rows.iter().next() {
            Some(row) => match row.as_ref(0) {
                Some(value) => R::from_value_opt(value).map(Some),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn page_request_validation() {
        assert!(PageRequest::new(0, 10).is_ok());
        assert!(matches!(
            PageRequest::new(-1, 10),
            Err(ShibaError::InvalidPageRequest(_))
        ));
        assert!(matches!(
            PageRequest::new(0, 0),
            Err(ShibaError::InvalidPageRequest(_))
        ));
        assert!(matches!(
            PageRequest::new(2, -5),
            Err(ShibaError::InvalidPageRequest(_))
        ));
    }

    #[test]
    fn page_invariants() {
        let page = Page::new(1, 2, 4, vec!["b", "c"]);
        assert!(page.records.len() as u64 <= page.size);
        assert!(page.total >= page.records.len() as u64);
        assert!(page.has_next());

        let last = Page::new(2, 2, 4, vec!["c", "d"]);
        assert!(!last.has_next());
    }
}
