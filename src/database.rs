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
//! Statement execution against a concrete database platform.
//!
use std::sync::Arc;
use std::time::Instant;

use crate::config::{LogLevel, ShibaConfig};
use crate::data::{Row, Rows};
use crate::errors::{Result, ShibaError};
use crate::interceptor::{ExecuteContext, InterceptorChain, OperationType};
use crate::pool::PooledSqliteConnection;
use crate::value::{Params, Value};

/// An interface executing sql statements and returning the results as
/// generic values without further conversion.
pub trait Database {
    /// Run a statement and collect the produced rows.
    fn execute_result(&mut self, sql: &str, params: Params) -> Result<Rows>;

    /// Run a statement for its side effect, returning the affected row count.
    fn execute_drop(&mut self, sql: &str, params: Params) -> Result<u64>;

    /// Identifier generated by the most recent successful INSERT.
    fn last_insert_id(&mut self) -> u64;
}

/// The connected database of the supported platforms.
pub enum DatabasePlatform {
    Sqlite(Box<SqliteDatabase>),
}

impl DatabasePlatform {
    pub fn execute_result(&mut self, sql: &str, params: Params) -> Result<Rows> {
        match self {
            DatabasePlatform::Sqlite(db) => db.execute_result(sql, params),
        }
    }

    pub fn execute_drop(&mut self, sql: &str, params: Params) -> Result<u64> {
        match self {
            DatabasePlatform::Sqlite(db) => db.execute_drop(sql, params),
        }
    }

    pub fn last_insert_id(&mut self) -> u64 {
        match self {
            DatabasePlatform::Sqlite(db) => db.last_insert_id(),
        }
    }
}

pub struct SqliteDatabase {
    conn: PooledSqliteConnection,
    cfg: ShibaConfig,
    interceptors: Arc<InterceptorChain>,
}

impl SqliteDatabase {
    pub fn new(
        conn: PooledSqliteConnection,
        cfg: ShibaConfig,
        interceptors: Arc<InterceptorChain>,
    ) -> Self {
        SqliteDatabase {
            conn,
            cfg,
            interceptors,
        }
    }

    fn log_statement(&self, sql: &str, params: &Params) {
        if let Some(level) = self.cfg.log_level() {
            match level {
                LogLevel::Debug => tracing::debug!("[Shiba]: Prepare SQL: {} params: {}", sql, params),
                LogLevel::Info => tracing::info!("[Shiba]: Prepare SQL: {} params: {}", sql, params),
                LogLevel::Error => tracing::error!("[Shiba]: Prepare SQL: {} params: {}", sql, params),
            }
        }
    }

    fn bind_values(params: &Params) -> Result<Vec<rusqlite::types::Value>> {
        match params {
            Params::None => Ok(vec![]),
            Params::Positional(values) => values.iter().map(to_sq_value).collect(),
        }
    }
}

impl Database for SqliteDatabase {
    fn execute_result(&mut self, sql: &str, params: Params) -> Result<Rows> {
        let ctx = ExecuteContext {
            sql,
            params: &params,
            operation: OperationType::classify(sql),
        };
        self.interceptors.before_execute(&ctx);
        self.log_statement(sql, &params);

        let started = Instant::now();
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(ToString::to_string).collect();
        let values = Self::bind_values(&params)?;

        let mut records = Rows::new();
        let mut rows = stmt.query(rusqlite::params_from_iter(values))?;
        while let Some(row) = rows.next()? {
            let mut record: Vec<Value> = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let raw: rusqlite::types::Value = row.get(i)?;
                record.push(from_sq_value(raw));
            }
            records.push(Row::new(columns.clone(), record));
        }
        drop(rows);
        drop(stmt);

        self.interceptors
            .after_execute(&ctx, records.len(), started.elapsed());
        Ok(records)
    }

    fn execute_drop(&mut self, sql: &str, params: Params) -> Result<u64> {
        let ctx = ExecuteContext {
            sql,
            params: &params,
            operation: OperationType::classify(sql),
        };
        self.interceptors.before_execute(&ctx);
        self.log_statement(sql, &params);

        let started = Instant::now();
        let mut stmt = self.conn.prepare(sql)?;
        let values = Self::bind_values(&params)?;
        let affected = stmt.execute(rusqlite::params_from_iter(values))? as u64;
        drop(stmt);

        self.interceptors
            .after_execute(&ctx, affected as usize, started.elapsed());
        Ok(affected)
    }

    fn last_insert_id(&mut self) -> u64 {
        self.conn.last_insert_rowid() as u64
    }
}

fn to_sq_value(val: &Value) -> Result<rusqlite::types::Value> {
    let converted = match val {
        Value::Text(v) => rusqlite::types::Value::Text(v.to_owned()),
        Value::Bool(v) => rusqlite::types::Value::Integer(i64::from(*v)),
        Value::Tinyint(v) => rusqlite::types::Value::Integer(i64::from(*v)),
        Value::Smallint(v) => rusqlite::types::Value::Integer(i64::from(*v)),
        Value::Int(v) => rusqlite::types::Value::Integer(i64::from(*v)),
        Value::Bigint(v) => rusqlite::types::Value::Integer(*v),
        Value::Float(v) => rusqlite::types::Value::Real(f64::from(*v)),
        Value::Double(v) => rusqlite::types::Value::Real(*v),
        Value::Blob(v) => rusqlite::types::Value::Blob(v.clone()),
        Value::Char(v) => rusqlite::types::Value::Text(v.to_string()),
        Value::Json(v) => rusqlite::types::Value::Text(v.to_string()),
        Value::Uuid(v) => rusqlite::types::Value::Text(v.to_string()),
        Value::Date(v) => rusqlite::types::Value::Text(v.to_string()),
        Value::Time(v) => rusqlite::types::Value::Text(v.to_string()),
        Value::DateTime(v) => rusqlite::types::Value::Text(v.format("%Y-%m-%d %H:%M:%S").to_string()),
        Value::Null => rusqlite::types::Value::Null,
        other => {
            return Err(ShibaError::UnsupportedOperation(format!(
                "value cannot be bound as a parameter: {:?}",
                other
            )))
        }
    };
    Ok(converted)
}

fn from_sq_value(val: rusqlite::types::Value) -> Value {
    match val {
        rusqlite::types::Value::Blob(v) => Value::Blob(v),
        rusqlite::types::Value::Real(v) => Value::Double(v),
        rusqlite::types::Value::Integer(v) => Value::Bigint(v),
        rusqlite::types::Value::Text(v) => Value::Text(v),
        rusqlite::types::Value::Null => Value::Null,
    }
}
