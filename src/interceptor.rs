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
//! Statement interceptors: hooks around every executed statement.
//!
use std::sync::Arc;
use std::time::Duration;

use crate::config::LogLevel;
use crate::value::Params;

/// What kind of statement is being executed. Count statements are
/// distinguished from plain queries so callers can observe whether a
/// separate count execution happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Query,
    Count,
    Insert,
    Update,
    Delete,
    Other,
}

impl OperationType {
    pub fn classify(sql: &str) -> Self {
        let sql = sql.trim_start().to_ascii_lowercase();
        if sql.starts_with("select count(") {
            OperationType::Count
        } else if sql.starts_with("select") {
            OperationType::Query
        } else if sql.starts_with("insert") {
            OperationType::Insert
        } else if sql.starts_with("update") {
            OperationType::Update
        } else if sql.starts_with("delete") {
            OperationType::Delete
        } else {
            OperationType::Other
        }
    }
}

pub struct ExecuteContext<'a> {
    pub sql: &'a str,
    pub params: &'a Params,
    pub operation: OperationType,
}

pub trait SqlInterceptor: Send + Sync {
    fn name(&self) -> &str;

    fn before_execute(&self, _ctx: &ExecuteContext<'_>) {}

    fn after_execute(&self, _ctx: &ExecuteContext<'_>, _rows: usize, _elapsed: Duration) {}
}

/// An ordered set of interceptors applied around each statement.
#[derive(Default, Clone)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn SqlInterceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    pub fn register(mut self, interceptor: Arc<dyn SqlInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn before_execute(&self, ctx: &ExecuteContext<'_>) {
        for interceptor in &self.interceptors {
            interceptor.before_execute(ctx);
        }
    }

    pub fn after_execute(&self, ctx: &ExecuteContext<'_>, rows: usize, elapsed: Duration) {
        for interceptor in &self.interceptors {
            interceptor.after_execute(ctx, rows, elapsed);
        }
    }
}

/// Simplified log interceptor - focuses on SQL execution logs.
pub struct LoggingInterceptor {
    pub log_level: LogLevel,
    pub slow_query_threshold_ms: u64,
}

impl LoggingInterceptor {
    pub fn new() -> Self {
        Self {
            log_level: LogLevel::Debug,
            slow_query_threshold_ms: 1000,
        }
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_slow_query_threshold(mut self, threshold_ms: u64) -> Self {
        self.slow_query_threshold_ms = threshold_ms;
        self
    }
}

impl Default for LoggingInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlInterceptor for LoggingInterceptor {
    fn name(&self) -> &str {
        "logging"
    }

    fn before_execute(&self, ctx: &ExecuteContext<'_>) {
        match self.log_level {
            LogLevel::Debug => {
                tracing::debug!("==> {:?} SQL: {} params: {}", ctx.operation, ctx.sql, ctx.params)
            }
            LogLevel::Info => {
                tracing::info!("==> {:?} SQL: {} params: {}", ctx.operation, ctx.sql, ctx.params)
            }
            LogLevel::Error => {
                tracing::error!("==> {:?} SQL: {} params: {}", ctx.operation, ctx.sql, ctx.params)
            }
        }
    }

    fn after_execute(&self, ctx: &ExecuteContext<'_>, rows: usize, elapsed: Duration) {
        if elapsed.as_millis() as u64 >= self.slow_query_threshold_ms {
            tracing::warn!(
                "slow query ({} ms, {} rows): {}",
                elapsed.as_millis(),
                rows,
                ctx.sql
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classifies_statements() {
        assert_eq!(
            OperationType::classify("SELECT COUNT(*) FROM member"),
            OperationType::Count
        );
        assert_eq!(
            OperationType::classify("select m.id from member m"),
            OperationType::Query
        );
        assert_eq!(
            OperationType::classify("  UPDATE member SET age = 1"),
            OperationType::Update
        );
        assert_eq!(
            OperationType::classify("PRAGMA table_info(member)"),
            OperationType::Other
        );
    }
}
