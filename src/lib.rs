// Copyright (c) 2021 shiba contributors
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! This crate offers:
//!
//! *   A SQLite database helper in pure rust;
//! *   A compact condition-wrapper query toolkit;
//! *   A member/team search repository with two pagination strategies.
//!
//! ## Installation
//!
//! Put the desired version of the crate into the `dependencies` section of your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! shiba = "0.2"
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use shiba::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let cfg = ShibaConfig::new("sqlite://./demo.sqlite3")
//!         .set_max_size(4)
//!         .set_log_level(LogLevel::Debug);
//!     let shiba = Shiba::new(cfg)?;
//!
//!     // The Wrapper builds query conditions; absent values are skipped.
//!     let adults: Vec<Member> = shiba.list(
//!         Wrapper::new()
//!             .ge("age", Some(18))
//!             .eq("username", Option::<String>::None) // contributes nothing
//!             .order_by_asc(vec!["id"]),
//!     )?;
//!     println!("{} adults", adults.len());
//!
//!     // The repository layer composes dynamic, paginated searches.
//!     let repository = MemberRepository::new(shiba);
//!     let condition = MemberSearchCondition::new().team_name("teamA").age_goe(20);
//!     let page = repository.search_page_optimized_count(&condition, 0, 10)?;
//!     println!("{} of {} rows", page.records.len(), page.total);
//!     Ok(())
//! }
//! ```
mod config;
mod data;
mod database;
mod dto;
mod entity;
mod errors;
mod information;
mod interceptor;
mod mapper;
mod pool;
pub mod prelude;
mod repository;
mod shiba;
mod sql;
mod value;
mod wrapper;

#[doc(inline)]
pub use config::{LogLevel, Platform, ShibaConfig};
#[doc(inline)]
pub use data::{Row, Rows};
#[doc(inline)]
pub use database::{Database, DatabasePlatform, SqliteDatabase};
#[doc(inline)]
pub use dto::{MemberDto, MemberTeamDto, UserDto};
#[doc(inline)]
pub use entity::{Hello, Member, Team};
#[doc(inline)]
pub use errors::{Result, ShibaError};
#[doc(inline)]
pub use information::{FieldName, FieldType, GetFields, GetTableName, IdentifierType, TableName};
#[doc(inline)]
pub use interceptor::{
    ExecuteContext, InterceptorChain, LoggingInterceptor, OperationType, SqlInterceptor,
};
#[doc(inline)]
pub use mapper::{Page, PageRequest, ShibaMapper};
#[doc(inline)]
pub use pool::{PlatformPool, Pool, PooledConnection, SqliteConnectionManager};
#[doc(inline)]
pub use repository::{MemberRepository, MemberSearchCondition};
#[doc(inline)]
pub use shiba::Shiba;
#[doc(inline)]
pub use sql::{DatabaseDialect, SqlBuilder, SqliteBuilder};
#[doc(inline)]
pub use value::{FromValue, IntoValue, Params, SqlExpr, Value};
#[doc(inline)]
pub use wrapper::{
    AndOr, Condition, JoinClause, JoinType, OrderByClause, OrderDirection, QueryData, SqlOperator,
    Wrapper,
};

#[doc(inline)]
pub use chrono::{Local, NaiveDate, NaiveDateTime};
