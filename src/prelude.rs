//!
//! Glob-import surface for applications and tests.
//!
pub use crate::config::{LogLevel, Platform, ShibaConfig};
pub use crate::data::{Row, Rows};
pub use crate::database::{Database, DatabasePlatform};
pub use crate::dto::{MemberDto, MemberTeamDto, UserDto};
pub use crate::entity::{Hello, Member, Team};
pub use crate::errors::{Result, ShibaError};
pub use crate::information::{FieldName, FieldType, GetFields, GetTableName, TableName};
pub use crate::interceptor::{
    ExecuteContext, InterceptorChain, LoggingInterceptor, OperationType, SqlInterceptor,
};
pub use crate::mapper::{Page, PageRequest, ShibaMapper};
pub use crate::pool::{Pool, SqliteConnectionManager};
pub use crate::repository::{MemberRepository, MemberSearchCondition};
pub use crate::shiba::Shiba;
pub use crate::sql::{SqlBuilder, SqliteBuilder};
pub use crate::value::{FromValue, IntoValue, Params, SqlExpr, Value};
pub use crate::wrapper::{SqlOperator, Wrapper};
