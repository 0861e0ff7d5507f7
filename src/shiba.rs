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
//! Shiba facade: pool ownership, connection acquisition and the mapper
//! operations.
//!
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::{Platform, ShibaConfig};
use crate::data::Rows;
use crate::database::{DatabasePlatform, SqliteDatabase};
use crate::errors::{Result, ShibaError};
use crate::information::{FieldName, GetFields, GetTableName};
use crate::interceptor::InterceptorChain;
use crate::mapper::{Page, PageRequest, ShibaMapper};
use crate::pool::{self, PlatformPool, Pool, PooledConnection};
use crate::sql::{SqlBuilder, SqliteBuilder};
use crate::value::{FromValue, IntoValue, Params, Value};
use crate::wrapper::Wrapper;

static SQLITE_BUILDER: SqliteBuilder = SqliteBuilder { version: None };

pub struct Shiba {
    /// the connection pool
    pool: OnceCell<PlatformPool>,
    cfg: ShibaConfig,
    interceptors: Arc<InterceptorChain>,
}

impl Shiba {
    pub fn new(cfg: ShibaConfig) -> Result<Self> {
        let platform = Self::init_pool(&cfg)?;
        Ok(Self {
            pool: OnceCell::from(platform),
            cfg,
            interceptors: Arc::new(InterceptorChain::new()),
        })
    }

    /// Share the pool of an existing `Pool` handle.
    pub fn from_pool(pool: &Pool) -> Result<Self> {
        let platform = match pool.get_pool() {
            PlatformPool::SqlitePool(p) => PlatformPool::SqlitePool(p.clone()),
        };
        Ok(Self {
            pool: OnceCell::from(platform),
            cfg: pool.config().clone(),
            interceptors: Arc::new(InterceptorChain::new()),
        })
    }

    pub fn with_interceptor_chain(mut self, chain: InterceptorChain) -> Self {
        self.interceptors = Arc::new(chain);
        self
    }

    fn init_pool(cfg: &ShibaConfig) -> Result<PlatformPool> {
        match cfg.platform() {
            Platform::Sqlite(ref path) => {
                let pool = pool::init_pool(path, cfg)?;
                Ok(PlatformPool::SqlitePool(pool))
            }
            Platform::Unsupported(scheme) => Err(ShibaError::UnknownDatabase(scheme.to_string())),
        }
    }

    pub fn get_pool(&self) -> Result<&PlatformPool> {
        self.pool
            .get()
            .ok_or_else(|| ShibaError::R2D2Error("[shiba] pool not initialized!".to_string()))
    }

    /// Get a connected database, ready to run statements.
    pub fn acquire(&self) -> Result<DatabasePlatform> {
        let pool = self.get_pool()?;
        match pool.acquire()? {
            PooledConnection::PooledSqlite(conn) => Ok(DatabasePlatform::Sqlite(Box::new(
                SqliteDatabase::new(*conn, self.cfg.clone(), Arc::clone(&self.interceptors)),
            ))),
        }
    }

    pub fn new_wrapper(&self) -> Wrapper {
        Wrapper::new()
    }

    pub fn wrapper<T: GetTableName>(&self) -> Wrapper {
        Wrapper::new().table(T::table_name().complete_name())
    }

    fn sql_builder(&self) -> &'static dyn SqlBuilder {
        &SQLITE_BUILDER
    }

    fn table_name<T: GetTableName>() -> Result<crate::information::TableName> {
        let table = T::table_name();
        if table.complete_name().is_empty() {
            return Err(ShibaError::MissingTable(
                "Find Error, Missing Table Name !".to_string(),
            ));
        }
        Ok(table)
    }

    fn id_field(fields: &[FieldName]) -> Option<&FieldName> {
        fields.iter().find(|field| field.is_table_id())
    }

    fn default_columns<T: GetFields>() -> Vec<String> {
        T::fields()
            .iter()
            .filter(|f| f.exist)
            .map(|f| f.column_name().to_string())
            .collect()
    }

    /// Fill the table and projection the wrapper leaves unset.
    fn prepare_select<T: GetTableName + GetFields>(mut wrapper: Wrapper) -> Result<Wrapper> {
        let table = Self::table_name::<T>()?;
        if wrapper.get_table().is_none() {
            wrapper = wrapper.table(table.complete_name());
        }
        if wrapper.get_select_columns().is_empty() {
            wrapper = wrapper.select(Self::default_columns::<T>());
        }
        Ok(wrapper)
    }

    fn decode_rows<T: FromValue>(rows: &Rows) -> Result<Vec<T>> {
        rows.object_iter()
            .map(|obj| T::from_value_opt(&obj))
            .collect()
    }
}

impl ShibaMapper for Shiba {
    fn list<T>(&self, wrapper: Wrapper) -> Result<Vec<T>>
    where
        T: GetTableName + GetFields + FromValue,
    {
        let wrapper = Self::prepare_select::<T>(wrapper)?;
        let (sql, params) = self.sql_builder().build_query_sql(&wrapper)?;
        let mut conn = self.acquire()?;
        let rows = conn.execute_result(&sql, params.into())?;
        Self::decode_rows(&rows)
    }

    fn select_one<T>(&self, wrapper: Wrapper) -> Result<Option<T>>
    where
        T: GetTableName + GetFields + FromValue,
    {
        let wrapper = Self::prepare_select::<T>(wrapper)?.limit(1);
        let (sql, params) = self.sql_builder().build_query_sql(&wrapper)?;
        let mut conn = self.acquire()?;
        let rows = conn.execute_result(&sql, params.into())?;
        match rows.iter().next() {
            Some(row) => T::from_value_opt(&row.to_object()).map(Some),
            None => Ok(None),
        }
    }

    fn select_by_id<T, I>(&self, id: I) -> Result<Option<T>>
    where
        T: GetTableName + GetFields + FromValue,
        I: Into<Value>,
    {
        let table = Self::table_name::<T>()?;
        let fields = T::fields();
        let field = Self::id_field(&fields).ok_or_else(|| {
            ShibaError::MissingIdent(format!("Table({}) Missing Ident...", table.name))
        })?;
        self.select_one(Wrapper::new().eq(field.column_name(), id))
    }

    fn page<T>(&self, offset: i64, size: i64, wrapper: Wrapper) -> Result<Page<T>>
    where
        T: GetTableName + GetFields + FromValue,
    {
        let request = PageRequest::new(offset, size)?;
        let wrapper = Self::prepare_select::<T>(wrapper)?;
        // both statements run on one connection so the count and the page
        // observe the same state
        let mut conn = self.acquire()?;

        let (count_sql, count_params) = self.sql_builder().build_count_sql(&wrapper)?;
        let rows = conn.execute_result(&count_sql, count_params.into())?;
        let total: u64 = rows
            .iter()
            .next()
            .and_then(|row| row.as_ref(0).cloned())
            .map(|v| u64::from_value_opt(&v))
            .transpose()?
            .unwrap_or(0);

        let mut page = Page::new(request.offset, request.size, total, vec![]);
        if page.total > 0 {
            let wrapper = wrapper.limit(request.size).offset(request.offset);
            let (sql, params) = self.sql_builder().build_query_sql(&wrapper)?;
            let rows = conn.execute_result(&sql, params.into())?;
            page.records = Self::decode_rows(&rows)?;
        }
        Ok(page)
    }

    fn count<T>(&self, wrapper: Wrapper) -> Result<u64>
    where
        T: GetTableName + GetFields,
    {
        let table = Self::table_name::<T>()?;
        let wrapper = if wrapper.get_table().is_none() {
            wrapper.table(table.complete_name())
        } else {
            wrapper
        };
        let (sql, params) = self.sql_builder().build_count_sql(&wrapper)?;
        let mut conn = self.acquire()?;
        let rows = conn.execute_result(&sql, params.into())?;
        match rows.iter().next().and_then(|row| row.as_ref(0).cloned()) {
            Some(value) => u64::from_value_opt(&value),
            None => Ok(0),
        }
    }

    fn save<T, I>(&self, entity: &T) -> Result<Option<I>>
    where
        T: GetTableName + GetFields + IntoValue,
        I: FromValue,
    {
        let table = Self::table_name::<T>()?;
        let fields = T::fields();
        let (sql, params) =
            self.sql_builder()
                .build_insert_sql(&table, &fields, vec![entity.into_value()])?;
        let mut conn = self.acquire()?;
        conn.execute_drop(&sql, params.into())?;
        let id = conn.last_insert_id();
        Ok(I::from_value_opt(&Value::Bigint(id as i64)).ok())
    }

    fn save_batch<T>(&self, entities: &[T]) -> Result<()>
    where
        T: GetTableName + GetFields + IntoValue,
    {
        if entities.is_empty() {
            return Ok(());
        }
        let table = Self::table_name::<T>()?;
        let fields = T::fields();
        let values: Vec<Value> = entities.iter().map(|e| e.into_value()).collect();
        let (sql, params) = self.sql_builder().build_insert_sql(&table, &fields, values)?;
        let mut conn = self.acquire()?;
        conn.execute_drop(&sql, params.into())?;
        Ok(())
    }

    fn update<T>(&self, entity: &T, wrapper: Wrapper) -> Result<u64>
    where
        T: GetTableName + GetFields + IntoValue,
    {
        let table = Self::table_name::<T>()?;
        let wrapper = if wrapper.get_set_operations().is_empty() {
            let object = entity.into_value();
            let sets: Vec<(String, Value)> = T::fields()
                .iter()
                .filter(|f| f.exist && !f.is_table_id())
                .map(|f| {
                    let value = object
                        .get_obj_value(f.column_name())
                        .cloned()
                        .unwrap_or(Value::Null);
                    (f.column_name().to_string(), value)
                })
                .collect();
            wrapper.set_multiple(sets)
        } else {
            wrapper
        };
        let (sql, params) = self.sql_builder().build_update_sql(&table, &wrapper)?;
        let mut conn = self.acquire()?;
        conn.execute_drop(&sql, params.into())
    }

    fn update_by_id<T>(&self, entity: &T) -> Result<u64>
    where
        T: GetTableName + GetFields + IntoValue,
    {
        let table = Self::table_name::<T>()?;
        let fields = T::fields();
        let field = Self::id_field(&fields).ok_or_else(|| {
            ShibaError::MissingIdent(format!("Table({}) Missing Ident...", table.name))
        })?;
        let object = entity.into_value();
        let id_value = object
            .get_obj_value(field.column_name())
            .cloned()
            .unwrap_or(Value::Null);
        if id_value.is_null() {
            return Err(ShibaError::MissingIdent(format!(
                "Table({}) entity has no identifier value",
                table.name
            )));
        }
        self.update(entity, Wrapper::new().eq(field.column_name(), id_value))
    }

    fn remove<T>(&self, wrapper: Wrapper) -> Result<u64>
    where
        T: GetTableName + GetFields,
    {
        let table = Self::table_name::<T>()?;
        let (sql, params) = self.sql_builder().build_delete_sql(&table, &wrapper)?;
        let mut conn = self.acquire()?;
        conn.execute_drop(&sql, params.into())
    }

    fn remove_by_id<T, I>(&self, id: I) -> Result<u64>
    where
        T: GetTableName + GetFields,
        I: Into<Value>,
    {
        let table = Self::table_name::<T>()?;
        let fields = T::fields();
        let field = Self::id_field(&fields).ok_or_else(|| {
            ShibaError::MissingIdent(format!("Table({}) Missing Ident...", table.name))
        })?;
        self.remove::<T>(Wrapper::new().eq(field.column_name(), id))
    }

    fn exec_iter<S: Into<String>, P: Into<Params>>(&self, sql: S, params: P) -> Result<Rows> {
        let mut conn = self.acquire()?;
        conn.execute_result(&sql.into(), params.into())
    }

    fn exec_drop<S: Into<String>, P: Into<Params>>(&self, sql: S, params: P) -> Result<u64> {
        let mut conn = self.acquire()?;
        conn.execute_drop(&sql.into(), params.into())
    }
}
