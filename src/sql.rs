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
//! Dialect-level SQL assembly from `Wrapper` data.
//!
use crate::errors::{Result, ShibaError};
use crate::information::{FieldName, TableName};
use crate::value::Value;
use crate::wrapper::Wrapper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseDialect {
    SQLite,
}

pub trait SqlBuilder: Send + Sync {
    // ========== Core methods (must be implemented) ==========
    fn dialect(&self) -> DatabaseDialect;
    fn quote_identifier(&self, identifier: &str) -> String;
    fn quote_table(&self, table: &str) -> String;

    // ========== SQL build methods (with default implementation) ==========

    fn build_pagination_clause(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        match (limit, offset) {
            (Some(limit), Some(offset)) => format!("LIMIT {} OFFSET {}", limit, offset),
            (Some(limit), None) => format!("LIMIT {}", limit),
            (None, Some(offset)) => format!("LIMIT -1 OFFSET {}", offset),
            (None, None) => String::new(),
        }
    }

    /// Build a SELECT statement and its positional parameters.
    fn build_query_sql(&self, wrapper: &Wrapper) -> Result<(String, Vec<Value>)> {
        let data = wrapper.get_query_data();
        let from = data
            .from
            .ok_or_else(|| ShibaError::MissingTable("query is missing a table".to_string()))?;

        let mut sql_parts = vec![format!("SELECT {}", data.select), format!("FROM {}", from)];
        if !data.joins.is_empty() {
            sql_parts.push(data.joins.join(" "));
        }
        if !data.where_clause.is_empty() {
            sql_parts.push(format!("WHERE {}", data.where_clause));
        }
        if !data.group_by.is_empty() {
            sql_parts.push(format!("GROUP BY {}", data.group_by));
        }
        if !data.having.is_empty() {
            sql_parts.push(format!("HAVING {}", data.having));
        }
        if !data.order_by.is_empty() {
            sql_parts.push(format!("ORDER BY {}", data.order_by));
        }
        let pagination = self.build_pagination_clause(data.limit, data.offset);
        if !pagination.is_empty() {
            sql_parts.push(pagination);
        }
        if let Some(last) = data.last_sql {
            sql_parts.push(last);
        }

        let mut params = wrapper.collect_where_parameters();
        params.extend(wrapper.collect_having_parameters());
        Ok((sql_parts.join(" "), params))
    }

    /// Build a COUNT statement for the same filtered set: joins and WHERE
    /// survive, projection, ordering and pagination are dropped.
    fn build_count_sql(&self, wrapper: &Wrapper) -> Result<(String, Vec<Value>)> {
        let data = wrapper.get_query_data();
        let from = data
            .from
            .ok_or_else(|| ShibaError::MissingTable("count is missing a table".to_string()))?;

        let mut sql = format!("SELECT COUNT(*) FROM {}", from);
        if !data.joins.is_empty() {
            sql.push_str(&format!(" {}", data.joins.join(" ")));
        }
        if !data.where_clause.is_empty() {
            sql.push_str(&format!(" WHERE {}", data.where_clause));
        }
        Ok((sql, wrapper.collect_where_parameters()))
    }

    /// Build an INSERT statement for one or more entity value objects.
    fn build_insert_sql(
        &self,
        table: &TableName,
        columns: &[FieldName],
        rows: Vec<Value>,
    ) -> Result<(String, Vec<Value>)> {
        if rows.is_empty() {
            return Err(ShibaError::EmptyData);
        }
        let columns: Vec<&FieldName> = columns.iter().filter(|c| c.exist).collect();
        if columns.is_empty() {
            return Err(ShibaError::InvalidSQL("no columns to insert".to_string()));
        }

        let mut placeholders = Vec::with_capacity(rows.len());
        let mut params = Vec::with_capacity(rows.len() * columns.len());
        for row in rows.into_iter() {
            let mut row_placeholders = Vec::with_capacity(columns.len());
            for field in columns.iter() {
                let value = row
                    .get_obj_value(field.column_name())
                    .cloned()
                    .unwrap_or(Value::Null);
                row_placeholders.push("?".to_string());
                params.push(value);
            }
            placeholders.push(format!("({})", row_placeholders.join(", ")));
        }

        let column_list = columns
            .iter()
            .map(|c| self.quote_identifier(c.column_name()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.quote_table(&table.complete_name()),
            column_list,
            placeholders.join(", ")
        );
        Ok((sql, params))
    }

    /// Build an UPDATE statement from the wrapper's set operations.
    fn build_update_sql(
        &self,
        table: &TableName,
        wrapper: &Wrapper,
    ) -> Result<(String, Vec<Value>)> {
        let set_clause = wrapper.build_set_clause();
        if set_clause.is_empty() {
            return Err(ShibaError::InvalidSQL("update fields are empty".to_string()));
        }
        let mut sql = format!(
            "UPDATE {} SET {}",
            self.quote_table(&table.complete_name()),
            set_clause
        );
        let where_clause = wrapper.build_where_clause();
        if !where_clause.is_empty() {
            sql.push_str(&format!(" WHERE {}", where_clause));
        }
        let mut params = wrapper.collect_set_parameters();
        params.extend(wrapper.collect_where_parameters());
        Ok((sql, params))
    }

    /// Build a DELETE statement from the wrapper's conditions.
    fn build_delete_sql(
        &self,
        table: &TableName,
        wrapper: &Wrapper,
    ) -> Result<(String, Vec<Value>)> {
        let mut sql = format!("DELETE FROM {}", self.quote_table(&table.complete_name()));
        let where_clause = wrapper.build_where_clause();
        if !where_clause.is_empty() {
            sql.push_str(&format!(" WHERE {}", where_clause));
        }
        Ok((sql, wrapper.collect_where_parameters()))
    }
}

pub struct SqliteBuilder {
    pub version: Option<String>,
}

impl Default for SqliteBuilder {
    fn default() -> Self {
        Self { version: None }
    }
}

impl SqlBuilder for SqliteBuilder {
    fn dialect(&self) -> DatabaseDialect {
        DatabaseDialect::SQLite
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    fn quote_table(&self, table: &str) -> String {
        // main and temp are SQLite's attached-database names
        let special_dbs = ["main", "temp"];
        let parts: Vec<&str> = table.split('.').collect();
        match parts.len() {
            1 => self.quote_identifier(parts[0]),
            2 => {
                let db = parts[0];
                let quoted_db = if special_dbs.contains(&db) {
                    db.to_string()
                } else {
                    self.quote_identifier(db)
                };
                format!("{}.{}", quoted_db, self.quote_identifier(parts[1]))
            }
            _ => parts
                .iter()
                .map(|part| self.quote_identifier(part))
                .collect::<Vec<String>>()
                .join("."),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn query_with_no_conditions_has_no_where() {
        let builder = SqliteBuilder::default();
        let wrapper = Wrapper::new().table("member");
        let (sql, params) = builder.build_query_sql(&wrapper).unwrap();
        assert_eq!(sql, "SELECT * FROM member");
        assert!(params.is_empty());
    }

    #[test]
    fn query_assembles_all_clauses() {
        let builder = SqliteBuilder::default();
        let wrapper = Wrapper::new()
            .table("member")
            .alias("m")
            .select(vec!["m.id", "m.username"])
            .left_join("team t", "m.team_id = t.id")
            .eq("t.name", "teamA")
            .order_by_asc(vec!["m.id"])
            .limit(2)
            .offset(1);
        let (sql, params) = builder.build_query_sql(&wrapper).unwrap();
        assert_eq!(
            sql,
            "SELECT m.id, m.username FROM member AS m LEFT JOIN team t ON m.team_id = t.id \
             WHERE t.name = ? ORDER BY m.id ASC LIMIT 2 OFFSET 1"
        );
        assert_eq!(params, vec![Value::Text("teamA".to_string())]);
    }

    #[test]
    fn count_preserves_joins_and_filters_only() {
        let builder = SqliteBuilder::default();
        let wrapper = Wrapper::new()
            .table("member")
            .alias("m")
            .select(vec!["m.id"])
            .left_join("team t", "m.team_id = t.id")
            .ge("m.age", 20)
            .order_by_asc(vec!["m.id"])
            .limit(2);
        let (sql, params) = builder.build_count_sql(&wrapper).unwrap();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM member AS m LEFT JOIN team t ON m.team_id = t.id WHERE m.age >= ?"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn missing_table_is_an_error() {
        let builder = SqliteBuilder::default();
        let wrapper = Wrapper::new().eq("age", 10);
        assert!(builder.build_query_sql(&wrapper).is_err());
    }

    #[test]
    fn update_requires_set_fields() {
        let builder = SqliteBuilder::default();
        let table = TableName::from("member");
        let empty = Wrapper::new().eq("age", 10);
        assert!(builder.build_update_sql(&table, &empty).is_err());

        let wrapper = Wrapper::new().set("username", "nonmember").lt("age", 28);
        let (sql, params) = builder.build_update_sql(&table, &wrapper).unwrap();
        assert_eq!(sql, "UPDATE \"member\" SET username = ? WHERE age < ?");
        assert_eq!(params.len(), 2);
    }
}
