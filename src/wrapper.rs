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
//! Generate Wrapper.
//! ```ignore
//!
//! let wrapper = Wrapper::new()
//!     .table("t_user")
//!     .eq("username", "jack")
//!     .ge("age", Some(18))        // None would contribute no condition
//!     .order_by_asc(vec!["id"]);
//! ```
//!
//! A condition whose value is null, blank, or an empty list is silently
//! dropped; combining any number of dropped conditions yields a wrapper
//! that matches everything.
//!
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Wrapper {
    // Base configuration
    table: Option<String>,
    alias: Option<String>,

    // SQL subassembly
    select_columns: Vec<String>,
    join_clauses: Vec<JoinClause>,
    where_conditions: Vec<Condition>,
    group_by_columns: Vec<String>,
    having_conditions: Vec<Condition>,
    order_by_clauses: Vec<OrderByClause>,
    set_operations: Vec<SetOperation>,
    apply_conditions: Vec<String>,
    apply_parameters: Vec<Value>,

    // SQL modifiers
    distinct: bool,
    limit_value: Option<u64>,
    offset_value: Option<u64>,
    last_sql: Option<String>,

    // Conditional control
    /// whether the next chained call takes effect
    next_condition_active: bool,
    /// skip the next chained call unconditionally
    skip_mode: bool,
    /// connect the next pushed condition with OR instead of AND
    or_next: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operator: SqlOperator,
    pub value: Value,
    pub and_or: AndOr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    pub column: String,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetOperation {
    pub column: String,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl Display for JoinType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER JOIN"),
            JoinType::Left => write!(f, "LEFT JOIN"),
            JoinType::Right => write!(f, "RIGHT JOIN"),
            JoinType::Full => write!(f, "FULL JOIN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SqlOperator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    NotLike,
    IsNull,
    IsNotNull,
    In,
    NotIn,
    Between,
    NotBetween,
}

impl SqlOperator {
    pub fn is_null_check(&self) -> bool {
        matches!(self, SqlOperator::IsNull | SqlOperator::IsNotNull)
    }
}

impl Display for SqlOperator {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SqlOperator::Eq => write!(f, "="),
            SqlOperator::Ne => write!(f, "!="),
            SqlOperator::Gt => write!(f, ">"),
            SqlOperator::Ge => write!(f, ">="),
            SqlOperator::Lt => write!(f, "<"),
            SqlOperator::Le => write!(f, "<="),
            SqlOperator::Like => write!(f, "LIKE"),
            SqlOperator::NotLike => write!(f, "NOT LIKE"),
            SqlOperator::IsNull => write!(f, "IS NULL"),
            SqlOperator::IsNotNull => write!(f, "IS NOT NULL"),
            SqlOperator::In => write!(f, "IN"),
            SqlOperator::NotIn => write!(f, "NOT IN"),
            SqlOperator::Between => write!(f, "BETWEEN"),
            SqlOperator::NotBetween => write!(f, "NOT BETWEEN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AndOr {
    And,
    Or,
}

impl Display for AndOr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            AndOr::And => write!(f, "AND"),
            AndOr::Or => write!(f, "OR"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl Display for OrderDirection {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

impl Default for Wrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Wrapper {
    pub fn new() -> Self {
        Self {
            table: None,
            alias: None,
            select_columns: Vec::new(),
            join_clauses: Vec::new(),
            where_conditions: Vec::new(),
            group_by_columns: Vec::new(),
            having_conditions: Vec::new(),
            order_by_clauses: Vec::new(),
            set_operations: Vec::new(),
            apply_conditions: Vec::new(),
            apply_parameters: Vec::new(),
            distinct: false,
            limit_value: None,
            offset_value: None,
            last_sql: None,
            next_condition_active: true,
            skip_mode: false,
            or_next: false,
        }
    }

    pub fn table<S: Into<String>>(mut self, table: S) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn alias<S: Into<String>>(mut self, alias: S) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn get_table(&self) -> Option<&String> {
        self.table.as_ref()
    }

    pub fn last<S: Into<String>>(mut self, sql: S) -> Self {
        self.last_sql = Some(sql.into());
        self
    }

    // ========== SELECT ==========

    pub fn select<T: Into<String>>(mut self, columns: Vec<T>) -> Self {
        self.select_columns = columns.into_iter().map(|c| c.into()).collect();
        self
    }

    pub fn select_distinct<T: Into<String>>(mut self, columns: Vec<T>) -> Self {
        self.select_columns = columns.into_iter().map(|c| c.into()).collect();
        self.distinct = true;
        self
    }

    pub fn get_select_columns(&self) -> &Vec<String> {
        &self.select_columns
    }

    // ========== WHERE ==========

    fn add_condition<T, V>(mut self, column: T, operator: SqlOperator, value: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        let value = value.into();
        if !self.should_add_condition() {
            return self;
        }
        if operator.is_null_check() || !self.should_skip_condition(&value) {
            let and_or = self.take_connector();
            self.where_conditions.push(Condition {
                column: column.into(),
                operator,
                value,
                and_or,
            });
        }
        self
    }

    pub fn eq<T, V>(self, column: T, value: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        self.add_condition(column, SqlOperator::Eq, value)
    }

    pub fn ne<T, V>(self, column: T, value: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        self.add_condition(column, SqlOperator::Ne, value)
    }

    pub fn gt<T, V>(self, column: T, value: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        self.add_condition(column, SqlOperator::Gt, value)
    }

    pub fn ge<T, V>(self, column: T, value: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        self.add_condition(column, SqlOperator::Ge, value)
    }

    pub fn lt<T, V>(self, column: T, value: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        self.add_condition(column, SqlOperator::Lt, value)
    }

    pub fn le<T, V>(self, column: T, value: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        self.add_condition(column, SqlOperator::Le, value)
    }

    pub fn like<T, V>(self, column: T, value: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        self.add_condition(column, SqlOperator::Like, value)
    }

    pub fn not_like<T, V>(self, column: T, value: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        self.add_condition(column, SqlOperator::NotLike, value)
    }

    pub fn is_null<T: Into<String>>(self, column: T) -> Self {
        self.add_condition(column, SqlOperator::IsNull, Value::Null)
    }

    pub fn is_not_null<T: Into<String>>(self, column: T) -> Self {
        self.add_condition(column, SqlOperator::IsNotNull, Value::Null)
    }

    pub fn r#in<T, V, I>(self, column: T, values: I) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let values: Vec<Value> = values.into_iter().map(|v| v.into()).collect();
        self.add_condition(column, SqlOperator::In, Value::List(values))
    }

    pub fn not_in<T, V, I>(self, column: T, values: I) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let values: Vec<Value> = values.into_iter().map(|v| v.into()).collect();
        self.add_condition(column, SqlOperator::NotIn, Value::List(values))
    }

    /// `column IN (<subquery or raw sql>)`
    pub fn in_sql<T, S>(self, column: T, sql: S) -> Self
    where
        T: Into<String>,
        S: Into<String>,
    {
        self.add_condition(column, SqlOperator::In, Value::RawSql(sql.into()))
    }

    pub fn between<T, V>(self, column: T, start: V, end: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        self.add_condition(
            column,
            SqlOperator::Between,
            Value::List(vec![start.into(), end.into()]),
        )
    }

    pub fn not_between<T, V>(self, column: T, start: V, end: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        self.add_condition(
            column,
            SqlOperator::NotBetween,
            Value::List(vec![start.into(), end.into()]),
        )
    }

    // ========== Raw fragments ==========

    /// Append a raw SQL fragment to the WHERE clause, optionally
    /// parameterized with `?` placeholders.
    pub fn apply<S, V, I>(mut self, sql: S, params: Option<I>) -> Self
    where
        S: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        if !self.should_add_condition() {
            return self;
        }
        let sql = sql.into();
        let placeholder_count = sql.matches('?').count();
        let params: Vec<Value> = params
            .map(|iter| iter.into_iter().map(|v| v.into()).collect())
            .unwrap_or_default();
        if params.len() != placeholder_count {
            tracing::warn!(
                "apply fragment has {} placeholders but {} parameters",
                placeholder_count,
                params.len()
            );
        }
        self.apply_conditions.push(sql);
        self.apply_parameters.extend(params);
        self
    }

    /// Simplified apply - only accepts static SQL
    pub fn apply_raw<S: Into<String>>(self, sql: S) -> Self {
        self.apply(sql, None::<Vec<Value>>)
    }

    // ========== Logical operations ==========

    /// AND-group: conditions built inside the closure are appended as-is.
    pub fn and<F>(mut self, func: F) -> Self
    where
        F: FnOnce(Wrapper) -> Wrapper,
    {
        let nested = func(Wrapper::new());
        self.where_conditions.extend(nested.where_conditions);
        self
    }

    /// OR-group: the first condition built inside the closure connects to
    /// the preceding conditions with OR.
    pub fn or<F>(mut self, func: F) -> Self
    where
        F: FnOnce(Wrapper) -> Wrapper,
    {
        let nested = func(Wrapper::new());
        for (i, mut condition) in nested.where_conditions.into_iter().enumerate() {
            if i == 0 {
                condition.and_or = AndOr::Or;
            }
            self.where_conditions.push(condition);
        }
        self
    }

    /// Connect the next condition with OR.
    pub fn or_direct(mut self) -> Self {
        self.or_next = true;
        self
    }

    // ========== JOIN ==========

    fn add_join(mut self, join_type: JoinType, table: String, condition: String) -> Self {
        if self.should_add_condition() {
            self.join_clauses.push(JoinClause {
                join_type,
                table,
                condition,
            });
        }
        self
    }

    pub fn inner_join<T, C>(self, table: T, condition: C) -> Self
    where
        T: Into<String>,
        C: Into<String>,
    {
        self.add_join(JoinType::Inner, table.into(), condition.into())
    }

    pub fn left_join<T, C>(self, table: T, condition: C) -> Self
    where
        T: Into<String>,
        C: Into<String>,
    {
        self.add_join(JoinType::Left, table.into(), condition.into())
    }

    pub fn right_join<T, C>(self, table: T, condition: C) -> Self
    where
        T: Into<String>,
        C: Into<String>,
    {
        self.add_join(JoinType::Right, table.into(), condition.into())
    }

    pub fn full_join<T, C>(self, table: T, condition: C) -> Self
    where
        T: Into<String>,
        C: Into<String>,
    {
        self.add_join(JoinType::Full, table.into(), condition.into())
    }

    pub fn get_join_clauses(&self) -> &Vec<JoinClause> {
        &self.join_clauses
    }

    // ========== GROUP BY / HAVING ==========

    pub fn group_by<T: Into<String>>(mut self, columns: Vec<T>) -> Self {
        if self.should_add_condition() {
            self.group_by_columns = columns.into_iter().map(|c| c.into()).collect();
        }
        self
    }

    pub fn having<T, V>(mut self, column: T, operator: SqlOperator, value: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        let value = value.into();
        if self.should_add_condition() && !self.should_skip_condition(&value) {
            self.having_conditions.push(Condition {
                column: column.into(),
                operator,
                value,
                and_or: AndOr::And,
            });
        }
        self
    }

    // ========== ORDER BY ==========

    fn add_order_by<T: Into<String>>(mut self, columns: Vec<T>, direction: OrderDirection) -> Self {
        if self.should_add_condition() {
            for column in columns {
                self.order_by_clauses.push(OrderByClause {
                    column: column.into(),
                    direction,
                });
            }
        }
        self
    }

    pub fn order_by_asc<T: Into<String>>(self, columns: Vec<T>) -> Self {
        self.add_order_by(columns, OrderDirection::Asc)
    }

    pub fn order_by_desc<T: Into<String>>(self, columns: Vec<T>) -> Self {
        self.add_order_by(columns, OrderDirection::Desc)
    }

    // ========== SET (UPDATE) ==========

    pub fn set<T, V>(mut self, column: T, value: V) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
    {
        let value = value.into();
        if self.should_add_condition() && !self.should_skip_condition(&value) {
            self.set_operations.push(SetOperation {
                column: column.into(),
                value,
            });
        }
        self
    }

    pub fn set_multiple<T, V, I>(mut self, operations: I) -> Self
    where
        T: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (T, V)>,
    {
        if self.should_add_condition() {
            for (column, value) in operations {
                self.set_operations.push(SetOperation {
                    column: column.into(),
                    value: value.into(),
                });
            }
        }
        self
    }

    pub fn get_set_operations(&self) -> &Vec<SetOperation> {
        &self.set_operations
    }

    // ========== Pagination ==========

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_value = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset_value = Some(offset);
        self
    }

    /// 1-based page number shorthand for `limit`/`offset`.
    pub fn page(mut self, page: u64, page_size: u64) -> Self {
        let offset = page.saturating_sub(1) * page_size;
        self.limit_value = Some(page_size);
        self.offset_value = Some(offset);
        self
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.limit_value
    }

    pub fn get_offset(&self) -> Option<u64> {
        self.offset_value
    }

    // ========== Conditional control ==========

    /// The following chained call only takes effect when `condition` is true.
    pub fn when(mut self, condition: bool) -> Self {
        self.next_condition_active = condition;
        self
    }

    /// The following chained call only takes effect when `condition` is false.
    pub fn unless(mut self, condition: bool) -> Self {
        self.next_condition_active = !condition;
        self
    }

    /// Skip the next chained call, whatever it is.
    pub fn skip_next(mut self) -> Self {
        self.skip_mode = true;
        self
    }

    fn should_add_condition(&mut self) -> bool {
        if self.skip_mode {
            self.skip_mode = false;
            return false;
        }
        let should_add = self.next_condition_active;
        self.next_condition_active = true;
        should_add
    }

    fn should_skip_condition(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::List(list) if list.is_empty() => true,
            Value::Text(text) if text.trim().is_empty() => true,
            _ => false,
        }
    }

    fn take_connector(&mut self) -> AndOr {
        if self.or_next {
            self.or_next = false;
            AndOr::Or
        } else {
            AndOr::And
        }
    }

    pub fn get_where_conditions(&self) -> &Vec<Condition> {
        &self.where_conditions
    }

    // ========== SQL fragments ==========

    pub fn build_select_clause(&self) -> String {
        if self.distinct {
            format!("DISTINCT {}", self.build_column_list())
        } else {
            self.build_column_list()
        }
    }

    fn build_column_list(&self) -> String {
        if self.select_columns.is_empty() {
            "*".to_string()
        } else {
            self.select_columns.join(", ")
        }
    }

    pub fn build_from_clause(&self) -> Option<String> {
        self.table.as_ref().map(|table| {
            if let Some(alias) = &self.alias {
                format!("{} AS {}", table, alias)
            } else {
                table.clone()
            }
        })
    }

    pub fn build_join_clauses(&self) -> Vec<String> {
        self.join_clauses
            .iter()
            .map(|join| format!("{} {} ON {}", join.join_type, join.table, join.condition))
            .collect()
    }

    /// WHERE fragment without the keyword; empty when every condition was
    /// skipped, which is the "match everything" case.
    pub fn build_where_clause(&self) -> String {
        let mut parts = Vec::new();
        if !self.where_conditions.is_empty() {
            parts.push(Self::join_condition_fragments(&self.where_conditions));
        }
        parts.extend_from_slice(&self.apply_conditions);
        parts.join(" AND ")
    }

    pub fn build_having_clause(&self) -> String {
        if self.having_conditions.is_empty() {
            String::new()
        } else {
            Self::join_condition_fragments(&self.having_conditions)
        }
    }

    fn join_condition_fragments(conditions: &[Condition]) -> String {
        let mut result = String::new();
        for (i, condition) in conditions.iter().enumerate() {
            if i > 0 {
                result.push_str(&format!(" {} ", condition.and_or));
            }
            result.push_str(&Self::format_condition_fragment(condition));
        }
        result
    }

    fn format_condition_fragment(condition: &Condition) -> String {
        match &condition.operator {
            SqlOperator::IsNull | SqlOperator::IsNotNull => {
                format!("{} {}", condition.column, condition.operator)
            }
            SqlOperator::In | SqlOperator::NotIn => match &condition.value {
                Value::List(values) => {
                    let placeholders: Vec<String> = values
                        .iter()
                        .map(|v| match v {
                            Value::RawSql(sql) => sql.clone(),
                            Value::Column(col) => col.clone(),
                            _ => "?".to_string(),
                        })
                        .collect();
                    format!(
                        "{} {} ({})",
                        condition.column,
                        condition.operator,
                        placeholders.join(", ")
                    )
                }
                Value::RawSql(sql) => {
                    format!("{} {} ({})", condition.column, condition.operator, sql)
                }
                _ => format!("{} {} (?)", condition.column, condition.operator),
            },
            SqlOperator::Between | SqlOperator::NotBetween => {
                format!("{} {} ? AND ?", condition.column, condition.operator)
            }
            _ => match &condition.value {
                Value::RawSql(sql) => {
                    format!("{} {} {}", condition.column, condition.operator, sql)
                }
                Value::Column(col) => {
                    format!("{} {} {}", condition.column, condition.operator, col)
                }
                _ => format!("{} {} ?", condition.column, condition.operator),
            },
        }
    }

    pub fn build_group_by_clause(&self) -> String {
        self.group_by_columns.join(", ")
    }

    pub fn build_order_by_clause(&self) -> String {
        self.order_by_clauses
            .iter()
            .map(|order| format!("{} {}", order.column, order.direction))
            .collect::<Vec<String>>()
            .join(", ")
    }

    pub fn build_set_clause(&self) -> String {
        self.set_operations
            .iter()
            .map(|op| match &op.value {
                Value::RawSql(sql) => format!("{} = {}", op.column, sql),
                Value::Column(col) => format!("{} = {}", op.column, col),
                _ => format!("{} = ?", op.column),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    // ========== Parameter collection ==========

    fn condition_parameters(conditions: &[Condition], params: &mut Vec<Value>) {
        for condition in conditions {
            match &condition.operator {
                SqlOperator::IsNull | SqlOperator::IsNotNull => {}
                SqlOperator::In
                | SqlOperator::NotIn
                | SqlOperator::Between
                | SqlOperator::NotBetween => {
                    if let Value::List(values) = &condition.value {
                        for value in values {
                            if !matches!(value, Value::RawSql(_) | Value::Column(_)) {
                                params.push(value.clone());
                            }
                        }
                    }
                }
                _ => {
                    if !matches!(&condition.value, Value::RawSql(_) | Value::Column(_)) {
                        params.push(condition.value.clone());
                    }
                }
            }
        }
    }

    /// Parameters for the WHERE clause, in placeholder order (conditions
    /// first, then apply fragments).
    pub fn collect_where_parameters(&self) -> Vec<Value> {
        let mut params = Vec::new();
        Self::condition_parameters(&self.where_conditions, &mut params);
        params.extend(self.apply_parameters.iter().cloned());
        params
    }

    pub fn collect_having_parameters(&self) -> Vec<Value> {
        let mut params = Vec::new();
        Self::condition_parameters(&self.having_conditions, &mut params);
        params
    }

    pub fn collect_set_parameters(&self) -> Vec<Value> {
        self.set_operations
            .iter()
            .filter(|op| !matches!(op.value, Value::RawSql(_) | Value::Column(_)))
            .map(|op| op.value.clone())
            .collect()
    }

    /// All query data bundled for a `SqlBuilder`.
    pub fn get_query_data(&self) -> QueryData {
        QueryData {
            select: self.build_select_clause(),
            from: self.build_from_clause(),
            joins: self.build_join_clauses(),
            where_clause: self.build_where_clause(),
            group_by: self.build_group_by_clause(),
            having: self.build_having_clause(),
            order_by: self.build_order_by_clause(),
            limit: self.limit_value,
            offset: self.offset_value,
            last_sql: self.last_sql.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryData {
    pub select: String,
    pub from: Option<String>,
    pub joins: Vec<String>,
    pub where_clause: String,
    pub group_by: String,
    pub having: String,
    pub order_by: String,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub last_sql: Option<String>,
}
