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
//! Generic database values and the conversions between them and Rust types.
//!
use std::any::type_name;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::errors::{Result, ShibaError};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Tinyint(i8),
    Smallint(i16),
    Int(i32),
    Bigint(i64),
    Float(f32),
    Double(f64),
    Blob(Vec<u8>),
    Char(char),
    Text(String),
    Json(JsonValue),
    Uuid(Uuid),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Object(IndexMap<String, Value>),

    // SQL specific types
    Column(String),
    RawSql(String),

    // Container type
    List(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Look up a key of an `Object` value.
    pub fn get_obj_value(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Convert a key of an `Object` value; a missing key behaves like `Null`
    /// so optional fields decode to `None` instead of erroring.
    pub fn get_obj<T: FromValue>(&self, key: &str) -> Result<T> {
        match self.get_obj_value(key) {
            Some(v) => T::from_value_opt(v),
            None => T::from_value_opt(&Value::Null),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Tinyint(v) => write!(f, "{}", v),
            Value::Smallint(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Bigint(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Blob(v) => write!(f, "BLOB({} bytes)", v.len()),
            Value::Char(v) => write!(f, "'{}'", v),
            Value::Text(v) => write!(f, "'{}'", v.replace('\'', "''")),
            Value::Json(v) => write!(f, "JSON '{}'", v),
            Value::Uuid(v) => write!(f, "UUID '{}'", v),
            Value::Date(v) => write!(f, "DATE '{}'", v.format("%Y-%m-%d")),
            Value::Time(v) => write!(f, "TIME '{}'", v.format("%H:%M:%S")),
            Value::DateTime(v) => write!(f, "DATETIME '{}'", v.format("%Y-%m-%d %H:%M:%S")),
            Value::Object(v) => write!(f, "OBJECT({} fields)", v.len()),
            Value::Column(v) => write!(f, "{}", v),
            Value::RawSql(v) => write!(f, "{}", v),
            Value::List(v) => {
                let items: Vec<String> = v.iter().map(|i| i.to_string()).collect();
                write!(f, "({})", items.join(", "))
            }
        }
    }
}

/// A raw SQL expression used where a plain value would otherwise be bound,
/// e.g. `set("age", SqlExpr("age * 2".to_string()))`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlExpr(pub String);

impl From<SqlExpr> for Value {
    fn from(expr: SqlExpr) -> Self {
        Value::RawSql(expr.0)
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Bool,
    i8 => Tinyint,
    i16 => Smallint,
    i32 => Int,
    i64 => Bigint,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => Text,
    Vec<u8> => Blob,
    JsonValue => Json,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
}

macro_rules! impl_from_unsigned_for_value {
    ($($ty:ty => ($variant:ident, $target:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )*
    };
}

impl_from_unsigned_for_value! {
    u8 => (Smallint, i16),
    u16 => (Int, i32),
    u32 => (Bigint, i64),
    u64 => (Bigint, i64),
    usize => (Bigint, i64),
    isize => (Bigint, i64),
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Conversion from a Rust value into a database value, with a borrowing
/// receiver so entities can serialize without being consumed.
pub trait IntoValue {
    fn into_value(&self) -> Value;
}

macro_rules! impl_into_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(&self) -> Value {
                    self.clone().into()
                }
            }
        )*
    };
}

impl_into_value! {
    bool, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64,
    char, String, Vec<u8>, JsonValue, Uuid, NaiveDate, NaiveTime, NaiveDateTime,
}

impl IntoValue for &str {
    fn into_value(&self) -> Value {
        Value::Text((*self).to_owned())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(&self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

/// Conversion from a database value back into a Rust value.
pub trait FromValue: Sized {
    fn from_value_opt(value: &Value) -> Result<Self>;

    fn from_value(value: &Value) -> Self {
        match Self::from_value_opt(value) {
            Ok(v) => v,
            Err(_err) => panic!(
                "Couldn't convert {:?} to type {}. (see FromValue documentation)",
                value,
                type_name::<Self>(),
            ),
        }
    }
}

impl FromValue for Value {
    fn from_value_opt(value: &Value) -> Result<Self> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value_opt(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value_opt(other).map(Some),
        }
    }
}

macro_rules! impl_from_value_numeric {
    ($ty:ty, $ty_name:tt, $($variant:ident),*) => {
        impl FromValue for $ty {
            fn from_value_opt(value: &Value) -> Result<Self> {
                match *value {
                    $(Value::$variant(v) => Ok(v as $ty),
                    )*
                    _ => Err(ShibaError::DataError(format!(
                        "unable to convert {:?} to {}", value, $ty_name
                    ))),
                }
            }
        }
    };
}

impl_from_value_numeric!(i8, "i8", Tinyint);
impl_from_value_numeric!(i16, "i16", Tinyint, Smallint);
impl_from_value_numeric!(i32, "i32", Tinyint, Smallint, Int, Bigint);
impl_from_value_numeric!(i64, "i64", Tinyint, Smallint, Int, Bigint);
impl_from_value_numeric!(u8, "u8", Tinyint, Smallint, Int, Bigint);
impl_from_value_numeric!(u16, "u16", Smallint, Int, Bigint);
impl_from_value_numeric!(u32, "u32", Int, Bigint);
impl_from_value_numeric!(u64, "u64", Int, Bigint);
impl_from_value_numeric!(usize, "usize", Int, Bigint);
impl_from_value_numeric!(f32, "f32", Float);

impl FromValue for f64 {
    fn from_value_opt(value: &Value) -> Result<Self> {
        match *value {
            Value::Float(v) => Ok(f64::from(v)),
            Value::Double(v) => Ok(v),
            Value::Int(v) => Ok(f64::from(v)),
            Value::Bigint(v) => Ok(v as f64),
            _ => Err(ShibaError::DataError(format!(
                "unable to convert {:?} to f64",
                value
            ))),
        }
    }
}

impl FromValue for bool {
    fn from_value_opt(value: &Value) -> Result<Self> {
        match *value {
            Value::Bool(v) => Ok(v),
            Value::Tinyint(v) => Ok(v == 1),
            Value::Int(v) => Ok(v == 1),
            Value::Bigint(v) => Ok(v == 1),
            _ => Err(ShibaError::DataError(format!(
                "unable to convert {:?} to bool",
                value
            ))),
        }
    }
}

impl FromValue for String {
    fn from_value_opt(value: &Value) -> Result<Self> {
        match value {
            Value::Text(v) => Ok(v.to_owned()),
            Value::Char(v) => Ok(v.to_string()),
            _ => Err(ShibaError::DataError(format!(
                "unable to convert {:?} to String",
                value
            ))),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value_opt(value: &Value) -> Result<Self> {
        match value {
            Value::Date(v) => Ok(*v),
            Value::Text(v) => v.parse().map_err(|e| {
                ShibaError::DataError(format!("unable to parse '{}' as date: {}", v, e))
            }),
            _ => Err(ShibaError::DataError(format!(
                "unable to convert {:?} to NaiveDate",
                value
            ))),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value_opt(value: &Value) -> Result<Self> {
        match value {
            Value::DateTime(v) => Ok(*v),
            Value::Text(v) => NaiveDateTime::parse_from_str(v, "%Y-%m-%d %H:%M:%S").map_err(|e| {
                ShibaError::DataError(format!("unable to parse '{}' as datetime: {}", v, e))
            }),
            _ => Err(ShibaError::DataError(format!(
                "unable to convert {:?} to NaiveDateTime",
                value
            ))),
        }
    }
}

impl FromValue for Uuid {
    fn from_value_opt(value: &Value) -> Result<Self> {
        match value {
            Value::Uuid(v) => Ok(*v),
            Value::Text(v) => Uuid::parse_str(v).map_err(|e| {
                ShibaError::DataError(format!("unable to parse '{}' as uuid: {}", v, e))
            }),
            _ => Err(ShibaError::DataError(format!(
                "unable to convert {:?} to Uuid",
                value
            ))),
        }
    }
}

impl FromValue for JsonValue {
    fn from_value_opt(value: &Value) -> Result<Self> {
        match value {
            Value::Json(v) => Ok(v.clone()),
            Value::Text(v) => serde_json::from_str(v)
                .map_err(|e| ShibaError::DataError(format!("unable to parse json: {}", e))),
            _ => Err(ShibaError::DataError(format!(
                "unable to convert {:?} to JsonValue",
                value
            ))),
        }
    }
}

/// Statement parameters. Only positional binding is supported.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    None,
    Positional(Vec<Value>),
}

impl Params {
    pub fn is_empty(&self) -> bool {
        match self {
            Params::None => true,
            Params::Positional(v) => v.is_empty(),
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Params::None => write!(f, "[]"),
            Params::Positional(values) => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Params::None
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        if values.is_empty() {
            Params::None
        } else {
            Params::Positional(values)
        }
    }
}

impl<T: Into<Value>> From<(T,)> for Params {
    fn from(v: (T,)) -> Self {
        Params::Positional(vec![v.0.into()])
    }
}

impl<T1: Into<Value>, T2: Into<Value>> From<(T1, T2)> for Params {
    fn from(v: (T1, T2)) -> Self {
        Params::Positional(vec![v.0.into(), v.1.into()])
    }
}

impl<T1: Into<Value>, T2: Into<Value>, T3: Into<Value>> From<(T1, T2, T3)> for Params {
    fn from(v: (T1, T2, T3)) -> Self {
        Params::Positional(vec![v.0.into(), v.1.into(), v.2.into()])
    }
}
