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
use std::time::Duration;

use url::Url;

#[derive(Clone, Debug, PartialEq)]
pub enum Platform {
    Sqlite(String),
    Unsupported(String),
}

#[derive(Clone, Debug, Copy, PartialEq)]
pub enum LogLevel {
    Debug,
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub struct ShibaConfig {
    connection_timeout: Duration,
    min_idle: Option<u32>,
    max_size: u32,
    platform: Platform,
    url: Option<String>,
    log_level: Option<LogLevel>,
}

impl Default for ShibaConfig {
    fn default() -> Self {
        ShibaConfig {
            max_size: 16,
            platform: Platform::Unsupported(String::default()),
            url: None,
            connection_timeout: Duration::from_secs(6),
            min_idle: None,
            log_level: None,
        }
    }
}

impl ShibaConfig {
    pub fn new(url: &str) -> Self {
        let mut cfg = ShibaConfig::default();
        cfg.url = url.to_string().into();
        cfg.parse_url()
    }

    /// parse the url into the platform configuration
    fn parse_url(mut self) -> Self {
        let raw = self.url.to_owned().unwrap_or_default();
        // `sqlite::memory:` is not a parseable URL, special-case it
        if raw == "sqlite::memory:" || raw == "sqlite://:memory:" {
            self.platform = Platform::Sqlite(":memory:".to_string());
            return self;
        }
        match Url::parse(&raw) {
            Ok(url) => match url.scheme() {
                "sqlite" => {
                    let host = url.host_str().unwrap_or_default();
                    let path = url.path();
                    let path = if path == "/" { "" } else { path };
                    let db_file = format!("{}{}", host, path);
                    self.platform = Platform::Sqlite(db_file);
                    self
                }
                scheme => {
                    self.platform = Platform::Unsupported(scheme.to_string());
                    self
                }
            },
            Err(_) => {
                self.platform = Platform::Unsupported(raw);
                self
            }
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn url(&self) -> String {
        self.url.to_owned().unwrap_or_default()
    }

    pub fn set_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }

    pub fn set_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn set_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    pub fn min_idle(&self) -> Option<u32> {
        self.min_idle
    }

    pub fn set_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    pub fn set_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_sqlite_file_url() {
        let cfg = ShibaConfig::new("sqlite:///tmp/shiba/demo.sqlite3");
        assert_eq!(
            cfg.platform(),
            &Platform::Sqlite("/tmp/shiba/demo.sqlite3".to_string())
        );
    }

    #[test]
    fn parses_memory_url() {
        let cfg = ShibaConfig::new("sqlite::memory:");
        assert_eq!(cfg.platform(), &Platform::Sqlite(":memory:".to_string()));
    }

    #[test]
    fn rejects_unknown_scheme() {
        let cfg = ShibaConfig::new("mysql://localhost:3306/demo");
        assert!(matches!(cfg.platform(), Platform::Unsupported(_)));
    }
}
