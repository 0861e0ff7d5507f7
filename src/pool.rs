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
use std::fmt;
use std::path::{Path, PathBuf};

use r2d2::ManageConnection;
use rusqlite::{Connection, OpenFlags};

use crate::config::{Platform, ShibaConfig};
use crate::errors::{Result, ShibaError};

pub type R2d2Pool = r2d2::Pool<SqliteConnectionManager>;
pub type PooledSqliteConnection = r2d2::PooledConnection<SqliteConnectionManager>;

#[derive(Debug)]
enum Source {
    File(PathBuf),
    Memory,
}

type InitFn = dyn Fn(&mut Connection) -> std::result::Result<(), rusqlite::Error> + Send + Sync + 'static;

pub struct SqliteConnectionManager {
    source: Source,
    flags: OpenFlags,
    init: Option<Box<InitFn>>,
}

impl fmt::Debug for SqliteConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut builder = f.debug_struct("SqliteConnectionManager");
        let _ = builder.field("source", &self.source);
        let _ = builder.field("flags", &self.flags);
        let _ = builder.field("init", &self.init.as_ref().map(|_| "InitFn"));
        builder.finish()
    }
}

impl SqliteConnectionManager {
    /// Creates a new `SqliteConnectionManager` from file.
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source: Source::File(path.as_ref().to_path_buf()),
            flags: OpenFlags::default(),
            init: None,
        }
    }

    /// Creates a new `SqliteConnectionManager` from memory.
    pub fn memory() -> Self {
        Self {
            source: Source::Memory,
            flags: OpenFlags::default(),
            init: None,
        }
    }

    /// Set the `OpenFlags` used when connections are created.
    pub fn with_flags(self, flags: OpenFlags) -> Self {
        Self { flags, ..self }
    }

    /// Set an initialization hook run on every new connection. Could be used
    /// to set PRAGMAs, for example.
    pub fn with_init<F>(self, init: F) -> Self
    where
        F: Fn(&mut Connection) -> std::result::Result<(), rusqlite::Error> + Send + Sync + 'static,
    {
        let init: Option<Box<InitFn>> = Some(Box::new(init));
        Self { init, ..self }
    }
}

impl ManageConnection for SqliteConnectionManager {
    type Connection = Connection;
    type Error = rusqlite::Error;

    fn connect(&self) -> std::result::Result<Connection, rusqlite::Error> {
        match self.source {
            Source::File(ref path) => Connection::open_with_flags(path, self.flags),
            Source::Memory => Connection::open_in_memory_with_flags(self.flags),
        }
        .and_then(|mut c| match self.init {
            None => Ok(c),
            Some(ref init) => init(&mut c).map(|_| c),
        })
    }

    fn is_valid(&self, conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch("")
    }

    fn has_broken(&self, _: &mut Connection) -> bool {
        false
    }
}

/// The pool variants of the supported platforms.
pub enum PlatformPool {
    SqlitePool(R2d2Pool),
}

/// A pooled connection of the supported platforms.
pub enum PooledConnection {
    PooledSqlite(Box<PooledSqliteConnection>),
}

impl PlatformPool {
    pub fn acquire(&self) -> Result<PooledConnection> {
        match self {
            PlatformPool::SqlitePool(pool) => {
                let conn = pool.get()?;
                Ok(PooledConnection::PooledSqlite(Box::new(conn)))
            }
        }
    }
}

/// An owned pool plus the configuration that produced it.
pub struct Pool {
    inner: PlatformPool,
    cfg: ShibaConfig,
}

impl Pool {
    pub fn new(cfg: ShibaConfig) -> Result<Self> {
        let path = match cfg.platform() {
            Platform::Sqlite(path) => path.clone(),
            Platform::Unsupported(scheme) => {
                return Err(ShibaError::UnknownDatabase(scheme.to_string()))
            }
        };
        let pool = init_pool(&path, &cfg)?;
        Ok(Pool {
            inner: PlatformPool::SqlitePool(pool),
            cfg,
        })
    }

    pub fn get_pool(&self) -> &PlatformPool {
        &self.inner
    }

    pub fn config(&self) -> &ShibaConfig {
        &self.cfg
    }

    pub fn acquire(&self) -> Result<PooledConnection> {
        self.inner.acquire()
    }
}

/// Build the r2d2 pool for a sqlite database file.
pub fn init_pool(path: &str, cfg: &ShibaConfig) -> Result<R2d2Pool> {
    test_connection(path)?;
    let manager = if path == ":memory:" {
        SqliteConnectionManager::memory()
    } else {
        SqliteConnectionManager::file(path)
    };
    let pool = r2d2::Pool::builder()
        .connection_timeout(cfg.connection_timeout())
        .min_idle(cfg.min_idle())
        .max_size(cfg.max_size())
        .build(manager)?;
    Ok(pool)
}

fn test_connection(path: &str) -> Result<()> {
    let manager = if path == ":memory:" {
        SqliteConnectionManager::memory()
    } else {
        SqliteConnectionManager::file(path)
    };
    let mut conn = manager.connect()?;
    manager.is_valid(&mut conn)?;
    Ok(())
}
