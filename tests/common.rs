#![allow(dead_code)]
//!
//! Shared fixtures: schema, the canonical member/team seed, and a statement
//! spy built on the interceptor chain.
//!
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use shiba::prelude::*;

pub fn create_schema(shiba: &Shiba) {
    shiba
        .exec_drop(
            "CREATE TABLE team (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            )",
            (),
        )
        .expect("create team table");
    shiba
        .exec_drop(
            "CREATE TABLE member (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT,
                age INTEGER NOT NULL,
                team_id INTEGER REFERENCES team(id)
            )",
            (),
        )
        .expect("create member table");
    shiba
        .exec_drop(
            "CREATE TABLE hello (
                id INTEGER PRIMARY KEY AUTOINCREMENT
            )",
            (),
        )
        .expect("create hello table");
}

/// A fresh database with the schema applied. Keep the `TempDir` alive for
/// the duration of the test.
pub fn setup() -> (TempDir, Shiba) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("shiba.sqlite3");
    let cfg = ShibaConfig::new(&format!("sqlite://{}", path.display())).set_max_size(4);
    let shiba = Shiba::new(cfg).expect("database connection should open");
    create_schema(&shiba);
    (dir, shiba)
}

/// teamA/teamB plus member1..member4 with ages 10/20/30/40; the first two
/// members belong to teamA, the last two to teamB.
pub fn seed(shiba: &Shiba) -> (i64, i64) {
    let team_a: Option<i64> = shiba.save(&Team::new("teamA")).expect("save teamA");
    let team_b: Option<i64> = shiba.save(&Team::new("teamB")).expect("save teamB");
    let team_a = team_a.expect("teamA id");
    let team_b = team_b.expect("teamB id");

    for (username, age, team) in [
        ("member1", 10, team_a),
        ("member2", 20, team_a),
        ("member3", 30, team_b),
        ("member4", 40, team_b),
    ] {
        let _: Option<i64> = shiba
            .save(&Member::new(username, age).with_team(Some(team)))
            .expect("save member");
    }
    (team_a, team_b)
}

/// Counts executed statements by kind. Registered on a repository's chain it
/// makes the decoupled pagination strategy's count-skip observable.
#[derive(Default)]
pub struct CountSpy {
    counts: AtomicUsize,
    queries: AtomicUsize,
    total: AtomicUsize,
}

impl CountSpy {
    pub fn count_executions(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
    }

    pub fn query_executions(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn total_executions(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl SqlInterceptor for CountSpy {
    fn name(&self) -> &str {
        "count-spy"
    }

    fn before_execute(&self, ctx: &ExecuteContext<'_>) {
        self.total.fetch_add(1, Ordering::SeqCst);
        match ctx.operation {
            OperationType::Count => {
                self.counts.fetch_add(1, Ordering::SeqCst);
            }
            OperationType::Query => {
                self.queries.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }
    }
}

/// A seeded database plus a repository whose statements are observed by the
/// returned spy. The seeding handle shares the same pool, so both see the
/// same data.
pub fn setup_repository() -> (TempDir, Shiba, MemberRepository, Arc<CountSpy>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("shiba.sqlite3");
    let cfg = ShibaConfig::new(&format!("sqlite://{}", path.display())).set_max_size(4);
    let pool = Pool::new(cfg).expect("pool");

    let seeder = Shiba::from_pool(&pool).expect("seeding handle");
    create_schema(&seeder);

    let spy = Arc::new(CountSpy::default());
    let chain = InterceptorChain::new().register(spy.clone());
    let observed = Shiba::from_pool(&pool)
        .expect("repository handle")
        .with_interceptor_chain(chain);

    (dir, seeder, MemberRepository::new(observed), spy)
}
