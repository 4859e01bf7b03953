//! Test support for Bazaar integration tests.
//!
//! Logic-level tests run everywhere. Database-backed tests connect to the
//! `PostgreSQL` named by `DATABASE_URL`, run the migrations, and skip
//! themselves silently when the variable is unset (CI without a database).

use sqlx::PgPool;

/// Connect to the test database and migrate it, or `None` to skip.
pub async fn try_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;
    sqlx::migrate!("../server/migrations").run(&pool).await.ok()?;
    Some(pool)
}

/// A unique suffix so fixtures from different test runs don't collide.
#[must_use]
pub fn unique(prefix: &str) -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{nanos}-{n}")
}
