//! Schema migrations via [`refinery`].
//!
//! The Jobly schema ships embedded in the crate (`migrations/`), so a fresh
//! database only needs one call:
//!
//! ```ignore
//! let pool = jobly::create_pool(&jobly::DbConfig::from_env()?)?;
//! jobly::migrate::run_pool(&pool).await?;
//! ```

use crate::error::JoblyResult;

pub use refinery::Report;

mod embedded {
    refinery::embed_migrations!("migrations");
}

/// Embedded migration runner.
pub fn runner() -> refinery::Runner {
    embedded::migrations::runner()
}

/// Apply pending migrations on a single connection.
pub async fn run(client: &mut tokio_postgres::Client) -> JoblyResult<Report> {
    let report = runner().run_async(client).await?;
    tracing::info!(
        target: "jobly.model",
        applied = report.applied_migrations().len(),
        "schema migrations applied"
    );
    Ok(report)
}

/// Pool variant of [`run`].
#[cfg(feature = "pool")]
pub async fn run_pool(pool: &deadpool_postgres::Pool) -> JoblyResult<Report> {
    let mut client = pool.get().await?;
    run(&mut client).await
}
