//! Connection pool utilities

use crate::config::DbConfig;
use crate::error::{JoblyError, JoblyResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, PoolBuilder, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from a [`DbConfig`].
///
/// Uses `NoTls` and fast recycling. Pool size comes from
/// `DbConfig::pool_max_size`.
///
/// ```ignore
/// let pool = jobly::create_pool(&jobly::DbConfig::from_env()?)?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(config: &DbConfig) -> JoblyResult<Pool> {
    let max_size = config.pool_max_size;
    create_pool_with_config(&config.database_url, |builder| builder.max_size(max_size))
}

/// Create a connection pool with a custom `PoolBuilder` step.
pub fn create_pool_with_config(
    database_url: &str,
    configure_pool: impl FnOnce(PoolBuilder) -> PoolBuilder,
) -> JoblyResult<Pool> {
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| JoblyError::Connection(e.to_string()))?;

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, NoTls, manager_config);
    configure_pool(Pool::builder(mgr))
        .build()
        .map_err(|e| JoblyError::Pool(e.to_string()))
}
