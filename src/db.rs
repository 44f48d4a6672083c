use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

use crate::config::DatabaseConfig;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub fn create_pool(config: &DatabaseConfig) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(&config.url);
    Pool::builder()
        .max_size(config.pool_max_size)
        .connection_timeout(config.connect_timeout)
        .build(manager)
}
