//! Canonical test configurations.

use super::TempDb;
use crate::infrastructure::config::Config;

/// Default configuration pointed at `db`.
pub fn for_db(db: &TempDb) -> Config {
    let mut config = Config::default();
    config.database.url = Some(db.url());
    config
}

/// Configuration with a small pool, for tests that exercise contention.
pub fn with_pool_size(db: &TempDb, pool_size: u32) -> Config {
    let mut config = for_db(db);
    config.database.pool_size = pool_size;
    config
}
