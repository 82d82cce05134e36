//! Opening the configured store

use std::time::Duration;

use tracing::info;

use routebill_domain::repository::Store;
use routebill_infra::persistence::{FileStore, RestStore};
use routebill_types::Result;

use crate::config::{Backend, Config};

/// Open whichever store the config selects
pub fn open_store(config: &Config) -> Result<Box<dyn Store>> {
    match config.backend {
        Backend::File => Ok(Box::new(open_file_store(config)?)),
        Backend::Rest => {
            let (url, key) = config.rest_credentials(|name| std::env::var(name).ok())?;
            info!(url = %url, "Opening REST store");
            let store = RestStore::new(&url, &key, Duration::from_secs(config.timeout_secs))?;
            Ok(Box::new(store))
        }
    }
}

/// Open the JSON file store in the configured data directory
pub fn open_file_store(config: &Config) -> Result<FileStore> {
    let store_dir = config.data_dir()?;
    info!(dir = %store_dir.display(), "Opening file store");
    FileStore::open(store_dir)
}
