#![forbid(unsafe_code)]

mod directory;
mod gapfill;
mod render;
mod schedules;
mod shifts;
mod weeks;

use crate::advisor::{HttpAdvisor, NoAdvisor, RankAdvisor};
use crate::config::ServerConfig;
use rd_storage::{SqliteStore, StoreError};
use std::path::Path;

pub struct RosterServer {
    store: SqliteStore,
    advisor: Box<dyn RankAdvisor>,
}

impl RosterServer {
    pub fn from_config(config: &ServerConfig) -> Result<Self, StoreError> {
        let advisor: Box<dyn RankAdvisor> = match config
            .advisor
            .as_ref()
            .and_then(HttpAdvisor::from_config)
        {
            Some(advisor) => Box::new(advisor),
            None => Box::new(NoAdvisor),
        };
        Self::open(&config.storage_dir, advisor)
    }

    pub fn open(
        storage_dir: impl AsRef<Path>,
        advisor: Box<dyn RankAdvisor>,
    ) -> Result<Self, StoreError> {
        let store = SqliteStore::open(storage_dir)?;
        Ok(Self { store, advisor })
    }

    pub(crate) fn store_mut(&mut self) -> &mut SqliteStore {
        &mut self.store
    }
}
