//! Open store plus the loaded controllers shared by every panel

use routebill_app::config::Config;
use routebill_app::controller::{BillsController, DirectoryController, ItemsController};
use routebill_app::repository::open_store;
use routebill_domain::repository::Store;
use routebill_types::Result;

pub struct Session {
    pub store: Box<dyn Store>,
    pub items: ItemsController,
    pub directory: DirectoryController,
    pub bills: BillsController,
}

impl Session {
    pub fn open(config: &Config) -> Result<Self> {
        let store = open_store(config)?;
        let items = ItemsController::load(store.as_ref())?;
        let directory = DirectoryController::load(store.as_ref())?;
        let bills = BillsController::load(store.as_ref())?;
        Ok(Self {
            store,
            items,
            directory,
            bills,
        })
    }

    /// Re-fetch every table
    pub fn reload(&mut self) -> Result<()> {
        let store = self.store.as_ref();
        self.items.refresh(store)?;
        self.directory.refresh(store)?;
        self.bills.refresh(store)?;
        Ok(())
    }
}
