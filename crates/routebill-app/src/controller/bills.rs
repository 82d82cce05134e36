//! Bills: submission from the billing form and summary-screen deletes

use tracing::{info, warn};

use routebill_domain::model::Bill;
use routebill_domain::repository::Store;
use routebill_domain::service::{BillDraft, OptimisticList};
use routebill_types::Result;

pub struct BillsController {
    list: OptimisticList<Bill>,
}

impl BillsController {
    pub fn load(store: &dyn Store) -> Result<Self> {
        Ok(Self {
            list: OptimisticList::new(store.list_bills()?),
        })
    }

    pub fn bills(&self) -> &[Bill] {
        self.list.items()
    }

    pub fn refresh(&mut self, store: &dyn Store) -> Result<()> {
        self.list.replace(store.list_bills()?);
        Ok(())
    }

    /// Create the bill in one store call; the draft is left untouched on failure
    pub fn submit(&mut self, store: &dyn Store, draft: &BillDraft) -> Result<Bill> {
        let new = draft.to_new_bill()?;
        let bill = store
            .create_bill(&new)
            .inspect_err(|e| warn!(error = %e, "Create bill failed"))?;
        info!(id = %bill.id, vendor = %bill.vendor_id, lines = bill.items.len(), "Bill created");
        let created = bill.clone();
        self.list.settle(|bills| bills.push(created));
        Ok(bill)
    }

    pub fn delete_bill(&mut self, store: &dyn Store, id: &str) -> Result<()> {
        self.list
            .run(|bills| bills.retain(|b| b.id != id), || store.delete_bill(id))
            .inspect_err(|e| warn!(id, error = %e, "Delete bill failed, reverted"))
    }

    /// Delete one line, then re-fetch so bill totals reflect the store
    pub fn delete_line(&mut self, store: &dyn Store, line_id: &str) -> Result<()> {
        store
            .delete_bill_item(line_id)
            .inspect_err(|e| warn!(id = line_id, error = %e, "Delete bill line failed"))?;
        self.refresh(store)
    }

    pub fn delete_all(&mut self, store: &dyn Store) -> Result<()> {
        self.list
            .run(|bills| bills.clear(), || store.delete_all_bills())
            .inspect_err(|e| warn!(error = %e, "Delete all bills failed, reverted"))?;
        info!("All bills deleted");
        Ok(())
    }
}
