//! Item catalog state with optimistic add / edit / delete

use tracing::{info, warn};
use uuid::Uuid;

use routebill_domain::model::{Category, Item, NewItem};
use routebill_domain::repository::Store;
use routebill_domain::service::OptimisticList;
use routebill_types::{Error, Result, StoreError};

/// Prefix of ids given to items that the store has not confirmed yet
pub const TEMP_ID_PREFIX: &str = "temp_";

pub struct ItemsController {
    list: OptimisticList<Item>,
}

impl ItemsController {
    pub fn load(store: &dyn Store) -> Result<Self> {
        Ok(Self {
            list: OptimisticList::new(store.list_items()?),
        })
    }

    pub fn items(&self) -> &[Item] {
        self.list.items()
    }

    pub fn refresh(&mut self, store: &dyn Store) -> Result<()> {
        self.list.replace(store.list_items()?);
        Ok(())
    }

    /// Show the item at once under a temporary id, then swap in the stored row
    pub fn add(&mut self, store: &dyn Store, new: NewItem) -> Result<Item> {
        new.validate()?;
        let temp_id = format!("{}{}", TEMP_ID_PREFIX, Uuid::new_v4());
        let placeholder = new.clone().into_item(temp_id.clone());

        let stored = self.list.run(
            |items| items.push(placeholder),
            || {
                store
                    .create_items(std::slice::from_ref(&new))?
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        Error::from(StoreError::Invalid {
                            table: "items".to_string(),
                            message: "store returned no item".to_string(),
                        })
                    })
            },
        );
        let stored = stored.inspect_err(|e| warn!(error = %e, "Add item failed, reverted"))?;

        let confirmed = stored.clone();
        self.list.settle(|items| {
            if let Some(slot) = items.iter_mut().find(|i| i.id == temp_id) {
                *slot = confirmed;
            }
        });
        info!(id = %stored.id, name = %stored.name_en, "Item added");
        Ok(stored)
    }

    pub fn update(&mut self, store: &dyn Store, item: Item) -> Result<Item> {
        let local = item.clone();
        self.list
            .run(
                |items| {
                    if let Some(slot) = items.iter_mut().find(|i| i.id == local.id) {
                        *slot = local;
                    }
                },
                || store.update_item(&item),
            )
            .inspect_err(|e| warn!(id = %item.id, error = %e, "Update item failed, reverted"))
    }

    pub fn change_category(&mut self, store: &dyn Store, id: &str, category: Category) -> Result<Item> {
        let mut item = self
            .items()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                table: "items".to_string(),
                id: id.to_string(),
            })?;
        item.category = category;
        self.update(store, item)
    }

    /// Remove locally first; an item still on bills comes back with a
    /// referential-integrity error
    pub fn delete(&mut self, store: &dyn Store, id: &str) -> Result<()> {
        self.list
            .run(|items| items.retain(|i| i.id != id), || store.delete_item(id))
            .inspect_err(|e| warn!(id, error = %e, "Delete item failed, reverted"))
    }

    /// One store call updating every item in `category`
    pub fn bulk_update_rate(&mut self, store: &dyn Store, category: Category, rate: f64) -> Result<usize> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(Error::InvalidNumber {
                field: "rate".to_string(),
                value: rate.to_string(),
            });
        }
        let count = self
            .list
            .run(
                |items| {
                    items
                        .iter_mut()
                        .filter(|i| i.category == category)
                        .for_each(|i| i.rate = rate);
                },
                || store.bulk_update_rate(category, rate),
            )
            .inspect_err(|e| warn!(category = %category, error = %e, "Bulk rate update failed, reverted"))?;
        info!(category = %category, rate, count, "Bulk rate update");
        Ok(count)
    }
}
