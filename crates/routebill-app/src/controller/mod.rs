//! Screen state over the store
//!
//! Controllers own the in-memory lists the GUI renders. Mutations are applied
//! locally first and rolled back when the store call fails.

mod bills;
mod directory;
mod items;

pub use bills::BillsController;
pub use directory::DirectoryController;
pub use items::{ItemsController, TEMP_ID_PREFIX};
