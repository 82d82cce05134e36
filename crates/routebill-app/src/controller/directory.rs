//! Routes and vendors
//!
//! Changes show up locally at once; after the store accepts them both
//! lists are fetched again so server-assigned ids and defaults are current.

use tracing::{info, warn};
use uuid::Uuid;

use routebill_domain::model::{NewRoute, NewVendor, Route, Vendor};
use routebill_domain::repository::Store;
use routebill_domain::service::OptimisticList;
use routebill_types::{Error, Result};

use super::items::TEMP_ID_PREFIX;

pub struct DirectoryController {
    routes: OptimisticList<Route>,
    vendors: OptimisticList<Vendor>,
}

fn temp_id() -> String {
    format!("{}{}", TEMP_ID_PREFIX, Uuid::new_v4())
}

impl DirectoryController {
    pub fn load(store: &dyn Store) -> Result<Self> {
        Ok(Self {
            routes: OptimisticList::new(store.list_routes()?),
            vendors: OptimisticList::new(store.list_vendors()?),
        })
    }

    pub fn routes(&self) -> &[Route] {
        self.routes.items()
    }

    pub fn vendors(&self) -> &[Vendor] {
        self.vendors.items()
    }

    pub fn route_name(&self, route_id: &str) -> Option<&str> {
        self.routes()
            .iter()
            .find(|r| r.id == route_id)
            .map(|r| r.name.as_str())
    }

    pub fn refresh(&mut self, store: &dyn Store) -> Result<()> {
        self.routes.replace(store.list_routes()?);
        self.vendors.replace(store.list_vendors()?);
        Ok(())
    }

    pub fn add_route(&mut self, store: &dyn Store, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::MissingField("name".to_string()));
        }
        let placeholder = Route {
            id: temp_id(),
            name: name.to_string(),
        };
        let new = NewRoute {
            name: name.to_string(),
        };
        self.routes
            .run(|routes| routes.push(placeholder), || store.create_routes(&[new]))
            .inspect_err(|e| warn!(error = %e, "Add route failed, reverted"))?;
        info!(name, "Route added");
        self.refresh(store)
    }

    pub fn update_route(&mut self, store: &dyn Store, route: Route) -> Result<()> {
        if route.name.trim().is_empty() {
            return Err(Error::MissingField("name".to_string()));
        }
        let local = route.clone();
        self.routes
            .run(
                |routes| {
                    if let Some(slot) = routes.iter_mut().find(|r| r.id == local.id) {
                        *slot = local;
                    }
                },
                || store.update_route(&route),
            )
            .inspect_err(|e| warn!(id = %route.id, error = %e, "Update route failed, reverted"))?;
        self.refresh(store)
    }

    pub fn delete_route(&mut self, store: &dyn Store, id: &str) -> Result<()> {
        self.routes
            .run(|routes| routes.retain(|r| r.id != id), || store.delete_route(id))
            .inspect_err(|e| warn!(id, error = %e, "Delete route failed, reverted"))?;
        self.refresh(store)
    }

    pub fn add_vendor(&mut self, store: &dyn Store, new: NewVendor) -> Result<()> {
        let new = new.normalized();
        if new.name.is_empty() {
            return Err(Error::MissingField("name".to_string()));
        }
        if new.route_id.is_empty() {
            return Err(Error::MissingField("route".to_string()));
        }
        let placeholder = Vendor {
            id: temp_id(),
            name: new.name.clone(),
            route_id: new.route_id.clone(),
            contact: new.contact.clone(),
            address: new.address.clone(),
        };
        self.vendors
            .run(
                |vendors| vendors.push(placeholder),
                || store.create_vendors(std::slice::from_ref(&new)),
            )
            .inspect_err(|e| warn!(error = %e, "Add vendor failed, reverted"))?;
        info!(name = %new.name, "Vendor added");
        self.refresh(store)
    }

    pub fn update_vendor(&mut self, store: &dyn Store, vendor: Vendor) -> Result<()> {
        if vendor.name.trim().is_empty() {
            return Err(Error::MissingField("name".to_string()));
        }
        let local = vendor.clone();
        self.vendors
            .run(
                |vendors| {
                    if let Some(slot) = vendors.iter_mut().find(|v| v.id == local.id) {
                        *slot = local;
                    }
                },
                || store.update_vendor(&vendor),
            )
            .inspect_err(|e| warn!(id = %vendor.id, error = %e, "Update vendor failed, reverted"))?;
        self.refresh(store)
    }

    pub fn delete_vendor(&mut self, store: &dyn Store, id: &str) -> Result<()> {
        self.vendors
            .run(|vendors| vendors.retain(|v| v.id != id), || store.delete_vendor(id))
            .inspect_err(|e| warn!(id, error = %e, "Delete vendor failed, reverted"))?;
        self.refresh(store)
    }
}
