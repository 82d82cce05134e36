//! Vendor records

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    /// Owning route
    pub route_id: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Vendor {
    pub fn contact_or_empty(&self) -> &str {
        self.contact.as_deref().unwrap_or("")
    }

    pub fn address_or_empty(&self) -> &str {
        self.address.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVendor {
    pub name: String,
    pub route_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl NewVendor {
    /// Treat blank optional text as absent
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.contact = self.contact.filter(|c| !c.trim().is_empty());
        self.address = self.address.filter(|a| !a.trim().is_empty());
        self
    }
}
