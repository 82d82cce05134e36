//! Search, sort, and grouping over items and vendors

use std::cmp::Ordering;

use crate::model::{Category, Item, Vendor};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemSort {
    #[default]
    NameAsc,
    NameDesc,
    RateAsc,
    RateDesc,
}

impl ItemSort {
    pub const ALL: [ItemSort; 4] = [
        ItemSort::NameAsc,
        ItemSort::NameDesc,
        ItemSort::RateAsc,
        ItemSort::RateDesc,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ItemSort::NameAsc => "Name (A-Z)",
            ItemSort::NameDesc => "Name (Z-A)",
            ItemSort::RateAsc => "Rate (Low-High)",
            ItemSort::RateDesc => "Rate (High-Low)",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VendorSort {
    #[default]
    NameAsc,
    NameDesc,
}

impl VendorSort {
    pub fn label(&self) -> &'static str {
        match self {
            VendorSort::NameAsc => "Name (A-Z)",
            VendorSort::NameDesc => "Name (Z-A)",
        }
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filter by search term (English or Gujarati name) and sort
pub fn query_items<'a>(items: &'a [Item], term: &str, sort: ItemSort) -> Vec<&'a Item> {
    let term = term.trim();
    let mut result: Vec<&Item> = items
        .iter()
        .filter(|i| term.is_empty() || i.matches(term))
        .collect();

    result.sort_by(|a, b| match sort {
        ItemSort::NameAsc => compare_names(&a.name_en, &b.name_en),
        ItemSort::NameDesc => compare_names(&b.name_en, &a.name_en),
        ItemSort::RateAsc => a.rate.total_cmp(&b.rate),
        ItemSort::RateDesc => b.rate.total_cmp(&a.rate),
    });
    result
}

/// Group items by category in fixed category order, omitting empty groups.
/// Order within a group is preserved.
pub fn group_by_category<'a>(items: &[&'a Item]) -> Vec<(Category, Vec<&'a Item>)> {
    Category::ALL
        .into_iter()
        .map(|cat| {
            let members: Vec<&Item> = items.iter().copied().filter(|i| i.category == cat).collect();
            (cat, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

/// Vendor list filter state
#[derive(Debug, Clone, Default)]
pub struct VendorQuery {
    pub route_id: Option<String>,
    pub term: String,
    pub sort: VendorSort,
}

impl VendorQuery {
    pub fn apply<'a>(&self, vendors: &'a [Vendor]) -> Vec<&'a Vendor> {
        let term = self.term.trim().to_lowercase();
        let mut result: Vec<&Vendor> = vendors
            .iter()
            .filter(|v| self.route_id.as_deref().map_or(true, |r| v.route_id == r))
            .filter(|v| {
                term.is_empty()
                    || v.name.to_lowercase().contains(&term)
                    || v.contact_or_empty().to_lowercase().contains(&term)
                    || v.address_or_empty().to_lowercase().contains(&term)
            })
            .collect();

        result.sort_by(|a, b| match self.sort {
            VendorSort::NameAsc => compare_names(&a.name, &b.name),
            VendorSort::NameDesc => compare_names(&b.name, &a.name),
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name_en: &str, name_gu: &str, rate: f64, category: Category) -> Item {
        Item {
            id: name_en.to_lowercase(),
            name_en: name_en.to_string(),
            name_gu: name_gu.to_string(),
            rate,
            has_gst: false,
            gst_percentage: None,
            category,
        }
    }

    fn vendor(name: &str, route_id: &str, address: Option<&str>) -> Vendor {
        Vendor {
            id: name.to_lowercase(),
            name: name.to_string(),
            route_id: route_id.to_string(),
            contact: None,
            address: address.map(str::to_string),
        }
    }

    #[test]
    fn test_query_items_searches_both_names() {
        let items = vec![
            item("Papad", "પાપડ", 20.0, Category::Fryums),
            item("Sev", "સેવ", 40.0, Category::Namkeen),
        ];
        let found = query_items(&items, "સેવ", ItemSort::NameAsc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name_en, "Sev");

        let found = query_items(&items, "PAP", ItemSort::NameAsc);
        assert_eq!(found[0].name_en, "Papad");
    }

    #[test]
    fn test_query_items_sorts_by_rate() {
        let items = vec![
            item("B", "", 5.0, Category::Others),
            item("A", "", 9.0, Category::Others),
            item("C", "", 1.0, Category::Others),
        ];
        let names = |sort| -> Vec<String> {
            query_items(&items, "", sort)
                .iter()
                .map(|i| i.name_en.clone())
                .collect()
        };
        assert_eq!(names(ItemSort::RateAsc), vec!["C", "B", "A"]);
        assert_eq!(names(ItemSort::RateDesc), vec!["A", "B", "C"]);
        assert_eq!(names(ItemSort::NameDesc), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_group_by_category_fixed_order() {
        let items = vec![
            item("X", "", 1.0, Category::Others),
            item("Y", "", 1.0, Category::Fryums),
        ];
        let refs: Vec<&Item> = items.iter().collect();
        let groups = group_by_category(&refs);
        let cats: Vec<_> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(cats, vec![Category::Fryums, Category::Others]);
    }

    #[test]
    fn test_vendor_query_filters_route_and_address() {
        let vendors = vec![
            vendor("Ramesh Stores", "r1", Some("Tejgadh")),
            vendor("Amit Traders", "r2", Some("Bodeli")),
            vendor("Bharat Kirana", "r1", None),
        ];
        let query = VendorQuery {
            route_id: Some("r1".to_string()),
            ..Default::default()
        };
        let names: Vec<_> = query.apply(&vendors).iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Bharat Kirana", "Ramesh Stores"]);

        let query = VendorQuery {
            term: "bodeli".to_string(),
            ..Default::default()
        };
        assert_eq!(query.apply(&vendors)[0].name, "Amit Traders");
    }
}
