//! Domain services

pub mod aggregation;
pub mod bill_draft;
pub mod catalog;
pub mod optimistic;

pub use aggregation::{
    bill_breakdown, grand_total, item_wise_summary, BillBreakdown, ItemLookup, ItemSummaryRow,
    ItemWiseSummary, LineAmounts, LineBreakdown,
};
pub use bill_draft::{BillDraft, DraftLine};
pub use catalog::{group_by_category, query_items, ItemSort, VendorQuery, VendorSort};
pub use optimistic::{OptimisticList, Snapshot};
