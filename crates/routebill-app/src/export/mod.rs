//! Document and spreadsheet export

pub mod excel;
pub mod pdf;

use chrono::NaiveDate;

use routebill_domain::model::{Item, Vendor};
use routebill_types::Language;

use crate::config::BusinessProfile;

pub use excel::export_summary_workbook;
pub use pdf::{render_bill_pdf, render_summary_pdf, write_bill_pdf, write_summary_pdf};

/// Everything an export needs besides the bills themselves
pub struct ExportContext<'a> {
    pub items: &'a [Item],
    pub vendors: &'a [Vendor],
    pub business: &'a BusinessProfile,
    pub language: Language,
    /// TTF for Gujarati text; Helvetica is used when absent or unreadable
    pub gujarati_font: Option<&'a std::path::Path>,
}

impl ExportContext<'_> {
    pub fn vendor(&self, id: &str) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }

    /// Item name in the document language, `N/A` when the item is gone
    pub fn item_name(&self, item: Option<&Item>) -> String {
        item.map(|i| i.display_name(self.language).to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Keep ASCII letters, digits, `-`, `_`, `.` and spaces
pub fn sanitize_filename(input: &str) -> String {
    let out: String = input
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ' ') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = out.trim();
    if trimmed.is_empty() {
        "bill".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `bill_<vendor>_<dd-mm-yyyy>_<lang>.pdf`
pub fn bill_file_name(vendor_name: &str, date: NaiveDate, language: Language) -> String {
    format!(
        "bill_{}_{}_{}.pdf",
        sanitize_filename(vendor_name),
        date.format("%d-%m-%Y"),
        language.code()
    )
}

/// `summary_<lang>.pdf`
pub fn summary_file_name(language: Language) -> String {
    format!("summary_{}.pdf", language.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_file_name_sanitizes_vendor() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            bill_file_name("Patel/Sons & Co", date, Language::Gu),
            "bill_Patel_Sons _ Co_09-03-2024_gu.pdf"
        );
        assert_eq!(bill_file_name("પટેલ", date, Language::En), "bill_____09-03-2024_en.pdf");
    }

    #[test]
    fn test_summary_file_name() {
        assert_eq!(summary_file_name(Language::En), "summary_en.pdf");
    }
}
