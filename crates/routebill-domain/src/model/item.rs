//! Catalog items and their categories

use serde::{Deserialize, Deserializer, Serialize};

use routebill_types::{Error, Language, Result};

/// Item category. Unknown or missing values read as `Others`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Fryums,
    Namkeen,
    #[default]
    Others,
}

impl Category {
    /// Fixed display order used when grouping
    pub const ALL: [Category; 3] = [Category::Fryums, Category::Namkeen, Category::Others];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fryums => "Fryums",
            Category::Namkeen => "Namkeen",
            Category::Others => "Others",
        }
    }

    /// Parse a category name, case-insensitive
    pub fn parse(s: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Category::parse).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name_en: String,
    #[serde(default)]
    pub name_gu: String,
    pub rate: f64,
    #[serde(default)]
    pub has_gst: bool,
    #[serde(default)]
    pub gst_percentage: Option<f64>,
    #[serde(default)]
    pub category: Category,
}

impl Item {
    /// GST percentage, 0 when unset
    pub fn gst_rate(&self) -> f64 {
        self.gst_percentage.unwrap_or(0.0)
    }

    /// Name in the requested language; Gujarati falls back to English when blank
    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::Gu if !self.name_gu.trim().is_empty() => &self.name_gu,
            _ => &self.name_en,
        }
    }

    /// Case-insensitive match against either name
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name_en.to_lowercase().contains(&term) || self.name_gu.to_lowercase().contains(&term)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name_en: String,
    pub name_gu: String,
    pub rate: f64,
    #[serde(default)]
    pub has_gst: bool,
    #[serde(default)]
    pub gst_percentage: Option<f64>,
    #[serde(default)]
    pub category: Category,
}

impl NewItem {
    /// Check required fields and numeric ranges
    pub fn validate(&self) -> Result<()> {
        if self.name_en.trim().is_empty() {
            return Err(Error::MissingField("name_en".to_string()));
        }
        if self.name_gu.trim().is_empty() {
            return Err(Error::MissingField("name_gu".to_string()));
        }
        if !self.rate.is_finite() || self.rate < 0.0 {
            return Err(Error::InvalidNumber {
                field: "rate".to_string(),
                value: self.rate.to_string(),
            });
        }
        if let Some(gst) = self.gst_percentage {
            if !gst.is_finite() || gst < 0.0 {
                return Err(Error::InvalidNumber {
                    field: "gst_percentage".to_string(),
                    value: gst.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn into_item(self, id: String) -> Item {
        Item {
            id,
            name_en: self.name_en,
            name_gu: self.name_gu,
            rate: self.rate,
            has_gst: self.has_gst,
            gst_percentage: self.gst_percentage,
            category: self.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item() -> NewItem {
        NewItem {
            name_en: "Papad".to_string(),
            name_gu: "પાપડ".to_string(),
            rate: 20.0,
            has_gst: true,
            gst_percentage: Some(5.0),
            category: Category::Fryums,
        }
    }

    #[test]
    fn test_category_deserialize_unknown_as_others() {
        let item: Item = serde_json::from_str(
            r#"{"id":"1","name_en":"A","name_gu":"અ","rate":1.0,"category":"Sweets"}"#,
        )
        .unwrap();
        assert_eq!(item.category, Category::Others);

        let item: Item = serde_json::from_str(
            r#"{"id":"1","name_en":"A","name_gu":"અ","rate":1.0,"category":null}"#,
        )
        .unwrap();
        assert_eq!(item.category, Category::Others);
    }

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!(Category::parse("namkeen"), Some(Category::Namkeen));
        assert_eq!(Category::parse(" FRYUMS "), Some(Category::Fryums));
        assert_eq!(Category::parse("misc"), None);
    }

    #[test]
    fn test_display_name_falls_back_to_english() {
        let mut item = new_item().into_item("1".to_string());
        assert_eq!(item.display_name(Language::Gu), "પાપડ");
        item.name_gu.clear();
        assert_eq!(item.display_name(Language::Gu), "Papad");
    }

    #[test]
    fn test_validate_rejects_negative_rate() {
        let mut item = new_item();
        item.rate = -1.0;
        assert!(matches!(item.validate(), Err(Error::InvalidNumber { .. })));
    }

    #[test]
    fn test_validate_requires_names() {
        let mut item = new_item();
        item.name_gu = " ".to_string();
        assert!(matches!(item.validate(), Err(Error::MissingField(f)) if f == "name_gu"));
    }
}
