//! Spending taxonomy: the fixed default buckets plus user-defined categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// A spending bucket. Serialised as its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryName {
    FoodAndDining,
    Transportation,
    Shopping,
    Groceries,
    Entertainment,
    Utilities,
    Healthcare,
    Education,
    Travel,
    Investment,
    Insurance,
    PersonalCare,
    Transfer,
    Services,
    Uncategorized,
    /// User-defined category, identified by name
    Custom(String),
}

impl CategoryName {
    /// Default buckets in their fixed scan order
    pub const DEFAULTS: [CategoryName; 15] = [
        CategoryName::FoodAndDining,
        CategoryName::Transportation,
        CategoryName::Shopping,
        CategoryName::Groceries,
        CategoryName::Entertainment,
        CategoryName::Utilities,
        CategoryName::Healthcare,
        CategoryName::Education,
        CategoryName::Travel,
        CategoryName::Investment,
        CategoryName::Insurance,
        CategoryName::PersonalCare,
        CategoryName::Transfer,
        CategoryName::Services,
        CategoryName::Uncategorized,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            CategoryName::FoodAndDining => "Food & Dining",
            CategoryName::Transportation => "Transportation",
            CategoryName::Shopping => "Shopping",
            CategoryName::Groceries => "Groceries",
            CategoryName::Entertainment => "Entertainment",
            CategoryName::Utilities => "Utilities",
            CategoryName::Healthcare => "Healthcare",
            CategoryName::Education => "Education",
            CategoryName::Travel => "Travel",
            CategoryName::Investment => "Investment",
            CategoryName::Insurance => "Insurance",
            CategoryName::PersonalCare => "Personal Care",
            CategoryName::Transfer => "Transfer",
            CategoryName::Services => "Services",
            CategoryName::Uncategorized => "Uncategorized",
            CategoryName::Custom(name) => name,
        }
    }

    /// Resolve a stored category name. Default names match case-insensitively;
    /// anything else becomes `Custom`.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        Self::DEFAULTS
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| CategoryName::Custom(trimmed.to_string()))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, CategoryName::Custom(_))
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CategoryName {
    fn from(s: String) -> Self {
        CategoryName::from_name(&s)
    }
}

impl From<CategoryName> for String {
    fn from(c: CategoryName) -> Self {
        c.as_str().to_string()
    }
}

/// A category row as provisioned by the storage collaborator for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub id: i64,
    pub name: String,
    /// Substrings that route a transaction into this category
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "#2196F3".to_string()
}

impl CategoryDefinition {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            keywords: Vec::new(),
            is_default: false,
            color: default_color(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn category_name(&self) -> CategoryName {
        CategoryName::from_name(&self.name)
    }

    /// The rows a new user starts with, ids 1..=n in taxonomy order.
    pub fn defaults() -> Vec<CategoryDefinition> {
        const COLORS: [(&str, &str); 15] = [
            ("Food & Dining", "#FF5722"),
            ("Transportation", "#2196F3"),
            ("Shopping", "#E91E63"),
            ("Groceries", "#4CAF50"),
            ("Entertainment", "#9C27B0"),
            ("Utilities", "#FF9800"),
            ("Healthcare", "#F44336"),
            ("Education", "#3F51B5"),
            ("Travel", "#00BCD4"),
            ("Investment", "#795548"),
            ("Insurance", "#607D8B"),
            ("Personal Care", "#FFC107"),
            ("Transfer", "#8BC34A"),
            ("Services", "#009688"),
            ("Uncategorized", "#9E9E9E"),
        ];

        COLORS
            .iter()
            .enumerate()
            .map(|(i, (name, color))| CategoryDefinition {
                id: i as i64 + 1,
                name: name.to_string(),
                keywords: Vec::new(),
                is_default: true,
                color: color.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_matches_defaults() {
        assert_eq!(CategoryName::from_name("food & dining"), CategoryName::FoodAndDining);
        assert_eq!(CategoryName::from_name(" Personal Care "), CategoryName::PersonalCare);
        assert_eq!(
            CategoryName::from_name("Pets"),
            CategoryName::Custom("Pets".to_string())
        );
    }

    #[test]
    fn test_defaults_cover_taxonomy_in_order() {
        let defaults = CategoryDefinition::defaults();
        assert_eq!(defaults.len(), CategoryName::DEFAULTS.len());
        for (row, name) in defaults.iter().zip(CategoryName::DEFAULTS.iter()) {
            assert_eq!(&row.category_name(), name);
            assert!(row.is_default);
        }
        assert_eq!(defaults[0].id, 1);
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&CategoryName::PersonalCare).unwrap();
        assert_eq!(json, "\"Personal Care\"");
        let back: CategoryName = serde_json::from_str("\"Groceries\"").unwrap();
        assert_eq!(back, CategoryName::Groceries);
    }

    #[test]
    fn test_definition_defaults_when_deserializing() {
        let def: CategoryDefinition =
            serde_json::from_str(r#"{"id": 42, "name": "Pets", "keywords": ["vet"]}"#).unwrap();
        assert!(!def.is_default);
        assert_eq!(def.color, "#2196F3");
        assert!(def.category_name().is_custom());
    }
}
