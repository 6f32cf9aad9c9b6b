//! Search and dropdown filters applied to a collection.
//!
//! The predicate is re-evaluated against the whole collection every time the
//! filter changes. There is no index; collections are page-sized.

use serde::{Deserialize, Serialize};

use crate::record::Searchable;

/// Value of a dropdown filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterChoice {
    /// No restriction (the `"all"` option).
    #[default]
    All,
    /// Only records with this value.
    Only(String),
}

impl FilterChoice {
    /// Parse a dropdown value. Only the exact option `"all"` means no
    /// restriction; anything else is compared as given.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Only(value.to_owned())
        }
    }

    /// Returns `true` if this choice does not restrict anything.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<Option<&str>> for FilterChoice {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::All, Self::parse)
    }
}

/// Free-text search plus status and category dropdowns, AND-ed together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filter {
    /// Free-text search term.
    pub search: String,
    /// Status dropdown, compared case-insensitively.
    pub status: FilterChoice,
    /// Category dropdown, compared exactly.
    pub category: FilterChoice,
}

impl Filter {
    /// Build a filter from raw form values.
    #[must_use]
    pub fn new(search: &str, status: &str, category: &str) -> Self {
        Self {
            search: search.to_owned(),
            status: FilterChoice::parse(status),
            category: FilterChoice::parse(category),
        }
    }

    /// Returns `true` if no condition is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.status.is_all() && self.category.is_all()
    }

    /// Clear every condition.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Evaluate the predicate for one record.
    #[must_use]
    pub fn matches<R: Searchable + ?Sized>(&self, record: &R) -> bool {
        self.matches_search(record) && self.matches_status(record) && self.matches_category(record)
    }

    fn matches_search<R: Searchable + ?Sized>(&self, record: &R) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.to_lowercase();
        record
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    fn matches_status<R: Searchable + ?Sized>(&self, record: &R) -> bool {
        match &self.status {
            FilterChoice::All => true,
            FilterChoice::Only(wanted) => record
                .status_value()
                .is_some_and(|status| status.eq_ignore_ascii_case(wanted)),
        }
    }

    fn matches_category<R: Searchable + ?Sized>(&self, record: &R) -> bool {
        match &self.category {
            FilterChoice::All => true,
            FilterChoice::Only(wanted) => record.category_value() == Some(wanted.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    struct Row {
        name: &'static str,
        code: &'static str,
        status: &'static str,
        category: Option<&'static str>,
    }

    impl Searchable for Row {
        fn search_fields(&self) -> Vec<Cow<'_, str>> {
            let mut fields = vec![Cow::Borrowed(self.name), Cow::Borrowed(self.code)];
            fields.extend(self.category.map(Cow::Borrowed));
            fields
        }

        fn status_value(&self) -> Option<&str> {
            Some(self.status)
        }

        fn category_value(&self) -> Option<&str> {
            self.category
        }
    }

    const WRENCH: Row = Row {
        name: "Torque Wrench",
        code: "TW-100",
        status: "in_stock",
        category: Some("Tools"),
    };

    #[test]
    fn test_choice_parse() {
        assert_eq!(FilterChoice::parse("all"), FilterChoice::All);
        assert_eq!(FilterChoice::parse("All"), FilterChoice::Only("All".to_owned()));
        assert_eq!(FilterChoice::parse(""), FilterChoice::Only(String::new()));
        assert_eq!(
            FilterChoice::parse("Tools"),
            FilterChoice::Only("Tools".to_owned())
        );
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = Filter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&WRENCH));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        assert!(Filter::new("torque", "all", "all").matches(&WRENCH));
        assert!(Filter::new("tw-1", "all", "all").matches(&WRENCH));
        assert!(Filter::new("TOOL", "all", "all").matches(&WRENCH));
        assert!(!Filter::new("hammer", "all", "all").matches(&WRENCH));
    }

    #[test]
    fn test_search_whitespace_is_significant() {
        let bolt_box = Row {
            name: "box",
            code: "BX-1",
            status: "in_stock",
            category: None,
        };
        assert!(!Filter::new("x ", "all", "all").matches(&bolt_box));
        assert!(!Filter::new("   ", "all", "all").matches(&bolt_box));
        assert!(Filter::new("torque ", "all", "all").matches(&WRENCH));
    }

    #[test]
    fn test_status_is_case_insensitive() {
        assert!(Filter::new("", "IN_STOCK", "all").matches(&WRENCH));
        assert!(!Filter::new("", "low_stock", "all").matches(&WRENCH));
    }

    #[test]
    fn test_category_is_exact() {
        assert!(Filter::new("", "all", "Tools").matches(&WRENCH));
        assert!(!Filter::new("", "all", "tools").matches(&WRENCH));
    }

    #[test]
    fn test_uncategorized_never_matches_a_category() {
        let loose = Row {
            category: None,
            ..WRENCH
        };
        assert!(!Filter::new("", "all", "Tools").matches(&loose));
        assert!(Filter::new("", "all", "all").matches(&loose));
    }

    #[test]
    fn test_conditions_are_anded() {
        assert!(Filter::new("wrench", "in_stock", "Tools").matches(&WRENCH));
        assert!(!Filter::new("wrench", "in_stock", "Fasteners").matches(&WRENCH));
        assert!(!Filter::new("bolt", "in_stock", "Tools").matches(&WRENCH));
    }

    #[test]
    fn test_clear() {
        let mut filter = Filter::new("x", "low_stock", "Tools");
        assert!(!filter.is_empty());
        filter.clear();
        assert!(filter.is_empty());
    }
}
