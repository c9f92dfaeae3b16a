//! The structured filter record for auction item listings.

use crate::error::FilterError;
use chrono::NaiveDate;
use serde::Deserialize;

/// Default page size when `limit` is absent.
pub const DEFAULT_LIMIT: i64 = 20;

/// Hard cap on page size; larger requests are clamped, not rejected.
pub const MAX_LIMIT: i64 = 100;

/// Optional-field description of a read query's constraints and pagination.
///
/// Every field is independently optional; absence means "no predicate for
/// this field". Date bounds are inclusive, as are the price bounds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemFilter {
    /// Exact category match.
    #[serde(default)]
    pub category: Option<String>,

    /// Earliest auction date (inclusive), ISO-8601.
    #[serde(default)]
    pub date_from: Option<NaiveDate>,

    /// Latest auction date (inclusive), ISO-8601.
    #[serde(default)]
    pub date_to: Option<NaiveDate>,

    /// Minimum hammer price (inclusive).
    #[serde(default)]
    pub min_price: Option<f64>,

    /// Maximum hammer price (inclusive).
    #[serde(default)]
    pub max_price: Option<f64>,

    /// Page size; defaults to 20, minimum 1, clamped to 100.
    #[serde(default)]
    pub limit: Option<i64>,

    /// Pagination offset; defaults to 0, minimum 0.
    #[serde(default)]
    pub offset: Option<i64>,
}

impl ItemFilter {
    /// Check the stated bounds. An empty filter is valid.
    pub fn validate(&self) -> Result<(), FilterError> {
        if let Some(limit) = self.limit
            && limit < 1
        {
            return Err(FilterError::malformed(
                "limit",
                format!("must be at least 1, got {limit}"),
            ));
        }
        if let Some(offset) = self.offset
            && offset < 0
        {
            return Err(FilterError::malformed(
                "offset",
                format!("must not be negative, got {offset}"),
            ));
        }
        Ok(())
    }

    /// The limit to bind: defaulted when absent, clamped to the cap.
    /// Callers must run [`validate`](Self::validate) first.
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }

    /// The offset to bind: defaulted to 0 when absent.
    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }

    /// Whether any predicate field is present (pagination aside).
    pub fn has_predicates(&self) -> bool {
        self.category.is_some()
            || self.date_from.is_some()
            || self.date_to.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_is_valid_with_defaults() {
        let filter = ItemFilter::default();
        assert!(filter.validate().is_ok());
        assert_eq!(filter.effective_limit(), 20);
        assert_eq!(filter.effective_offset(), 0);
        assert!(!filter.has_predicates());
    }

    #[test]
    fn zero_limit_is_malformed() {
        let filter = ItemFilter {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(
            filter.validate(),
            Err(FilterError::malformed("limit", "must be at least 1, got 0"))
        );
    }

    #[test]
    fn negative_offset_is_malformed() {
        let filter = ItemFilter {
            offset: Some(-5),
            ..Default::default()
        };
        assert!(matches!(
            filter.validate(),
            Err(FilterError::MalformedFilter { field: "offset", .. })
        ));
    }

    #[test]
    fn oversized_limit_is_clamped_not_rejected() {
        let filter = ItemFilter {
            limit: Some(5000),
            ..Default::default()
        };
        assert!(filter.validate().is_ok());
        assert_eq!(filter.effective_limit(), 100);
    }

    #[test]
    fn deserializes_from_tool_arguments() {
        let filter: ItemFilter = serde_json::from_str(
            r#"{"category": "Tractor", "date_from": "2024-01-01", "min_price": 1000, "limit": 10}"#,
        )
        .unwrap();
        assert_eq!(filter.category.as_deref(), Some("Tractor"));
        assert_eq!(
            filter.date_from,
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(filter.min_price, Some(1000.0));
        assert_eq!(filter.limit, Some(10));
        assert_eq!(filter.offset, None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<ItemFilter, _> = serde_json::from_str(r#"{"colour": "red"}"#);
        assert!(result.is_err());
    }
}
