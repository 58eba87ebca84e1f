//! Product listing query
//!
//! Conditions are pushed in a fixed order: scope, price range, flags, then
//! one EXISTS clause per attribute filter. All of them are ANDed.

use super::filter::{ProductFilters, parse_filters};
use crate::config::FilterMode;
use crate::utils::query_builder::QueryBuilder;
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::ProductCondition;

/// Raw `GET /products` query string; every value arrives as text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub subcategory_id: Option<String>,
    pub category_id: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub filters: Option<String>,
}

/// Validated listing query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub subcategory_id: Option<i64>,
    pub category_id: Option<i64>,
    /// Inclusive; `None` leaves that side open
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub filters: ProductFilters,
}

/// Extra-attribute value as text: JSON booleans spell `true`/`false`,
/// other scalars use SQLite's text cast
const ATTRIBUTE_TEXT: &str = "CASE je.type WHEN 'true' THEN 'true' WHEN 'false' THEN 'false' \
     ELSE CAST(je.value AS TEXT) END";

fn non_blank(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_id(raw: &Option<String>, field: &str) -> AppResult<Option<i64>> {
    non_blank(raw)
        .map(|s| {
            s.parse::<i64>().map_err(|_| {
                AppError::invalid_request(format!("{field} must be an integer"))
                    .with_detail("field", field)
            })
        })
        .transpose()
}

pub fn parse_price_bound(raw: &Option<String>, field: &str) -> AppResult<Option<f64>> {
    non_blank(raw)
        .map(|s| match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(
                AppError::with_message(ErrorCode::PriceBoundInvalid, format!("{field} is not a number"))
                    .with_detail("field", field),
            ),
        })
        .transpose()
}

impl ProductQuery {
    pub fn parse(params: &ListingParams, mode: FilterMode) -> AppResult<Self> {
        Ok(Self {
            subcategory_id: parse_id(&params.subcategory_id, "subcategory_id")?,
            category_id: parse_id(&params.category_id, "category_id")?,
            price_min: parse_price_bound(&params.price_min, "price_min")?,
            price_max: parse_price_bound(&params.price_max, "price_max")?,
            filters: parse_filters(params.filters.as_deref(), mode)?,
        })
    }

    /// WHERE conditions over `product p JOIN subcategory s`
    pub fn to_builder(&self) -> QueryBuilder {
        let mut qb = QueryBuilder::new();

        // (1) scope
        if let Some(id) = self.subcategory_id {
            qb.add_condition("p.subcategory_id = ?").bind_i64(id);
        }
        if let Some(id) = self.category_id {
            qb.add_condition("s.category_id = ?").bind_i64(id);
        }

        // (2) price range
        if let Some(min) = self.price_min {
            qb.add_condition("p.price >= ?").bind_f64(min);
        }
        if let Some(max) = self.price_max {
            qb.add_condition("p.price <= ?").bind_f64(max);
        }

        // (3) flags
        let filters = &self.filters;
        if let Some(flag) = filters.is_promotion {
            qb.add_condition("p.is_promotion = ?").bind_i64(i64::from(flag));
        }
        if let Some(conditions) = &filters.conditions {
            qb.add_in_condition("p.condition", conditions.iter().map(|c| c.label()));
        }
        if let Some(used) = filters.is_used {
            let op = if used { "<>" } else { "=" };
            qb.add_condition(&format!("p.condition {op} ?"))
                .bind_text(ProductCondition::New.label());
        }

        // (4) attributes
        for attr in &filters.attributes {
            if attr.candidates.is_empty() {
                qb.add_condition("1 = 0");
                continue;
            }
            qb.add_condition(&format!(
                "EXISTS (SELECT 1 FROM json_each(p.extra_attributes) je \
                 WHERE je.key = ? AND ({ATTRIBUTE_TEXT}) IN ({}))",
                crate::utils::query_builder::placeholders(attr.candidates.len())
            ))
            .bind_text(attr.key.as_str());
            for candidate in &attr.candidates {
                qb.bind_text(candidate.as_str());
            }
        }

        qb
    }
}
