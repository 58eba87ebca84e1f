//! Product write validation
//!
//! Turns a [`ProductInput`] into a [`ProductDraft`] before anything is
//! written. Updates replace every field, except that photos are retained when
//! absent or empty and the extra-attribute map is retained when absent.

use crate::config::UnknownAttributePolicy;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_PHOTOS, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Product, ProductCondition, ProductDraft, ProductInput};
use std::collections::HashSet;

fn check_price(value: f64, field: &str) -> AppResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            format!("{field} must be a non-negative number"),
        )
        .with_detail("field", field));
    }
    Ok(value)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Condition precedence: explicit label, then legacy used flag, then the
/// stored value, then new
fn resolve_condition(input: &ProductInput, existing: Option<&Product>) -> AppResult<ProductCondition> {
    if let Some(label) = input.condition.as_deref().filter(|s| !s.trim().is_empty()) {
        return label.parse().map_err(|e: shared::models::UnknownCondition| {
            AppError::with_message(ErrorCode::ProductInvalidCondition, e.to_string())
                .with_detail("field", "condition")
        });
    }
    if let Some(used) = input.is_used {
        return Ok(ProductCondition::from_legacy_used(used));
    }
    Ok(existing.map(|p| p.condition).unwrap_or_default())
}

pub fn build_draft(input: ProductInput, existing: Option<&Product>) -> AppResult<ProductDraft> {
    let name = input.name.clone().unwrap_or_default();
    validate_required_text(&name, "name", MAX_NAME_LEN)?;
    let price = input.price.ok_or_else(|| AppError::required_field("price"))?;
    let price = check_price(price, "price")?;
    let subcategory_id = input
        .subcategory_id
        .ok_or_else(|| AppError::required_field("subcategory_id"))?;

    let original_price = input
        .original_price
        .map(|p| check_price(p, "original_price"))
        .transpose()?;

    let stock = input.stock.unwrap_or(0);
    if stock < 0 {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidStock,
            "stock must not be negative",
        )
        .with_detail("field", "stock"));
    }

    validate_optional_text(&input.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&input.main_photo, "main_photo", MAX_URL_LEN)?;

    let condition = resolve_condition(&input, existing)?;

    let main_photo = match non_empty(input.main_photo) {
        Some(photo) => Some(photo),
        None => existing.and_then(|p| p.main_photo.clone()),
    };
    let photos = match input.photos.filter(|p| !p.is_empty()) {
        Some(photos) => photos,
        None => existing.map(|p| p.photos.clone()).unwrap_or_default(),
    };
    if photos.len() > MAX_PHOTOS {
        return Err(AppError::validation(format!(
            "too many photos ({}, max {MAX_PHOTOS})",
            photos.len()
        )));
    }
    if let Some(long) = photos.iter().find(|p| p.len() > MAX_URL_LEN) {
        return Err(AppError::validation(format!(
            "photo reference is too long ({} chars, max {MAX_URL_LEN})",
            long.len()
        )));
    }

    let extra_attributes = match input.extra_attributes {
        Some(map) => map,
        None => existing
            .map(|p| p.extra_attributes.clone())
            .unwrap_or_default(),
    };

    Ok(ProductDraft {
        name: name.trim().to_string(),
        main_photo,
        photos,
        description: input.description,
        price,
        original_price,
        is_promotion: input.is_promotion.unwrap_or(false),
        is_top_product: input.is_top_product.unwrap_or(false),
        condition,
        stock,
        subcategory_id,
        extra_attributes,
    })
}

/// Check extra-attribute keys against the attribute names defined for the
/// product's scope
pub fn check_attribute_keys<'a>(
    keys: impl IntoIterator<Item = &'a String>,
    known: &HashSet<String>,
    policy: UnknownAttributePolicy,
) -> AppResult<()> {
    let mut unknown: Vec<&str> = keys
        .into_iter()
        .map(String::as_str)
        .filter(|k| !known.contains(*k))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort_unstable();

    match policy {
        UnknownAttributePolicy::Warn => {
            tracing::warn!(keys = ?unknown, "Product has extra attributes with no definition in scope");
            Ok(())
        }
        UnknownAttributePolicy::Reject => Err(AppError::with_message(
            ErrorCode::AttributeUnknownKey,
            format!("Unknown attribute(s): {}", unknown.join(", ")),
        )
        .with_detail(
            "keys",
            Value::Array(unknown.iter().map(|k| Value::from(*k)).collect()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn input(v: Value) -> ProductInput {
        serde_json::from_value(v).unwrap()
    }

    fn stored() -> Product {
        let mut extra = Map::new();
        extra.insert("Color".into(), json!("Black"));
        Product {
            id: 1,
            name: "Old".into(),
            main_photo: Some("http://img/main.jpg".into()),
            photos: vec!["http://img/1.jpg".into()],
            description: Some("desc".into()),
            price: 10.0,
            original_price: None,
            is_promotion: true,
            is_top_product: false,
            condition: ProductCondition::UsedGood,
            stock: 2,
            subcategory_id: 10,
            extra_attributes: extra,
        }
    }

    #[test]
    fn test_required_fields() {
        let err = build_draft(input(json!({"price": 1, "subcategory_id": 1})), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "name is required");

        let err = build_draft(input(json!({"name": "A", "subcategory_id": 1})), None).unwrap_err();
        assert_eq!(err.message, "price is required");

        let err = build_draft(input(json!({"name": "A", "price": 1})), None).unwrap_err();
        assert_eq!(err.message, "subcategory_id is required");
    }

    #[test]
    fn test_defaults_on_create() {
        let draft = build_draft(
            input(json!({"name": " Pixel ", "price": "499.5", "subcategory_id": 10})),
            None,
        )
        .unwrap();
        assert_eq!(draft.name, "Pixel");
        assert_eq!(draft.price, 499.5);
        assert_eq!(draft.condition, ProductCondition::New);
        assert_eq!(draft.stock, 0);
        assert!(draft.photos.is_empty());
        assert!(draft.extra_attributes.is_empty());
        assert!(!draft.is_promotion);
    }

    #[test]
    fn test_invalid_numbers() {
        let err = build_draft(
            input(json!({"name": "A", "price": -1, "subcategory_id": 1})),
            None,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductInvalidPrice);

        let err = build_draft(
            input(json!({"name": "A", "price": 1, "stock": -3, "subcategory_id": 1})),
            None,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductInvalidStock);
    }

    #[test]
    fn test_condition_precedence() {
        let base = json!({"name": "A", "price": 1, "subcategory_id": 1});

        let mut v = base.clone();
        v["condition"] = json!("D'occasion - Comme neuf");
        v["is_used"] = json!(false);
        assert_eq!(
            build_draft(input(v), None).unwrap().condition,
            ProductCondition::UsedLikeNew
        );

        let mut v = base.clone();
        v["is_used"] = json!("true");
        assert_eq!(
            build_draft(input(v), None).unwrap().condition,
            ProductCondition::UsedFair
        );

        let mut v = base.clone();
        v["condition"] = json!("Broken");
        assert_eq!(
            build_draft(input(v), None).unwrap_err().code,
            ErrorCode::ProductInvalidCondition
        );

        let existing = stored();
        assert_eq!(
            build_draft(input(base), Some(&existing)).unwrap().condition,
            ProductCondition::UsedGood
        );
    }

    #[test]
    fn test_condition_label_is_normalized() {
        let draft = build_draft(
            input(json!({
                "name": "A",
                "price": 1,
                "subcategory_id": 1,
                "condition": "D'occasion - comme neuf"
            })),
            None,
        )
        .unwrap();
        assert_eq!(draft.condition, ProductCondition::UsedLikeNew);
        assert_eq!(
            serde_json::to_value(draft.condition).unwrap(),
            json!("D'occasion - Comme neuf")
        );
    }

    #[test]
    fn test_update_retains_photos_and_attributes() {
        let existing = stored();
        let draft = build_draft(
            input(json!({"name": "New", "price": 20, "subcategory_id": 10, "main_photo": "", "photos": []})),
            Some(&existing),
        )
        .unwrap();
        assert_eq!(draft.main_photo, existing.main_photo);
        assert_eq!(draft.photos, existing.photos);
        assert_eq!(draft.extra_attributes, existing.extra_attributes);
        // full replace elsewhere
        assert_eq!(draft.description, None);
        assert!(!draft.is_promotion);

        let draft = build_draft(
            input(json!({"name": "New", "price": 20, "subcategory_id": 10, "extra_attributes": {}})),
            Some(&existing),
        )
        .unwrap();
        assert!(draft.extra_attributes.is_empty());
    }

    #[test]
    fn test_attribute_key_policy() {
        let known: HashSet<String> = ["Color".to_string()].into();
        let keys = ["Color".to_string(), "Size".to_string()];

        assert!(check_attribute_keys(&keys, &known, UnknownAttributePolicy::Warn).is_ok());
        let err = check_attribute_keys(&keys, &known, UnknownAttributePolicy::Reject).unwrap_err();
        assert_eq!(err.code, ErrorCode::AttributeUnknownKey);
        assert_eq!(err.details.unwrap()["keys"], json!(["Size"]));

        let only_known = ["Color".to_string()];
        assert!(check_attribute_keys(&only_known, &known, UnknownAttributePolicy::Reject).is_ok());
    }
}
