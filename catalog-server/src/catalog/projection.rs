//! Product projection: displayability enrichment and image host rewrite

use crate::db::repository::{attribute, subcategory};
use shared::error::AppResult;
use shared::models::{
    Attribute, AttributeScope, AttributeValue, Category, Product, ProductView, Subcategory,
};
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashMap};

/// Plain substring substitution on image references
///
/// Disabled unless both hosts are configured.
#[derive(Debug, Clone, Default)]
pub struct ImageHostRewrite {
    rule: Option<(String, String)>,
}

impl ImageHostRewrite {
    pub fn new(from: Option<String>, to: Option<String>) -> Self {
        match (from, to) {
            (Some(from), Some(to)) if !from.is_empty() => Self {
                rule: Some((from, to)),
            },
            _ => Self::default(),
        }
    }

    pub fn apply(&self, url: &str) -> String {
        match &self.rule {
            Some((from, to)) => url.replace(from.as_str(), to),
            None => url.to_string(),
        }
    }

    fn apply_opt(&self, url: Option<String>) -> Option<String> {
        url.map(|u| self.apply(&u))
    }

    pub fn category(&self, mut category: Category) -> Category {
        category.image = self.apply_opt(category.image);
        category
    }

    pub fn subcategory(&self, mut sub: Subcategory) -> Subcategory {
        sub.image = self.apply_opt(sub.image);
        sub
    }
}

/// Attribute displayability by name, per subcategory
///
/// A name resolves within the product's subcategory first, then within that
/// subcategory's category. Within a scope the lowest id wins.
#[derive(Debug, Default)]
pub struct DisplayLookup {
    subcategory_category: HashMap<i64, i64>,
    by_subcategory: HashMap<(i64, String), bool>,
    by_category: HashMap<(i64, String), bool>,
}

impl DisplayLookup {
    pub fn new(subcategories: &[Subcategory], attributes: &[Attribute]) -> Self {
        let mut lookup = Self {
            subcategory_category: subcategories.iter().map(|s| (s.id, s.category_id)).collect(),
            ..Self::default()
        };

        let mut sorted: Vec<&Attribute> = attributes.iter().collect();
        sorted.sort_by_key(|a| a.id);
        for attr in sorted {
            let table = match attr.scope() {
                Some(AttributeScope::Subcategory(id)) => {
                    lookup.by_subcategory.entry((id, attr.name.clone()))
                }
                Some(AttributeScope::Category(id)) => {
                    lookup.by_category.entry((id, attr.name.clone()))
                }
                None => continue,
            };
            table.or_insert(attr.is_displayable);
        }
        lookup
    }

    /// Unknown names are not displayable
    pub fn is_displayable(&self, subcategory_id: i64, name: &str) -> bool {
        let key = (subcategory_id, name.to_string());
        if let Some(flag) = self.by_subcategory.get(&key) {
            return *flag;
        }
        self.subcategory_category
            .get(&subcategory_id)
            .and_then(|cat| self.by_category.get(&(*cat, key.1)))
            .copied()
            .unwrap_or(false)
    }
}

pub fn project(product: Product, lookup: &DisplayLookup, rewrite: &ImageHostRewrite) -> ProductView {
    let extra_attributes: BTreeMap<String, AttributeValue> = product
        .extra_attributes
        .into_iter()
        .map(|(name, value)| {
            let is_displayable = lookup.is_displayable(product.subcategory_id, &name);
            (
                name,
                AttributeValue {
                    value,
                    is_displayable,
                },
            )
        })
        .collect();

    ProductView {
        id: product.id,
        name: product.name,
        main_photo: rewrite.apply_opt(product.main_photo),
        photos: product.photos.iter().map(|p| rewrite.apply(p)).collect(),
        description: product.description,
        price: product.price,
        original_price: product.original_price,
        is_promotion: product.is_promotion,
        is_top_product: product.is_top_product,
        is_used: product.condition.is_used(),
        condition: product.condition,
        stock: product.stock,
        subcategory_id: product.subcategory_id,
        extra_attributes,
    }
}

/// Project a batch with two lookups regardless of its size
pub async fn project_all(
    pool: &SqlitePool,
    products: Vec<Product>,
    rewrite: &ImageHostRewrite,
) -> AppResult<Vec<ProductView>> {
    if products.is_empty() {
        return Ok(Vec::new());
    }

    let mut sub_ids: Vec<i64> = products.iter().map(|p| p.subcategory_id).collect();
    sub_ids.sort_unstable();
    sub_ids.dedup();

    let subcategories = subcategory::find_by_ids(pool, &sub_ids).await?;
    let mut cat_ids: Vec<i64> = subcategories.iter().map(|s| s.category_id).collect();
    cat_ids.sort_unstable();
    cat_ids.dedup();

    let attributes = attribute::find_for_scopes(pool, &sub_ids, &cat_ids).await?;
    let lookup = DisplayLookup::new(&subcategories, &attributes);

    Ok(products
        .into_iter()
        .map(|p| project(p, &lookup, rewrite))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};
    use shared::models::ProductCondition;

    fn attr(id: i64, name: &str, cat: Option<i64>, sub: Option<i64>, shown: bool) -> Attribute {
        Attribute {
            id,
            name: name.into(),
            category_id: cat,
            subcategory_id: sub,
            is_displayable: shown,
        }
    }

    fn sub(id: i64, category_id: i64) -> Subcategory {
        Subcategory {
            id,
            name: format!("sub{id}"),
            category_id,
            image: None,
        }
    }

    #[test]
    fn test_subcategory_scope_wins_over_category() {
        let lookup = DisplayLookup::new(
            &[sub(10, 1), sub(20, 2)],
            &[
                attr(1, "Color", Some(1), None, true),
                attr(2, "Color", None, Some(10), false),
                attr(3, "Storage", Some(2), None, true),
            ],
        );
        assert!(!lookup.is_displayable(10, "Color"));
        // other category's attribute never leaks in
        assert!(!lookup.is_displayable(10, "Storage"));
        assert!(lookup.is_displayable(20, "Storage"));
        assert!(!lookup.is_displayable(20, "Color"));
        assert!(!lookup.is_displayable(10, "Unknown"));
    }

    #[test]
    fn test_category_fallback_lowest_id_wins() {
        let lookup = DisplayLookup::new(
            &[sub(10, 1)],
            &[
                attr(7, "Color", Some(1), None, false),
                attr(4, "Color", Some(1), None, true),
            ],
        );
        assert!(lookup.is_displayable(10, "Color"));
    }

    #[test]
    fn test_unscoped_attribute_is_ignored() {
        let lookup = DisplayLookup::new(
            &[sub(10, 1)],
            &[
                attr(1, "Color", None, None, true),
                attr(2, "Color", Some(1), Some(10), true),
            ],
        );
        assert!(!lookup.is_displayable(10, "Color"));
    }

    #[test]
    fn test_image_rewrite() {
        let rewrite = ImageHostRewrite::new(Some("localhost".into()), Some("cdn.example".into()));
        assert_eq!(
            rewrite.apply("http://localhost:5000/uploads/a.jpg"),
            "http://cdn.example:5000/uploads/a.jpg"
        );
        let off = ImageHostRewrite::new(Some("localhost".into()), None);
        assert_eq!(off.apply("http://localhost/a.jpg"), "http://localhost/a.jpg");
    }

    #[test]
    fn test_project() {
        let mut extra = Map::new();
        extra.insert("Color".into(), json!("White"));
        extra.insert("Notes".into(), json!("x"));
        let product = Product {
            id: 2,
            name: "P2".into(),
            main_photo: Some("http://localhost/m.jpg".into()),
            photos: vec!["http://localhost/1.jpg".into()],
            description: None,
            price: 900.0,
            original_price: None,
            is_promotion: false,
            is_top_product: false,
            condition: ProductCondition::UsedExcellent,
            stock: 1,
            subcategory_id: 10,
            extra_attributes: extra,
        };
        let lookup = DisplayLookup::new(&[sub(10, 1)], &[attr(1, "Color", Some(1), None, true)]);
        let rewrite = ImageHostRewrite::new(Some("localhost".into()), Some("img.shop".into()));

        let view = project(product, &lookup, &rewrite);
        assert_eq!(view.main_photo.as_deref(), Some("http://img.shop/m.jpg"));
        assert_eq!(view.photos, vec!["http://img.shop/1.jpg".to_string()]);
        assert!(view.is_used);
        assert_eq!(
            view.extra_attributes["Color"],
            AttributeValue {
                value: json!("White"),
                is_displayable: true
            }
        );
        assert!(!view.extra_attributes["Notes"].is_displayable);
    }
}
