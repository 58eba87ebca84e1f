//! Product Repository

use super::{RepoError, RepoResult};
use crate::utils::query_builder::QueryBuilder;
use shared::models::{Product, ProductDraft};
use sqlx::SqlitePool;
use sqlx::types::Json;

const COLUMNS: &str = "p.id, p.name, p.main_photo, p.photos, p.description, p.price, \
    p.original_price, p.is_promotion, p.is_top_product, p.condition, p.stock, \
    p.subcategory_id, p.extra_attributes";

/// Base FROM clause; `s` is joined so filters can address the owning category
const FROM: &str = "FROM product p JOIN subcategory s ON s.id = p.subcategory_id";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {COLUMNS} {FROM} WHERE p.id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

/// Products directly in the subcategory or anywhere under the category
pub async fn find_in_scope(
    pool: &SqlitePool,
    subcategory_id: Option<i64>,
    category_id: Option<i64>,
) -> RepoResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {COLUMNS} {FROM} WHERE p.subcategory_id = ? OR s.category_id = ? ORDER BY p.id"
    ))
    .bind(subcategory_id)
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

/// Products matching the builder's conditions, ordered by id
pub async fn search(pool: &SqlitePool, filter: &QueryBuilder) -> RepoResult<Vec<Product>> {
    let sql = format!(
        "SELECT {COLUMNS} {FROM}{} ORDER BY p.id",
        filter.build_where_clause()
    );
    let query = filter.apply_bindings_as(sqlx::query_as::<_, Product>(&sql));
    Ok(query.fetch_all(pool).await?)
}

pub async fn create(pool: &SqlitePool, draft: ProductDraft) -> RepoResult<Product> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO product (name, main_photo, photos, description, price, original_price, \
         is_promotion, is_top_product, condition, stock, subcategory_id, extra_attributes) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&draft.name)
    .bind(&draft.main_photo)
    .bind(Json(&draft.photos))
    .bind(&draft.description)
    .bind(draft.price)
    .bind(draft.original_price)
    .bind(draft.is_promotion)
    .bind(draft.is_top_product)
    .bind(draft.condition.label())
    .bind(draft.stock)
    .bind(draft.subcategory_id)
    .bind(Json(&draft.extra_attributes))
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, draft: ProductDraft) -> RepoResult<Product> {
    let rows = sqlx::query(
        "UPDATE product SET name = ?, main_photo = ?, photos = ?, description = ?, price = ?, \
         original_price = ?, is_promotion = ?, is_top_product = ?, condition = ?, stock = ?, \
         subcategory_id = ?, extra_attributes = ? WHERE id = ?",
    )
    .bind(&draft.name)
    .bind(&draft.main_photo)
    .bind(Json(&draft.photos))
    .bind(&draft.description)
    .bind(draft.price)
    .bind(draft.original_price)
    .bind(draft.is_promotion)
    .bind(draft.is_top_product)
    .bind(draft.condition.label())
    .bind(draft.stock)
    .bind(draft.subcategory_id)
    .bind(Json(&draft.extra_attributes))
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound("Product not found".into()));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound("Product not found".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound("Product not found".into()));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{category, subcategory};
    use serde_json::{Map, json};
    use shared::models::{CategoryCreate, ProductCondition, SubcategoryCreate};

    async fn setup() -> (DbService, i64, i64) {
        let db = DbService::in_memory().await.unwrap();
        let cat = category::create(
            &db.pool,
            CategoryCreate {
                name: "Phones".into(),
                image: None,
                attributes: vec![],
            },
        )
        .await
        .unwrap();
        let sub = subcategory::create(
            &db.pool,
            SubcategoryCreate {
                name: "Smartphones".into(),
                category_id: cat.id,
                image: None,
                attributes: vec![],
            },
        )
        .await
        .unwrap();
        (db, cat.id, sub.id)
    }

    fn draft(name: &str, subcategory_id: i64, price: f64) -> ProductDraft {
        let mut extra = Map::new();
        extra.insert("Storage".into(), json!("128GB"));
        ProductDraft {
            name: name.into(),
            main_photo: Some("http://img/main.jpg".into()),
            photos: vec!["http://img/1.jpg".into()],
            description: None,
            price,
            original_price: Some(price + 50.0),
            is_promotion: true,
            is_top_product: false,
            condition: ProductCondition::UsedGood,
            stock: 3,
            subcategory_id,
            extra_attributes: extra,
        }
    }

    #[tokio::test]
    async fn test_create_roundtrips_json_columns() {
        let (db, _, sub) = setup().await;
        let p = create(&db.pool, draft("Pixel", sub, 499.0)).await.unwrap();
        assert_eq!(p.photos, vec!["http://img/1.jpg".to_string()]);
        assert_eq!(p.extra_attributes["Storage"], json!("128GB"));
        assert_eq!(p.condition, ProductCondition::UsedGood);
        assert!(p.is_promotion);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_subcategory() {
        let (db, _, _) = setup().await;
        let err = create(&db.pool, draft("Ghost", 999, 1.0)).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_find_in_scope() {
        let (db, cat, sub) = setup().await;
        create(&db.pool, draft("A", sub, 1.0)).await.unwrap();
        create(&db.pool, draft("B", sub, 2.0)).await.unwrap();
        assert_eq!(find_in_scope(&db.pool, Some(sub), None).await.unwrap().len(), 2);
        assert_eq!(find_in_scope(&db.pool, None, Some(cat)).await.unwrap().len(), 2);
        assert!(find_in_scope(&db.pool, None, Some(cat + 1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (db, _, sub) = setup().await;
        let p = create(&db.pool, draft("A", sub, 1.0)).await.unwrap();
        let mut changed = draft("A2", sub, 9.5);
        changed.condition = ProductCondition::New;
        let updated = update(&db.pool, p.id, changed).await.unwrap();
        assert_eq!(updated.name, "A2");
        assert_eq!(updated.price, 9.5);
        assert_eq!(updated.condition, ProductCondition::New);

        delete(&db.pool, p.id).await.unwrap();
        assert!(find_by_id(&db.pool, p.id).await.unwrap().is_none());
        assert!(matches!(
            delete(&db.pool, p.id).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_search_with_conditions() {
        let (db, _, sub) = setup().await;
        create(&db.pool, draft("Cheap", sub, 10.0)).await.unwrap();
        create(&db.pool, draft("Pricey", sub, 900.0)).await.unwrap();

        let mut filter = QueryBuilder::new();
        filter.add_condition("p.price >= ?").bind_f64(100.0);
        let found = search(&db.pool, &filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Pricey");
    }
}
