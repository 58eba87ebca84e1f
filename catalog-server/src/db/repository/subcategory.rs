//! Subcategory Repository

use super::{RepoError, RepoResult, attribute};
use crate::utils::query_builder::placeholders;
use shared::models::{AttributeScope, Subcategory, SubcategoryCreate, SubcategoryUpdate};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, name, category_id, image";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Subcategory>> {
    let subs = sqlx::query_as::<_, Subcategory>(&format!(
        "SELECT {COLUMNS} FROM subcategory ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(subs)
}

pub async fn find_by_category(pool: &SqlitePool, category_id: i64) -> RepoResult<Vec<Subcategory>> {
    let subs = sqlx::query_as::<_, Subcategory>(&format!(
        "SELECT {COLUMNS} FROM subcategory WHERE category_id = ? ORDER BY id"
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(subs)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Subcategory>> {
    let sub = sqlx::query_as::<_, Subcategory>(&format!(
        "SELECT {COLUMNS} FROM subcategory WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(sub)
}

pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Subcategory>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let sql = format!(
        "SELECT {COLUMNS} FROM subcategory WHERE id IN ({}) ORDER BY id",
        placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, Subcategory>(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    Ok(query.fetch_all(pool).await?)
}

async fn find_in_tx(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Subcategory>> {
    let sub = sqlx::query_as::<_, Subcategory>(&format!(
        "SELECT {COLUMNS} FROM subcategory WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(sub)
}

async fn ensure_category(conn: &mut SqliteConnection, category_id: i64) -> RepoResult<()> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM category WHERE id = ?")
        .bind(category_id)
        .fetch_optional(conn)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(RepoError::NotFound("Category not found".into())),
    }
}

fn clean_name(name: &str) -> RepoResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RepoError::Validation("Subcategory name is required".into()));
    }
    Ok(name.to_string())
}

fn duplicate(name: &str) -> RepoError {
    RepoError::Duplicate(format!(
        "Subcategory '{name}' already exists in this category"
    ))
}

/// Create a subcategory under an existing category, with its attributes
pub async fn create(pool: &SqlitePool, data: SubcategoryCreate) -> RepoResult<Subcategory> {
    let name = clean_name(&data.name)?;
    let mut tx = pool.begin().await?;
    ensure_category(&mut tx, data.category_id).await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO subcategory (name, category_id, image) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(&name)
    .bind(data.category_id)
    .bind(&data.image)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => duplicate(&name),
        other => other,
    })?;

    attribute::sync_scope(&mut tx, AttributeScope::Subcategory(id), &data.attributes).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create subcategory".into()))
}

/// Update a subcategory; the stored image is kept when none is supplied
pub async fn update(pool: &SqlitePool, id: i64, data: SubcategoryUpdate) -> RepoResult<Subcategory> {
    let name = clean_name(&data.name)?;
    let mut tx = pool.begin().await?;

    let existing = find_in_tx(&mut tx, id)
        .await?
        .ok_or_else(|| RepoError::NotFound("Subcategory not found".into()))?;
    ensure_category(&mut tx, data.category_id).await?;

    let image = data
        .image
        .filter(|img| !img.trim().is_empty())
        .or(existing.image);

    sqlx::query("UPDATE subcategory SET name = ?, category_id = ?, image = ? WHERE id = ?")
        .bind(&name)
        .bind(data.category_id)
        .bind(&image)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| match RepoError::from(e) {
            RepoError::Duplicate(_) => duplicate(&name),
            other => other,
        })?;

    attribute::sync_scope(&mut tx, AttributeScope::Subcategory(id), &data.attributes).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound("Subcategory not found".into()))
}

/// Delete a subcategory along with its products and attributes
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM subcategory WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound("Subcategory not found".into()));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::category;
    use shared::models::CategoryCreate;

    async fn with_category() -> (DbService, i64) {
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
        (db, cat.id)
    }

    fn payload(name: &str, category_id: i64, image: Option<&str>) -> SubcategoryCreate {
        SubcategoryCreate {
            name: name.into(),
            category_id,
            image: image.map(Into::into),
            attributes: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_requires_category() {
        let (db, _) = with_category().await;
        let err = create(&db.pool, payload("Smartphones", 999, None))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(ref m) if m == "Category not found"));
    }

    #[tokio::test]
    async fn test_duplicate_name_within_category() {
        let (db, cat) = with_category().await;
        create(&db.pool, payload("Smartphones", cat, None)).await.unwrap();
        let err = create(&db.pool, payload("Smartphones", cat, None))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_image_when_absent() {
        let (db, cat) = with_category().await;
        let sub = create(&db.pool, payload("Smartphones", cat, Some("http://img/s.png")))
            .await
            .unwrap();

        let updated = update(
            &db.pool,
            sub.id,
            SubcategoryUpdate {
                name: "Phones & More".into(),
                category_id: cat,
                image: Some(String::new()),
                attributes: vec![],
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Phones & More");
        assert_eq!(updated.image.as_deref(), Some("http://img/s.png"));
    }

    #[tokio::test]
    async fn test_category_delete_cascades() {
        let (db, cat) = with_category().await;
        let sub = create(&db.pool, payload("Smartphones", cat, None)).await.unwrap();
        category::delete(&db.pool, cat).await.unwrap();
        assert!(find_by_id(&db.pool, sub.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_ids() {
        let (db, cat) = with_category().await;
        let a = create(&db.pool, payload("A", cat, None)).await.unwrap();
        let b = create(&db.pool, payload("B", cat, None)).await.unwrap();
        let found = find_by_ids(&db.pool, &[b.id, a.id, 777]).await.unwrap();
        assert_eq!(found, vec![a, b]);
        assert!(find_by_ids(&db.pool, &[]).await.unwrap().is_empty());
        assert_eq!(find_by_category(&db.pool, cat).await.unwrap().len(), 2);
    }
}
