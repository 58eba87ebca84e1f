//! Category Repository

use super::{RepoError, RepoResult, attribute};
use shared::models::{AttributeScope, Category, CategoryCreate, CategoryUpdate};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, name, image";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

async fn find_by_name(conn: &mut SqliteConnection, name: &str) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category WHERE name = ? LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(conn)
    .await?;
    Ok(category)
}

fn clean_name(name: &str) -> RepoResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RepoError::Validation("Category name is required".into()));
    }
    Ok(name.to_string())
}

/// Create a category together with its category-scoped attributes
pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let name = clean_name(&data.name)?;
    let mut tx = pool.begin().await?;

    if find_by_name(&mut tx, &name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Category '{name}' already exists"
        )));
    }

    let id: i64 = sqlx::query_scalar("INSERT INTO category (name, image) VALUES (?, ?) RETURNING id")
        .bind(&name)
        .bind(&data.image)
        .fetch_one(&mut *tx)
        .await?;

    attribute::sync_scope(&mut tx, AttributeScope::Category(id), &data.attributes).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

/// Replace name and image, and synchronize the attribute set atomically
pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let name = clean_name(&data.name)?;
    let mut tx = pool.begin().await?;

    if let Some(other) = find_by_name(&mut tx, &name).await?
        && other.id != id
    {
        return Err(RepoError::Duplicate(format!(
            "Category '{name}' already exists"
        )));
    }

    let rows = sqlx::query("UPDATE category SET name = ?, image = ? WHERE id = ?")
        .bind(&name)
        .bind(&data.image)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound("Category not found".into()));
    }

    attribute::sync_scope(&mut tx, AttributeScope::Category(id), &data.attributes).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound("Category not found".into()))
}

/// Delete a category; subcategories, their products and all scoped
/// attributes go with it (ON DELETE CASCADE)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound("Category not found".into()));
    }
    Ok(true)
}
