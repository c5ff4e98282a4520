use crate::models::{DbAsset, DbClass, DbClassType};
use eyre::Result;
use sqlx::PgExecutor;

const CLASS_COLUMNS: &str =
    "id, name, description, class_type_id, duration_minutes, capacity, is_active, created_at";

pub async fn create_class_type<'e, E: PgExecutor<'e>>(executor: E, name: &str) -> Result<DbClassType> {
    let class_type = sqlx::query_as::<_, DbClassType>(
        "INSERT INTO class_types (name) VALUES ($1) RETURNING id, name",
    )
    .bind(name)
    .fetch_one(executor)
    .await?;

    Ok(class_type)
}

pub async fn get_class_type_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<DbClassType>> {
    let class_type =
        sqlx::query_as::<_, DbClassType>("SELECT id, name FROM class_types WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

    Ok(class_type)
}

/// Case-insensitive lookup, used to reject duplicate names.
pub async fn get_class_type_by_name<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
) -> Result<Option<DbClassType>> {
    let class_type = sqlx::query_as::<_, DbClassType>(
        "SELECT id, name FROM class_types WHERE LOWER(name) = LOWER($1)",
    )
    .bind(name)
    .fetch_optional(executor)
    .await?;

    Ok(class_type)
}

pub async fn list_class_types<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<DbClassType>> {
    let class_types =
        sqlx::query_as::<_, DbClassType>("SELECT id, name FROM class_types ORDER BY name ASC")
            .fetch_all(executor)
            .await?;

    Ok(class_types)
}

pub async fn create_class<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
    class_type_id: i64,
    duration_minutes: i32,
    capacity: i32,
    is_active: bool,
) -> Result<DbClass> {
    let class = sqlx::query_as::<_, DbClass>(&format!(
        r#"
        INSERT INTO classes (name, class_type_id, duration_minutes, capacity, is_active)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {CLASS_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(class_type_id)
    .bind(duration_minutes)
    .bind(capacity)
    .bind(is_active)
    .fetch_one(executor)
    .await?;

    Ok(class)
}

pub async fn update_class<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    name: &str,
    class_type_id: i64,
    duration_minutes: i32,
    capacity: i32,
    is_active: bool,
) -> Result<Option<DbClass>> {
    let class = sqlx::query_as::<_, DbClass>(&format!(
        r#"
        UPDATE classes
        SET name = $2, class_type_id = $3, duration_minutes = $4, capacity = $5, is_active = $6
        WHERE id = $1
        RETURNING {CLASS_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(class_type_id)
    .bind(duration_minutes)
    .bind(capacity)
    .bind(is_active)
    .fetch_optional(executor)
    .await?;

    Ok(class)
}

pub async fn update_class_description<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    description: Option<&str>,
) -> Result<Option<DbClass>> {
    let class = sqlx::query_as::<_, DbClass>(&format!(
        "UPDATE classes SET description = $2 WHERE id = $1 RETURNING {CLASS_COLUMNS}"
    ))
    .bind(id)
    .bind(description)
    .fetch_optional(executor)
    .await?;

    Ok(class)
}

pub async fn get_class_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<DbClass>> {
    let class = sqlx::query_as::<_, DbClass>(&format!(
        "SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(class)
}

pub async fn list_classes<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<DbClass>> {
    let classes = sqlx::query_as::<_, DbClass>(&format!(
        "SELECT {CLASS_COLUMNS} FROM classes ORDER BY name ASC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(classes)
}

pub async fn list_class_locations<'e, E: PgExecutor<'e>>(
    executor: E,
    class_id: i64,
) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT location_id FROM class_locations WHERE class_id = $1 ORDER BY location_id ASC",
    )
    .bind(class_id)
    .fetch_all(executor)
    .await?;

    Ok(ids)
}

pub async fn clear_class_locations<'e, E: PgExecutor<'e>>(executor: E, class_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM class_locations WHERE class_id = $1")
        .bind(class_id)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn insert_class_locations<'e, E: PgExecutor<'e>>(
    executor: E,
    class_id: i64,
    location_ids: &[i64],
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO class_locations (class_id, location_id)
        SELECT $1, location_id FROM UNNEST($2::BIGINT[]) AS location_id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(class_id)
    .bind(location_ids)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn create_asset<'e, E: PgExecutor<'e>>(
    executor: E,
    class_id: i64,
    name: &str,
    url: &str,
) -> Result<DbAsset> {
    let asset = sqlx::query_as::<_, DbAsset>(
        r#"
        INSERT INTO class_assets (class_id, name, url)
        VALUES ($1, $2, $3)
        RETURNING id, class_id AS owner_id, name, url
        "#,
    )
    .bind(class_id)
    .bind(name)
    .bind(url)
    .fetch_one(executor)
    .await?;

    Ok(asset)
}

pub async fn list_assets<'e, E: PgExecutor<'e>>(executor: E, class_id: i64) -> Result<Vec<DbAsset>> {
    let assets = sqlx::query_as::<_, DbAsset>(
        r#"
        SELECT id, class_id AS owner_id, name, url
        FROM class_assets
        WHERE class_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(class_id)
    .fetch_all(executor)
    .await?;

    Ok(assets)
}

pub async fn delete_asset<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<DbAsset>> {
    let asset = sqlx::query_as::<_, DbAsset>(
        r#"
        DELETE FROM class_assets
        WHERE id = $1
        RETURNING id, class_id AS owner_id, name, url
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(asset)
}
