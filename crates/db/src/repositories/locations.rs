use crate::models::{DbAsset, DbFacility, DbLocation, DbOperationalHour};
use eyre::Result;
use sqlx::PgExecutor;
use studio_core::models::location::OperationalHour;

const LOCATION_COLUMNS: &str = "id, name, address, phone, link_maps, created_at";

pub async fn create_location<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
    address: &str,
    phone: Option<&str>,
    link_maps: Option<&str>,
) -> Result<DbLocation> {
    let location = sqlx::query_as::<_, DbLocation>(&format!(
        r#"
        INSERT INTO locations (name, address, phone, link_maps)
        VALUES ($1, $2, $3, $4)
        RETURNING {LOCATION_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(address)
    .bind(phone)
    .bind(link_maps)
    .fetch_one(executor)
    .await?;

    Ok(location)
}

pub async fn update_location<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    name: &str,
    address: &str,
    phone: Option<&str>,
    link_maps: Option<&str>,
) -> Result<Option<DbLocation>> {
    let location = sqlx::query_as::<_, DbLocation>(&format!(
        r#"
        UPDATE locations
        SET name = $2, address = $3, phone = $4, link_maps = $5
        WHERE id = $1
        RETURNING {LOCATION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(address)
    .bind(phone)
    .bind(link_maps)
    .fetch_optional(executor)
    .await?;

    Ok(location)
}

pub async fn get_location_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<DbLocation>> {
    let location = sqlx::query_as::<_, DbLocation>(&format!(
        "SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(location)
}

/// Locks the location row so that concurrent schedule replacements queue up.
pub async fn lock_location<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<DbLocation>> {
    let location = sqlx::query_as::<_, DbLocation>(&format!(
        "SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(location)
}

pub async fn list_locations<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<DbLocation>> {
    let locations = sqlx::query_as::<_, DbLocation>(&format!(
        "SELECT {LOCATION_COLUMNS} FROM locations ORDER BY name ASC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(locations)
}

/// Returns how many of `ids` exist.
pub async fn count_locations<'e, E: PgExecutor<'e>>(executor: E, ids: &[i64]) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM locations WHERE id = ANY($1)")
        .bind(ids)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

pub async fn get_operational_hours<'e, E: PgExecutor<'e>>(
    executor: E,
    location_id: i64,
) -> Result<Vec<DbOperationalHour>> {
    let hours = sqlx::query_as::<_, DbOperationalHour>(
        r#"
        SELECT location_id, day_of_week, open_time, close_time
        FROM location_operational_hours
        WHERE location_id = $1
        ORDER BY day_of_week ASC, open_time ASC
        "#,
    )
    .bind(location_id)
    .fetch_all(executor)
    .await?;

    Ok(hours)
}

pub async fn delete_operational_hours<'e, E: PgExecutor<'e>>(
    executor: E,
    location_id: i64,
) -> Result<u64> {
    let result = sqlx::query("DELETE FROM location_operational_hours WHERE location_id = $1")
        .bind(location_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

pub async fn insert_operational_hour<'e, E: PgExecutor<'e>>(
    executor: E,
    location_id: i64,
    hour: &OperationalHour,
) -> Result<DbOperationalHour> {
    let row = sqlx::query_as::<_, DbOperationalHour>(
        r#"
        INSERT INTO location_operational_hours (location_id, day_of_week, open_time, close_time)
        VALUES ($1, $2, $3, $4)
        RETURNING location_id, day_of_week, open_time, close_time
        "#,
    )
    .bind(location_id)
    .bind(hour.day_of_week)
    .bind(hour.open_time)
    .bind(hour.close_time)
    .fetch_one(executor)
    .await?;

    Ok(row)
}

pub async fn create_facility<'e, E: PgExecutor<'e>>(
    executor: E,
    location_id: i64,
    name: &str,
    capacity: i32,
) -> Result<DbFacility> {
    let facility = sqlx::query_as::<_, DbFacility>(
        r#"
        INSERT INTO location_facilities (location_id, name, capacity)
        VALUES ($1, $2, $3)
        RETURNING id, location_id, name, capacity
        "#,
    )
    .bind(location_id)
    .bind(name)
    .bind(capacity)
    .fetch_one(executor)
    .await?;

    Ok(facility)
}

pub async fn get_facility_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<DbFacility>> {
    let facility = sqlx::query_as::<_, DbFacility>(
        "SELECT id, location_id, name, capacity FROM location_facilities WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(facility)
}

/// Locks the facility row; agenda writers take this lock before checking
/// for clashes.
pub async fn lock_facility<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<DbFacility>> {
    let facility = sqlx::query_as::<_, DbFacility>(
        "SELECT id, location_id, name, capacity FROM location_facilities WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(facility)
}

pub async fn list_facilities<'e, E: PgExecutor<'e>>(
    executor: E,
    location_id: i64,
) -> Result<Vec<DbFacility>> {
    let facilities = sqlx::query_as::<_, DbFacility>(
        r#"
        SELECT id, location_id, name, capacity
        FROM location_facilities
        WHERE location_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(location_id)
    .fetch_all(executor)
    .await?;

    Ok(facilities)
}

pub async fn count_facility_agendas<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT (SELECT COUNT(*) FROM agendas WHERE location_facility_id = $1)
             + (SELECT COUNT(*) FROM agenda_recurrences WHERE location_facility_id = $1)
        "#,
    )
    .bind(id)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

pub async fn delete_facility<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM location_facilities WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn create_asset<'e, E: PgExecutor<'e>>(
    executor: E,
    location_id: i64,
    name: &str,
    url: &str,
) -> Result<DbAsset> {
    let asset = sqlx::query_as::<_, DbAsset>(
        r#"
        INSERT INTO location_assets (location_id, name, url)
        VALUES ($1, $2, $3)
        RETURNING id, location_id AS owner_id, name, url
        "#,
    )
    .bind(location_id)
    .bind(name)
    .bind(url)
    .fetch_one(executor)
    .await?;

    Ok(asset)
}

pub async fn list_assets<'e, E: PgExecutor<'e>>(
    executor: E,
    location_id: i64,
) -> Result<Vec<DbAsset>> {
    let assets = sqlx::query_as::<_, DbAsset>(
        r#"
        SELECT id, location_id AS owner_id, name, url
        FROM location_assets
        WHERE location_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(location_id)
    .fetch_all(executor)
    .await?;

    Ok(assets)
}

/// Deletes the asset row and returns it, so the caller can remove the file.
pub async fn delete_asset<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<DbAsset>> {
    let asset = sqlx::query_as::<_, DbAsset>(
        r#"
        DELETE FROM location_assets
        WHERE id = $1
        RETURNING id, location_id AS owner_id, name, url
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(asset)
}
