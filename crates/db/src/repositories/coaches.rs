use crate::models::DbCoach;
use eyre::Result;
use sqlx::PgExecutor;

pub async fn create_coach<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
    bio: Option<&str>,
    image_url: Option<&str>,
) -> Result<DbCoach> {
    let coach = sqlx::query_as::<_, DbCoach>(
        r#"
        INSERT INTO coaches (name, bio, image_url)
        VALUES ($1, $2, $3)
        RETURNING id, name, bio, image_url, created_at
        "#,
    )
    .bind(name)
    .bind(bio)
    .bind(image_url)
    .fetch_one(executor)
    .await?;

    Ok(coach)
}

pub async fn update_coach<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    name: &str,
    bio: Option<&str>,
    image_url: Option<&str>,
) -> Result<Option<DbCoach>> {
    let coach = sqlx::query_as::<_, DbCoach>(
        r#"
        UPDATE coaches
        SET name = $2, bio = $3, image_url = $4
        WHERE id = $1
        RETURNING id, name, bio, image_url, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(bio)
    .bind(image_url)
    .fetch_optional(executor)
    .await?;

    Ok(coach)
}

pub async fn get_coach_by_id<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<DbCoach>> {
    let coach = sqlx::query_as::<_, DbCoach>(
        "SELECT id, name, bio, image_url, created_at FROM coaches WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(coach)
}

pub async fn list_coaches<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<DbCoach>> {
    let coaches = sqlx::query_as::<_, DbCoach>(
        "SELECT id, name, bio, image_url, created_at FROM coaches ORDER BY name ASC",
    )
    .fetch_all(executor)
    .await?;

    Ok(coaches)
}

/// Number of agendas and recurrences the coach is scheduled for.
pub async fn count_assignments<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT (SELECT COUNT(*) FROM agendas WHERE coach_id = $1)
             + (SELECT COUNT(*) FROM agenda_recurrences WHERE coach_id = $1)
        "#,
    )
    .bind(id)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

pub async fn delete_coach<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM coaches WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
