use async_trait::async_trait;
use studio_core::errors::{StudioError, StudioResult};
use studio_core::models::coach::{Coach, CoachInput};
use studio_core::services::CoachService;

use crate::repositories::coaches;
use crate::DbPool;

pub struct PgCoachService {
    pool: DbPool,
}

impl PgCoachService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CoachService for PgCoachService {
    async fn create_coach(&self, input: CoachInput) -> StudioResult<Coach> {
        let row = coaches::create_coach(
            &self.pool,
            &input.name,
            input.bio.as_deref(),
            input.image_url.as_deref(),
        )
        .await?;
        Ok(row.into())
    }

    async fn update_coach(&self, id: i64, input: CoachInput) -> StudioResult<Coach> {
        let row = coaches::update_coach(
            &self.pool,
            id,
            &input.name,
            input.bio.as_deref(),
            input.image_url.as_deref(),
        )
        .await?
        .ok_or_else(|| StudioError::not_found("Coach", id))?;
        Ok(row.into())
    }

    async fn list_coaches(&self) -> StudioResult<Vec<Coach>> {
        let rows = coaches::list_coaches(&self.pool).await?;
        Ok(rows.into_iter().map(Coach::from).collect())
    }

    async fn delete_coach(&self, id: i64) -> StudioResult<()> {
        if coaches::get_coach_by_id(&self.pool, id).await?.is_none() {
            return Err(StudioError::not_found("Coach", id));
        }
        if coaches::count_assignments(&self.pool, id).await? > 0 {
            return Err(StudioError::Conflict(
                "Coach is assigned to agendas and cannot be deleted".to_string(),
            ));
        }
        coaches::delete_coach(&self.pool, id).await?;
        Ok(())
    }
}
