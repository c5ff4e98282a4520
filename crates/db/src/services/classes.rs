use async_trait::async_trait;
use eyre::WrapErr;
use sqlx::PgConnection;
use studio_core::errors::{StudioError, StudioResult};
use studio_core::models::class::{Class, ClassDetail, ClassDetailInput, ClassInput, ClassType};
use studio_core::models::location::{Asset, StoredFile};
use studio_core::services::ClassService;

use crate::repositories::{classes, locations};
use crate::DbPool;

pub struct PgClassService {
    pool: DbPool,
}

impl PgClassService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn require_class_type(&self, id: i64) -> StudioResult<()> {
        classes::get_class_type_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| StudioError::not_found("Class type", id))?;
        Ok(())
    }
}

async fn load_detail(conn: &mut PgConnection, id: i64) -> StudioResult<ClassDetail> {
    let class = classes::get_class_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| StudioError::not_found("Class", id))?;
    let class_type = classes::get_class_type_by_id(&mut *conn, class.class_type_id)
        .await?
        .ok_or_else(|| StudioError::not_found("Class type", class.class_type_id))?;
    let location_ids = classes::list_class_locations(&mut *conn, id).await?;
    let assets = classes::list_assets(&mut *conn, id).await?;

    Ok(ClassDetail {
        class: class.into(),
        class_type: class_type.into(),
        location_ids,
        assets: assets.into_iter().map(Asset::from).collect(),
    })
}

#[async_trait]
impl ClassService for PgClassService {
    async fn create_class_type(&self, name: String) -> StudioResult<ClassType> {
        if classes::get_class_type_by_name(&self.pool, &name)
            .await?
            .is_some()
        {
            return Err(StudioError::Conflict(format!(
                "Class type {} already exists",
                name
            )));
        }
        let row = classes::create_class_type(&self.pool, &name).await?;
        Ok(row.into())
    }

    async fn list_class_types(&self) -> StudioResult<Vec<ClassType>> {
        let rows = classes::list_class_types(&self.pool).await?;
        Ok(rows.into_iter().map(ClassType::from).collect())
    }

    async fn create_class(&self, input: ClassInput) -> StudioResult<Class> {
        self.require_class_type(input.class_type_id).await?;
        let row = classes::create_class(
            &self.pool,
            &input.name,
            input.class_type_id,
            input.duration_minutes,
            input.capacity,
            input.is_active,
        )
        .await?;
        Ok(row.into())
    }

    async fn update_class(&self, id: i64, input: ClassInput) -> StudioResult<Class> {
        self.require_class_type(input.class_type_id).await?;
        let row = classes::update_class(
            &self.pool,
            id,
            &input.name,
            input.class_type_id,
            input.duration_minutes,
            input.capacity,
            input.is_active,
        )
        .await?
        .ok_or_else(|| StudioError::not_found("Class", id))?;
        Ok(row.into())
    }

    async fn update_class_detail(
        &self,
        id: i64,
        input: ClassDetailInput,
    ) -> StudioResult<ClassDetail> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        classes::update_class_description(&mut *tx, id, input.description.as_deref())
            .await?
            .ok_or_else(|| StudioError::not_found("Class", id))?;

        let known = locations::count_locations(&mut *tx, &input.location_ids).await?;
        if known != input.location_ids.len() as i64 {
            return Err(StudioError::Validation(
                "One or more locations do not exist".to_string(),
            ));
        }

        classes::clear_class_locations(&mut *tx, id).await?;
        classes::insert_class_locations(&mut *tx, id, &input.location_ids).await?;
        let detail = load_detail(&mut tx, id).await?;

        tx.commit().await.wrap_err("Failed to commit transaction")?;
        Ok(detail)
    }

    async fn get_class(&self, id: i64) -> StudioResult<ClassDetail> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .wrap_err("Failed to acquire connection")?;
        load_detail(&mut conn, id).await
    }

    async fn list_classes(&self) -> StudioResult<Vec<Class>> {
        let rows = classes::list_classes(&self.pool).await?;
        Ok(rows.into_iter().map(Class::from).collect())
    }

    async fn add_class_assets(
        &self,
        class_id: i64,
        files: Vec<StoredFile>,
    ) -> StudioResult<Vec<Asset>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        classes::get_class_by_id(&mut *tx, class_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Class", class_id))?;

        let mut assets = Vec::with_capacity(files.len());
        for file in &files {
            let row = classes::create_asset(&mut *tx, class_id, &file.name, &file.url).await?;
            assets.push(Asset::from(row));
        }

        tx.commit().await.wrap_err("Failed to commit transaction")?;
        Ok(assets)
    }

    async fn delete_class_asset(&self, asset_id: i64) -> StudioResult<Asset> {
        let row = classes::delete_asset(&self.pool, asset_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Asset", asset_id))?;
        Ok(row.into())
    }
}
