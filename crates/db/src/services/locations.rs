use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::WrapErr;
use studio_core::availability::{available_slots, slot_lengths};
use studio_core::errors::{StudioError, StudioResult};
use studio_core::models::location::{
    Asset, FacilityAvailability, FacilityInput, Location, LocationDetail, LocationFacility,
    LocationInput, OperationalHour, StoredFile,
};
use studio_core::services::LocationService;
use tracing::info;

use super::schedule;
use crate::repositories::locations;
use crate::DbPool;

pub struct PgLocationService {
    pool: DbPool,
}

impl PgLocationService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationService for PgLocationService {
    async fn create_location(&self, input: LocationInput) -> StudioResult<Location> {
        let row = locations::create_location(
            &self.pool,
            &input.name,
            &input.address,
            input.phone.as_deref(),
            input.link_maps.as_deref(),
        )
        .await?;
        Ok(row.into())
    }

    async fn update_location(&self, id: i64, input: LocationInput) -> StudioResult<Location> {
        let row = locations::update_location(
            &self.pool,
            id,
            &input.name,
            &input.address,
            input.phone.as_deref(),
            input.link_maps.as_deref(),
        )
        .await?
        .ok_or_else(|| StudioError::not_found("Location", id))?;
        Ok(row.into())
    }

    async fn get_location(&self, id: i64) -> StudioResult<LocationDetail> {
        let location = locations::get_location_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| StudioError::not_found("Location", id))?;
        let facilities = locations::list_facilities(&self.pool, id).await?;
        let hours = locations::get_operational_hours(&self.pool, id).await?;
        let assets = locations::list_assets(&self.pool, id).await?;

        Ok(LocationDetail {
            location: location.into(),
            facilities: facilities.into_iter().map(LocationFacility::from).collect(),
            operational_hours: hours.into_iter().map(OperationalHour::from).collect(),
            assets: assets.into_iter().map(Asset::from).collect(),
        })
    }

    async fn list_locations(&self) -> StudioResult<Vec<Location>> {
        let rows = locations::list_locations(&self.pool).await?;
        Ok(rows.into_iter().map(Location::from).collect())
    }

    async fn set_operational_hours(
        &self,
        location_id: i64,
        hours: Vec<OperationalHour>,
    ) -> StudioResult<Vec<OperationalHour>> {
        if let Some(bad) = hours.iter().find(|h| !h.is_valid()) {
            return Err(StudioError::Validation(format!(
                "Invalid opening on day {}: {} - {}",
                bad.day_of_week, bad.open_time, bad.close_time
            )));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        locations::lock_location(&mut *tx, location_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Location", location_id))?;

        locations::delete_operational_hours(&mut *tx, location_id).await?;
        let mut saved = Vec::with_capacity(hours.len());
        for hour in &hours {
            let row = locations::insert_operational_hour(&mut *tx, location_id, hour).await?;
            saved.push(OperationalHour::from(row));
        }

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        info!(
            "Location {} now has {} opening windows",
            location_id,
            saved.len()
        );
        Ok(saved)
    }

    async fn create_facility(
        &self,
        location_id: i64,
        input: FacilityInput,
    ) -> StudioResult<LocationFacility> {
        if locations::get_location_by_id(&self.pool, location_id)
            .await?
            .is_none()
        {
            return Err(StudioError::not_found("Location", location_id));
        }

        let row =
            locations::create_facility(&self.pool, location_id, &input.name, input.capacity).await?;
        Ok(row.into())
    }

    async fn delete_facility(&self, id: i64) -> StudioResult<()> {
        if locations::get_facility_by_id(&self.pool, id).await?.is_none() {
            return Err(StudioError::not_found("Facility", id));
        }
        if locations::count_facility_agendas(&self.pool, id).await? > 0 {
            return Err(StudioError::Conflict(
                "Facility has agendas and cannot be deleted".to_string(),
            ));
        }
        locations::delete_facility(&self.pool, id).await?;
        Ok(())
    }

    async fn add_location_assets(
        &self,
        location_id: i64,
        files: Vec<StoredFile>,
    ) -> StudioResult<Vec<Asset>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        locations::get_location_by_id(&mut *tx, location_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Location", location_id))?;

        let mut assets = Vec::with_capacity(files.len());
        for file in &files {
            let row = locations::create_asset(&mut *tx, location_id, &file.name, &file.url).await?;
            assets.push(Asset::from(row));
        }

        tx.commit().await.wrap_err("Failed to commit transaction")?;
        Ok(assets)
    }

    async fn delete_asset(&self, asset_id: i64) -> StudioResult<Asset> {
        let row = locations::delete_asset(&self.pool, asset_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Asset", asset_id))?;
        Ok(row.into())
    }

    async fn facility_availability(
        &self,
        facility_id: i64,
        date: NaiveDate,
        duration_minutes: i64,
        step_minutes: i64,
    ) -> StudioResult<FacilityAvailability> {
        let (duration, step) = slot_lengths(duration_minutes, step_minutes)
            .map_err(|message| StudioError::Validation(message.to_string()))?;

        let mut conn = self
            .pool
            .acquire()
            .await
            .wrap_err("Failed to acquire connection")?;

        let facility = locations::get_facility_by_id(&mut *conn, facility_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Facility", facility_id))?;
        let hours = schedule::hours_on(&mut conn, facility.location_id, date).await?;
        let busy = schedule::busy_on(&mut conn, facility_id, date).await?;

        let slots = available_slots(&hours, &busy, duration, step);

        Ok(FacilityAvailability {
            facility_id,
            date,
            duration_minutes,
            slots,
        })
    }
}
