//! PostgreSQL implementations of the `studio-core` service traits.

mod agendas;
mod classes;
mod coaches;
mod locations;
mod loyalty;
mod packages;
mod schedule;
mod settings;
mod users;
mod vouchers;

use std::sync::Arc;

use chrono::Duration;
use studio_core::services::Services;

use crate::DbPool;

pub use agendas::PgAgendaService;
pub use classes::PgClassService;
pub use coaches::PgCoachService;
pub use locations::PgLocationService;
pub use loyalty::PgLoyaltyService;
pub use packages::PgPackageService;
pub use settings::PgSettingsService;
pub use users::PgUserService;
pub use vouchers::PgVoucherService;

/// Builds the full service container over one pool.
pub fn pg_services(pool: DbPool, session_ttl: Duration) -> Services {
    Services {
        users: Arc::new(PgUserService::new(pool.clone(), session_ttl)),
        coaches: Arc::new(PgCoachService::new(pool.clone())),
        locations: Arc::new(PgLocationService::new(pool.clone())),
        classes: Arc::new(PgClassService::new(pool.clone())),
        agendas: Arc::new(PgAgendaService::new(pool.clone())),
        packages: Arc::new(PgPackageService::new(pool.clone())),
        vouchers: Arc::new(PgVoucherService::new(pool.clone())),
        loyalty: Arc::new(PgLoyaltyService::new(pool.clone())),
        settings: Arc::new(PgSettingsService::new(pool)),
    }
}
