//! Row types as read from PostgreSQL, and their conversion to the domain
//! types of `studio-core`. Text-encoded enums are parsed here so that a bad
//! row surfaces as a database error instead of leaking a raw string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use eyre::{Report, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studio_core::models::{
    agenda::{Agenda, AgendaBooking, AgendaListing, AgendaRecurrence},
    class::{Class, ClassType},
    coach::Coach,
    location::{Asset, Location, LocationFacility, OperationalHour},
    loyalty::{LoyaltyReward, LoyaltyShopItem, LoyaltyTransaction},
    package::{CreditTransaction, Package, PackageTransaction, UserPackage},
    settings::DepositAccount,
    user::User,
    voucher::Voucher,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for User {
    type Error = Report;

    fn try_from(row: DbUser) -> Result<Self> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            role: row.role.parse()?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub token: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCoach {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbCoach> for Coach {
    fn from(row: DbCoach) -> Self {
        Coach {
            id: row.id,
            name: row.name,
            bio: row.bio,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLocation {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub link_maps: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbLocation> for Location {
    fn from(row: DbLocation) -> Self {
        Location {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            link_maps: row.link_maps,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFacility {
    pub id: i64,
    pub location_id: i64,
    pub name: String,
    pub capacity: i32,
}

impl From<DbFacility> for LocationFacility {
    fn from(row: DbFacility) -> Self {
        LocationFacility {
            id: row.id,
            location_id: row.location_id,
            name: row.name,
            capacity: row.capacity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOperationalHour {
    pub location_id: i64,
    pub day_of_week: i16,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
}

impl From<DbOperationalHour> for OperationalHour {
    fn from(row: DbOperationalHour) -> Self {
        OperationalHour {
            day_of_week: row.day_of_week,
            open_time: row.open_time,
            close_time: row.close_time,
        }
    }
}

/// Row of `location_assets` or `class_assets`; `owner_id` is aliased from
/// the owning foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAsset {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub url: String,
}

impl From<DbAsset> for Asset {
    fn from(row: DbAsset) -> Self {
        Asset {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            url: row.url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClassType {
    pub id: i64,
    pub name: String,
}

impl From<DbClassType> for ClassType {
    fn from(row: DbClassType) -> Self {
        ClassType {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClass {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub class_type_id: i64,
    pub duration_minutes: i32,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbClass> for Class {
    fn from(row: DbClass) -> Self {
        Class {
            id: row.id,
            name: row.name,
            description: row.description,
            class_type_id: row.class_type_id,
            duration_minutes: row.duration_minutes,
            capacity: row.capacity,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAgenda {
    pub id: i64,
    pub class_id: i64,
    pub coach_id: i64,
    pub location_facility_id: i64,
    pub starts_at: NaiveDateTime,
    pub recurrence_id: Option<i64>,
    pub is_show: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbAgenda> for Agenda {
    fn from(row: DbAgenda) -> Self {
        Agenda {
            id: row.id,
            class_id: row.class_id,
            coach_id: row.coach_id,
            location_facility_id: row.location_facility_id,
            time: row.starts_at,
            recurrence_id: row.recurrence_id,
            is_show: row.is_show,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAgendaListing {
    pub id: i64,
    pub starts_at: NaiveDateTime,
    pub class_id: i64,
    pub class_name: String,
    pub class_type_id: i64,
    pub duration_minutes: i32,
    pub coach_id: i64,
    pub coach_name: String,
    pub location_facility_id: i64,
    pub facility_name: String,
    pub capacity: i32,
    pub booked: i64,
}

impl From<DbAgendaListing> for AgendaListing {
    fn from(row: DbAgendaListing) -> Self {
        AgendaListing {
            id: row.id,
            time: row.starts_at,
            class_id: row.class_id,
            class_name: row.class_name,
            class_type_id: row.class_type_id,
            duration_minutes: row.duration_minutes,
            coach_id: row.coach_id,
            coach_name: row.coach_name,
            location_facility_id: row.location_facility_id,
            facility_name: row.facility_name,
            capacity: row.capacity,
            booked: row.booked,
        }
    }
}

/// Start and length of a session occupying a facility.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOccupiedSlot {
    pub starts_at: NaiveDateTime,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAgendaRecurrence {
    pub id: i64,
    pub class_id: i64,
    pub coach_id: i64,
    pub location_facility_id: i64,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<DbAgendaRecurrence> for AgendaRecurrence {
    fn from(row: DbAgendaRecurrence) -> Self {
        AgendaRecurrence {
            id: row.id,
            class_id: row.class_id,
            coach_id: row.coach_id,
            location_facility_id: row.location_facility_id,
            day_of_week: row.day_of_week,
            time: row.start_time,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: i64,
    pub agenda_id: i64,
    pub user_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbBooking> for AgendaBooking {
    type Error = Report;

    fn try_from(row: DbBooking) -> Result<Self> {
        Ok(AgendaBooking {
            id: row.id,
            agenda_id: row.agenda_id,
            user_id: row.user_id,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPackage {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub credit: i32,
    pub valid_days: i32,
    pub class_type_id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbPackage> for Package {
    fn from(row: DbPackage) -> Self {
        Package {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            credit: row.credit,
            valid_days: row.valid_days,
            class_type_id: row.class_type_id,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUserPackage {
    pub id: i64,
    pub user_id: i64,
    pub package_id: i64,
    pub class_type_id: i64,
    pub credit: i32,
    pub credit_used: i32,
    pub expired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<DbUserPackage> for UserPackage {
    fn from(row: DbUserPackage) -> Self {
        UserPackage {
            id: row.id,
            user_id: row.user_id,
            package_id: row.package_id,
            class_type_id: row.class_type_id,
            credit: row.credit,
            credit_used: row.credit_used,
            expired_at: row.expired_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPackageTransaction {
    pub id: i64,
    pub user_id: i64,
    pub package_id: i64,
    pub voucher_id: Option<i64>,
    pub deposit_account_id: Option<i64>,
    pub amount: i64,
    pub discount: i64,
    pub total: i64,
    pub status: String,
    pub user_package_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbPackageTransaction> for PackageTransaction {
    type Error = Report;

    fn try_from(row: DbPackageTransaction) -> Result<Self> {
        Ok(PackageTransaction {
            id: row.id,
            user_id: row.user_id,
            package_id: row.package_id,
            voucher_id: row.voucher_id,
            deposit_account_id: row.deposit_account_id,
            amount: row.amount,
            discount: row.discount,
            total: row.total,
            status: row.status.parse()?,
            user_package_id: row.user_package_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCreditTransaction {
    pub id: i64,
    pub user_id: i64,
    pub class_type_id: i64,
    pub kind: String,
    pub amount: i32,
    pub note: Option<String>,
    pub agenda_booking_id: Option<i64>,
    pub user_package_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbCreditTransaction> for CreditTransaction {
    type Error = Report;

    fn try_from(row: DbCreditTransaction) -> Result<Self> {
        Ok(CreditTransaction {
            id: row.id,
            user_id: row.user_id,
            class_type_id: row.class_type_id,
            kind: row.kind.parse()?,
            amount: row.amount,
            note: row.note,
            agenda_booking_id: row.agenda_booking_id,
            user_package_id: row.user_package_id,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbVoucher {
    pub id: i64,
    pub code: String,
    pub kind: String,
    pub amount: i64,
    pub user_id: Option<i64>,
    pub expired_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbVoucher> for Voucher {
    type Error = Report;

    fn try_from(row: DbVoucher) -> Result<Self> {
        Ok(Voucher {
            id: row.id,
            code: row.code,
            kind: row.kind.parse()?,
            amount: row.amount,
            user_id: row.user_id,
            expired_at: row.expired_at,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLoyaltyReward {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub points: i32,
    pub trigger: String,
    pub is_active: bool,
}

impl TryFrom<DbLoyaltyReward> for LoyaltyReward {
    type Error = Report;

    fn try_from(row: DbLoyaltyReward) -> Result<Self> {
        Ok(LoyaltyReward {
            id: row.id,
            name: row.name,
            description: row.description,
            points: row.points,
            trigger: row.trigger.parse()?,
            is_active: row.is_active,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLoyaltyShop {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub stock: Option<i32>,
    pub is_active: bool,
}

impl From<DbLoyaltyShop> for LoyaltyShopItem {
    fn from(row: DbLoyaltyShop) -> Self {
        LoyaltyShopItem {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLoyaltyTransaction {
    pub id: i64,
    pub user_id: i64,
    pub points: i32,
    pub note: Option<String>,
    pub loyalty_reward_id: Option<i64>,
    pub loyalty_shop_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<DbLoyaltyTransaction> for LoyaltyTransaction {
    fn from(row: DbLoyaltyTransaction) -> Self {
        LoyaltyTransaction {
            id: row.id,
            user_id: row.user_id,
            points: row.points,
            note: row.note,
            loyalty_reward_id: row.loyalty_reward_id,
            loyalty_shop_id: row.loyalty_shop_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDepositAccount {
    pub id: i64,
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub is_active: bool,
}

impl From<DbDepositAccount> for DepositAccount {
    fn from(row: DbDepositAccount) -> Self {
        DepositAccount {
            id: row.id,
            bank_name: row.bank_name,
            account_name: row.account_name,
            account_number: row.account_number,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWebSetting {
    pub key: String,
    pub value: String,
}

/// Converts a batch of rows, failing on the first malformed one.
pub fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = Report>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use studio_core::models::agenda::BookingStatus;

    fn booking(status: &str) -> DbBooking {
        DbBooking {
            id: 1,
            agenda_id: 2,
            user_id: 3,
            status: status.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn booking_status_is_parsed() {
        let booking = AgendaBooking::try_from(booking("checked_in")).unwrap();
        assert_eq!(booking.status, BookingStatus::CheckedIn);
    }

    #[test]
    fn unknown_status_is_an_error() {
        let err = AgendaBooking::try_from(booking("lost")).unwrap_err();
        assert!(err.to_string().contains("lost"));
    }

    #[test]
    fn convert_all_stops_at_bad_row() {
        let rows = vec![booking("booked"), booking("nope")];
        assert!(convert_all::<_, AgendaBooking>(rows).is_err());
    }
}
