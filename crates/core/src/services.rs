//! # Service Traits
//!
//! The API layer never talks to the database directly; it resolves one of
//! these services from its container and forwards validated input. The
//! PostgreSQL implementations live in `studio-db`, and tests substitute mocks.
//!
//! Every operation returns [`StudioResult`] so that handlers can map
//! failures uniformly.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::StudioResult;
use crate::models::{
    agenda::{
        Agenda, AgendaBooking, AgendaInput, AgendaListing, AgendaRecurrence,
        AgendaRecurrenceInput, RecurrenceResult,
    },
    class::{Class, ClassDetail, ClassDetailInput, ClassInput, ClassType},
    coach::{Coach, CoachInput},
    location::{
        Asset, FacilityAvailability, FacilityInput, Location, LocationDetail, LocationFacility,
        LocationInput, OperationalHour, StoredFile,
    },
    loyalty::{
        LoyaltyBalance, LoyaltyReward, LoyaltyRewardInput, LoyaltyShopInput, LoyaltyShopItem,
        LoyaltyTransaction,
    },
    package::{
        CreditBalance, CreditTransaction, Package, PackageInput, PackageTransaction,
        PurchaseRequest, UserPackage, UserPackageUpdate,
    },
    settings::{DepositAccount, DepositAccountInput, WebSettings},
    user::{Credentials, NewUser, Session, User, UserUpdate},
    voucher::{Voucher, VoucherInput},
};
use crate::pricing::PriceBreakdown;

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, user: NewUser) -> StudioResult<User>;
    async fn update_user(&self, id: i64, update: UserUpdate) -> StudioResult<User>;
    async fn get_user(&self, id: i64) -> StudioResult<User>;
    async fn list_users(&self) -> StudioResult<Vec<User>>;
    async fn login(&self, credentials: Credentials) -> StudioResult<Session>;
    /// Resolves a bearer token to its user; expired or unknown tokens fail
    /// with `Authentication`.
    async fn authenticate(&self, token: &str) -> StudioResult<User>;
    async fn logout(&self, token: &str) -> StudioResult<()>;
}

#[async_trait]
pub trait CoachService: Send + Sync {
    async fn create_coach(&self, input: CoachInput) -> StudioResult<Coach>;
    async fn update_coach(&self, id: i64, input: CoachInput) -> StudioResult<Coach>;
    async fn list_coaches(&self) -> StudioResult<Vec<Coach>>;
    async fn delete_coach(&self, id: i64) -> StudioResult<()>;
}

#[async_trait]
pub trait LocationService: Send + Sync {
    async fn create_location(&self, input: LocationInput) -> StudioResult<Location>;
    async fn update_location(&self, id: i64, input: LocationInput) -> StudioResult<Location>;
    async fn get_location(&self, id: i64) -> StudioResult<LocationDetail>;
    async fn list_locations(&self) -> StudioResult<Vec<Location>>;
    /// Replaces the whole weekly schedule of the location.
    async fn set_operational_hours(
        &self,
        location_id: i64,
        hours: Vec<OperationalHour>,
    ) -> StudioResult<Vec<OperationalHour>>;
    async fn create_facility(
        &self,
        location_id: i64,
        input: FacilityInput,
    ) -> StudioResult<LocationFacility>;
    async fn delete_facility(&self, id: i64) -> StudioResult<()>;
    async fn add_location_assets(
        &self,
        location_id: i64,
        files: Vec<StoredFile>,
    ) -> StudioResult<Vec<Asset>>;
    async fn delete_asset(&self, asset_id: i64) -> StudioResult<Asset>;
    async fn facility_availability(
        &self,
        facility_id: i64,
        date: NaiveDate,
        duration_minutes: i64,
        step_minutes: i64,
    ) -> StudioResult<FacilityAvailability>;
}

#[async_trait]
pub trait ClassService: Send + Sync {
    async fn create_class_type(&self, name: String) -> StudioResult<ClassType>;
    async fn list_class_types(&self) -> StudioResult<Vec<ClassType>>;
    async fn create_class(&self, input: ClassInput) -> StudioResult<Class>;
    async fn update_class(&self, id: i64, input: ClassInput) -> StudioResult<Class>;
    async fn update_class_detail(
        &self,
        id: i64,
        input: ClassDetailInput,
    ) -> StudioResult<ClassDetail>;
    async fn get_class(&self, id: i64) -> StudioResult<ClassDetail>;
    async fn list_classes(&self) -> StudioResult<Vec<Class>>;
    async fn add_class_assets(&self, class_id: i64, files: Vec<StoredFile>)
    -> StudioResult<Vec<Asset>>;
    async fn delete_class_asset(&self, asset_id: i64) -> StudioResult<Asset>;
}

#[async_trait]
pub trait AgendaService: Send + Sync {
    async fn create_agenda(&self, input: AgendaInput) -> StudioResult<Agenda>;
    async fn list_agendas(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> StudioResult<Vec<AgendaListing>>;
    async fn create_agenda_recurrence(
        &self,
        input: AgendaRecurrenceInput,
    ) -> StudioResult<RecurrenceResult>;
    async fn find_all_agenda_recurrence(&self) -> StudioResult<Vec<AgendaRecurrence>>;
    /// Removes the rule together with its future agendas that have no
    /// bookings.
    async fn delete_agenda_recurrence(&self, id: i64) -> StudioResult<()>;
    async fn book(&self, agenda_id: i64, user_id: i64) -> StudioResult<AgendaBooking>;
    async fn check_in(&self, booking_id: i64) -> StudioResult<AgendaBooking>;
    async fn cancel_booking(&self, booking_id: i64) -> StudioResult<AgendaBooking>;
    async fn get_booking(&self, booking_id: i64) -> StudioResult<AgendaBooking>;
    async fn list_bookings(&self, agenda_id: i64) -> StudioResult<Vec<AgendaBooking>>;
}

#[async_trait]
pub trait PackageService: Send + Sync {
    async fn create_package(&self, input: PackageInput) -> StudioResult<Package>;
    async fn update_package(&self, id: i64, input: PackageInput) -> StudioResult<Package>;
    async fn list_packages(&self) -> StudioResult<Vec<Package>>;
    async fn purchase_package(&self, request: PurchaseRequest) -> StudioResult<PackageTransaction>;
    async fn confirm_transaction(&self, id: i64) -> StudioResult<PackageTransaction>;
    async fn reject_transaction(&self, id: i64) -> StudioResult<PackageTransaction>;
    async fn list_transactions(&self) -> StudioResult<Vec<PackageTransaction>>;
    async fn list_user_packages(&self, user_id: i64) -> StudioResult<Vec<UserPackage>>;
    async fn update_user_package(
        &self,
        id: i64,
        update: UserPackageUpdate,
    ) -> StudioResult<UserPackage>;
    async fn credit_balance(&self, user_id: i64) -> StudioResult<Vec<CreditBalance>>;
    async fn credit_history(&self, user_id: i64) -> StudioResult<Vec<CreditTransaction>>;
}

#[async_trait]
pub trait VoucherService: Send + Sync {
    async fn create_voucher(&self, input: VoucherInput) -> StudioResult<Voucher>;
    async fn list_vouchers(&self) -> StudioResult<Vec<Voucher>>;
    async fn delete_voucher(&self, id: i64) -> StudioResult<()>;
    async fn preview_voucher(
        &self,
        code: &str,
        package_id: i64,
        user_id: i64,
    ) -> StudioResult<PriceBreakdown>;
}

#[async_trait]
pub trait LoyaltyService: Send + Sync {
    async fn create_reward(&self, input: LoyaltyRewardInput) -> StudioResult<LoyaltyReward>;
    async fn list_rewards(&self) -> StudioResult<Vec<LoyaltyReward>>;
    async fn create_shop_item(&self, input: LoyaltyShopInput) -> StudioResult<LoyaltyShopItem>;
    async fn list_shop_items(&self) -> StudioResult<Vec<LoyaltyShopItem>>;
    async fn redeem(&self, user_id: i64, shop_item_id: i64) -> StudioResult<LoyaltyTransaction>;
    async fn balance(&self, user_id: i64) -> StudioResult<LoyaltyBalance>;
    async fn history(&self, user_id: i64) -> StudioResult<Vec<LoyaltyTransaction>>;
}

#[async_trait]
pub trait SettingsService: Send + Sync {
    async fn get_settings(&self) -> StudioResult<WebSettings>;
    async fn update_settings(&self, settings: WebSettings) -> StudioResult<WebSettings>;
    async fn list_deposit_accounts(&self) -> StudioResult<Vec<DepositAccount>>;
    async fn create_deposit_account(
        &self,
        input: DepositAccountInput,
    ) -> StudioResult<DepositAccount>;
    async fn delete_deposit_account(&self, id: i64) -> StudioResult<()>;
}

/// Every service the API resolves, behind trait objects so that tests can
/// swap in mocks one at a time.
#[derive(Clone)]
pub struct Services {
    pub users: Arc<dyn UserService>,
    pub coaches: Arc<dyn CoachService>,
    pub locations: Arc<dyn LocationService>,
    pub classes: Arc<dyn ClassService>,
    pub agendas: Arc<dyn AgendaService>,
    pub packages: Arc<dyn PackageService>,
    pub vouchers: Arc<dyn VoucherService>,
    pub loyalty: Arc<dyn LoyaltyService>,
    pub settings: Arc<dyn SettingsService>,
}
