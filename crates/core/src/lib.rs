//! # Studio Core
//!
//! Domain types and rules of the studio: classes, coaches, locations,
//! packages and credits, vouchers, agenda and bookings, loyalty points.
//!
//! Nothing in here performs I/O. The service traits in [`services`] describe
//! what the storage layer offers; the modules [`pricing`], [`credits`],
//! [`booking`], [`availability`] and [`recurrence`] hold the rules those
//! services apply.

pub mod availability;
pub mod booking;
pub mod credits;
pub mod errors;
pub mod form;
pub mod forms;
pub mod models;
pub mod pricing;
pub mod recurrence;
pub mod services;
