//! Query functions, one module per aggregate. Every function accepts any
//! PostgreSQL executor so it can run against the pool or inside a
//! transaction.

pub mod agendas;
pub mod bookings;
pub mod classes;
pub mod coaches;
pub mod locations;
pub mod loyalty;
pub mod packages;
pub mod settings;
pub mod users;
pub mod vouchers;
