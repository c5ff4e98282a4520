pub mod agendas;
pub mod classes;
pub mod coaches;
pub mod files;
pub mod locations;
pub mod loyalty;
pub mod packages;
pub mod settings;
pub mod users;
pub mod vouchers;
