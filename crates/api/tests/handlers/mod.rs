mod agendas_test;
mod auth_test;
mod classes_test;
mod coaches_test;
mod files_test;
mod locations_test;
mod loyalty_test;
mod middleware_test;
mod packages_test;
