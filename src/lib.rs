// Library for tests to access modules

pub mod auth;
pub mod collector;
pub mod config;
pub mod error;
pub mod format;
pub mod host;
pub mod models;
pub mod routes;
pub mod sysinfo_repo;
pub mod version;
pub mod worker;
