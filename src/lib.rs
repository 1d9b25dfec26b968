// Library so integration tests can reach the modules

pub mod bot_repo;
pub mod config;
pub mod models;
pub mod routes;
pub mod scheduler;
pub mod snapshot_repo;
pub mod worker;
