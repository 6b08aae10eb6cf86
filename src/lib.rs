pub mod cli;
#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod web;

pub use config::Config;
pub use db::Database;
