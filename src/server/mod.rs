pub mod config;
pub mod db;

pub use config::Config;
pub use db::HeuroDB;
