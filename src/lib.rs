pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod storage;

pub use db::create_pool;
