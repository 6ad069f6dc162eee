pub mod commands;
pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod handlers;
pub mod models;
pub mod stats;
