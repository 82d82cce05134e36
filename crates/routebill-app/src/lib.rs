//! Application service layer - config, controllers, import, export

pub mod config;
pub mod controller;
pub mod export;
pub mod import_service;
pub mod repository;
