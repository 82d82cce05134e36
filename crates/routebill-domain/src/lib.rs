//! Domain layer - models, repository traits, and pure business services

pub mod model;
pub mod repository;
pub mod service;
