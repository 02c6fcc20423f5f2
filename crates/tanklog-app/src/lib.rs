//! Application service layer - config, session, repositories

pub mod config;
pub mod repository;
pub mod session;
pub mod summary;
