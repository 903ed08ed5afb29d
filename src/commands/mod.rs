//! CLI commands

pub mod clean;
pub mod list;
pub mod manifest;
pub mod sitemap;
pub mod validate;
