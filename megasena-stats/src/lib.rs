pub mod colors;
pub mod config;
pub mod error;
pub mod frequency;
pub mod generator;
pub mod history;
pub mod patterns;
pub mod session;
pub mod snapshot;
pub mod strategy;
pub mod summary;
