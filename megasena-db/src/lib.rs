pub mod fetch;
pub mod import;
pub mod models;
pub mod store;
