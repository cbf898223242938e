pub mod config;
pub mod errors;
pub mod lazy;
pub mod names;
pub mod resolution;
pub mod snapshot;
pub mod syntax;
