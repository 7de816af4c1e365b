//! # subsync-core
//!
//! Domain types and configuration for the subsync pipeline: repository
//! specs, the sync-record key/value pair, and the environment-backed
//! [`Config`](config::Config) every other crate receives.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::{RepoSpec, SyncRecord, SyncTag};
