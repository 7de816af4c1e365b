//! # subsync-store
//!
//! The persisted "last synced commit" store. Records live as tagged lines in
//! one text file inside a gist; the gist update API takes the full file set,
//! so a write is a read-modify-write over the whole document.

pub mod client;
pub mod document;
pub mod error;
pub mod store;

pub use client::{Gist, GistClient, GistFile};
pub use error::StoreError;
pub use store::{GistStore, SyncStateStore};
