//! Data model, merge engine and device-local cache for shared family wishlists.

pub mod actions;
pub mod merge;
pub mod seed;
pub mod storage;
pub mod suggestions;
pub mod sync;
pub mod types;
