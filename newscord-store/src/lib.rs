//! Seen-item store
//!
//! SQLite-backed record of everything already posted, keyed by feed GUID
//! for news and video ID for videos. Keeps the relays idempotent across
//! cron runs.

pub mod seen_store;

pub use seen_store::{SeenStore, StoreError};
