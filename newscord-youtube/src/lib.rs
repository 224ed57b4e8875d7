//! Minimal YouTube Data API v3 client
//!
//! Covers just the two read endpoints the relays need: channel uploads via
//! `search` and playlist contents via `playlistItems`.

pub mod client;
pub mod error;

pub use client::YouTubeClient;
pub use error::YouTubeError;
