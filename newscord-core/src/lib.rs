//! Core types for the newscord feed relays
//!
//! This crate defines the shared data structures passed between the feed
//! clients, the seen-item store and the Discord delivery layer.

pub mod item;

pub use item::{NewsItem, RelatedArticle, Video};
