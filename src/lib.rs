//! Discourse quick posts.
//!
//! Serves a bounded, paginated feed of lightweight replies on a topic and
//! provides a client adapter that normalizes the feed across server versions.

pub mod auth;
pub mod client;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod host;
pub mod quick_posts;
pub mod web;
