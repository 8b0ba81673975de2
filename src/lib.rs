//! Routine Builder - product picker and routine assistant
//!
//! Browse a product catalog, build a persisted selection, and ask a chat
//! relay to turn the selection into a routine and answer follow-ups.

pub mod catalog;
pub mod config;
pub mod conversation;
pub mod core;
pub mod relay;
pub mod routes;
pub mod selection;
pub mod views;
