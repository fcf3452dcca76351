//! Domain layer containing business entities and contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`reserved_paths`] - Path prefixes that are never short codes
//! - [`click_event`] - Click accounting event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves a link and answers immediately
//! 2. A [`click_event::ClickEvent`] is pushed to a bounded channel
//! 3. [`click_worker::run_click_worker`] applies the increment
//! 4. The store performs an atomic `clicks = clicks + 1`

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
pub mod reserved_paths;
