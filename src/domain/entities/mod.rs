//! Core domain entities.
//!
//! - [`Link`] - A stored short link
//! - [`NewLink`] - Insert payload for a link
//! - [`LinkOrder`] - Allow-listed sort order for listings
//! - [`DomainCheck`] - Latest DNS status of the short-link domain

pub mod domain_check;
pub mod link;
pub mod link_order;

pub use domain_check::{DomainCheck, DomainCheckStatus};
pub use link::{Link, NewLink};
pub use link_order::{LinkOrder, SortColumn, SortDirection};
