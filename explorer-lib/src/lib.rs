//! Interactive record explorer
//!
//! Turns a homogeneous record collection and a field configuration into
//! filterable, sortable, column-toggleable views, with a detail panel that
//! follows the selected record across collection refreshes.

pub mod action;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod registry;
pub mod selection;
pub mod source;
pub mod toolbar;
pub mod view;

mod explorer;

pub use explorer::*;
