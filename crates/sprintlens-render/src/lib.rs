//! # sprintlens-render
//!
//! Plain-text rendering for sprintlens derived tables.
//!
//! This crate provides:
//! - Fixed-width text tables for every derived table
//! - The status brief (the downloadable plain-text artifact)
//! - The flattened question-answering context handed to the external
//!   completion service
//!
//! Rendering is infallible string building; aggregators that degraded to
//! `Derived::Insufficient` render as an explicit "insufficient data" line in
//! place of their table.

pub mod brief;
pub mod context;
pub mod table;
pub mod views;

pub use brief::render_brief;
pub use context::insight_context;
pub use table::TextTable;
