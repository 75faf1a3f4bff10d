//! Data models for the PMO backend.
//!
//! Field names match the JSON keys the frontend sends and expects.

mod assignment;
mod member;
mod project;

pub use assignment::*;
pub use member::*;
pub use project::*;
