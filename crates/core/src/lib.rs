//! Core types and constants for cardy
//!
//! This crate contains domain types shared across all other crates.

mod artifact;
mod chunk;
mod constants;
mod document;
mod heuristics;
mod project;
mod scope;

pub use artifact::*;
pub use chunk::*;
pub use constants::*;
pub use document::*;
pub use heuristics::*;
pub use project::*;
pub use scope::*;
