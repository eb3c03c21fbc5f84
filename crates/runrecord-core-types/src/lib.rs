//! Core types shared across runrecord facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Source locations**: SourceLocation, the authored position of a snippet
//! - **Schema constants**: Canonical field keys and event names

pub mod location;
pub mod schema;

pub use location::SourceLocation;
