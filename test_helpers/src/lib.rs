//! Test helpers shared across the workspace.
//!
//! - [`figment`] runs option-loading code inside a `figment::Jail`;
//! - [`fixtures`] holds named remote/local configuration pairs;
//! - [`text`] builds and inspects rendered diff text.

pub mod figment;
pub mod fixtures;
pub mod text;
