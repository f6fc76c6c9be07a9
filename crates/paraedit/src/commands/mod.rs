//! Command implementations.

pub mod edit;
pub mod info;
