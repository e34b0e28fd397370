//! Command handlers
//!
//! Each handler splits into a pure report builder and a thin shell that
//! prints through an [`crate::output::Output`].

pub mod prices;
pub mod quote;
pub mod simulate;
