//! Report aggregation.
//!
//! Turns the scanner's eligible files into a [`crate::models::Report`].

pub mod collector;

pub use collector::*;
