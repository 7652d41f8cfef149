//! Widget features
//!
//! One module per widget. Each owns its own state; none of them knows about
//! the others or about the presentation layer.

pub mod calculator;
pub mod stopwatch;
pub mod timer;
pub mod unit_converter;
