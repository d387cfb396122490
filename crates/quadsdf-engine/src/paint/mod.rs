//! Paint model for quad instances.
//!
//! Only solid colors exist; the pipeline has no gradient or texture fills.

mod color;

pub use color::Color;
