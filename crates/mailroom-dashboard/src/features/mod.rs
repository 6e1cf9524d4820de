//! Dashboard screens.

pub mod recipients;
pub mod records;
pub mod templates;
