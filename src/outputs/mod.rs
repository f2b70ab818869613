//! Output generation for notifications.
//!
//! # Submodules
//!
//! - [`report`]: renders new and keyword-matched articles as a plain-text mail body

pub mod report;
