//! Type definitions for diemtrack

mod entry;
mod error;
mod report;
mod usage;

pub use entry::*;
pub use error::*;
pub use report::*;
pub use usage::*;
