//! Timetable Core Library
//!
//! This library expands recurring event configurations (a base date/time
//! range plus a fixed frequency or a positional recurrence rule) into
//! concrete, deduplicated time entries.

pub mod entry;
pub mod error;
pub mod increment;
pub mod resolver;
pub mod settings;
pub mod timetable;
pub mod types;
pub mod validate;

// Re-export core types and error handling
pub use error::{Error, Result};
pub use types::*;

/// Commonly used items
pub mod prelude {
    pub use crate::{
        increment::*, resolver::*, settings::*, timetable::*, types::*, validate::*,
    };
}
