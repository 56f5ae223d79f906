//! Core domain model for bibeasy.
//!
//! This crate defines the publication record model, the reference-ID
//! grammar used to cite entries in free text (`J12`, `C8`, ...), and the
//! label/roster taxonomy used for website categorization and student
//! highlighting.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod refs;
pub mod taxonomy;

pub use error::{Error, Result};
