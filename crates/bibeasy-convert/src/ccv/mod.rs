//! CCV XML handling.
//!
//! The Canadian Common CV (ccv-cvc.ca) exports a CV as XML in the
//! `generic-cv` namespace. Publications live under
//! `section[label="Contributions"]/section[label="Publications"]`, one
//! child section per publication whose `label` attribute names the CCV
//! type ("Journal Articles", "Conference Publications"); bibliographic
//! values sit in `field[label=...]/value` elements.

pub mod read;
pub mod sync;

pub use read::{parse_ccv, read_ccv_file, CcvRecord};
pub use sync::{mark_students, sync_ccv};
