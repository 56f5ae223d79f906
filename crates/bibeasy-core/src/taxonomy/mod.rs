pub mod labels;
pub mod roster;

pub use labels::{LabelReport, LabelSet};
pub use roster::Roster;
