pub mod ids;
pub mod record;

pub use ids::{PubType, RefId};
pub use record::Record;
