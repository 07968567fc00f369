pub mod category;
pub mod record;

pub use category::Category;
pub use record::{SourceRecord, UNKNOWN_SOURCE_NAME};
