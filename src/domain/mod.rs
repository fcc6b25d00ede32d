pub mod date_range;
pub mod entry;
pub mod error;
pub mod journal;
pub mod streak;

pub use date_range::*;
pub use entry::*;
pub use error::*;
pub use journal::*;
pub use streak::*;
