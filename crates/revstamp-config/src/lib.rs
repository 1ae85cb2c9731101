mod entry;
mod file;

pub use entry::{Depth, EntryConfig};
pub use file::RunConfig;
