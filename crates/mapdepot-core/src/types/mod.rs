//! Validated path types used by the extractor.

mod dest_dir;
mod entry_path;

pub use dest_dir::DestDir;
pub use entry_path::EntryPath;
