mod collection;
mod parsing;

pub use collection::collect_file_paths;
pub use parsing::{load_document, parse_files};
