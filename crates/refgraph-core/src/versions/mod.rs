//! Version DAG: items, their versions and the FIRST/LAST tags

pub mod item;
pub mod itemversion;
pub mod tags;

pub use item::{create_item, ItemHandle};
pub use itemversion::create_version;
pub use tags::{first_versions, last_versions, tag_names};
