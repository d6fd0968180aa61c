//! Flow-statistics CSV reading, column schema, window-file catalog and
//! artifact directory layout.

mod artifacts;
mod catalog;
mod error;
mod reader;
pub mod schema;
mod table;

pub use artifacts::ArtifactLayout;
pub use catalog::{WindowCatalog, DEFAULT_DATA_DIR};
pub use error::IoError;
pub use reader::FlowTableReader;
pub use table::FlowTable;
