pub mod export;
pub mod import;

pub use export::CsvExporter;
pub use import::{CsvImporter, ImportError, ImportMode, ImportReport};
