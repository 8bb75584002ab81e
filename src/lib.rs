pub mod combine;
pub mod config;
pub mod discover;
pub mod error;
pub mod load;
pub mod table;
pub mod transform;
pub mod write;

pub use combine::CombineReport;
pub use config::{CombinerConfig, CsvCombinerConfig, FileCombinerConfig};
pub use error::CombineError;
