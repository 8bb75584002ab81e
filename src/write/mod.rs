// src/write/mod.rs
pub mod csv;
pub mod excel;

pub use self::csv::write_csv;
pub use self::excel::write_excel;
