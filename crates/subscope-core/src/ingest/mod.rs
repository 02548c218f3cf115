pub mod csv;
pub mod extract;
pub mod pdf;

pub use csv::ingest_csv;
pub use pdf::{PageText, TextFragment, parse_statement_pdf};
