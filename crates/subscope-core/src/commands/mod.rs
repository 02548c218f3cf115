pub mod analyze;
pub mod knowledge;
