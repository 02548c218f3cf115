pub mod amount;
pub mod date;

pub use amount::{AmountContext, ColumnHint, NormalizedAmount, normalize_amount};
pub use date::normalize_date;
