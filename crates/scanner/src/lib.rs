pub mod parser;
pub mod row;

pub use parser::{ParsedFilename, clean, parse};
pub use row::{RowScan, scan_row};
