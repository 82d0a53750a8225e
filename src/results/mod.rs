mod reader;
mod result_set;
mod row;

pub use reader::BufferedReader;
pub use result_set::ResultSet;
pub use row::{Columns, CustomDbRow};
