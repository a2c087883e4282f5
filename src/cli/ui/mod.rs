pub mod style;
pub mod table;

pub use table::{Align, Table, TableColumn, TableRenderer};
