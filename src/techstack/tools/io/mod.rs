pub mod csv_write;
pub mod excel_write;
pub mod tabular;
