pub mod fetch;
pub mod listing;
pub mod report;
pub mod workbook;
