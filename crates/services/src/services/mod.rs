pub mod catalog;
pub mod color;
pub mod database_validator;
pub mod report;
pub mod sheet;
pub mod summary;
pub mod time_range;
pub mod timesheet;
pub mod week;
