pub mod dataset;
pub mod file_formats;
pub mod process;
pub mod schedule;
