//! The import boundary: everything that turns loosely formatted user input into
//! a canonical [`Dataset`](valuestream_schemas::dataset::Dataset) in seconds and
//! 0-100 percentages. Unit conversion happens here and nowhere else.

pub mod session;
pub mod tabular;
pub mod units;
