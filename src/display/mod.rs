//! Display formatting for terminal output
//!
//! Bars, percentages and rules shared by the report renderers.

pub mod report;

pub use report::{
    double_separator, format_bar, format_date, format_percentage, is_valid_date_format,
    separator, truncate,
};
