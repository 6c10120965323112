//! Extractor module for the water dashboard page
//!
//! This module turns the raw HTML of the City of Cape Town water dashboard
//! into a typed [`Snapshot`]:
//! - Locating page regions by CSS class and position
//! - Coercing labels into percentages, trends and dates
//! - Splitting project labels into area and type
//!
//! Extraction is a pure function of the input bytes and can run on any
//! number of threads at once.

mod dates;
mod parser;
mod text;
mod types;

pub use dates::{month_from_name, parse_day_zero, parse_stats_as_at};
pub use parser::{parse, ParseError, SkippableRowError};
pub use text::{area_and_type, clean, parse_percentage};
pub use types::{
    CapeTonians, City, Dams, Direction, Other, Project, Snapshot, Status, Trend, DISCLAIMER,
    UNDER_REVIEW,
};
