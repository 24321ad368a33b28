use chrono::{Days, NaiveDate};

/// Base date plus the following three days.
pub const TIME_STEP_COUNT: u64 = 4;
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d";
pub const COMPACT_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    Empty,
    Invalid(String),
    OutOfRange(String),
}

impl std::fmt::Display for DateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateError::Empty => write!(f, "analysis date is empty"),
            DateError::Invalid(s) => write!(f, "invalid analysis date: {s}"),
            DateError::OutOfRange(s) => write!(f, "analysis date out of range: {s}"),
        }
    }
}

impl std::error::Error for DateError {}

/// Accepts `YYYYMMDD` (query form) or `YYYY-MM-DD` (date input form).
pub fn parse_analysis_date(s: &str) -> Result<NaiveDate, DateError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DateError::Empty);
    }
    let format = if s.contains('-') { DISPLAY_FORMAT } else { COMPACT_FORMAT };
    NaiveDate::parse_from_str(s, format).map_err(|_| DateError::Invalid(s.to_owned()))
}

pub fn compact(date: NaiveDate) -> String {
    date.format(COMPACT_FORMAT).to_string()
}

pub fn display(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

pub fn time_steps(base: &str) -> Result<Vec<String>, DateError> {
    let start = parse_analysis_date(base)?;
    (0..TIME_STEP_COUNT)
        .map(|offset| {
            start
                .checked_add_days(Days::new(offset))
                .map(display)
                .ok_or_else(|| DateError::OutOfRange(base.to_owned()))
        })
        .collect()
}
