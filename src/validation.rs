use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A date argument that is not a real calendar date in `YYYY-MM-DD` form
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Incorrect date format for {input:?}, should be YYYY-MM-DD")]
pub struct InvalidDateFormat {
    pub input: String,
}

fn date_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern is valid"))
}

/// Parse a `YYYY-MM-DD` date
///
/// chrono alone accepts unpadded fields and signed years, so the exact
/// shape is checked first. Impossible dates such as `2017-02-30` are
/// rejected by the parse.
///
/// ```
/// use climate_query_service::validation::validate_date;
///
/// assert!(validate_date("2017-08-23").is_ok());
/// assert!(validate_date("08/23/2017").is_err());
/// assert!(validate_date("2017-8-23").is_err());
/// ```
pub fn validate_date(text: &str) -> Result<NaiveDate, InvalidDateFormat> {
    let invalid = || InvalidDateFormat {
        input: text.to_string(),
    };

    if !date_shape().is_match(text) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| invalid())
}
