use chrono::NaiveDate;
use tracing::debug;

/// Raw values of the search box inputs, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFields {
    pub text: String,
    pub date_from: String,
    pub date_to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub substring: String,
    pub from_millis: Option<i64>,
    /// Start of the selected end day. The filter extends it by one day.
    pub to_millis: Option<i64>,
}

impl Query {
    pub fn from_fields(fields: &SearchFields) -> Self {
        Self {
            substring: fields.text.clone(),
            from_millis: parse_date_field(&fields.date_from),
            to_millis: parse_date_field(&fields.date_to),
        }
    }
}

/// Map a `YYYY-MM-DD` date input value to UTC midnight in epoch millis.
/// Empty or malformed values mean "no bound".
pub fn parse_date_field(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis()),
        Err(e) => {
            debug!("Ignoring malformed date field '{}': {}", raw, e);
            None
        }
    }
}
