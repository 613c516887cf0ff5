use anyhow::Result;
use chrono::NaiveDate;

const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";

/// This is the standard way of converting a date to a string in focuslog.
pub fn date_to_record_key(date: NaiveDate) -> String {
    date.format(RECORD_DATE_FORMAT).to_string()
}

pub fn parse_record_key(key: &str) -> Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(key, RECORD_DATE_FORMAT)?)
}
