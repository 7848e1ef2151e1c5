use serde::Serializer;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

/// Calendar date format used in feed filenames and on screen
pub const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` string, rejecting impossible calendar dates
pub fn parse_date(s: &str) -> Option<Date> {
    Date::parse(s.trim(), ISO_DATE).ok()
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: Date) -> String {
    // [year]-[month]-[day] is always formattable for a valid Date
    date.format(ISO_DATE).unwrap_or_default()
}

/// serde helper so records serialize their feed date as `YYYY-MM-DD`
pub fn serialize_date<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(*date))
}
