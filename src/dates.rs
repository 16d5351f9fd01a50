use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime, Time};

/// Calendar date as stored on meals.
pub const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Wall-clock time as stored on meals and reminders.
pub const TIME_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]");

pub fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s, DATE_FORMAT)
}

pub fn parse_time(s: &str) -> Result<Time, time::error::Parse> {
    Time::parse(s, TIME_FORMAT)
}

/// `YYYY-MM-DD`, the same shape clients submit.
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Today's date in UTC.
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}
