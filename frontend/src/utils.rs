use chrono::NaiveDate;
use js_sys::Date;

/// Today's date in the browser's local time zone.
pub fn today() -> Option<NaiveDate> {
    let now = Date::new_0();
    NaiveDate::from_ymd_opt(
        i32::try_from(now.get_full_year()).ok()?,
        now.get_month() + 1,
        now.get_date(),
    )
}

/// Date used for term status badges. An unreadable clock is logged and
/// pins the badges to the Unix epoch.
pub fn status_date() -> NaiveDate {
    today().unwrap_or_else(|| {
        web_sys::console::error_1(&"Browser clock returned an out-of-range date".into());
        NaiveDate::default()
    })
}
