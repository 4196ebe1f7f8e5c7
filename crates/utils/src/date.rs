use chrono::NaiveDate;

/// Parses a strict `YYYY-MM-DD` date. Shorter forms such as `2013-9-1` and
/// impossible dates such as `2013-02-29` yield `None`.
pub fn extract_date(value: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return None;
    };

    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }
    if !parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

pub fn valid_date(value: &str) -> bool {
    extract_date(value).is_some()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
