use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use anyhow::{anyhow, Result};

/// Parses a deadline typed by a person, relative to `today`.
///
/// Accepts `today`, `tomorrow`, `eow`, `eom`, `+3d`/`+2w`/`+1m`, weekday names
/// (`fri`, `2:fri` for the Friday after next) and `YYYY-MM-DD`.
pub fn parse_human_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }
    let lower = input.to_lowercase();

    match lower.as_str() {
        "today" | "tod" => return Ok(today),
        "tomorrow" | "tom" => return Ok(today + Duration::days(1)),
        "eow" => {
            // Sunday closes the week
            let days_to_sunday = 6 - today.weekday().num_days_from_monday() as i64;
            return Ok(today + Duration::days(days_to_sunday));
        }
        "eom" => return end_of_month(today),
        _ => {}
    }

    if let Some(rest) = lower.strip_prefix('+') {
        return parse_relative(rest, today);
    }

    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(d);
    }

    if let Some((count, day_str)) = parse_weekday_token(&lower) {
        if let Ok(target) = parse_weekday_str(day_str) {
            if count < 1 {
                return Err(anyhow!("Weekday count must be at least 1: {}", input));
            }
            let mut days_needed = target.num_days_from_monday() as i64
                - today.weekday().num_days_from_monday() as i64;
            if days_needed <= 0 {
                days_needed += 7;
            }
            days_needed += (count - 1) * 7;
            return Ok(today + Duration::days(days_needed));
        }
    }

    Err(anyhow!("Could not parse date: {}", input))
}

/// Strict `YYYY-MM-DD`.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Expected YYYY-MM-DD, got '{}'", input))
}

fn parse_relative(rest: &str, today: NaiveDate) -> Result<NaiveDate> {
    let (num_str, unit) = match rest.char_indices().last() {
        Some((i, _)) if i > 0 => rest.split_at(i),
        _ => return Err(anyhow!("Invalid relative format: +{}", rest)),
    };
    let count: u32 = num_str
        .parse()
        .map_err(|_| anyhow!("Invalid relative format: +{}", rest))?;

    let target = match unit {
        "d" => today.checked_add_signed(Duration::days(count as i64)),
        "w" => today.checked_add_signed(Duration::weeks(count as i64)),
        // Jan 31 +1m lands on the last day of February
        "m" => today.checked_add_months(Months::new(count)),
        _ => return Err(anyhow!("Unknown unit in relative date: {}", unit)),
    };
    target.ok_or_else(|| anyhow!("Relative date out of range: +{}", rest))
}

fn end_of_month(today: NaiveDate) -> Result<NaiveDate> {
    let first = today
        .with_day(1)
        .and_then(|d| d.checked_add_months(Months::new(1)))
        .ok_or_else(|| anyhow!("End of month out of range for {}", today))?;
    Ok(first - Duration::days(1))
}

fn parse_weekday_token(input: &str) -> Option<(i64, &str)> {
    match input.split_once(':') {
        Some((count, day)) => count.parse::<i64>().ok().map(|c| (c, day)),
        None => Some((1, input)),
    }
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-01-15 is a Wednesday
    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_human_date("today", anchor()).unwrap(), anchor());
        assert_eq!(parse_human_date("Tom", anchor()).unwrap(), date(2025, 1, 16));
        assert_eq!(parse_human_date("eow", anchor()).unwrap(), date(2025, 1, 19));
        assert_eq!(parse_human_date("eom", anchor()).unwrap(), date(2025, 1, 31));
        assert_eq!(parse_human_date("eom", date(2024, 2, 3)).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_eow_on_sunday_is_same_day() {
        let sunday = date(2025, 1, 19);
        assert_eq!(parse_human_date("eow", sunday).unwrap(), sunday);
    }

    #[test]
    fn test_relative() {
        assert_eq!(parse_human_date("+3d", anchor()).unwrap(), date(2025, 1, 18));
        assert_eq!(parse_human_date("+2w", anchor()).unwrap(), date(2025, 1, 29));
        assert_eq!(parse_human_date("+1m", date(2025, 1, 31)).unwrap(), date(2025, 2, 28));
        assert_eq!(parse_human_date("+12m", anchor()).unwrap(), date(2026, 1, 15));
        assert!(parse_human_date("+3x", anchor()).is_err());
        assert!(parse_human_date("+d", anchor()).is_err());
    }

    #[test]
    fn test_weekdays() {
        assert_eq!(parse_human_date("fri", anchor()).unwrap(), date(2025, 1, 17));
        assert_eq!(parse_human_date("2:fri", anchor()).unwrap(), date(2025, 1, 24));
        // same weekday means next week
        assert_eq!(parse_human_date("wed", anchor()).unwrap(), date(2025, 1, 22));
        assert!(parse_human_date("0:fri", anchor()).is_err());
    }

    #[test]
    fn test_iso_and_garbage() {
        assert_eq!(parse_human_date("2025-03-01", anchor()).unwrap(), date(2025, 3, 1));
        assert!(parse_human_date("someday", anchor()).is_err());
        assert!(parse_human_date("", anchor()).is_err());
        assert!(parse_iso_date("2025-02-30").is_err());
    }

    #[test]
    fn test_parse_weekday_token() {
        assert_eq!(parse_weekday_token("fri"), Some((1, "fri")));
        assert_eq!(parse_weekday_token("2:fri"), Some((2, "fri")));
        assert_eq!(parse_weekday_token("x:fri"), None);
    }
}
