//! Time utilities: the local "now" handed to the pure interpreters, and
//! normalisation of typed start-time fragments.

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

/// Wall-clock time in an IANA tz like "America/Chicago".
pub fn local_now(tz: &str) -> Result<NaiveDateTime> {
    local_at(Utc::now(), tz)
}

/// Convert a UTC instant into naive local time for `tz`.
pub fn local_at(instant: DateTime<Utc>, tz: &str) -> Result<NaiveDateTime> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(instant.with_timezone(&tz).naive_local())
}

/// Turn a start-time fragment ("2pm", "9:30 am", "14:05", "evening") into a
/// clock time. Day-part words map to fixed hours.
pub fn clock_time(fragment: &str) -> Option<NaiveTime> {
    let f = fragment.trim().to_lowercase();

    let day_part = match f.as_str() {
        "morning" | "morn" => Some(9),
        "noon" => Some(12),
        "afternoon" => Some(14),
        "evening" | "eve" => Some(18),
        "night" | "late" => Some(21),
        _ => None,
    };
    if let Some(h) = day_part {
        return NaiveTime::from_hms_opt(h, 0, 0);
    }

    let (body, meridiem) = if let Some(rest) = f.strip_suffix("am") {
        (rest.trim(), Some(false))
    } else if let Some(rest) = f.strip_suffix("pm") {
        (rest.trim(), Some(true))
    } else {
        (f.as_str(), None)
    };

    let (h, m) = match body.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None => (body.parse::<u32>().ok()?, 0),
    };

    let h = match meridiem {
        Some(pm) => {
            if h == 0 || h > 12 {
                return None;
            }
            match (h, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            }
        }
        None => h,
    };

    NaiveTime::from_hms_opt(h, m, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_local_at_chicago() {
        // Feb is CST (UTC-6)
        let utc = Utc.with_ymd_and_hms(2026, 2, 21, 5, 59, 0).unwrap();
        let local = local_at(utc, "America/Chicago").unwrap();
        assert_eq!(local.to_string(), "2026-02-20 23:59:00");
    }

    #[test]
    fn test_invalid_timezone() {
        assert!(local_now("Mars/Olympus").is_err());
    }

    #[test]
    fn test_clock_time_forms() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0);
        assert_eq!(clock_time("2pm"), t(14, 0));
        assert_eq!(clock_time("9:30 AM"), t(9, 30));
        assert_eq!(clock_time("12am"), t(0, 0));
        assert_eq!(clock_time("12pm"), t(12, 0));
        assert_eq!(clock_time("14:05"), t(14, 5));
        assert_eq!(clock_time("evening"), t(18, 0));
        assert_eq!(clock_time("13pm"), None);
        assert_eq!(clock_time("25:00"), None);
    }
}
