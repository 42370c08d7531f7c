use chrono::DateTime;

/// Format a feed timestamp (epoch milliseconds) as a UTC display string
/// for popups, e.g. "2020-05-24 18:02:05 UTC".
pub fn format_event_time(epoch_ms: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => String::from("unknown time"),
    }
}

#[cfg(test)]
mod tests {
    use super::format_event_time;

    #[test]
    fn formats_epoch_zero() {
        assert_eq!(format_event_time(0), "1970-01-01 00:00:00 UTC");
    }

    #[test]
    fn formats_a_feed_timestamp() {
        // 2020-05-24T18:02:05Z
        assert_eq!(format_event_time(1_590_343_325_000), "2020-05-24 18:02:05 UTC");
    }

    #[test]
    fn out_of_range_timestamps_do_not_panic() {
        assert_eq!(format_event_time(i64::MAX), "unknown time");
        assert_eq!(format_event_time(i64::MIN), "unknown time");
    }
}
