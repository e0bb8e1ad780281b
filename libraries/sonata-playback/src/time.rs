//! Time display helpers

/// Format seconds as `M:SS`
///
/// NaN, infinite and negative input all render as `"0:00"`. Fractional
/// seconds are truncated.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Playback progress as a percentage (0-100)
///
/// `None` while the duration is unknown or zero.
pub fn progress_percent(position: f64, duration: f64) -> Option<f64> {
    if !duration.is_finite() || duration <= 0.0 || position.is_nan() {
        return None;
    }

    Some((position / duration * 100.0).clamp(0.0, 100.0))
}

/// Clamp a seek target into `[0, duration]`
///
/// `None` while the duration is unknown.
pub fn clamp_seek(target: f64, duration: f64) -> Option<f64> {
    if !duration.is_finite() || duration < 0.0 || target.is_nan() {
        return None;
    }

    Some(target.clamp(0.0, duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_time(150.0), "2:30");
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(9.99), "0:09");
        assert_eq!(format_time(61.0), "1:01");
        assert_eq!(format_time(3600.0), "60:00");
    }

    #[test]
    fn invalid_input_formats_as_zero() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-5.0), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }

    #[test]
    fn progress_requires_known_duration() {
        assert_eq!(progress_percent(30.0, 120.0), Some(25.0));
        assert_eq!(progress_percent(10.0, f64::NAN), None);
        assert_eq!(progress_percent(10.0, 0.0), None);
        assert_eq!(progress_percent(200.0, 100.0), Some(100.0));
    }

    #[test]
    fn seek_clamps_to_track_bounds() {
        assert_eq!(clamp_seek(-4.0, 100.0), Some(0.0));
        assert_eq!(clamp_seek(140.0, 100.0), Some(100.0));
        assert_eq!(clamp_seek(42.0, 100.0), Some(42.0));
        assert_eq!(clamp_seek(42.0, f64::NAN), None);
    }
}
