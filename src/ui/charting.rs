use crate::time_series::TimeSeriesPoint;

/// Lowest top of the WPM axis, so a slow run still gets a readable chart.
pub const MIN_WPM_AXIS: f64 = 10.0;
/// Spacing of the x axis labels, in seconds.
pub const LABEL_STEP_SECS: u64 = 5;

/// Compute X (seconds) and Y (WPM) bounds for the results chart
pub fn compute_chart_params(points: &[TimeSeriesPoint], duration: u64) -> (f64, f64) {
    let highest_wpm = points.iter().map(|p| p.wpm).fold(MIN_WPM_AXIS, f64::max);
    let overall_duration = (duration as f64).max(1.0);

    (overall_duration, highest_wpm.ceil())
}

/// Labels every [`LABEL_STEP_SECS`] from 0 to `duration`, inclusive.
pub fn x_labels(duration: u64) -> Vec<String> {
    (0..=duration)
        .step_by(LABEL_STEP_SECS as usize)
        .map(|s| s.to_string())
        .collect()
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
