use std::time::Duration;

/// Format an elapsed duration as `1h 02m 03s`, `2m 05s` or `4.21s`
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

/// Turn a free-text search keyword into the file prefix used for per-year files
/// ("machine learning and policy" -> "machinelearningandpolicy")
pub fn keyword_prefix(keyword: &str) -> String {
    keyword
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
