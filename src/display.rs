//! Label formatting for the page.

/// `mm:ss`, minutes zero-padded and not wrapped at the hour.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Frequencies are shown with two decimals.
pub fn format_hz(hz: f64) -> String {
    format!("{hz:.2}")
}
