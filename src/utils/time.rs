use chrono::Utc;

/// Milliseconds since the Unix epoch.
pub fn time_millis() -> i64 {
    Utc::now().timestamp_millis()
}
