/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current local wall clock as `(hour, minutes)`, zero padded.
///
/// Kitchen tickets show the time the order reached the kitchen when the
/// register did not send one.
pub fn local_hour_minutes() -> (String, String) {
    let now = chrono::Local::now();
    (now.format("%H").to_string(), now.format("%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_hour_minutes_shape() {
        let (hour, minutes) = local_hour_minutes();
        assert_eq!(hour.len(), 2);
        assert_eq!(minutes.len(), 2);
        assert!(hour.parse::<u32>().unwrap() < 24);
        assert!(minutes.parse::<u32>().unwrap() < 60);
    }

    #[test]
    fn test_now_millis_is_monotonic_enough() {
        let a = now_millis();
        let b = now_millis();
        assert!(b >= a);
    }
}
