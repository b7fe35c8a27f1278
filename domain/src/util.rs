//! Small shared helpers

/// Get current timestamp in milliseconds since the Unix epoch
pub fn timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_is_monotonic_enough() {
        let a = timestamp_ms();
        let b = timestamp_ms();
        assert!(b >= a);
    }
}
