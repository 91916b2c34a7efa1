//! Tienda utils

use rand::Rng;
use web_time::{SystemTime, UNIX_EPOCH};

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Seconds since unix epoch
pub fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Milliseconds since unix epoch
pub fn unix_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Synthesize a transaction reference
///
/// Unique per checkout attempt so retried submissions do not collide:
/// a timestamp plus a random alphanumeric suffix.
pub fn generate_reference() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| {
            let index = rng.random_range(0..ALPHANUMERIC.len());
            ALPHANUMERIC[index] as char
        })
        .collect();
    format!("TXN_{}_{}", unix_time_millis(), suffix)
}

/// Synthesize a local transaction id
///
/// Used when creation fails before the backend assigned one, so the flow
/// still reaches a terminal state with a well-formed transaction.
pub fn generate_local_id() -> String {
    format!("txn_{}", unix_time_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_are_unique_per_attempt() {
        let a = generate_reference();
        let b = generate_reference();
        assert_ne!(a, b);
        assert!(a.starts_with("TXN_"));
    }

    #[test]
    fn test_reference_shape() {
        let reference = generate_reference();
        let parts: Vec<&str> = reference.splitn(3, '_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TXN");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 9);
    }
}
