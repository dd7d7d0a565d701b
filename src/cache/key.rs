//! Cache key derivation

use std::fmt;

/// Deterministic address of one document across all tiers.
///
/// Coordinates are fixed to 4 decimals, so inputs that only differ past
/// that precision share a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a Locationforecast at the given point
    pub fn locationforecast(latitude: f64, longitude: f64, altitude: i32) -> Self {
        Self(format!(
            "locationforecast-{}-{}-{}",
            fixed4(latitude),
            fixed4(longitude),
            altitude
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
impl From<&str> for CacheKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Format with 4 decimals, folding `-0.0000` into `0.0000`
pub fn fixed4(value: f64) -> String {
    let formatted = format!("{:.4}", value);
    if formatted == "-0.0000" {
        "0.0000".to_string()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_safe_file_names() {
        let key = CacheKey::locationforecast(-89.99999, -179.5, -12);
        assert_eq!(key.as_str(), "locationforecast--90.0000--179.5000--12");
        assert!(key
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.'));
    }

    #[test]
    fn test_locationforecast_key() {
        let key = CacheKey::locationforecast(59.942787176440405, 10.720651536344942, 100);
        assert_eq!(key.as_str(), "locationforecast-59.9428-10.7207-100");
    }

    #[test]
    fn test_equal_inputs_share_key() {
        let a = CacheKey::locationforecast(59.94281, 10.72069, 100);
        let b = CacheKey::locationforecast(59.94279, 10.72071, 100);
        assert_eq!(a, b);
    }

    #[test]
    fn test_altitude_distinguishes_keys() {
        let a = CacheKey::locationforecast(1.0, 2.0, 0);
        let b = CacheKey::locationforecast(1.0, 2.0, 1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_negative_coordinates() {
        let key = CacheKey::locationforecast(-33.8688, -151.2093, -5);
        assert_eq!(key.to_string(), "locationforecast--33.8688--151.2093--5");
    }

    #[test]
    fn test_negative_zero_folds() {
        assert_eq!(fixed4(-0.00001), "0.0000");
        assert_eq!(fixed4(0.0), "0.0000");
    }
}
