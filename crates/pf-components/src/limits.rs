//! Per-node operating limits used for warning generation.

use pf_core::Real;
use serde::{Deserialize, Serialize};

/// Default upper bound for all limit ranges.
pub const MAX_DEFAULT: Real = 1.0e6;

fn default_range() -> [Real; 2] {
    [0.0, MAX_DEFAULT]
}

/// Acceptable `[min, max]` ranges for the four solved quantities.
///
/// Violations produce advisory warnings in the result table, never errors.
/// Comparison is on magnitudes: a value is flagged when `|value| > |max|`
/// or `|value| < |min|`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default = "default_range")]
    pub vi: [Real; 2],
    #[serde(default = "default_range")]
    pub vo: [Real; 2],
    #[serde(default = "default_range")]
    pub ii: [Real; 2],
    #[serde(default = "default_range")]
    pub io: [Real; 2],
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            vi: default_range(),
            vo: default_range(),
            ii: default_range(),
            io: default_range(),
        }
    }
}

impl Limits {
    fn range(&self, key: &str) -> [Real; 2] {
        match key {
            "vi" => self.vi,
            "vo" => self.vo,
            "ii" => self.ii,
            "io" => self.io,
            _ => default_range(),
        }
    }

    /// Check the given `(field, value)` pairs and return the names of the
    /// fields that fall outside their range, space-joined.
    pub fn check(&self, checks: &[(&str, Real)]) -> String {
        let mut flagged = Vec::new();
        for &(key, value) in checks {
            let lim = self.range(key);
            if value.abs() > lim[1].abs() || value.abs() < lim[0].abs() {
                flagged.push(key);
            }
        }
        flagged.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_passes_typical_values() {
        let limits = Limits::default();
        assert_eq!(limits.check(&[("vi", 3.3), ("ii", 0.5)]), "");
    }

    #[test]
    fn out_of_range_fields_flagged() {
        let limits = Limits {
            ii: [0.0, 0.101],
            ..Limits::default()
        };
        assert_eq!(limits.check(&[("vi", 6.0), ("ii", 0.1011)]), "ii");
        assert_eq!(limits.check(&[("ii", 0.5), ("io", 2e6)]), "ii io");
    }

    #[test]
    fn magnitude_comparison_handles_negative_values() {
        let limits = Limits {
            vo: [0.0, 5.0],
            ..Limits::default()
        };
        assert_eq!(limits.check(&[("vo", -12.0)]), "vo");
        assert_eq!(limits.check(&[("vo", -4.9)]), "");
    }

    #[test]
    fn lower_bound_on_magnitude() {
        let limits = Limits {
            vi: [2.0, 6.0],
            ..Limits::default()
        };
        assert_eq!(limits.check(&[("vi", 1.0)]), "vi");
        assert_eq!(limits.check(&[("vi", 3.0)]), "");
    }

    #[test]
    fn partial_limits_deserialize_with_defaults() {
        let limits: Limits = serde_json::from_str(r#"{"ii": [0.0, 0.101]}"#).unwrap();
        assert_eq!(limits.ii, [0.0, 0.101]);
        assert_eq!(limits.vi, [0.0, MAX_DEFAULT]);
    }
}
