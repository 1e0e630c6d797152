//! Severity tiers reported by vulnerability scanners

use serde::{Deserialize, Serialize};

/// Severity tier of a finding, highest first
///
/// The derived ordering is the threshold order:
/// `Critical > High > Medium > Low > Negligible > Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Unknown,
    Negligible,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All tiers, highest first
    pub const ALL: [Severity; 6] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Negligible,
        Severity::Unknown,
    ];

    /// Normalize scanner text to a tier. Case-insensitive but otherwise
    /// exact, so surrounding whitespace makes a label unrecognized; anything
    /// unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            "negligible" => Severity::Negligible,
            _ => Severity::Unknown,
        }
    }

    /// Check whether `label` names one of the six tiers
    pub fn is_known_label(label: &str) -> bool {
        Self::from_label(label) != Severity::Unknown
            || label.eq_ignore_ascii_case("unknown")
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Negligible => "negligible",
            Severity::Unknown => "unknown",
        }
    }

    /// Only the four top tiers can be used as a failing threshold
    pub fn can_fail(&self) -> bool {
        *self >= Severity::Low
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_is_case_insensitive() {
        assert_eq!(Severity::from_label("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::from_label("High"), Severity::High);
        assert_eq!(Severity::from_label("mEdIuM"), Severity::Medium);
        assert_eq!(Severity::from_label("Negligible"), Severity::Negligible);
    }

    #[test]
    fn test_unrecognized_labels_are_unknown() {
        for label in ["", "bogus", "info", "moderate", "medious", "unknown"] {
            assert_eq!(Severity::from_label(label), Severity::Unknown, "{label}");
        }
        assert!(Severity::is_known_label("Unknown"));
        assert!(!Severity::is_known_label("info"));
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        assert_eq!(Severity::from_label(" high"), Severity::Unknown);
        assert_eq!(Severity::from_label("low\n"), Severity::Unknown);
        assert!(!Severity::is_known_label(" unknown "));
    }

    #[test]
    fn test_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::Negligible);
        assert!(Severity::Negligible > Severity::Unknown);

        let mut sorted = Severity::ALL;
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(sorted, Severity::ALL);
    }

    #[test]
    fn test_can_fail() {
        assert!(Severity::Critical.can_fail());
        assert!(Severity::Low.can_fail());
        assert!(!Severity::Negligible.can_fail());
        assert!(!Severity::Unknown.can_fail());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        let parsed: Severity = serde_json::from_str("\"negligible\"").unwrap();
        assert_eq!(parsed, Severity::Negligible);
    }
}
