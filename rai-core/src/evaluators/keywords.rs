//! Keyword and sector lists consulted by rule conditions.
//!
//! All matching is case-insensitive substring matching.

use crate::model::SystemProfile;

/// Minimum description length (in characters) considered adequate.
pub const MIN_DESCRIPTION_CHARS: usize = 50;

/// Terms whose presence in `known_limitations` shows fairness was considered.
pub const FAIRNESS_TERMS: &[&str] = &["bias", "fair", "discriminat", "equit", "disparate"];

/// Sectors with heightened anti-discrimination requirements.
pub const FAIRNESS_SENSITIVE_SECTORS: &[&str] = &[
    "finance",
    "healthcare",
    "employment",
    "education",
    "criminal_justice",
    "housing",
];

/// Regulation names that indicate privacy obligations were identified.
pub const PRIVACY_REGULATION_TERMS: &[&str] = &["gdpr", "lgpd", "ccpa", "hipaa", "privacy"];

/// Data-type terms that denote sensitive or personal data.
pub const SENSITIVE_DATA_TERMS: &[&str] = &[
    "personal",
    "pii",
    "health",
    "financial",
    "biometric",
    "location",
];

/// Sectors with heightened security requirements.
pub const HIGH_SECURITY_SECTORS: &[&str] = &[
    "healthcare",
    "finance",
    "government",
    "defense",
    "critical_infrastructure",
];

/// Sectors with strict availability and reliability expectations.
pub const HIGH_RELIABILITY_SECTORS: &[&str] = &[
    "healthcare",
    "finance",
    "transportation",
    "energy",
    "telecommunications",
];

/// Sectors with heightened ethical implications.
pub const ETHICALLY_SENSITIVE_SECTORS: &[&str] = &[
    "healthcare",
    "criminal_justice",
    "employment",
    "credit",
    "housing",
    "education",
];

/// Description terms suggesting the system makes decisions about individuals.
pub const DECISION_TERMS: &[&str] = &["decision", "score"];

/// Whether `haystack` contains any of `terms`, ignoring case.
pub fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    terms.iter().any(|t| lower.contains(t))
}

/// Whether any entry of `items` contains any of `terms`, ignoring case.
pub fn any_contains(items: &[String], terms: &[&str]) -> bool {
    items.iter().any(|item| contains_any(item, terms))
}

/// Whether the profile's industry sector matches one of `sectors`.
pub fn sector_in(profile: &SystemProfile, sectors: &[&str]) -> bool {
    profile
        .sector()
        .is_some_and(|s| contains_any(s, sectors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AiSystemType;

    #[test]
    fn test_contains_any_is_case_insensitive() {
        assert!(contains_any("Potential BIAS against minorities", FAIRNESS_TERMS));
        assert!(contains_any("Discriminatory outcomes", FAIRNESS_TERMS));
        assert!(!contains_any("Latency spikes under load", FAIRNESS_TERMS));
    }

    #[test]
    fn test_any_contains() {
        let regs = vec!["EU AI Act".to_string(), "GDPR".to_string()];
        assert!(any_contains(&regs, PRIVACY_REGULATION_TERMS));
        let regs = vec!["SOX".to_string()];
        assert!(!any_contains(&regs, PRIVACY_REGULATION_TERMS));
    }

    #[test]
    fn test_sector_substring_match() {
        let profile = SystemProfile::new("s", "n", "d", AiSystemType::Other, "o")
            .with_industry_sector("Consumer Finance");
        assert!(sector_in(&profile, FAIRNESS_SENSITIVE_SECTORS));
        assert!(!sector_in(&profile, &HIGH_RELIABILITY_SECTORS[2..]));

        let none = SystemProfile::new("s", "n", "d", AiSystemType::Other, "o");
        assert!(!sector_in(&none, FAIRNESS_SENSITIVE_SECTORS));
    }
}
