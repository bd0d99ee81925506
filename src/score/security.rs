//! Security score calculation

use std::collections::HashMap;

use crate::models::{DeductionRule, ThreatRecord};

/// Maximum points the security component can hold
pub const MAX_SECURITY: i32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityBreakdown {
    pub security_score: i32,
    pub security_deductions: i32,
}

impl SecurityBreakdown {
    /// Breakdown for a device with no unresolved threats
    pub const fn clean() -> Self {
        Self {
            security_score: MAX_SECURITY,
            security_deductions: 0,
        }
    }
}

/// Deduct per threat by exact (threat_type, severity) rule match. A pair
/// absent from the rule table deducts nothing. The summed deduction is
/// clamped to [0, MAX_SECURITY]; the score is its complement.
pub fn security_breakdown(threats: &[ThreatRecord], rules: &[DeductionRule]) -> SecurityBreakdown {
    if threats.is_empty() {
        return SecurityBreakdown::clean();
    }

    let table: HashMap<(&str, &str), i32> = rules
        .iter()
        .map(|r| ((r.threat_type.as_str(), r.severity.as_str()), r.deduction))
        .collect();

    let mut total_deduction: i32 = 0;
    for threat in threats {
        let key = (threat.threat_type.as_str(), threat.severity.as_str());
        total_deduction += table.get(&key).copied().unwrap_or(0);
    }

    if total_deduction > MAX_SECURITY {
        total_deduction = MAX_SECURITY;
    }

    SecurityBreakdown {
        security_score: (MAX_SECURITY - total_deduction).max(0),
        security_deductions: total_deduction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn threat(threat_type: &str, severity: &str) -> ThreatRecord {
        ThreatRecord {
            id: Uuid::new_v4(),
            device_id: Uuid::new_v4(),
            threat_type: threat_type.to_string(),
            severity: severity.to_string(),
            status: "active".to_string(),
            detected_at: Utc::now(),
            resolved_at: None,
            source: None,
            raw_payload: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn rule(threat_type: &str, severity: &str, deduction: i32) -> DeductionRule {
        DeductionRule {
            id: 0,
            threat_type: threat_type.to_string(),
            severity: severity.to_string(),
            deduction,
        }
    }

    #[test]
    fn no_threats_short_circuits_to_max() {
        let out = security_breakdown(&[], &[]);
        assert_eq!(out.security_score, 60);
        assert_eq!(out.security_deductions, 0);
    }

    #[test]
    fn deductions_sum_by_exact_rule_match() {
        let threats = vec![threat("APP_ISSUE", "high"), threat("NETWORK_ISSUE", "low")];
        let rules = vec![
            rule("APP_ISSUE", "high", 15),
            rule("NETWORK_ISSUE", "low", 3),
            rule("DEVICE_ISSUE", "medium", 7),
        ];

        let out = security_breakdown(&threats, &rules);
        assert_eq!(out.security_deductions, 18);
        assert_eq!(out.security_score, 42);
    }

    #[test]
    fn unmapped_pair_deducts_nothing() {
        let threats = vec![threat("APP_ISSUE", "medium")];
        let rules = vec![rule("APP_ISSUE", "high", 15)];

        let out = security_breakdown(&threats, &rules);
        assert_eq!(out.security_deductions, 0);
        assert_eq!(out.security_score, 60);
    }

    #[test]
    fn total_deduction_clamps_at_max() {
        let threats = vec![
            threat("APP_ISSUE", "high"),
            threat("DEVICE_ISSUE", "high"),
            threat("NETWORK_ISSUE", "high"),
        ];
        let rules = vec![
            rule("APP_ISSUE", "high", 30),
            rule("DEVICE_ISSUE", "high", 25),
            rule("NETWORK_ISSUE", "high", 15),
        ];

        let out = security_breakdown(&threats, &rules);
        assert_eq!(out.security_deductions, 60);
        assert_eq!(out.security_score, 0);
    }

    #[test]
    fn score_and_deductions_are_complements() {
        let cases: Vec<Vec<ThreatRecord>> = vec![
            vec![],
            vec![threat("APP_ISSUE", "high")],
            vec![threat("APP_ISSUE", "high"), threat("APP_ISSUE", "high")],
            vec![threat("UNSAFE_SITE", "low"), threat("OTHER", "medium")],
        ];
        let rules = vec![
            rule("APP_ISSUE", "high", 40),
            rule("UNSAFE_SITE", "low", 5),
            rule("OTHER", "medium", 7),
        ];

        for threats in cases {
            let out = security_breakdown(&threats, &rules);
            assert_eq!(out.security_score + out.security_deductions, MAX_SECURITY);
            assert!(out.security_deductions >= 0 && out.security_deductions <= MAX_SECURITY);
        }
    }
}
