//! Status classification

/// Tier metadata for a total score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMeta {
    pub status: &'static str,
    pub color_code: &'static str,
    pub message: &'static str,
}

/// Map a total score (0-90) to its health tier. Ordered thresholds,
/// first match wins.
pub fn classify(total_score: i32) -> StatusMeta {
    if total_score >= 85 {
        return StatusMeta {
            status: "secure",
            color_code: "#34C759",
            message: "Your digital world is secure!",
        };
    }
    if total_score >= 60 {
        return StatusMeta {
            status: "at_risk",
            color_code: "#FFCC00",
            message: "You're somewhat protected. Review suggestions below.",
        };
    }
    if total_score >= 40 {
        return StatusMeta {
            status: "vulnerable",
            color_code: "#FF9500",
            message: "You have multiple risks. Take action soon.",
        };
    }
    StatusMeta {
        status: "critical",
        color_code: "#FF3B30",
        message: "Critical vulnerabilities detected. Fix immediately!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(classify(90).status, "secure");
        assert_eq!(classify(85).status, "secure");
        assert_eq!(classify(84).status, "at_risk");
        assert_eq!(classify(60).status, "at_risk");
        assert_eq!(classify(59).status, "vulnerable");
        assert_eq!(classify(40).status, "vulnerable");
        assert_eq!(classify(39).status, "critical");
        assert_eq!(classify(0).status, "critical");
    }

    #[test]
    fn tiers_partition_full_range() {
        for score in 0..=90 {
            let meta = classify(score);
            let expected = match score {
                85..=90 => "secure",
                60..=84 => "at_risk",
                40..=59 => "vulnerable",
                _ => "critical",
            };
            assert_eq!(meta.status, expected, "score {}", score);
        }
    }

    #[test]
    fn color_codes_follow_tier() {
        assert_eq!(classify(88).color_code, "#34C759");
        assert_eq!(classify(70).color_code, "#FFCC00");
        assert_eq!(classify(45).color_code, "#FF9500");
        assert_eq!(classify(10).color_code, "#FF3B30");
    }
}
