//! Score → opportunity band.

/// Ordered-threshold classification of a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OpportunityBand {
    Low,
    Medium,
    MediumHigh,
    High,
}

impl OpportunityBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::High
        } else if score >= 60.0 {
            Self::MediumHigh
        } else if score >= 40.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::MediumHigh => "Medium-High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Expected time to meaningful rankings.
    pub fn timeframe(&self) -> &'static str {
        match self {
            Self::High => "6-9 months",
            Self::MediumHigh => "9-12 months",
            Self::Medium => "12-18 months",
            Self::Low => "18-24 months",
        }
    }

    /// Organic traffic growth target for the KPI table.
    pub(crate) fn traffic_target(&self) -> &'static str {
        match self {
            Self::High => "+150% organic sessions",
            Self::MediumHigh => "+100% organic sessions",
            Self::Medium => "+60% organic sessions",
            Self::Low => "+30% organic sessions",
        }
    }

    /// Share of keywords expected in the top 10 after twelve months.
    pub(crate) fn top10_share(&self) -> f64 {
        match self {
            Self::High => 0.5,
            Self::MediumHigh => 0.4,
            Self::Medium => 0.3,
            Self::Low => 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(OpportunityBand::from_score(80.0), OpportunityBand::High);
        assert_eq!(
            OpportunityBand::from_score(79.99),
            OpportunityBand::MediumHigh
        );
        assert_eq!(
            OpportunityBand::from_score(60.0),
            OpportunityBand::MediumHigh
        );
        assert_eq!(OpportunityBand::from_score(40.0), OpportunityBand::Medium);
        assert_eq!(OpportunityBand::from_score(39.9), OpportunityBand::Low);
        assert_eq!(OpportunityBand::from_score(0.0), OpportunityBand::Low);
    }

    #[test]
    fn labels_and_timeframes() {
        let b = OpportunityBand::from_score(85.0);
        assert_eq!((b.label(), b.timeframe()), ("High", "6-9 months"));
        let b = OpportunityBand::from_score(65.0);
        assert_eq!((b.label(), b.timeframe()), ("Medium-High", "9-12 months"));
        let b = OpportunityBand::from_score(45.0);
        assert_eq!((b.label(), b.timeframe()), ("Medium", "12-18 months"));
        let b = OpportunityBand::from_score(10.0);
        assert_eq!((b.label(), b.timeframe()), ("Low", "18-24 months"));
    }
}
