//! Liquidation risk classification.
//!
//! Pure functions of the health factor. Comparisons run on the exact decoded
//! value; nothing is rounded first.

use sentinel_chain::HealthFactor;
use serde::Serialize;

/// Health factor at or above which intensity is zero.
const INTENSITY_SAFE_HF: f64 = 2.0;
/// Health factor at or below which intensity is one.
const INTENSITY_LIQUIDATION_HF: f64 = 1.0;

/// Discrete risk tier, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// No debt, health factor is infinite
    NoDebt,
    /// HF > 2.0
    Safe,
    /// 1.5 < HF <= 2.0
    Healthy,
    /// 1.1 < HF <= 1.5
    Moderate,
    /// 1.0 < HF <= 1.1
    Danger,
    /// HF <= 1.0
    Liquidatable,
}

impl RiskTier {
    /// Classify a health factor. First matching threshold wins.
    pub fn classify(hf: HealthFactor) -> Self {
        match hf {
            HealthFactor::Infinite => Self::NoDebt,
            HealthFactor::Finite(v) => Self::from_value(v),
        }
    }

    /// Classify a raw f64, treating `+inf` as no debt.
    pub fn from_value(hf: f64) -> Self {
        if hf == f64::INFINITY {
            Self::NoDebt
        } else if hf > 2.0 {
            Self::Safe
        } else if hf > 1.5 {
            Self::Healthy
        } else if hf > 1.1 {
            Self::Moderate
        } else if hf > 1.0 {
            Self::Danger
        } else {
            Self::Liquidatable
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoDebt => "No debt",
            Self::Safe => "Safe",
            Self::Healthy => "Healthy",
            Self::Moderate => "Moderate risk",
            Self::Danger => "DANGER",
            Self::Liquidatable => "LIQUIDATABLE",
        }
    }
}

/// Warning shown next to a position, independent of the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningClass {
    /// 1.0 < HF < 1.1
    Imminent,
    /// 1.1 <= HF < 1.5
    Advisory,
}

impl WarningClass {
    /// Warning for a health factor, if any.
    pub fn for_health_factor(hf: HealthFactor) -> Option<Self> {
        let v = hf.value()?;
        if v > 1.0 && v < 1.1 {
            Some(Self::Imminent)
        } else if (1.1..1.5).contains(&v) {
            Some(Self::Advisory)
        } else {
            None
        }
    }

    /// Display message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Imminent => "Liquidation imminent: repay debt or add collateral now",
            Self::Advisory => "Health factor below 1.5: consider reducing leverage",
        }
    }
}

/// Normalized risk intensity in `[0.0, 1.0]` for presentation.
///
/// 0 at HF >= 2.0 (and for no debt), 1 at HF <= 1.0, linear in between.
pub fn intensity(hf: HealthFactor) -> f64 {
    match hf {
        HealthFactor::Infinite => 0.0,
        HealthFactor::Finite(v) => ((INTENSITY_SAFE_HF - v)
            / (INTENSITY_SAFE_HF - INTENSITY_LIQUIDATION_HF))
            .clamp(0.0, 1.0),
    }
}

/// Everything derived from one health factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    pub warning: Option<WarningClass>,
    pub intensity: f64,
}

impl RiskAssessment {
    pub fn of(hf: HealthFactor) -> Self {
        Self {
            tier: RiskTier::classify(hf),
            warning: WarningClass::for_health_factor(hf),
            intensity: intensity(hf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(v: f64) -> RiskTier {
        RiskTier::classify(HealthFactor::Finite(v))
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier(1.0), RiskTier::Liquidatable);
        assert_eq!(tier(1.0000001), RiskTier::Danger);
        assert_eq!(tier(1.1), RiskTier::Danger);
        assert_eq!(tier(1.1000001), RiskTier::Moderate);
        assert_eq!(tier(1.5), RiskTier::Moderate);
        assert_eq!(tier(1.5000001), RiskTier::Healthy);
        assert_eq!(tier(2.0), RiskTier::Healthy);
        assert_eq!(tier(2.0000001), RiskTier::Safe);
    }

    #[test]
    fn test_tier_extremes() {
        assert_eq!(RiskTier::classify(HealthFactor::Infinite), RiskTier::NoDebt);
        assert_eq!(RiskTier::from_value(f64::INFINITY), RiskTier::NoDebt);
        assert_eq!(tier(0.0), RiskTier::Liquidatable);
        assert_eq!(tier(1e30), RiskTier::Safe);
    }

    #[test]
    fn test_tier_ordering_is_urgency() {
        assert!(RiskTier::Liquidatable > RiskTier::Danger);
        assert!(RiskTier::Danger > RiskTier::Moderate);
        assert!(RiskTier::Safe > RiskTier::NoDebt);
    }

    #[test]
    fn test_warning_classes() {
        let warn = |v| WarningClass::for_health_factor(HealthFactor::Finite(v));
        assert_eq!(warn(1.0), None);
        assert_eq!(warn(1.05), Some(WarningClass::Imminent));
        assert_eq!(warn(1.1), Some(WarningClass::Advisory));
        assert_eq!(warn(1.4999), Some(WarningClass::Advisory));
        assert_eq!(warn(1.5), None);
        assert_eq!(warn(0.5), None);
        assert_eq!(WarningClass::for_health_factor(HealthFactor::Infinite), None);
    }

    #[test]
    fn test_intensity() {
        assert_eq!(intensity(HealthFactor::Infinite), 0.0);
        assert_eq!(intensity(HealthFactor::Finite(3.0)), 0.0);
        assert_eq!(intensity(HealthFactor::Finite(1.5)), 0.5);
        assert_eq!(intensity(HealthFactor::Finite(1.0)), 1.0);
        assert_eq!(intensity(HealthFactor::Finite(0.2)), 1.0);
    }

    #[test]
    fn test_assessment_is_idempotent() {
        let hf = HealthFactor::Finite(1.05);
        assert_eq!(RiskAssessment::of(hf), RiskAssessment::of(hf));
        assert_eq!(RiskAssessment::of(hf).tier, RiskTier::Danger);
        assert_eq!(RiskAssessment::of(hf).warning, Some(WarningClass::Imminent));
    }
}
