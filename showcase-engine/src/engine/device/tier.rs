use serde::{Deserialize, Serialize};

/// Device capability tier. Variant order is the capability order, so tiers
/// compare with `<`/`>` for threshold decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    Low,
    #[default]
    Medium,
    High,
}

impl DeviceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_order_by_capability() {
        assert!(DeviceTier::Low < DeviceTier::Medium);
        assert!(DeviceTier::Medium < DeviceTier::High);
        assert_eq!(DeviceTier::default(), DeviceTier::Medium);
    }
}
