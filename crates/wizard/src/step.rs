use serde::{Deserialize, Serialize};

/// The wizard's bounded step sequence. Saturating navigation keeps the step
/// inside the valid range by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    CompanyPurpose,
    TriggerContext,
    PreviewSend,
}

impl WizardStep {
    pub fn index(self) -> u8 {
        match self {
            WizardStep::CompanyPurpose => 0,
            WizardStep::TriggerContext => 1,
            WizardStep::PreviewSend => 2,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(WizardStep::CompanyPurpose),
            1 => Some(WizardStep::TriggerContext),
            2 => Some(WizardStep::PreviewSend),
            _ => None,
        }
    }

    /// The following step; saturates at the last one.
    pub fn next(self) -> Self {
        match self {
            WizardStep::CompanyPurpose => WizardStep::TriggerContext,
            WizardStep::TriggerContext => WizardStep::PreviewSend,
            WizardStep::PreviewSend => WizardStep::PreviewSend,
        }
    }

    /// The preceding step; saturates at the first one.
    pub fn prev(self) -> Self {
        match self {
            WizardStep::CompanyPurpose => WizardStep::CompanyPurpose,
            WizardStep::TriggerContext => WizardStep::CompanyPurpose,
            WizardStep::PreviewSend => WizardStep::TriggerContext,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::CompanyPurpose => "Company & Purpose",
            WizardStep::TriggerContext => "Trigger & Context",
            WizardStep::PreviewSend => "Preview & Send",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for index in 0..=2 {
            assert_eq!(WizardStep::from_index(index).unwrap().index(), index);
        }
        assert!(WizardStep::from_index(3).is_none());
    }

    #[test]
    fn test_navigation_saturates() {
        assert_eq!(WizardStep::CompanyPurpose.prev(), WizardStep::CompanyPurpose);
        assert_eq!(WizardStep::PreviewSend.next(), WizardStep::PreviewSend);
        assert_eq!(WizardStep::CompanyPurpose.next(), WizardStep::TriggerContext);
        assert_eq!(WizardStep::PreviewSend.prev(), WizardStep::TriggerContext);
    }
}
