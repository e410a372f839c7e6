use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MarketMateError;

/// Event that fires an automated campaign.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    #[default]
    Manual,
    Subscription,
    CartAbandoned,
    Welcome,
    Reengagement,
}

impl TriggerType {
    pub const ALL: [TriggerType; 5] = [
        TriggerType::Manual,
        TriggerType::Subscription,
        TriggerType::CartAbandoned,
        TriggerType::Welcome,
        TriggerType::Reengagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::Manual => "manual",
            TriggerType::Subscription => "subscription",
            TriggerType::CartAbandoned => "cart_abandoned",
            TriggerType::Welcome => "welcome",
            TriggerType::Reengagement => "reengagement",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerType {
    type Err = MarketMateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| MarketMateError::Validation(format!("Unknown trigger type: {s}")))
    }
}

/// In-progress campaign data accumulated by the wizard, cleared on a
/// successful send.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub company_name: String,
    pub purpose: String,
    pub trigger_type: TriggerType,
    pub additional_details: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl CampaignDraft {
    /// Both fields required before the wizard may leave its first step.
    pub fn has_company_and_purpose(&self) -> bool {
        !self.company_name.trim().is_empty() && !self.purpose.trim().is_empty()
    }

    /// Reset to an empty draft after a successful send.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
