//! Wire-format request and response bodies for the backend contract.

use marketmate_core::{CampaignDraft, TriggerType};
use serde::{Deserialize, Serialize};

/// Body of `POST /login` and `POST /signup`.
#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /generate_email`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub company_name: String,
    pub purpose: String,
    pub trigger_type: TriggerType,
    pub additional_details: String,
}

impl From<&CampaignDraft> for GenerateRequest {
    fn from(draft: &CampaignDraft) -> Self {
        Self {
            company_name: draft.company_name.clone(),
            purpose: draft.purpose.clone(),
            trigger_type: draft.trigger_type,
            additional_details: draft.additional_details.clone(),
        }
    }
}

/// Body of `POST /send_email`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub trigger_type: TriggerType,
}

impl From<&CampaignDraft> for SendRequest {
    fn from(draft: &CampaignDraft) -> Self {
        Self {
            recipients: draft.recipients.clone(),
            subject: draft.subject.clone(),
            body: draft.body.clone(),
            trigger_type: draft.trigger_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    pub generated_email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SendResponse {
    pub message: String,
}

/// Shape of a non-2xx body; `message` is optional on purpose, the backend
/// does not guarantee one.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}
