use marketmate_api_client::{ApiClient, GenerateRequest, SendRequest};
use marketmate_core::CampaignDraft;
use marketmate_notify::NotificationCenter;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::parse::{parse_recipients, split_subject_body};
use crate::step::WizardStep;

/// Remote operation currently in flight. While one is pending, re-triggering
/// any gated operation is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    Generate,
    Send,
}

#[derive(Debug)]
struct WizardState {
    step: WizardStep,
    draft: CampaignDraft,
    pending: Option<PendingOp>,
}

/// The campaign wizard state machine.
///
/// Shared behind `&self`; the interior lock is never held across a remote
/// call, and each call's resolution is applied as one atomic state update.
pub struct CampaignWizard {
    client: ApiClient,
    notifications: NotificationCenter,
    state: Mutex<WizardState>,
}

impl CampaignWizard {
    /// New wizard at the first step with an empty draft.
    pub fn new(client: ApiClient, notifications: NotificationCenter) -> Self {
        Self {
            client,
            notifications,
            state: Mutex::new(WizardState {
                step: WizardStep::CompanyPurpose,
                draft: CampaignDraft::default(),
                pending: None,
            }),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.state.lock().step
    }

    pub fn draft(&self) -> CampaignDraft {
        self.state.lock().draft.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    /// Mutate draft fields in place (shell input handling).
    pub fn update_draft(&self, apply: impl FnOnce(&mut CampaignDraft)) {
        apply(&mut self.state.lock().draft);
    }

    /// Plain forward transition. Only the first step advances this way, and
    /// only once company and purpose are filled in; later steps move through
    /// [`generate`](Self::generate) and [`send`](Self::send).
    pub fn advance(&self) {
        let mut state = self.state.lock();
        match state.step {
            WizardStep::CompanyPurpose => {
                if state.draft.has_company_and_purpose() {
                    state.step = WizardStep::TriggerContext;
                } else {
                    drop(state);
                    self.notifications.error("Please select company and purpose");
                }
            }
            WizardStep::TriggerContext | WizardStep::PreviewSend => {}
        }
    }

    /// Move one step back; never errors, idempotent at the first step.
    pub fn retreat(&self) {
        let mut state = self.state.lock();
        state.step = state.step.prev();
    }

    /// Direct jump to any step. Deliberately permissive: the shell lets the
    /// user click any step tab directly, bypassing the gated path.
    pub fn select_step(&self, step: WizardStep) {
        self.state.lock().step = step;
    }

    /// Gated advance out of the trigger step: ask the backend for a template,
    /// and on success merge subject/body into the draft and move to the
    /// preview step. On failure the step and draft are untouched.
    pub async fn generate(&self) {
        let request = {
            let mut state = self.state.lock();
            if state.step != WizardStep::TriggerContext {
                debug!(step = ?state.step, "generate ignored outside trigger step");
                return;
            }
            if state.pending.is_some() {
                debug!("generate ignored, a call is already in flight");
                return;
            }
            state.pending = Some(PendingOp::Generate);
            GenerateRequest::from(&state.draft)
        };

        let result = self.client.generate_email(&request).await;

        let mut state = self.state.lock();
        state.pending = None;
        match result {
            Ok(text) => {
                let (subject, body) = split_subject_body(&text);
                state.draft.subject = subject;
                state.draft.body = body;
                state.step = WizardStep::PreviewSend;
                info!(company = %state.draft.company_name, "template generated");
                drop(state);
                self.notifications.success("Email template generated");
            }
            Err(err) => {
                drop(state);
                self.notifications
                    .error(err.user_message("Failed to generate email"));
            }
        }
    }

    /// Gated terminal transition: parse recipients, send the campaign, and on
    /// success clear the draft and reset to the first step. On failure
    /// everything is preserved so the user can retry.
    pub async fn send(&self, recipients_input: &str) {
        let request = {
            let mut state = self.state.lock();
            if state.step != WizardStep::PreviewSend {
                debug!(step = ?state.step, "send ignored outside preview step");
                return;
            }
            if state.pending.is_some() {
                debug!("send ignored, a call is already in flight");
                return;
            }

            let recipients = parse_recipients(recipients_input);
            if recipients.is_empty() {
                drop(state);
                self.notifications
                    .error("Please enter at least one recipient email");
                return;
            }
            state.draft.recipients = recipients;
            state.pending = Some(PendingOp::Send);
            SendRequest::from(&state.draft)
        };

        let result = self.client.send_email(&request).await;

        let mut state = self.state.lock();
        state.pending = None;
        match result {
            Ok(message) => {
                info!(recipients = request.recipients.len(), "campaign sent");
                state.draft.clear();
                state.step = WizardStep::CompanyPurpose;
                drop(state);
                self.notifications.success(message);
            }
            Err(err) => {
                drop(state);
                self.notifications
                    .error(err.user_message("Failed to send email"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketmate_core::config::ApiConfig;
    use marketmate_core::TriggerType;
    use marketmate_notify::NotificationKind;
    use std::io::Write as _;
    use std::sync::Arc;

    fn wizard_for(server: &mockito::Server) -> CampaignWizard {
        let client = ApiClient::new(&ApiConfig {
            base_url: server.url(),
            timeout_ms: 2000,
        })
        .unwrap();
        CampaignWizard::new(client, NotificationCenter::default())
    }

    fn fill_step_zero(wizard: &CampaignWizard) {
        wizard.update_draft(|draft| {
            draft.company_name = "Acme".into();
            draft.purpose = "Product launch".into();
        });
    }

    fn notification(wizard: &CampaignWizard) -> marketmate_notify::Notification {
        wizard.notifications.current().expect("notification present")
    }

    #[tokio::test]
    async fn test_advance_blocked_without_company_and_purpose() {
        let server = mockito::Server::new_async().await;
        let wizard = wizard_for(&server);

        wizard.update_draft(|draft| draft.company_name = "Acme".into());
        wizard.advance();

        assert_eq!(wizard.step(), WizardStep::CompanyPurpose);
        let note = notification(&wizard);
        assert_eq!(note.message, "Please select company and purpose");
        assert_eq!(note.kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn test_advance_with_valid_fields_moves_one_step() {
        let server = mockito::Server::new_async().await;
        let wizard = wizard_for(&server);
        fill_step_zero(&wizard);

        wizard.advance();
        assert_eq!(wizard.step(), WizardStep::TriggerContext);

        // A second plain advance does nothing; step 1 exits through generate.
        wizard.advance();
        assert_eq!(wizard.step(), WizardStep::TriggerContext);
    }

    #[tokio::test]
    async fn test_retreat_is_idempotent_at_first_step() {
        let server = mockito::Server::new_async().await;
        let wizard = wizard_for(&server);

        wizard.retreat();
        assert_eq!(wizard.step(), WizardStep::CompanyPurpose);

        wizard.select_step(WizardStep::PreviewSend);
        wizard.retreat();
        assert_eq!(wizard.step(), WizardStep::TriggerContext);
    }

    #[tokio::test]
    async fn test_generate_success_merges_template_and_advances() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generate_email")
            .with_status(200)
            .with_body(r#"{"generated_email":"Welcome!\n\nThanks for joining."}"#)
            .create_async()
            .await;

        let wizard = wizard_for(&server);
        fill_step_zero(&wizard);
        wizard.advance();

        wizard.generate().await;

        let draft = wizard.draft();
        assert_eq!(draft.subject, "Welcome!");
        assert_eq!(draft.body, "Thanks for joining.");
        assert_eq!(wizard.step(), WizardStep::PreviewSend);
        assert_eq!(notification(&wizard).kind, NotificationKind::Success);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_failure_leaves_state_untouched() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/generate_email")
            .with_status(503)
            .with_body(r#"{"message":"model unavailable"}"#)
            .create_async()
            .await;

        let wizard = wizard_for(&server);
        fill_step_zero(&wizard);
        wizard.advance();
        let before = wizard.draft();

        wizard.generate().await;

        assert_eq!(wizard.step(), WizardStep::TriggerContext);
        assert_eq!(wizard.draft(), before);
        let note = notification(&wizard);
        assert_eq!(note.message, "model unavailable");
        assert_eq!(note.kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn test_generate_failure_default_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/generate_email")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let wizard = wizard_for(&server);
        fill_step_zero(&wizard);
        wizard.advance();

        wizard.generate().await;
        assert_eq!(notification(&wizard).message, "Failed to generate email");
    }

    #[tokio::test]
    async fn test_send_with_no_recipients_never_hits_the_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/send_email")
            .expect(0)
            .create_async()
            .await;

        let wizard = wizard_for(&server);
        wizard.select_step(WizardStep::PreviewSend);

        wizard.send(" , ,, ").await;

        assert_eq!(wizard.step(), WizardStep::PreviewSend);
        let note = notification(&wizard);
        assert_eq!(note.message, "Please enter at least one recipient email");
        assert_eq!(note.kind, NotificationKind::Error);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_success_resets_wizard_and_surfaces_server_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/send_email")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "recipients": ["a@example.com", "b@example.com"],
                "subject": "Welcome!",
                "triggerType": "welcome"
            })))
            .with_status(200)
            .with_body(r#"{"message":"Emails sent successfully"}"#)
            .create_async()
            .await;

        let wizard = wizard_for(&server);
        fill_step_zero(&wizard);
        wizard.update_draft(|draft| {
            draft.trigger_type = TriggerType::Welcome;
            draft.subject = "Welcome!".into();
            draft.body = "Thanks for joining.".into();
        });
        wizard.select_step(WizardStep::PreviewSend);

        wizard.send("a@example.com, b@example.com").await;

        assert_eq!(wizard.step(), WizardStep::CompanyPurpose);
        assert_eq!(wizard.draft(), CampaignDraft::default());
        let note = notification(&wizard);
        assert_eq!(note.message, "Emails sent successfully");
        assert_eq!(note.kind, NotificationKind::Success);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_failure_preserves_draft_for_retry() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/send_email")
            .with_status(429)
            .with_body(r#"{"message":"rate limited"}"#)
            .create_async()
            .await;

        let wizard = wizard_for(&server);
        fill_step_zero(&wizard);
        wizard.update_draft(|draft| {
            draft.subject = "Hi".into();
            draft.body = "There".into();
        });
        wizard.select_step(WizardStep::PreviewSend);

        wizard.send("a@example.com").await;

        assert_eq!(wizard.step(), WizardStep::PreviewSend);
        let draft = wizard.draft();
        assert_eq!(draft.subject, "Hi");
        assert_eq!(draft.recipients, vec!["a@example.com".to_string()]);
        let note = notification(&wizard);
        assert_eq!(note.message, "rate limited");
        assert_eq!(note.kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn test_double_submit_issues_one_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generate_email")
            .with_chunked_body(|writer| {
                // Hold the first call open long enough for the second
                // trigger to observe the pending guard.
                std::thread::sleep(std::time::Duration::from_millis(200));
                writer.write_all(br#"{"generated_email":"Hi\n\nThere"}"#)
            })
            .expect(1)
            .create_async()
            .await;

        let wizard = Arc::new(wizard_for(&server));
        fill_step_zero(&wizard);
        wizard.advance();

        let first = {
            let wizard = wizard.clone();
            tokio::spawn(async move { wizard.generate().await })
        };
        // Give the first call time to mark itself pending.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(wizard.is_pending());
        wizard.generate().await;

        first.await.unwrap();
        assert!(!wizard.is_pending());
        assert_eq!(wizard.step(), WizardStep::PreviewSend);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_outside_trigger_step_is_a_no_op() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generate_email")
            .expect(0)
            .create_async()
            .await;

        let wizard = wizard_for(&server);
        wizard.generate().await;
        assert_eq!(wizard.step(), WizardStep::CompanyPurpose);
        mock.assert_async().await;
    }
}
