//! MarketMate — marketing-automation dashboard shell.
//!
//! Thin interactive consumer of the core crates: composes the session store,
//! notification center, and campaign wizard into a line-oriented command
//! loop. All campaign logic lives in the library crates.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use marketmate_api_client::ApiClient;
use marketmate_core::config::AppConfig;
use marketmate_core::TriggerType;
use marketmate_notify::NotificationCenter;
use marketmate_session::{Navigator, Route, SessionStore};
use marketmate_wizard::{CampaignWizard, WizardStep};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "marketmate")]
#[command(about = "Marketing-automation dashboard shell")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides config)
    #[arg(long, env = "MARKETMATE__API__BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in milliseconds (overrides config)
    #[arg(long, env = "MARKETMATE__API__TIMEOUT_MS")]
    timeout_ms: Option<u64>,
}

/// Renders navigation signals as output lines; a graphical shell would swap
/// views here instead.
struct PrintingNavigator;

impl Navigator for PrintingNavigator {
    fn navigate(&self, route: Route) {
        info!(?route, "navigating");
        match route {
            Route::Login => println!("== login view =="),
            Route::Campaigns => println!("== campaign wizard =="),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketmate=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.api.timeout_ms = timeout_ms;
    }

    info!(base_url = %config.api.base_url, "MarketMate starting up");

    let client = ApiClient::new(&config.api)?;
    let notifications =
        NotificationCenter::new(Duration::from_millis(config.notifications.ttl_ms));
    let session = SessionStore::new(client.clone(), Arc::new(PrintingNavigator));
    let wizard = CampaignWizard::new(client, notifications.clone());

    println!("MarketMate shell. Type 'help' for commands.");
    run_shell(&session, &wizard, &notifications).await;

    Ok(())
}

async fn run_shell(
    session: &SessionStore,
    wizard: &CampaignWizard,
    notifications: &NotificationCenter,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let rest: Vec<&str> = parts.collect();

        match command {
            "help" => print_help(),
            "login" | "signup" => {
                let [email, password] = rest.as_slice() else {
                    println!("usage: {command} <email> <password>");
                    continue;
                };
                let result = if command == "login" {
                    session.login(email, password).await
                } else {
                    session.signup(email, password).await
                };
                match result {
                    Ok(()) => notifications.success(format!("Welcome, {email}")),
                    Err(err) => notifications.error(err.message),
                }
            }
            "logout" => session.logout(),
            "status" => print_status(session, wizard),
            "quit" | "exit" => break,
            // Everything below is the wizard; the session gates access to it.
            _ if !session.is_authenticated() => {
                println!("please log in first");
            }
            "set" => {
                if rest.len() < 2 {
                    println!("usage: set <company|purpose|trigger|details> <value>");
                    continue;
                }
                let value = rest[1..].join(" ");
                set_field(wizard, notifications, rest[0], value.trim());
            }
            "next" => wizard.advance(),
            "back" => wizard.retreat(),
            "goto" => {
                let step = rest
                    .first()
                    .and_then(|s| s.parse::<u8>().ok())
                    .and_then(WizardStep::from_index);
                match step {
                    Some(step) => wizard.select_step(step),
                    None => println!("usage: goto <0|1|2>"),
                }
            }
            "generate" => wizard.generate().await,
            "send" => wizard.send(&rest.join(" ")).await,
            other => println!("unknown command: {other}"),
        }

        if let Some(note) = notifications.current() {
            println!("[{:?}] {}", note.kind, note.message);
        }
    }
}

fn set_field(
    wizard: &CampaignWizard,
    notifications: &NotificationCenter,
    field: &str,
    value: &str,
) {
    match field {
        "company" => wizard.update_draft(|d| d.company_name = value.to_string()),
        "purpose" => wizard.update_draft(|d| d.purpose = value.to_string()),
        "details" => wizard.update_draft(|d| d.additional_details = value.to_string()),
        "trigger" => match value.parse::<TriggerType>() {
            Ok(trigger) => wizard.update_draft(|d| d.trigger_type = trigger),
            Err(err) => notifications.error(err.to_string()),
        },
        other => println!("unknown field: {other}"),
    }
}

fn print_status(session: &SessionStore, wizard: &CampaignWizard) {
    match session.identity() {
        Some(identity) => println!("logged in as {}", identity.email),
        None => println!("not logged in"),
    }
    let step = wizard.step();
    let draft = wizard.draft();
    println!("step {}: {}", step.index(), step.title());
    println!(
        "  company: {:?}  purpose: {:?}  trigger: {}",
        draft.company_name, draft.purpose, draft.trigger_type
    );
    if !draft.subject.is_empty() || !draft.body.is_empty() {
        println!("  subject: {:?}", draft.subject);
        println!("  body: {} chars", draft.body.len());
    }
}

fn print_help() {
    println!(
        "commands:\n\
         \x20 login <email> <password>   authenticate\n\
         \x20 signup <email> <password>  create an account\n\
         \x20 logout                     clear the session\n\
         \x20 set <field> <value>        edit the draft (company, purpose, trigger, details)\n\
         \x20 next | back | goto <n>     move between wizard steps\n\
         \x20 generate                   generate the email template (step 1)\n\
         \x20 send <a@b.com, c@d.com>    send the campaign (step 2)\n\
         \x20 status                     show session and draft state\n\
         \x20 quit"
    );
}
