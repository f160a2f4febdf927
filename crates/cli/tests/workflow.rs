//! The full signup -> review -> lead capture flow driven through the CLI
//! commands against a live server.

mod common;

use paymxnts_cli::commands::{self, AdminCommand, Command, LeadsCommand, Volume};
use paymxnts_core::types::DbId;
use paymxnts_db::VerificationStore;

async fn run(h: &common::Harness, command: Command) -> anyhow::Result<String> {
    let mut out = Vec::new();
    commands::run(command, &h.client, &h.cache, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

fn login(email: &str, password: &str) -> Command {
    Command::Login {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn add_lead(first: &str) -> Command {
    Command::Leads {
        command: LeadsCommand::Add {
            first_name: first.to_string(),
            last_name: "Baker".to_string(),
            business_name: "Corner Bakery".to_string(),
            phone: "(555) 987-6543".to_string(),
            email: "owner@cornerbakery.com".to_string(),
            zip_code: "94107".to_string(),
            volume: Volume::Over25k,
            notes: String::new(),
        },
    }
}

async fn pending_id(h: &common::Harness) -> DbId {
    h.store.list_pending_verifications().await.unwrap()[0].id
}

#[tokio::test]
async fn signup_review_and_capture_leads() {
    let h = common::start().await;

    let out = run(
        &h,
        Command::Signup {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "Ada@Example.com".into(),
            country_code: Some("+1".into()),
            phone: "5551234567".into(),
            password: common::AGENT_PASSWORD.into(),
            confirm_password: None,
            accept_terms: true,
        },
    )
    .await
    .unwrap();
    assert!(out.contains("submitted for ada@example.com"));
    assert!(out.contains("Pending approval"));

    let out = run(&h, login(common::ADMIN_EMAIL, common::ADMIN_PASSWORD)).await.unwrap();
    assert!(out.contains("(admin)"));

    let out = run(&h, Command::Admin { command: AdminCommand::Pending }).await.unwrap();
    assert!(out.contains("1 pending:"));
    assert!(out.contains("ada@example.com"));

    let id = pending_id(&h).await;
    let out = run(&h, Command::Admin { command: AdminCommand::Approve { id } })
        .await
        .unwrap();
    assert!(out.contains("<ada@example.com> is active"));

    let out = run(&h, Command::Admin { command: AdminCommand::Pending }).await.unwrap();
    assert!(out.contains("No pending verification requests."));

    run(&h, login("ada@example.com", common::AGENT_PASSWORD)).await.unwrap();
    let out = run(&h, Command::Whoami).await.unwrap();
    assert!(out.contains("Ada Lovelace <ada@example.com> (agent)"));
    assert!(out.contains("capture leads"));

    run(&h, add_lead("Sam")).await.unwrap();
    run(&h, add_lead("Max")).await.unwrap();
    let out = run(&h, Command::Leads { command: LeadsCommand::List }).await.unwrap();
    assert!(out.starts_with("2 leads, 2 new."));
    let max = out.find("Max Baker").unwrap();
    let sam = out.find("Sam Baker").unwrap();
    assert!(max < sam, "newest lead first");

    // An agent cannot use admin commands.
    let err = run(&h, Command::Admin { command: AdminCommand::Pending })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("needs an admin login"));
}

#[tokio::test]
async fn export_writes_csv_file() {
    let h = common::start().await;
    let request_id = {
        run(
            &h,
            Command::Signup {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: "ada@example.com".into(),
                country_code: None,
                phone: "+15551234567".into(),
                password: common::AGENT_PASSWORD.into(),
                confirm_password: None,
                accept_terms: true,
            },
        )
        .await
        .unwrap();
        pending_id(&h).await
    };
    run(&h, login(common::ADMIN_EMAIL, common::ADMIN_PASSWORD)).await.unwrap();
    run(&h, Command::Admin { command: AdminCommand::Approve { id: request_id } })
        .await
        .unwrap();
    run(&h, login("ada@example.com", common::AGENT_PASSWORD)).await.unwrap();

    let lead = {
        let mut out = Vec::new();
        commands::run(add_lead("Sam"), &h.client, &h.cache, &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let id: DbId = text
            .trim_start_matches("Lead #")
            .split(' ')
            .next()
            .unwrap()
            .parse()
            .unwrap();
        id
    };

    let dir = tempfile::tempdir().unwrap();
    let out = run(
        &h,
        Command::Leads {
            command: LeadsCommand::Export {
                id: lead,
                output: dir.path().to_path_buf(),
            },
        },
    )
    .await
    .unwrap();
    assert!(out.starts_with("Saved "));

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1);
    let name = entries[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("lead_Sam_Baker_"));
    let csv = std::fs::read_to_string(&entries[0]).unwrap();
    assert!(csv.contains("\"Over $25,000/Month\""));
}

#[tokio::test]
async fn validation_errors_are_shown_verbatim() {
    let h = common::start().await;

    let err = run(
        &h,
        Command::Signup {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            country_code: None,
            phone: "5551234567".into(),
            password: "one".into(),
            confirm_password: Some("two".into()),
            accept_terms: true,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Passwords do not match");

    let err = run(&h, login("ghost@example.com", "nope")).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid email or password");
    assert_eq!(h.cache.load().unwrap(), None);
}

#[tokio::test]
async fn logout_clears_cache_and_ends_server_session() {
    let h = common::start().await;
    run(&h, login(common::ADMIN_EMAIL, common::ADMIN_PASSWORD)).await.unwrap();
    let cached = h.cache.load().unwrap().unwrap();

    let out = run(&h, Command::Logout).await.unwrap();
    assert!(out.contains("Logged out."));
    assert_eq!(h.cache.load().unwrap(), None);

    let err = h.client.session(&cached.access_token).await.unwrap_err();
    assert!(err.is_unauthorized());

    let out = run(&h, Command::Whoami).await.unwrap();
    assert!(out.contains("Not logged in."));
}

#[tokio::test]
async fn commands_needing_a_session_refuse_when_logged_out() {
    let h = common::start().await;

    let err = run(&h, Command::Leads { command: LeadsCommand::List })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Not logged in"));
}
