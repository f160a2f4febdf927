//! Command-line surface and command implementations.
//!
//! Commands write their human-readable output to the supplied writer so the
//! binary can print to stdout and tests can capture it.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::StreamExt;
use paymxnts_core::lead::{VOLUME_OVER_25K, VOLUME_UNDER_25K};
use paymxnts_core::navigation::Route;
use paymxnts_core::roles::{ROLE_ADMIN, ROLE_AGENT};
use paymxnts_core::types::DbId;
use tokio_tungstenite::tungstenite::Message;

use crate::client::{ApiClient, LeadForm, SignupForm, Verification};
use crate::session::{self, Resumed};
use crate::session_cache::{CachedSession, SessionCache};

/// PaymXnts lead capture client.
#[derive(Debug, Parser)]
#[command(name = "paymxnts", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// API server root URL
    #[arg(
        long,
        global = true,
        env = "PAYMXNTS_SERVER",
        default_value = "http://127.0.0.1:3000"
    )]
    pub server: String,

    /// Log filter (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PAYMXNTS_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply for an agent account
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Dial prefix, e.g. +1
        #[arg(long)]
        country_code: Option<String>,
        #[arg(long)]
        phone: String,
        #[arg(long, env = "PAYMXNTS_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to --password
        #[arg(long)]
        confirm_password: Option<String>,
        /// Accept the Terms & Policies
        #[arg(long)]
        accept_terms: bool,
    },

    /// Log in as an agent or admin
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PAYMXNTS_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End every session of the signed-in principal
    Logout,

    /// Resume the cached session and show where it lands
    Whoami,

    /// Lead capture (agents)
    Leads {
        #[command(subcommand)]
        command: LeadsCommand,
    },

    /// Verification review (admins)
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum LeadsCommand {
    /// Submit a new lead
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        business_name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        zip_code: String,
        #[arg(long, value_enum)]
        volume: Volume,
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List your leads, newest first
    List,

    /// Save one lead as a CSV file
    Export {
        id: DbId,
        /// Directory to write into
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Show the pending verification queue
    Pending,
    /// Approve a request and create the agent
    Approve { id: DbId },
    /// Reject and remove a request
    Reject { id: DbId },
    /// Follow the pending queue live
    Watch,
}

/// Monthly credit processing volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Volume {
    Under25k,
    Over25k,
}

impl Volume {
    pub fn label(self) -> &'static str {
        match self {
            Volume::Under25k => VOLUME_UNDER_25K,
            Volume::Over25k => VOLUME_OVER_25K,
        }
    }
}

/// Run one command against `client`, using `cache` for the session.
pub async fn run(
    command: Command,
    client: &ApiClient,
    cache: &SessionCache,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    match command {
        Command::Signup {
            first_name,
            last_name,
            email,
            country_code,
            phone,
            password,
            confirm_password,
            accept_terms,
        } => {
            let form = SignupForm {
                first_name,
                last_name,
                email,
                country_code,
                phone,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
                accepted_terms: accept_terms,
            };
            let receipt = client.signup(&form).await?;
            writeln!(
                out,
                "Request #{} submitted for {}.",
                receipt.request.id, receipt.request.email
            )?;
            writeln!(out, "{}", describe_route(&receipt.route))?;
        }

        Command::Login { email, password } => {
            let tokens = client.login(&email, &password).await?;
            let route = tokens.route.clone();
            let session = CachedSession::from(tokens);
            cache.store(&session)?;
            writeln!(
                out,
                "Logged in as {} <{}> ({}).",
                session.principal.name, session.principal.email, session.principal.role
            )?;
            writeln!(out, "{}", describe_route(&route))?;
        }

        Command::Logout => {
            // Clear locally even if the server call fails.
            let result = match cache.load()? {
                Some(session) => client.logout(&session.access_token).await,
                None => Ok(()),
            };
            cache.clear()?;
            if let Err(e) = result {
                if !e.is_unauthorized() {
                    return Err(e).context("Server logout failed; local session removed");
                }
            }
            writeln!(out, "Logged out.")?;
            writeln!(out, "{}", describe_route(&Route::Landing))?;
        }

        Command::Whoami => match session::resume(client, cache).await? {
            Resumed::Landing => {
                writeln!(out, "Not logged in.")?;
                writeln!(out, "{}", describe_route(&Route::Landing))?;
            }
            Resumed::Active { info, .. } => {
                writeln!(
                    out,
                    "{} <{}> ({}), session #{}.",
                    info.principal.name, info.principal.email, info.principal.role, info.session_id
                )?;
                writeln!(out, "{}", describe_route(&info.route))?;
            }
        },

        Command::Leads { command } => {
            let session = session::require(client, cache, Some(ROLE_AGENT)).await?;
            run_leads(command, client, &session, out).await?;
        }

        Command::Admin { command } => {
            let session = session::require(client, cache, Some(ROLE_ADMIN)).await?;
            run_admin(command, client, &session, out).await?;
        }
    }
    Ok(())
}

async fn run_leads(
    command: LeadsCommand,
    client: &ApiClient,
    session: &CachedSession,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    let token = &session.access_token;
    match command {
        LeadsCommand::Add {
            first_name,
            last_name,
            business_name,
            phone,
            email,
            zip_code,
            volume,
            notes,
        } => {
            let form = LeadForm {
                first_name,
                last_name,
                business_name,
                phone,
                email_address: email,
                zip_code,
                credit_processing_volume: volume.label().to_string(),
                notes,
            };
            let lead = client.create_lead(token, &form).await?;
            writeln!(
                out,
                "Lead #{} saved: {} {} ({}).",
                lead.id, lead.first_name, lead.last_name, lead.business_name
            )?;
        }

        LeadsCommand::List => {
            let list = client.list_leads(token).await?;
            writeln!(out, "{} leads, {} new.", list.total, list.new_count)?;
            for lead in &list.leads {
                writeln!(
                    out,
                    "#{:<5} {:<24} {:<24} {:<20} {:<6} {}",
                    lead.id,
                    format!("{} {}", lead.first_name, lead.last_name),
                    lead.business_name,
                    lead.credit_processing_volume,
                    lead.status,
                    lead.created_at.format("%Y-%m-%d %H:%M"),
                )?;
            }
        }

        LeadsCommand::Export { id, output } => {
            let csv = client.export_lead(token, id).await?;
            let path = output.join(&csv.file_name);
            std::fs::write(&path, &csv.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            writeln!(out, "Saved {}.", path.display())?;
        }
    }
    Ok(())
}

async fn run_admin(
    command: AdminCommand,
    client: &ApiClient,
    session: &CachedSession,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    let token = &session.access_token;
    match command {
        AdminCommand::Pending => {
            let pending = client.list_pending(token).await?;
            write_queue(out, &pending)?;
        }

        AdminCommand::Approve { id } => {
            let agent = client.approve(token, id).await?;
            writeln!(
                out,
                "Approved request #{id}: agent #{} {} {} <{}> is {}.",
                agent.id, agent.first_name, agent.last_name, agent.email, agent.status
            )?;
        }

        AdminCommand::Reject { id } => {
            client.reject(token, id).await?;
            writeln!(out, "Rejected request #{id}.")?;
        }

        AdminCommand::Watch => watch(client, session, out).await?,
    }
    Ok(())
}

/// Print every queue snapshot until the feed closes or Ctrl-C.
async fn watch(
    client: &ApiClient,
    session: &CachedSession,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    let (mut socket, _) = tokio_tungstenite::connect_async(client.feed_url(&session.access_token))
        .await
        .context("Failed to open the verification feed")?;
    writeln!(out, "Watching pending verifications (Ctrl-C to stop).")?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            frame = socket.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let snapshot: FeedSnapshot = serde_json::from_str(&text)
                        .context("Unexpected message on the verification feed")?;
                    writeln!(out, "--- {} ---", chrono::Utc::now().format("%H:%M:%S"))?;
                    write_queue(out, &snapshot.data)?;
                }
                Some(Ok(Message::Close(_))) | None => {
                    writeln!(out, "Feed closed by the server.")?;
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("Verification feed error"),
            },
        }
    }
    Ok(())
}

#[derive(Debug, serde::Deserialize)]
struct FeedSnapshot {
    data: Vec<Verification>,
}

fn write_queue(out: &mut (dyn Write + Send), pending: &[Verification]) -> Result<()> {
    if pending.is_empty() {
        writeln!(out, "No pending verification requests.")?;
        return Ok(());
    }
    writeln!(out, "{} pending:", pending.len())?;
    for request in pending {
        writeln!(
            out,
            "#{:<5} {:<24} {:<30} {:<16} {}",
            request.id,
            format!("{} {}", request.first_name, request.last_name),
            request.email,
            request.phone,
            request.created_at.format("%Y-%m-%d %H:%M"),
        )?;
    }
    Ok(())
}

/// One line telling the user which screen they are on.
pub fn describe_route(route: &Route) -> String {
    match route {
        Route::Landing => "Next: log in or create an account.".to_string(),
        Route::Pending { email } => {
            format!("Pending approval: an admin will review the account for {email}.")
        }
        Route::AdminReview => "Next: review pending verifications (`paymxnts admin pending`).".to_string(),
        Route::LeadCreation => "Next: capture leads (`paymxnts leads add`).".to_string(),
    }
}
