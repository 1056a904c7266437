//! Dashboard CLI: a terminal front end to the collab service.
//!
//! Keeps the session in a credential file between runs, resolves it on
//! every start, and prints whatever the command asks for.
//!
//! ```text
//! COLLAB_API_URL=http://localhost:4000 cargo run -p dashboard -- login ada@example.com secret
//! cargo run -p dashboard -- tasks --status in-progress
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use collab::prelude::*;

/// Credential file used when neither the flag nor the environment names one.
const DEFAULT_TOKEN_FILE: &str = "collab-dashboard-token";

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Workspaces, projects and tasks from the terminal")]
struct Cli {
    /// Where the session credential is kept between runs
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with email and password
    Login { email: String, password: String },

    /// Sign out and forget the stored credential
    Logout,

    /// Show who is signed in
    Whoami,

    /// List the workspaces you belong to
    Workspaces,

    /// List the projects in a workspace
    Projects { workspace_id: String },

    /// List the tasks assigned to you
    Tasks {
        /// Only tasks in this status (todo, in-progress, done)
        #[arg(long)]
        status: Option<TaskStatus>,
    },

    /// Move a task to a new status
    Move { task_id: String, status: TaskStatus },

    /// Summarize a task description
    Summarize { text: String },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), CollabError> {
    collab::init_tracing();
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    config.credential_file = Some(token_file(cli.token_file, config.credential_file));
    let client = CollabClient::builder().config(config).build()?;

    let state = client.session().check_session().await;
    tracing::debug!(%state, "session resolved");

    run(&client, cli.command).await
}

/// Flag first, then environment, then the system temp directory.
fn token_file(flag: Option<PathBuf>, env: Option<PathBuf>) -> PathBuf {
    flag.or(env)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_TOKEN_FILE))
}

async fn run(client: &CollabClient, command: Command) -> Result<(), CollabError> {
    let session = client.session();
    let gateway = client.gateway();

    match command {
        Command::Login { email, password } => {
            let user = session.login(&email, &password).await?;
            println!("signed in as {} ({})", user.email, user.global_status);
        }
        Command::Logout => {
            if let Some(notification) = session.logout() {
                // Let the service hear about it before the process exits.
                let _ = notification.await;
            }
            println!("signed out");
        }
        Command::Whoami => println!("{}", session.state()),
        Command::Workspaces => {
            require_session(client)?;
            for workspace in gateway.my_workspaces().await {
                println!(
                    "{}  {}  ({} members)",
                    workspace.id,
                    workspace.name,
                    workspace.members.len()
                );
            }
        }
        Command::Projects { workspace_id } => {
            require_session(client)?;
            let workspace_id = WorkspaceId::from(workspace_id.as_str());
            for project in gateway.workspace_projects(&workspace_id).await {
                println!(
                    "{}  {}  {}",
                    project.id,
                    project.name,
                    project.description.unwrap_or_default()
                );
            }
        }
        Command::Tasks { status } => {
            require_session(client)?;
            let tasks = gateway.my_assigned_tasks(status).await?;
            let counts = TaskStatusCounts::tally(&tasks);
            for task in &tasks {
                let due = task.due_date.as_deref().unwrap_or("-");
                println!("{}  [{}]  {}  due {}", task.id, task.status, task.title, due);
            }
            println!(
                "{} todo, {} in progress, {} done",
                counts.todo, counts.in_progress, counts.done
            );
        }
        Command::Move { task_id, status } => {
            require_session(client)?;
            let task = gateway
                .update_task(&TaskId::from(task_id.as_str()), status)
                .await?;
            println!("{} is now {}", task.title, task.status);
        }
        Command::Summarize { text } => {
            require_session(client)?;
            let summary = gateway.summarize_task(&text).await?;
            if summary.source == SummarySource::Fallback {
                tracing::info!("summarizer unavailable, showing an excerpt");
            }
            println!("{}", summary.text);
        }
    }
    Ok(())
}

fn require_session(client: &CollabClient) -> Result<(), CollabError> {
    if client.session().is_authenticated() {
        Ok(())
    } else {
        Err(SessionError::NotAuthenticated.into())
    }
}
