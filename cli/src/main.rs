use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;
use urbancivic::geocode::GeocodeError;
use urbancivic::store::StoreError;
use urbancivic::{
    AppConfig, Category, FileStore, Issue, IssueFilter, NewIssue, NominatimClient, Origin, Role, Session,
    SessionError, Status, Tab,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("storage unavailable: {0}")]
    Store(#[from] StoreError),
    #[error("geocoder unavailable: {0}")]
    Geocode(#[from] GeocodeError),
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("issue {0} not found")]
    IssueNotFound(u64),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "urbancivic", about = "Report and track civic issues from the terminal")]
struct Cli {
    /// Directory of the local origin store.
    #[arg(long, env = "UC_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Log at info level (debug with -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List issues, most voted first.
    List {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        status: Option<Status>,
    },
    /// Print one issue as JSON.
    Show { id: u64 },
    /// File a new issue.
    Report {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "Pothole")]
        category: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Free-text location; resolved from the coordinates when omitted.
        #[arg(long)]
        location: Option<String>,
        #[arg(long, default_value = "")]
        desc: String,
        #[arg(long, default_value = "")]
        photo: String,
    },
    Upvote { id: u64 },
    Comment { id: u64, text: String },
    /// Change an issue's status (admin only).
    Status { id: u64, status: Status },
    /// Delete an issue (admin only).
    Delete { id: u64 },
    /// Show the current identity.
    Whoami,
    /// Switch identity.
    Login {
        #[arg(long)]
        user: String,
        #[arg(long, default_value = "user")]
        role: Role,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Resolve coordinates to an address.
    Geocode {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
    /// Issue counts by status.
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = AppConfig::from_env();
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }

    let origin = Origin::new(FileStore::open(config.storage_dir.clone())?);
    let geocoder = NominatimClient::new(&config.geocode)?;
    let mut session = Session::open(origin.open_tab(), Arc::new(geocoder));

    run(&mut session, cli.command).await
}

async fn run(session: &mut Session<Tab>, command: Command) -> Result<(), CliError> {
    match command {
        Command::List { query, category, status } => {
            let filter = IssueFilter { query, category: category.map(Category::from), status };
            for issue in session.search(&filter) {
                println!("{}", summary_line(issue));
            }
        }
        Command::Show { id } => {
            let issue = session.issue(id).ok_or(CliError::IssueNotFound(id))?;
            print_json(&serde_json::to_value(issue)?)?;
        }
        Command::Report { title, category, lat, lon, location, desc, photo } => {
            let location = match location.filter(|l| !l.trim().is_empty()) {
                Some(location) => location,
                None => session.resolve_address(lat, lon).await,
            };
            let id = session.submit_issue(NewIssue {
                title,
                category: Category::from(category),
                location,
                desc,
                photo,
                lat,
                lon,
            })?;
            println!("reported issue #{id}");
        }
        Command::Upvote { id } => {
            let votes = session.upvote(id)?;
            println!("issue #{id} now has {votes} votes");
        }
        Command::Comment { id, text } => {
            session.add_comment(id, &text)?;
            println!("comment added to issue #{id}");
        }
        Command::Status { id, status } => {
            session.set_status(id, status)?;
            println!("issue #{id} is now {status}");
        }
        Command::Delete { id } => {
            let removed = session.delete_issue(id)?;
            println!("deleted issue #{id}: {}", removed.title);
        }
        Command::Whoami => {
            println!("{} ({})", session.current_user(), session.role());
        }
        Command::Login { user, role, avatar } => {
            session.set_current_user(&user);
            session.set_role(role);
            if let Some(avatar) = avatar {
                session.set_profile_pic(&avatar);
            }
            println!("signed in as {} ({})", session.current_user(), session.role());
        }
        Command::Geocode { lat, lon } => {
            println!("{}", session.resolve_address(lat, lon).await);
        }
        Command::Stats => {
            print_json(&serde_json::to_value(session.stats())?)?;
        }
    }
    Ok(())
}

fn summary_line(issue: &Issue) -> String {
    format!(
        "#{:<4} {} [{}] {} - {} ({} votes, {} comments)",
        issue.id,
        issue.category.icon(),
        issue.status,
        issue.title,
        issue.location,
        issue.votes,
        issue.comments.len()
    )
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
