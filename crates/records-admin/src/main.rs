//! # records-admin
//!
//! Administrative command line for the records office store.
//!
//! Usage:
//!   records-admin init                       - Create or repair the database file
//!   records-admin citizen register ...       - Register a citizen
//!   records-admin citizen archive <id>       - Archive and delete a citizen
//!   records-admin citizen restore <id>       - Restore a citizen from the archive
//!   records-admin request submit ...         - Submit a service request
//!   records-admin request status <id> <s>    - Move a request to a new status
//!   records-admin document upload ...        - Attach a document to a request
//!   records-admin document review <id> <s>   - Approve or reject a document
//!   records-admin archive list               - Browse archive records
//!
//! Every command prints its result as JSON on stdout.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use records_store::{ArchiveType, Database, DocumentStatus, RequestStatus, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "records-admin")]
#[command(about = "Records office database administration")]
#[command(version)]
struct Cli {
    /// Database file (overrides RECORDS_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database file, or repair and migrate an existing one
    Init,

    /// Manage citizens
    Citizen {
        #[command(subcommand)]
        action: CitizenCommands,
    },

    /// Manage service requests
    Request {
        #[command(subcommand)]
        action: RequestCommands,
    },

    /// Manage submitted documents
    Document {
        #[command(subcommand)]
        action: DocumentCommands,
    },

    /// Browse archive records
    Archive {
        #[command(subcommand)]
        action: ArchiveCommands,
    },
}

#[derive(Subcommand)]
enum CitizenCommands {
    /// Register a new citizen
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        /// Mobile number (09XXXXXXXXX, +639XXXXXXXXX or 639XXXXXXXXX)
        #[arg(long)]
        number: String,
        #[arg(short, long)]
        password: String,
    },
    /// List citizens
    List,
    /// Show one citizen
    Get { id: String },
    /// Edit a citizen's profile
    Update {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(long)]
        number: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Check a citizen's password
    Login {
        id: String,
        #[arg(short, long)]
        password: String,
    },
    /// Archive a citizen and delete the live record
    Archive {
        id: String,
        #[arg(short, long, default_value = "")]
        reason: String,
    },
    /// Restore a citizen from its most recent archive
    Restore { id: String },
}

#[derive(Subcommand)]
enum RequestCommands {
    /// Submit a service request for a citizen
    Submit {
        #[arg(short, long)]
        citizen: String,
        /// Service type, e.g. "Business Permit"
        #[arg(short = 't', long = "type")]
        service_type: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List requests
    List {
        /// Only requests of this citizen
        #[arg(short, long)]
        citizen: Option<String>,
    },
    /// Show one request
    Get { id: String },
    /// Set a request's status (REQUESTED, PROCESSING, COMPLETED, REJECTED)
    Status {
        id: String,
        status: RequestStatus,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Archive a completed or rejected request
    Archive {
        id: String,
        #[arg(short, long, default_value = "")]
        reason: String,
    },
    /// Delete a request
    Delete { id: String },
}

#[derive(Subcommand)]
enum DocumentCommands {
    /// Attach a document to a request
    Upload {
        #[arg(short, long)]
        request: String,
        /// Path of the stored file
        #[arg(short, long)]
        file: String,
    },
    /// List documents
    List {
        /// Only documents attached to this request
        #[arg(short, long)]
        request: Option<String>,
        /// Only documents of this citizen
        #[arg(short, long)]
        citizen: Option<String>,
    },
    /// Show one document
    Get { id: String },
    /// Review a document (PENDING, APPROVED, REJECTED)
    Review {
        id: String,
        status: DocumentStatus,
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Archive a rejected document
    Archive {
        id: String,
        #[arg(short, long, default_value = "")]
        reason: String,
    },
    /// Delete a document
    Delete { id: String },
}

#[derive(Subcommand)]
enum ArchiveCommands {
    /// List archive records
    List {
        /// DELETED_CITIZEN, COMPLETED_REQUEST, REJECTED_REQUEST or REJECTED_DOCUMENT
        #[arg(short = 't', long = "type")]
        archive_type: Option<ArchiveType>,
    },
    /// Show one archive record
    Get { id: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,records_store=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run_command(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = StoreConfig::from_env();
    if let Some(path) = cli.db {
        config.db_path = Some(path);
    }

    let mut db = Database::new(config)?;
    info!(
        path = %db.path().display(),
        outcome = ?db.load_outcome(),
        "Database opened"
    );

    match cli.command {
        Commands::Init => commands::print_json(&serde_json::json!({
            "path": db.path().display().to_string(),
            "outcome": format!("{:?}", db.load_outcome()),
        })),
        Commands::Citizen { action } => commands::handle_citizen_command(action, &mut db),
        Commands::Request { action } => commands::handle_request_command(action, &mut db),
        Commands::Document { action } => commands::handle_document_command(action, &mut db),
        Commands::Archive { action } => commands::handle_archive_command(action, &db),
    }
}
