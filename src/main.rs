use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use config_email_console::console::bulk::BulkOutcome;
use config_email_console::console::mutation::SubmitOutcome;
use config_email_console::console::view::LOAD_FAILED_MESSAGE;
use config_email_console::logging::init_logging;
use config_email_console::version::VERSION;
use config_email_console::{
    ConfigStatus, Console, ConsoleConfig, ConsoleError, HttpConfigEmailApi,
};

#[derive(Parser, Debug)]
#[command(author, version = VERSION, about = "Manage scheduled config email jobs", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend API base URL, overriding config file and environment
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all config email records
    List,
    /// Create a record
    Create(RecordEdits),
    /// Update an existing record
    Update {
        id: i64,
        #[command(flatten)]
        edits: RecordEdits,
    },
    /// Delete one or more records
    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Set status to `started` on the given records
    Start(Targets),
    /// Set status to `stopped` on the given records
    Stop(Targets),
    /// Set an arbitrary status on the given records
    SetStatus {
        status: ConfigStatus,
        #[command(flatten)]
        targets: Targets,
    },
    /// Download the report spreadsheet
    Export {
        /// Directory to write hospital_report.xlsx into
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RecordEdits {
    /// Field assignment such as `configName=Nightly` (repeatable)
    #[arg(short, long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,
    /// CC address to add (repeatable)
    #[arg(long = "cc", value_name = "EMAIL")]
    cc_add: Vec<String>,
    /// CC address to remove (repeatable)
    #[arg(long = "cc-remove", value_name = "EMAIL")]
    cc_remove: Vec<String>,
}

#[derive(Args, Debug)]
struct Targets {
    /// Record identifiers
    ids: Vec<i64>,
    /// Every currently listed record
    #[arg(long, conflicts_with = "ids")]
    all: bool,
}

fn confirm(message: &str) -> io::Result<bool> {
    print!("{message} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

async fn select_targets(console: &mut Console, targets: &Targets) -> Result<(), ConsoleError> {
    if targets.all {
        return console.toggle_all().await;
    }
    for &id in &targets.ids {
        if !console.selection().is_selected(id) {
            console.toggle_row(id);
        }
    }
    Ok(())
}

async fn save_record(
    console: &mut Console,
    id: Option<i64>,
    edits: &RecordEdits,
) -> Result<SubmitOutcome, ConsoleError> {
    let form = match id {
        Some(id) => console.open_edit_form(id).await?,
        None => console.open_create_form(),
    };
    for assignment in &edits.set {
        form.apply_assignment(assignment)?;
    }
    for email in &edits.cc_remove {
        form.remove_cc(email);
    }
    for email in &edits.cc_add {
        form.add_cc(email)?;
    }
    console.submit_form().await
}

async fn set_status(
    console: &mut Console,
    targets: &Targets,
    status: ConfigStatus,
) -> Result<(), ConsoleError> {
    select_targets(console, targets).await?;
    match console.set_selected_status(status).await? {
        BulkOutcome::NothingSelected => println!("No records selected."),
        BulkOutcome::Applied(count) => println!("Set status {status} on {count} record(s)."),
    }
    Ok(())
}

async fn run(
    cli: Cli,
    config: &ConsoleConfig,
    console: &mut Console,
) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::List => match console.render().await {
            Ok(table) => println!("{table}"),
            Err(e) => {
                eprintln!("{LOAD_FAILED_MESSAGE}");
                return Err(e.into());
            }
        },
        Command::Create(edits) => {
            save_record(console, None, &edits).await?;
            println!("Created.");
            println!("{}", console.render().await?);
        }
        Command::Update { id, edits } => {
            save_record(console, Some(id), &edits).await?;
            println!("Updated record {id}.");
            println!("{}", console.render().await?);
        }
        Command::Delete { ids, yes } => {
            let prompt = if let [id] = ids[..] {
                console.request_delete(id).await?.clone()
            } else {
                select_targets(console, &Targets { ids, all: false }).await?;
                match console.request_delete_selected() {
                    Some(prompt) => prompt.clone(),
                    None => return Ok(()),
                }
            };
            if !yes && !confirm(&prompt.message())? {
                console.cancel_delete();
                println!("Cancelled.");
                return Ok(());
            }
            let deleted = console.confirm_delete().await?;
            println!("Deleted {deleted} record(s).");
        }
        Command::Start(targets) => set_status(console, &targets, ConfigStatus::Started).await?,
        Command::Stop(targets) => set_status(console, &targets, ConfigStatus::Stopped).await?,
        Command::SetStatus { status, targets } => set_status(console, &targets, status).await?,
        Command::Export { out_dir } => {
            let dir = out_dir.unwrap_or_else(|| PathBuf::from(&config.report_dir));
            let path = console.export_report(&dir).await?;
            println!("Report saved to {}", path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = ConsoleConfig::load(cli.config.as_deref(), cli.base_url.as_deref())?;
    init_logging(&config.log_dir);
    info!(version = VERSION, base_url = %config.base_url, "Starting config email console.");
    if let Some(path) = &config.config_file {
        info!(path = ?path, "Loaded console config file.");
    }

    let api = HttpConfigEmailApi::new(&config.base_url, config.request_timeout())?;
    let mut console = Console::new(Arc::new(api));

    if let Err(e) = run(cli, &config, &mut console).await {
        if let Some(message) = console.form().and_then(|form| form.api_error()) {
            eprintln!("{message}");
        }
        if e
            .downcast_ref::<ConsoleError>()
            .is_some_and(ConsoleError::is_user_input)
        {
            eprintln!("Invalid input: {e}");
        }
        error!(error = %e, "Command failed.");
        return Err(e);
    }
    Ok(())
}
