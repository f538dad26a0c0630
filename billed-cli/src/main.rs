use anyhow::{Context, bail};
use billed_core::{
    BillForm, BillListService, BillsPage, ClientConfig, FormSurface, HttpStore, InMemoryStore,
    Navigator, ReceiptViewer, SelectedFile, Session, SessionUser, Store, SubmissionCoordinator,
    SubmissionState, SubmitEvent,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "billed", about = "Submit and list expense bills")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "BILLED_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Use a throwaway in-memory store instead of the backend
    #[arg(long)]
    in_memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List bills, most recent first
    List,
    /// Submit a new bill with its receipt
    Submit(SubmitArgs),
}

#[derive(Args)]
struct SubmitArgs {
    /// Submitter email
    #[arg(long, env = "BILLED_EMAIL")]
    email: String,
    /// Receipt image (jpg, jpeg or png)
    #[arg(long)]
    file: PathBuf,
    #[arg(long = "type", default_value = "Transports")]
    expense_type: String,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long)]
    amount: String,
    /// Expense date, YYYY-MM-DD
    #[arg(long)]
    date: String,
    #[arg(long, default_value = "")]
    vat: String,
    #[arg(long, default_value = "")]
    pct: String,
    #[arg(long, default_value = "")]
    commentary: String,
}

/// Stands in for the web page: warnings go to stderr, navigation and
/// receipts are logged.
struct Terminal;

impl FormSurface for Terminal {
    fn warn(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn clear_file_input(&self) {}

    fn set_submit_enabled(&self, enabled: bool) {
        info!("submit enabled: {}", enabled);
    }
}

impl Navigator for Terminal {
    fn on_navigate(&self, path: &str) {
        info!("navigating to {}", path);
    }
}

impl ReceiptViewer for Terminal {
    fn show_receipt(&self, file_url: &str) {
        println!("receipt: {}", file_url);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billed_core=info,billed_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let store = build_store(&cli)?;
    let terminal = Arc::new(Terminal);

    match cli.command {
        Command::List => print_bills(store, terminal).await,
        Command::Submit(args) => {
            let state = submit(store.clone(), terminal.clone(), args).await?;
            match state {
                SubmissionState::Done => print_bills(store, terminal).await,
                other => bail!("bill was not submitted ({:?})", other),
            }
        }
    }
}

fn build_store(cli: &Cli) -> anyhow::Result<Arc<dyn Store>> {
    if cli.in_memory {
        return Ok(Arc::new(InMemoryStore::new()));
    }

    let mut config = ClientConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url.clone());
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    info!("using backend {}", config.api_url);
    Ok(Arc::new(HttpStore::new(config)?))
}

async fn submit(
    store: Arc<dyn Store>,
    terminal: Arc<Terminal>,
    args: SubmitArgs,
) -> anyhow::Result<SubmissionState> {
    let session = Session::with_user(SessionUser::employee(args.email))?;
    let mut coordinator = SubmissionCoordinator::new(session, store, terminal.clone(), terminal);

    let file_name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .context("receipt path has no file name")?
        .to_string();
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let content_type = content_type_for(&file_name);

    if !coordinator
        .change_file(SelectedFile::new(file_name, content_type, bytes))?
        .is_accepted()
    {
        bail!("receipt rejected");
    }

    let mut event = SubmitEvent::new(BillForm {
        expense_type: args.expense_type,
        name: args.name,
        amount: args.amount,
        date: args.date,
        vat: args.vat,
        pct: args.pct,
        commentary: args.commentary,
    });
    let state = coordinator.handle_submit(&mut event).await;
    if let Some(id) = coordinator.bill_id() {
        println!("bill {}", id);
    }
    Ok(state)
}

fn content_type_for(file_name: &str) -> Option<&'static str> {
    match billed_core::validator::extension_of(file_name).as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

async fn print_bills(store: Arc<dyn Store>, terminal: Arc<Terminal>) -> anyhow::Result<()> {
    let service = BillListService::new(store, terminal.clone(), terminal);

    match service.load().await {
        BillsPage::Loaded(rows) => {
            println!(
                "{:<12} {:<24} {:<28} {:>8} {:<12}",
                "Date", "Type", "Nom", "Montant", "Statut"
            );
            for row in &rows {
                let amount = row
                    .record
                    .amount
                    .map(|amount| format!("{} €", amount))
                    .unwrap_or_default();
                println!(
                    "{:<12} {:<24} {:<28} {:>8} {:<12}",
                    row.display_date,
                    row.record.expense_type,
                    row.record.name,
                    amount,
                    row.display_status
                );
            }
            println!("{} bill(s)", rows.len());
            Ok(())
        }
        BillsPage::Error(message) => bail!(message),
    }
}
