use clap::Parser;
use customer_onboarding::application::onboarding::OnboardingService;
use customer_onboarding::domain::account_number::SecureAccountNumberAllocator;
use customer_onboarding::domain::ports::{CustomerStoreBox, NotifierBox};
use customer_onboarding::infrastructure::in_memory::InMemoryCustomerStore;
use customer_onboarding::infrastructure::notification::{LogNotifier, OutboxNotifier};
#[cfg(feature = "storage-rocksdb")]
use customer_onboarding::infrastructure::rocksdb::RocksDBStore;
use customer_onboarding::interfaces::attachments;
use customer_onboarding::interfaces::csv::outcome_writer::OutcomeWriter;
use customer_onboarding::interfaces::csv::submission_reader::SubmissionReader;
use customer_onboarding::interfaces::problem::ProblemDetail;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input submissions CSV file
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "ONBOARDING_DB_PATH")]
    db_path: Option<PathBuf>,

    /// File that outbound notifications are appended to, one JSON object per line.
    #[arg(long, env = "ONBOARDING_OUTBOX")]
    outbox: Option<PathBuf>,

    /// Sender address for notifications. Without it notifications are only logged.
    #[arg(long, env = "ONBOARDING_MAIL_SENDER")]
    mail_sender: Option<String>,

    /// Log filter, e.g. `info` or `customer_onboarding=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
}

/// Initializes the tracing subscriber. Logs go to stderr so stdout only carries results.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

#[cfg(not(feature = "storage-rocksdb"))]
const NO_ROCKSDB_WARNING: &str = "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage.";

fn open_store(db_path: Option<PathBuf>) -> Result<CustomerStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            // Always printed, independent of the log filter.
            eprintln!("WARNING: {}", NO_ROCKSDB_WARNING);
            warn!("{}", NO_ROCKSDB_WARNING);
            Ok(Box::new(InMemoryCustomerStore::new()))
        }
        None => Ok(Box::new(InMemoryCustomerStore::new())),
    }
}

fn build_notifier(
    outbox: Option<PathBuf>,
    mail_sender: Option<String>,
) -> (NotifierBox, Option<JoinHandle<()>>) {
    let sender = mail_sender.filter(|s| !s.trim().is_empty());
    match (outbox, sender) {
        (Some(path), Some(sender)) => {
            let (notifier, worker) = OutboxNotifier::spawn(path, sender);
            (Box::new(notifier), Some(worker))
        }
        (Some(_), None) => {
            warn!("Outbox configured without a mail sender; notifications will only be logged");
            (Box::new(LogNotifier), None)
        }
        (None, _) => (Box::new(LogNotifier), None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let store = open_store(cli.db_path)?;
    let (notifier, outbox_worker) = build_notifier(cli.outbox, cli.mail_sender);
    let service = OnboardingService::new(
        store,
        Box::new(SecureAccountNumberAllocator::new()),
        notifier,
    );

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = SubmissionReader::new(file);
    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());

    for (index, submission) in reader.submissions().enumerate() {
        let row = index + 1;
        let submission = match submission {
            Ok(submission) => submission,
            Err(e) => {
                error!(row, "Error reading submission: {}", e);
                continue;
            }
        };

        let id_proof = attachments::load(
            submission.id_proof.as_deref(),
            submission.id_proof_type.as_deref(),
        )
        .await;
        let photo = attachments::load(
            submission.photo.as_deref(),
            submission.photo_type.as_deref(),
        )
        .await;
        let (id_proof, photo) = match (id_proof, photo) {
            (Ok(id_proof), Ok(photo)) => (id_proof, photo),
            (Err(e), _) | (_, Err(e)) => {
                error!(row, "Error loading attachment: {}", e);
                continue;
            }
        };

        let request = submission.request();
        match service.onboard(&request, id_proof, photo).await {
            Ok(outcome) => writer
                .write_success(row, &request.email, &outcome)
                .into_diagnostic()?,
            Err(err) => {
                let instance = format!("{}#row={}", cli.input.display(), row);
                let problem = ProblemDetail::from_error(&err, instance);
                writer
                    .write_failure(row, &request.email, &problem)
                    .into_diagnostic()?;
            }
        }
    }
    writer.flush().into_diagnostic()?;

    // Dropping the service releases the last notifier handle so the outbox
    // writer can drain and stop.
    drop(service);
    if let Some(worker) = outbox_worker {
        worker.await.into_diagnostic()?;
    }

    Ok(())
}
