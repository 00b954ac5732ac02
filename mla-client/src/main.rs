//! mla - MIDI analysis client
//!
//! Uploads a MIDI file to the analysis service, shows the rendered results,
//! and downloads the improved artifact when one was generated. Results are
//! handed between invocations through a named session.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mla_client::download::{DownloadLifecycle, DownloadTimings};
use mla_client::intake::{CandidateFile, SelectionSource};
use mla_client::render::render;
use mla_client::services::{HttpAnalysisClient, HttpArtifactClient, ServiceEndpoints};
use mla_client::upload::{Navigation, UploadController, UploadEvent};
use mla_client::{load_results_page, FileSessionStorage, ResultStore, SessionStorage};
use mla_common::config::{LoggingConfig, TomlConfig};
use mla_common::models::Goal;

/// Command-line arguments for mla
#[derive(Parser, Debug)]
#[command(name = "mla")]
#[command(about = "Analyze MIDI files and get improvement recommendations")]
#[command(version)]
struct Args {
    /// Config file (overrides MLA_CONFIG and the default location)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Analysis service base URL (overrides MLA_SERVICE_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    service_url: Option<String>,

    /// Named session holding the latest results
    #[arg(long, global = true, env = "MLA_SESSION", default_value = "default")]
    session: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a MIDI file for analysis and show the results
    Analyze {
        /// MIDI file (.mid or .midi)
        file: PathBuf,

        /// Analysis goal; repeat for several
        #[arg(long = "goal", value_name = "GOAL", value_parser = parse_goal)]
        goals: Vec<Goal>,

        /// Target genre (used with --goal genre)
        #[arg(long)]
        genre: Option<String>,

        /// Free-form notes for the analysis
        #[arg(long)]
        notes: Option<String>,

        /// Also generate an improved MIDI file
        #[arg(long)]
        auto_improve: bool,
    },

    /// Show the results stored in the session
    Results,

    /// Download the improved MIDI file from the stored results
    Download {
        /// Directory to save into (defaults to the configured output_dir)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Forget the session's stored results
    EndSession,
}

fn parse_goal(tag: &str) -> std::result::Result<Goal, String> {
    Goal::from_tag(tag).ok_or_else(|| {
        let known: Vec<&str> = Goal::ALL.iter().map(|g| g.tag()).collect();
        format!("unknown goal '{}' (expected one of: {})", tag, known.join(", "))
    })
}

fn stderr_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber: stderr, or the configured log file
fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_layer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = file_layer
        .is_none()
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(stderr_filter(&config.level))
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config warnings are emitted before the configured subscriber exists
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(stderr_filter("info"))
        .with_writer(std::io::stderr)
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || TomlConfig::load(args.config.as_deref()))
        .context("Failed to load configuration")?;

    init_logging(&config.logging)?;

    let service_url = config.resolve_service_url(args.service_url.as_deref());
    info!(service_url = %service_url, session = %args.session, "mla {}", env!("CARGO_PKG_VERSION"));

    let storage = FileSessionStorage::open(&config.session_root(), &args.session)
        .context("Failed to open session")?;
    let store = ResultStore::new(storage);
    let endpoints = ServiceEndpoints::new(service_url);

    match args.command {
        Command::Analyze {
            file,
            goals,
            genre,
            notes,
            auto_improve,
        } => {
            let request = AnalyzeArgs {
                file,
                goals,
                genre,
                notes,
                auto_improve,
            };
            analyze(&config, endpoints, &store, request).await
        }
        Command::Results => {
            print!("{}", load_results_page(&store));
            Ok(())
        }
        Command::Download { output_dir } => {
            let output_dir = output_dir
                .or_else(|| config.download.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            download(&config, endpoints, &store, output_dir).await
        }
        Command::EndSession => {
            store.storage().clear().context("Failed to clear session")?;
            info!(session = %args.session, "Session ended");
            Ok(())
        }
    }
}

struct AnalyzeArgs {
    file: PathBuf,
    goals: Vec<Goal>,
    genre: Option<String>,
    notes: Option<String>,
    auto_improve: bool,
}

impl AnalyzeArgs {
    /// Any preference flag given on the command line
    fn has_preferences(&self) -> bool {
        !self.goals.is_empty() || self.genre.is_some() || self.notes.is_some() || self.auto_improve
    }
}

/// Drive the upload page the way a user would, then show the results view
async fn analyze<S: SessionStorage>(
    config: &TomlConfig,
    endpoints: ServiceEndpoints,
    store: &ResultStore<S>,
    request: AnalyzeArgs,
) -> Result<()> {
    let service = HttpAnalysisClient::new(endpoints).context("Failed to build HTTP client")?;
    let mut controller = UploadController::new(service, store, config.include_preferences);

    if request.has_preferences() && !config.include_preferences {
        warn!(
            "--goal, --genre, --notes and --auto-improve are not sent; \
             set include_preferences = true in the config file to send them"
        );
    }

    let file = CandidateFile::from_path(&request.file)
        .with_context(|| format!("Cannot read {}", request.file.display()))?;
    controller
        .dispatch(UploadEvent::FileChosen {
            file,
            source: SelectionSource::Picker,
        })
        .await;
    if let Some(error) = &controller.page().error {
        bail!("{}", error.message);
    }

    for goal in request.goals {
        controller
            .dispatch(UploadEvent::GoalToggled { goal, checked: true })
            .await;
    }
    controller.dispatch(UploadEvent::GenreSelected(request.genre)).await;
    controller.dispatch(UploadEvent::NotesChanged(request.notes)).await;
    controller
        .dispatch(UploadEvent::AutoImproveToggled(request.auto_improve))
        .await;

    info!(
        file = %request.file.display(),
        label = controller.page().submit_label(),
        "Submitting for analysis"
    );
    match controller.dispatch(UploadEvent::Submit).await {
        Navigation::Results => {
            print!("{}", load_results_page(store));
            Ok(())
        }
        Navigation::Stay => match &controller.page().error {
            Some(error) => bail!("{}", error.message),
            None => bail!("Analysis did not complete"),
        },
    }
}

/// Run the download lifecycle for the stored improved artifact
async fn download<S: SessionStorage>(
    config: &TomlConfig,
    endpoints: ServiceEndpoints,
    store: &ResultStore<S>,
    output_dir: PathBuf,
) -> Result<()> {
    let bundle = store
        .get()
        .ok_or_else(|| anyhow!("No analysis results in this session; run `mla analyze` first"))?;

    let artifact = render(&bundle)
        .improved
        .ok_or_else(|| anyhow!("No improved MIDI file is available for {}", bundle.filename))?;

    let service = Arc::new(HttpArtifactClient::new(endpoints).context("Failed to build HTTP client")?);
    let lifecycle = DownloadLifecycle::new(
        service,
        &artifact,
        output_dir,
        DownloadTimings::from(&config.download),
    );

    let handle = lifecycle
        .click()
        .ok_or_else(|| anyhow!("Download already in progress"))?;
    info!(
        download_id = %artifact.download_id,
        state = lifecycle.button().label(),
        "Download started"
    );

    let saved = handle.finish().await.context("Download failed")?;
    println!("Saved {}", saved.display());
    Ok(())
}
