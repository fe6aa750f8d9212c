/// Songtag - resolve song tags from files, archives and streams
use clap::{Parser, Subcommand};
use songtag_cli::{AppConfig, SongReport};
use songtag_core::{LocalStorage, LocalStreamOpener};
use songtag_decoder::DecoderRegistry;
use songtag_metadata::{LibraryScanner, ScanProgress, TagResolver};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "songtag")]
#[command(about = "Resolve song tags the way a music daemon's database update does", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Music directory (overrides the configuration file)
    #[arg(short, long, global = true, env = "SONGTAG_MUSIC_DIRECTORY")]
    music_directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the tag of a file in the music directory
    File {
        /// URI relative to the music directory
        uri: String,
    },
    /// Resolve the tag of a stream
    Stream {
        /// Stream URI
        uri: String,
    },
    /// Scan a directory tree and print every resolved song
    Scan {
        /// Directory or file to scan (default: the music directory)
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "songtag=info,songtag_metadata=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(music_directory) = cli.music_directory {
        config.library.music_directory = music_directory;
    }
    config.validate()?;

    let storage = LocalStorage::new(&config.library.music_directory);
    let registry = DecoderRegistry::with_defaults(config.symphonia.clone());
    tracing::debug!("Decoder registry: {:?}", registry);

    let resolver = TagResolver::new(
        Arc::new(registry),
        Arc::new(storage.clone()),
        Arc::new(LocalStreamOpener),
    )
    .with_config(config.resolver.clone());

    match cli.command {
        Commands::File { uri } => {
            let resolved = resolver.resolve_local_file(&uri)?;
            println!("{}", SongReport::resolved(&uri, &resolved).to_json()?);
        }
        Commands::Stream { uri } => {
            let resolved = resolver.resolve_remote(&uri)?;
            println!("{}", SongReport::resolved(&uri, &resolved).to_json()?);
        }
        Commands::Scan { path } => {
            let path = path.unwrap_or_else(|| config.library.music_directory.clone());
            scan(resolver, storage, &config, path).await?;
        }
    }

    Ok(())
}

async fn scan(
    resolver: TagResolver,
    storage: LocalStorage,
    config: &AppConfig,
    path: PathBuf,
) -> anyhow::Result<()> {
    let scanner = LibraryScanner::with_config(Arc::new(resolver), storage, config.scan_config());

    let (tx, mut rx) = mpsc::channel(100);
    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                ScanProgress::Started { total_files } => {
                    tracing::info!("Scanning {} files", total_files);
                }
                ScanProgress::FileScanned {
                    path,
                    success: false,
                    error,
                } => {
                    tracing::warn!("Failed to resolve {:?}: {}", path, error.unwrap_or_default());
                }
                ScanProgress::FileScanned { .. } => {}
                ScanProgress::Completed { stats } => {
                    tracing::info!(
                        "Scan complete: {} resolved, {} failed",
                        stats.songs_resolved,
                        stats.errors.len()
                    );
                }
            }
        }
    });

    let result = scanner.scan(&path, Some(tx)).await?;
    progress.await?;

    let reports: Vec<_> = result.songs.iter().map(SongReport::song).collect();
    println!("{}", serde_json::to_string_pretty(&reports)?);

    Ok(())
}
