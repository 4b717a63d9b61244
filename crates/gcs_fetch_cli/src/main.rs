use clap::{Parser, Subcommand};
use gcs_fetch_client::{ClientConfig, StorageClient};
use gcs_fetch_core::prelude::{DEFAULT_ENDPOINT, TextureSize};
use gcs_fetch_image::ImageTextureDecoder;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gcs-fetch")]
#[command(about = "Download objects from Google Cloud Storage")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON API endpoint
    #[arg(short, long, env = "GCS_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// OAuth2 access token, e.g. from `gcloud auth print-access-token`
    #[arg(short, long, env = "GCS_TOKEN", hide_env_values = true)]
    token: String,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download an object to a file
    Download {
        bucket: String,
        object: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Download an image, scale it and save it as PNG
    Texture {
        bucket: String,
        object: String,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = TextureSize::DEFAULT_WIDTH)]
        width: u32,
        #[arg(long, default_value_t = TextureSize::DEFAULT_HEIGHT)]
        height: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::default().with_endpoint(cli.endpoint);
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let client = StorageClient::with_config(config)?;

    match cli.command {
        Commands::Download {
            bucket,
            object,
            output,
        } => {
            println!("Downloading gs://{bucket}/{object}...");

            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, cancelling download");
                    on_ctrl_c.cancel();
                }
            });

            let data = client
                .fetch_cancellable(&cli.token, &bucket, &object, &cancel)
                .await?;

            if let Some(parent) = output.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&output, &data).await?;

            let digest = hex::encode(Sha256::digest(&data));
            println!("✅ Saved {} bytes to {output:?}", data.len());
            println!("sha256: {digest}");
        }
        Commands::Texture {
            bucket,
            object,
            output,
            width,
            height,
        } => {
            let size = TextureSize::new(width, height)?;
            println!("🖼️  Fetching texture gs://{bucket}/{object} at {width}x{height}...");

            let texture = client
                .fetch_texture(
                    &ImageTextureDecoder::default(),
                    &cli.token,
                    &bucket,
                    &object,
                    size,
                )
                .await?;

            if let Some(parent) = output.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            texture.save_png(&output)?;

            println!("✅ Saved to {output:?}");
        }
    }

    Ok(())
}
