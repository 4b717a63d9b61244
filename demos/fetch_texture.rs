//! # Fetch Texture Example
//!
//! Downloads an image from a bucket and decodes it into a 256x256 texture.
//!
//! ## Usage
//!
//! ```sh
//! GCS_TOKEN=$(gcloud auth print-access-token) \
//!     cargo run --example fetch_texture --features "client image" -- my-bucket textures/hero.png
//! ```

use gcs_fetch::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let (Some(bucket), Some(object)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: fetch_texture <bucket> <object>");
    };
    let token = std::env::var("GCS_TOKEN")?;

    let client = StorageClient::new()?;
    let size = TextureSize::new(256, 256)?;

    match client
        .fetch_texture(&ImageTextureDecoder::default(), &token, &bucket, &object, size)
        .await
    {
        Ok(texture) => println!(
            "Decoded {}x{} texture ({} bytes of RGBA)",
            texture.width,
            texture.height,
            texture.pixels.len()
        ),
        Err(e) => match e.kind() {
            FailureKind::RemoteError => println!("Storage refused the request: {e}"),
            FailureKind::DecodeError => println!("Object is not an image: {e}"),
            _ => return Err(e.into()),
        },
    }

    Ok(())
}
