//! # Bundle Example
//!
//! Lists the assets of a JSON asset bundle stored in a bucket, then loads one by name.
//!
//! ## Usage
//!
//! ```sh
//! GCS_TOKEN=... cargo run --example bundle --features "client bundle_mock" -- my-bucket ui.bundle button
//! ```

use gcs_fetch::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let (Some(bucket), Some(object)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: bundle <bucket> <object> [asset]");
    };
    let asset_name = args.next();
    let token = std::env::var("GCS_TOKEN")?;

    let client = StorageClient::new()?;

    let assets = client
        .fetch_all_assets(&JsonBundleLoader, &token, &bucket, &object)
        .await?;
    for asset in &assets {
        println!("{} ({} bytes)", asset.name, asset.data.len());
    }

    // Falls back to an asset named like the object itself.
    let asset = client
        .fetch_asset(&JsonBundleLoader, &token, &bucket, &object, asset_name.as_deref())
        .await?;
    println!("Loaded '{}'", asset.name);

    Ok(())
}
