//! # Bevy Example
//!
//! Loads a sprite straight from a Cloud Storage bucket into Bevy.
//!
//! ## Usage
//!
//! ```sh
//! GCS_BUCKET=my-bucket GCS_TOKEN=$(gcloud auth print-access-token) cargo run --example bevy
//! ```

use bevy::prelude::*;
use bevy_gcs_fetch::*;

fn main() {
    let bucket = std::env::var("GCS_BUCKET").unwrap_or_else(|_| "game-assets".to_string());
    let token = std::env::var("GCS_TOKEN").unwrap_or_default();

    App::new()
        .add_plugins(GcsAssetPlugin::new(GcsAssetConfig::new(bucket, token)))
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn(Camera2d);

    let image = asset_server.load("gcs://textures/hero.png");

    commands.spawn(Sprite { image, ..default() });
}
