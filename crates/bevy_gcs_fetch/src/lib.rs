use bevy_app::prelude::*;
use bevy_asset::AssetApp;
use bevy_asset::io::{
    AssetReader, AssetReaderError, AssetSourceBuilder, AssetSourceId, PathStream, Reader, VecReader,
};
use bevy_ecs::prelude::*;
use gcs_fetch_client::{ClientConfig, StorageClient};
use gcs_fetch_core::prelude::{BearerToken, DEFAULT_ENDPOINT, FetchError, StaticToken};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime;
use tracing::{error, info, warn};

/// Configuration for the GCS asset source.
#[derive(Resource, Clone, Debug)]
pub struct GcsAssetConfig {
    /// JSON API root, defaults to the public Cloud Storage endpoint.
    pub endpoint: String,
    /// Bucket every `gcs://` path is resolved against.
    pub bucket: String,
    pub token: BearerToken,
    pub timeout: Option<Duration>,
}

impl GcsAssetConfig {
    pub fn new(bucket: impl Into<String>, token: impl Into<BearerToken>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bucket: bucket.into(),
            token: token.into(),
            timeout: None,
        }
    }
}

/// Registers the `gcs` asset source, so `asset_server.load("gcs://textures/hero.png")`
/// reads `textures/hero.png` from the configured bucket.
///
/// Must be added before `AssetPlugin` (i.e. before `DefaultPlugins`).
pub struct GcsAssetPlugin {
    pub config: GcsAssetConfig,
}

impl GcsAssetPlugin {
    pub fn new(config: GcsAssetConfig) -> Self {
        Self { config }
    }
}

impl Plugin for GcsAssetPlugin {
    fn build(&self, app: &mut App) {
        let reader = match GcsAssetReader::new(&self.config) {
            Ok(reader) => reader,
            Err(e) => {
                error!("GCS asset source disabled: {e}");
                return;
            }
        };

        info!(bucket = %self.config.bucket, "Registering GCS asset source");
        app.register_asset_source(
            AssetSourceId::Name("gcs".into()),
            AssetSourceBuilder::default().with_reader(move || Box::new(reader.clone())),
        );
    }
}

/// Object name for an asset path inside the `gcs` source.
fn object_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[derive(Clone)]
struct GcsAssetReader {
    client: StorageClient,
    bucket: String,
    tokens: StaticToken,
    /// reqwest needs a tokio reactor, bevy's task pools don't provide one.
    runtime: Arc<runtime::Runtime>,
}

impl GcsAssetReader {
    fn new(config: &GcsAssetConfig) -> std::io::Result<Self> {
        let runtime = runtime::Builder::new_multi_thread().enable_all().build()?;

        let mut client_config = ClientConfig::default().with_endpoint(config.endpoint.clone());
        if let Some(timeout) = config.timeout {
            client_config = client_config.with_timeout(timeout);
        }
        let client = StorageClient::with_config(client_config).map_err(std::io::Error::other)?;

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            tokens: StaticToken::new(config.token.clone()),
            runtime: Arc::new(runtime),
        })
    }
}

fn reader_error(path: &Path, err: FetchError) -> AssetReaderError {
    if err.is_not_found() {
        warn!("Object not found in bucket: {}", path.display());
        AssetReaderError::NotFound(path.to_path_buf())
    } else {
        error!("Object fetch failed: {err}");
        AssetReaderError::Io(Arc::from(std::io::Error::other(err)))
    }
}

impl AssetReader for GcsAssetReader {
    async fn read<'a>(&'a self, path: &'a Path) -> Result<impl Reader + 'a, AssetReaderError> {
        let object = object_name(path);
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let tokens = self.tokens.clone();

        let bytes = self
            .runtime
            .spawn(async move { client.fetch_with(&tokens, &bucket, &object).await })
            .await
            .map_err(|join_err| {
                AssetReaderError::Io(Arc::from(std::io::Error::other(format!(
                    "Tokio join error: {join_err}"
                ))))
            })?
            .map_err(|e| reader_error(path, e))?;

        Ok(VecReader::new(bytes.to_vec()))
    }

    async fn read_meta<'a>(&'a self, path: &'a Path) -> Result<impl Reader + 'a, AssetReaderError> {
        let res: Result<VecReader, AssetReaderError> =
            Err(AssetReaderError::NotFound(path.to_path_buf()));
        res
    }

    async fn read_directory<'a>(
        &'a self,
        _path: &'a Path,
    ) -> Result<Box<PathStream>, AssetReaderError> {
        Ok(Box::new(futures_lite::stream::empty()))
    }

    async fn is_directory<'a>(&'a self, _path: &'a Path) -> Result<bool, AssetReaderError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn asset_paths_map_to_object_names() {
        assert_eq!(
            object_name(Path::new("textures/hero.png")),
            "textures/hero.png"
        );
        assert_eq!(
            object_name(&PathBuf::from("textures\\ui\\button.png")),
            "textures/ui/button.png"
        );
    }

    #[test]
    fn missing_objects_become_not_found() {
        let path = Path::new("gone.png");
        let err = reader_error(
            path,
            FetchError::Remote {
                status: 404,
                body: "No such object".into(),
            },
        );
        assert!(matches!(err, AssetReaderError::NotFound(p) if p == path));

        let err = reader_error(path, FetchError::Transport("refused".into()));
        assert!(matches!(err, AssetReaderError::Io(_)));
    }

    #[test]
    fn config_debug_hides_token() {
        let config = GcsAssetConfig::new("game-assets", "secret-token");
        assert!(!format!("{config:?}").contains("secret-token"));
    }
}
