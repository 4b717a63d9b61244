use crate::StorageClient;

use gcs_fetch_core::prelude::*;
use tracing::{instrument, warn};

type AssetOf<L> = <<L as BundleLoader>::Bundle as AssetBundle>::Asset;

/// Wrappers handing a fetched payload to a decoder. A failed fetch is
/// returned as is and the decoder is never called.
impl StorageClient {
    #[instrument(skip(self, decoder, token))]
    pub async fn fetch_texture<D: TextureDecoder>(
        &self,
        decoder: &D,
        token: &str,
        bucket: &str,
        object: &str,
        size: TextureSize,
    ) -> Result<D::Texture> {
        let size = TextureSize::new(size.width, size.height)?;
        let payload = self.fetch(token, bucket, object).await?;

        decoder.decode_texture(&payload, size).map_err(|e| {
            warn!("Texture decode failed: {e}");
            e.into()
        })
    }

    #[instrument(skip(self, loader, token))]
    pub async fn fetch_bundle<L: BundleLoader>(
        &self,
        loader: &L,
        token: &str,
        bucket: &str,
        object: &str,
    ) -> Result<L::Bundle> {
        let payload = self.fetch(token, bucket, object).await?;

        loader.open_bundle(payload).map_err(|e| {
            warn!("Bundle could not be opened: {e}");
            e.into()
        })
    }

    /// Loads one asset from the bundle stored at `object`.
    ///
    /// Without an `asset_name` (or with an empty one) the asset is looked up
    /// under the object name.
    pub async fn fetch_asset<L: BundleLoader>(
        &self,
        loader: &L,
        token: &str,
        bucket: &str,
        object: &str,
        asset_name: Option<&str>,
    ) -> Result<AssetOf<L>> {
        let name = asset_name.filter(|n| !n.is_empty()).unwrap_or(object);
        let bundle = self.fetch_bundle(loader, token, bucket, object).await?;

        bundle
            .load_asset(name)
            .ok_or_else(|| DecodeError::NotFound(name.to_string()).into())
    }

    pub async fn fetch_all_assets<L: BundleLoader>(
        &self,
        loader: &L,
        token: &str,
        bucket: &str,
        object: &str,
    ) -> Result<Vec<AssetOf<L>>> {
        let bundle = self.fetch_bundle(loader, token, bucket, object).await?;
        Ok(bundle.load_all_assets())
    }
}
