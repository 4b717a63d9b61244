use crate::error::*;
use crate::request::{BearerToken, TextureSize};

use bytes::Bytes;

/// Supplies the bearer credential for a request.
///
/// Acquiring or refreshing tokens is up to the implementor; the client only
/// asks for the current one.
pub trait TokenSource: Send + Sync + 'static + Clone {
    fn token(&self) -> impl Future<Output = Result<BearerToken>> + Send;
}

/// A token that never changes, e.g. one passed on the command line.
#[derive(Clone, Debug)]
pub struct StaticToken(BearerToken);

impl StaticToken {
    pub fn new(token: impl Into<BearerToken>) -> Self {
        Self(token.into())
    }
}

impl TokenSource for StaticToken {
    async fn token(&self) -> Result<BearerToken> {
        Ok(self.0.clone())
    }
}

/// Turns a downloaded payload into an engine texture.
pub trait TextureDecoder: Send + Sync {
    type Texture;

    fn decode_texture(
        &self,
        bytes: &[u8],
        size: TextureSize,
    ) -> std::result::Result<Self::Texture, DecodeError>;
}

/// Opens a downloaded payload as an asset bundle.
pub trait BundleLoader: Send + Sync {
    type Bundle: AssetBundle;

    fn open_bundle(&self, bytes: Bytes) -> std::result::Result<Self::Bundle, DecodeError>;
}

/// An opened bundle of named assets.
pub trait AssetBundle {
    type Asset;

    fn load_asset(&self, name: &str) -> Option<Self::Asset>;

    /// All assets, in the order the bundle declares them.
    fn load_all_assets(&self) -> Vec<Self::Asset>;
}
