use bytes::Bytes;
use gcs_fetch_core::prelude::{AssetBundle, BundleLoader, DecodeError};
use serde::{Deserialize, Serialize};

/// A named asset inside a [`JsonBundle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleAsset {
    pub name: String,
    pub data: Vec<u8>,
}

impl BundleAsset {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// A bundle stored as `{"assets": [{"name": .., "data": [..]}, ..]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonBundle {
    pub assets: Vec<BundleAsset>,
}

impl JsonBundle {
    pub fn new(assets: Vec<BundleAsset>) -> Self {
        Self { assets }
    }

    pub fn to_bytes(&self) -> Bytes {
        // Serializing plain strings and byte vectors can't fail.
        Bytes::from(serde_json::to_vec(self).unwrap_or_default())
    }
}

impl AssetBundle for JsonBundle {
    type Asset = BundleAsset;

    fn load_asset(&self, name: &str) -> Option<BundleAsset> {
        self.assets.iter().find(|a| a.name == name).cloned()
    }

    fn load_all_assets(&self) -> Vec<BundleAsset> {
        self.assets.clone()
    }
}

#[derive(Clone, Debug, Default)]
pub struct JsonBundleLoader;

impl BundleLoader for JsonBundleLoader {
    type Bundle = JsonBundle;

    fn open_bundle(&self, bytes: Bytes) -> Result<JsonBundle, DecodeError> {
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::invalid("asset bundle", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> JsonBundle {
        JsonBundle::new(vec![
            BundleAsset::new("A", b"first".to_vec()),
            BundleAsset::new("B", b"second".to_vec()),
        ])
    }

    #[test]
    fn opens_serialized_bundle_in_declared_order() {
        let opened = JsonBundleLoader.open_bundle(bundle().to_bytes()).unwrap();

        let names: Vec<_> = opened.load_all_assets().into_iter().map(|a| a.name).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(opened.load_asset("B").unwrap().data, b"second");
        assert!(opened.load_asset("missing").is_none());
    }

    #[test]
    fn rejects_non_bundle_payload() {
        let err = JsonBundleLoader
            .open_bundle(Bytes::from_static(b"\x89PNG"))
            .unwrap_err();

        assert!(matches!(err, DecodeError::InvalidPayload { .. }));
    }
}
