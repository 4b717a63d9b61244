pub use gcs_fetch_core::*;

#[cfg(feature = "client")]
pub mod client {
    pub use gcs_fetch_client::*;
}

#[cfg(feature = "image")]
pub mod image {
    pub use gcs_fetch_image::*;
}

#[cfg(feature = "bundle_mock")]
pub mod bundle_mock {
    pub use gcs_fetch_bundle_mock::*;
}

pub mod prelude {
    pub use gcs_fetch_core::prelude::*;

    #[cfg(feature = "client")]
    pub use gcs_fetch_client::{ClientConfig, StorageClient};

    #[cfg(feature = "image")]
    pub use gcs_fetch_image::{ImageTextureDecoder, Texture};

    #[cfg(feature = "bundle_mock")]
    pub use gcs_fetch_bundle_mock::{BundleAsset, JsonBundle, JsonBundleLoader};
}
