use crate::error::*;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt;
use url::Url;

/// Google Cloud Storage JSON API root.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/storage/v1";

/// Everything outside the RFC 3986 unreserved set is escaped, so a bucket or
/// object name always lands in exactly one path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// An opaque bearer credential.
///
/// `Debug` is redacted and there is no `Display`, so the token can't end up
/// in logs or error messages by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

impl From<String> for BearerToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for BearerToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One authenticated "download object" request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    token: BearerToken,
    bucket: String,
    object: String,
}

impl FetchRequest {
    /// Builds a request, rejecting names that can't be addressed.
    ///
    /// The token format is not checked; a bad token surfaces as a
    /// [`FetchError::Remote`] once the request is sent.
    pub fn new(
        token: impl Into<BearerToken>,
        bucket: impl Into<String>,
        object: impl Into<String>,
    ) -> Result<Self> {
        let bucket = bucket.into();
        let object = object.into();
        validate_name("bucket", &bucket)?;
        validate_name("object", &object)?;

        Ok(Self {
            token: token.into(),
            bucket,
            object,
        })
    }

    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    /// `{endpoint}/b/{bucket}/o/{object}?alt=media`
    pub fn url(&self, endpoint: &Url) -> Result<Url> {
        let raw = format!(
            "{}/b/{}/o/{}?alt=media",
            endpoint.as_str().trim_end_matches('/'),
            utf8_percent_encode(&self.bucket, PATH_SEGMENT),
            utf8_percent_encode(&self.object, PATH_SEGMENT),
        );

        Url::parse(&raw).map_err(|e| FetchError::InvalidRequest(format!("Bad object URL: {e}")))
    }
}

fn validate_name(what: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(FetchError::InvalidRequest(format!("{what} name is empty")));
    }
    if name == "." || name == ".." {
        return Err(FetchError::InvalidRequest(format!(
            "{what} name '{name}' is not addressable"
        )));
    }
    if name.contains(['\r', '\n']) {
        return Err(FetchError::InvalidRequest(format!(
            "{what} name contains a line break"
        )));
    }
    Ok(())
}

/// Target dimensions for a decoded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl TextureSize {
    pub const DEFAULT_WIDTH: u32 = 512;
    pub const DEFAULT_HEIGHT: u32 = 512;

    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FetchError::InvalidRequest(format!(
                "texture size {width}x{height} has a zero dimension"
            )));
        }
        Ok(Self { width, height })
    }
}

impl Default for TextureSize {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;
    use rstest::rstest;

    fn endpoint() -> Url {
        Url::parse(DEFAULT_ENDPOINT).unwrap()
    }

    fn last_segment(url: &Url) -> String {
        let segment = url.path_segments().unwrap().next_back().unwrap();
        percent_decode_str(segment).decode_utf8().unwrap().into_owned()
    }

    #[test]
    fn composes_download_url() {
        let request = FetchRequest::new("t", "game-assets", "hero.png").unwrap();
        let url = request.url(&endpoint()).unwrap();

        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/storage/v1/b/game-assets/o/hero.png?alt=media"
        );
    }

    #[test]
    fn trailing_slash_on_endpoint_is_ignored() {
        let request = FetchRequest::new("t", "b", "o").unwrap();
        let endpoint = Url::parse("http://127.0.0.1:4443/storage/v1/").unwrap();

        assert_eq!(
            request.url(&endpoint).unwrap().as_str(),
            "http://127.0.0.1:4443/storage/v1/b/b/o/o?alt=media"
        );
    }

    #[rstest]
    #[case("textures/hero.png")]
    #[case("what?.png")]
    #[case("sprites#1")]
    #[case("100%.bin")]
    #[case("a b+c&d=e")]
    #[case("ünïcødé/テクスチャ")]
    #[case("..hidden/../x")]
    fn object_names_round_trip_through_one_segment(#[case] object: &str) {
        let request = FetchRequest::new("t", "bucket", object).unwrap();
        let url = request.url(&endpoint()).unwrap();

        assert_eq!(url.path_segments().unwrap().count(), 6);
        assert_eq!(last_segment(&url), object);
        assert_eq!(url.query(), Some("alt=media"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn distinct_names_give_distinct_urls() {
        let a = FetchRequest::new("t", "b", "a/b").unwrap();
        let b = FetchRequest::new("t", "b", "a%2Fb").unwrap();

        assert_ne!(a.url(&endpoint()).unwrap(), b.url(&endpoint()).unwrap());
    }

    #[rstest]
    #[case("", "object")]
    #[case("bucket", "")]
    #[case("bucket", ".")]
    #[case("bucket", "..")]
    #[case("bucket", "line\nbreak")]
    fn rejects_unaddressable_names(#[case] bucket: &str, #[case] object: &str) {
        let err = FetchRequest::new("t", bucket, object).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidRequest);
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        let request = FetchRequest::new("super-secret", "b", "o").unwrap();
        let debug = format!("{request:?}");

        assert!(!debug.contains("super-secret"));
        assert_eq!(request.token().header_value(), "Bearer super-secret");
    }

    #[test]
    fn texture_size_defaults_and_validation() {
        assert_eq!(TextureSize::default(), TextureSize::new(512, 512).unwrap());
        assert!(TextureSize::new(0, 16).is_err());
    }
}
