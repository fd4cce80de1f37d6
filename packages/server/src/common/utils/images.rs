//! Listing image references.
//!
//! Upload mechanics live in an external storage service; this service only
//! stores the durable (url, storage key) pair it hands back, or a raw URL
//! supplied directly by the client.

/// A stored image reference: durable URL plus the storage key needed to
/// delete or replace it later. Direct-URL images have no key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub url: String,
    pub key: Option<String>,
}

impl StoredImage {
    /// Build an image reference from client-supplied fields.
    ///
    /// Returns `Ok(None)` when no image was supplied, and an error message
    /// when the URL is present but not http(s).
    pub fn from_input(
        url: Option<String>,
        key: Option<String>,
    ) -> Result<Option<Self>, &'static str> {
        let url = match url {
            Some(url) => url,
            None => return Ok(None),
        };

        let url = url.trim().to_string();
        if url.is_empty() {
            return Ok(None);
        }

        if !is_http_url(&url) {
            return Err("image URL must be http(s)");
        }

        Ok(Some(StoredImage { url, key }))
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
