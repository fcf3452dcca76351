//! Public short-link and QR-code URL construction.

use url::Url;

/// Default QR rendering service.
pub const DEFAULT_QR_SERVICE_URL: &str = "https://quickchart.io/qr";

/// QR image edge length in pixels.
const QR_SIZE: &str = "150";

/// Builds the URLs handed back to API callers.
#[derive(Debug, Clone)]
pub struct ShortUrlBuilder {
    base_url: String,
    qr_service_url: String,
}

impl ShortUrlBuilder {
    pub fn new(base_url: impl Into<String>, qr_service_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            qr_service_url: qr_service_url.into(),
        }
    }

    /// `<base_url>/<code>`
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// QR-code image URL encoding `short_url` as its `text` parameter.
    pub fn qr_code_url(&self, short_url: &str) -> String {
        match Url::parse_with_params(
            &self.qr_service_url,
            &[("text", short_url), ("size", QR_SIZE)],
        ) {
            Ok(url) => url.to_string(),
            Err(_) => format!(
                "{}?text={}&size={}",
                self.qr_service_url,
                url::form_urlencoded::byte_serialize(short_url.as_bytes()).collect::<String>(),
                QR_SIZE
            ),
        }
    }
}
