//! QR Token Renderer
//!
//! Turns the opaque reservation token into the displayable encoding the
//! client feeds into its QR widget. The admission core never embeds
//! rendering logic; it hands the raw token to this service.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Version prefix of the rendered payload
const PAYLOAD_PREFIX: &str = "MENSA1";

#[derive(Debug, Clone, Default)]
pub struct TokenRenderService;

impl TokenRenderService {
    pub fn new() -> Self {
        Self
    }

    /// Render the opaque token into the QR payload string.
    pub fn render(&self, qr_token: &str) -> String {
        format!("{}:{}", PAYLOAD_PREFIX, URL_SAFE_NO_PAD.encode(qr_token))
    }

    /// Recover the opaque token from a scanned payload.
    ///
    /// A value without the payload prefix is treated as a raw token, so
    /// operator consoles may submit either form.
    pub fn decode(&self, scanned: &str) -> Option<String> {
        match scanned.strip_prefix(&format!("{PAYLOAD_PREFIX}:")) {
            Some(encoded) => {
                let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
                String::from_utf8(bytes).ok()
            }
            None => Some(scanned.to_string()),
        }
    }
}
