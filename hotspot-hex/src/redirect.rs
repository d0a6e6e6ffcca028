//! Login redirect issued after a confirmed payment.

use reqwest::Url;

use hotspot_types::PortalError;

use crate::token::TokenService;

/// Mints a post-payment token and points the device at the login page.
#[derive(Clone)]
pub struct SessionRedirectIssuer {
    tokens: TokenService,
    login_base: Url,
    username_prefix: String,
}

impl SessionRedirectIssuer {
    pub fn new(
        tokens: TokenService,
        login_redirect_base: &str,
        username_prefix: impl Into<String>,
    ) -> Result<Self, PortalError> {
        let login_base = Url::parse(login_redirect_base).map_err(|e| {
            PortalError::Internal(format!(
                "invalid login redirect URL {login_redirect_base:?}: {e}"
            ))
        })?;
        Ok(Self {
            tokens,
            login_base,
            username_prefix: username_prefix.into(),
        })
    }

    /// Builds `{login}?username={prefix}{mac}&dst=..&timestamp=..&token=..`
    /// with a token minted for `now`.
    pub fn issue(&self, device_id: &str, destination: &str, now: i64) -> String {
        let token = self.tokens.generate(device_id, now);

        let mut url = self.login_base.clone();
        url.query_pairs_mut()
            .append_pair("username", &format!("{}{}", self.username_prefix, device_id))
            .append_pair("dst", destination)
            .append_pair("timestamp", &now.to_string())
            .append_pair("token", token.as_str());
        url.into()
    }
}
