// appinfosync/src/utils/mod.rs
#[cfg(test)]
pub(crate) mod test_server;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Response;

use crate::config::Credentials;
use crate::errors::{AppError, Result};

/// Value for the `Authorization` header: `Basic base64(username:password)`.
pub fn basic_auth_header(credentials: &Credentials) -> String {
    format!("Basic {}", STANDARD.encode(credentials.joined()))
}

/// Reads the body of a successful response; any other status becomes
/// [`AppError::HttpStatus`].
pub async fn read_success_body(url: &str, response: Response) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::from_status(url, status));
    }
    Ok(response.text().await?)
}
