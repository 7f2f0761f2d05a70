use reqwest::Client;
use tracing::debug;

use crate::{DownloaderConfig, HlsClipError};

/// Create a reqwest Client with the provided configuration
pub fn create_client(config: &DownloaderConfig) -> Result<Client, HlsClipError> {
    let mut client_builder = Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(config.headers.clone())
        .redirect(if config.follow_redirects {
            reqwest::redirect::Policy::limited(10)
        } else {
            reqwest::redirect::Policy::none()
        });

    if !config.timeout.is_zero() {
        client_builder = client_builder.timeout(config.timeout);
    }

    if !config.connect_timeout.is_zero() {
        client_builder = client_builder.connect_timeout(config.connect_timeout);
    }

    if !config.read_timeout.is_zero() {
        client_builder = client_builder.read_timeout(config.read_timeout);
    }

    if !config.use_system_proxy {
        client_builder = client_builder.no_proxy();
        debug!("Proxy disabled for downloads");
    }

    client_builder.build().map_err(HlsClipError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_create_client_with_defaults() {
        assert!(create_client(&DownloaderConfig::default()).is_ok());
    }

    #[test]
    fn test_create_client_without_timeouts() {
        let config = DownloaderConfig::builder()
            .with_timeout(Duration::ZERO)
            .with_connect_timeout(Duration::ZERO)
            .with_read_timeout(Duration::ZERO)
            .with_system_proxy(false)
            .build();
        assert!(create_client(&config).is_ok());
    }
}
