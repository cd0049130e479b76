//! Handshake request construction and dialing.

use tokio_tungstenite::Connector;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::{ORIGIN, SEC_WEBSOCKET_PROTOCOL, USER_AGENT};

use super::Connection;
use crate::config::ClientConfig;
use crate::error::ClientError;

/// Opens the WebSocket connection described by `config`.
///
/// Sends `Origin` always, `Sec-WebSocket-Protocol` and `User-Agent` only
/// when configured. For `wss://` endpoints the TLS connector honours
/// [`ClientConfig::insecure_skip_verify`].
///
/// # Errors
///
/// Returns [`ClientError::InvalidHeader`] for unencodable header values,
/// [`ClientError::Tls`] if the connector cannot be built, and
/// [`ClientError::Dial`] for a bad URL, refused connection, TLS failure or
/// rejected handshake.
pub async fn dial(config: &ClientConfig) -> Result<Connection, ClientError> {
    let request = build_request(config)?;
    let connector = tls_connector(config)?;

    tracing::debug!(url = %config.url, tls = connector.is_some(), "dialing");
    let (stream, response) =
        tokio_tungstenite::connect_async_tls_with_config(request, None, false, connector)
            .await
            .map_err(|source| ClientError::Dial {
                url: config.url.clone(),
                source,
            })?;
    tracing::debug!(status = %response.status(), "handshake complete");

    Ok(Connection::new(stream))
}

/// Builds the client handshake request with the configured headers.
///
/// # Errors
///
/// Returns [`ClientError::Dial`] if the URL is not a valid WebSocket URL and
/// [`ClientError::InvalidHeader`] if a header value cannot be encoded.
pub fn build_request(config: &ClientConfig) -> Result<Request, ClientError> {
    let mut request =
        config
            .url
            .as_str()
            .into_client_request()
            .map_err(|source| ClientError::Dial {
                url: config.url.clone(),
                source,
            })?;

    let headers = request.headers_mut();
    headers.insert(ORIGIN, header_value("Origin", &config.origin)?);
    if let Some(protocol) = &config.subprotocol {
        headers.insert(
            SEC_WEBSOCKET_PROTOCOL,
            header_value("Sec-WebSocket-Protocol", protocol)?,
        );
    }
    if let Some(agent) = &config.user_agent {
        headers.insert(USER_AGENT, header_value("User-Agent", agent)?);
    }

    Ok(request)
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader {
        name,
        value: value.to_string(),
    })
}

/// Returns a TLS connector for `wss://` targets, `None` otherwise.
fn tls_connector(config: &ClientConfig) -> Result<Option<Connector>, ClientError> {
    if !config.url.starts_with("wss://") {
        return Ok(None);
    }
    if config.insecure_skip_verify {
        tracing::warn!("tls certificate verification disabled");
    }
    let connector = native_tls::TlsConnector::builder()
        .danger_accept_invalid_certs(config.insecure_skip_verify)
        .danger_accept_invalid_hostnames(config.insecure_skip_verify)
        .build()?;
    Ok(Some(Connector::NativeTls(connector)))
}
