//! Request snapshots.
//!
//! A [`RequestRecord`] is taken the moment a request arrives, before the
//! delegate sees it. The serving path keeps ownership of the live request;
//! only this snapshot crosses the observer queue, and it is consumed exactly
//! once by the renderer.

use axum::body::Body;
use axum::http::{header, Request};

/// Immutable snapshot of an inbound request.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub method: String,
    /// Protocol string, e.g. `HTTP/1.1`.
    pub protocol: String,
    pub uri: String,
    /// Explicit `Host` header, falling back to the URI authority.
    pub host: String,
    /// True when the request line carried an absolute URI. Absolute URIs
    /// already name the host inline, so the dump skips the `Host:` row.
    pub absolute_uri: bool,
    /// Remaining headers in arrival order, values per key in arrival order.
    /// `Host` and `Transfer-Encoding` are promoted into dedicated fields
    /// and excluded here.
    pub headers: Vec<(String, Vec<String>)>,
    pub transfer_encoding: Vec<String>,
    pub connection_close: bool,
}

impl RequestRecord {
    /// Capture a snapshot of `request` without consuming it.
    pub fn capture(request: &Request<Body>) -> Self {
        let uri = request.uri();
        let headers = request.headers();

        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .or_else(|| uri.authority().map(|a| a.to_string()))
            .unwrap_or_default();

        let transfer_encoding: Vec<String> = headers
            .get_all(header::TRANSFER_ENCODING)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .collect();

        let connection_close = headers
            .get_all(header::CONNECTION)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .any(|v| v.trim().eq_ignore_ascii_case("close"));

        let mut rest: Vec<(String, Vec<String>)> = Vec::new();
        for key in headers.keys() {
            if *key == header::HOST || *key == header::TRANSFER_ENCODING {
                continue;
            }
            let values = headers
                .get_all(key)
                .iter()
                .filter_map(|v| v.to_str().ok().map(str::to_owned))
                .collect();
            rest.push((key.as_str().to_owned(), values));
        }

        Self {
            method: request.method().to_string(),
            protocol: format!("{:?}", request.version()),
            uri: uri.to_string(),
            host,
            absolute_uri: uri.scheme().is_some(),
            headers: rest,
            transfer_encoding,
            connection_close,
        }
    }
}
