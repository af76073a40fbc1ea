//! Transport adapter: request planning and the per-attempt HTTP client.
//!
//! [`RequestPlan`] is the complete description of what goes on the wire for
//! one attempt: where the connection is opened, the request target and the
//! headers. [`build_client`] realizes it with `reqwest`. Plain `http`
//! channels behind a proxy are forwarded (absolute-form target, the
//! channel's host in `Host`); `https` channels are tunnelled with `CONNECT`
//! and keep an origin-form target.

use bytes::Bytes;
use mpns_core::{Kind, ValidationError};
use reqwest::Url;

/// `Content-Type` header.
pub const CONTENT_TYPE: &str = "Content-Type";
/// `Content-Length` header.
pub const CONTENT_LENGTH: &str = "Content-Length";
/// `Accept` header.
pub const ACCEPT: &str = "Accept";
/// `Host` header (forwarded requests only).
pub const HOST: &str = "Host";
/// Notification class header.
pub const NOTIFICATION_CLASS: &str = "X-NotificationClass";
/// Target header, absent for raw notifications.
pub const WINDOWS_PHONE_TARGET: &str = "X-WindowsPhone-Target";

/// How the connection for an attempt reaches the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Straight to the channel's host.
    Direct,
    /// Plain `http` through a forward proxy.
    Forward(Url),
    /// `https` through a `CONNECT` tunnel opened by the proxy.
    Tunnel(Url),
}

impl Route {
    /// Proxy the connection goes through, if any.
    pub fn proxy(&self) -> Option<&Url> {
        match self {
            Self::Direct => None,
            Self::Forward(proxy) | Self::Tunnel(proxy) => Some(proxy),
        }
    }
}

/// Wire description of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPlan {
    /// Always `POST`.
    pub method: &'static str,
    /// Channel URI the notification is addressed to.
    pub endpoint: Url,
    /// Host the TCP connection is opened to (the proxy's, when proxied).
    pub host: String,
    /// Port the TCP connection is opened to.
    pub port: u16,
    /// Request target: origin-form, or the full endpoint URL when forwarded.
    pub path: String,
    /// Request headers, in emission order.
    pub headers: Vec<(&'static str, String)>,
    /// Whether the endpoint uses `https`.
    pub secure: bool,
    /// Direct, forwarded or tunnelled.
    pub route: Route,
}

impl RequestPlan {
    /// Plan a `POST` of `content_length` bytes for a `kind` notification.
    pub fn new(endpoint: &Url, kind: Kind, content_length: usize, proxy: Option<&Url>) -> Self {
        let secure = endpoint.scheme() == "https";
        let mut headers = vec![
            (CONTENT_TYPE, "text/xml".to_string()),
            (CONTENT_LENGTH, content_length.to_string()),
            (ACCEPT, "application/*".to_string()),
            (NOTIFICATION_CLASS, kind.notification_class().to_string()),
        ];
        if let Some(target) = kind.target_name() {
            headers.push((WINDOWS_PHONE_TARGET, target.to_string()));
        }

        let route = match proxy {
            None => Route::Direct,
            Some(proxy) if secure => Route::Tunnel(proxy.clone()),
            Some(proxy) => Route::Forward(proxy.clone()),
        };

        let (host, port) = match route.proxy() {
            Some(proxy) => (host_of(proxy), proxy.port_or_known_default().unwrap_or(80)),
            None => (
                host_of(endpoint),
                endpoint.port_or_known_default().unwrap_or(80),
            ),
        };
        let path = match route {
            Route::Forward(_) => {
                headers.push((HOST, authority(endpoint)));
                endpoint.as_str().to_string()
            }
            Route::Direct | Route::Tunnel(_) => origin_form(endpoint),
        };

        Self {
            method: "POST",
            endpoint: endpoint.clone(),
            host,
            port,
            path,
            headers,
            secure,
            route,
        }
    }

    /// Value of a planned header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn host_of(url: &Url) -> String {
    url.host_str().unwrap_or_default().to_string()
}

/// `host[:port]` as it appears in a `Host` header.
fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Path and query of `url`.
fn origin_form(url: &Url) -> String {
    let mut path = url.path().to_string();
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }
    path
}

/// Parse a channel URI. Only absolute `http`/`https` URLs with a host are
/// accepted.
pub fn parse_endpoint(uri: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidEndpoint {
        uri: uri.to_string(),
        reason,
    };
    let url = Url::parse(uri).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

/// Parse a forward proxy URL.
pub fn parse_proxy(proxy: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidProxy {
        url: proxy.to_string(),
        reason,
    };
    let url = Url::parse(proxy).map_err(|e| invalid(e.to_string()))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

/// Build the HTTP client for one attempt.
///
/// Redirects are not followed. `tls` is the configuration built by
/// [`crate::tls::client_config`] and is required for `https` plans; idle
/// connections are then not kept, so a failure is always attributable to
/// this attempt.
pub fn build_client(
    plan: &RequestPlan,
    tls: Option<rustls::ClientConfig>,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder()
        .http1_only()
        .redirect(reqwest::redirect::Policy::none());

    builder = match &plan.route {
        Route::Direct => builder.no_proxy(),
        Route::Forward(proxy) => builder.proxy(reqwest::Proxy::http(proxy.as_str())?),
        Route::Tunnel(proxy) => builder.proxy(reqwest::Proxy::https(proxy.as_str())?),
    };

    if plan.secure {
        builder = builder.pool_max_idle_per_host(0);
        if let Some(config) = tls {
            builder = builder.use_preconfigured_tls(config);
        }
    }

    builder.build()
}

/// Send the planned request and wait for the response head.
pub async fn execute(
    client: &reqwest::Client,
    plan: &RequestPlan,
    body: Bytes,
) -> Result<reqwest::Response, reqwest::Error> {
    let mut request = client.post(plan.endpoint.clone());
    for (name, value) in &plan.headers {
        // Derived by the client from the body.
        if *name == CONTENT_LENGTH {
            continue;
        }
        request = request.header(*name, value);
    }
    request.body(body).send().await
}
