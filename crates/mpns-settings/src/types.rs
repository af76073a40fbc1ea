//! Settings type definitions.
//!
//! All types use camelCase JSON and `#[serde(default)]`, so a partial
//! settings file only overrides what it names.

use std::path::{Path, PathBuf};

use mpns_core::{TlsOptions, TransportOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// ```json
/// {
///   "logging": { "level": "info" },
///   "transport": { "certPath": "~/.mpns/cert.pem", "keyPath": "~/.mpns/key.pem" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MpnsSettings {
    /// Log output.
    pub logging: LoggingSettings,
    /// Proxy and TLS material for outgoing requests.
    pub transport: TransportSettings,
}

/// Log output settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Proxy and TLS settings. Certificate material is referenced by path and
/// read by [`TransportSettings::load_options`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportSettings {
    /// Forward proxy URL.
    pub proxy: Option<String>,
    /// PEM client certificate file.
    pub cert_path: Option<String>,
    /// PEM private key file.
    pub key_path: Option<String>,
    /// PEM CA bundle file.
    pub ca_path: Option<String>,
    /// Passphrase for an encrypted private key.
    pub passphrase: Option<String>,
    /// Cipher list.
    pub ciphers: Option<String>,
    /// Verify the server certificate.
    pub reject_unauthorized: bool,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            proxy: None,
            cert_path: None,
            key_path: None,
            ca_path: None,
            passphrase: None,
            ciphers: None,
            reject_unauthorized: true,
        }
    }
}

impl TransportSettings {
    /// Read the referenced certificate files into per-call transport options.
    ///
    /// Certificate and key are only loaded as a pair; one without the other
    /// is ignored, matching how authenticated channels are configured.
    pub fn load_options(&self) -> Result<TransportOptions> {
        if self.proxy.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(SettingsError::InvalidValue("proxy is empty".to_string()));
        }

        let (cert, key) = match (&self.cert_path, &self.key_path) {
            (Some(cert), Some(key)) => (
                Some(read_material("certificate", cert)?),
                Some(read_material("private key", key)?),
            ),
            _ => (None, None),
        };
        let ca = self
            .ca_path
            .as_deref()
            .map(|path| read_material("CA bundle", path))
            .transpose()?;

        Ok(TransportOptions {
            proxy: self.proxy.clone(),
            tls: TlsOptions {
                cert,
                key,
                passphrase: self.passphrase.clone(),
                ca,
                ciphers: self.ciphers.clone(),
                reject_unauthorized: self.reject_unauthorized,
            },
        })
    }
}

/// Expand a leading `~/` against `$HOME`.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        return PathBuf::from(home).join(rest);
    }
    PathBuf::from(path)
}

fn read_material(what: &'static str, path: &str) -> Result<String> {
    let path = expand_home(path);
    debug!(what, path = %path.display(), "loading TLS material");
    read_file(what, &path)
}

fn read_file(what: &'static str, path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| SettingsError::Material {
        what,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn defaults() {
        let settings = MpnsSettings::default();
        assert_eq!(settings.logging.level, "warn");
        assert!(settings.transport.reject_unauthorized);
        assert!(settings.transport.proxy.is_none());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: MpnsSettings =
            serde_json::from_str(r#"{"transport": {"proxy": "http://p:8080"}}"#).unwrap();
        assert_eq!(settings.transport.proxy.as_deref(), Some("http://p:8080"));
        assert!(settings.transport.reject_unauthorized);
        assert_eq!(settings.logging.level, "warn");
    }

    #[test]
    fn camel_case_keys() {
        let json = serde_json::to_value(MpnsSettings::default()).unwrap();
        assert!(json["transport"].get("rejectUnauthorized").is_some());
        assert!(json["transport"].get("certPath").is_some());
    }

    #[test]
    fn load_options_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");
        let ca = dir.path().join("ca.pem");
        std::fs::write(&cert, "CERT").unwrap();
        std::fs::write(&key, "KEY").unwrap();
        std::fs::write(&ca, "CA").unwrap();

        let settings = TransportSettings {
            cert_path: Some(cert.to_string_lossy().to_string()),
            key_path: Some(key.to_string_lossy().to_string()),
            ca_path: Some(ca.to_string_lossy().to_string()),
            reject_unauthorized: false,
            ..TransportSettings::default()
        };
        let options = settings.load_options().unwrap();
        assert_eq!(options.tls.cert.as_deref(), Some("CERT"));
        assert_eq!(options.tls.key.as_deref(), Some("KEY"));
        assert_eq!(options.tls.ca.as_deref(), Some("CA"));
        assert!(!options.tls.reject_unauthorized);
    }

    #[test]
    fn cert_without_key_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        std::fs::write(&cert, "CERT").unwrap();
        let settings = TransportSettings {
            cert_path: Some(cert.to_string_lossy().to_string()),
            ..TransportSettings::default()
        };
        let options = settings.load_options().unwrap();
        assert!(options.tls.cert.is_none());
        assert!(!options.tls.has_identity());
    }

    #[test]
    fn missing_file_is_an_error() {
        let settings = TransportSettings {
            ca_path: Some("/nonexistent/ca.pem".to_string()),
            ..TransportSettings::default()
        };
        assert_matches!(
            settings.load_options(),
            Err(SettingsError::Material { what: "CA bundle", .. })
        );
    }

    #[test]
    fn empty_proxy_is_invalid() {
        let settings = TransportSettings {
            proxy: Some("  ".to_string()),
            ..TransportSettings::default()
        };
        assert_matches!(settings.load_options(), Err(SettingsError::InvalidValue(_)));
    }

    #[test]
    fn expand_home_plain_path() {
        assert_eq!(expand_home("/a/b"), PathBuf::from("/a/b"));
        assert!(!expand_home("~/x.pem").starts_with("~"));
    }
}
