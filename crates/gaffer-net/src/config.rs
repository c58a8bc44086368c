//! Client configuration and its resolution from the environment.
//!
//! Environment fallbacks are read once, when a client is built or certificate
//! paths are resolved. Nothing else in the crate reads the environment.
//!
//! | Setting | Explicit | Environment | Default |
//! |---|---|---|---|
//! | Base URL | `GafferClientBuilder::url` | `GAFFER` | `https://localhost:8080` |
//! | Private directory | `CertPaths::private_dir` | `PRIVATE` | `$HOME/private` |
//! | Client key | `CertPaths::key` | | `<private>/key.me` |
//! | Client certificate | `CertPaths::cert` | | `<private>/cert.me` |
//! | CA certificate | `CertPaths::ca` | | `<private>/cert.ca` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GafferError, Result};
use crate::tls::TlsConfig;

/// Base URL used when neither an explicit URL nor `GAFFER` is set.
pub const DEFAULT_URL: &str = "https://localhost:8080";

/// Environment variable overriding the base URL.
pub const URL_VAR: &str = "GAFFER";

/// Environment variable overriding the private-material directory.
pub const PRIVATE_VAR: &str = "PRIVATE";

/// Environment variable holding the user's home directory.
pub const HOME_VAR: &str = "HOME";

/// Default client key file name.
pub const KEY_FILE: &str = "key.me";

/// Default client certificate file name.
pub const CERT_FILE: &str = "cert.me";

/// Default CA certificate file name.
pub const CA_FILE: &str = "cert.ca";

/// Read a variable from the process environment, ignoring empty values.
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Resolve the base URL: explicit value, then `GAFFER`, then [`DEFAULT_URL`].
///
/// A trailing slash is removed so paths can be appended directly.
pub fn resolve_url<F>(explicit: Option<&str>, env: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let url = explicit
        .map(str::to_string)
        .or_else(|| env(URL_VAR))
        .unwrap_or_else(|| DEFAULT_URL.to_string());
    url.trim_end_matches('/').to_string()
}

/// Configuration for the Gaffer client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the Gaffer service.
    pub url: String,
    /// Timeout for buffered requests, body included. Unset by default.
    pub timeout: Option<Duration>,
    /// Connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Whether to enable cookie storage.
    pub cookies_enabled: bool,
    /// Default user agent.
    pub user_agent: Option<String>,
    /// TLS configuration.
    pub tls: TlsConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout: None,
            connect_timeout: Some(Duration::from_secs(10)),
            cookies_enabled: true,
            user_agent: Some(format!("gaffer-rs/{} (Rust)", env!("CARGO_PKG_VERSION"))),
            tls: TlsConfig::default(),
        }
    }
}

/// Locations of the mutual TLS material, possibly partially specified.
///
/// Unset file paths default to well-known names inside the private
/// directory; see the [module documentation](self).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CertPaths {
    /// Client private key.
    pub key: Option<PathBuf>,
    /// Client certificate.
    pub cert: Option<PathBuf>,
    /// CA certificate used to verify the server.
    pub ca: Option<PathBuf>,
    /// Directory holding the default files.
    pub private_dir: Option<PathBuf>,
}

impl CertPaths {
    /// Create paths that resolve entirely from the environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the client key path.
    pub fn key(mut self, path: impl Into<PathBuf>) -> Self {
        self.key = Some(path.into());
        self
    }

    /// Set the client certificate path.
    pub fn cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.cert = Some(path.into());
        self
    }

    /// Set the CA certificate path.
    pub fn ca(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca = Some(path.into());
        self
    }

    /// Set the private-material directory.
    pub fn private_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.private_dir = Some(path.into());
        self
    }

    /// Resolve against the process environment.
    pub fn resolve(&self) -> Result<CertFiles> {
        self.resolve_with(env_var)
    }

    /// Resolve against the given environment lookup.
    ///
    /// The private directory is only looked up when at least one file path
    /// is unset.
    pub fn resolve_with<F>(&self, env: F) -> Result<CertFiles>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let (Some(key), Some(cert), Some(ca)) = (&self.key, &self.cert, &self.ca) {
            return Ok(CertFiles {
                key: key.clone(),
                cert: cert.clone(),
                ca: ca.clone(),
            });
        }

        let private = self.resolve_private_dir(&env)?;
        let pick = |explicit: &Option<PathBuf>, name: &str| {
            explicit.clone().unwrap_or_else(|| private.join(name))
        };

        Ok(CertFiles {
            key: pick(&self.key, KEY_FILE),
            cert: pick(&self.cert, CERT_FILE),
            ca: pick(&self.ca, CA_FILE),
        })
    }

    fn resolve_private_dir<F>(&self, env: &F) -> Result<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ref dir) = self.private_dir {
            return Ok(dir.clone());
        }
        if let Some(dir) = env(PRIVATE_VAR) {
            return Ok(PathBuf::from(dir));
        }
        match env(HOME_VAR) {
            Some(home) => Ok(Path::new(&home).join("private")),
            None => Err(GafferError::Config(format!(
                "cannot locate private directory: neither {} nor {} is set",
                PRIVATE_VAR, HOME_VAR
            ))),
        }
    }
}

/// Fully resolved locations of the mutual TLS material.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CertFiles {
    /// Client private key.
    pub key: PathBuf,
    /// Client certificate.
    pub cert: PathBuf,
    /// CA certificate.
    pub ca: PathBuf,
}
