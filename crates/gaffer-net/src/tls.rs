//! TLS material for connecting to a Gaffer service.
//!
//! Gaffer deployments commonly require mutual TLS: the client presents a
//! certificate and key, and verifies the server against a private CA.
//!
//! # Custom CA Certificates
//!
//! ```ignore
//! use gaffer_net::tls::{Certificate, TlsConfig};
//!
//! let ca_cert = Certificate::from_pem_file("/path/to/cert.ca")?;
//! let tls = TlsConfig::new()
//!     .add_root_certificate(ca_cert)
//!     .use_only_custom_roots();
//! ```
//!
//! # Client Certificates (mTLS)
//!
//! ```ignore
//! use gaffer_net::tls::Identity;
//!
//! let identity = Identity::from_pem_files("/path/to/cert.me", "/path/to/key.me")?;
//! let client = GafferClient::builder()
//!     .identity(identity)
//!     .build()?;
//! ```
//!
//! Most callers use [`CertPaths`](crate::CertPaths) instead, which locates
//! all three files in the private-material directory.

use std::io::{BufReader, Cursor};
use std::path::Path;

use rustls_pki_types::CertificateDer;

use crate::config::CertFiles;
use crate::error::{GafferError, Result};

/// Minimum TLS protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsVersion {
    /// TLS 1.2 (default minimum).
    #[default]
    Tls1_2,
    /// TLS 1.3 (most secure).
    Tls1_3,
}

impl TlsVersion {
    /// Convert to reqwest TLS version.
    pub(crate) fn to_reqwest_version(self) -> reqwest::tls::Version {
        match self {
            TlsVersion::Tls1_2 => reqwest::tls::Version::TLS_1_2,
            TlsVersion::Tls1_3 => reqwest::tls::Version::TLS_1_3,
        }
    }
}

fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        GafferError::Tls(format!(
            "Failed to read {} file '{}': {}",
            what,
            path.display(),
            e
        ))
    })
}

fn parse_certs(pem: &[u8]) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = BufReader::new(Cursor::new(pem));
    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| GafferError::Tls(format!("Failed to parse PEM certificate: {}", e)))?;

    if certs.is_empty() {
        return Err(GafferError::Tls(
            "No certificates found in PEM data".to_string(),
        ));
    }
    Ok(certs)
}

/// A CA certificate (or chain) used to verify the server.
#[derive(Clone)]
pub struct Certificate {
    der_certs: Vec<CertificateDer<'static>>,
}

impl std::fmt::Debug for Certificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Certificate")
            .field("cert_count", &self.der_certs.len())
            .finish()
    }
}

impl Certificate {
    /// Load a certificate from PEM-encoded bytes.
    ///
    /// This can contain multiple certificates (a certificate chain).
    pub fn from_pem(pem_data: impl AsRef<[u8]>) -> Result<Self> {
        Ok(Self {
            der_certs: parse_certs(pem_data.as_ref())?,
        })
    }

    /// Load a certificate from a PEM-encoded file.
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_pem(read_pem(path.as_ref(), "certificate")?)
    }

    /// Get the number of certificates loaded.
    pub fn len(&self) -> usize {
        self.der_certs.len()
    }

    /// Check whether no certificates were loaded.
    pub fn is_empty(&self) -> bool {
        self.der_certs.is_empty()
    }

    /// Convert to reqwest certificates for use with the HTTP client.
    ///
    /// Fails if any certificate in the chain is rejected.
    pub(crate) fn to_reqwest_certificates(&self) -> Result<Vec<reqwest::Certificate>> {
        self.der_certs
            .iter()
            .enumerate()
            .map(|(index, cert)| {
                reqwest::Certificate::from_der(cert.as_ref()).map_err(|e| {
                    GafferError::Tls(format!("Failed to load certificate {}: {}", index, e))
                })
            })
            .collect()
    }
}

/// Client identity for mutual TLS: a certificate chain and its private key.
#[derive(Clone)]
pub struct Identity {
    cert_pem: Vec<u8>,
    key_pem: Vec<u8>,
    cert_count: usize,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("cert_count", &self.cert_count)
            .field("has_key", &true)
            .finish()
    }
}

impl Identity {
    /// Create an identity from PEM-encoded certificate and key bytes.
    ///
    /// The certificate can be a single certificate or a chain (with the client
    /// certificate first, followed by intermediate certificates).
    pub fn from_pem(cert_pem: impl AsRef<[u8]>, key_pem: impl AsRef<[u8]>) -> Result<Self> {
        let cert_count = parse_certs(cert_pem.as_ref())?.len();

        let mut key_reader = BufReader::new(Cursor::new(key_pem.as_ref()));
        rustls_pemfile::private_key(&mut key_reader)
            .map_err(|e| GafferError::Tls(format!("Failed to parse private key PEM: {}", e)))?
            .ok_or_else(|| GafferError::Tls("No private key found in PEM data".to_string()))?;

        Ok(Self {
            cert_pem: cert_pem.as_ref().to_vec(),
            key_pem: key_pem.as_ref().to_vec(),
            cert_count,
        })
    }

    /// Create an identity from PEM-encoded files.
    pub fn from_pem_files(
        cert_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let cert_pem = read_pem(cert_path.as_ref(), "certificate")?;
        let key_pem = read_pem(key_path.as_ref(), "key")?;
        Self::from_pem(cert_pem, key_pem)
    }

    /// Get the number of certificates in the chain.
    pub fn cert_count(&self) -> usize {
        self.cert_count
    }

    /// Convert to reqwest Identity for use with the HTTP client.
    ///
    /// reqwest expects the certificate chain and key in one PEM buffer.
    pub(crate) fn to_reqwest_identity(&self) -> Result<reqwest::Identity> {
        let mut pem = Vec::with_capacity(self.cert_pem.len() + self.key_pem.len() + 1);
        pem.extend_from_slice(&self.cert_pem);
        if !pem.ends_with(b"\n") {
            pem.push(b'\n');
        }
        pem.extend_from_slice(&self.key_pem);

        reqwest::Identity::from_pem(&pem)
            .map_err(|e| GafferError::Tls(format!("Failed to create identity: {}", e)))
    }
}

/// TLS settings applied to the client's connection context.
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// Additional root certificates to trust.
    pub root_certificates: Vec<Certificate>,
    /// Whether to use only the provided root certificates (no system roots).
    pub use_only_custom_roots: bool,
    /// Client identity for mutual TLS.
    pub identity: Option<Identity>,
    /// Minimum TLS version.
    pub min_version: TlsVersion,
    /// Accept invalid/self-signed certificates (DANGEROUS - testing only).
    pub danger_accept_invalid_certs: bool,
}

impl TlsConfig {
    /// Create a new TLS configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root certificate to trust.
    pub fn add_root_certificate(mut self, cert: Certificate) -> Self {
        self.root_certificates.push(cert);
        self
    }

    /// Use only custom root certificates (disable system roots).
    pub fn use_only_custom_roots(mut self) -> Self {
        self.use_only_custom_roots = true;
        self
    }

    /// Set the client identity for mutual TLS.
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Set the minimum TLS version.
    pub fn min_version(mut self, version: TlsVersion) -> Self {
        self.min_version = version;
        self
    }

    /// Accept invalid certificates (DANGEROUS - for testing only).
    ///
    /// # Warning
    ///
    /// This disables certificate verification and makes the connection
    /// vulnerable to man-in-the-middle attacks.
    pub fn danger_accept_invalid_certs(mut self) -> Self {
        self.danger_accept_invalid_certs = true;
        self
    }

    /// Load the client identity and CA from resolved private-material files.
    ///
    /// The CA becomes the only trusted root, so the server must present a
    /// certificate issued by it.
    pub fn with_cert_files(self, files: &CertFiles) -> Result<Self> {
        let identity = Identity::from_pem_files(&files.cert, &files.key)?;
        let ca = Certificate::from_pem_file(&files.ca)?;
        tracing::debug!(
            target: "gaffer_net::tls",
            "Loaded client identity from '{}' and CA from '{}'",
            files.cert.display(),
            files.ca.display()
        );

        let mut config = self.identity(identity).use_only_custom_roots();
        config.root_certificates = vec![ca];
        Ok(config)
    }

    /// Check if this configuration has any custom settings.
    pub fn is_default(&self) -> bool {
        self.root_certificates.is_empty()
            && !self.use_only_custom_roots
            && self.identity.is_none()
            && self.min_version == TlsVersion::Tls1_2
            && !self.danger_accept_invalid_certs
    }
}
