//! Client for the Gaffer graph REST API.
//!
//! Operations are built with [`gaffer_core`] and submitted through a
//! [`GafferClient`]:
//!
//! ```ignore
//! use gaffer_core::{GetElements, EntitySeed, IncludeIncomingOutgoing};
//! use gaffer_net::GafferClient;
//!
//! let client = GafferClient::with_url("https://localhost:8080")?;
//!
//! let op = GetElements::for_seeds([EntitySeed::new("v1")])
//!     .edges(["knows"])
//!     .include(IncludeIncomingOutgoing::Outgoing);
//! let result = client.execute(op).await?;
//! ```
//!
//! ## Chunked results
//!
//! Large result sets can be read as the service produces them:
//!
//! ```ignore
//! let mut lines = client.execute_chunked(GetAllElements::new()).await?;
//! while let Some(element) = lines.next_json::<serde_json::Value>().await? {
//!     println!("{}", element);
//! }
//! ```
//!
//! ## Mutual TLS
//!
//! ```ignore
//! use gaffer_net::{CertPaths, GafferClient};
//!
//! // key.me, cert.me and cert.ca under $PRIVATE, or $HOME/private
//! let client = GafferClient::builder()
//!     .use_cert(CertPaths::new())
//!     .build()?;
//! ```
//!
//! ## Configuration
//!
//! ```ignore
//! let client = GafferClient::builder()
//!     .url("https://gaffer.example:8443")
//!     .timeout(Duration::from_secs(60))
//!     .no_cookies()
//!     .build()?;
//! ```
//!
//! Without an explicit URL the client reads `GAFFER`, falling back to
//! [`config::DEFAULT_URL`].

pub mod config;
mod error;
pub mod http;
pub mod tls;

pub use config::{CertFiles, CertPaths, ClientConfig};
pub use error::{GafferError, Result};
pub use http::{
    GafferClient, GafferClientBuilder, GafferRequest, GafferResponse, HttpMethod, LineStream,
    RequestBody,
};
pub use tls::{Certificate, Identity, TlsConfig, TlsVersion};
