//! HTTP transport for the Gaffer REST API.
//!
//! # Example
//!
//! ```ignore
//! use gaffer_core::GetAllElements;
//! use gaffer_net::http::GafferClient;
//!
//! let client = GafferClient::new()?;
//!
//! // Buffered execution
//! let result = client.execute(GetAllElements::new()).await?;
//!
//! // Chunked execution, one element per line
//! let mut lines = client.execute_chunked(GetAllElements::new()).await?;
//! while let Some(line) = lines.next_line().await? {
//!     println!("{}", line);
//! }
//! ```

mod client;
mod request;
mod response;
mod stream;

pub use client::{EXECUTE_CHUNKED_PATH, EXECUTE_PATH, GafferClient, GafferClientBuilder};
pub use request::{GafferRequest, HttpMethod, RequestBody};
pub use response::GafferResponse;
pub use stream::LineStream;
