//! Operation model for the Gaffer graph REST API.
//!
//! This crate describes graph queries as plain values and encodes them into the
//! JSON documents the Gaffer REST service executes:
//!
//! - **Views**: [`ViewGroup`], [`GroupRef`] and [`Groups`] select which element
//!   groups a query returns and which properties are stripped from them
//! - **Seeds**: [`EntitySeed`] and [`EdgeSeed`] identify where a query starts
//! - **Operations**: [`GetAllElements`], [`GetElements`], [`Limit`],
//!   [`GetWalks`] and [`OperationChain`], unified by [`Operation`]
//! - **Payloads**: [`Payload`] is either an operation or a raw JSON document
//!
//! Nothing here performs I/O. Submitting payloads is the job of the
//! `gaffer-net` crate.
//!
//! # Example
//!
//! ```
//! use gaffer_core::{Encode, EntitySeed, GetElements, IncludeIncomingOutgoing, Limit,
//!     Operation, OperationChain, ViewGroup};
//!
//! let get = GetElements::new()
//!     .entities(["person"])
//!     .edges([ViewGroup::new("knows").exclude(["since"])])
//!     .include(IncludeIncomingOutgoing::Outgoing)
//!     .input([EntitySeed::new("alice")]);
//!
//! let chain = OperationChain::new([Operation::from(get), Operation::from(Limit::new(10))]);
//! let json = chain.encode();
//!
//! assert_eq!(json["operations"].as_array().map(Vec::len), Some(2));
//! assert_eq!(json["operations"][1]["resultLimit"], 10);
//! ```
//!
//! # Group selections
//!
//! Each view axis (entities or edges) is a three-state [`Groups`] value:
//!
//! - [`Groups::All`] encodes an empty-but-present map: every group, unfiltered
//! - [`Groups::Only`] encodes one entry per listed group
//! - [`Groups::Excluded`] leaves the axis out of the view entirely

mod encode;
mod error;
mod operation;
mod payload;
mod seed;
mod view;

pub use encode::{Encode, class};
pub use error::{Error, Result};
pub use operation::{
    GetAllElements, GetElements, GetWalks, IncludeIncomingOutgoing, Limit, Operation,
    OperationChain,
};
pub use payload::Payload;
pub use seed::{DirectedType, EdgeSeed, EntitySeed, MatchedVertex, Seed};
pub use view::{GroupRef, Groups, View, ViewGroup};
