//! JSON encoding shared by every request body component.

use serde_json::{Map, Value};

/// Server-side class tags carried in the `class` field of encoded objects.
pub mod class {
    /// Seed identifying a single vertex.
    pub const ENTITY_SEED: &str = "uk.gov.gchq.gaffer.operation.data.EntitySeed";
    /// Seed identifying an edge between two vertices.
    pub const EDGE_SEED: &str = "uk.gov.gchq.gaffer.operation.data.EdgeSeed";
    /// Retrieve every element in the graph.
    pub const GET_ALL_ELEMENTS: &str = "uk.gov.gchq.gaffer.operation.impl.get.GetAllElements";
    /// Retrieve elements related to a set of seeds.
    pub const GET_ELEMENTS: &str = "uk.gov.gchq.gaffer.operation.impl.get.GetElements";
    /// Truncate the results of the previous step.
    pub const LIMIT: &str = "uk.gov.gchq.gaffer.operation.impl.Limit";
    /// Multi-hop traversal.
    pub const GET_WALKS: &str = "uk.gov.gchq.gaffer.operation.impl.GetWalks";
    /// Ordered pipeline of operations.
    pub const OPERATION_CHAIN: &str = "uk.gov.gchq.gaffer.operation.OperationChain";
}

/// Conversion into the JSON shape the Gaffer REST service expects.
///
/// Implementations are pure: the same value always encodes to the same
/// document, and optional fields that are unset are left out rather than
/// written as `null`.
pub trait Encode {
    /// Encode this value as a JSON document.
    fn encode(&self) -> Value;
}

/// Start an object tagged with the given class.
pub(crate) fn tagged(class: &str) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("class".to_string(), Value::from(class));
    obj
}

/// Encode each item of a sequence, preserving order.
pub(crate) fn encode_all<T: Encode>(items: &[T]) -> Value {
    Value::Array(items.iter().map(Encode::encode).collect())
}
