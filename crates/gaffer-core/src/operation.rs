//! Operations: single steps of a server-side query pipeline.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::encode::{Encode, class, encode_all, tagged};
use crate::seed::Seed;
use crate::view::{Groups, View};

/// Which edges adjacent to a seed are followed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IncludeIncomingOutgoing {
    /// Follow edges in both directions.
    #[default]
    Either,
    /// Follow edges pointing at the seed.
    Incoming,
    /// Follow edges leaving the seed.
    Outgoing,
}

impl IncludeIncomingOutgoing {
    /// Get the wire name of this value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Either => "EITHER",
            Self::Incoming => "INCOMING",
            Self::Outgoing => "OUTGOING",
        }
    }
}

impl fmt::Display for IncludeIncomingOutgoing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retrieve every element in the graph, filtered by a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetAllElements {
    view: View,
}

impl GetAllElements {
    /// Create an operation returning all entity and edge groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entity group selection.
    pub fn entities(mut self, groups: impl Into<Groups>) -> Self {
        self.view.entities = groups.into();
        self
    }

    /// Set the edge group selection.
    pub fn edges(mut self, groups: impl Into<Groups>) -> Self {
        self.view.edges = groups.into();
        self
    }

    /// Get the view.
    pub fn view(&self) -> &View {
        &self.view
    }
}

impl Encode for GetAllElements {
    fn encode(&self) -> Value {
        let mut op = tagged(class::GET_ALL_ELEMENTS);
        op.insert("view".to_string(), self.view.encode());
        Value::Object(op)
    }
}

/// Retrieve the elements related to a set of seeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetElements {
    view: View,
    include: IncludeIncomingOutgoing,
    input: Option<Vec<Seed>>,
}

impl GetElements {
    /// Create an operation with no input, returning all groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an operation seeded with the given input.
    pub fn for_seeds<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Seed>,
    {
        Self::new().input(seeds)
    }

    /// Set the entity group selection.
    pub fn entities(mut self, groups: impl Into<Groups>) -> Self {
        self.view.entities = groups.into();
        self
    }

    /// Set the edge group selection.
    pub fn edges(mut self, groups: impl Into<Groups>) -> Self {
        self.view.edges = groups.into();
        self
    }

    /// Set which adjacent edges are followed.
    pub fn include(mut self, include: IncludeIncomingOutgoing) -> Self {
        self.include = include;
        self
    }

    /// Set the input seeds.
    pub fn input<I, S>(mut self, seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Seed>,
    {
        self.input = Some(seeds.into_iter().map(Into::into).collect());
        self
    }

    /// Get the view.
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Get the input seeds, if set.
    pub fn seeds(&self) -> Option<&[Seed]> {
        self.input.as_deref()
    }
}

impl Encode for GetElements {
    fn encode(&self) -> Value {
        let mut op = tagged(class::GET_ELEMENTS);
        op.insert("view".to_string(), self.view.encode());
        op.insert(
            "includeIncomingOutGoing".to_string(),
            Value::from(self.include.as_str()),
        );
        if let Some(ref input) = self.input {
            op.insert("input".to_string(), encode_all(input));
        }
        Value::Object(op)
    }
}

/// Truncate the output of the previous step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    limit: u64,
}

impl Limit {
    /// Create a limit keeping at most `limit` results.
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    /// Get the result limit.
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Encode for Limit {
    fn encode(&self) -> Value {
        let mut op = tagged(class::LIMIT);
        op.insert("resultLimit".to_string(), Value::from(self.limit));
        Value::Object(op)
    }
}

/// A multi-hop traversal made of successive retrieval steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetWalks {
    operations: Vec<Operation>,
    limit: Option<u64>,
}

impl GetWalks {
    /// Create a walk from the given hops.
    pub fn new(operations: impl IntoIterator<Item = Operation>) -> Self {
        Self {
            operations: operations.into_iter().collect(),
            limit: None,
        }
    }

    /// Append a hop.
    pub fn push(mut self, operation: impl Into<Operation>) -> Self {
        self.operations.push(operation.into());
        self
    }

    /// Cap the number of walks returned.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Get the hops in order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}

impl Encode for GetWalks {
    fn encode(&self) -> Value {
        let mut op = tagged(class::GET_WALKS);
        op.insert("operations".to_string(), encode_all(&self.operations));
        if let Some(limit) = self.limit {
            op.insert("resultsLimit".to_string(), Value::from(limit));
        }
        Value::Object(op)
    }
}

/// An ordered pipeline of operations, executed in sequence by the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationChain {
    operations: Vec<Operation>,
}

impl OperationChain {
    /// Create a chain from the given operations.
    pub fn new(operations: impl IntoIterator<Item = Operation>) -> Self {
        Self {
            operations: operations.into_iter().collect(),
        }
    }

    /// Append an operation.
    pub fn push(mut self, operation: impl Into<Operation>) -> Self {
        self.operations.push(operation.into());
        self
    }

    /// Get the operations in order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Get the number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Encode for OperationChain {
    fn encode(&self) -> Value {
        let mut op = tagged(class::OPERATION_CHAIN);
        op.insert("operations".to_string(), encode_all(&self.operations));
        Value::Object(op)
    }
}

impl<O: Into<Operation>> FromIterator<O> for OperationChain {
    fn from_iter<I: IntoIterator<Item = O>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into))
    }
}

/// Any operation the client can submit.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// See [`GetAllElements`].
    GetAllElements(GetAllElements),
    /// See [`GetElements`].
    GetElements(GetElements),
    /// See [`Limit`].
    Limit(Limit),
    /// See [`GetWalks`].
    GetWalks(GetWalks),
    /// See [`OperationChain`].
    Chain(OperationChain),
}

impl Operation {
    /// Get the server-side class tag of this operation.
    pub fn class(&self) -> &'static str {
        match self {
            Self::GetAllElements(_) => class::GET_ALL_ELEMENTS,
            Self::GetElements(_) => class::GET_ELEMENTS,
            Self::Limit(_) => class::LIMIT,
            Self::GetWalks(_) => class::GET_WALKS,
            Self::Chain(_) => class::OPERATION_CHAIN,
        }
    }
}

impl Encode for Operation {
    fn encode(&self) -> Value {
        match self {
            Self::GetAllElements(op) => op.encode(),
            Self::GetElements(op) => op.encode(),
            Self::Limit(op) => op.encode(),
            Self::GetWalks(op) => op.encode(),
            Self::Chain(op) => op.encode(),
        }
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode().serialize(serializer)
    }
}

impl From<GetAllElements> for Operation {
    fn from(op: GetAllElements) -> Self {
        Self::GetAllElements(op)
    }
}

impl From<GetElements> for Operation {
    fn from(op: GetElements) -> Self {
        Self::GetElements(op)
    }
}

impl From<Limit> for Operation {
    fn from(op: Limit) -> Self {
        Self::Limit(op)
    }
}

impl From<GetWalks> for Operation {
    fn from(op: GetWalks) -> Self {
        Self::GetWalks(op)
    }
}

impl From<OperationChain> for Operation {
    fn from(op: OperationChain) -> Self {
        Self::Chain(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::EntitySeed;
    use crate::view::ViewGroup;
    use serde_json::json;

    #[test]
    fn test_get_all_elements_default_view() {
        assert_eq!(
            GetAllElements::new().encode(),
            json!({
                "class": class::GET_ALL_ELEMENTS,
                "view": {"entities": {}, "edges": {}},
            })
        );
    }

    #[test]
    fn test_get_all_elements_excluded_axis() {
        let op = GetAllElements::new()
            .entities(Groups::Excluded)
            .edges([ViewGroup::new("knows").exclude(["since"])]);
        assert_eq!(
            op.encode()["view"],
            json!({"edges": {"knows": {"excludeProperties": ["since"]}}})
        );
    }

    #[test]
    fn test_get_elements_without_input() {
        let encoded = GetElements::new().encode();
        assert_eq!(encoded["includeIncomingOutGoing"], "EITHER");
        assert!(encoded.get("input").is_none());
    }

    #[test]
    fn test_get_elements_for_seeds() {
        let op = GetElements::for_seeds([EntitySeed::new("a"), EntitySeed::new("b")]);
        assert_eq!(op.seeds().map(<[Seed]>::len), Some(2));
        assert_eq!(op.encode()["input"][1]["vertex"], "b");
    }

    #[test]
    fn test_limit_encoding() {
        assert_eq!(
            Limit::new(5).encode(),
            json!({"class": class::LIMIT, "resultLimit": 5})
        );
    }

    #[test]
    fn test_get_walks_limit_optional() {
        let walk = GetWalks::new([Operation::from(GetElements::new())]);
        assert!(walk.encode().get("resultsLimit").is_none());

        let walk = walk.push(GetElements::new()).limit(3);
        let encoded = walk.encode();
        assert_eq!(encoded["resultsLimit"], 3);
        assert_eq!(encoded["operations"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_chain_push_preserves_order() {
        let chain = OperationChain::default()
            .push(GetAllElements::new())
            .push(Limit::new(1));
        assert_eq!(chain.len(), 2);
        let encoded = chain.encode();
        assert_eq!(encoded["operations"][0]["class"], class::GET_ALL_ELEMENTS);
        assert_eq!(encoded["operations"][1]["class"], class::LIMIT);
    }

    #[test]
    fn test_chain_from_iterator() {
        let chain: OperationChain = [Limit::new(1), Limit::new(2)].into_iter().collect();
        assert_eq!(chain.operations()[1], Operation::Limit(Limit::new(2)));
    }

    #[test]
    fn test_operation_serialize_matches_encode() {
        let op = Operation::from(Limit::new(9));
        assert_eq!(op.class(), class::LIMIT);
        assert_eq!(serde_json::to_value(&op).unwrap(), op.encode());
    }
}
