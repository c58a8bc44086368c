//! Seeds: the starting points of element retrieval.

use std::fmt;

use serde_json::Value;

use crate::encode::{Encode, class, tagged};

/// Directedness of an edge seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectedType {
    /// Match directed edges only.
    Directed,
    /// Match undirected edges only.
    Undirected,
    /// Match edges of either kind.
    Either,
}

impl DirectedType {
    /// Get the wire name of this value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directed => "DIRECTED",
            Self::Undirected => "UNDIRECTED",
            Self::Either => "EITHER",
        }
    }
}

impl fmt::Display for DirectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which end of an edge seed matched the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchedVertex {
    /// The source vertex matched.
    Source,
    /// The destination vertex matched.
    Destination,
}

impl MatchedVertex {
    /// Get the wire name of this value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "SOURCE",
            Self::Destination => "DESTINATION",
        }
    }
}

impl fmt::Display for MatchedVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A seed identifying a single vertex.
///
/// The vertex is opaque: strings, numbers and typed vertex objects are sent
/// exactly as given.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySeed {
    vertex: Value,
}

impl EntitySeed {
    /// Create a seed for the given vertex.
    pub fn new(vertex: impl Into<Value>) -> Self {
        Self {
            vertex: vertex.into(),
        }
    }

    /// Get the vertex identifier.
    pub fn vertex(&self) -> &Value {
        &self.vertex
    }
}

impl Encode for EntitySeed {
    fn encode(&self) -> Value {
        let mut obj = tagged(class::ENTITY_SEED);
        obj.insert("vertex".to_string(), self.vertex.clone());
        Value::Object(obj)
    }
}

/// A seed identifying an edge between two vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeSeed {
    source: Option<Value>,
    destination: Option<Value>,
    directed_type: Option<DirectedType>,
    matched_vertex: Option<MatchedVertex>,
}

impl EdgeSeed {
    /// Create a seed for the edge between `source` and `destination`.
    pub fn new(source: impl Into<Value>, destination: impl Into<Value>) -> Self {
        Self::default().source(source).destination(destination)
    }

    /// Set the source vertex.
    pub fn source(mut self, source: impl Into<Value>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the destination vertex.
    pub fn destination(mut self, destination: impl Into<Value>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Set the directedness.
    pub fn directed_type(mut self, directed_type: DirectedType) -> Self {
        self.directed_type = Some(directed_type);
        self
    }

    /// Set the matched vertex.
    pub fn matched_vertex(mut self, matched_vertex: MatchedVertex) -> Self {
        self.matched_vertex = Some(matched_vertex);
        self
    }
}

impl Encode for EdgeSeed {
    fn encode(&self) -> Value {
        let mut obj = tagged(class::EDGE_SEED);
        if let Some(ref source) = self.source {
            obj.insert("source".to_string(), source.clone());
        }
        if let Some(ref destination) = self.destination {
            obj.insert("destination".to_string(), destination.clone());
        }
        if let Some(matched) = self.matched_vertex {
            obj.insert("matchedVertex".to_string(), Value::from(matched.as_str()));
        }
        if let Some(directed) = self.directed_type {
            obj.insert("directedType".to_string(), Value::from(directed.as_str()));
        }
        Value::Object(obj)
    }
}

/// Any seed accepted as operation input.
#[derive(Debug, Clone, PartialEq)]
pub enum Seed {
    /// A vertex seed.
    Entity(EntitySeed),
    /// An edge seed.
    Edge(EdgeSeed),
}

impl Encode for Seed {
    fn encode(&self) -> Value {
        match self {
            Self::Entity(seed) => seed.encode(),
            Self::Edge(seed) => seed.encode(),
        }
    }
}

impl From<EntitySeed> for Seed {
    fn from(seed: EntitySeed) -> Self {
        Self::Entity(seed)
    }
}

impl From<EdgeSeed> for Seed {
    fn from(seed: EdgeSeed) -> Self {
        Self::Edge(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_seed_encoding() {
        assert_eq!(
            EntitySeed::new("v1").encode(),
            json!({"class": class::ENTITY_SEED, "vertex": "v1"})
        );
    }

    #[test]
    fn test_entity_seed_opaque_vertex() {
        let seed = EntitySeed::new(json!({"type": "ip", "value": "10.0.0.1"}));
        assert_eq!(seed.encode()["vertex"]["value"], "10.0.0.1");
        assert_eq!(EntitySeed::new(7).encode()["vertex"], 7);
    }

    #[test]
    fn test_edge_seed_omits_absent_fields() {
        assert_eq!(EdgeSeed::default().encode(), json!({"class": class::EDGE_SEED}));

        let seed = EdgeSeed::default().source("a");
        assert_eq!(seed.encode(), json!({"class": class::EDGE_SEED, "source": "a"}));
    }

    #[test]
    fn test_edge_seed_full() {
        let seed = EdgeSeed::new("a", "b")
            .directed_type(DirectedType::Directed)
            .matched_vertex(MatchedVertex::Source);
        assert_eq!(
            seed.encode(),
            json!({
                "class": class::EDGE_SEED,
                "source": "a",
                "destination": "b",
                "directedType": "DIRECTED",
                "matchedVertex": "SOURCE",
            })
        );
    }

    #[test]
    fn test_seed_dispatch() {
        let seed = Seed::from(EntitySeed::new("v"));
        assert_eq!(seed.encode()["class"], class::ENTITY_SEED);
        let seed = Seed::from(EdgeSeed::new("a", "b"));
        assert_eq!(seed.encode()["class"], class::EDGE_SEED);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(DirectedType::Undirected.to_string(), "UNDIRECTED");
        assert_eq!(DirectedType::Either.as_str(), "EITHER");
        assert_eq!(MatchedVertex::Destination.to_string(), "DESTINATION");
    }
}
