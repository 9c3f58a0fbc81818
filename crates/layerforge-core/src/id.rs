//! Id newtypes for graph entities.
//!
//! Vertex and edge ids are opaque strings generated by the graph (see
//! [`Graph::generate_unique_ids`](crate::graph::Graph::generate_unique_ids)).
//! They are distinct newtypes so a `VertexId` cannot be accidentally used
//! where an `EdgeId` is expected. Port ids stay plain strings: they are the
//! port names a layer declares.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Vertex identifier. Also identifies the vertex's layer in the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub String);

/// Edge identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

/// Which id namespace a batch of generated ids must be unique within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdNamespace {
    Vertices,
    Edges,
}

macro_rules! string_id {
    ($ty:ident) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                $ty(s.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(s: String) -> Self {
                $ty(s)
            }
        }

        impl Borrow<str> for $ty {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(VertexId);
string_id!(EdgeId);

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn vertex_id_display() {
        assert_eq!(format!("{}", VertexId::from("417")), "417");
    }

    #[test]
    fn edge_id_display() {
        assert_eq!(format!("{}", EdgeId::from("e9")), "e9");
    }

    #[test]
    fn ids_serialize_as_bare_strings() {
        let json = serde_json::to_string(&VertexId::from("12")).unwrap();
        assert_eq!(json, "\"12\"");
        let back: EdgeId = serde_json::from_str("\"e1\"").unwrap();
        assert_eq!(back, EdgeId::from("e1"));
    }

    #[test]
    fn maps_keyed_by_id_can_be_queried_with_str() {
        let mut map = HashMap::new();
        map.insert(VertexId::from("a"), 1);
        assert_eq!(map.get("a"), Some(&1));
    }
}
