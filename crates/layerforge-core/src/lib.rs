pub mod data;
pub mod edge;
pub mod error;
pub mod graph;
pub mod id;
pub mod port;
pub mod value;
pub mod vertex;

// Re-export commonly used types
pub use data::{EdgeData, GeoData, GraphData, PortData, VertexData};
pub use edge::{Consistency, Edge};
pub use error::CoreError;
pub use graph::{Graph, DEFAULT_ID_RANGE};
pub use id::{EdgeId, IdNamespace, VertexId};
pub use port::{Port, PortDirection, PortSide};
pub use value::{stringify, Dims, Value, ValueKind, ValueWrapper, DEFAULT_MAX_DIMS, DEFAULT_MIN_DIMS};
pub use vertex::Vertex;
