//! Campus Core - Map data model for Campus Route
//!
//! This crate holds the types every other crate speaks: map nodes,
//! pathways between them, the raw dataset document they are loaded
//! from, and the error taxonomy shared by loading and routing.
//!
//! It also owns the single coordinate transform used to turn
//! normalized map coordinates (0-100) into canvas pixels, so nodes,
//! pathways and computed routes are always drawn with the same math.
//!
//! # Example
//!
//! ```
//! use campus_core::{CanvasTransform, MapNode, NodeKind, Point};
//!
//! let gate = MapNode::new("g1", 50.0, 50.0, NodeKind::Gate).with_name("Gate 1");
//! assert!(gate.kind.is_landmark());
//!
//! let px = CanvasTransform::default().to_canvas(gate.position(), 800.0, 600.0);
//! assert!(px.x > 0.0 && px.y > 0.0);
//! # let _ = Point::new(0.0, 0.0);
//! ```

pub mod dataset;
pub mod error;
pub mod node;
pub mod pathway;
pub mod transform;

pub use dataset::{Dataset, RawNode, RawPathway};
pub use error::{ConfigError, LoadError, MalformedData, RouteError};
pub use node::{sort_by_label, MapNode, NodeKind, Point};
pub use pathway::Pathway;
pub use transform::{CanvasPoint, CanvasTransform};
