//! Turns floor-plan walls drawn as vector paths into an occupancy grid and answers
//! shortest-path queries on it.
//!
//! ```no_run
//! use navgraph::{FloorPlan, GraphConfig, Location};
//!
//! let graph = FloorPlan::new(100.0, 100.0)
//!     .with_path("M 0,50 L 40,50 M 50,50 L 100,50")
//!     .build(&GraphConfig::default())?;
//!
//! let path = graph.find_path(Location::new(5.0, 5.0), Location::new(5.0, 95.0));
//! assert!(!path.is_empty());
//! # Ok::<(), navgraph::BuildError>(())
//! ```

pub mod config;
pub mod error;
pub mod find;
pub mod geometry;
pub mod graph;
pub mod grid;
pub mod mapper;
pub mod path;
pub mod util;

pub use config::GraphConfig;
pub use error::{BuildError, PathError};
pub use find::{MapStorage, MapTrait, PathFinder, PathFinderState, PathResult, Visited};
pub use geometry::{Location, Segment, Vector};
pub use graph::{Cell, NavigableGraph, QueryOutcome, QueryRejection, Tag};
pub use grid::OccupancyGrid;
pub use mapper::{CoordinateMapper, Point};
pub use path::parse_path;
pub use util::FloorPlan;
