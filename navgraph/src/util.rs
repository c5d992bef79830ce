use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::GraphConfig,
    error::{BuildError, Result},
    graph::NavigableGraph,
    grid::OccupancyGrid,
    path::parse_path,
};

/// The walls of a floor plan as handed over by whoever loaded the drawing: the declared canvas
/// size and the `d` data of every path element
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub paths: Vec<String>,
}

impl FloorPlan {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            paths: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Rasterizes every path onto a grid and turns the result into a graph.
    /// The first path that fails to parse aborts the build.
    pub fn build(&self, config: &GraphConfig) -> Result<NavigableGraph> {
        let mut grid = OccupancyGrid::new(self.width, self.height, config)?;

        for (index, path) in self.paths.iter().enumerate() {
            let segments =
                parse_path(path).map_err(|source| BuildError::Path { index, source })?;

            debug!("rasterizing path #{} ({} segments)", index, segments.len());

            for segment in &segments {
                grid.rasterize(segment);
            }
        }

        Ok(grid.into_graph())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::PathError, geometry::Location};

    fn loc(x: f32, y: f32) -> Location {
        Location::new(x, y)
    }

    #[test]
    fn test_wall_with_gap() {
        let graph = FloorPlan::new(100.0, 100.0)
            .with_path("M 0,50 L 40,50 M 50,50 L 100,50")
            .build(&GraphConfig::default())
            .unwrap();

        for col in (0..10).filter(|col| *col != 4) {
            assert!(graph.tag_at(loc(col as f32 * 10.0 + 5.0, 55.0)).is_none());
        }

        let path = graph.find_path(loc(5.0, 5.0), loc(5.0, 95.0));

        assert!(!path.is_empty());
        assert!(path.contains(&loc(40.0, 50.0)));
        assert_eq!(path.first(), Some(&loc(0.0, 90.0)));
    }

    #[test]
    fn test_closed_wall() {
        let graph = FloorPlan::new(100.0, 100.0)
            .with_path("M 0,50 L 100,50")
            .build(&GraphConfig::default())
            .unwrap();

        assert!(graph.find_path(loc(5.0, 5.0), loc(5.0, 95.0)).is_empty());
        assert!(!graph.find_path(loc(5.0, 5.0), loc(95.0, 45.0)).is_empty());
    }

    #[test]
    fn test_empty_path_blocks_nothing() {
        let graph = FloorPlan::new(100.0, 100.0)
            .with_path("")
            .build(&GraphConfig::default())
            .unwrap();

        assert_eq!(graph.passable_count(), 100);
    }

    #[test]
    fn test_room_outline() {
        // a closed room with a door on the bottom wall
        let graph = FloorPlan::new(100.0, 100.0)
            .with_path("M 20,20 L 80,20 L 80,80 L 60,80")
            .with_path("M 49,80 L 20,80 L 20,20")
            .build(&GraphConfig::default())
            .unwrap();

        let inside = loc(45.0, 45.0);
        let outside = loc(5.0, 5.0);

        let path = graph.find_path(outside, inside);
        assert!(!path.is_empty());
        assert!(path.contains(&loc(50.0, 80.0)));
        assert!(graph.tag_at(loc(55.0, 85.0)).is_some());
        assert!(graph.tag_at(loc(65.0, 85.0)).is_none());
    }

    #[test]
    fn test_coarser_cells() {
        let graph = FloorPlan::new(100.0, 100.0)
            .with_path("M 0,50 L 100,50")
            .build(&GraphConfig::with_cell_size(25.0))
            .unwrap();

        assert_eq!(graph.columns(), 4);
        assert_eq!(graph.rows(), 4);
        assert_eq!(graph.passable_count(), 12);
    }

    #[test]
    fn test_parse_error_names_path() {
        let plan = FloorPlan::new(100.0, 100.0)
            .with_path("M 0,0 L 10,10")
            .with_path("M 0,0 H 10");

        assert_eq!(
            plan.build(&GraphConfig::default()).unwrap_err(),
            BuildError::Path {
                index: 1,
                source: PathError::MalformedCommand {
                    character: 'H',
                    path: "M 0,0 H 10".to_string()
                }
            }
        );
    }

    #[test]
    fn test_huge_canvas_is_an_error() {
        assert_eq!(
            FloorPlan::new(1e12, 1e12).build(&GraphConfig::default()).unwrap_err(),
            BuildError::InvalidCanvas {
                width: 1e12,
                height: 1e12
            }
        );
    }

    #[test]
    fn test_wall_reaching_far_off_canvas() {
        let graph = FloorPlan::new(100.0, 100.0)
            .with_path("M 0,50 L 1e30,50")
            .with_path("M 50,-1e30 L 50,-1e29")
            .build(&GraphConfig::default())
            .unwrap();

        assert_eq!(graph.passable_count(), 90);
        assert!(graph.find_path(loc(5.0, 5.0), loc(5.0, 95.0)).is_empty());
    }

    #[test]
    fn test_from_json() {
        let plan: FloorPlan =
            serde_json::from_str(r#"{ "width": 30, "height": 20, "paths": ["M 0,0 l 30,0"] }"#)
                .unwrap();
        let graph = plan.build(&GraphConfig::default()).unwrap();

        assert_eq!(graph.to_string(), "XXX\n   \n");
    }
}
