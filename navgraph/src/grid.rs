use std::fmt::Display;

use log::{trace, warn};

use crate::{
    config::GraphConfig,
    error::{BuildError, Result},
    geometry::{Location, Segment},
    graph::NavigableGraph,
    mapper::{CoordinateMapper, Point},
};

/// Largest number of cells a grid may have
pub const MAX_CELLS: usize = 1 << 24;

/// Past this many samples a segment is only sampled where it crosses the canvas, since sample
/// positions measured from a far away start point are no longer precise
const MAX_PHASED_SAMPLES: f64 = 1e12;

/// Where a segment enters or leaves the canvas
#[derive(Copy, Clone, Debug)]
struct Crossing {
    /// 0 at the start of the segment, 1 at its end
    t: f64,
    x: f64,
    y: f64,
}

/// A rectangular grid of cells that walls are stamped onto.
///
/// This is the first stage of graph construction: cells can only be blocked here. Turning it
/// into a [`NavigableGraph`] consumes the grid, so no cell can change after tags and adjacency
/// exist.
#[derive(Clone, Debug, PartialEq)]
pub struct OccupancyGrid {
    mapper: CoordinateMapper,
    blocked: Vec<bool>,
}

impl OccupancyGrid {
    /// An open grid covering a `width` x `height` canvas. Canvases that would need more than
    /// [`MAX_CELLS`] cells are rejected.
    pub fn new(width: f32, height: f32, config: &GraphConfig) -> Result<Self> {
        config.validate()?;

        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(BuildError::InvalidCanvas { width, height });
        }

        let mapper = CoordinateMapper::new(width, height, config.cell_size)
            .filter(|mapper| mapper.len() <= MAX_CELLS)
            .ok_or(BuildError::InvalidCanvas { width, height })?;

        Ok(Self {
            blocked: vec![false; mapper.len()],
            mapper,
        })
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn is_blocked(&self, point: Point) -> bool {
        self.mapper.contains(point) && self.blocked[self.mapper.slot(point)]
    }

    /// Marks a single cell as impassable. Points outside the grid are ignored.
    pub fn block(&mut self, point: Point) {
        if self.mapper.contains(point) {
            let slot = self.mapper.slot(point);
            self.blocked[slot] = true;
        }
    }

    /// Iterates over the blocked cells in row-major order
    pub fn blocked_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.blocked
            .iter()
            .enumerate()
            .filter(|(_, blocked)| **blocked)
            .map(|(slot, _)| self.mapper.point_of(slot))
    }

    /// Blocks every cell the segment passes through.
    ///
    /// The segment is sampled every half cell starting at its start point, which is enough to
    /// hit every cell the line crosses. Near corners this can also catch a neighbouring cell.
    /// Only the samples over the canvas are visited, so the cost does not depend on how far the
    /// segment reaches outside of it.
    pub fn rasterize(&mut self, segment: &Segment) {
        let (x0, y0) = (f64::from(segment.start.x), f64::from(segment.start.y));
        let (dx, dy) = (
            f64::from(segment.end.x) - x0,
            f64::from(segment.end.y) - y0,
        );
        let length = dx.hypot(dy);

        if !length.is_finite() {
            warn!("skipping {:?}, it has no finite length", segment);
            return;
        }
        if length == 0.0 {
            return;
        }

        let Some((enter, leave)) = self.visible_range(x0, y0, dx, dy) else {
            trace!("{:?} lies outside the grid", segment);
            return;
        };

        let half_cell = f64::from(self.mapper.cell_size()) / 2.0;
        let samples = (length / half_cell).ceil();

        if samples > MAX_PHASED_SAMPLES {
            let visible = Segment::new(
                Location::new(enter.x as f32, enter.y as f32),
                Location::new(leave.x as f32, leave.y as f32),
            );
            if f64::from(visible.length()) / half_cell <= MAX_PHASED_SAMPLES {
                self.rasterize(&visible);
            }
            return;
        }

        // one sample of slack on each side of the canvas crossing
        let first = ((enter.t * length / half_cell).floor() - 1.0).max(0.0);
        let count = ((leave.t - enter.t) * length / half_cell).ceil() as usize + 3;

        for i in (0..count).map(|k| first + k as f64) {
            if i >= samples {
                break;
            }

            let t = i * half_cell / length;
            let sample = Location::new((x0 + dx * t) as f32, (y0 + dy * t) as f32);

            match self.mapper.to_index(sample) {
                Some(point) => self.block(point),
                None => trace!("sample {} of {:?} lies outside the grid", sample, segment),
            }
        }
    }

    /// Clips the line `(x0, y0) + t * (dx, dy)` for `t` in `[0, 1]` to the canvas and returns
    /// where it enters and leaves, or `None` if it misses the canvas
    fn visible_range(&self, x0: f64, y0: f64, dx: f64, dy: f64) -> Option<(Crossing, Crossing)> {
        let cell_size = f64::from(self.mapper.cell_size());
        let width = self.mapper.columns() as f64 * cell_size;
        let height = self.mapper.rows() as f64 * cell_size;

        let mut enter = Crossing {
            t: 0.0,
            x: x0,
            y: y0,
        };
        let mut leave = Crossing {
            t: 1.0,
            x: x0 + dx,
            y: y0 + dy,
        };

        for (p, q, vertical_edge, edge) in [
            (-dx, x0, true, 0.0),
            (dx, width - x0, true, width),
            (-dy, y0, false, 0.0),
            (dy, height - y0, false, height),
        ] {
            if p == 0.0 {
                // parallel to this edge, outside if on the wrong side of it
                if q < 0.0 {
                    return None;
                }
                continue;
            }

            let t = q / p;
            // the coordinate along the edge normal is the edge itself
            let crossing = if vertical_edge {
                Crossing {
                    t,
                    x: edge,
                    y: y0 + dy * t,
                }
            } else {
                Crossing {
                    t,
                    x: x0 + dx * t,
                    y: edge,
                }
            };

            if p < 0.0 {
                if t > enter.t {
                    enter = crossing;
                }
            } else if t < leave.t {
                leave = crossing;
            }
        }

        (enter.t <= leave.t).then_some((enter, leave))
    }

    /// Tags the open cells and links them, see [`NavigableGraph::from_grid`]
    pub fn into_graph(self) -> NavigableGraph {
        NavigableGraph::from_grid(self.mapper, &self.blocked)
    }
}

impl Display for OccupancyGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.blocked.chunks(self.mapper.columns().max(1)) {
            for blocked in row {
                write!(f, "{}", if *blocked { "X" } else { " " })?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
