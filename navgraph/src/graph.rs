use std::fmt::Display;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    find::{
        MapStorage, MapTrait, NodeReference, PathFinder, PathFinderState, PathResult, Visited,
    },
    geometry::Location,
    mapper::{CoordinateMapper, Direction, Point},
};

/// Identifier of a passable cell. Tags are handed out in row-major order starting at zero and
/// double as indices into the graph's vertex arena.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag(pub usize);

impl Tag {
    pub fn index(self) -> usize {
        self.0
    }
}

impl NodeReference for Tag {}

/// One slot of the grid
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Cell {
    /// A wall, never part of the graph
    Blocked,
    Open(Tag),
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Cell::Blocked => "X",
                Cell::Open(_) => " ",
            }
        )
    }
}

/// A passable cell
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub point: Point,
    /// Top-left corner of the cell in map space
    pub anchor: Location,
}

/// Up to four passable neighbours in left, up, right, down order, packed to the front
pub type Neighbours = [Option<Tag>; 4];

/// Why a query was turned down before searching
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum QueryRejection {
    StartOutOfBounds,
    StartBlocked,
    GoalOutOfBounds,
    GoalBlocked,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryOutcome {
    Rejected(QueryRejection),
    /// Both ends are passable but not connected
    Unreachable,
    Found(PathResult<Tag>),
}

/// The walkable part of a floor plan: every open cell tagged and linked to its open
/// 4-neighbours. The graph is immutable once built; searches keep their state in storage
/// created with [`MapTrait::create_storage`].
#[derive(Clone, Debug)]
pub struct NavigableGraph {
    mapper: CoordinateMapper,
    cells: Vec<Cell>,
    vertices: Vec<Vertex>,
    neighbours: Vec<Neighbours>,
}

impl NavigableGraph {
    /// Tags every cell that is not `blocked` in row-major order, then links each tagged cell to
    /// its tagged neighbours. `blocked` holds one flag per slot of `mapper`.
    pub(crate) fn from_grid(mapper: CoordinateMapper, blocked: &[bool]) -> Self {
        let mut cells = Vec::with_capacity(mapper.len());
        let mut vertices = Vec::new();

        for (slot, blocked) in blocked.iter().enumerate() {
            if *blocked {
                cells.push(Cell::Blocked);
                continue;
            }

            let point = mapper.point_of(slot);
            cells.push(Cell::Open(Tag(vertices.len())));
            vertices.push(Vertex {
                point,
                anchor: mapper.to_location(point),
            });
        }

        let neighbours = vertices
            .iter()
            .map(|vertex| Self::link(&mapper, &cells, vertex.point))
            .collect();

        info!(
            "built graph of {}x{} cells, {} passable",
            mapper.columns(),
            mapper.rows(),
            vertices.len()
        );

        Self {
            mapper,
            cells,
            vertices,
            neighbours,
        }
    }

    fn link(mapper: &CoordinateMapper, cells: &[Cell], point: Point) -> Neighbours {
        let mut entries = [None; 4];
        let open = Direction::NEIGHBOUR_ORDER
            .into_iter()
            .filter_map(|direction| mapper.step(point, direction))
            .filter_map(|next| match cells[mapper.slot(next)] {
                Cell::Open(tag) => Some(tag),
                Cell::Blocked => None,
            });

        for (entry, tag) in entries.iter_mut().zip(open) {
            *entry = Some(tag);
        }

        entries
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn columns(&self) -> usize {
        self.mapper.columns()
    }

    pub fn rows(&self) -> usize {
        self.mapper.rows()
    }

    pub fn cell_size(&self) -> f32 {
        self.mapper.cell_size()
    }

    /// Number of tagged cells
    pub fn passable_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn cell(&self, point: Point) -> Option<Cell> {
        self.mapper
            .contains(point)
            .then(|| self.cells[self.mapper.slot(point)])
    }

    /// The tag of the passable cell covering `location`
    pub fn tag_at(&self, location: Location) -> Option<Tag> {
        match self.cell(self.mapper.to_index(location)?)? {
            Cell::Open(tag) => Some(tag),
            Cell::Blocked => None,
        }
    }

    pub fn vertex(&self, tag: Tag) -> Option<&Vertex> {
        self.vertices.get(tag.index())
    }

    pub fn anchor(&self, tag: Tag) -> Option<Location> {
        self.vertex(tag).map(|vertex| vertex.anchor)
    }

    pub fn neighbours(&self, tag: Tag) -> Option<&Neighbours> {
        self.neighbours.get(tag.index())
    }

    fn open_tag(
        &self,
        location: Location,
        out_of_bounds: QueryRejection,
        blocked: QueryRejection,
    ) -> Result<Tag, QueryRejection> {
        let point = self.mapper.to_index(location).ok_or(out_of_bounds)?;
        match self.cells[self.mapper.slot(point)] {
            Cell::Open(tag) => Ok(tag),
            Cell::Blocked => Err(blocked),
        }
    }

    /// Searches for a shortest path between the cells covering `start` and `goal`
    pub fn query(&self, start: Location, goal: Location) -> QueryOutcome {
        let tags = self
            .open_tag(
                start,
                QueryRejection::StartOutOfBounds,
                QueryRejection::StartBlocked,
            )
            .and_then(|start| {
                let goal = self.open_tag(
                    goal,
                    QueryRejection::GoalOutOfBounds,
                    QueryRejection::GoalBlocked,
                )?;
                Ok((start, goal))
            });

        let (start_tag, goal_tag) = match tags {
            Ok(tags) => tags,
            Err(rejection) => return QueryOutcome::Rejected(rejection),
        };

        let visited = self.create_storage::<Visited<Tag>>();
        let (state, _) = PathFinder::new(start_tag, Some(goal_tag), visited).finish(self);

        match state {
            PathFinderState::PathFound(result) => QueryOutcome::Found(result),
            _ => QueryOutcome::Unreachable,
        }
    }

    /// Shortest path between two map locations as cell anchors, ordered from the goal back
    /// towards the start. The start cell is not included unless it is also the goal cell.
    ///
    /// Returns an empty list when either location is outside the grid or on a wall, or when
    /// no path exists.
    pub fn find_path(&self, start: Location, goal: Location) -> Vec<Location> {
        match self.query(start, goal) {
            QueryOutcome::Found(result) => {
                debug!("path from {} to {}: {} hops", start, goal, result.distance);
                result
                    .path
                    .iter()
                    .filter_map(|tag| self.anchor(*tag))
                    .collect()
            }
            outcome => {
                debug!("no path from {} to {}: {:?}", start, goal, outcome);
                Vec::new()
            }
        }
    }
}

/// Search storage indexed by [`Tag`]
#[derive(Clone, Debug)]
pub struct TagStorage<T>(Vec<T>);

impl<T: Copy + 'static> MapStorage<T> for TagStorage<T> {
    type Reference = Tag;

    fn get(&self, node: Self::Reference) -> T {
        self.0[node.index()]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.0[node.index()]
    }
}

impl MapTrait for NavigableGraph {
    type Reference = Tag;
    type Storage<T: Default + Copy + Clone + 'static> = TagStorage<T>;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.index() < self.vertices.len()
    }

    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference> {
        self.neighbours[node.index()].into_iter().flatten()
    }

    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T> {
        TagStorage(vec![Default::default(); self.vertices.len()])
    }
}

impl Display for NavigableGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.mapper.columns().max(1)) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
