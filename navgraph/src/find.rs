use std::{
    collections::VecDeque,
    fmt::Debug,
    ops::{Deref, DerefMut},
};

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Debug + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for storage
    type Storage<T: Default + Copy + Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// Check if the provided node reference is valid
    fn is_valid(&self, node: Self::Reference) -> bool;

    /// Return an iterator over the neighbors of the provided node, in exploration order
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T>;
}

/// Per-node values owned by a single search, kept apart from the map itself
pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisitedItem<R> {
    /// Number of hops from the start node
    pub distance: usize,
    /// The node this one was first reached from, `None` for the start node
    pub from: Option<R>,
}

/// Search state of a node. `Visited(None)` is the "not reached yet" sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visited<R>(Option<VisitedItem<R>>);

impl<R> Visited<R> {
    pub fn is_visited(&self) -> bool {
        self.0.is_some()
    }

    pub fn distance(&self) -> Option<usize> {
        self.0.as_ref().map(|item| item.distance)
    }
}

impl<R> Default for Visited<R> {
    fn default() -> Self {
        Visited(None)
    }
}
impl<R> Deref for Visited<R> {
    type Target = Option<VisitedItem<R>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<R> DerefMut for Visited<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult<R> {
    /// The nodes of the path from the goal back towards the start. The start node itself is
    /// left out unless it is also the goal.
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    /// Number of hops between start and goal
    pub distance: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState<R> {
    Computing,
    NoPathFound,
    PathFound(PathResult<R>),
}

impl<R> PathFinderState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// Breadth-first search over a [`MapTrait`].
///
/// All search state lives in the `visited` storage handed to [`PathFinder::new`], so the map
/// is only ever borrowed immutably and any number of searches can share it.
#[derive(Debug)]
pub struct PathFinder<
    R: NodeReference,
    S: MapStorage<Visited<R>, Reference = R>,
    M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
> {
    start: R,
    goal: Option<R>,
    visited: S,
    visit_list: VecDeque<R>,
    state: PathFinderState<R>,
    _map: std::marker::PhantomData<M>,
}

impl<
        R: NodeReference,
        S: MapStorage<Visited<R>, Reference = R>,
        M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
    > PathFinder<R, S, M>
{
    /// Starts a search from `start`. A `goal` of `None` names a node that is not part of the
    /// map; the search then runs until every reachable node has been seen.
    /// The `visited` storage must be fresh, e.g. from [`MapTrait::create_storage`].
    /// A `start` the map does not know ends the search on the first step with no path.
    pub fn new(start: R, goal: Option<R>, visited: S) -> Self {
        Self {
            start,
            goal,
            visited,
            visit_list: VecDeque::from([start]),
            state: PathFinderState::Computing,
            _map: std::marker::PhantomData,
        }
    }

    pub fn finish(mut self, map: &M) -> (PathFinderState<R>, S) {
        loop {
            match self.step(map) {
                PathFinderState::Computing => {}
                s => return (s, self.visited),
            }
        }
    }

    /// Processes a single node from the queue
    pub fn step(&mut self, map: &M) -> PathFinderState<R> {
        if self.state.is_done() {
            return self.state.clone();
        }

        let Some(current) = self.visit_list.pop_front() else {
            self.state = PathFinderState::NoPathFound;
            return self.state.clone();
        };

        // neighbours are checked before they are queued, so only the start can fail here
        if !map.is_valid(current) {
            self.visit_list.clear();
            self.state = PathFinderState::NoPathFound;
            return self.state.clone();
        }

        if current == self.start {
            *self.visited.get_mut(current) = Visited(Some(VisitedItem {
                distance: 0,
                from: None,
            }));
        }

        let distance = self.visited.get(current).distance().unwrap_or_default();

        if Some(current) == self.goal {
            self.state = PathFinderState::PathFound(PathResult {
                path: self.backtrack(current, distance),
                start: self.start,
                goal: current,
                distance,
            });
            return self.state.clone();
        }

        for neighbor in map.neighbors_of(current).filter(|n| map.is_valid(*n)) {
            let visit = self.visited.get_mut(neighbor);
            if !visit.is_visited() {
                *visit = Visited(Some(VisitedItem {
                    distance: distance + 1,
                    from: Some(current),
                }));
                self.visit_list.push_back(neighbor);
            }
        }

        self.state.clone()
    }

    /// Follows the parent chain from the goal for `distance` hops
    fn backtrack(&self, goal: R, distance: usize) -> Vec<R> {
        let mut path = Vec::with_capacity(distance.max(1));
        let mut current = Some(goal);

        for _ in 0..distance.max(1) {
            let Some(node) = current else {
                break;
            };
            path.push(node);
            current = self.visited.get(node).0.and_then(|item| item.from);
        }

        path
    }

    pub fn state(&self) -> &PathFinderState<R> {
        &self.state
    }

    pub fn get_visited(&self) -> &S {
        &self.visited
    }

    pub fn start(&self) -> R {
        self.start
    }

    pub fn goal(&self) -> Option<R> {
        self.goal
    }
}
