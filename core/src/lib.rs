#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the cost matrix workspace.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the pure layer and cache systems, and the adapters. Rooms are fixed
//! [`ROOM_SIZE`] by [`ROOM_SIZE`] grids; a [`CostGrid`] assigns a traversal cost
//! to every cell and is refined by named exclusion [`Layer`]s. Derived grids
//! are persisted per room as [`CacheEntry`] values inside a [`CacheStore`],
//! keyed by a canonical string derived from the requested layers.
//!
//! The world mutates rooms exclusively through [`Command`] values and reports
//! the outcome through [`Event`] values, mirroring the command/event split used
//! by the rest of the workspace.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of cells along each edge of a room.
pub const ROOM_SIZE: u8 = 50;

/// Total number of cells stored by a [`CostGrid`].
pub const ROOM_AREA: usize = (ROOM_SIZE as usize) * (ROOM_SIZE as usize);

/// Cost reserved for impassable cells.
pub const OBSTACLE_COST: u8 = 255;

/// Cost assigned to swamp terrain by the base grid.
pub const SWAMP_COST: u8 = 5;

/// Cost assigned to plain terrain by the base grid.
pub const PLAIN_COST: u8 = 0;

/// Cache key reserved for the base grid derived purely from terrain.
pub const DEFAULT_CACHE_KEY: &str = "default";

/// Revision of [`CANONICAL_LAYER_ORDER`].
///
/// Persisted cache keys are only meaningful under the order they were derived
/// with. Bump this whenever the order changes and clear every cache.
pub const CANONICAL_ORDER_VERSION: u32 = 1;

/// Fixed total order over every known layer.
///
/// The order decides which prefix is the ancestor of a layer combination and
/// therefore which cache entry a derivation starts from.
pub const CANONICAL_LAYER_ORDER: [Layer; 3] = [
    Layer::EdgesExclusion,
    Layer::SourcesExclusion,
    Layer::StationaryPointsExclusion,
];

/// Location of a single cell inside a room.
///
/// Coordinates are not validated on construction; operations that touch a
/// [`CostGrid`] skip cells that fall outside the room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomCoord {
    x: u8,
    y: u8,
}

impl RoomCoord {
    /// Creates a new room coordinate.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the cell.
    #[must_use]
    pub const fn x(&self) -> u8 {
        self.x
    }

    /// Zero-based row of the cell.
    #[must_use]
    pub const fn y(&self) -> u8 {
        self.y
    }

    /// Reports whether the coordinate lies inside the room.
    #[must_use]
    pub const fn in_room(&self) -> bool {
        self.x < ROOM_SIZE && self.y < ROOM_SIZE
    }

    /// Reports whether the coordinate lies on the outermost ring of the room.
    #[must_use]
    pub const fn on_edge(&self) -> bool {
        self.in_room()
            && (self.x == 0 || self.y == 0 || self.x == ROOM_SIZE - 1 || self.y == ROOM_SIZE - 1)
    }

    /// Returns the coordinate shifted by the provided delta if it stays in the room.
    #[must_use]
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        let shifted = Self::new(x, y);
        shifted.in_room().then_some(shifted)
    }

    /// Iterates over the eight surrounding cells that lie inside the room.
    pub fn ring(self) -> impl Iterator<Item = RoomCoord> {
        const DELTAS: [(i8, i8); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];

        DELTAS
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy))
    }

    /// Iterates over every cell of a room in row-major order.
    pub fn all() -> impl Iterator<Item = RoomCoord> {
        (0..ROOM_SIZE).flat_map(|y| (0..ROOM_SIZE).map(move |x| RoomCoord::new(x, y)))
    }

    fn index(self) -> Option<usize> {
        if !self.in_room() {
            return None;
        }

        Some(usize::from(self.y) * usize::from(ROOM_SIZE) + usize::from(self.x))
    }
}

impl fmt::Display for RoomCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Terrain classification reported for a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Terrain {
    /// Open ground with no movement penalty.
    #[default]
    Plain,
    /// Slow ground that carries [`SWAMP_COST`].
    Swamp,
    /// Natural wall that can never be traversed.
    Wall,
}

impl Terrain {
    /// Cost the base grid assigns to this terrain.
    #[must_use]
    pub const fn base_cost(self) -> u8 {
        match self {
            Self::Plain => PLAIN_COST,
            Self::Swamp => SWAMP_COST,
            Self::Wall => OBSTACLE_COST,
        }
    }
}

/// Dense per-room traversal cost grid stored in row-major order.
///
/// Grids are plain values: cloning yields an independent copy and no two
/// grids share backing storage.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CostGrid {
    costs: Box<[u8; ROOM_AREA]>,
}

impl CostGrid {
    /// Creates a grid where every cell carries [`PLAIN_COST`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            costs: Box::new([PLAIN_COST; ROOM_AREA]),
        }
    }

    /// Cost stored for the provided cell, if it lies inside the room.
    #[must_use]
    pub fn get(&self, at: RoomCoord) -> Option<u8> {
        at.index().map(|index| self.costs[index])
    }

    /// Overwrites the cost of a cell. Cells outside the room are ignored.
    pub fn set(&mut self, at: RoomCoord, cost: u8) {
        if let Some(index) = at.index() {
            self.costs[index] = cost;
        }
    }

    /// Raises the cost of a cell to at least `cost`, never lowering it.
    pub fn raise(&mut self, at: RoomCoord, cost: u8) {
        if let Some(index) = at.index() {
            let current = &mut self.costs[index];
            *current = (*current).max(cost);
        }
    }

    /// Marks a cell as impassable.
    pub fn block(&mut self, at: RoomCoord) {
        self.raise(at, OBSTACLE_COST);
    }

    /// Reports whether the cell is impassable. Cells outside the room are.
    #[must_use]
    pub fn is_blocked(&self, at: RoomCoord) -> bool {
        self.get(at).map_or(true, |cost| cost == OBSTACLE_COST)
    }

    /// Raw costs in row-major order.
    #[must_use]
    pub fn costs(&self) -> &[u8] {
        self.costs.as_slice()
    }

    /// Iterates over every cell together with its cost in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (RoomCoord, u8)> + '_ {
        RoomCoord::all().zip(self.costs.iter().copied())
    }

    /// Counts the impassable cells.
    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.costs.iter().filter(|&&cost| cost == OBSTACLE_COST).count()
    }

    /// Captures the grid in its persisted form.
    #[must_use]
    pub fn to_serialized(&self) -> SerializedGrid {
        SerializedGrid(self.costs.to_vec())
    }

    /// Rebuilds a grid from its persisted form.
    pub fn from_serialized(serialized: &SerializedGrid) -> Result<Self, GridError> {
        let costs: Box<[u8; ROOM_AREA]> = serialized
            .0
            .clone()
            .into_boxed_slice()
            .try_into()
            .map_err(|_| GridError::InvalidLength {
                expected: ROOM_AREA,
                actual: serialized.len(),
            })?;
        Ok(Self { costs })
    }
}

impl Default for CostGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CostGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CostGrid")
            .field("blocked", &self.blocked_count())
            .finish_non_exhaustive()
    }
}

/// Persisted representation of a [`CostGrid`]: a flat row-major sequence of costs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializedGrid(Vec<u8>);

impl SerializedGrid {
    /// Wraps raw costs without validating their length.
    ///
    /// Length is checked when the grid is rebuilt via [`CostGrid::from_serialized`].
    #[must_use]
    pub fn from_costs(costs: Vec<u8>) -> Self {
        Self(costs)
    }

    /// Raw costs in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Number of cells stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Reports whether no cells are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the wrapper, yielding the raw costs.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

/// Named exclusion layer that raises specific cells to [`OBSTACLE_COST`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layer {
    /// Blocks every cell on the outermost ring of the room.
    EdgesExclusion,
    /// Blocks the eight cells surrounding every energy source.
    SourcesExclusion,
    /// Blocks the tiles reserved by the room's stationary-point plan.
    StationaryPointsExclusion,
}

impl Layer {
    /// Stable name of the layer used in cache keys and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EdgesExclusion => "edges-exclusion",
            Self::SourcesExclusion => "sources-exclusion",
            Self::StationaryPointsExclusion => "stationary-points-exclusion",
        }
    }

    /// Position of the layer within [`CANONICAL_LAYER_ORDER`].
    #[must_use]
    pub fn canonical_rank(self) -> usize {
        CANONICAL_LAYER_ORDER
            .iter()
            .position(|layer| *layer == self)
            .unwrap_or(CANONICAL_LAYER_ORDER.len())
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layer {
    type Err = CostMatrixError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        CANONICAL_LAYER_ORDER
            .into_iter()
            .find(|layer| layer.name() == trimmed)
            .ok_or_else(|| CostMatrixError::UnknownLayer(trimmed.to_owned()))
    }
}

/// Simulation tick counter.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(u64);

impl Tick {
    /// Creates a tick wrapper with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tick.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the tick that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name identifying a room, such as `W1N1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    /// Creates a room name from the provided string.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrowed string form of the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reserved tiles produced by the room planner for stationary workers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationaryPoints {
    /// Tile assigned to the controller link operator.
    pub controller_link: RoomCoord,
    /// Tile assigned to the storage link operator.
    pub storage_link: RoomCoord,
    /// Tile assigned to the harvester of each source.
    pub sources: Vec<RoomCoord>,
}

impl StationaryPoints {
    /// Iterates over every reserved tile.
    pub fn tiles(&self) -> impl Iterator<Item = RoomCoord> + '_ {
        [self.controller_link, self.storage_link]
            .into_iter()
            .chain(self.sources.iter().copied())
    }
}

/// Cached cost matrix together with the tick it was computed on.
///
/// The tick is diagnostic only; entries never expire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Serialized grid for the cache key.
    pub matrix: SerializedGrid,
    /// Tick during which the grid was derived.
    pub tick: Tick,
}

/// Classifies room cells by terrain.
pub trait TerrainProvider {
    /// Terrain of the provided in-room cell.
    fn terrain(&self, at: RoomCoord) -> Terrain;
}

/// Read-only room facts consumed by the layer builders.
pub trait RoomIntel: TerrainProvider {
    /// Name of the room the intel describes.
    fn room_name(&self) -> &RoomName;

    /// Positions of every energy source in the room.
    fn sources(&self) -> &[RoomCoord];

    /// Stationary-point plan, or `None` when the room has not been planned yet.
    fn stationary_points(&self) -> Option<&StationaryPoints>;
}

/// Room-scoped persistent mapping from cache key to [`CacheEntry`].
pub trait CacheStore {
    /// Entry stored under the key, if any.
    fn entry(&self, key: &str) -> Option<&CacheEntry>;

    /// Stores an entry under the key.
    fn insert(&mut self, key: String, entry: CacheEntry);

    /// Keys of every stored entry in ascending order.
    fn keys(&self) -> Vec<String>;

    /// Removes every entry, returning how many were dropped.
    fn clear(&mut self) -> usize;

    /// Reports whether an entry is stored under the key.
    fn contains(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }
}

impl CacheStore for BTreeMap<String, CacheEntry> {
    fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.get(key)
    }

    fn insert(&mut self, key: String, entry: CacheEntry) {
        let _ = BTreeMap::insert(self, key, entry);
    }

    fn keys(&self) -> Vec<String> {
        BTreeMap::keys(self).cloned().collect()
    }

    fn clear(&mut self) -> usize {
        let dropped = self.len();
        BTreeMap::clear(self);
        dropped
    }
}

/// Errors surfaced while producing cost matrices.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CostMatrixError {
    /// A requested layer name is not part of [`CANONICAL_LAYER_ORDER`].
    #[error("unknown cost matrix layer `{0}`")]
    UnknownLayer(String),
    /// The room has no stationary-point plan yet.
    #[error("room {room} has no stationary points planned")]
    MissingStationaryPoints {
        /// Room whose plan is missing.
        room: RoomName,
    },
    /// A stored entry could not be rebuilt into a grid.
    #[error("cached cost matrix `{key}` is corrupt: {source}")]
    CorruptEntry {
        /// Cache key of the offending entry.
        key: String,
        /// Reason the entry was rejected.
        #[source]
        source: GridError,
    },
}

/// Errors raised while rebuilding a [`CostGrid`] from its persisted form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The persisted sequence does not hold exactly [`ROOM_AREA`] cells.
    #[error("expected {expected} cells, found {actual}")]
    InvalidLength {
        /// Number of cells a grid requires.
        expected: usize,
        /// Number of cells that were supplied.
        actual: usize,
    },
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Creates or replaces a room with the provided row-major terrain.
    ConfigureRoom {
        /// Room to configure.
        room: RoomName,
        /// Terrain for every cell, [`ROOM_AREA`] entries in row-major order.
        terrain: Vec<Terrain>,
    },
    /// Registers an energy source inside a room.
    PlaceSource {
        /// Room receiving the source.
        room: RoomName,
        /// Cell occupied by the source.
        at: RoomCoord,
    },
    /// Installs the stationary-point plan produced by the room planner.
    PlanStationaryPoints {
        /// Room the plan belongs to.
        room: RoomName,
        /// Reserved tiles of the plan.
        points: StationaryPoints,
    },
    /// Advances the simulation clock by one tick.
    Tick,
    /// Drops every cached cost matrix in every room.
    ClearCostMatrixCaches,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a room was created or replaced.
    RoomConfigured {
        /// Room that was configured.
        room: RoomName,
    },
    /// Confirms that a source was registered.
    SourcePlaced {
        /// Room containing the source.
        room: RoomName,
        /// Cell occupied by the source.
        at: RoomCoord,
    },
    /// Confirms that a stationary-point plan was installed.
    StationaryPointsPlanned {
        /// Room the plan belongs to.
        room: RoomName,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Tick that became current.
        tick: Tick,
    },
    /// Confirms that every cached cost matrix was dropped.
    CostMatrixCachesCleared {
        /// Number of entries removed across all rooms.
        entries: usize,
    },
    /// Reports that a room command was rejected.
    RoomCommandRejected {
        /// Room named by the rejected command.
        room: RoomName,
        /// Specific reason the command failed.
        reason: RoomCommandError,
    },
}

/// Reasons a room command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoomCommandError {
    /// The command named a room that has not been configured.
    UnknownRoom,
    /// The supplied terrain did not cover exactly [`ROOM_AREA`] cells.
    InvalidTerrainLength,
    /// The supplied position lies outside the room.
    OutOfBounds,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn ring_skips_cells_outside_the_room() {
        let corner: Vec<_> = RoomCoord::new(0, 0).ring().collect();
        assert_eq!(
            corner,
            vec![
                RoomCoord::new(1, 0),
                RoomCoord::new(0, 1),
                RoomCoord::new(1, 1)
            ]
        );

        assert_eq!(RoomCoord::new(10, 10).ring().count(), 8);
        assert_eq!(RoomCoord::new(49, 25).ring().count(), 5);
        assert_eq!(RoomCoord::new(60, 60).ring().count(), 0);
    }

    #[test]
    fn ring_never_contains_the_centre() {
        let centre = RoomCoord::new(10, 10);
        assert!(centre.ring().all(|cell| cell != centre));
    }

    #[test]
    fn all_visits_cells_in_row_major_order() {
        let cells: Vec<_> = RoomCoord::all().collect();
        assert_eq!(cells.len(), ROOM_AREA);
        assert_eq!(cells[1], RoomCoord::new(1, 0));
        assert_eq!(cells[50], RoomCoord::new(0, 1));
        assert_eq!(cells[ROOM_AREA - 1], RoomCoord::new(49, 49));
    }

    #[test]
    fn raise_never_lowers_cost() {
        let mut grid = CostGrid::new();
        let cell = RoomCoord::new(3, 4);
        grid.set(cell, 40);
        grid.raise(cell, 10);
        assert_eq!(grid.get(cell), Some(40));
        grid.raise(cell, 90);
        assert_eq!(grid.get(cell), Some(90));
    }

    #[test]
    fn writes_outside_the_room_are_ignored() {
        let mut grid = CostGrid::new();
        grid.block(RoomCoord::new(50, 0));
        grid.set(RoomCoord::new(0, 200), 7);
        assert_eq!(grid.blocked_count(), 0);
        assert!(grid.costs().iter().all(|&cost| cost == PLAIN_COST));
        assert_eq!(grid.get(RoomCoord::new(50, 0)), None);
    }

    #[test]
    fn clones_do_not_share_storage() {
        let original = CostGrid::new();
        let mut copy = original.clone();
        copy.block(RoomCoord::new(5, 5));
        assert_eq!(original.get(RoomCoord::new(5, 5)), Some(PLAIN_COST));
        assert_eq!(copy.get(RoomCoord::new(5, 5)), Some(OBSTACLE_COST));
    }

    #[test]
    fn serialized_grid_is_row_major() {
        let mut grid = CostGrid::new();
        grid.set(RoomCoord::new(12, 7), 42);
        let serialized = grid.to_serialized();
        assert_eq!(serialized.len(), ROOM_AREA);
        assert_eq!(serialized.as_slice()[7 * 50 + 12], 42);
        assert_eq!(CostGrid::from_serialized(&serialized), Ok(grid));
    }

    #[test]
    fn from_serialized_rejects_wrong_length() {
        let short = SerializedGrid::from_costs(vec![0; 10]);
        assert_eq!(
            CostGrid::from_serialized(&short),
            Err(GridError::InvalidLength {
                expected: ROOM_AREA,
                actual: 10,
            })
        );
    }

    #[test]
    fn serialized_grid_persists_as_flat_integer_array() {
        let json = serde_json::to_value(CacheEntry {
            matrix: SerializedGrid::from_costs(vec![0, 5, 255]),
            tick: Tick::new(17),
        })
        .expect("serialize entry");
        assert_eq!(json, serde_json::json!({ "matrix": [0, 5, 255], "tick": 17 }));
    }

    #[test]
    fn canonical_order_lists_every_layer_once() {
        for (rank, layer) in CANONICAL_LAYER_ORDER.into_iter().enumerate() {
            assert_eq!(layer.canonical_rank(), rank);
        }
        assert_eq!(CANONICAL_ORDER_VERSION, 1);
    }

    #[test]
    fn layer_names_parse_back() {
        for layer in CANONICAL_LAYER_ORDER {
            assert_eq!(layer.name().parse::<Layer>(), Ok(layer));
        }
        assert_eq!(
            "roads-exclusion".parse::<Layer>(),
            Err(CostMatrixError::UnknownLayer("roads-exclusion".to_owned()))
        );
    }

    #[test]
    fn layer_serde_name_matches_display() {
        for layer in CANONICAL_LAYER_ORDER {
            let json = serde_json::to_string(&layer).expect("serialize layer");
            assert_eq!(json, format!("\"{layer}\""));
        }
    }

    #[test]
    fn cache_entry_round_trips_through_bincode() {
        let mut grid = CostGrid::new();
        grid.block(RoomCoord::new(1, 1));
        assert_round_trip(&CacheEntry {
            matrix: grid.to_serialized(),
            tick: Tick::new(9),
        });
    }

    #[test]
    fn stationary_points_list_every_tile() {
        let points = StationaryPoints {
            controller_link: RoomCoord::new(20, 20),
            storage_link: RoomCoord::new(25, 25),
            sources: vec![RoomCoord::new(11, 11), RoomCoord::new(31, 41)],
        };
        let tiles: Vec<_> = points.tiles().collect();
        assert_eq!(tiles.len(), 4);
        assert_eq!(tiles[0], RoomCoord::new(20, 20));
        assert_eq!(tiles[3], RoomCoord::new(31, 41));
    }

    #[test]
    fn btree_store_clear_reports_dropped_entries() {
        let mut store = BTreeMap::new();
        CacheStore::insert(
            &mut store,
            DEFAULT_CACHE_KEY.to_owned(),
            CacheEntry {
                matrix: CostGrid::new().to_serialized(),
                tick: Tick::default(),
            },
        );
        assert!(store.contains(DEFAULT_CACHE_KEY));
        assert_eq!(CacheStore::clear(&mut store), 1);
        assert!(CacheStore::keys(&store).is_empty());
    }
}
