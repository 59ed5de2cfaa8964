#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Memoizing cost matrix cache scoped to a single room.
//!
//! Every layer combination is stored under its canonical key, and so is every
//! canonical *prefix* of it. A missing combination is derived from its
//! immediate ancestor (the same set minus its last layer in canonical order)
//! by cloning the ancestor grid and applying one layer, bottoming out at the
//! base grid built from terrain. Derivations are staged and only written to
//! the store once the whole chain succeeded, so a failed request leaves the
//! store exactly as it found it.

pub mod key;

use cost_matrix_core::{
    CacheEntry, CacheStore, CostGrid, CostMatrixError, Layer, RoomIntel, SerializedGrid, Tick,
    CANONICAL_LAYER_ORDER,
};
use cost_matrix_system_layers::{GridBuilder, TerrainLayers};

/// Cost matrix cache bound to one room's intel and durable store.
///
/// The cache owns no state of its own beyond the borrowed store; dropping it
/// loses nothing.
#[derive(Debug)]
pub struct CostMatrixCache<'a, R, S, B = TerrainLayers>
where
    R: ?Sized,
    S: ?Sized,
{
    room: &'a R,
    store: &'a mut S,
    builder: B,
    tick: Tick,
}

impl<'a, R, S> CostMatrixCache<'a, R, S>
where
    R: RoomIntel + ?Sized,
    S: CacheStore + ?Sized,
{
    /// Creates a cache that derives grids with [`TerrainLayers`].
    ///
    /// `tick` is recorded on every entry written through this cache.
    #[must_use]
    pub fn new(room: &'a R, store: &'a mut S, tick: Tick) -> Self {
        Self::with_builder(room, store, tick, TerrainLayers)
    }
}

impl<'a, R, S, B> CostMatrixCache<'a, R, S, B>
where
    R: RoomIntel + ?Sized,
    S: CacheStore + ?Sized,
    B: GridBuilder,
{
    /// Creates a cache that derives grids with the provided builder.
    #[must_use]
    pub fn with_builder(room: &'a R, store: &'a mut S, tick: Tick, builder: B) -> Self {
        Self {
            room,
            store,
            builder,
            tick,
        }
    }

    /// Returns a fresh grid for the layer set, deriving and caching it if needed.
    pub fn get_cost_matrix(&mut self, layers: &[Layer]) -> Result<CostGrid, CostMatrixError> {
        self.resolve(layers)
    }

    /// Like [`Self::get_cost_matrix`] but accepts layer names.
    ///
    /// Every name is validated before the store is consulted, so an unknown
    /// name never causes a write.
    pub fn get_cost_matrix_by_names<I, N>(
        &mut self,
        names: I,
    ) -> Result<CostGrid, CostMatrixError>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let layers = key::parse_layers(names)?;
        self.resolve(&layers)
    }

    /// Returns the persisted form of the grid for the layer set.
    pub fn get_serialized_matrix(
        &mut self,
        layers: &[Layer],
    ) -> Result<SerializedGrid, CostMatrixError> {
        self.resolve(layers).map(|grid| grid.to_serialized())
    }

    /// Returns the grid with every known layer applied.
    pub fn get_full_cost_matrix(&mut self) -> Result<CostGrid, CostMatrixError> {
        self.resolve(&CANONICAL_LAYER_ORDER)
    }

    /// Consumes the cache, handing back its builder.
    #[must_use]
    pub fn into_builder(self) -> B {
        self.builder
    }

    fn resolve(&mut self, layers: &[Layer]) -> Result<CostGrid, CostMatrixError> {
        let ordered = key::canonical_layers(layers.iter().copied());
        let mut staged = Vec::new();

        let grid = match self.ensure(&ordered, &mut staged) {
            Ok(grid) => grid,
            Err(error) => {
                tracing::warn!(
                    room = %self.room.room_name(),
                    key = %key::key_for(&ordered),
                    %error,
                    "cost matrix derivation failed"
                );
                return Err(error);
            }
        };

        for (key, derived) in staged {
            tracing::debug!(
                room = %self.room.room_name(),
                key = %key,
                tick = %self.tick,
                "cached derived cost matrix"
            );
            self.store.insert(
                key,
                CacheEntry {
                    matrix: derived.to_serialized(),
                    tick: self.tick,
                },
            );
        }

        Ok(grid)
    }

    /// Produces an owned grid for a canonically ordered layer list.
    ///
    /// Newly derived grids are appended to `staged`, ancestors first.
    fn ensure(
        &mut self,
        ordered: &[Layer],
        staged: &mut Vec<(String, CostGrid)>,
    ) -> Result<CostGrid, CostMatrixError> {
        let key = key::key_for(ordered);

        if let Some(entry) = self.store.entry(&key) {
            tracing::trace!(room = %self.room.room_name(), key = %key, "cost matrix cache hit");
            return CostGrid::from_serialized(&entry.matrix)
                .map_err(|source| CostMatrixError::CorruptEntry { key, source });
        }

        let grid = match key::split_prefix(ordered) {
            (_, None) => self.builder.build_base(self.room),
            (prefix, Some(last)) => {
                let mut grid = self.ensure(prefix, staged)?;
                self.builder.apply_layer(last, &mut grid, self.room)?;
                grid
            }
        };

        staged.push((key, grid.clone()));
        Ok(grid)
    }
}

/// Returns the grid with every known layer applied for the room.
pub fn full_cost_matrix<R, S>(
    room: &R,
    store: &mut S,
    tick: Tick,
) -> Result<CostGrid, CostMatrixError>
where
    R: RoomIntel + ?Sized,
    S: CacheStore + ?Sized,
{
    CostMatrixCache::new(room, store, tick).get_full_cost_matrix()
}
