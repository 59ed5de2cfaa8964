#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure grid builders that turn room intel into traversal costs.
//!
//! The base grid is derived from terrain alone. Every [`Layer`] is an
//! in-place transform that only ever raises costs, so applying layers in any
//! order yields a grid at least as restrictive as each of its prefixes.

use cost_matrix_core::{
    CostGrid, CostMatrixError, Layer, RoomCoord, RoomIntel, TerrainProvider, ROOM_SIZE,
};

/// Seam through which the cache derives grids.
///
/// [`TerrainLayers`] is the production implementation; the seam exists so the
/// cache can be driven by instrumented builders.
pub trait GridBuilder {
    /// Builds the base grid for the room from terrain alone.
    fn build_base<R>(&mut self, room: &R) -> CostGrid
    where
        R: RoomIntel + ?Sized;

    /// Applies a single layer to the grid in place.
    fn apply_layer<R>(
        &mut self,
        layer: Layer,
        grid: &mut CostGrid,
        room: &R,
    ) -> Result<(), CostMatrixError>
    where
        R: RoomIntel + ?Sized;
}

impl<B> GridBuilder for &mut B
where
    B: GridBuilder + ?Sized,
{
    fn build_base<R>(&mut self, room: &R) -> CostGrid
    where
        R: RoomIntel + ?Sized,
    {
        (**self).build_base(room)
    }

    fn apply_layer<R>(
        &mut self,
        layer: Layer,
        grid: &mut CostGrid,
        room: &R,
    ) -> Result<(), CostMatrixError>
    where
        R: RoomIntel + ?Sized,
    {
        (**self).apply_layer(layer, grid, room)
    }
}

/// Stateless builder backed by [`build_base`] and [`apply_layer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TerrainLayers;

impl GridBuilder for TerrainLayers {
    fn build_base<R>(&mut self, room: &R) -> CostGrid
    where
        R: RoomIntel + ?Sized,
    {
        build_base(room)
    }

    fn apply_layer<R>(
        &mut self,
        layer: Layer,
        grid: &mut CostGrid,
        room: &R,
    ) -> Result<(), CostMatrixError>
    where
        R: RoomIntel + ?Sized,
    {
        apply_layer(layer, grid, room)
    }
}

/// Builds a grid from terrain alone, querying every cell exactly once.
#[must_use]
pub fn build_base<T>(terrain: &T) -> CostGrid
where
    T: TerrainProvider + ?Sized,
{
    let mut grid = CostGrid::new();
    for cell in RoomCoord::all() {
        grid.set(cell, terrain.terrain(cell).base_cost());
    }
    grid
}

/// Applies the named layer to the grid in place.
///
/// Fails without touching the grid when the room lacks data the layer needs.
pub fn apply_layer<R>(layer: Layer, grid: &mut CostGrid, room: &R) -> Result<(), CostMatrixError>
where
    R: RoomIntel + ?Sized,
{
    tracing::trace!(room = %room.room_name(), layer = %layer, "applying cost matrix layer");

    match layer {
        Layer::EdgesExclusion => {
            exclude_edges(grid);
            Ok(())
        }
        Layer::SourcesExclusion => {
            exclude_sources(grid, room.sources());
            Ok(())
        }
        Layer::StationaryPointsExclusion => {
            let points = room.stationary_points().ok_or_else(|| {
                CostMatrixError::MissingStationaryPoints {
                    room: room.room_name().clone(),
                }
            })?;
            for tile in points.tiles() {
                grid.block(tile);
            }
            Ok(())
        }
    }
}

fn exclude_edges(grid: &mut CostGrid) {
    let last = ROOM_SIZE - 1;
    for offset in 0..ROOM_SIZE {
        grid.block(RoomCoord::new(offset, 0));
        grid.block(RoomCoord::new(offset, last));
        grid.block(RoomCoord::new(0, offset));
        grid.block(RoomCoord::new(last, offset));
    }
}

fn exclude_sources(grid: &mut CostGrid, sources: &[RoomCoord]) {
    for source in sources {
        for neighbor in source.ring() {
            grid.block(neighbor);
        }
    }
}
