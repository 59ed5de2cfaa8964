use std::cell::Cell;

use cost_matrix_core::{
    CostGrid, CostMatrixError, Layer, RoomCoord, RoomIntel, RoomName, StationaryPoints, Terrain,
    TerrainProvider, OBSTACLE_COST, PLAIN_COST, ROOM_AREA, SWAMP_COST,
};
use cost_matrix_system_layers::{apply_layer, build_base, GridBuilder, TerrainLayers};

struct ScriptedRoom {
    name: RoomName,
    walls: Vec<RoomCoord>,
    swamps: Vec<RoomCoord>,
    sources: Vec<RoomCoord>,
    points: Option<StationaryPoints>,
    terrain_queries: Cell<usize>,
}

impl ScriptedRoom {
    fn plain() -> Self {
        Self {
            name: RoomName::new("E3S7"),
            walls: Vec::new(),
            swamps: Vec::new(),
            sources: Vec::new(),
            points: None,
            terrain_queries: Cell::new(0),
        }
    }
}

impl TerrainProvider for ScriptedRoom {
    fn terrain(&self, at: RoomCoord) -> Terrain {
        self.terrain_queries.set(self.terrain_queries.get() + 1);
        if self.walls.contains(&at) {
            Terrain::Wall
        } else if self.swamps.contains(&at) {
            Terrain::Swamp
        } else {
            Terrain::Plain
        }
    }
}

impl RoomIntel for ScriptedRoom {
    fn room_name(&self) -> &RoomName {
        &self.name
    }

    fn sources(&self) -> &[RoomCoord] {
        &self.sources
    }

    fn stationary_points(&self) -> Option<&StationaryPoints> {
        self.points.as_ref()
    }
}

#[test]
fn base_grid_maps_terrain_to_costs() {
    let room = ScriptedRoom {
        walls: vec![RoomCoord::new(12, 7)],
        swamps: vec![RoomCoord::new(3, 3), RoomCoord::new(4, 3)],
        ..ScriptedRoom::plain()
    };

    let grid = build_base(&room);

    assert_eq!(grid.get(RoomCoord::new(12, 7)), Some(OBSTACLE_COST));
    assert_eq!(grid.get(RoomCoord::new(3, 3)), Some(SWAMP_COST));
    assert_eq!(grid.get(RoomCoord::new(4, 3)), Some(SWAMP_COST));
    assert_eq!(grid.get(RoomCoord::new(7, 12)), Some(PLAIN_COST));
    assert_eq!(
        room.terrain_queries.get(),
        ROOM_AREA,
        "terrain must be queried once per cell"
    );
}

#[test]
fn base_grid_is_deterministic() {
    let room = ScriptedRoom {
        walls: vec![RoomCoord::new(0, 0), RoomCoord::new(49, 49)],
        ..ScriptedRoom::plain()
    };

    assert_eq!(build_base(&room), build_base(&room));
}

#[test]
fn edges_layer_raises_swamp_and_keeps_walls() {
    let room = ScriptedRoom {
        swamps: vec![RoomCoord::new(0, 10)],
        walls: vec![RoomCoord::new(49, 49)],
        ..ScriptedRoom::plain()
    };
    let mut grid = build_base(&room);

    apply_layer(Layer::EdgesExclusion, &mut grid, &room).expect("edges never fail");

    assert_eq!(grid.get(RoomCoord::new(0, 10)), Some(OBSTACLE_COST));
    assert_eq!(grid.get(RoomCoord::new(49, 49)), Some(OBSTACLE_COST));
    assert_eq!(grid.get(RoomCoord::new(1, 10)), Some(PLAIN_COST));
    assert_eq!(grid.blocked_count(), 196);
}

#[test]
fn sources_layer_leaves_existing_costs_higher_than_it() {
    let room = ScriptedRoom {
        sources: vec![RoomCoord::new(10, 10)],
        ..ScriptedRoom::plain()
    };
    let mut grid = CostGrid::new();
    grid.set(RoomCoord::new(10, 10), 40);

    apply_layer(Layer::SourcesExclusion, &mut grid, &room).expect("sources never fail");

    assert_eq!(grid.get(RoomCoord::new(10, 10)), Some(40));
    assert_eq!(grid.blocked_count(), 8);
}

#[test]
fn sources_layer_on_room_without_sources_is_a_no_op() {
    let room = ScriptedRoom::plain();
    let mut grid = CostGrid::new();

    apply_layer(Layer::SourcesExclusion, &mut grid, &room).expect("sources never fail");

    assert_eq!(grid, CostGrid::new());
}

#[test]
fn stationary_points_layer_blocks_reserved_tiles() {
    let room = ScriptedRoom {
        points: Some(StationaryPoints {
            controller_link: RoomCoord::new(20, 20),
            storage_link: RoomCoord::new(25, 25),
            sources: vec![RoomCoord::new(11, 11), RoomCoord::new(31, 41)],
        }),
        ..ScriptedRoom::plain()
    };
    let mut grid = CostGrid::new();

    apply_layer(Layer::StationaryPointsExclusion, &mut grid, &room).expect("points planned");

    assert_eq!(grid.blocked_count(), 4);
    for cell in [
        RoomCoord::new(20, 20),
        RoomCoord::new(25, 25),
        RoomCoord::new(11, 11),
        RoomCoord::new(31, 41),
    ] {
        assert!(grid.is_blocked(cell), "{cell} should be reserved");
    }
}

#[test]
fn stationary_points_layer_requires_a_plan() {
    let room = ScriptedRoom::plain();
    let mut grid = CostGrid::new();
    grid.set(RoomCoord::new(5, 5), 9);
    let before = grid.clone();

    let result = apply_layer(Layer::StationaryPointsExclusion, &mut grid, &room);

    assert_eq!(
        result,
        Err(CostMatrixError::MissingStationaryPoints {
            room: RoomName::new("E3S7"),
        })
    );
    assert_eq!(grid, before, "failed layer must leave the grid untouched");
}

#[test]
fn terrain_layers_delegate_to_free_functions() {
    let room = ScriptedRoom {
        walls: vec![RoomCoord::new(30, 30)],
        sources: vec![RoomCoord::new(2, 2)],
        ..ScriptedRoom::plain()
    };
    let mut builder = TerrainLayers;

    let mut via_builder = builder.build_base(&room);
    builder
        .apply_layer(Layer::SourcesExclusion, &mut via_builder, &room)
        .expect("sources never fail");

    let mut direct = build_base(&room);
    apply_layer(Layer::SourcesExclusion, &mut direct, &room).expect("sources never fail");

    assert_eq!(via_builder, direct);
}
