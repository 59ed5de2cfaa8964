#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative room state and durable memory for the cost matrix workspace.
//!
//! The world owns every configured room (terrain, sources, stationary-point
//! plan) alongside each room's cost matrix memory. Room facts are mutated
//! only through [`apply`]; cached matrices are never touched by room changes,
//! so callers that alter terrain-affecting state must follow up with
//! [`Command::ClearCostMatrixCaches`].

mod memory;

use std::collections::BTreeMap;

use cost_matrix_core::{
    CacheStore, Command, Event, RoomCommandError, RoomCoord, RoomIntel, RoomName,
    StationaryPoints, Terrain, TerrainProvider, Tick, ROOM_AREA, ROOM_SIZE,
};

pub use memory::{CostMatrixMemory, MemorySnapshot};

/// Static facts describing a single room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    name: RoomName,
    terrain: Vec<Terrain>,
    sources: Vec<RoomCoord>,
    stationary_points: Option<StationaryPoints>,
}

impl Room {
    fn new(name: RoomName, terrain: Vec<Terrain>) -> Self {
        debug_assert_eq!(terrain.len(), ROOM_AREA, "room terrain must cover every cell");
        Self {
            name,
            terrain,
            sources: Vec::new(),
            stationary_points: None,
        }
    }
}

impl TerrainProvider for Room {
    fn terrain(&self, at: RoomCoord) -> Terrain {
        if !at.in_room() {
            return Terrain::Wall;
        }

        let index = usize::from(at.y()) * usize::from(ROOM_SIZE) + usize::from(at.x());
        self.terrain.get(index).copied().unwrap_or(Terrain::Wall)
    }
}

impl RoomIntel for Room {
    fn room_name(&self) -> &RoomName {
        &self.name
    }

    fn sources(&self) -> &[RoomCoord] {
        &self.sources
    }

    fn stationary_points(&self) -> Option<&StationaryPoints> {
        self.stationary_points.as_ref()
    }
}

/// Represents the authoritative room state and its durable memory.
#[derive(Debug, Default)]
pub struct World {
    tick: Tick,
    rooms: BTreeMap<RoomName, Room>,
    memory: BTreeMap<RoomName, CostMatrixMemory>,
}

impl World {
    /// Creates an empty world at tick zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn room_mut(
        &mut self,
        room: &RoomName,
        out_events: &mut Vec<Event>,
    ) -> Option<&mut Room> {
        let found = self.rooms.get_mut(room);
        if found.is_none() {
            out_events.push(Event::RoomCommandRejected {
                room: room.clone(),
                reason: RoomCommandError::UnknownRoom,
            });
        }
        found
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureRoom { room, terrain } => {
            if terrain.len() != ROOM_AREA {
                out_events.push(Event::RoomCommandRejected {
                    room,
                    reason: RoomCommandError::InvalidTerrainLength,
                });
                return;
            }

            let _ = world
                .rooms
                .insert(room.clone(), Room::new(room.clone(), terrain));
            out_events.push(Event::RoomConfigured { room });
        }
        Command::PlaceSource { room, at } => {
            if !at.in_room() {
                out_events.push(Event::RoomCommandRejected {
                    room,
                    reason: RoomCommandError::OutOfBounds,
                });
                return;
            }

            let Some(target) = world.room_mut(&room, out_events) else {
                return;
            };
            if !target.sources.contains(&at) {
                target.sources.push(at);
            }
            out_events.push(Event::SourcePlaced { room, at });
        }
        Command::PlanStationaryPoints { room, points } => {
            if points.tiles().any(|tile| !tile.in_room()) {
                out_events.push(Event::RoomCommandRejected {
                    room,
                    reason: RoomCommandError::OutOfBounds,
                });
                return;
            }

            let Some(target) = world.room_mut(&room, out_events) else {
                return;
            };
            target.stationary_points = Some(points);
            out_events.push(Event::StationaryPointsPlanned { room });
        }
        Command::Tick => {
            world.tick = world.tick.next();
            out_events.push(Event::TimeAdvanced { tick: world.tick });
        }
        Command::ClearCostMatrixCaches => {
            let entries = world
                .memory
                .values_mut()
                .map(|memory| memory.clear())
                .sum::<usize>();
            tracing::info!(entries, tick = %world.tick, "cleared cost matrix caches");
            out_events.push(Event::CostMatrixCachesCleared { entries });
        }
    }
}

/// Reinstalls durable memory captured by [`query::memory_snapshot`].
///
/// Memory for rooms that are not configured is retained so it survives until
/// the room is configured again or the caches are cleared.
pub fn restore_memory(world: &mut World, snapshot: MemorySnapshot) {
    world.tick = snapshot.tick;
    world.memory = snapshot.rooms;
}

/// Splits out a room's read-only facts and its mutable cost matrix memory.
///
/// Memory is created on first use. Returns `None` when the room is unknown.
pub fn split_room_mut<'w>(
    world: &'w mut World,
    room: &RoomName,
) -> Option<(&'w Room, &'w mut CostMatrixMemory)> {
    let facts = world.rooms.get(room)?;
    let memory = world.memory.entry(room.clone()).or_default();
    Some((facts, memory))
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{CostMatrixMemory, MemorySnapshot, Room, World};
    use cost_matrix_core::{RoomName, Tick};

    /// Current simulation tick.
    #[must_use]
    pub fn tick(world: &World) -> Tick {
        world.tick
    }

    /// Names of every configured room in ascending order.
    #[must_use]
    pub fn room_names(world: &World) -> Vec<RoomName> {
        world.rooms.keys().cloned().collect()
    }

    /// Facts describing the named room, if configured.
    #[must_use]
    pub fn room<'w>(world: &'w World, room: &RoomName) -> Option<&'w Room> {
        world.rooms.get(room)
    }

    /// Cost matrix memory of the named room, if any was ever written.
    #[must_use]
    pub fn cost_matrix_memory<'w>(
        world: &'w World,
        room: &RoomName,
    ) -> Option<&'w CostMatrixMemory> {
        world.memory.get(room)
    }

    /// Captures the durable memory so it can be persisted between runs.
    #[must_use]
    pub fn memory_snapshot(world: &World) -> MemorySnapshot {
        MemorySnapshot {
            tick: world.tick,
            rooms: world.memory.clone(),
        }
    }
}
