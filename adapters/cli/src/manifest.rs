//! Room manifest describing the rooms the CLI serves.

use std::{collections::BTreeSet, fs, path::Path};

use anyhow::{bail, Context, Result};
use cost_matrix_core::{
    Command, RoomCoord, RoomName, StationaryPoints, Terrain, ROOM_AREA, ROOM_SIZE,
};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    version: u32,
    #[serde(default)]
    rooms: Vec<RoomEntry>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RoomEntry {
    name: String,
    #[serde(default)]
    terrain: Option<Vec<String>>,
    #[serde(default)]
    sources: Vec<RoomCoord>,
    #[serde(default)]
    stationary_points: Option<StationaryPoints>,
}

/// Reads the manifest at `path` and translates it into world commands.
pub(crate) fn load(path: &Path) -> Result<Vec<Command>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read room manifest at {}", path.display()))?;
    parse_manifest(&contents)
        .with_context(|| format!("invalid room manifest at {}", path.display()))
}

fn parse_manifest(contents: &str) -> Result<Vec<Command>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse room manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported room manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut seen = BTreeSet::new();
    let mut commands = Vec::new();
    for entry in manifest.rooms {
        if !seen.insert(entry.name.clone()) {
            bail!("room manifest contains duplicate room `{}`", entry.name);
        }

        let room = RoomName::new(entry.name);
        let terrain = match entry.terrain {
            Some(rows) => parse_terrain(&rows)
                .with_context(|| format!("invalid terrain for room `{room}`"))?,
            None => vec![Terrain::Plain; ROOM_AREA],
        };

        commands.push(Command::ConfigureRoom {
            room: room.clone(),
            terrain,
        });
        for at in entry.sources {
            commands.push(Command::PlaceSource {
                room: room.clone(),
                at,
            });
        }
        if let Some(points) = entry.stationary_points {
            commands.push(Command::PlanStationaryPoints { room, points });
        }
    }

    Ok(commands)
}

fn parse_terrain(rows: &[String]) -> Result<Vec<Terrain>> {
    let size = usize::from(ROOM_SIZE);
    if rows.len() != size {
        bail!("expected {size} terrain rows, found {}", rows.len());
    }

    let mut terrain = Vec::with_capacity(ROOM_AREA);
    for (y, row) in rows.iter().enumerate() {
        let width = row.chars().count();
        if width != size {
            bail!("terrain row {y} has {width} cells; expected {size}");
        }
        for (x, glyph) in row.chars().enumerate() {
            let cell = parse_glyph(glyph)
                .with_context(|| format!("terrain row {y} column {x}"))?;
            terrain.push(cell);
        }
    }
    Ok(terrain)
}

fn parse_glyph(glyph: char) -> Result<Terrain> {
    match glyph {
        '.' => Ok(Terrain::Plain),
        '~' => Ok(Terrain::Swamp),
        '#' => Ok(Terrain::Wall),
        _ => bail!("unknown terrain glyph `{glyph}`"),
    }
}
