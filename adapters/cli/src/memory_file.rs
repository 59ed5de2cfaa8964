//! JSON persistence for the world's durable cost matrix memory.

use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use cost_matrix_core::CANONICAL_ORDER_VERSION;
use cost_matrix_world::MemorySnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct MemoryFile {
    order_version: u32,
    #[serde(flatten)]
    snapshot: MemorySnapshot,
}

/// Loads the snapshot stored at `path`.
///
/// A missing file yields empty memory. Memory written under a different
/// canonical layer order is discarded since its keys no longer line up.
pub(crate) fn load(path: &Path) -> Result<MemorySnapshot> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no memory file, starting empty");
            return Ok(MemorySnapshot::default());
        }
        Err(error) => {
            return Err(error)
                .with_context(|| format!("failed to read memory file at {}", path.display()))
        }
    };

    let file: MemoryFile = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse memory file at {}", path.display()))?;
    if file.order_version != CANONICAL_ORDER_VERSION {
        tracing::warn!(
            path = %path.display(),
            found = file.order_version,
            expected = CANONICAL_ORDER_VERSION,
            "discarding cost matrices cached under another layer order"
        );
        return Ok(MemorySnapshot {
            tick: file.snapshot.tick,
            ..MemorySnapshot::default()
        });
    }

    Ok(file.snapshot)
}

/// Writes the snapshot to `path` through a temporary file and a rename.
pub(crate) fn save(path: &Path, snapshot: &MemorySnapshot) -> Result<()> {
    let file = MemoryFile {
        order_version: CANONICAL_ORDER_VERSION,
        snapshot: snapshot.clone(),
    };
    let bytes = serde_json::to_vec_pretty(&file).context("failed to serialize memory")?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, bytes)
        .with_context(|| format!("failed to write memory file at {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("failed to move memory file into {}", path.display()))?;

    tracing::debug!(path = %path.display(), rooms = snapshot.rooms.len(), "saved memory");
    Ok(())
}
