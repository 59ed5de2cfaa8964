//! Canonical cache keys for layer combinations.
//!
//! A key is a pure function of the layer *set*: input order and duplicates
//! never matter. Layers are ordered by the canonical layer order and joined
//! with [`KEY_SEPARATOR`]; the empty set maps to [`DEFAULT_CACHE_KEY`].

use cost_matrix_core::{CostMatrixError, Layer, DEFAULT_CACHE_KEY};

/// Separator placed between layer names. Layer names never contain it.
pub const KEY_SEPARATOR: char = ',';

/// Deduplicates the layers and sorts them into canonical order.
#[must_use]
pub fn canonical_layers<I>(layers: I) -> Vec<Layer>
where
    I: IntoIterator<Item = Layer>,
{
    let mut ordered: Vec<Layer> = layers.into_iter().collect();
    ordered.sort_by_key(|layer| layer.canonical_rank());
    ordered.dedup();
    ordered
}

/// Parses every layer name, failing on the first unknown one.
pub fn parse_layers<I, S>(names: I) -> Result<Vec<Layer>, CostMatrixError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().parse::<Layer>())
        .collect()
}

/// Canonical cache key for an unordered set of layers.
#[must_use]
pub fn canonicalize<I>(layers: I) -> String
where
    I: IntoIterator<Item = Layer>,
{
    key_for(&canonical_layers(layers))
}

/// Splits a canonically ordered list into its ancestor prefix and last layer.
#[must_use]
pub fn split_prefix(ordered: &[Layer]) -> (&[Layer], Option<Layer>) {
    match ordered.split_last() {
        Some((last, prefix)) => (prefix, Some(*last)),
        None => (ordered, None),
    }
}

/// Joins an already canonical list into its key.
pub(crate) fn key_for(ordered: &[Layer]) -> String {
    if ordered.is_empty() {
        return DEFAULT_CACHE_KEY.to_owned();
    }

    let mut key = String::new();
    for (position, layer) in ordered.iter().enumerate() {
        if position > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.push_str(layer.name());
    }
    key
}
