//! Lenient decoding helpers for the read shapes.

use serde::{Deserialize, Deserializer};

/// Decode an explicit `null` as the type's default, the same as a missing
/// key under `#[serde(default)]`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
