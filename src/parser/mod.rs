use log::debug;
use serde_json::Value;

use crate::error::{Result, SplitError};
use crate::model::{Extra, Layer, Map};

/// Top-level keys that get their own field on [`Map`].
const MAP_KEYS: [&str; 6] = ["width", "height", "tilewidth", "tileheight", "tilesets", "layers"];

/// Parse a Tiled JSON map.
///
/// Every entry of the top-level `layers` array is dispatched on its `type`:
///   • "tilelayer" → strongly typed [`Layer::Tile`]
///   • anything else → kept as-is in [`Layer::Other`]
///
/// A missing or non-positive dimension is reported as malformed data.
pub fn load_from_json(json: &str) -> Result<Map> {
    // Grab the entire file as a dynamic value first.
    let root: Value = serde_json::from_str(json)?;
    let Value::Object(mut root) = root else {
        return Err(malformed("map file is not a JSON object"));
    };

    let width = positive(&root, "width")?;
    let height = positive(&root, "height")?;
    let tile_width = positive(&root, "tilewidth")?;
    let tile_height = positive(&root, "tileheight")?;

    if root.get("infinite").and_then(Value::as_bool) == Some(true) {
        return Err(malformed("infinite maps cannot be split"));
    }

    let tilesets = match root.remove("tilesets") {
        Some(Value::Array(tilesets)) => tilesets,
        None => Vec::new(),
        Some(_) => return Err(malformed("`tilesets` is not an array")),
    };

    let raw_layers = match root.remove("layers") {
        Some(Value::Array(layers)) => layers,
        _ => return Err(malformed("file has no `layers` array")),
    };
    debug!("found {} layers", raw_layers.len());

    let layers = raw_layers
        .into_iter()
        .enumerate()
        .map(|(i, raw)| parse_layer(i, raw))
        .collect::<Result<Vec<_>>>()?;

    let extra: Extra = root
        .into_iter()
        .filter(|(key, _)| !MAP_KEYS.contains(&key.as_str()))
        .collect();

    Ok(Map {
        width,
        height,
        tile_width,
        tile_height,
        tilesets,
        layers,
        extra,
    })
}

// ─────────────────────────────────────────────────────
/// Helper: turn one `layers[i]` entry into a [`Layer`].
fn parse_layer(i: usize, raw: Value) -> Result<Layer> {
    let kind = raw
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(format!("layer {i} missing `type` field")))?;

    match kind {
        "tilelayer" => {
            let layer = serde_json::from_value(raw)
                .map_err(|e| malformed(format!("tile layer {i}: {e}")))?;
            Ok(Layer::Tile(layer))
        }
        other => {
            debug!("layer {i} is `{other}`, passing it through");
            Ok(Layer::Other(raw))
        }
    }
}

fn positive(root: &Extra, key: &str) -> Result<u32> {
    root.get(key)
        .and_then(Value::as_u64)
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| malformed(format!("`{key}` must be a positive integer")))
}

fn malformed(msg: impl Into<String>) -> SplitError {
    SplitError::MalformedData(msg.into())
}
