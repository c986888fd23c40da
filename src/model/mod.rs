use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field bag used to carry everything we don't interpret, verbatim.
pub type Extra = serde_json::Map<String, Value>;

/// Entire map as it comes out of the JSON loader.
///
/// Only the fields the splitter needs are typed; everything else at the top
/// level ends up in `extra` so chunk files can be shallow copies of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tilesets: Vec<Value>,
    pub layers: Vec<Layer>,
    pub extra: Extra,
}

impl Map {
    pub fn tile_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers.iter().filter_map(Layer::as_tile)
    }

    /// Object, image and group layers, in map order.
    pub fn passthrough_layers(&self) -> impl Iterator<Item = &Value> {
        self.layers.iter().filter_map(|layer| match layer {
            Layer::Other(raw) => Some(raw),
            Layer::Tile(_) => None,
        })
    }
}

/// ─────────────────────────────────────────────────────
/// Layer types
/// ─────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Layer {
    /// `"type": "tilelayer"`
    Tile(TileLayer),
    /// Anything else; never looked into.
    Other(Value),
}

impl Layer {
    pub fn as_tile(&self) -> Option<&TileLayer> {
        match self {
            Layer::Tile(layer) => Some(layer),
            Layer::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Plain JSON array of tile ids. Tiled calls this `csv`.
    #[default]
    Csv,
    /// Same as `Csv`, kept apart so the field is written back as it was read.
    None,
    /// Little-endian u32 tile ids, base64 encoded.
    Base64,
}

/// Stored form of a tile layer's `data` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileData {
    Base64(String),
    Tiles(Vec<u32>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
    pub data: TileData,
    pub width: u32,
    pub height: u32,
    /// name, id, opacity, visible, offsets, properties, `type`, ...
    #[serde(flatten)]
    pub extra: Extra,
}

impl TileLayer {
    pub fn name(&self) -> &str {
        self.extra
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding.unwrap_or_default()
    }
}

/// ─────────────────────────────────────────────────────
/// Split output
/// ─────────────────────────────────────────────────────

/// Map-wide metadata needed to put the chunks back together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterFile {
    pub chunk_width: u32,
    pub chunk_height: u32,
    pub horizontal_chunk_amount: u32,
    pub vertical_chunk_amount: u32,
    /// Counts every layer of the source map, tile layers included.
    pub layer_amount: usize,
    pub map_height: u32,
    pub map_width: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub global_layers: Vec<Value>,
    pub tilesets: Vec<Value>,
}

/// A self-contained sub-map covering one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkFile {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    pub tilesets: Vec<Value>,
    pub layers: Vec<TileLayer>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Fully processed output handed to `writer`.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutput {
    pub master: MasterFile,
    /// Sorted by `id`, one per grid cell.
    pub chunks: Vec<ChunkFile>,
}
