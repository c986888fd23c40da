//! Serialize a split result as Tiled-style JSON documents.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;

use crate::model::SplitOutput;

pub const MASTER_FILE_NAME: &str = "master.json";

/// One rendered document, ready to be stored under `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub contents: String,
}

pub fn chunk_file_name(id: usize) -> String {
    format!("chunk{id}.json")
}

/// Render the master file followed by every chunk, in id order.
pub fn render(output: &SplitOutput, pretty: bool) -> serde_json::Result<Vec<OutputFile>> {
    let mut files = Vec::with_capacity(output.chunks.len() + 1);
    files.push(OutputFile {
        name: MASTER_FILE_NAME.to_string(),
        contents: to_json(&output.master, pretty)?,
    });
    for chunk in &output.chunks {
        files.push(OutputFile {
            name: chunk_file_name(chunk.id),
            contents: to_json(chunk, pretty)?,
        });
    }
    Ok(files)
}

/// Write `master.json` and `chunk{id}.json` files into `out_dir`.
///
/// Everything is rendered before the first file is touched.
pub fn emit(output: &SplitOutput, out_dir: &Path, pretty: bool) -> Result<()> {
    let files = render(output, pretty).context("Serializing chunks")?;

    fs::create_dir_all(out_dir).with_context(|| format!("Creating {}", out_dir.display()))?;

    for file in &files {
        let path = out_dir.join(&file.name);
        fs::write(&path, &file.contents)
            .with_context(|| format!("Writing {}", path.display()))?;
        debug!("wrote {} ({} bytes)", path.display(), file.contents.len());
    }

    info!("wrote {} files to {}", files.len(), out_dir.display());
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChunkFile, MasterFile};
    use crate::parser::load_from_json;
    use crate::processor::{ChunkSize, split};

    const MAP: &str = r#"{
        "width": 3, "height": 2, "tilewidth": 16, "tileheight": 16,
        "orientation": "orthogonal", "infinite": false,
        "tilesets": [{ "firstgid": 1, "image": "t.png" }],
        "layers": [
            { "type": "tilelayer", "name": "g", "id": 1, "data": [1, 2, 3, 4, 5, 6],
              "width": 3, "height": 2, "x": 0, "y": 0 },
            { "type": "objectgroup", "name": "o", "id": 2, "objects": [] }
        ]
    }"#;

    fn output() -> SplitOutput {
        let map = load_from_json(MAP).unwrap();
        split(&map, ChunkSize::new(2, 2).unwrap()).unwrap()
    }

    #[test]
    fn test_render_names_and_order() {
        let files = render(&output(), false).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["master.json", "chunk0.json", "chunk1.json"]);
    }

    #[test]
    fn test_master_uses_camel_case_keys() {
        let files = render(&output(), false).unwrap();
        let master: serde_json::Value = serde_json::from_str(&files[0].contents).unwrap();

        assert_eq!(master["chunkWidth"], 2);
        assert_eq!(master["horizontalChunkAmount"], 2);
        assert_eq!(master["verticalChunkAmount"], 1);
        assert_eq!(master["layerAmount"], 2);
        assert_eq!(master["mapWidth"], 3);
        assert_eq!(master["tileHeight"], 16);
        assert_eq!(master["globalLayers"][0]["name"], "o");

        let parsed: MasterFile = serde_json::from_str(&files[0].contents).unwrap();
        assert_eq!(parsed, output().master);
    }

    #[test]
    fn test_chunk_json_is_a_map() {
        let files = render(&output(), true).unwrap();
        let chunk: serde_json::Value = serde_json::from_str(&files[2].contents).unwrap();

        assert_eq!(chunk["id"], 1);
        assert_eq!(chunk["width"], 1);
        assert_eq!(chunk["height"], 2);
        assert_eq!(chunk["tilewidth"], 16);
        assert_eq!(chunk["orientation"], "orthogonal");
        assert_eq!(chunk["layers"][0]["type"], "tilelayer");
        assert_eq!(chunk["layers"][0]["data"], serde_json::json!([3, 6]));
        assert!(chunk["layers"][0].get("encoding").is_none());

        // A chunk file is itself a loadable map.
        let reloaded = load_from_json(&files[2].contents).unwrap();
        assert_eq!((reloaded.width, reloaded.height), (1, 2));

        let typed: ChunkFile = serde_json::from_str(&files[2].contents).unwrap();
        assert_eq!(typed, output().chunks[1]);
    }

    #[test]
    fn test_layer_encoding_is_written_back_verbatim() {
        let map = load_from_json(
            r#"{ "width": 2, "height": 1, "tilewidth": 8, "tileheight": 8, "tilesets": [],
                 "layers": [
                    { "type": "tilelayer", "name": "n", "encoding": "none", "compression": "",
                      "data": [1, 2], "width": 2, "height": 1 },
                    { "type": "tilelayer", "name": "c", "encoding": "csv",
                      "data": [3, 4], "width": 2, "height": 1 }
                 ] }"#,
        )
        .unwrap();
        let out = split(&map, ChunkSize::new(1, 1).unwrap()).unwrap();
        let files = render(&out, false).unwrap();

        let chunk: serde_json::Value = serde_json::from_str(&files[1].contents).unwrap();
        assert_eq!(chunk["layers"][0]["encoding"], "none");
        assert_eq!(chunk["layers"][0]["compression"], "");
        assert_eq!(chunk["layers"][0]["data"], serde_json::json!([1]));
        assert_eq!(chunk["layers"][1]["encoding"], "csv");
        assert_eq!(chunk["layers"][1]["data"], serde_json::json!([3]));
    }
}
