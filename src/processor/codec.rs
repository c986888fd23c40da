//! Tile layer `data` <-> flat `u32` tile ids.
//!
//! Binary layers are always read and written little-endian, whatever the
//! host byte order is.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Result, SplitError};
use crate::model::{Encoding, TileData, TileLayer};

const TILE_BYTES: usize = std::mem::size_of::<u32>();

/// Decode a layer's stored data into row-major tile ids.
pub fn decode(layer: &TileLayer) -> Result<Vec<u32>> {
    if let Some(compression) = layer.compression.as_deref().filter(|c| !c.is_empty()) {
        return Err(SplitError::UnsupportedCompression {
            layer: layer.name().to_string(),
            compression: compression.to_string(),
        });
    }

    match (layer.encoding(), &layer.data) {
        (Encoding::Base64, TileData::Base64(text)) => {
            let bytes = STANDARD.decode(text.trim()).map_err(|e| {
                SplitError::MalformedData(format!("layer `{}`: {e}", layer.name()))
            })?;
            tiles_from_le_bytes(&bytes).map_err(|msg| {
                SplitError::MalformedData(format!("layer `{}`: {msg}", layer.name()))
            })
        }
        (Encoding::Csv | Encoding::None, TileData::Tiles(tiles)) => Ok(tiles.clone()),
        (encoding, _) => Err(SplitError::MalformedData(format!(
            "layer `{}`: data does not match declared {encoding:?} encoding",
            layer.name()
        ))),
    }
}

/// Serialize tile ids back into the representation `encoding` calls for.
pub fn encode(encoding: Encoding, tiles: &[u32]) -> TileData {
    match encoding {
        Encoding::Base64 => {
            let bytes: Vec<u8> = tiles.iter().flat_map(|t| t.to_le_bytes()).collect();
            TileData::Base64(STANDARD.encode(bytes))
        }
        Encoding::Csv | Encoding::None => TileData::Tiles(tiles.to_vec()),
    }
}

fn tiles_from_le_bytes(bytes: &[u8]) -> std::result::Result<Vec<u32>, String> {
    if bytes.len() % TILE_BYTES != 0 {
        return Err(format!(
            "{} bytes is not a whole number of 32-bit tiles",
            bytes.len()
        ));
    }
    Ok(bytes
        .chunks_exact(TILE_BYTES)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Extra;

    fn layer(encoding: Option<Encoding>, compression: Option<&str>, data: TileData) -> TileLayer {
        let mut extra = Extra::new();
        extra.insert("name".into(), "ground".into());
        TileLayer {
            encoding,
            compression: compression.map(str::to_string),
            data,
            width: 2,
            height: 2,
            extra,
        }
    }

    #[test]
    fn test_decode_plain_tiles() {
        let l = layer(None, None, TileData::Tiles(vec![1, 2, 3, 4]));
        assert_eq!(decode(&l).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_decode_base64_is_little_endian() {
        // 1, 0x0102_0304, 0x8000_0005 (flipped-horizontally gid 5)
        let bytes = [1u8, 0, 0, 0, 4, 3, 2, 1, 5, 0, 0, 0x80];
        let l = layer(
            Some(Encoding::Base64),
            Some(""),
            TileData::Base64(STANDARD.encode(bytes)),
        );
        assert_eq!(decode(&l).unwrap(), vec![1, 0x0102_0304, 0x8000_0005]);
    }

    #[test]
    fn test_base64_round_trip_is_bit_exact() {
        let original = "AQAAAAIAAAADAAAABAAAAA==";
        let l = layer(
            Some(Encoding::Base64),
            None,
            TileData::Base64(original.into()),
        );
        let tiles = decode(&l).unwrap();
        assert_eq!(tiles, vec![1, 2, 3, 4]);
        assert_eq!(
            encode(Encoding::Base64, &tiles),
            TileData::Base64(original.into())
        );
    }

    #[test]
    fn test_plain_round_trip() {
        let data = TileData::Tiles(vec![0, 7, 0, 9]);
        let l = layer(Some(Encoding::Csv), None, data.clone());
        assert_eq!(encode(Encoding::Csv, &decode(&l).unwrap()), data);
    }

    #[test]
    fn test_none_encoding_reads_like_csv() {
        let data = TileData::Tiles(vec![3, 1, 4, 1]);
        let l = layer(Some(Encoding::None), Some(""), data.clone());
        assert_eq!(decode(&l).unwrap(), vec![3, 1, 4, 1]);
        assert_eq!(encode(Encoding::None, &[3, 1, 4, 1]), data);
    }

    #[test]
    fn test_compressed_layer_is_rejected() {
        let l = layer(
            Some(Encoding::Base64),
            Some("zlib"),
            TileData::Base64("eJxjYGBgAAAABAAB".into()),
        );
        match decode(&l).unwrap_err() {
            SplitError::UnsupportedCompression { layer, compression } => {
                assert_eq!(layer, "ground");
                assert_eq!(compression, "zlib");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncated_buffer_is_malformed() {
        let l = layer(
            Some(Encoding::Base64),
            None,
            TileData::Base64(STANDARD.encode([1u8, 0, 0, 0, 2, 0])),
        );
        let err = decode(&l).unwrap_err();
        assert!(matches!(err, SplitError::MalformedData(_)), "got {err}");
    }

    #[test]
    fn test_invalid_base64_is_malformed() {
        let l = layer(Some(Encoding::Base64), None, TileData::Base64("@@@".into()));
        assert!(matches!(
            decode(&l).unwrap_err(),
            SplitError::MalformedData(_)
        ));
    }

    #[test]
    fn test_encoding_data_mismatch_is_malformed() {
        let l = layer(Some(Encoding::Base64), None, TileData::Tiles(vec![1]));
        assert!(matches!(
            decode(&l).unwrap_err(),
            SplitError::MalformedData(_)
        ));

        let l = layer(None, None, TileData::Base64("AQAAAA==".into()));
        assert!(matches!(
            decode(&l).unwrap_err(),
            SplitError::MalformedData(_)
        ));
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(Encoding::Base64, &[]), TileData::Base64(String::new()));
        assert_eq!(encode(Encoding::Csv, &[]), TileData::Tiles(vec![]));
    }
}
