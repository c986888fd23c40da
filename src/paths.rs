//! Keeps relative asset references valid when the chunks are written
//! somewhere other than the source map's directory.
//!
//! Resolution is purely lexical: nothing has to exist on disk, and symlinks
//! are not followed.

use std::io;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;

use crate::model::SplitOutput;

/// Keys holding file references on tilesets and image layers.
const PATH_KEYS: [&str; 2] = ["image", "source"];

/// Re-express `path`, relative to `old_dir`, as a path relative to `new_dir`.
///
/// Relative directories are taken from the current working directory.
pub fn change_relative_path(old_dir: &Path, new_dir: &Path, path: &Path) -> io::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let target = normalize(&cwd.join(old_dir).join(path));
    let from = normalize(&cwd.join(new_dir));
    Ok(relative(&from, &target))
}

/// Rewrite the `image` / `source` entries of every tileset in place.
pub fn change_filepaths(tilesets: &mut [Value], old_dir: &Path, new_dir: &Path) -> io::Result<()> {
    for tileset in tilesets {
        rewrite_entry(tileset, old_dir, new_dir)?;
    }
    Ok(())
}

/// Point every asset reference of a split result at `new_dir`.
///
/// Covers master and chunk tilesets and the master's image layers.
pub fn relocate(output: &mut SplitOutput, old_dir: &Path, new_dir: &Path) -> io::Result<()> {
    change_filepaths(&mut output.master.tilesets, old_dir, new_dir)?;

    for layer in &mut output.master.global_layers {
        if layer.get("type").and_then(Value::as_str) == Some("imagelayer") {
            rewrite_entry(layer, old_dir, new_dir)?;
        }
    }

    for chunk in &mut output.chunks {
        change_filepaths(&mut chunk.tilesets, old_dir, new_dir)?;
    }
    Ok(())
}

fn rewrite_entry(entry: &mut Value, old_dir: &Path, new_dir: &Path) -> io::Result<()> {
    let Some(fields) = entry.as_object_mut() else {
        return Ok(());
    };
    for key in PATH_KEYS {
        if let Some(Value::String(path)) = fields.get_mut(key) {
            let moved = change_relative_path(old_dir, new_dir, Path::new(path.as_str()))?;
            *path = to_slash(&moved);
        }
    }
    Ok(())
}

/// Drop `.` and fold `..` into the preceding component.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Path leading from directory `from` to `to`; both absolute and normalized.
fn relative(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<_> = from.components().collect();
    let to: Vec<_> = to.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut out = PathBuf::new();
    for _ in common..from.len() {
        out.push("..");
    }
    for component in &to[common..] {
        out.push(component);
    }
    out
}

/// Tiled writes `/` separators on every platform.
fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
