//! Shared pose and scene fixtures for workspace tests.
//!
//! Fixture files live under the workspace `fixtures/` directory and are
//! indexed by `fixtures/manifest.json`; this crate resolves manifest names to
//! paths and deserializes the JSON on demand.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    poses: HashMap<String, String>,
    scenes: HashMap<String, SceneEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SceneEntry {
    Path(String),
    Detailed { path: String },
}

impl SceneEntry {
    fn as_path(&self) -> &str {
        match self {
            SceneEntry::Path(path) => path,
            SceneEntry::Detailed { path } => path,
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod poses {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.poses.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.poses, "pose", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.poses, "pose", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.poses, "pose", name)?;
        Ok(resolve_path(rel))
    }
}

pub mod scenes {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.scenes.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.scenes, "scene", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.scenes, "scene", name)?;
        super::load_json(entry.as_path())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.scenes, "scene", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}
