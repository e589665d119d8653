//! Named JSON fixtures shared by the scrollreel test suites.
//!
//! Fixtures live under `fixtures/` at the repository root and are indexed by
//! `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, ensure, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    configs: HashMap<String, String>,
    #[serde(rename = "scroll-traces")]
    scroll_traces: HashMap<String, TraceEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TraceEntry {
    Path(String),
    Detailed { path: String },
}

impl TraceEntry {
    fn as_path(&self) -> &str {
        match self {
            TraceEntry::Path(path) => path,
            TraceEntry::Detailed { path } => path,
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

/// Engine configuration presets.
pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.configs.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.configs, "config", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.configs, "config", name)?;
        super::load_json(rel)
    }
}

/// A recorded sequence of document scroll offsets, one per display refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrollTrace {
    pub viewport_height: f64,
    pub samples: Vec<f64>,
}

pub mod scroll_traces {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.scroll_traces.keys().cloned().collect()
    }

    pub fn load(name: &str) -> Result<ScrollTrace> {
        let entry = lookup(&MANIFEST.scroll_traces, "scroll trace", name)?;
        let trace: ScrollTrace = super::load_json(entry.as_path())?;
        ensure!(
            trace.viewport_height > 0.0,
            "scroll trace '{name}' has non-positive viewport height"
        );
        Ok(trace)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.scroll_traces, "scroll trace", name)?;
        Ok(resolve_path(entry.as_path()))
    }
}
