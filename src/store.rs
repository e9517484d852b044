//! Persistence collaborator for serialized flow snapshots.

use crate::error::StoreError;
use crate::flow::FlowGraph;
use ahash::AHashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const TRACING_TARGET: &str = "mailflow::store";

/// Key the canvas saves its flow under.
pub const DEFAULT_FLOW_KEY: &str = "emailFlow";

/// Stores and retrieves flow snapshots in the `{ nodes, edges }` format.
pub trait FlowStore {
    /// Loads the flow saved under `key`, or `None` if nothing was saved.
    fn load(&self, key: &str) -> Result<Option<FlowGraph>, StoreError>;

    /// Saves `graph` under `key`, replacing any previous snapshot.
    fn store(&mut self, key: &str, graph: &FlowGraph) -> Result<(), StoreError>;
}

/// Keeps serialized snapshots in memory, keyed like browser local storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: AHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw JSON saved under `key`.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Places raw JSON under `key`, as an older client might have written it.
    pub fn insert_raw(&mut self, key: impl Into<String>, json: impl Into<String>) {
        self.entries.insert(key.into(), json.into());
    }
}

impl FlowStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<FlowGraph>, StoreError> {
        self.raw(key).map(|json| decode(key, json)).transpose()
    }

    fn store(&mut self, key: &str, graph: &FlowGraph) -> Result<(), StoreError> {
        let json = encode(key, graph)?;
        self.entries.insert(key.to_string(), json);
        Ok(())
    }
}

/// Keeps each snapshot in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl FlowStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<FlowGraph>, StoreError> {
        let path = self.path_for(key);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    key: key.to_string(),
                    source,
                });
            }
        };
        decode(key, &json).map(Some)
    }

    fn store(&mut self, key: &str, graph: &FlowGraph) -> Result<(), StoreError> {
        let json = encode(key, graph)?;
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let path = self.path_for(key);
        fs::write(&path, json).map_err(io_err)?;

        tracing::debug!(
            target: TRACING_TARGET,
            key,
            path = %path.display(),
            "Stored flow snapshot"
        );
        Ok(())
    }
}

fn encode(key: &str, graph: &FlowGraph) -> Result<String, StoreError> {
    graph.to_json().map_err(|e| StoreError::Encoding {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn decode(key: &str, json: &str) -> Result<FlowGraph, StoreError> {
    FlowGraph::from_json(json).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })
}
