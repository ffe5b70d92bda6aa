pub mod connection;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Result;
pub use connection::{Connection, ConnectionLayer, ConnectionRegistry};

pub const DEFAULT_CONNECTION: &str = "default";
const DEFAULT_ROOT: &str = "~/.mongotool_backups";
const DEFAULT_LOG_LEVEL: &str = "INFO";

/// One configuration fragment. Layers are folded in the order they were
/// added; later layers override earlier ones at every nested key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigLayer {
    pub root: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
    #[serde(default)]
    pub connections: BTreeMap<String, ConnectionLayer>,
}

/// Merges `over` onto `base` without mutating either. Scalar fields take the
/// later value when set; the connections map recurses per name and per field.
fn merge(base: &ConfigLayer, over: &ConfigLayer) -> ConfigLayer {
    let mut connections = base.connections.clone();
    for (name, attrs) in &over.connections {
        let merged = match connections.get(name) {
            Some(existing) => merge_connection(existing, attrs),
            None => attrs.clone(),
        };
        connections.insert(name.clone(), merged);
    }

    ConfigLayer {
        root: over.root.clone().or_else(|| base.root.clone()),
        log_level: over.log_level.clone().or_else(|| base.log_level.clone()),
        log_file: over.log_file.clone().or_else(|| base.log_file.clone()),
        connections,
    }
}

fn merge_connection(base: &ConnectionLayer, over: &ConnectionLayer) -> ConnectionLayer {
    ConnectionLayer {
        host: over.host.clone().or_else(|| base.host.clone()),
        port: over.port.or(base.port),
        username: over.username.clone().or_else(|| base.username.clone()),
        password: over.password.clone().or_else(|| base.password.clone()),
        authdb: over.authdb.clone().or_else(|| base.authdb.clone()),
    }
}

fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Ordered configuration layers plus the effective merged configuration and
/// the connection registry rebuilt from it.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    layers: Vec<ConfigLayer>,
    effective: ConfigLayer,
    registry: ConnectionRegistry,
    active_connection: String,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    fn default_layer() -> ConfigLayer {
        let mut connections = BTreeMap::new();
        connections.insert(
            DEFAULT_CONNECTION.to_string(),
            ConnectionLayer {
                host: Some("localhost".to_string()),
                port: Some(27017),
                ..Default::default()
            },
        );
        ConfigLayer {
            root: Some(DEFAULT_ROOT.to_string()),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
            log_file: None,
            connections,
        }
    }

    pub fn new() -> Self {
        let mut store = Self {
            layers: vec![Self::default_layer()],
            effective: ConfigLayer::default(),
            registry: ConnectionRegistry::new(),
            active_connection: DEFAULT_CONNECTION.to_string(),
        };
        store.remerge();
        store
    }

    /// Appends a layer and recomputes the effective configuration.
    pub fn add(&mut self, layer: ConfigLayer) {
        self.layers.push(layer);
        self.remerge();
    }

    /// Reads and parses `path` as a JSON layer. Any failure is swallowed:
    /// the layer is simply not added and the effective configuration is
    /// unchanged. The failure is recorded at debug level only.
    pub fn add_file(&mut self, path: impl AsRef<Path>) {
        let path = expand_home(&path.as_ref().to_string_lossy());
        let layer = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<ConfigLayer>(&text).map_err(|e| e.to_string()));
        match layer {
            Ok(layer) => self.add(layer),
            Err(reason) => {
                tracing::debug!(path = %path.display(), %reason, "config file layer ignored");
            }
        }
    }

    /// Folds all layers left-to-right and rebuilds the registry from the
    /// merged `connections` map.
    fn remerge(&mut self) {
        let mut merged = ConfigLayer::default();
        for layer in &self.layers {
            merged = merge(&merged, layer);
        }
        self.registry.clear();
        for (name, attrs) in &merged.connections {
            self.registry.add(name, attrs);
        }
        self.effective = merged;
    }

    /// Storage root with `~` expanded to the home directory.
    pub fn root(&self) -> PathBuf {
        expand_home(self.effective.root.as_deref().unwrap_or(DEFAULT_ROOT))
    }

    pub fn log_level(&self) -> &str {
        self.effective.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Option<&str> {
        self.effective.log_file.as_deref()
    }

    pub fn set_connection(&mut self, name: impl Into<String>) {
        self.active_connection = name.into();
    }

    pub fn connection_name(&self) -> &str {
        &self.active_connection
    }

    /// The active connection, validated.
    pub fn connection(&self) -> Result<&Connection> {
        self.registry.get(&self.active_connection)
    }

    /// `<root>/<host>:<port>` for the active connection.
    pub fn connection_dir(&self) -> Result<PathBuf> {
        Ok(self.root().join(self.connection()?.socket()))
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }
}
