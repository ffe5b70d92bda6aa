use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};

/// One `connections` entry as it appears in a configuration layer.
/// All fields are optional; validation happens on lookup, not on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionLayer {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub authdb: Option<String>,
}

/// A named connection target resolved from the effective configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub name: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub authdb: Option<String>,
}

impl Connection {
    pub fn from_layer(name: &str, attrs: &ConnectionLayer) -> Self {
        Self {
            name: name.to_string(),
            host: attrs.host.clone(),
            port: attrs.port,
            username: attrs.username.clone(),
            password: attrs.password.clone(),
            authdb: attrs.authdb.clone(),
        }
    }

    /// The `host:port` string used as the on-disk directory segment.
    /// Only meaningful once `validate` has passed.
    pub fn socket(&self) -> String {
        format!(
            "{}:{}",
            self.host.as_deref().unwrap_or_default(),
            self.port.map(|p| p.to_string()).unwrap_or_default()
        )
    }

    /// True iff both username and password are present and non-empty.
    /// An authdb on its own does not enable authentication.
    pub fn auth(&self) -> bool {
        matches!(
            (self.username.as_deref(), self.password.as_deref()),
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty()
        )
    }

    /// Checks required attributes in a fixed order: host, port, then the
    /// username/password pairing, then authdb-without-credentials.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_none() {
            return Err(AppError::ConnectionAttributeNotSet("host"));
        }
        if self.port.is_none() {
            return Err(AppError::ConnectionAttributeNotSet("port"));
        }
        match (&self.username, &self.password) {
            (Some(_), None) => return Err(AppError::ConnectionAttributeNotSet("password")),
            (None, Some(_)) => return Err(AppError::ConnectionAttributeNotSet("username")),
            _ => {}
        }
        if self.authdb.is_some() && (self.username.is_none() || self.password.is_none()) {
            return Err(AppError::ConnectionAuthdbSet(self.name.clone()));
        }
        Ok(())
    }
}

/// Named connections, kept in insertion order. Rebuilt wholesale from the
/// effective configuration on every re-merge, never patched incrementally.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    connections: Vec<Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a connection. No validation at insert time.
    pub fn add(&mut self, name: &str, attrs: &ConnectionLayer) {
        let connection = Connection::from_layer(name, attrs);
        match self.connections.iter_mut().find(|c| c.name == name) {
            Some(existing) => *existing = connection,
            None => self.connections.push(connection),
        }
    }

    /// Looks up a connection by name and validates it before returning.
    pub fn get(&self, name: &str) -> Result<&Connection> {
        let connection = self
            .connections
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| AppError::ConnectionNotSet(name.to_string()))?;
        connection.validate()?;
        Ok(connection)
    }

    /// Linear scan for the first connection whose socket matches.
    /// A miss is not an error; a hit is validated.
    pub fn get_by_socket(&self, socket: &str) -> Result<Option<&Connection>> {
        match self.connections.iter().find(|c| c.socket() == socket) {
            Some(connection) => {
                connection.validate()?;
                Ok(Some(connection))
            }
            None => Ok(None),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.connections.iter().map(|c| c.name.as_str()).collect()
    }

    /// All registered connections in insertion order, unvalidated.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn clear(&mut self) {
        self.connections.clear();
    }
}
