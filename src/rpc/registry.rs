//! The closed set of callable methods
//!
//! Names resolve through an explicit table to a [`Method`] variant; each variant maps to one typed
//! handler function. The table is built once and never mutated, so it is shared freely.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use super::handlers::{self, HandlerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Echo,
    Add,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Echo, Method::Add];

    pub fn name(self) -> &'static str {
        match self {
            Self::Echo => "echo",
            Self::Add => "add",
        }
    }

    pub async fn invoke(self, params: Option<Value>) -> Result<Value, HandlerError> {
        match self {
            Self::Echo => handlers::echo(params),
            Self::Add => handlers::add(params),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("method `{0}` is not registered")]
pub struct NotFound(pub String);

#[derive(Debug, Clone)]
pub struct MethodRegistry {
    methods: HashMap<&'static str, Method>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self {
            methods: Method::ALL
                .into_iter()
                .map(|method| (method.name(), method))
                .collect(),
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn resolve(&self, name: &str) -> Result<Method, NotFound> {
        self.methods
            .get(name)
            .copied()
            .ok_or_else(|| NotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names = self.methods.keys().copied().collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}
