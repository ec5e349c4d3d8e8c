//! # Instance Paths and JSON Pointers
//!
//! Every validation error carries the location of the offending value as
//! a sequence of [`PathToken`]s, rendered as an RFC 6901 JSON Pointer
//! (`["a", 0, "b"]` → `/a/0/b`, root → empty string).
//!
//! During recursion the validator threads an [`InstancePath`] through each
//! frame. A child path borrows its parent, so extending the path never
//! mutates shared state and nothing needs to be restored on the way back up.

use std::fmt;

use serde::Serialize;

/// A single step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathToken {
    /// Object member name.
    Key(String),
    /// Array element index.
    Index(usize),
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathToken::Key(key) => f.write_str(key),
            PathToken::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathToken {
    fn from(key: &str) -> Self {
        PathToken::Key(key.to_string())
    }
}

impl From<usize> for PathToken {
    fn from(index: usize) -> Self {
        PathToken::Index(index)
    }
}

/// Immutable path of the current recursion frame.
///
/// Each variant other than `Root` points at its parent frame, so the path
/// lives entirely on the call stack of one `validate()` invocation.
#[derive(Debug, Clone, Copy)]
pub enum InstancePath<'a> {
    Root,
    Key(&'a InstancePath<'a>, &'a str),
    Index(&'a InstancePath<'a>, usize),
}

impl<'a> InstancePath<'a> {
    /// Extend with an object member name.
    pub fn key(&'a self, key: &'a str) -> InstancePath<'a> {
        InstancePath::Key(self, key)
    }

    /// Extend with an array index.
    pub fn index(&'a self, index: usize) -> InstancePath<'a> {
        InstancePath::Index(self, index)
    }

    /// Materialize the path as an owned token list, root first.
    pub fn to_tokens(&self) -> Vec<PathToken> {
        let mut tokens = Vec::new();
        let mut current = self;
        loop {
            match current {
                InstancePath::Root => break,
                InstancePath::Key(parent, key) => {
                    tokens.push(PathToken::Key((*key).to_string()));
                    current = parent;
                }
                InstancePath::Index(parent, index) => {
                    tokens.push(PathToken::Index(*index));
                    current = parent;
                }
            }
        }
        tokens.reverse();
        tokens
    }
}

/// Render a token list as a JSON Pointer.
///
/// Member names are escaped per RFC 6901: `~` becomes `~0` and `/`
/// becomes `~1`.
pub fn to_json_pointer(path: &[PathToken]) -> String {
    let mut pointer = String::new();
    for token in path {
        pointer.push('/');
        match token {
            PathToken::Key(key) => pointer.push_str(&key.replace('~', "~0").replace('/', "~1")),
            PathToken::Index(index) => pointer.push_str(&index.to_string()),
        }
    }
    pointer
}
