use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Outcome of reading a small JSON state file written by another process.
///
/// The three "no data" cases stay distinct so callers can log them
/// differently, but none of them is an error for the table engine.
#[derive(Debug, Clone, PartialEq)]
pub enum StateRead<T> {
    Missing,
    Empty,
    Malformed(String),
    Loaded(T),
}

impl<T> StateRead<T> {
    pub fn loaded(self) -> Option<T> {
        match self {
            StateRead::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, StateRead::Loaded(_))
    }

    /// Short label for logs.
    pub fn describe(&self) -> &'static str {
        match self {
            StateRead::Missing => "missing",
            StateRead::Empty => "empty",
            StateRead::Malformed(_) => "malformed",
            StateRead::Loaded(_) => "loaded",
        }
    }
}

impl<T: Default> StateRead<T> {
    pub fn unwrap_or_default(self) -> T {
        self.loaded().unwrap_or_default()
    }
}

/// Read raw bytes, mapping "not there" and "can't open" to [`StateRead`].
pub fn read_bytes(path: &Path) -> StateRead<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => StateRead::Empty,
        Ok(bytes) => StateRead::Loaded(bytes),
        Err(err) if err.kind() == ErrorKind::NotFound => StateRead::Missing,
        Err(err) => StateRead::Malformed(format!("unreadable: {err}")),
    }
}

pub fn parse_bytes<T: DeserializeOwned>(bytes: &[u8]) -> StateRead<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return StateRead::Empty;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => StateRead::Loaded(value),
        Err(err) => StateRead::Malformed(err.to_string()),
    }
}

pub fn read_state<T: DeserializeOwned>(path: &Path) -> StateRead<T> {
    match read_bytes(path) {
        StateRead::Loaded(bytes) => parse_bytes(&bytes),
        StateRead::Missing => StateRead::Missing,
        StateRead::Empty => StateRead::Empty,
        StateRead::Malformed(reason) => StateRead::Malformed(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    type Doc = BTreeMap<String, u32>;

    #[test]
    fn distinguishes_missing_empty_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        assert_eq!(read_state::<Doc>(&path), StateRead::Missing);

        fs::write(&path, "  \n").unwrap();
        assert_eq!(read_state::<Doc>(&path), StateRead::Empty);

        fs::write(&path, "{\"a\": ").unwrap();
        assert!(matches!(read_state::<Doc>(&path), StateRead::Malformed(_)));

        fs::write(&path, "{\"a\": 3}").unwrap();
        let doc = read_state::<Doc>(&path).loaded().unwrap();
        assert_eq!(doc["a"], 3);
    }

    #[test]
    fn malformed_read_defaults_to_empty_value() {
        let read: StateRead<Doc> = StateRead::Malformed("bad".into());
        assert!(read.unwrap_or_default().is_empty());
    }
}
