//! Action-edge detection over the check sensor's event record
//!
//! The sensor rewrites a single record on every physical action. The
//! [`ChangeDetector`] fingerprints that record each cycle and reports one
//! [`ActionEdge`] per distinct record, never one on the first observation.

use crate::files::{parse_bytes, read_bytes, ActionEvent, StateRead};
use core::fmt;
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::path::PathBuf;
use tracing::{debug, info};

/// SHA-256 of the raw record bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        Fingerprint(out)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0[..8]))
    }
}

/// What one poll of the event source returned.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRead {
    Missing,
    Empty,
    Malformed(String),
    Present { bytes: Vec<u8>, event: ActionEvent },
}

impl SourceRead {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match parse_bytes::<ActionEvent>(&bytes) {
            StateRead::Loaded(event) => SourceRead::Present { bytes, event },
            StateRead::Empty => SourceRead::Empty,
            StateRead::Malformed(reason) => SourceRead::Malformed(reason),
            StateRead::Missing => SourceRead::Missing,
        }
    }

    pub fn event(event: &ActionEvent) -> Self {
        let bytes = serde_json::to_vec(event).unwrap_or_default();
        SourceRead::from_bytes(bytes)
    }
}

/// A one-shot "an action just happened" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEdge {
    pub fingerprint: Fingerprint,
}

pub trait EventSource {
    fn read(&mut self) -> SourceRead;
}

/// Polls the record file the sensor bridge rewrites (`last_check.json`).
#[derive(Debug, Clone)]
pub struct FileEventSource {
    path: PathBuf,
}

impl FileEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for FileEventSource {
    fn read(&mut self) -> SourceRead {
        match read_bytes(&self.path) {
            StateRead::Loaded(bytes) => SourceRead::from_bytes(bytes),
            StateRead::Missing => SourceRead::Missing,
            StateRead::Empty => SourceRead::Empty,
            StateRead::Malformed(reason) => SourceRead::Malformed(reason),
        }
    }
}

/// Replays scripted reads; once exhausted it keeps returning the last one.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventSource {
    queued: VecDeque<SourceRead>,
    last: Option<SourceRead>,
}

impl MemoryEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, read: SourceRead) {
        self.queued.push_back(read);
    }
}

impl EventSource for MemoryEventSource {
    fn read(&mut self) -> SourceRead {
        if let Some(next) = self.queued.pop_front() {
            self.last = Some(next);
        }
        self.last.clone().unwrap_or(SourceRead::Missing)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    last: Option<Fingerprint>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fingerprint(&self) -> Option<Fingerprint> {
        self.last
    }

    pub fn observe(&mut self, read: &SourceRead) -> Option<ActionEdge> {
        let SourceRead::Present { bytes, event } = read else {
            if let SourceRead::Malformed(reason) = read {
                debug!(%reason, "action record malformed, ignoring");
            }
            return None;
        };

        let fingerprint = Fingerprint::of(bytes);
        match self.last.replace(fingerprint) {
            None => {
                debug!(%fingerprint, "primed action fingerprint");
                None
            }
            Some(previous) if previous == fingerprint => None,
            Some(_) => {
                info!(%fingerprint, kind = %event.kind, data = %event.data, "new action");
                Some(ActionEdge { fingerprint })
            }
        }
    }

    pub fn poll(&mut self, source: &mut impl EventSource) -> Option<ActionEdge> {
        let read = source.read();
        self.observe(&read)
    }
}
