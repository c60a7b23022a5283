use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::pointer;

/// Identity of a node in the reference graph.
///
/// A canonical reference is an absolute, lexically normalized file path plus
/// an optional JSON pointer. The pointer is stored in canonical form (empty
/// segments dropped, leading `/`); a pointer without segments denotes the
/// whole file and is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalRef {
    file: PathBuf,
    pointer: Option<String>,
}

impl CanonicalRef {
    /// Creates a reference to a whole file.
    pub fn file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            pointer: None,
        }
    }

    /// Creates a reference to a location inside `file`.
    ///
    /// The pointer may be given with or without its leading `/`.
    pub fn fragment(file: impl Into<PathBuf>, pointer: &str) -> Self {
        Self {
            file: file.into(),
            pointer: pointer::canonical_pointer(pointer),
        }
    }

    /// Returns the absolute path of the owning file.
    pub fn file_path(&self) -> &Path {
        &self.file
    }

    /// Returns the canonical pointer, if this reference addresses a fragment.
    pub fn pointer(&self) -> Option<&str> {
        self.pointer.as_deref()
    }

    /// Returns `true` if this reference addresses a location inside a file.
    pub fn is_fragment(&self) -> bool {
        self.pointer.is_some()
    }

    /// Returns the whole-file reference that owns this one.
    pub fn owner(&self) -> CanonicalRef {
        CanonicalRef::file(self.file.clone())
    }

    /// Raw (still escaped) pointer segments, used for naming.
    pub fn raw_segments(&self) -> Vec<&str> {
        self.pointer
            .as_deref()
            .map(pointer::raw_segments)
            .unwrap_or_default()
    }

    /// Unescaped pointer segments, used for navigating documents.
    pub fn segments(&self) -> Vec<String> {
        self.pointer
            .as_deref()
            .map(pointer::segments)
            .unwrap_or_default()
    }

    /// Returns `true` if `other` is a fragment of the same file whose pointer
    /// is a proper prefix of this one's.
    pub fn is_descendant_of(&self, other: &CanonicalRef) -> bool {
        if self.file != other.file {
            return false;
        }
        let mine = self.raw_segments();
        let theirs = other.raw_segments();
        other.is_fragment() && theirs.len() < mine.len() && mine.starts_with(&theirs)
    }
}

impl fmt::Display for CanonicalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pointer {
            Some(pointer) => write!(f, "{}#{}", self.file.display(), pointer),
            None => write!(f, "{}", self.file.display()),
        }
    }
}

/// Lifecycle of a schema record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordState {
    /// Registered and queued, content not read yet.
    Discovered,
    /// File read, ref scan or extraction in progress.
    Loading,
    /// Content cached (or, for main-file records, living in place).
    Loaded,
    /// Fragment content moved out of its owning document.
    Extracted,
    /// Content spliced into the unified document.
    Grafted,
}

/// One node of the reference graph.
#[derive(Debug, Clone)]
pub struct SchemaRecord {
    /// Canonical identity of the node.
    pub reference: CanonicalRef,
    /// Destination pointer in the unified document; fixed at discovery.
    pub new_path: String,
    /// Current lifecycle state.
    pub state: RecordState,
    /// Loaded content, owned by the record until assembly.
    pub schema: Option<Value>,
}

impl SchemaRecord {
    /// Creates a freshly discovered record.
    pub fn discovered(reference: CanonicalRef, new_path: String) -> Self {
        Self {
            reference,
            new_path,
            state: RecordState::Discovered,
            schema: None,
        }
    }
}
