use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::config::UnifyOptions;
use crate::errors::{Result, UnifyError};
use crate::loader;
use crate::naming::{absolute_path, normalize_path, PathNamer};
use crate::pointer::{self, GraftError};
use crate::types::{CanonicalRef, RecordState, SchemaRecord};

/// Keys that mark a document as a standalone schema; dropped when a file is
/// embedded into the unified document.
const STANDALONE_KEYS: [&str; 2] = ["$schema", "$id"];

/// Output of a full resolution run.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The unified, self-contained document.
    pub document: Value,
    /// Every record of the reference graph, in discovery order. The main
    /// schema record comes first.
    pub records: Vec<SchemaRecord>,
}

/// Builds the reference graph rooted at one main schema and assembles the
/// unified document from it.
///
/// All graph state is owned by the resolver and lives for a single run. The
/// record table is the source of truth for "already discovered"; the queue
/// only holds records that still need loading.
pub struct SchemaResolver {
    options: UnifyOptions,
    namer: PathNamer,
    main: CanonicalRef,
    /// Records in discovery order; index 0 is the main schema.
    records: Vec<SchemaRecord>,
    /// Canonical reference to record index.
    index: HashMap<CanonicalRef, usize>,
    /// Destination pointer to index of the embedded record that claims it.
    destinations: HashMap<String, usize>,
    queue: VecDeque<usize>,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl SchemaResolver {
    /// Creates a resolver for the schema at `schema_path`.
    ///
    /// The path is made absolute against the current directory and the main
    /// record is registered (mapped to `#`) and queued.
    pub fn new(schema_path: &Path, options: UnifyOptions) -> Result<Self> {
        options.validate()?;
        let main_path = absolute_path(schema_path)?;
        let namer = PathNamer::new(&main_path, &options);

        let mut resolver = Self {
            options,
            namer,
            main: CanonicalRef::file(main_path),
            records: Vec::new(),
            index: HashMap::new(),
            destinations: HashMap::new(),
            queue: VecDeque::new(),
        };
        let main = resolver.main.clone();
        resolver.register(main)?;
        Ok(resolver)
    }

    /// Runs discovery and assembly and returns the unified document.
    pub async fn unify(self) -> Result<Value> {
        Ok(self.resolve().await?.document)
    }

    /// Runs discovery and assembly, returning the document together with the
    /// final record table.
    pub async fn resolve(mut self) -> Result<Resolution> {
        self.discover().await?;
        let document = self.assemble()?;

        if self.options.logs {
            info!(
                main = %self.main,
                records = self.records.len(),
                "unified schema"
            );
        }

        Ok(Resolution {
            document,
            records: self.records,
        })
    }

    /// Returns the canonical reference of the main schema.
    pub fn main_reference(&self) -> &CanonicalRef {
        &self.main
    }

    /// Returns the record table in discovery order.
    pub fn records(&self) -> &[SchemaRecord] {
        &self.records
    }

    /// Looks up the record for a canonical reference.
    pub fn record(&self, reference: &CanonicalRef) -> Option<&SchemaRecord> {
        self.index.get(reference).map(|&idx| &self.records[idx])
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

impl SchemaResolver {
    /// Loads queued records until the queue is empty.
    ///
    /// Loading a file may register and queue further records; a reference is
    /// registered before any of the content it leads to is scanned, so cyclic
    /// graphs terminate.
    pub async fn discover(&mut self) -> Result<()> {
        while let Some(idx) = self.queue.pop_front() {
            self.load(idx).await?;
        }
        Ok(())
    }

    /// Registers `reference` if it is new and returns its record index.
    ///
    /// A fragment's owning file is registered first, so the rest of that file
    /// is embedded as well.
    fn register(&mut self, reference: CanonicalRef) -> Result<usize> {
        if let Some(&idx) = self.index.get(&reference) {
            return Ok(idx);
        }
        if reference.is_fragment() {
            self.register(reference.owner())?;
        }

        // Main-file records keep their own location, so they never claim a
        // destination; they may point into content grafted from elsewhere.
        let new_path = self.namer.new_path(&reference);
        let in_main = reference.file_path() == self.main.file_path();
        if !in_main {
            if let Some(&other) = self.destinations.get(&new_path) {
                return Err(UnifyError::NamingCollision {
                    first: self.records[other].reference.to_string(),
                    second: reference.to_string(),
                    new_path,
                });
            }
        }

        if self.options.logs {
            debug!(reference = %reference, new_path = %new_path, "discovered reference");
        }

        let idx = self.records.len();
        self.index.insert(reference.clone(), idx);
        if !in_main {
            self.destinations.insert(new_path.clone(), idx);
        }
        self.records.push(SchemaRecord::discovered(reference, new_path));
        self.queue.push_back(idx);
        Ok(idx)
    }

    /// Canonicalizes a raw `$ref` found in `base_file`, registers it, and
    /// returns the destination pointer it must be rewritten to.
    fn register_ref(&mut self, base_file: &Path, raw: &str) -> Result<String> {
        let (file_part, pointer) = match raw.split_once('#') {
            Some((file, pointer)) => (file, pointer),
            None => (raw, ""),
        };

        if file_part.contains("://") {
            return Err(UnifyError::UnsupportedReference {
                reference: raw.to_string(),
            });
        }

        let file = if file_part.is_empty() {
            base_file.to_path_buf()
        } else {
            let base_dir = base_file.parent().unwrap_or_else(|| Path::new("/"));
            normalize_path(&base_dir.join(file_part))
        };

        let idx = self.register(CanonicalRef::fragment(file, pointer))?;
        let new_path = self.records[idx].new_path.clone();

        if self.options.logs {
            debug!(
                file = %base_file.display(),
                from = raw,
                to = %new_path,
                "rewrote $ref"
            );
        }
        Ok(new_path)
    }

    /// Rewrites every `$ref` string in `value` to its destination pointer.
    ///
    /// The value of a `$ref` key is never descended into; non-string `$ref`
    /// values are left as they are.
    fn scan_refs(&mut self, base_file: &Path, value: &mut Value) -> Result<()> {
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    if key == "$ref" {
                        if let Value::String(raw) = child {
                            *raw = self.register_ref(base_file, raw)?;
                        }
                    } else {
                        self.scan_refs(base_file, child)?;
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.scan_refs(base_file, item)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn load(&mut self, idx: usize) -> Result<()> {
        if self.records[idx].state != RecordState::Discovered {
            return Ok(());
        }
        let reference = self.records[idx].reference.clone();
        if reference.is_fragment() {
            let owner = self.register(reference.owner())?;
            self.load_file(owner).await?;
            self.load_fragment(idx)
        } else {
            self.load_file(idx).await
        }
    }

    /// Reads a whole file, rewrites its refs and caches the result.
    async fn load_file(&mut self, idx: usize) -> Result<()> {
        if self.records[idx].state != RecordState::Discovered {
            return Ok(());
        }
        self.records[idx].state = RecordState::Loading;

        let path: PathBuf = self.records[idx].reference.file_path().to_path_buf();
        if self.options.logs {
            debug!(path = %path.display(), "loading schema file");
        }

        let mut schema = loader::load_document(&path).await?;
        self.scan_refs(&path, &mut schema)?;

        let record = &mut self.records[idx];
        record.schema = Some(schema);
        record.state = RecordState::Loaded;
        Ok(())
    }

    /// Resolves a fragment record once its owning file is loaded.
    ///
    /// Fragments of the main schema stay where they are. Fragments of any
    /// other file are extracted: the record takes ownership of the subtree
    /// and the origin keeps a tombstone. Navigation starts from the deepest
    /// fragment of the same file that was already extracted, if any.
    fn load_fragment(&mut self, idx: usize) -> Result<()> {
        self.records[idx].state = RecordState::Loading;
        let reference = self.records[idx].reference.clone();

        if reference.file_path() == self.main.file_path() {
            if self.options.logs {
                debug!(reference = %reference, "main schema fragment kept in place");
            }
            self.records[idx].state = RecordState::Loaded;
            return Ok(());
        }

        let (holder, skip) = self.extraction_holder(&reference)?;
        let segments = reference.segments();
        let source = self.records[holder]
            .schema
            .as_mut()
            .ok_or_else(|| UnifyError::BrokenReference {
                reference: reference.to_string(),
                segment: segments.get(skip).cloned().unwrap_or_default(),
            })?;

        let extracted = pointer::extract(source, &segments[skip..]).map_err(|missing| {
            UnifyError::BrokenReference {
                reference: reference.to_string(),
                segment: missing.segment,
            }
        })?;

        if self.options.logs {
            debug!(
                reference = %reference,
                holder = %self.records[holder].reference,
                "extracted fragment"
            );
        }

        let record = &mut self.records[idx];
        record.schema = Some(extracted);
        record.state = RecordState::Extracted;
        Ok(())
    }

    /// Finds the record currently holding the content addressed by
    /// `reference` and the number of pointer segments already consumed to
    /// reach it.
    fn extraction_holder(&self, reference: &CanonicalRef) -> Result<(usize, usize)> {
        let ancestor = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.state == RecordState::Extracted)
            .filter(|(_, r)| reference.is_descendant_of(&r.reference))
            .max_by_key(|(_, r)| r.reference.raw_segments().len());

        match ancestor {
            Some((idx, record)) => Ok((idx, record.reference.raw_segments().len())),
            None => {
                let owner = self.index.get(&reference.owner()).copied().ok_or_else(|| {
                    UnifyError::BrokenReference {
                        reference: reference.to_string(),
                        segment: String::new(),
                    }
                })?;
                Ok((owner, 0))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

impl SchemaResolver {
    /// Grafts every external record into the main document and verifies that
    /// every destination pointer resolves.
    ///
    /// Records are grafted by destination depth, then discovery order, so a
    /// container always lands before anything nested inside it.
    pub fn assemble(&mut self) -> Result<Value> {
        let mut unified = self.records[0].schema.take().ok_or_else(|| UnifyError::File {
            message: "main schema has not been loaded".to_string(),
            path: self.main.file_path().display().to_string(),
        })?;

        let main_file = self.main.file_path().to_path_buf();
        let mut order: Vec<usize> = (1..self.records.len())
            .filter(|&idx| self.records[idx].reference.file_path() != main_file)
            .collect();
        order.sort_by_key(|&idx| pointer::destination_segments(&self.records[idx].new_path).len());

        for idx in order {
            self.graft_record(&mut unified, idx)?;
        }

        self.verify(&unified)?;
        Ok(unified)
    }

    fn graft_record(&mut self, unified: &mut Value, idx: usize) -> Result<()> {
        let logs = self.options.logs;
        let record = &mut self.records[idx];
        let Some(mut schema) = record.schema.take() else {
            return Err(UnifyError::BrokenReference {
                reference: record.reference.to_string(),
                segment: String::new(),
            });
        };

        if !record.reference.is_fragment() {
            if let Value::Object(map) = &mut schema {
                for key in STANDALONE_KEYS {
                    map.shift_remove(key);
                }
            }
        }

        if logs {
            debug!(reference = %record.reference, new_path = %record.new_path, "grafting");
        }

        let destination = pointer::destination_segments(&record.new_path);
        pointer::graft(unified, &destination, schema).map_err(|e| {
            let message = match e {
                GraftError::Occupied { segment } => {
                    format!("'{}' already exists in the unified document", segment)
                }
                GraftError::NotContainer { segment } => {
                    format!("cannot nest content under non-container '{}'", segment)
                }
                GraftError::EmptyDestination => "destination is the document root".to_string(),
            };
            UnifyError::GraftConflict {
                message: format!("{} while embedding {}", message, record.reference),
                new_path: record.new_path.clone(),
            }
        })?;

        record.state = RecordState::Grafted;
        Ok(())
    }

    /// Checks that every record's destination resolves in the unified
    /// document.
    fn verify(&self, unified: &Value) -> Result<()> {
        for record in &self.records {
            let destination = pointer::destination_segments(&record.new_path);
            pointer::navigate(unified, &destination).map_err(|missing| {
                UnifyError::BrokenReference {
                    reference: record.reference.to_string(),
                    segment: missing.segment,
                }
            })?;
        }
        Ok(())
    }
}
