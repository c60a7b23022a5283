//! JSON pointer handling over `serde_json::Value` trees.
//!
//! Besides plain navigation this module owns the two mutations the resolver
//! performs on documents: [`extract`] moves a subtree out of its document and
//! leaves a tombstone behind, and [`graft`] splices a value in at a
//! destination, creating intermediate objects on the way.

use std::mem;

use serde_json::{Map, Value};

/// A pointer segment that could not be followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSegment {
    /// The (unescaped) segment that was not found.
    pub segment: String,
    /// Zero-based position of the segment in the pointer.
    pub depth: usize,
}

/// Reasons a graft can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraftError {
    /// The destination key already holds a value.
    Occupied { segment: String },
    /// An intermediate value is a scalar, or an array addressed by a
    /// non-index segment.
    NotContainer { segment: String },
    /// The destination has no segments (it is the document root).
    EmptyDestination,
}

/// Splits a pointer into its non-empty, still escaped segments.
pub fn raw_segments(pointer: &str) -> Vec<&str> {
    pointer.split('/').filter(|s| !s.is_empty()).collect()
}

/// Splits a pointer into its non-empty segments with `~1` and `~0` decoded.
pub fn segments(pointer: &str) -> Vec<String> {
    raw_segments(pointer).into_iter().map(unescape).collect()
}

/// Decodes a single pointer segment (`~1` → `/`, then `~0` → `~`).
pub fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Returns the canonical form of a pointer, or `None` when it has no
/// segments and therefore addresses the whole document.
pub fn canonical_pointer(pointer: &str) -> Option<String> {
    let parts = raw_segments(pointer);
    if parts.is_empty() {
        None
    } else {
        Some(format!("/{}", parts.join("/")))
    }
}

/// Unescaped segments of a destination path such as `#/definitions/a/b`.
pub fn destination_segments(new_path: &str) -> Vec<String> {
    let pointer = new_path.strip_prefix('#').unwrap_or(new_path);
    segments(pointer)
}

/// Follows `path` from `doc` and returns the value it addresses.
pub fn navigate<'a, S: AsRef<str>>(
    doc: &'a Value,
    path: &[S],
) -> Result<&'a Value, MissingSegment> {
    let mut current = doc;
    for (depth, segment) in path.iter().enumerate() {
        let segment = segment.as_ref();
        current = child(current, segment).ok_or_else(|| MissingSegment {
            segment: segment.to_string(),
            depth,
        })?;
    }
    Ok(current)
}

/// Mutable counterpart of [`navigate`].
pub fn navigate_mut<'a, S: AsRef<str>>(
    doc: &'a mut Value,
    path: &[S],
) -> Result<&'a mut Value, MissingSegment> {
    let mut current = doc;
    for (depth, segment) in path.iter().enumerate() {
        let segment = segment.as_ref();
        current = child_mut(current, segment).ok_or_else(|| MissingSegment {
            segment: segment.to_string(),
            depth,
        })?;
    }
    Ok(current)
}

/// Takes ownership of the subtree at `path`, leaving a tombstone behind.
///
/// In an object the key is removed (sibling order is kept); in an array the
/// slot is set to `null` so the indices of its siblings stay valid. An empty
/// path takes the whole document and leaves `null` in its place.
///
/// A fragment that is not re-attached at its old location (any separator
/// other than `/`) leaves that `null` entry in the owner's grafted copy.
pub fn extract<S: AsRef<str>>(doc: &mut Value, path: &[S]) -> Result<Value, MissingSegment> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(mem::take(doc));
    };
    let last = last.as_ref();
    let depth = parents.len();
    let missing = || MissingSegment {
        segment: last.to_string(),
        depth,
    };

    match navigate_mut(doc, parents)? {
        Value::Object(map) => map.shift_remove(last).ok_or_else(missing),
        Value::Array(items) => {
            let slot = parse_index(last)
                .and_then(|i| items.get_mut(i))
                .ok_or_else(missing)?;
            Ok(mem::take(slot))
        }
        _ => Err(missing()),
    }
}

/// Inserts `value` at `path`, creating missing intermediate objects.
///
/// The destination must be vacant: an absent object key or a `null` array
/// slot left by [`extract`].
pub fn graft<S: AsRef<str>>(doc: &mut Value, path: &[S], value: Value) -> Result<(), GraftError> {
    let Some((last, parents)) = path.split_last() else {
        return Err(GraftError::EmptyDestination);
    };

    let mut current = doc;
    for segment in parents {
        current = container_entry(current, segment.as_ref())?;
    }

    let last = last.as_ref();
    match current {
        Value::Object(map) => {
            if map.contains_key(last) {
                return Err(GraftError::Occupied {
                    segment: last.to_string(),
                });
            }
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let slot = parse_index(last)
                .and_then(|i| items.get_mut(i))
                .ok_or_else(|| GraftError::NotContainer {
                    segment: last.to_string(),
                })?;
            if !slot.is_null() {
                return Err(GraftError::Occupied {
                    segment: last.to_string(),
                });
            }
            *slot = value;
            Ok(())
        }
        _ => Err(GraftError::NotContainer {
            segment: last.to_string(),
        }),
    }
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => parse_index(segment).and_then(|i| items.get_mut(i)),
        _ => None,
    }
}

/// Steps into `segment`, creating an empty object when the key is absent.
fn container_entry<'a>(value: &'a mut Value, segment: &str) -> Result<&'a mut Value, GraftError> {
    let not_container = || GraftError::NotContainer {
        segment: segment.to_string(),
    };
    let next = match value {
        Value::Object(map) => map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new())),
        Value::Array(items) => parse_index(segment)
            .and_then(|i| items.get_mut(i))
            .ok_or_else(not_container)?,
        _ => return Err(not_container()),
    };
    if next.is_object() || next.is_array() {
        Ok(next)
    } else {
        Err(not_container())
    }
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    segment.parse().ok()
}
