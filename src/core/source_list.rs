//! In-memory model of the current notebook's source files.
//!
//! The list is always a total replacement of its previous contents after
//! a successful fetch - never a partial merge - so the client-only
//! `selected` flag is re-derived (`true`) on every load. A generation
//! counter guards against out-of-order responses: only the fetch belonging
//! to the most recently issued load is applied.

use std::fmt;

use indexmap::IndexMap;

use crate::api::types::SourceFile;

use super::selection::{aggregate_state, AggregateSelection};

/// Stable identity of a source within its notebook.
///
/// The backend issues no per-source id, so the filename is the identity
/// key end-to-end: per-notebook name uniqueness (client pre-check plus
/// server enforcement) makes filenames the de facto primary key. A rename
/// therefore produces a new identity, and the renamed source comes back
/// from the reconciling re-fetch with `selected` reset to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One source file in the local model.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub name: String,
    /// Byte count.
    pub size: u64,
    pub content_type: Option<String>,
    /// Client-only inclusion flag for the chat context. Never persisted
    /// server-side; `true` whenever the source first appears locally.
    pub selected: bool,
}

impl Source {
    pub fn id(&self) -> SourceId {
        SourceId::new(self.name.clone())
    }

    /// Build from a wire record. New arrivals are always selected.
    pub fn from_wire(wire: SourceFile) -> Self {
        Self {
            name: wire.name,
            size: wire.size,
            content_type: wire.content_type,
            selected: true,
        }
    }

    /// Human-readable size, e.g. `"2.5 KB"`.
    pub fn display_size(&self) -> String {
        format_size(self.size)
    }
}

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with one decimal place, trailing `.0` dropped.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let exponent = (bytes.ilog2() / 10).min(SIZE_UNITS.len() as u32 - 1);
    let value = bytes as f64 / f64::powi(1024.0, exponent as i32);
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, SIZE_UNITS[exponent as usize])
    } else {
        format!("{rounded:.1} {}", SIZE_UNITS[exponent as usize])
    }
}

/// Ordered collection of the active notebook's sources.
///
/// Backed by an `IndexMap` for server order preservation with O(1)
/// identity lookup.
#[derive(Debug, Default)]
pub struct SourceList {
    entries: IndexMap<SourceId, Source>,
    /// Most recently issued load token. Responses carrying an older token
    /// are superseded and discarded.
    generation: u64,
}

impl SourceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new load. The returned token must accompany the eventual
    /// response handed to [`SourceList::apply_load`].
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Apply a completed fetch: full replacement, every source selected.
    ///
    /// Returns `false` and leaves the list untouched when `token` does not
    /// match the most recently issued load (a stale response).
    pub fn apply_load(&mut self, token: u64, sources: Vec<SourceFile>) -> bool {
        if token != self.generation {
            log::debug!(
                "Discarding stale source fetch (token {token}, current {})",
                self.generation
            );
            return false;
        }
        self.set_entries(sources);
        true
    }

    /// Apply the reconciling re-fetch of a settled mutation: replace the
    /// list outright and supersede any load still in flight. Unlike
    /// [`SourceList::apply_load`] this claims a fresh generation at
    /// application time, so a mutation that failed without producing a
    /// re-fetch leaves pending loads untouched.
    pub fn replace(&mut self, sources: Vec<SourceFile>) {
        self.generation += 1;
        self.set_entries(sources);
    }

    fn set_entries(&mut self, sources: Vec<SourceFile>) {
        self.entries = sources
            .into_iter()
            .map(|wire| {
                let source = Source::from_wire(wire);
                (source.id(), source)
            })
            .collect();
    }

    /// Drop all entries and invalidate any in-flight load, e.g. when
    /// leaving the notebook view.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &SourceId) -> Option<&Source> {
        self.entries.get(id)
    }

    pub fn get_index(&self, index: usize) -> Option<&Source> {
        self.entries.get_index(index).map(|(_, source)| source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.entries.values()
    }

    /// Current names, in server order. Snapshot for duplicate-name checks.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().map(|id| id.as_str().to_string()).collect()
    }

    /// Case-sensitive exact-match lookup by filename.
    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.contains_key(&SourceId::new(name))
    }

    // ── Selection controller ────────────────────────────────────────────

    /// Set `selected` on exactly one source. Returns `false` when the
    /// identity is unknown (e.g. it vanished in a re-fetch).
    pub fn toggle_one(&mut self, id: &SourceId, checked: bool) -> bool {
        match self.entries.get_mut(id) {
            Some(source) => {
                source.selected = checked;
                true
            }
            None => false,
        }
    }

    /// Set every source's `selected` flag.
    pub fn toggle_all(&mut self, checked: bool) {
        for source in self.entries.values_mut() {
            source.selected = checked;
        }
    }

    pub fn selected_count(&self) -> usize {
        self.entries.values().filter(|s| s.selected).count()
    }

    /// Tri-state aggregate for the select-all header.
    pub fn aggregate_state(&self) -> AggregateSelection {
        aggregate_state(self.entries.values().map(|s| s.selected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(name: &str, size: u64) -> SourceFile {
        SourceFile {
            name: name.to_string(),
            path: None,
            size,
            content_type: None,
        }
    }

    #[test]
    fn test_apply_load_replaces_and_selects_all() {
        let mut list = SourceList::new();
        let token = list.begin_load();
        assert!(list.apply_load(token, vec![wire("a.pdf", 100), wire("b.pdf", 200)]));

        list.toggle_all(false);
        assert_eq!(list.selected_count(), 0);

        // A fresh load replaces everything; prior deselection is not merged.
        let token = list.begin_load();
        assert!(list.apply_load(token, vec![wire("a.pdf", 100)]));
        assert_eq!(list.len(), 1);
        assert!(list.iter().all(|s| s.selected));
    }

    #[test]
    fn test_stale_load_discarded() {
        let mut list = SourceList::new();
        let stale = list.begin_load();
        let current = list.begin_load();

        assert!(!list.apply_load(stale, vec![wire("old.pdf", 1)]));
        assert!(list.is_empty());

        assert!(list.apply_load(current, vec![wire("new.pdf", 1)]));
        assert_eq!(list.names(), vec!["new.pdf"]);
    }

    #[test]
    fn test_replace_supersedes_inflight_load() {
        let mut list = SourceList::new();
        let pending = list.begin_load();
        list.replace(vec![wire("fresh.pdf", 1)]);

        // The earlier fetch settles late and is discarded.
        assert!(!list.apply_load(pending, vec![wire("stale.pdf", 1)]));
        assert_eq!(list.names(), vec!["fresh.pdf"]);
    }

    #[test]
    fn test_clear_invalidates_inflight_load() {
        let mut list = SourceList::new();
        let token = list.begin_load();
        list.clear();
        assert!(!list.apply_load(token, vec![wire("late.pdf", 1)]));
        assert!(list.is_empty());
    }

    #[test]
    fn test_toggle_one_unknown_identity() {
        let mut list = SourceList::new();
        let token = list.begin_load();
        list.apply_load(token, vec![wire("a.pdf", 100)]);
        assert!(!list.toggle_one(&SourceId::new("missing.pdf"), true));
    }

    #[test]
    fn test_order_preserved() {
        let mut list = SourceList::new();
        let token = list.begin_load();
        list.apply_load(
            token,
            vec![wire("z.pdf", 1), wire("a.pdf", 2), wire("m.pdf", 3)],
        );
        assert_eq!(list.names(), vec!["z.pdf", "a.pdf", "m.pdf"]);
    }

    #[test]
    fn test_deselect_all_then_reselect_only_source() {
        // Single-source list: toggle all off, then the one source back on.
        // The aggregate must read fully checked, not indeterminate.
        let mut list = SourceList::new();
        let token = list.begin_load();
        list.apply_load(token, vec![wire("a.pdf", 100)]);

        list.toggle_all(false);
        assert!(list.toggle_one(&SourceId::new("a.pdf"), true));

        let agg = list.aggregate_state();
        assert!(agg.checked);
        assert!(!agg.indeterminate);
    }

    #[rstest::rstest]
    #[case(0, "0 B")]
    #[case(512, "512 B")]
    #[case(2048, "2 KB")]
    #[case(2560, "2.5 KB")]
    #[case(1_572_864, "1.5 MB")]
    #[case(3_221_225_472, "3 GB")]
    fn test_format_size(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_size(bytes), expected);
    }
}
