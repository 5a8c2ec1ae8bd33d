//! Aggregate selection state and the chat gating predicate.
//!
//! Tri-state checkbox semantics, encoded once as a pure function so every
//! render derives the header checkbox the same way.

/// Tri-state aggregate of the source list's `selected` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateSelection {
    /// `true` iff the list is non-empty and every source is selected.
    pub checked: bool,
    /// `true` iff some but not all sources are selected.
    pub indeterminate: bool,
}

impl AggregateSelection {
    /// Glyph for the select-all header checkbox.
    pub fn glyph(self) -> &'static str {
        if self.checked {
            "[x]"
        } else if self.indeterminate {
            "[-]"
        } else {
            "[ ]"
        }
    }
}

/// Derive the aggregate from per-source `selected` flags.
pub fn aggregate_state(flags: impl Iterator<Item = bool>) -> AggregateSelection {
    let mut total = 0usize;
    let mut selected = 0usize;
    for flag in flags {
        total += 1;
        if flag {
            selected += 1;
        }
    }
    AggregateSelection {
        checked: total > 0 && selected == total,
        indeterminate: selected > 0 && selected < total,
    }
}

/// Sending chat messages is disallowed with nothing selected.
pub fn chat_enabled(selected_count: usize) -> bool {
    selected_count > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_is_neither() {
        let agg = aggregate_state(std::iter::empty());
        assert!(!agg.checked);
        assert!(!agg.indeterminate);
    }

    #[test]
    fn test_all_selected() {
        let agg = aggregate_state([true, true, true].into_iter());
        assert!(agg.checked);
        assert!(!agg.indeterminate);
    }

    #[test]
    fn test_some_selected() {
        let agg = aggregate_state([true, false].into_iter());
        assert!(!agg.checked);
        assert!(agg.indeterminate);
    }

    #[test]
    fn test_none_selected() {
        let agg = aggregate_state([false, false].into_iter());
        assert!(!agg.checked);
        assert!(!agg.indeterminate);
    }

    #[test]
    fn test_chat_gate() {
        assert!(!chat_enabled(0));
        assert!(chat_enabled(1));
        assert!(chat_enabled(12));
    }
}
