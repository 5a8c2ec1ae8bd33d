//! Property tests for selection aggregation and size formatting.

use proptest::prelude::*;

use crate::core::selection::{aggregate_state, chat_enabled};
use crate::core::source_list::{format_size, SourceId, SourceList};

proptest! {
    /// `checked` holds exactly when the list is non-empty and every flag
    /// is set; `indeterminate` exactly when flags are mixed.
    #[test]
    fn aggregate_matches_flag_census(flags in proptest::collection::vec(any::<bool>(), 0..32)) {
        let agg = aggregate_state(flags.iter().copied());
        let all = !flags.is_empty() && flags.iter().all(|&f| f);
        let any = flags.iter().any(|&f| f);

        prop_assert_eq!(agg.checked, all);
        prop_assert_eq!(agg.indeterminate, any && !all);
        // The two flags never hold at once.
        prop_assert!(!(agg.checked && agg.indeterminate));
    }

    /// Any toggle sequence lands the aggregate in a state consistent with
    /// the per-source flags.
    #[test]
    fn toggle_sequences_keep_aggregate_consistent(
        count in 1usize..12,
        ops in proptest::collection::vec((any::<u8>(), any::<bool>()), 0..40),
    ) {
        let mut list = SourceList::new();
        let token = list.begin_load();
        let sources = (0..count)
            .map(|i| crate::api::types::SourceFile {
                name: format!("doc{i}.pdf"),
                path: None,
                size: 100,
                content_type: None,
            })
            .collect();
        prop_assert!(list.apply_load(token, sources));

        for (pick, checked) in ops {
            if pick as usize % (count + 1) == count {
                list.toggle_all(checked);
            } else {
                let id = SourceId::new(format!("doc{}.pdf", pick as usize % count));
                list.toggle_one(&id, checked);
            }
        }

        let agg = list.aggregate_state();
        let selected = list.selected_count();
        prop_assert_eq!(agg.checked, selected == count);
        prop_assert_eq!(agg.indeterminate, selected > 0 && selected < count);
        prop_assert_eq!(chat_enabled(selected), selected > 0);
    }

    /// Formatted sizes always carry a unit suffix and never a trailing ".0".
    #[test]
    fn size_format_shape(bytes in any::<u64>()) {
        let formatted = format_size(bytes);
        prop_assert!(
            ["B", "KB", "MB", "GB"].iter().any(|unit| formatted.ends_with(unit)),
            "no unit suffix: {}", formatted
        );
        prop_assert!(!formatted.contains(".0 "), "trailing .0: {}", formatted);
    }
}
