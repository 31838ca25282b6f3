use std::path::PathBuf;

use crate::data::filter::{filtered_indices, init_filter_state, FilterState};
use crate::data::model::{Listing, ListingSet};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Analysis,
    Details,
    Data,
    Conclusions,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Analysis,
        Tab::Details,
        Tab::Data,
        Tab::Conclusions,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Analysis => "Analysis",
            Tab::Details => "Details",
            Tab::Data => "Data",
            Tab::Conclusions => "Conclusions",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. The dataset is loaded once
/// at startup and replaced only through File → Open.
pub struct AppState {
    /// Loaded dataset, never mutated.
    pub dataset: ListingSet,

    /// Active filter configuration.
    pub filters: FilterState,

    /// Indices of listings passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Currently selected tab.
    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Where the dataset was loaded from.
    pub source_path: PathBuf,
}

impl AppState {
    pub fn new(dataset: ListingSet, source_path: PathBuf) -> Self {
        let filters = init_filter_state(&dataset);
        let visible_indices = (0..dataset.len()).collect();
        AppState {
            dataset,
            filters,
            visible_indices,
            active_tab: Tab::Overview,
            status_message: None,
            source_path,
        }
    }

    /// Swap in a newly opened dataset and reset filters to its bounds.
    pub fn replace_dataset(&mut self, dataset: ListingSet, source_path: PathBuf) {
        self.filters = init_filter_state(&dataset);
        self.visible_indices = (0..dataset.len()).collect();
        self.dataset = dataset;
        self.source_path = source_path;
        self.status_message = None;
    }

    /// Recompute `visible_indices` after a filter change. The whole pass is
    /// rerun; an empty result is a valid state.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.filters);
    }

    /// Back to the defaults: full ranges, every option selected.
    pub fn reset_filters(&mut self) {
        self.filters = init_filter_state(&self.dataset);
        self.refilter();
    }

    /// The filtered subset, in file order.
    pub fn visible_listings(&self) -> Vec<&Listing> {
        self.visible_indices
            .iter()
            .map(|&i| &self.dataset.listings[i])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;

    fn state() -> AppState {
        let set = ListingSet::from_listings(vec![
            listing(200_000.0, 80.0),
            listing(300_000.0, 100.0),
            listing(450_000.0, 150.0),
        ]);
        AppState::new(set, PathBuf::from("analisis.csv"))
    }

    #[test]
    fn starts_with_everything_visible() {
        let s = state();
        assert_eq!(s.visible_indices, vec![0, 1, 2]);
        assert_eq!(s.active_tab, Tab::Overview);
    }

    #[test]
    fn refilter_and_reset_round_trip() {
        let mut s = state();
        s.filters.price = (250_000.0, 350_000.0);
        s.refilter();
        assert_eq!(s.visible_indices, vec![1]);
        assert_eq!(s.visible_listings()[0].price, 300_000.0);

        s.reset_filters();
        assert_eq!(s.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn replace_dataset_resets_filters_to_new_bounds() {
        let mut s = state();
        s.filters.price = (0.0, 1.0);
        s.refilter();
        assert!(s.visible_indices.is_empty());

        let fresh = ListingSet::from_listings(vec![listing(500_000.0, 90.0)]);
        s.replace_dataset(fresh, PathBuf::from("other.csv"));
        assert_eq!(s.visible_indices, vec![0]);
        assert_eq!(s.filters.price, (500_000.0, 500_000.0));
    }
}
