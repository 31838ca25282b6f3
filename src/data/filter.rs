use std::collections::BTreeSet;

use super::model::{Listing, ListingSet, Seller};

// ---------------------------------------------------------------------------
// Filter state: active constraints per column
// ---------------------------------------------------------------------------

/// The currently active filter configuration.
///
/// Ranges are inclusive on both ends. For the categorical selections an
/// empty set means "no constraint" (show everything), matching the source
/// dashboard where clearing a multiselect disables that filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// (min, max) asking price in EUR.
    pub price: (f64, f64),
    /// (min, max) area in m².
    pub area: (f64, f64),
    pub rooms: BTreeSet<u32>,
    pub neighborhoods: BTreeSet<String>,
    pub sellers: BTreeSet<Seller>,
}

/// Initialise a [`FilterState`] that lets the whole dataset through:
/// ranges at the dataset bounds, every categorical option selected.
pub fn init_filter_state(dataset: &ListingSet) -> FilterState {
    FilterState {
        price: dataset.price_bounds,
        area: dataset.area_bounds,
        rooms: dataset.room_options.clone(),
        neighborhoods: dataset.neighborhoods.clone(),
        sellers: dataset.sellers.clone(),
    }
}

/// Whether a single listing passes every active predicate.
///
/// * Price and area must fall inside the inclusive ranges.
/// * A non-empty room / neighborhood / seller selection requires membership;
///   an empty selection imposes no constraint.
/// * A listing without a neighborhood fails an active neighborhood filter
///   (missing values are never offered as options).
pub fn matches(listing: &Listing, filters: &FilterState) -> bool {
    if listing.price < filters.price.0 || listing.price > filters.price.1 {
        return false;
    }
    if listing.area < filters.area.0 || listing.area > filters.area.1 {
        return false;
    }
    if !filters.rooms.is_empty() && !filters.rooms.contains(&listing.rooms) {
        return false;
    }
    if !filters.neighborhoods.is_empty() {
        match &listing.neighborhood {
            Some(n) => {
                if !filters.neighborhoods.contains(n) {
                    return false;
                }
            }
            None => return false,
        }
    }
    if !filters.sellers.is_empty() && !filters.sellers.contains(&listing.seller) {
        return false;
    }
    true
}

/// Return indices of listings that pass all active filters, preserving
/// input order. An empty result is a valid state, not an error.
pub fn filtered_indices(dataset: &ListingSet, filters: &FilterState) -> Vec<usize> {
    dataset
        .listings
        .iter()
        .enumerate()
        .filter(|(_, l)| matches(l, filters))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;

    fn sample_set() -> ListingSet {
        let mut a = listing(200_000.0, 80.0);
        a.rooms = 2;
        a.neighborhood = Some("Centro".to_string());
        a.seller = Seller::Individual;

        let mut b = listing(300_000.0, 100.0);
        b.rooms = 3;
        b.neighborhood = Some("Salamanca".to_string());

        let mut c = listing(450_000.0, 150.0);
        c.rooms = 4;
        c.neighborhood = None;

        ListingSet::from_listings(vec![a, b, c])
    }

    #[test]
    fn default_filter_state_returns_full_set() {
        let set = sample_set();
        let filters = init_filter_state(&set);
        assert_eq!(filtered_indices(&set, &filters), vec![0, 1, 2]);
    }

    #[test]
    fn price_range_keeps_only_matching_rows() {
        // [250k, 350k] over {200k/80m², 300k/100m²} keeps exactly the
        // 300k row.
        let set = ListingSet::from_listings(vec![
            listing(200_000.0, 80.0),
            listing(300_000.0, 100.0),
        ]);
        let mut filters = init_filter_state(&set);
        filters.price = (250_000.0, 350_000.0);

        let idx = filtered_indices(&set, &filters);
        assert_eq!(idx, vec![1]);
        assert_eq!(set.listings[idx[0]].price, 300_000.0);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let set = sample_set();
        let mut filters = init_filter_state(&set);
        filters.price = (200_000.0, 300_000.0);
        assert_eq!(filtered_indices(&set, &filters), vec![0, 1]);
    }

    #[test]
    fn predicates_combine_as_conjunction() {
        let set = sample_set();
        let mut filters = init_filter_state(&set);
        filters.price = (150_000.0, 350_000.0);
        filters.rooms = [3].into_iter().collect();
        assert_eq!(filtered_indices(&set, &filters), vec![1]);

        // Tighten the seller predicate: nothing matches both.
        filters.sellers = [Seller::Individual].into_iter().collect();
        assert!(filtered_indices(&set, &filters).is_empty());
    }

    #[test]
    fn empty_categorical_selection_imposes_no_constraint() {
        let set = sample_set();
        let mut filters = init_filter_state(&set);
        filters.rooms.clear();
        filters.neighborhoods.clear();
        filters.sellers.clear();
        assert_eq!(filtered_indices(&set, &filters).len(), set.len());
    }

    #[test]
    fn missing_neighborhood_fails_active_neighborhood_filter() {
        let set = sample_set();
        let mut filters = init_filter_state(&set);
        filters.neighborhoods = ["Centro".to_string()].into_iter().collect();
        // Row 2 has no neighborhood and must be excluded.
        assert_eq!(filtered_indices(&set, &filters), vec![0]);
    }

    #[test]
    fn no_false_positives_or_negatives() {
        let set = sample_set();
        let mut filters = init_filter_state(&set);
        filters.price = (250_000.0, 500_000.0);
        filters.rooms = [3, 4].into_iter().collect();

        let idx: BTreeSet<usize> = filtered_indices(&set, &filters).into_iter().collect();
        for (i, l) in set.listings.iter().enumerate() {
            assert_eq!(idx.contains(&i), matches(l, &filters), "row {i}");
        }
    }

    #[test]
    fn excluding_everything_is_not_an_error() {
        let set = sample_set();
        let mut filters = init_filter_state(&set);
        filters.price = (1.0, 2.0);
        assert!(filtered_indices(&set, &filters).is_empty());
    }
}
