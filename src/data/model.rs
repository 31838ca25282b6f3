use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Seller – who is offering the property
// ---------------------------------------------------------------------------

/// Seller type of a listing. The source dataset uses the Spanish labels
/// `Particular` / `Agencia`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Seller {
    Individual,
    Agency,
}

impl Seller {
    /// Parse a CSV/JSON cell. Accepts the Spanish dataset labels and their
    /// English equivalents, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "particular" | "individual" => Some(Seller::Individual),
            "agencia" | "agency" => Some(Seller::Agency),
            _ => None,
        }
    }
}

impl fmt::Display for Seller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seller::Individual => write!(f, "Individual"),
            Seller::Agency => write!(f, "Agency"),
        }
    }
}

// ---------------------------------------------------------------------------
// Listing – one row of the dataset
// ---------------------------------------------------------------------------

/// A single property listing. Immutable after load.
#[derive(Debug, Clone)]
pub struct Listing {
    pub seller: Seller,
    /// Asking price in EUR.
    pub price: f64,
    pub rooms: u32,
    /// Living area in m².
    pub area: f64,
    /// Floor label as advertised ("Bajo", "3ª planta", ...).
    pub floor: String,
    pub has_garage: bool,
    pub has_elevator: bool,
    /// Neighborhood; missing in some rows of the source data.
    pub neighborhood: Option<String>,
    pub floor_number: Option<i32>,
    /// Price of the garage spot, when sold with one.
    pub garage_price: Option<f64>,
    /// Price including the garage spot. Always >= `price`.
    pub total_price: f64,
}

impl Listing {
    /// Price per square meter. A zero area is substituted by 1 m² so the
    /// ratio stays finite, matching the source dataset's convention.
    pub fn price_per_m2(&self) -> f64 {
        let area = if self.area > 0.0 { self.area } else { 1.0 };
        self.price / area
    }
}

// ---------------------------------------------------------------------------
// ListingSet – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter option bounds.
#[derive(Debug, Clone)]
pub struct ListingSet {
    /// All listings, in file order.
    pub listings: Vec<Listing>,
    /// (min, max) asking price over the whole set.
    pub price_bounds: (f64, f64),
    /// (min, max) area over the whole set.
    pub area_bounds: (f64, f64),
    /// Sorted unique room counts.
    pub room_options: BTreeSet<u32>,
    /// Sorted unique neighborhoods (rows without one are skipped).
    pub neighborhoods: BTreeSet<String>,
    /// Seller types present in the data.
    pub sellers: BTreeSet<Seller>,
}

impl ListingSet {
    /// Build the option bounds from the loaded listings.
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let mut price_bounds = (f64::INFINITY, f64::NEG_INFINITY);
        let mut area_bounds = (f64::INFINITY, f64::NEG_INFINITY);
        let mut room_options = BTreeSet::new();
        let mut neighborhoods = BTreeSet::new();
        let mut sellers = BTreeSet::new();

        for l in &listings {
            price_bounds.0 = price_bounds.0.min(l.price);
            price_bounds.1 = price_bounds.1.max(l.price);
            area_bounds.0 = area_bounds.0.min(l.area);
            area_bounds.1 = area_bounds.1.max(l.area);
            room_options.insert(l.rooms);
            if let Some(n) = &l.neighborhood {
                neighborhoods.insert(n.clone());
            }
            sellers.insert(l.seller);
        }

        if listings.is_empty() {
            price_bounds = (0.0, 0.0);
            area_bounds = (0.0, 0.0);
        }

        ListingSet {
            listings,
            price_bounds,
            area_bounds,
            room_options,
            neighborhoods,
            sellers,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal listing for tests; callers override what they care about.
    pub(crate) fn listing(price: f64, area: f64) -> Listing {
        Listing {
            seller: Seller::Agency,
            price,
            rooms: 2,
            area,
            floor: "1ª planta".to_string(),
            has_garage: false,
            has_elevator: true,
            neighborhood: Some("Centro".to_string()),
            floor_number: Some(1),
            garage_price: None,
            total_price: price,
        }
    }

    #[test]
    fn seller_parse_accepts_both_languages() {
        assert_eq!(Seller::parse("Particular"), Some(Seller::Individual));
        assert_eq!(Seller::parse("AGENCIA"), Some(Seller::Agency));
        assert_eq!(Seller::parse("agency"), Some(Seller::Agency));
        assert_eq!(Seller::parse("bank"), None);
    }

    #[test]
    fn price_per_m2_substitutes_zero_area() {
        assert_eq!(listing(300_000.0, 100.0).price_per_m2(), 3_000.0);
        assert_eq!(listing(300_000.0, 0.0).price_per_m2(), 300_000.0);
    }

    #[test]
    fn option_bounds_from_listings() {
        let mut a = listing(200_000.0, 80.0);
        a.rooms = 1;
        a.neighborhood = Some("Retiro".to_string());
        let b = listing(350_000.0, 120.0);
        let mut c = listing(150_000.0, 60.0);
        c.neighborhood = None;

        let set = ListingSet::from_listings(vec![a, b, c]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.price_bounds, (150_000.0, 350_000.0));
        assert_eq!(set.area_bounds, (60.0, 120.0));
        assert_eq!(set.room_options.iter().copied().collect::<Vec<_>>(), [1, 2]);
        // The row without a neighborhood contributes no option.
        assert_eq!(set.neighborhoods.len(), 2);
        assert!(set.sellers.contains(&Seller::Agency));
    }

    #[test]
    fn empty_set_has_zeroed_bounds() {
        let set = ListingSet::from_listings(Vec::new());
        assert!(set.is_empty());
        assert_eq!(set.price_bounds, (0.0, 0.0));
        assert_eq!(set.area_bounds, (0.0, 0.0));
    }
}
