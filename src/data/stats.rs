use std::collections::BTreeMap;

use super::model::{Listing, Seller};

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// Scalar summaries of a (possibly empty) listing subset. The means are
/// `None` on an empty subset so the UI can show a placeholder instead of
/// NaN; computing them never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub count: usize,
    pub mean_price: Option<f64>,
    /// Per-row price/area ratio, averaged afterward.
    pub mean_price_per_m2: Option<f64>,
    pub mean_area: Option<f64>,
}

pub fn metrics(rows: &[&Listing]) -> Metrics {
    Metrics {
        count: rows.len(),
        mean_price: mean(rows.iter().map(|l| l.price)),
        mean_price_per_m2: mean(rows.iter().map(|l| l.price_per_m2())),
        mean_area: mean(rows.iter().map(|l| l.area)),
    }
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Linear-interpolation quantile over unsorted input, `q` in [0, 1].
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Sample standard deviation (n − 1 denominator, as pandas `describe`).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values.iter().copied())?;
    let var: f64 =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// The eight `describe()` rows for one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

pub fn describe(values: &[f64]) -> Describe {
    Describe {
        count: values.len(),
        mean: mean(values.iter().copied()),
        std: std_dev(values),
        min: min(values),
        q25: quantile(values, 0.25),
        median: median(values),
        q75: quantile(values, 0.75),
        max: max(values),
    }
}

// ---------------------------------------------------------------------------
// Group-bys
// ---------------------------------------------------------------------------

/// Count rows per key.
pub fn counts_by<K: Ord>(rows: &[&Listing], key: impl Fn(&Listing) -> Option<K>) -> BTreeMap<K, usize> {
    let mut out = BTreeMap::new();
    for l in rows {
        if let Some(k) = key(l) {
            *out.entry(k).or_insert(0) += 1;
        }
    }
    out
}

/// Mean of `value` per key. Keys with no rows never appear.
pub fn mean_by<K: Ord>(
    rows: &[&Listing],
    key: impl Fn(&Listing) -> Option<K>,
    value: impl Fn(&Listing) -> f64,
) -> BTreeMap<K, f64> {
    let mut sums: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for l in rows {
        if let Some(k) = key(l) {
            let e = sums.entry(k).or_insert((0.0, 0));
            e.0 += value(l);
            e.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Largest `n` entries of a group-by result, descending by value.
/// Ties keep key order so repeated runs agree.
pub fn top_n<K: Ord + Clone, V: PartialOrd + Copy>(
    grouped: &BTreeMap<K, V>,
    n: usize,
) -> Vec<(K, V)> {
    let mut entries: Vec<(K, V)> = grouped.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    entries.truncate(n);
    entries
}

pub fn seller_count(rows: &[&Listing], seller: Seller) -> usize {
    rows.iter().filter(|l| l.seller == seller).count()
}

/// The `n` most expensive listings, descending by price.
pub fn most_expensive<'a>(rows: &[&'a Listing], n: usize) -> Vec<&'a Listing> {
    let mut sorted: Vec<&Listing> = rows.to_vec();
    sorted.sort_by(|a, b| b.price.total_cmp(&a.price));
    sorted.truncate(n);
    sorted
}

/// The `n` cheapest listings, ascending by price.
pub fn cheapest<'a>(rows: &[&'a Listing], n: usize) -> Vec<&'a Listing> {
    let mut sorted: Vec<&Listing> = rows.to_vec();
    sorted.sort_by(|a, b| a.price.total_cmp(&b.price));
    sorted.truncate(n);
    sorted
}

// ---------------------------------------------------------------------------
// Correlation & regression
// ---------------------------------------------------------------------------

/// Pearson correlation; `None` when fewer than two points or a degenerate
/// (zero-variance) column.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs.iter().copied())?;
    let my = mean(ys.iter().copied())?;
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        vx += (x - mx).powi(2);
        vy += (y - my).powi(2);
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx.sqrt() * vy.sqrt()))
}

pub const CORRELATION_COLUMNS: [&str; 4] = ["precio", "habitaciones", "metros", "numero_planta"];

/// Pairwise Pearson matrix over price, rooms, area and floor number.
/// Rows without a floor number are dropped, as the source dashboard does.
/// `None` when fewer than two complete rows remain.
pub fn correlation_matrix(rows: &[&Listing]) -> Option<Vec<Vec<f64>>> {
    let complete: Vec<&&Listing> = rows.iter().filter(|l| l.floor_number.is_some()).collect();
    if complete.len() < 2 {
        return None;
    }
    let columns: [Vec<f64>; 4] = [
        complete.iter().map(|l| l.price).collect(),
        complete.iter().map(|l| l.rooms as f64).collect(),
        complete.iter().map(|l| l.area).collect(),
        complete
            .iter()
            .map(|l| l.floor_number.unwrap_or(0) as f64)
            .collect(),
    ];
    let matrix = columns
        .iter()
        .map(|a| {
            columns
                .iter()
                .map(|b| pearson(a, b).unwrap_or(f64::NAN))
                .collect()
        })
        .collect();
    Some(matrix)
}

/// Least-squares line through `[x, y]` points → (slope, intercept).
/// `None` for fewer than two points or a vertical spread.
pub fn linear_fit(points: &[[f64; 2]]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let mx = mean(points.iter().map(|p| p[0]))?;
    let my = mean(points.iter().map(|p| p[1]))?;
    let mut cov = 0.0;
    let mut vx = 0.0;
    for p in points {
        cov += (p[0] - mx) * (p[1] - my);
        vx += (p[0] - mx).powi(2);
    }
    if vx == 0.0 {
        return None;
    }
    let slope = cov / vx;
    Some((slope, my - slope * mx))
}

// ---------------------------------------------------------------------------
// Binning
// ---------------------------------------------------------------------------

/// Fixed-width histogram: (bin center, count) pairs plus the bin width.
/// Empty input yields no bins.
pub fn histogram(values: &[f64], bins: usize) -> (Vec<(f64, usize)>, f64) {
    let (Some(lo), Some(hi)) = (min(values), max(values)) else {
        return (Vec::new(), 0.0);
    };
    if bins == 0 {
        return (Vec::new(), 0.0);
    }
    let span = hi - lo;
    if span == 0.0 {
        return (vec![(lo, values.len())], 1.0);
    }
    let width = span / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    let centers = counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| (lo + (i as f64 + 0.5) * width, c))
        .collect();
    (centers, width)
}

/// Five-number summary for box plots.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    Some(BoxStats {
        min: min(values)?,
        q1: quantile(values, 0.25)?,
        median: median(values)?,
        q3: quantile(values, 0.75)?,
        max: max(values)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;

    #[test]
    fn metrics_on_spec_scenario() {
        let a = listing(200_000.0, 80.0);
        let b = listing(300_000.0, 100.0);
        let m = metrics(&[&b]);
        assert_eq!(m.count, 1);
        assert_eq!(m.mean_price, Some(300_000.0));
        assert_eq!(m.mean_area, Some(100.0));
        assert_eq!(m.mean_price_per_m2, Some(3_000.0));

        let both = metrics(&[&a, &b]);
        assert_eq!(both.count, 2);
        assert_eq!(both.mean_price, Some(250_000.0));
        // Per-row ratios averaged: (2500 + 3000) / 2.
        assert_eq!(both.mean_price_per_m2, Some(2_750.0));
    }

    #[test]
    fn empty_subset_yields_placeholders_not_errors() {
        let m = metrics(&[]);
        assert_eq!(m.count, 0);
        assert_eq!(m.mean_price, None);
        assert_eq!(m.mean_price_per_m2, None);
        assert_eq!(m.mean_area, None);
    }

    #[test]
    fn metrics_are_deterministic() {
        let a = listing(199_999.0, 77.7);
        let b = listing(345_678.0, 101.3);
        let rows = [&a, &b];
        assert_eq!(metrics(&rows), metrics(&rows));
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let vals = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(median(&vals), Some(2.5));
        assert_eq!(quantile(&vals, 0.25), Some(1.75));
        assert_eq!(quantile(&vals, 0.0), Some(1.0));
        assert_eq!(quantile(&vals, 1.0), Some(4.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn sample_std_matches_hand_computation() {
        // Variance of [2, 4, 4, 4, 5, 5, 7, 9] with ddof=1 is 32/7.
        let vals = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let s = std_dev(&vals).unwrap();
        assert!((s - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(std_dev(&[1.0]), None);
    }

    #[test]
    fn group_by_counts_and_means() {
        let mut a = listing(200_000.0, 80.0);
        a.rooms = 2;
        let mut b = listing(300_000.0, 100.0);
        b.rooms = 3;
        let mut c = listing(400_000.0, 120.0);
        c.rooms = 3;
        let rows = [&a, &b, &c];

        let counts = counts_by(&rows, |l| Some(l.rooms));
        assert_eq!(counts[&2], 1);
        assert_eq!(counts[&3], 2);

        let means = mean_by(&rows, |l| Some(l.rooms), |l| l.price);
        assert_eq!(means[&3], 350_000.0);
    }

    #[test]
    fn top_n_sorts_descending() {
        let grouped: BTreeMap<&str, f64> =
            [("Centro", 3.0), ("Retiro", 9.0), ("Usera", 5.0)].into();
        let top = top_n(&grouped, 2);
        assert_eq!(top, vec![("Retiro", 9.0), ("Usera", 5.0)]);
    }

    #[test]
    fn pearson_known_values() {
        let xs = [1.0, 2.0, 3.0];
        assert!((pearson(&xs, &[2.0, 4.0, 6.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &[3.0, 2.0, 1.0]).unwrap() + 1.0).abs() < 1e-12);
        // Degenerate column.
        assert_eq!(pearson(&xs, &[5.0, 5.0, 5.0]), None);
    }

    #[test]
    fn correlation_matrix_drops_incomplete_rows() {
        let mut a = listing(200_000.0, 80.0);
        a.floor_number = None;
        let b = listing(300_000.0, 100.0);
        // Only one complete row left.
        assert!(correlation_matrix(&[&a, &b]).is_none());

        let c = listing(400_000.0, 120.0);
        let m = correlation_matrix(&[&a, &b, &c]).unwrap();
        assert_eq!(m.len(), CORRELATION_COLUMNS.len());
        assert!((m[0][0] - 1.0).abs() < 1e-12);
        // price vs area over the two complete rows is perfectly correlated.
        assert!((m[0][2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn linear_fit_recovers_line() {
        let pts = [[0.0, 1.0], [1.0, 3.0], [2.0, 5.0]];
        let (slope, intercept) = linear_fit(&pts).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
        assert_eq!(linear_fit(&[[1.0, 2.0]]), None);
    }

    #[test]
    fn histogram_bins_cover_range() {
        let vals = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 9.9, 10.0];
        let (bins, width) = histogram(&vals, 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(width, 2.0);
        assert_eq!(bins.iter().map(|(_, c)| c).sum::<usize>(), vals.len());
        // Max value lands in the last bin, not out of range.
        assert_eq!(bins[4].1, 2);

        assert!(histogram(&[], 25).0.is_empty());
    }

    #[test]
    fn box_stats_five_numbers() {
        let b = box_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(b.min, 1.0);
        assert_eq!(b.median, 3.0);
        assert_eq!(b.max, 5.0);
        assert_eq!(box_stats(&[]), None);
    }
}
