use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{self, CategoryPalette};
use crate::data::model::{Listing, Seller};
use crate::data::stats::{self, Describe};
use crate::ui::charts;

const HIST_BINS: usize = 25;
const TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Metrics row
// ---------------------------------------------------------------------------

/// Headline metrics above the tabs: count, mean price, mean €/m², mean
/// area, and the per-seller counts. Empty subsets show placeholders.
pub fn metrics_row(ui: &mut Ui, rows: &[&Listing]) {
    let m = stats::metrics(rows);
    let individuals = stats::seller_count(rows, Seller::Individual);
    let agencies = stats::seller_count(rows, Seller::Agency);

    ui.columns(6, |cols| {
        metric(&mut cols[0], "Listings", fmt_count(m.count));
        metric(&mut cols[1], "Mean price", fmt_opt(m.mean_price, fmt_eur));
        metric(&mut cols[2], "Mean €/m²", fmt_opt(m.mean_price_per_m2, fmt_eur));
        metric(&mut cols[3], "Mean area", fmt_opt(m.mean_area, fmt_m2));
        metric(&mut cols[4], "Individuals", fmt_count(individuals));
        metric(&mut cols[5], "Agencies", fmt_count(agencies));
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical_centered(|ui| {
        ui.small(label);
        ui.strong(value);
    });
}

// ---------------------------------------------------------------------------
// Overview tab
// ---------------------------------------------------------------------------

/// Distributions: price and area histograms, price-by-rooms box plot,
/// room/seller breakdowns.
pub fn overview(ui: &mut Ui, rows: &[&Listing]) {
    if empty_notice(ui, rows) {
        return;
    }
    let prices: Vec<f64> = rows.iter().map(|l| l.price).collect();
    let areas: Vec<f64> = rows.iter().map(|l| l.area).collect();

    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Price distribution");
        charts::histogram(&mut cols[0], "price_hist", &prices, HIST_BINS, color::PRIMARY, "price (€)");
        chart_title(&mut cols[1], "Area distribution");
        charts::histogram(&mut cols[1], "area_hist", &areas, HIST_BINS, color::SECONDARY, "area (m²)");
    });

    let room_counts = stats::counts_by(rows, |l| Some(l.rooms));
    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Price by rooms");
        let boxes: Vec<(String, stats::BoxStats)> = room_counts
            .keys()
            .filter_map(|&r| {
                let prices: Vec<f64> = rows
                    .iter()
                    .filter(|l| l.rooms == r)
                    .map(|l| l.price)
                    .collect();
                stats::box_stats(&prices).map(|b| (r.to_string(), b))
            })
            .collect();
        charts::box_plot(&mut cols[0], "price_by_rooms_box", &boxes, "price (€)");

        chart_title(&mut cols[1], "Listings by rooms");
        let entries: Vec<(String, f64)> = room_counts
            .iter()
            .map(|(r, c)| (r.to_string(), *c as f64))
            .collect();
        charts::bar_chart(&mut cols[1], "rooms_count", &entries, color::ACCENT, "count");
    });

    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Individuals vs agencies");
        let seller_counts = stats::counts_by(rows, |l| Some(l.seller));
        let entries: Vec<(String, f64)> = seller_counts
            .iter()
            .map(|(s, c)| (s.to_string(), *c as f64))
            .collect();
        charts::bar_chart(&mut cols[0], "seller_count", &entries, color::PRIMARY, "count");

        chart_title(&mut cols[1], "Mean price by seller");
        let seller_price = stats::mean_by(rows, |l| Some(l.seller), |l| l.price);
        let entries: Vec<(String, f64)> = seller_price
            .iter()
            .map(|(s, p)| (s.to_string(), *p))
            .collect();
        charts::bar_chart(&mut cols[1], "seller_price", &entries, color::SECONDARY, "price (€)");
    });
}

// ---------------------------------------------------------------------------
// Analysis tab
// ---------------------------------------------------------------------------

/// Correlations, the price-vs-area scatter with its trend line, and the
/// per-room price breakdowns.
pub fn analysis(ui: &mut Ui, rows: &[&Listing]) {
    if empty_notice(ui, rows) {
        return;
    }

    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Correlation matrix");
        match stats::correlation_matrix(rows) {
            Some(matrix) => {
                charts::correlation_heatmap(&mut cols[0], &stats::CORRELATION_COLUMNS, &matrix)
            }
            None => {
                cols[0].label("Not enough complete rows for correlations.");
            }
        }

        chart_title(&mut cols[1], "Price vs area");
        let room_keys: Vec<u32> = stats::counts_by(rows, |l| Some(l.rooms))
            .keys()
            .copied()
            .collect();
        let palette = CategoryPalette::new(room_keys.iter().map(|r| format!("{r} rooms")));
        let groups: Vec<(String, egui::Color32, Vec<[f64; 2]>)> = room_keys
            .iter()
            .map(|&rooms| {
                let label = format!("{rooms} rooms");
                let pts: Vec<[f64; 2]> = rows
                    .iter()
                    .filter(|l| l.rooms == rooms && l.area > 0.0)
                    .map(|l| [l.area, l.price])
                    .collect();
                let color = palette.color_for(&label);
                (label, color, pts)
            })
            .collect();
        charts::scatter_with_trend(&mut cols[1], "price_vs_area", &groups, "area (m²)", "price (€)");
    });

    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Mean price by rooms");
        let by_rooms = stats::mean_by(rows, |l| Some(l.rooms), |l| l.price);
        let entries: Vec<(String, f64)> =
            by_rooms.iter().map(|(r, p)| (r.to_string(), *p)).collect();
        charts::bar_chart(&mut cols[0], "price_by_rooms", &entries, color::PRIMARY, "price (€)");

        chart_title(&mut cols[1], "Mean €/m² by rooms");
        let by_rooms_m2 = stats::mean_by(rows, |l| Some(l.rooms), |l| l.price_per_m2());
        let entries: Vec<(String, f64)> = by_rooms_m2
            .iter()
            .map(|(r, p)| (r.to_string(), *p))
            .collect();
        charts::bar_chart(&mut cols[1], "price_m2_by_rooms", &entries, color::SECONDARY, "€/m²");
    });
}

// ---------------------------------------------------------------------------
// Details tab
// ---------------------------------------------------------------------------

/// Per-neighborhood and per-floor breakdowns.
pub fn details(ui: &mut Ui, rows: &[&Listing]) {
    if empty_notice(ui, rows) {
        return;
    }

    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Listings by neighborhood (top 10)");
        let counts = stats::counts_by(rows, |l| l.neighborhood.clone());
        let entries: Vec<(String, f64)> = stats::top_n(&counts, TOP_N)
            .into_iter()
            .map(|(n, c)| (n, c as f64))
            .collect();
        charts::horizontal_bar_chart(&mut cols[0], "hood_count", &entries, color::PRIMARY, "count");

        chart_title(&mut cols[1], "Elevator");
        let elevator = stats::counts_by(rows, |l| Some(l.has_elevator));
        let entries: Vec<(String, f64)> = elevator
            .iter()
            .map(|(has, c)| {
                let label = if *has { "With elevator" } else { "Without elevator" };
                (label.to_string(), *c as f64)
            })
            .collect();
        charts::bar_chart(&mut cols[1], "elevator_count", &entries, color::ACCENT, "count");
    });

    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Mean price by neighborhood (top 10)");
        let price_by_hood = stats::mean_by(rows, |l| l.neighborhood.clone(), |l| l.price);
        let entries = stats::top_n(&price_by_hood, TOP_N);
        charts::horizontal_bar_chart(&mut cols[0], "hood_price", &entries, color::PRIMARY, "price (€)");

        chart_title(&mut cols[1], "Price vs floor number");
        let pts: Vec<[f64; 2]> = rows
            .iter()
            .filter_map(|l| l.floor_number.map(|f| [f as f64, l.price]))
            .collect();
        let groups = [("listings".to_string(), color::PRIMARY, pts)];
        charts::scatter_with_trend(&mut cols[1], "price_vs_floor", &groups, "floor", "price (€)");
    });

    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Mean €/m² by neighborhood (top 10)");
        let m2_by_hood = stats::mean_by(rows, |l| l.neighborhood.clone(), |l| l.price_per_m2());
        let entries = stats::top_n(&m2_by_hood, TOP_N);
        charts::horizontal_bar_chart(&mut cols[0], "hood_m2", &entries, color::SECONDARY, "€/m²");

        chart_title(&mut cols[1], "Floor type (top 10)");
        let floors = stats::counts_by(rows, |l| {
            if l.floor.is_empty() {
                None
            } else {
                Some(l.floor.clone())
            }
        });
        let entries: Vec<(String, f64)> = stats::top_n(&floors, TOP_N)
            .into_iter()
            .map(|(f, c)| (f, c as f64))
            .collect();
        charts::horizontal_bar_chart(&mut cols[1], "floor_count", &entries, color::PRIMARY, "count");
    });
}

// ---------------------------------------------------------------------------
// Data tab
// ---------------------------------------------------------------------------

/// The raw filtered rows plus descriptive statistics and the top-10
/// most/least expensive listings.
pub fn data(ui: &mut Ui, rows: &[&Listing]) {
    if empty_notice(ui, rows) {
        return;
    }

    ui.strong("Filtered listings");
    ui.add_space(4.0);
    listing_table(ui, rows);

    ui.separator();
    ui.columns(2, |cols| {
        cols[0].strong("Descriptive statistics");
        describe_grid(&mut cols[0], rows);
        cols[1].strong("Variable summary");
        summary_grid(&mut cols[1], rows);
    });

    ui.separator();
    ui.columns(2, |cols| {
        cols[0].strong("Top 10 most expensive");
        top_listings_grid(&mut cols[0], "top_expensive", &stats::most_expensive(rows, TOP_N));
        cols[1].strong("Top 10 cheapest");
        top_listings_grid(&mut cols[1], "top_cheap", &stats::cheapest(rows, TOP_N));
    });
}

fn listing_table(ui: &mut Ui, rows: &[&Listing]) {
    TableBuilder::new(ui)
        .striped(true)
        .min_scrolled_height(160.0)
        .max_scroll_height(320.0)
        .columns(Column::auto().at_least(70.0), 10)
        .header(20.0, |mut header| {
            for title in [
                "Price", "Area", "Rooms", "Floor", "Neighborhood", "Seller", "Elevator",
                "Garage", "Garage €", "Total",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let l = rows[row.index()];
                row.col(|ui| {
                    ui.label(fmt_eur(l.price));
                });
                row.col(|ui| {
                    ui.label(fmt_m2(l.area));
                });
                row.col(|ui| {
                    ui.label(l.rooms.to_string());
                });
                row.col(|ui| {
                    ui.label(&l.floor);
                });
                row.col(|ui| {
                    ui.label(l.neighborhood.as_deref().unwrap_or("—"));
                });
                row.col(|ui| {
                    ui.label(l.seller.to_string());
                });
                row.col(|ui| {
                    ui.label(yes_no(l.has_elevator));
                });
                row.col(|ui| {
                    ui.label(yes_no(l.has_garage));
                });
                row.col(|ui| {
                    ui.label(fmt_opt(l.garage_price, fmt_eur));
                });
                row.col(|ui| {
                    ui.label(fmt_eur(l.total_price));
                });
            });
        });
}

fn describe_grid(ui: &mut Ui, rows: &[&Listing]) {
    let price = stats::describe(&rows.iter().map(|l| l.price).collect::<Vec<_>>());
    let rooms = stats::describe(&rows.iter().map(|l| l.rooms as f64).collect::<Vec<_>>());
    let area = stats::describe(&rows.iter().map(|l| l.area).collect::<Vec<_>>());

    let row_of = |d: &Describe| {
        [
            fmt_count(d.count),
            fmt_opt(d.mean, fmt_num),
            fmt_opt(d.std, fmt_num),
            fmt_opt(d.min, fmt_num),
            fmt_opt(d.q25, fmt_num),
            fmt_opt(d.median, fmt_num),
            fmt_opt(d.q75, fmt_num),
            fmt_opt(d.max, fmt_num),
        ]
    };
    let stats_rows = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
    let price_col = row_of(&price);
    let rooms_col = row_of(&rooms);
    let area_col = row_of(&area);

    egui::Grid::new("describe_grid").striped(true).show(ui, |ui| {
        ui.label("");
        ui.strong("price");
        ui.strong("rooms");
        ui.strong("area");
        ui.end_row();
        for (i, name) in stats_rows.iter().enumerate() {
            ui.strong(*name);
            ui.label(&price_col[i]);
            ui.label(&rooms_col[i]);
            ui.label(&area_col[i]);
            ui.end_row();
        }
    });
}

fn summary_grid(ui: &mut Ui, rows: &[&Listing]) {
    let prices: Vec<f64> = rows.iter().map(|l| l.price).collect();
    let areas: Vec<f64> = rows.iter().map(|l| l.area).collect();
    let rooms: Vec<f64> = rows.iter().map(|l| l.rooms as f64).collect();

    egui::Grid::new("summary_grid").striped(true).show(ui, |ui| {
        for title in ["Variable", "Min", "Max", "Mean", "Median"] {
            ui.strong(title);
        }
        ui.end_row();

        for (name, values, fmt) in [
            ("Price", &prices, fmt_eur as fn(f64) -> String),
            ("Area", &areas, fmt_m2),
            ("Rooms", &rooms, fmt_num),
        ] {
            ui.label(name);
            ui.label(fmt_opt(stats::min(values), fmt));
            ui.label(fmt_opt(stats::max(values), fmt));
            ui.label(fmt_opt(stats::mean(values.iter().copied()), fmt));
            ui.label(fmt_opt(stats::median(values), fmt));
            ui.end_row();
        }
    });
}

fn top_listings_grid(ui: &mut Ui, id: &str, listings: &[&Listing]) {
    egui::Grid::new(id).striped(true).show(ui, |ui| {
        for title in ["Price", "Area", "Rooms", "Neighborhood", "Seller"] {
            ui.strong(title);
        }
        ui.end_row();
        for l in listings {
            ui.label(fmt_eur(l.price));
            ui.label(fmt_m2(l.area));
            ui.label(l.rooms.to_string());
            ui.label(l.neighborhood.as_deref().unwrap_or("—"));
            ui.label(l.seller.to_string());
            ui.end_row();
        }
    });
}

// ---------------------------------------------------------------------------
// Conclusions tab
// ---------------------------------------------------------------------------

/// Narrative summary of the filtered subset, following the source
/// dashboard's findings section.
pub fn conclusions(ui: &mut Ui, rows: &[&Listing]) {
    if empty_notice(ui, rows) {
        return;
    }

    let prices: Vec<f64> = rows.iter().map(|l| l.price).collect();
    let areas: Vec<f64> = rows.iter().map(|l| l.area).collect();
    let m = stats::metrics(rows);

    let seller_counts = stats::counts_by(rows, |l| Some(l.seller));
    let price_by_seller = stats::mean_by(rows, |l| Some(l.seller), |l| l.price);
    let m2_by_seller = stats::mean_by(rows, |l| Some(l.seller), |l| l.price_per_m2());
    let count_of = |s: Seller| seller_counts.get(&s).copied().unwrap_or(0);
    let share = |s: Seller| 100.0 * count_of(s) as f64 / rows.len() as f64;

    ui.heading("Exploratory analysis conclusions");
    ui.add_space(6.0);

    ui.columns(2, |cols| {
        let ui = &mut cols[0];
        ui.strong("Prices");
        ui.label(format!("Mean price: {}", fmt_opt(m.mean_price, fmt_eur)));
        ui.label(format!("Median price: {}", fmt_opt(stats::median(&prices), fmt_eur)));
        ui.label(format!(
            "Price range: {} – {}",
            fmt_opt(stats::min(&prices), fmt_eur),
            fmt_opt(stats::max(&prices), fmt_eur)
        ));
        ui.label(format!("Mean €/m²: {}", fmt_opt(m.mean_price_per_m2, fmt_eur)));
        ui.add_space(8.0);
        ui.strong("Area");
        ui.label(format!("Mean area: {}", fmt_opt(m.mean_area, fmt_m2)));
        ui.label(format!("Median area: {}", fmt_opt(stats::median(&areas), fmt_m2)));

        let ui = &mut cols[1];
        ui.strong("Individuals vs agencies");
        ui.label(format!(
            "Individuals: {} ({:.1}%)",
            count_of(Seller::Individual),
            share(Seller::Individual)
        ));
        ui.label(format!(
            "Agencies: {} ({:.1}%)",
            count_of(Seller::Agency),
            share(Seller::Agency)
        ));
        ui.add_space(8.0);
        ui.strong("Mean price by seller");
        for s in [Seller::Individual, Seller::Agency] {
            ui.label(format!(
                "{s}: {}",
                fmt_opt(price_by_seller.get(&s).copied(), fmt_eur)
            ));
        }
        ui.add_space(8.0);
        ui.strong("Mean €/m² by seller");
        for s in [Seller::Individual, Seller::Agency] {
            ui.label(format!(
                "{s}: {}",
                fmt_opt(m2_by_seller.get(&s).copied(), fmt_eur)
            ));
        }
    });

    ui.separator();
    ui.strong("Key findings");

    let agency_price = price_by_seller.get(&Seller::Agency).copied().unwrap_or(0.0);
    let individual_price = price_by_seller
        .get(&Seller::Individual)
        .copied()
        .unwrap_or(0.0);
    let diff = agency_price - individual_price;
    let direction = if diff >= 0.0 { "higher" } else { "lower" };
    ui.label(format!(
        "1. Agency listings have a {} mean price than individual listings ({} difference).",
        direction,
        fmt_eur(diff.abs())
    ));

    let agency_m2 = m2_by_seller.get(&Seller::Agency).copied().unwrap_or(0.0);
    let individual_m2 = m2_by_seller.get(&Seller::Individual).copied().unwrap_or(0.0);
    let m2_side = if agency_m2 >= individual_m2 {
        "agencies"
    } else {
        "individuals"
    };
    ui.label(format!(
        "2. Price per m² is higher for {} ({} vs {}).",
        m2_side,
        fmt_eur(agency_m2.max(individual_m2)),
        fmt_eur(agency_m2.min(individual_m2))
    ));

    let majority = if count_of(Seller::Agency) >= count_of(Seller::Individual) {
        "agencies"
    } else {
        "individuals"
    };
    ui.label(format!(
        "3. Most listings in the current selection come from {majority}."
    ));

    ui.add_space(8.0);
    ui.strong("Recommendations");
    ui.label("• Buyers: individual listings tend to offer better prices.");
    ui.label("• Individual sellers: study agency pricing to stay competitive.");
    ui.label("• Investors: areas with a lower €/m² may offer better yield.");

    ui.separator();
    ui.strong("Room distribution");
    let room_counts = stats::counts_by(rows, |l| Some(l.rooms));
    let entries: Vec<(String, f64)> = room_counts
        .iter()
        .map(|(r, c)| (r.to_string(), *c as f64))
        .collect();
    charts::bar_chart(ui, "conclusions_rooms", &entries, color::PRIMARY, "count");
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Shared "no data" notice; returns true when the subset is empty so the
/// caller can skip its charts.
fn empty_notice(ui: &mut Ui, rows: &[&Listing]) -> bool {
    if rows.is_empty() {
        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.heading("No listings match the current filters");
            ui.label("Widen the ranges or re-select options in the sidebar.");
        });
        return true;
    }
    false
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.strong(title);
}

fn yes_no(v: bool) -> &'static str {
    if v {
        "yes"
    } else {
        "no"
    }
}

fn fmt_opt(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| "—".to_string())
}

fn fmt_count(n: usize) -> String {
    thousands(n as i64)
}

/// "€1,234,567" (rounded to whole euros).
fn fmt_eur(v: f64) -> String {
    format!("€{}", thousands(v.round() as i64))
}

/// "85 m²" (rounded).
fn fmt_m2(v: f64) -> String {
    format!("{} m²", thousands(v.round() as i64))
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        thousands(v as i64)
    } else {
        format!("{v:.2}")
    }
}

fn thousands(n: i64) -> String {
    let negative = n < 0;
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negative {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
        assert_eq!(thousands(-45_000), "-45,000");
    }

    #[test]
    fn formatting_placeholders() {
        assert_eq!(fmt_opt(None, fmt_eur), "—");
        assert_eq!(fmt_opt(Some(300_000.0), fmt_eur), "€300,000");
        assert_eq!(fmt_m2(85.4), "85 m²");
        assert_eq!(fmt_num(2.5), "2.50");
    }
}
