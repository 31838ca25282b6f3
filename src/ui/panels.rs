use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(4.0);
    ui.heading("Filters");
    ui.separator();

    if ui.button("Reset filters").clicked() {
        state.reset_filters();
    }
    ui.label(format!("{} matching listings", state.visible_indices.len()));
    ui.separator();

    let price_bounds = state.dataset.price_bounds;
    let area_bounds = state.dataset.area_bounds;
    let room_options = state.dataset.room_options.clone();
    let neighborhood_options = state.dataset.neighborhoods.clone();
    let seller_options = state.dataset.sellers.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Price range ----
            ui.strong("Price (€)");
            ui.add(
                Slider::new(&mut state.filters.price.0, price_bounds.0..=price_bounds.1)
                    .text("min"),
            );
            ui.add(
                Slider::new(&mut state.filters.price.1, price_bounds.0..=price_bounds.1)
                    .text("max"),
            );
            if state.filters.price.0 > state.filters.price.1 {
                state.filters.price.1 = state.filters.price.0;
            }
            ui.separator();

            // ---- Area range ----
            ui.strong("Area (m²)");
            ui.add(
                Slider::new(&mut state.filters.area.0, area_bounds.0..=area_bounds.1).text("min"),
            );
            ui.add(
                Slider::new(&mut state.filters.area.1, area_bounds.0..=area_bounds.1).text("max"),
            );
            if state.filters.area.0 > state.filters.area.1 {
                state.filters.area.1 = state.filters.area.0;
            }
            ui.separator();

            // ---- Rooms ----
            checkbox_group(
                ui,
                "Rooms",
                room_options.iter(),
                |v| v.to_string(),
                &mut state.filters.rooms,
            );

            // ---- Neighborhood ----
            checkbox_group(
                ui,
                "Neighborhood",
                neighborhood_options.iter(),
                |v| v.clone(),
                &mut state.filters.neighborhoods,
            );

            // ---- Seller ----
            checkbox_group(
                ui,
                "Seller",
                seller_options.iter(),
                |v| v.to_string(),
                &mut state.filters.sellers,
            );
        });

    // Recompute visible indices after any widget changes.
    state.refilter();
}

/// A collapsible group of checkboxes over a categorical filter, with
/// All / None shortcuts. The header shows selected/total counts.
fn checkbox_group<'a, T>(
    ui: &mut Ui,
    title: &str,
    options: impl Iterator<Item = &'a T> + Clone,
    label: impl Fn(&T) -> String,
    selected: &mut std::collections::BTreeSet<T>,
) where
    T: Ord + Clone + 'a,
{
    let n_total = options.clone().count();
    let n_selected = selected.len();
    let header_text = format!("{title}  ({n_selected}/{n_total})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    selected.extend(options.clone().cloned());
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                }
            });

            for value in options {
                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, label(value)).changed() {
                    if checked {
                        selected.insert(value.clone());
                    } else {
                        selected.remove(value);
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} listings loaded, {} match filters",
            state.dataset.len(),
            state.visible_indices.len()
        ));

        ui.separator();
        ui.label(state.source_path.display().to_string());

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open listings data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} listings, {} neighborhoods",
                    dataset.len(),
                    dataset.neighborhoods.len()
                );
                state.replace_dataset(dataset, path);
            }
            Err(e) => {
                // Keep the current dataset; surface the failure in the bar.
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
