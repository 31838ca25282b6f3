use eframe::egui;
use std::path::PathBuf;

use crate::data::model::ListingSet;
use crate::state::{AppState, Tab};
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(dataset: ListingSet, source_path: PathBuf) -> Self {
        Self {
            state: AppState::new(dataset, source_path),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics + tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            {
                let rows = self.state.visible_listings();
                tabs::metrics_row(ui, &rows);
            }
            ui.separator();

            let mut active = self.state.active_tab;
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut active, tab, tab.label());
                }
            });
            self.state.active_tab = active;
            ui.separator();

            let rows = self.state.visible_listings();
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match active {
                    Tab::Overview => tabs::overview(ui, &rows),
                    Tab::Analysis => tabs::analysis(ui, &rows),
                    Tab::Details => tabs::details(ui, &rows),
                    Tab::Data => tabs::data(ui, &rows),
                    Tab::Conclusions => tabs::conclusions(ui, &rows),
                });
        });
    }
}
