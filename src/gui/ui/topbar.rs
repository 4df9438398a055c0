#![forbid(unsafe_code)]

#[cfg(feature = "gui")]
use eframe::egui;

#[cfg(feature = "gui")]
use crate::gui::{app::WadMergeApp, tabs::Tab};

#[cfg(feature = "gui")]
impl WadMergeApp {
    pub fn ui_topbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("wadmerge");
            ui.separator();
            ui.label("WAD batch merger");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Clear log").clicked() {
                    self.logs.clear();
                }
                ui.separator();
                ui.label(&self.status);
            });
        });
        ui.separator();

        ui.horizontal(|ui| {
            let merge = ui.selectable_label(matches!(self.tab, Tab::Merge), "Merge");
            let inspect = ui.selectable_label(matches!(self.tab, Tab::Inspect), "Inspect");

            if merge.clicked() {
                self.tab = Tab::Merge;
            }
            if inspect.clicked() {
                self.tab = Tab::Inspect;
            }

            ui.add_space(12.0);

            if self.busy {
                ui.label("Running…");
                ui.add(egui::Spinner::new());
            }
        });
        ui.separator();
    }
}
