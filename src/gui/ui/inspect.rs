#![forbid(unsafe_code)]

#[cfg(feature = "gui")]
use eframe::egui;

#[cfg(feature = "gui")]
use std::path::PathBuf;

#[cfg(feature = "gui")]
use crate::gui::{app::WadMergeApp, jobs::JobMsg};

#[cfg(feature = "gui")]
use crate::wad;

#[cfg(feature = "gui")]
impl WadMergeApp {
    pub fn ui_inspect(&mut self, ui: &mut egui::Ui) {
        ui.label("Inspect a WAD directory (lump names and sizes).");
        ui.add_space(6.0);

        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label("Wad");
                ui.text_edit_singleline(&mut self.inspect_path);
                if ui.button("Browse…").clicked() {
                    Self::browse_open_wad(&mut self.inspect_path);
                }
                if ui.add_enabled(!self.busy, egui::Button::new("Load")).clicked() {
                    let path = PathBuf::from(self.inspect_path.trim());
                    self.start_job(move |tx| {
                        let res = wad::read_wad(&path)
                            .map(|w| {
                                let rows = w
                                    .lumps
                                    .iter()
                                    .map(|l| (l.name.clone(), l.size()))
                                    .collect();
                                (w.kind.as_str().to_string(), rows)
                            })
                            .map_err(|e| e.to_string());
                        let _ = tx.send(JobMsg::InspectDone(res));
                    });
                }
            });

            if let Some(e) = &self.inspect_err {
                ui.colored_label(egui::Color32::LIGHT_RED, e);
            }

            ui.add_space(6.0);

            egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.monospace(format!(
                        "{} lumps{}",
                        self.inspect_rows.len(),
                        if self.inspect_kind.is_empty() {
                            String::new()
                        } else {
                            format!(" ({})", self.inspect_kind)
                        }
                    ));
                });
                ui.separator();

                for (name, size) in &self.inspect_rows {
                    ui.horizontal(|ui| {
                        ui.monospace(name);
                        ui.add_space(8.0);
                        ui.label(format!("{size} bytes"));
                    });
                }
            });
        });
    }
}
