#![forbid(unsafe_code)]

#[cfg(feature = "gui")]
use eframe::egui;

#[cfg(feature = "gui")]
use crate::gui::{app::WadMergeApp, jobs::JobMsg};

#[cfg(feature = "gui")]
use crate::wad;

#[cfg(feature = "gui")]
impl WadMergeApp {
    pub fn ui_merge(&mut self, ui: &mut egui::Ui) {
        ui.label("Merge WAD archives, top to bottom; later archives win conflicts.");
        ui.add_space(6.0);

        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.label("Inputs");
                ui.label("one path per line");
                if ui.button("Add…").clicked() {
                    for p in Self::browse_open_wads() {
                        self.merge.add_input(&p);
                    }
                }
            });
            ui.add(
                egui::TextEdit::multiline(&mut self.merge.inputs_text)
                    .desired_rows(5)
                    .desired_width(f32::INFINITY)
                    .font(egui::TextStyle::Monospace),
            );

            ui.horizontal(|ui| {
                ui.label("Output");
                ui.text_edit_singleline(&mut self.merge.output);
                if ui.button("Browse…").clicked() {
                    Self::browse_save_wad(&mut self.merge.output);
                }
            });

            ui.horizontal(|ui| {
                ui.label("Report");
                ui.text_edit_singleline(&mut self.merge.report);
                ui.label("duplicate log, optional");
            });

            ui.horizontal(|ui| {
                ui.checkbox(&mut self.merge.filter_patches, "filter patches");
                ui.checkbox(&mut self.merge.merge_text, "merge text lumps");
            });
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.merge.sort_ns, "sort namespaces");
                ui.checkbox(&mut self.merge.sort_maps, "sort maps");
                ui.checkbox(&mut self.merge.sort_text, "sort text");
                ui.checkbox(&mut self.merge.sort_textures, "sort textures");
                ui.checkbox(&mut self.merge.sort_loose, "sort loose");
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let can_run = !self.busy;
                if ui.add_enabled(can_run, egui::Button::new("Merge")).clicked() {
                    match self.merge.to_args() {
                        Ok((inputs, opts)) => {
                            self.push_log(format!(
                                "Merge: {} inputs -> '{}'",
                                inputs.len(),
                                opts.output.display()
                            ));

                            self.start_job(move |tx| {
                                let _ = tx.send(JobMsg::Log("Merging…".into()));
                                let res = match wad::merge(&inputs, &opts) {
                                    Ok(summary) => {
                                        for rec in summary.log.records() {
                                            let _ = tx.send(JobMsg::Log(format!(
                                                "{} {}: {} <- {}",
                                                rec.kind.as_str(),
                                                rec.label,
                                                rec.old,
                                                rec.new
                                            )));
                                        }
                                        Ok(format!(
                                            "Wrote {} ({} lumps, {} duplicates).",
                                            opts.output.display(),
                                            summary.lumps_written,
                                            summary.log.len()
                                        ))
                                    }
                                    Err(e) => Err(e.to_string()),
                                };
                                let _ = tx.send(JobMsg::Done(res));
                            });
                        }
                        Err(e) => {
                            self.status = format!("Error: {e}");
                            self.push_log(self.status.clone());
                        }
                    }
                }
            });
        });
    }
}
