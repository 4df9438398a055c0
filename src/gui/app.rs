#![forbid(unsafe_code)]

#[cfg(feature = "gui")]
use eframe::egui;

#[cfg(feature = "gui")]
use std::sync::mpsc;

#[cfg(feature = "gui")]
use crate::gui::form::MergeForm;

#[cfg(feature = "gui")]
use crate::gui::jobs::JobMsg;

#[cfg(feature = "gui")]
use crate::gui::tabs::Tab;

#[cfg(feature = "gui")]
pub struct WadMergeApp {
    pub tab: Tab,

    pub merge: MergeForm,
    pub inspect_path: String,

    pub inspect_kind: String,
    pub inspect_rows: Vec<(String, usize)>,
    pub inspect_err: Option<String>,

    pub logs: Vec<String>,
    pub status: String,
    pub busy: bool,

    pub rx: Option<mpsc::Receiver<JobMsg>>,
}

#[cfg(feature = "gui")]
impl Default for WadMergeApp {
    fn default() -> Self {
        Self {
            tab: Tab::Merge,
            merge: MergeForm::default(),
            inspect_path: "./merged.wad".into(),
            inspect_kind: String::new(),
            inspect_rows: Vec::new(),
            inspect_err: None,
            logs: vec!["wadmerge GUI ready.".into()],
            status: String::new(),
            busy: false,
            rx: None,
        }
    }
}

#[cfg(feature = "gui")]
impl WadMergeApp {
    pub fn push_log(&mut self, s: impl Into<String>) {
        let s = s.into();
        self.logs.push(s);
        if self.logs.len() > 5000 {
            let drain = self.logs.len().saturating_sub(5000);
            self.logs.drain(0..drain);
        }
    }

    pub fn poll_jobs(&mut self) {
        let rx = match self.rx.take() {
            Some(rx) => rx,
            None => return,
        };

        let mut done = false;

        while let Ok(msg) = rx.try_recv() {
            match msg {
                JobMsg::Log(s) => self.push_log(s),

                JobMsg::Done(r) => {
                    self.busy = false;
                    self.status = match r {
                        Ok(s) => s,
                        Err(e) => format!("Error: {e}"),
                    };
                    self.push_log(self.status.clone());
                    done = true;
                    break;
                }

                JobMsg::InspectDone(r) => {
                    self.busy = false;
                    match r {
                        Ok((kind, rows)) => {
                            self.status = format!("Loaded {} lumps ({kind}).", rows.len());
                            self.inspect_kind = kind;
                            self.inspect_rows = rows;
                            self.inspect_err = None;
                        }
                        Err(e) => {
                            self.inspect_rows.clear();
                            self.inspect_kind.clear();
                            self.inspect_err = Some(e.clone());
                            self.status = format!("Error: {e}");
                        }
                    }
                    self.push_log(self.status.clone());
                    done = true;
                    break;
                }
            }
        }

        if !done {
            self.rx = Some(rx);
        } else {
            self.rx = None;
        }
    }

    pub fn start_job(&mut self, f: impl FnOnce(mpsc::Sender<JobMsg>) + Send + 'static) {
        if self.busy {
            return;
        }
        let (tx, rx) = mpsc::channel();
        self.rx = Some(rx);
        self.busy = true;
        self.status = "Working...".into();
        std::thread::spawn(move || f(tx));
    }

    pub fn browse_open_wads() -> Vec<std::path::PathBuf> {
        rfd::FileDialog::new()
            .add_filter("WAD", &["wad"])
            .pick_files()
            .unwrap_or_default()
    }

    pub fn browse_save_wad(target: &mut String) {
        if let Some(p) = rfd::FileDialog::new()
            .add_filter("WAD", &["wad"])
            .save_file()
        {
            *target = p.to_string_lossy().to_string();
        }
    }

    pub fn browse_open_wad(target: &mut String) {
        if let Some(p) = rfd::FileDialog::new()
            .add_filter("WAD", &["wad"])
            .pick_file()
        {
            *target = p.to_string_lossy().to_string();
        }
    }
}

#[cfg(feature = "gui")]
impl eframe::App for WadMergeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_jobs();

        egui::TopBottomPanel::top("top").show(ctx, |ui| self.ui_topbar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.tab {
                Tab::Merge => self.ui_merge(ui),
                Tab::Inspect => self.ui_inspect(ui),
            }
            self.ui_logs(ui);
        });
    }
}
