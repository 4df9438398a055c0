#![forbid(unsafe_code)]

#[cfg(feature = "gui")]
mod app;
#[cfg(feature = "gui")]
mod form;
#[cfg(feature = "gui")]
mod jobs;
#[cfg(feature = "gui")]
mod tabs;
#[cfg(feature = "gui")]
mod ui;

#[cfg(feature = "gui")]
use crate::wad;

#[cfg(feature = "gui")]
pub fn run() -> wad::WadResult<()> {
    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "wadmerge",
        native_options,
        Box::new(|_cc| Box::new(app::WadMergeApp::default())),
    )
    .map_err(|e| {
        wad::WadError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("eframe: {e}"),
        ))
    })
}
