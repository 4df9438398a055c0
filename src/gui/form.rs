#![forbid(unsafe_code)]

#[cfg(feature = "gui")]
use std::path::PathBuf;

#[cfg(feature = "gui")]
use crate::wad::MergeOptions;

#[cfg(feature = "gui")]
#[derive(Clone)]
pub struct MergeForm {
    /// One input archive per line, merged top to bottom.
    pub inputs_text: String,
    pub output: String,
    pub report: String,
    pub filter_patches: bool,
    pub merge_text: bool,
    pub sort_ns: bool,
    pub sort_maps: bool,
    pub sort_textures: bool,
    pub sort_text: bool,
    pub sort_loose: bool,
}

#[cfg(feature = "gui")]
impl Default for MergeForm {
    fn default() -> Self {
        Self {
            inputs_text: String::new(),
            output: "./merged.wad".into(),
            report: String::new(),
            filter_patches: true,
            merge_text: true,
            sort_ns: true,
            sort_maps: true,
            sort_textures: false,
            sort_text: true,
            sort_loose: false,
        }
    }
}

#[cfg(feature = "gui")]
impl MergeForm {
    pub fn inputs(&self) -> Vec<PathBuf> {
        self.inputs_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    pub fn add_input(&mut self, path: &std::path::Path) {
        if !self.inputs_text.is_empty() && !self.inputs_text.ends_with('\n') {
            self.inputs_text.push('\n');
        }
        self.inputs_text.push_str(&path.to_string_lossy());
        self.inputs_text.push('\n');
    }

    pub fn to_args(&self) -> Result<(Vec<PathBuf>, MergeOptions), String> {
        let inputs = self.inputs();
        if inputs.len() < 2 {
            return Err("Need at least two input archives".into());
        }
        for input in &inputs {
            if !input.is_file() {
                return Err(format!("No such file: {}", input.display()));
            }
        }

        let output = self.output.trim();
        if output.is_empty() {
            return Err("Output path is empty".into());
        }

        let report = self.report.trim();
        let opts = MergeOptions {
            output: PathBuf::from(output),
            filter_patches: self.filter_patches,
            merge_text: self.merge_text,
            sort_ns: self.sort_ns,
            sort_maps: self.sort_maps,
            sort_textures: self.sort_textures,
            sort_text: self.sort_text,
            sort_loose: self.sort_loose,
            report: if report.is_empty() {
                None
            } else {
                Some(PathBuf::from(report))
            },
        };
        Ok((inputs, opts))
    }
}
