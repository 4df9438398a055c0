#![forbid(unsafe_code)]

#[cfg(feature = "gui")]
#[derive(Debug, Clone, Copy)]
pub enum Tab {
    Merge,
    Inspect,
}

#[cfg(feature = "gui")]
impl Default for Tab {
    fn default() -> Self {
        Self::Merge
    }
}
