#![forbid(unsafe_code)]

#[cfg(feature = "gui")]
#[derive(Debug)]
pub enum JobMsg {
    Log(String),
    /// Merge finished: status line on success, error text on failure.
    Done(Result<String, String>),
    /// Inspect finished: archive kind plus (name, size) per lump.
    InspectDone(Result<(String, Vec<(String, usize)>), String>),
}
