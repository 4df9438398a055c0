#![forbid(unsafe_code)]

use std::io::Write;

use crate::wad::error::WadResult;

/// How a conflict between two same-named resources was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DupeKind {
    Merge,
    Overwrite,
}

impl DupeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DupeKind::Merge => "merge",
            DupeKind::Overwrite => "overwrite",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DupeRecord {
    pub kind: DupeKind,
    /// Typed resource label: "texture", "map", "animation", "switch",
    /// "text lump", "lump".
    pub label: &'static str,
    /// `"<archive-basename>:<name>"` of the resource that was already in
    /// the table.
    pub old: String,
    /// Same form, for the resource that arrived later.
    pub new: String,
}

/// Append-only list of resolved conflicts. Duplicate resolutions are not
/// errors; they are reported here.
#[derive(Debug, Default)]
pub struct DupeLog {
    records: Vec<DupeRecord>,
}

impl DupeLog {
    pub fn new() -> DupeLog {
        DupeLog::default()
    }

    pub fn add(&mut self, kind: DupeKind, label: &'static str, old: String, new: String) {
        self.records.push(DupeRecord {
            kind,
            label,
            old,
            new,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DupeRecord] {
        &self.records
    }

    /// Render the log as three columns, each padded to the maximum width
    /// seen across the whole list.
    pub fn write_to(&self, w: &mut dyn Write) -> WadResult<()> {
        let ops: Vec<String> = self
            .records
            .iter()
            .map(|r| format!("{} {}", r.kind.as_str(), r.label))
            .collect();

        let w0 = ops.iter().map(|s| s.len()).max().unwrap_or(0);
        let w1 = self.records.iter().map(|r| r.old.len()).max().unwrap_or(0);
        let w2 = self.records.iter().map(|r| r.new.len()).max().unwrap_or(0);

        for (op, rec) in ops.iter().zip(&self.records) {
            writeln!(
                w,
                "{op:<w0$}  {old:<w1$}  {new:<w2$}",
                old = rec.old,
                new = rec.new,
            )?;
        }
        Ok(())
    }
}
