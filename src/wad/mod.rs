#![forbid(unsafe_code)]

mod animated;
mod error;
mod format;
mod io;
mod maps;
mod merge;
mod namespaces;
mod omap;
mod read;
mod report;
mod textlumps;
mod textures;
mod write;

pub use error::{WadError, WadResult};
pub use format::{Lump, LumpSource, Wad, WadKind};

pub use animated::{AnimateDef, AnimatedTable, SwitchDef, SwitchesTable};
pub use maps::{MapFormat, MapMarker, MapTable};
pub use namespaces::{Namespace, NamespaceTable};
pub use omap::OrderedMap;
pub use textlumps::TextTable;
pub use textures::{PatchDef, TextureDef, TextureTable};

pub use merge::{merge, MergeOptions, MergeSummary};
pub use read::read_wad;
pub use report::{DupeKind, DupeLog, DupeRecord};
pub use write::write_wad;
