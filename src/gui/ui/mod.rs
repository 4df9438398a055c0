#![forbid(unsafe_code)]

#[cfg(feature = "gui")]
pub mod topbar;
#[cfg(feature = "gui")]
pub mod merge;
#[cfg(feature = "gui")]
pub mod inspect;
#[cfg(feature = "gui")]
pub mod logs;
