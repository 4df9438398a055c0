#![forbid(unsafe_code)]

use inquire::Confirm;
use std::path::Path;

use crate::wad::{WadError, WadResult};

pub const LICENSE_TEXT: &str = "\
MIT License

Copyright (c) 2024 wadmerge contributors

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
";

/// Ask before clobbering an existing output archive.
pub fn confirm_overwrite(path: &Path) -> WadResult<bool> {
    Confirm::new(&format!("{} exists. Overwrite?", path.display()))
        .with_default(false)
        .prompt()
        .map_err(|e| WadError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
}
