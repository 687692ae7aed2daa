//! Pretty JSON output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::ensure_parent_dir;
use crate::error::{ToolError, ToolResult};

/// Write `value` as indented JSON, non-ASCII text kept as-is.
pub fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> ToolResult<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| ToolError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n").map_err(|e| ToolError::io(path, e))?;
    writer.flush().map_err(|e| ToolError::io(path, e))
}
