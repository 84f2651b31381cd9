//! Export - flatten the canvas into a PNG.
//!
//! Export clears the selection and re-renders first, so the border and handles
//! never end up in the image. A canvas that drew any raster without readback
//! permission cannot be exported at all.

use crate::editor::Editor;
use crate::error::{ExportError, Result};
use crate::observe::EditorEvent;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::NamedTempFile;
use tracing::info;

/// Encode the current canvas, without selection decoration, as PNG bytes.
pub fn export_png(editor: &mut Editor) -> Result<Vec<u8>> {
    if let Some(source) = editor.scene().readback_blocker() {
        return Err(ExportError::Tainted {
            source_url: source.to_string(),
        }
        .into());
    }

    editor.clear_selection();
    editor.render();

    let mut out = Cursor::new(Vec::new());
    editor
        .pixels()
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    let png = out.into_inner();

    editor.emit(EditorEvent::Exported { bytes: png.len() });
    Ok(png)
}

/// Same as [`export_png`], as a `data:` URL.
pub fn export_data_url(editor: &mut Editor) -> Result<String> {
    let png = export_png(editor)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// `{prefix}-{identifier}.png`, or a millisecond timestamp when there is no
/// identifier.
pub fn export_file_name(prefix: &str, identifier: Option<&str>) -> String {
    match identifier.map(str::trim).filter(|id| !id.is_empty()) {
        Some(identifier) => format!("{}-{}.png", prefix, sanitize(identifier)),
        None => {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_millis())
                .unwrap_or_default();
            format!("{}-{}.png", prefix, millis)
        }
    }
}

/// Keep file names portable: anything outside `[A-Za-z0-9._-]` becomes `_`.
fn sanitize(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Write `png` to `dir/file_name` through a temp file, so a crash never
/// leaves a half-written export.
pub fn save_png(dir: &Path, file_name: &str, png: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let target = dir.join(file_name);

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(png)?;
    temp.flush()?;
    temp.persist(&target).map_err(|e| e.error)?;

    info!(path = %target.display(), bytes = png.len(), "Exported canvas");
    Ok(target)
}
