use std::io::Cursor;
use std::path::PathBuf;

use futures::channel::oneshot;
use image::ImageFormat;

use crate::config::ExportConfig;
use crate::error::{ExportError, ExportResult};
use crate::renderer::Surface;
use crate::util::time;

/// Pending result of an export, resolves to the written file path.
pub type ExportHandle = oneshot::Receiver<ExportResult<PathBuf>>;

/// Encode a surface as PNG.
pub fn encode_png(surface: &Surface) -> ExportResult<Vec<u8>> {
    let mut bytes = Vec::new();
    surface
        .to_rgba_image()
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

pub fn export_filename(prefix: &str, timestamp_millis: u64) -> String {
    format!("{prefix}-{timestamp_millis}.png")
}

/// Writes rendered surfaces to PNG files in the configured directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    directory: PathBuf,
    file_prefix: String,
}

impl Exporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            file_prefix: config.file_prefix.clone(),
        }
    }

    pub fn target_path(&self, timestamp_millis: u64) -> PathBuf {
        self.directory
            .join(export_filename(&self.file_prefix, timestamp_millis))
    }

    /// Start exporting `surface`. Encoding and writing happen off the UI
    /// thread; the returned handle resolves once the file exists or the
    /// export failed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn export(&self, surface: Surface) -> ExportHandle {
        let (sender, receiver) = oneshot::channel();
        let path = self.target_path(time::timestamp_millis());

        std::thread::spawn(move || {
            let result = write_png(&surface, path);
            // The receiver may have been dropped, nothing to report to then
            let _ = sender.send(result);
        });

        receiver
    }

    #[cfg(target_arch = "wasm32")]
    pub fn export(&self, surface: Surface) -> ExportHandle {
        let (sender, receiver) = oneshot::channel();
        log::warn!(
            "Cannot save {}x{} image: no filesystem on this platform",
            surface.width(),
            surface.height()
        );
        let _ = sender.send(Err(ExportError::Unsupported));
        receiver
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_png(surface: &Surface, path: PathBuf) -> ExportResult<PathBuf> {
    let bytes = encode_png(surface)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, &bytes)?;
    log::info!(
        "Exported {}x{} drawing to {} ({} bytes)",
        surface.width(),
        surface.height(),
        path.display(),
        bytes.len()
    );
    Ok(path)
}

/// Check a pending export without blocking.
///
/// Returns `None` while the export is still running.
pub fn poll_export(handle: &mut ExportHandle) -> Option<ExportResult<PathBuf>> {
    match handle.try_recv() {
        Ok(Some(result)) => Some(result),
        Ok(None) => None,
        Err(oneshot::Canceled) => Some(Err(ExportError::Cancelled)),
    }
}
