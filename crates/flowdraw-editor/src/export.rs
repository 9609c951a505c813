use std::cell::Cell;
use std::error::Error as StdError;
use std::rc::Rc;

use chrono::Local;
use flowdraw_layout::{ImageExportOptions, Scene, export_file_name};
use thiserror::Error;
use tracing::{info, warn};

use crate::state::EditorState;

/// Allows at most one image export in flight.
///
/// Clones share the same slot. Holding the [`ExportTicket`] returned by
/// [`ExportSlot::try_acquire`] marks the slot busy until the ticket drops.
#[derive(Debug, Clone, Default)]
pub struct ExportSlot {
    busy: Rc<Cell<bool>>,
}

impl ExportSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    pub fn try_acquire(&self) -> Option<ExportTicket> {
        if self.busy.replace(true) {
            return None;
        }
        Some(ExportTicket {
            busy: Rc::clone(&self.busy),
        })
    }
}

#[derive(Debug)]
pub struct ExportTicket {
    busy: Rc<Cell<bool>>,
}

impl Drop for ExportTicket {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("image export failed: {0}")]
    Raster(#[source] Box<dyn StdError + Send + Sync>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl EditorState {
    /// Rasterizes the current scene through `rasterize`.
    ///
    /// Returns `Ok(None)` without calling `rasterize` when another export
    /// still holds `slot`. The grid spacing comes from the editor settings.
    pub fn export_image<F, E>(
        &self,
        slot: &ExportSlot,
        options: &ImageExportOptions,
        rasterize: F,
    ) -> Result<Option<ExportedImage>, ExportError>
    where
        F: FnOnce(&Scene, &ImageExportOptions) -> Result<Vec<u8>, E>,
        E: StdError + Send + Sync + 'static,
    {
        let Some(_ticket) = slot.try_acquire() else {
            warn!("image export already in progress");
            return Ok(None);
        };

        let options = ImageExportOptions {
            grid_size: self.config().grid_size,
            ..options.normalized()
        };
        let bytes = rasterize(&self.scene(), &options).map_err(|err| {
            warn!(%err, "image export failed");
            ExportError::Raster(Box::new(err))
        })?;

        let file_name = export_file_name(options.format, &Local::now());
        info!(file = %file_name, bytes = bytes.len(), "exported image");
        Ok(Some(ExportedImage {
            file_name,
            mime_type: options.format.mime_type(),
            bytes,
        }))
    }
}
