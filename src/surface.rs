// Drawing surfaces legends are attached to

use crate::error::LegendError;
use crate::ir::AnchoredBox;

/// Anything legend blocks can be added to.
///
/// The renderer only ever appends overlays; a surface owns them afterwards.
pub trait Surface {
    fn add_overlay(&mut self, overlay: AnchoredBox) -> Result<(), LegendError>;
}

/// Surface that keeps overlays in insertion order without drawing them
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub overlays: Vec<AnchoredBox>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for RecordingSurface {
    fn add_overlay(&mut self, overlay: AnchoredBox) -> Result<(), LegendError> {
        self.overlays.push(overlay);
        Ok(())
    }
}
