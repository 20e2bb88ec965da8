use std::sync::Arc;

use raymarch_core::types::WorldCoord;
use raymarch_core::Volume;

/// A volume positioned in the map.
///
/// Volumes are shared, so one generated shape can be placed many times
/// without copying its voxels.
#[derive(Debug, Clone)]
pub struct Placement {
    pub offset: WorldCoord,
    pub volume: Arc<Volume>,
}

impl Placement {
    pub fn new(offset: WorldCoord, volume: impl Into<Arc<Volume>>) -> Self {
        Self {
            offset,
            volume: volume.into(),
        }
    }
}

/// Insertion-ordered list of placements. Later placements overwrite
/// earlier ones wherever they overlap.
#[derive(Debug, Clone, Default)]
pub struct SceneMap {
    placements: Vec<Placement>,
}

impl SceneMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    pub fn clear(&mut self) {
        self.placements.clear();
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter()
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Clear `scene` and insert every placement, in order, relative to the
    /// window origin `window`.
    pub fn composite_into(&self, scene: &mut Volume, window: WorldCoord) {
        scene.clear();
        for placement in &self.placements {
            scene.insert(placement.offset - window, &placement.volume);
        }
    }
}

impl From<Vec<Placement>> for SceneMap {
    fn from(placements: Vec<Placement>) -> Self {
        Self { placements }
    }
}
