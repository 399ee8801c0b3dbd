use serde::{Deserialize, Serialize};

/// Drawing layers of one chart canvas, painted back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Grid,
    Series,
    Axis,
    Legend,
    Overlay,
}

impl CanvasLayerKind {
    /// Canonical paint order: series sit above gridlines, axes and legend above
    /// series, and transient overlays (tooltips) above everything.
    pub const CANONICAL_ORDER: [Self; 6] = [
        Self::Background,
        Self::Grid,
        Self::Series,
        Self::Axis,
        Self::Legend,
        Self::Overlay,
    ];
}
