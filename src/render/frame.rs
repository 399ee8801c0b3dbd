use crate::core::Viewport;
use crate::error::{DashboardError, DashboardResult};
use crate::render::{
    CanvasLayerKind, CirclePrimitive, LinePrimitive, RectPrimitive, TextPrimitive,
};

/// Primitives of one canvas layer. Backends paint rects, then lines, then
/// circles, then texts.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPrimitives {
    pub kind: CanvasLayerKind,
    pub rects: Vec<RectPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl LayerPrimitives {
    fn new(kind: CanvasLayerKind) -> Self {
        Self {
            kind,
            rects: Vec::new(),
            lines: Vec::new(),
            circles: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
            && self.lines.is_empty()
            && self.circles.is_empty()
            && self.texts.is_empty()
    }
}

/// Backend-agnostic scene for one chart draw pass.
///
/// Layers are allocated in [`CanvasLayerKind::CANONICAL_ORDER`], so chart
/// builders may push primitives in any order and still paint correctly.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    layers: Vec<LayerPrimitives>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: CanvasLayerKind::CANONICAL_ORDER
                .into_iter()
                .map(LayerPrimitives::new)
                .collect(),
        }
    }

    #[must_use]
    pub fn layers(&self) -> &[LayerPrimitives] {
        &self.layers
    }

    #[must_use]
    pub fn layer(&self, kind: CanvasLayerKind) -> Option<&LayerPrimitives> {
        self.layers.iter().find(|layer| layer.kind == kind)
    }

    fn layer_mut(&mut self, kind: CanvasLayerKind) -> &mut LayerPrimitives {
        let index = CanvasLayerKind::CANONICAL_ORDER
            .iter()
            .position(|candidate| *candidate == kind)
            .unwrap_or(0);
        &mut self.layers[index]
    }

    pub fn push_rect(&mut self, kind: CanvasLayerKind, rect: RectPrimitive) {
        self.layer_mut(kind).rects.push(rect);
    }

    pub fn push_line(&mut self, kind: CanvasLayerKind, line: LinePrimitive) {
        self.layer_mut(kind).lines.push(line);
    }

    pub fn push_circle(&mut self, kind: CanvasLayerKind, circle: CirclePrimitive) {
        self.layer_mut(kind).circles.push(circle);
    }

    pub fn push_text(&mut self, kind: CanvasLayerKind, text: TextPrimitive) {
        self.layer_mut(kind).texts.push(text);
    }

    #[must_use]
    pub fn with_text(mut self, kind: CanvasLayerKind, text: TextPrimitive) -> Self {
        self.push_text(kind, text);
        self
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.layers.iter().flat_map(|layer| layer.rects.iter())
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.layers.iter().flat_map(|layer| layer.lines.iter())
    }

    pub fn circles(&self) -> impl Iterator<Item = &CirclePrimitive> {
        self.layers.iter().flat_map(|layer| layer.circles.iter())
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.layers.iter().flat_map(|layer| layer.texts.iter())
    }

    pub fn validate(&self) -> DashboardResult<()> {
        if !self.viewport.is_valid() {
            return Err(DashboardError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for layer in &self.layers {
            for rect in &layer.rects {
                rect.validate()?;
            }
            for line in &layer.lines {
                line.validate()?;
            }
            for circle in &layer.circles {
                circle.validate()?;
            }
            for text in &layer.texts {
                text.validate()?;
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(LayerPrimitives::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::RenderFrame;
    use crate::core::Viewport;
    use crate::render::{
        CanvasLayerKind, CirclePrimitive, Color, RectPrimitive, TextHAlign, TextPrimitive,
    };

    #[test]
    fn primitives_land_in_their_layer() {
        let mut frame = RenderFrame::new(Viewport::new(100, 80));
        assert!(frame.is_empty());
        frame.push_circle(
            CanvasLayerKind::Series,
            CirclePrimitive::new(10.0, 10.0, 4.0, Color::BLACK),
        );
        frame.push_rect(
            CanvasLayerKind::Background,
            RectPrimitive::new(0.0, 0.0, 100.0, 80.0, Color::WHITE),
        );

        let series = frame.layer(CanvasLayerKind::Series).expect("series layer");
        assert_eq!(series.circles.len(), 1);
        assert_eq!(frame.layers()[0].kind, CanvasLayerKind::Background);
        assert_eq!(frame.rects().count(), 1);
        assert!(!frame.is_empty());
    }

    #[test]
    fn validation_reports_invalid_viewport_and_primitives() {
        let frame = RenderFrame::new(Viewport::new(0, 10));
        assert!(frame.validate().is_err());

        let frame = RenderFrame::new(Viewport::new(10, 10)).with_text(
            CanvasLayerKind::Axis,
            TextPrimitive::new("x", f64::INFINITY, 0.0, 12.0, Color::BLACK, TextHAlign::Left),
        );
        assert!(frame.validate().is_err());
    }
}
