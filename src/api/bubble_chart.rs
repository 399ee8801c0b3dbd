use std::time::Duration;

use tracing::trace;

use crate::core::{
    CategorySet, LinearScale, OrdinalScale, SalesDataset, SqrtScale, Viewport, format_grouped,
};
use crate::error::{DashboardError, DashboardResult};
use crate::interaction::{BubbleHoverState, MarkEmphasis, Tooltip, transition_progress};
use crate::render::{
    CanvasLayerKind, CirclePrimitive, Color, LinePrimitive, RectPrimitive, RenderFrame,
    TextHAlign, TextPrimitive,
};

use super::BubbleChartOptions;
use super::layout_helpers::{AXIS_COLOR, PlotArea, TEXT_COLOR, estimate_text_width};

const TICK_SIZE_PX: f64 = 6.0;
const TOOLTIP_PADDING_X_PX: f64 = 12.0;
const TOOLTIP_PADDING_Y_PX: f64 = 8.0;
const TOOLTIP_BACKGROUND: Color = Color::rgba(0.0, 0.0, 0.0, 0.8);

/// Chart size derived from the container width at render time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleLayout {
    pub width: f64,
    pub height: f64,
    pub plot: PlotArea,
}

impl BubbleLayout {
    /// `width = max(min_width, container - inset)`,
    /// `height = max(min_height, container * height_ratio)`.
    pub fn measure(container_width: u32, options: &BubbleChartOptions) -> DashboardResult<Self> {
        if container_width == 0 {
            return Err(DashboardError::InvalidViewport {
                width: container_width,
                height: 0,
            });
        }
        let container_width = f64::from(container_width);
        let width = (container_width - options.width_inset_px).max(options.min_width_px);
        let height = (container_width * options.height_ratio).max(options.min_height_px);
        let margins = options.margins;
        let plot = PlotArea::new(
            margins.left,
            margins.top,
            width - margins.right,
            height - margins.bottom,
        )?;
        Ok(Self {
            width,
            height,
            plot,
        })
    }

    #[must_use]
    pub fn viewport(self) -> Viewport {
        Viewport::new(self.width.ceil() as u32, self.height.ceil() as u32)
    }
}

/// One bubble: a sales record positioned by (units, revenue), sized by price
/// and colored by product.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleMark {
    pub record_index: usize,
    pub product: String,
    pub period: String,
    pub units_sold: u64,
    pub revenue: f64,
    pub unit_price: f64,
    pub cx: f64,
    pub cy: f64,
    pub target_radius: f64,
    pub color: Color,
}

impl BubbleMark {
    #[must_use]
    pub fn tooltip_text(&self) -> String {
        format!(
            "{} - {}: {} sales, ${}",
            self.product,
            self.period,
            self.units_sold,
            format_grouped(self.revenue)
        )
    }
}

/// Fully scaled bubble chart for one dataset snapshot and container width.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleChartScene {
    pub layout: BubbleLayout,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub size_scale: SqrtScale,
    pub marks: Vec<BubbleMark>,
    legend: Vec<(String, Color)>,
    options: BubbleChartOptions,
    animation_origin: Duration,
}

impl BubbleChartScene {
    /// Scales every record into a mark.
    ///
    /// Scale domains are recomputed from the snapshot's maxima on every call,
    /// padded by `options.headroom` on both position axes.
    pub fn build(
        dataset: &SalesDataset,
        container: Viewport,
        options: &BubbleChartOptions,
        categories: &CategorySet,
    ) -> DashboardResult<Self> {
        options.validate()?;
        let layout = BubbleLayout::measure(container.width, options)?;
        let plot = layout.plot;

        let max_units = dataset.max_units_sold().unwrap_or(0) as f64;
        let max_revenue = dataset.max_revenue().unwrap_or(0.0);
        let max_price = dataset.max_unit_price().unwrap_or(0.0);

        let x_scale =
            LinearScale::padded_from_zero(max_units, options.headroom, (plot.left, plot.right))?;
        let y_scale =
            LinearScale::padded_from_zero(max_revenue, options.headroom, (plot.bottom, plot.top))?;
        let size_scale = SqrtScale::new((0.0, max_price), options.size_range)?;

        let mut color_scale = OrdinalScale::new(
            categories.products.iter().cloned(),
            options.palette.clone(),
        )?;
        for record in dataset.records() {
            color_scale.extend(&record.product);
        }

        let marks = dataset
            .records()
            .iter()
            .enumerate()
            .map(|(record_index, record)| BubbleMark {
                record_index,
                product: record.product.clone(),
                period: record.period.clone(),
                units_sold: record.units_sold,
                revenue: record.revenue,
                unit_price: record.unit_price,
                cx: x_scale.map(record.units_sold as f64),
                cy: y_scale.map(record.revenue),
                target_radius: size_scale.map(record.unit_price),
                color: color_scale
                    .get(&record.product)
                    .copied()
                    .unwrap_or(TEXT_COLOR),
            })
            .collect::<Vec<_>>();

        let legend = categories
            .products
            .iter()
            .map(|product| {
                let color = color_scale.get(product).copied().unwrap_or(TEXT_COLOR);
                (product.clone(), color)
            })
            .collect();

        trace!(
            marks = marks.len(),
            width = layout.width,
            height = layout.height,
            "bubble chart scene built"
        );

        Ok(Self {
            layout,
            x_scale,
            y_scale,
            size_scale,
            marks,
            legend,
            options: options.clone(),
            animation_origin: Duration::ZERO,
        })
    }

    /// Session time at which the entry animation starts.
    #[must_use]
    pub fn with_animation_origin(mut self, origin: Duration) -> Self {
        self.animation_origin = origin;
        self
    }

    #[must_use]
    pub fn animation_origin(&self) -> Duration {
        self.animation_origin
    }

    #[must_use]
    pub fn entry_duration(&self) -> Duration {
        Duration::from_millis(self.options.entry_duration_ms)
    }

    /// Marks only react to the pointer once their entry animation finished.
    #[must_use]
    pub fn is_entry_complete(&self, now: Duration) -> bool {
        now >= self.animation_origin + self.entry_duration()
    }

    fn rest_emphasis(&self) -> MarkEmphasis {
        MarkEmphasis::new(1.0, self.options.mark_opacity)
    }

    fn hover_emphasis(&self) -> MarkEmphasis {
        MarkEmphasis::new(self.options.hover_scale, self.options.hover_opacity)
    }

    fn hover_transition(&self) -> Duration {
        Duration::from_millis(self.options.hover_transition_ms)
    }

    /// Radius and opacity of one mark at session time `now`.
    #[must_use]
    pub fn mark_appearance(
        &self,
        mark_index: usize,
        hover: &BubbleHoverState,
        now: Duration,
    ) -> Option<(f64, f64)> {
        let mark = self.marks.get(mark_index)?;
        if !self.is_entry_complete(now) {
            let progress = transition_progress(self.animation_origin, self.entry_duration(), now);
            return Some((mark.target_radius * progress, self.options.mark_opacity));
        }
        let emphasis = hover.emphasis(mark_index, self.rest_emphasis(), now);
        Some((mark.target_radius * emphasis.scale, emphasis.opacity))
    }

    /// Topmost mark under the pointer, if any.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64, hover: &BubbleHoverState, now: Duration) -> Option<usize> {
        if !self.is_entry_complete(now) {
            return None;
        }
        (0..self.marks.len()).rev().find(|index| {
            let mark = &self.marks[*index];
            let radius = self
                .mark_appearance(*index, hover, now)
                .map_or(0.0, |(radius, _)| radius);
            let dx = x - mark.cx;
            let dy = y - mark.cy;
            dx * dx + dy * dy <= radius * radius
        })
    }

    /// Applies pointer motion: entering a mark emphasizes it and spawns a
    /// tooltip next to the pointer; moving off every mark resets emphasis.
    pub fn pointer_move(&self, hover: &mut BubbleHoverState, x: f64, y: f64, now: Duration) {
        match self.hit_test(x, y, hover, now) {
            Some(mark_index) => {
                if hover.hovered() == Some(mark_index) {
                    return;
                }
                let tooltip = Tooltip {
                    mark_index,
                    text: self.marks[mark_index].tooltip_text(),
                    x: x + self.options.tooltip_offset.0,
                    y: y + self.options.tooltip_offset.1,
                    created_at: now,
                };
                hover.enter(
                    mark_index,
                    tooltip,
                    self.rest_emphasis(),
                    self.hover_emphasis(),
                    self.hover_transition(),
                    now,
                );
            }
            None => hover.leave(self.rest_emphasis(), self.hover_transition(), now),
        }
    }

    pub fn pointer_leave(&self, hover: &mut BubbleHoverState, now: Duration) {
        hover.leave(self.rest_emphasis(), self.hover_transition(), now);
    }

    /// Removes tooltips whose lifetime ended. Returns how many were removed.
    pub fn expire_tooltips(&self, hover: &mut BubbleHoverState, now: Duration) -> usize {
        hover.expire(Duration::from_millis(self.options.tooltip_timeout_ms), now)
    }

    /// Materializes the scene at session time `now`.
    ///
    /// Prior output is never reused: axes, marks, legend and live tooltips are
    /// all drawn into a fresh frame.
    pub fn frame_at(&self, hover: &BubbleHoverState, now: Duration) -> DashboardResult<RenderFrame> {
        let mut frame = RenderFrame::new(self.layout.viewport());
        frame.push_rect(
            CanvasLayerKind::Background,
            RectPrimitive::new(0.0, 0.0, self.layout.width, self.layout.height, Color::WHITE),
        );

        self.push_axes(&mut frame);

        for (index, mark) in self.marks.iter().enumerate() {
            let (radius, opacity) = self
                .mark_appearance(index, hover, now)
                .unwrap_or((0.0, self.options.mark_opacity));
            frame.push_circle(
                CanvasLayerKind::Series,
                CirclePrimitive::new(mark.cx, mark.cy, radius, mark.color.with_alpha(opacity)),
            );
        }

        self.push_legend(&mut frame);

        let timeout = Duration::from_millis(self.options.tooltip_timeout_ms);
        for tooltip in hover.tooltips() {
            if tooltip.is_alive(timeout, now) {
                self.push_tooltip(&mut frame, tooltip);
            }
        }

        Ok(frame)
    }

    fn push_axes(&self, frame: &mut RenderFrame) {
        let plot = self.layout.plot;
        let font = self.options.font_size_px;

        frame.push_line(
            CanvasLayerKind::Axis,
            LinePrimitive::new(plot.left, plot.bottom, plot.right, plot.bottom, 1.0, AXIS_COLOR),
        );
        for tick in self.x_scale.ticks(self.options.tick_count) {
            let x = self.x_scale.map(tick);
            frame.push_line(
                CanvasLayerKind::Axis,
                LinePrimitive::new(x, plot.bottom, x, plot.bottom + TICK_SIZE_PX, 1.0, AXIS_COLOR),
            );
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    format_grouped(tick),
                    x,
                    plot.bottom + TICK_SIZE_PX + font,
                    font * 0.85,
                    TEXT_COLOR,
                    TextHAlign::Center,
                ),
            );
        }
        if !self.options.x_axis_title.is_empty() {
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    self.options.x_axis_title.clone(),
                    self.layout.width / 2.0,
                    plot.bottom + 40.0,
                    font,
                    TEXT_COLOR,
                    TextHAlign::Center,
                ),
            );
        }

        frame.push_line(
            CanvasLayerKind::Axis,
            LinePrimitive::new(plot.left, plot.top, plot.left, plot.bottom, 1.0, AXIS_COLOR),
        );
        for tick in self.y_scale.ticks(self.options.tick_count) {
            let y = self.y_scale.map(tick);
            frame.push_line(
                CanvasLayerKind::Axis,
                LinePrimitive::new(plot.left - TICK_SIZE_PX, y, plot.left, y, 1.0, AXIS_COLOR),
            );
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    format_grouped(tick),
                    plot.left - TICK_SIZE_PX - 3.0,
                    y + font * 0.3,
                    font * 0.85,
                    TEXT_COLOR,
                    TextHAlign::Right,
                ),
            );
        }
        if !self.options.y_axis_title.is_empty() {
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    self.options.y_axis_title.clone(),
                    plot.left - 40.0,
                    self.layout.height / 2.0,
                    font,
                    TEXT_COLOR,
                    TextHAlign::Center,
                )
                .rotated(-90.0),
            );
        }
    }

    fn push_legend(&self, frame: &mut RenderFrame) {
        let plot = self.layout.plot;
        let font = self.options.font_size_px;
        for (index, (product, color)) in self.legend.iter().enumerate() {
            let y = plot.top + index as f64 * self.options.legend_spacing;
            frame.push_circle(
                CanvasLayerKind::Legend,
                CirclePrimitive::new(plot.left, y, self.options.legend_swatch_radius, *color),
            );
            frame.push_text(
                CanvasLayerKind::Legend,
                TextPrimitive::new(
                    product.clone(),
                    plot.left + 15.0,
                    y + 5.0,
                    font,
                    TEXT_COLOR,
                    TextHAlign::Left,
                ),
            );
        }
    }

    fn push_tooltip(&self, frame: &mut RenderFrame, tooltip: &Tooltip) {
        let font = self.options.font_size_px;
        let width = estimate_text_width(&tooltip.text, font) + TOOLTIP_PADDING_X_PX * 2.0;
        let height = font + TOOLTIP_PADDING_Y_PX * 2.0;
        frame.push_rect(
            CanvasLayerKind::Overlay,
            RectPrimitive::new(tooltip.x, tooltip.y, width, height, TOOLTIP_BACKGROUND),
        );
        frame.push_text(
            CanvasLayerKind::Overlay,
            TextPrimitive::new(
                tooltip.text.clone(),
                tooltip.x + TOOLTIP_PADDING_X_PX,
                tooltip.y + TOOLTIP_PADDING_Y_PX + font * 0.85,
                font,
                Color::WHITE,
                TextHAlign::Left,
            ),
        );
    }
}
