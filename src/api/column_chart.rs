use tracing::trace;

use crate::core::{
    CategorySet, GroupedTable, LinearScale, SalesDataset, Viewport, format_grouped, nice_ticks,
    nice_upper_bound,
};
use crate::error::{DashboardError, DashboardResult};
use crate::render::{
    CanvasLayerKind, Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

use super::layout_helpers::{AXIS_COLOR, GRID_COLOR, PlotArea, TEXT_COLOR, estimate_text_width};
use super::{ColumnChartOptions, LegendPosition};

const OUTER_PADDING_PX: f64 = 10.0;
const LEGEND_SWATCH_PX: f64 = 12.0;
const LEGEND_GAP_PX: f64 = 6.0;
const LEGEND_ENTRY_SPACING_PX: f64 = 18.0;

/// One drawn column: a (period, product) cell of the grouped table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBar {
    pub period: String,
    pub product: String,
    pub value: u64,
    pub rect: RectPrimitive,
}

/// Fully laid out grouped comparison chart for one dataset snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChartScene {
    pub viewport: Viewport,
    pub table: GroupedTable,
    pub plot: PlotArea,
    pub value_scale: LinearScale,
    pub bars: Vec<ColumnBar>,
    frame: RenderFrame,
}

impl ColumnChartScene {
    /// Builds the grouped table and lays it out inside `container`.
    ///
    /// The whole scene is rebuilt on every call; nothing is carried over from
    /// earlier snapshots.
    pub fn build(
        dataset: &SalesDataset,
        container: Viewport,
        options: &ColumnChartOptions,
        categories: &CategorySet,
    ) -> DashboardResult<Self> {
        if !container.is_valid() {
            return Err(DashboardError::InvalidViewport {
                width: container.width,
                height: container.height,
            });
        }
        options.validate()?;

        let table = GroupedTable::build(dataset, categories);
        let font = options.font_size_px;
        let width = f64::from(container.width);
        let height = f64::from(container.height);

        let axis_max = nice_upper_bound(table.max_value() as f64, options.value_tick_count);
        let ticks = nice_ticks(0.0, axis_max, options.value_tick_count);
        let tick_label_width = ticks
            .iter()
            .map(|tick| estimate_text_width(&format_grouped(*tick), font))
            .fold(0.0, f64::max);

        let legend_entries_width = legend_entries_width(&table.products, font);
        let legend_column_width = table
            .products
            .iter()
            .map(|product| estimate_text_width(product, font))
            .fold(0.0, f64::max)
            + LEGEND_SWATCH_PX
            + LEGEND_GAP_PX
            + OUTER_PADDING_PX * 2.0;

        let title_height = if options.title.is_empty() {
            0.0
        } else {
            font * 1.5 + OUTER_PADDING_PX
        };
        let legend_row_height = font + OUTER_PADDING_PX;

        let mut top = OUTER_PADDING_PX + title_height + font * 0.5;
        let mut bottom = height - OUTER_PADDING_PX - (font + 8.0) - (font + 12.0);
        let left = OUTER_PADDING_PX + font + 12.0 + tick_label_width + 8.0;
        let mut right = width - OUTER_PADDING_PX * 2.0;
        match options.legend_position {
            LegendPosition::Top => top += legend_row_height,
            LegendPosition::Bottom => bottom -= legend_row_height,
            LegendPosition::Right => right -= legend_column_width,
            LegendPosition::None => {}
        }

        let plot = PlotArea::new(left, top, right, bottom)?;
        let value_scale = LinearScale::new((0.0, axis_max), (plot.bottom, plot.top))?;

        let mut frame = RenderFrame::new(container);
        frame.push_rect(
            CanvasLayerKind::Background,
            RectPrimitive::new(0.0, 0.0, width, height, options.background),
        );

        if !options.title.is_empty() {
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    options.title.clone(),
                    plot.left,
                    OUTER_PADDING_PX + font * 1.3,
                    font * 1.3,
                    TEXT_COLOR,
                    TextHAlign::Left,
                ),
            );
        }

        for tick in &ticks {
            let y = value_scale.map(*tick);
            frame.push_line(
                CanvasLayerKind::Grid,
                LinePrimitive::new(plot.left, y, plot.right, y, 1.0, GRID_COLOR),
            );
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    format_grouped(*tick),
                    plot.left - 8.0,
                    y + font * 0.35,
                    font,
                    TEXT_COLOR,
                    TextHAlign::Right,
                ),
            );
        }
        frame.push_line(
            CanvasLayerKind::Axis,
            LinePrimitive::new(plot.left, plot.bottom, plot.right, plot.bottom, 1.0, AXIS_COLOR),
        );

        let bars = layout_bars(&table, plot, value_scale, options);
        for bar in &bars {
            frame.push_rect(CanvasLayerKind::Series, bar.rect);
        }

        let slot_width = plot.width() / table.rows.len().max(1) as f64;
        for (index, row) in table.rows.iter().enumerate() {
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    row.period.clone(),
                    plot.left + slot_width * (index as f64 + 0.5),
                    plot.bottom + font + 6.0,
                    font,
                    TEXT_COLOR,
                    TextHAlign::Center,
                ),
            );
        }

        if !options.h_axis_title.is_empty() {
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    options.h_axis_title.clone(),
                    plot.center_x(),
                    plot.bottom + font * 2.0 + 16.0,
                    font,
                    TEXT_COLOR,
                    TextHAlign::Center,
                ),
            );
        }
        if !options.v_axis_title.is_empty() {
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    options.v_axis_title.clone(),
                    OUTER_PADDING_PX + font,
                    plot.center_y(),
                    font,
                    TEXT_COLOR,
                    TextHAlign::Center,
                )
                .rotated(-90.0),
            );
        }

        let legend_origin = match options.legend_position {
            LegendPosition::Top => Some((
                plot.center_x() - legend_entries_width / 2.0,
                plot.top - legend_row_height,
                false,
            )),
            LegendPosition::Bottom => Some((
                plot.center_x() - legend_entries_width / 2.0,
                height - OUTER_PADDING_PX - legend_row_height * 0.5,
                false,
            )),
            LegendPosition::Right => Some((plot.right + OUTER_PADDING_PX * 2.0, plot.top, true)),
            LegendPosition::None => None,
        };
        if let Some((x, y, vertical)) = legend_origin {
            push_legend(&mut frame, &table.products, options, x, y, vertical);
        }

        trace!(
            bars = bars.len(),
            periods = table.rows.len(),
            products = table.products.len(),
            "column chart scene built"
        );

        Ok(Self {
            viewport: container,
            table,
            plot,
            value_scale,
            bars,
            frame,
        })
    }

    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }
}

fn layout_bars(
    table: &GroupedTable,
    plot: PlotArea,
    value_scale: LinearScale,
    options: &ColumnChartOptions,
) -> Vec<ColumnBar> {
    if table.rows.is_empty() || table.products.is_empty() {
        return Vec::new();
    }

    let slot_width = plot.width() / table.rows.len() as f64;
    let group_width = slot_width * options.group_width_ratio;
    let bar_width = group_width / table.products.len() as f64;

    let mut bars = Vec::with_capacity(table.rows.len() * table.products.len());
    for (row_index, row) in table.rows.iter().enumerate() {
        let group_left = plot.left + slot_width * row_index as f64 + (slot_width - group_width) / 2.0;
        for (column, (product, value)) in table.products.iter().zip(&row.values).enumerate() {
            let y_top = value_scale.map(*value as f64).min(plot.bottom);
            bars.push(ColumnBar {
                period: row.period.clone(),
                product: product.clone(),
                value: *value,
                rect: RectPrimitive::new(
                    group_left + bar_width * column as f64,
                    y_top,
                    bar_width,
                    plot.bottom - y_top,
                    palette_color(&options.palette, column),
                ),
            });
        }
    }
    bars
}

fn legend_entries_width(products: &[String], font: f64) -> f64 {
    let entries: f64 = products
        .iter()
        .map(|product| {
            LEGEND_SWATCH_PX
                + LEGEND_GAP_PX
                + estimate_text_width(product, font)
                + LEGEND_ENTRY_SPACING_PX
        })
        .sum();
    (entries - LEGEND_ENTRY_SPACING_PX).max(0.0)
}

fn push_legend(
    frame: &mut RenderFrame,
    products: &[String],
    options: &ColumnChartOptions,
    origin_x: f64,
    origin_y: f64,
    vertical: bool,
) {
    let font = options.font_size_px;
    let mut x = origin_x;
    let mut y = origin_y;
    for (index, product) in products.iter().enumerate() {
        frame.push_rect(
            CanvasLayerKind::Legend,
            RectPrimitive::new(
                x,
                y - LEGEND_SWATCH_PX / 2.0,
                LEGEND_SWATCH_PX,
                LEGEND_SWATCH_PX,
                palette_color(&options.palette, index),
            ),
        );
        frame.push_text(
            CanvasLayerKind::Legend,
            TextPrimitive::new(
                product.clone(),
                x + LEGEND_SWATCH_PX + LEGEND_GAP_PX,
                y + font * 0.35,
                font,
                TEXT_COLOR,
                TextHAlign::Left,
            ),
        );

        if vertical {
            y += font + LEGEND_ENTRY_SPACING_PX;
        } else {
            x += LEGEND_SWATCH_PX
                + LEGEND_GAP_PX
                + estimate_text_width(product, font)
                + LEGEND_ENTRY_SPACING_PX;
        }
    }
}

fn palette_color(palette: &[Color], index: usize) -> Color {
    palette
        .get(index % palette.len().max(1))
        .copied()
        .unwrap_or(TEXT_COLOR)
}
