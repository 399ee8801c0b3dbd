use serde::{Deserialize, Serialize};

use crate::core::{CategorySet, Margins, PerturbationRange};
use crate::error::{DashboardError, DashboardResult};
use crate::render::Color;

/// Where the column chart draws its legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    Top,
    Bottom,
    Right,
    None,
}

/// Style configuration handed to the column (grouped comparison) chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnChartOptions {
    #[serde(default = "default_column_title")]
    pub title: String,
    #[serde(default = "default_h_axis_title")]
    pub h_axis_title: String,
    #[serde(default = "default_units_axis_title")]
    pub v_axis_title: String,
    #[serde(default = "default_legend_position")]
    pub legend_position: LegendPosition,
    #[serde(default = "default_palette")]
    pub palette: Vec<Color>,
    /// Share of each period slot covered by its bar group.
    #[serde(default = "default_group_width_ratio")]
    pub group_width_ratio: f64,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default = "default_column_height_px")]
    pub height_px: u32,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
    #[serde(default = "default_value_tick_count")]
    pub value_tick_count: usize,
}

impl Default for ColumnChartOptions {
    fn default() -> Self {
        Self {
            title: default_column_title(),
            h_axis_title: default_h_axis_title(),
            v_axis_title: default_units_axis_title(),
            legend_position: default_legend_position(),
            palette: default_palette(),
            group_width_ratio: default_group_width_ratio(),
            background: default_background(),
            height_px: default_column_height_px(),
            font_size_px: default_font_size_px(),
            value_tick_count: default_value_tick_count(),
        }
    }
}

impl ColumnChartOptions {
    pub fn validate(&self) -> DashboardResult<()> {
        validate_palette(&self.palette)?;
        self.background.validate()?;
        if !self.group_width_ratio.is_finite()
            || self.group_width_ratio <= 0.0
            || self.group_width_ratio > 1.0
        {
            return Err(DashboardError::InvalidData(
                "column group width ratio must be in (0, 1]".to_owned(),
            ));
        }
        if self.height_px == 0 {
            return Err(DashboardError::InvalidData(
                "column chart height must be > 0".to_owned(),
            ));
        }
        validate_font_size(self.font_size_px)?;
        if self.value_tick_count == 0 {
            return Err(DashboardError::InvalidData(
                "column chart needs at least one value tick".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Style, scale and timing configuration of the bubble chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleChartOptions {
    #[serde(default = "default_bubble_margins")]
    pub margins: Margins,
    #[serde(default = "default_min_side_px")]
    pub min_width_px: f64,
    #[serde(default = "default_min_side_px")]
    pub min_height_px: f64,
    /// Subtracted from the container width before clamping to `min_width_px`.
    #[serde(default = "default_width_inset_px")]
    pub width_inset_px: f64,
    /// Chart height as a share of the container width.
    #[serde(default = "default_height_ratio")]
    pub height_ratio: f64,
    /// Multiplier applied to the data maxima of both position axes.
    #[serde(default = "default_headroom")]
    pub headroom: f64,
    /// Bubble radius range `[min, max]` of the square-root price scale.
    #[serde(default = "default_size_range")]
    pub size_range: (f64, f64),
    #[serde(default = "default_palette")]
    pub palette: Vec<Color>,
    #[serde(default = "default_mark_opacity")]
    pub mark_opacity: f64,
    #[serde(default = "default_hover_opacity")]
    pub hover_opacity: f64,
    #[serde(default = "default_entry_duration_ms")]
    pub entry_duration_ms: u64,
    #[serde(default = "default_hover_scale")]
    pub hover_scale: f64,
    #[serde(default = "default_hover_transition_ms")]
    pub hover_transition_ms: u64,
    /// Tooltips disappear this long after they were created, hovered or not.
    #[serde(default = "default_tooltip_timeout_ms")]
    pub tooltip_timeout_ms: u64,
    #[serde(default = "default_tooltip_offset")]
    pub tooltip_offset: (f64, f64),
    #[serde(default = "default_units_axis_title")]
    pub x_axis_title: String,
    #[serde(default = "default_revenue_axis_title")]
    pub y_axis_title: String,
    #[serde(default = "default_bubble_tick_count")]
    pub tick_count: usize,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
    #[serde(default = "default_legend_swatch_radius")]
    pub legend_swatch_radius: f64,
    #[serde(default = "default_legend_spacing")]
    pub legend_spacing: f64,
}

impl Default for BubbleChartOptions {
    fn default() -> Self {
        Self {
            margins: default_bubble_margins(),
            min_width_px: default_min_side_px(),
            min_height_px: default_min_side_px(),
            width_inset_px: default_width_inset_px(),
            height_ratio: default_height_ratio(),
            headroom: default_headroom(),
            size_range: default_size_range(),
            palette: default_palette(),
            mark_opacity: default_mark_opacity(),
            hover_opacity: default_hover_opacity(),
            entry_duration_ms: default_entry_duration_ms(),
            hover_scale: default_hover_scale(),
            hover_transition_ms: default_hover_transition_ms(),
            tooltip_timeout_ms: default_tooltip_timeout_ms(),
            tooltip_offset: default_tooltip_offset(),
            x_axis_title: default_units_axis_title(),
            y_axis_title: default_revenue_axis_title(),
            tick_count: default_bubble_tick_count(),
            font_size_px: default_font_size_px(),
            legend_swatch_radius: default_legend_swatch_radius(),
            legend_spacing: default_legend_spacing(),
        }
    }
}

impl BubbleChartOptions {
    pub fn validate(&self) -> DashboardResult<()> {
        validate_palette(&self.palette)?;
        for (name, value) in [
            ("margin top", self.margins.top),
            ("margin right", self.margins.right),
            ("margin bottom", self.margins.bottom),
            ("margin left", self.margins.left),
            ("min width", self.min_width_px),
            ("min height", self.min_height_px),
            ("width inset", self.width_inset_px),
            ("legend swatch radius", self.legend_swatch_radius),
            ("legend spacing", self.legend_spacing),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DashboardError::InvalidData(format!(
                    "bubble {name} must be finite and >= 0"
                )));
            }
        }
        if self.min_width_px <= self.margins.left + self.margins.right
            || self.min_height_px <= self.margins.top + self.margins.bottom
        {
            return Err(DashboardError::InvalidData(
                "bubble minimum size must leave room inside the margins".to_owned(),
            ));
        }
        if !self.height_ratio.is_finite() || self.height_ratio <= 0.0 {
            return Err(DashboardError::InvalidData(
                "bubble height ratio must be finite and > 0".to_owned(),
            ));
        }
        if !self.headroom.is_finite() || self.headroom < 1.0 {
            return Err(DashboardError::InvalidData(
                "bubble headroom must be finite and >= 1".to_owned(),
            ));
        }
        let (size_min, size_max) = self.size_range;
        if !size_min.is_finite() || !size_max.is_finite() || size_min < 0.0 || size_min > size_max
        {
            return Err(DashboardError::InvalidData(
                "bubble size range must satisfy 0 <= min <= max".to_owned(),
            ));
        }
        for (name, value) in [
            ("mark opacity", self.mark_opacity),
            ("hover opacity", self.hover_opacity),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DashboardError::InvalidData(format!(
                    "bubble {name} must be in [0, 1]"
                )));
            }
        }
        if !self.hover_scale.is_finite() || self.hover_scale <= 0.0 {
            return Err(DashboardError::InvalidData(
                "bubble hover scale must be finite and > 0".to_owned(),
            ));
        }
        if !self.tooltip_offset.0.is_finite() || !self.tooltip_offset.1.is_finite() {
            return Err(DashboardError::InvalidData(
                "tooltip offset must be finite".to_owned(),
            ));
        }
        validate_font_size(self.font_size_px)
    }
}

/// Update-trigger settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpdateOptions {
    #[serde(default)]
    pub perturbation: PerturbationRange,
    /// How long the "data updated" acknowledgment stays visible.
    #[serde(default = "default_acknowledgment_ms")]
    pub acknowledgment_ms: u64,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            perturbation: PerturbationRange::default(),
            acknowledgment_ms: default_acknowledgment_ms(),
        }
    }
}

/// Complete dashboard configuration.
///
/// Every field has a default, so `{}` is a valid configuration document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub categories: CategorySet,
    #[serde(default)]
    pub column: ColumnChartOptions,
    #[serde(default)]
    pub bubble: BubbleChartOptions,
    #[serde(default)]
    pub update: UpdateOptions,
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> DashboardResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> DashboardResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> DashboardResult<()> {
        self.categories.validate()?;
        self.column.validate()?;
        self.bubble.validate()?;
        self.update.perturbation.validate()
    }
}

fn validate_palette(palette: &[Color]) -> DashboardResult<()> {
    if palette.is_empty() {
        return Err(DashboardError::InvalidData(
            "palette must contain at least one color".to_owned(),
        ));
    }
    for color in palette {
        color.validate()?;
    }
    Ok(())
}

fn validate_font_size(font_size_px: f64) -> DashboardResult<()> {
    if !font_size_px.is_finite() || font_size_px <= 0.0 {
        return Err(DashboardError::InvalidData(
            "font size must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

fn default_column_title() -> String {
    "Sales by Product".to_owned()
}

fn default_h_axis_title() -> String {
    "Month".to_owned()
}

fn default_units_axis_title() -> String {
    "Units Sold".to_owned()
}

fn default_revenue_axis_title() -> String {
    "Revenue".to_owned()
}

fn default_legend_position() -> LegendPosition {
    LegendPosition::Bottom
}

fn default_palette() -> Vec<Color> {
    vec![
        Color::rgb(37.0 / 255.0, 99.0 / 255.0, 235.0 / 255.0),
        Color::rgb(220.0 / 255.0, 38.0 / 255.0, 38.0 / 255.0),
        Color::rgb(22.0 / 255.0, 163.0 / 255.0, 74.0 / 255.0),
    ]
}

fn default_group_width_ratio() -> f64 {
    0.75
}

fn default_background() -> Color {
    Color::WHITE
}

fn default_column_height_px() -> u32 {
    400
}

fn default_font_size_px() -> f64 {
    12.0
}

fn default_value_tick_count() -> usize {
    5
}

fn default_bubble_margins() -> Margins {
    Margins::new(30.0, 30.0, 50.0, 60.0)
}

fn default_min_side_px() -> f64 {
    300.0
}

fn default_width_inset_px() -> f64 {
    40.0
}

fn default_height_ratio() -> f64 {
    0.6
}

fn default_headroom() -> f64 {
    1.1
}

fn default_size_range() -> (f64, f64) {
    (10.0, 60.0)
}

fn default_mark_opacity() -> f64 {
    0.7
}

fn default_hover_opacity() -> f64 {
    1.0
}

fn default_entry_duration_ms() -> u64 {
    800
}

fn default_hover_scale() -> f64 {
    1.3
}

fn default_hover_transition_ms() -> u64 {
    200
}

fn default_tooltip_timeout_ms() -> u64 {
    3_000
}

fn default_tooltip_offset() -> (f64, f64) {
    (10.0, -10.0)
}

fn default_bubble_tick_count() -> usize {
    10
}

fn default_legend_swatch_radius() -> f64 {
    6.0
}

fn default_legend_spacing() -> f64 {
    25.0
}

fn default_acknowledgment_ms() -> u64 {
    2_000
}

#[cfg(test)]
mod tests {
    use super::{DashboardConfig, LegendPosition};

    #[test]
    fn empty_document_yields_defaults() {
        let config = DashboardConfig::from_json_str("{}").expect("default config");
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.column.legend_position, LegendPosition::Bottom);
        assert_eq!(config.bubble.size_range, (10.0, 60.0));
        assert_eq!(config.update.perturbation.min, 0.8);
        assert_eq!(config.update.perturbation.max, 1.2);
        assert_eq!(config.update.acknowledgment_ms, 2_000);
    }

    #[test]
    fn default_palette_matches_brand_colors() {
        let config = DashboardConfig::default();
        let hex: Vec<String> = config.column.palette.iter().map(|c| c.to_hex()).collect();
        assert_eq!(hex, vec!["#2563eb", "#dc2626", "#16a34a"]);
    }

    #[test]
    fn partial_documents_override_selected_fields() {
        let config = DashboardConfig::from_json_str(
            r##"{
                "column": { "legend_position": "right", "palette": ["#000000"] },
                "bubble": { "tooltip_timeout_ms": 1500 },
                "categories": { "periods": ["Enero", "Febrero", "Marzo"] }
            }"##,
        )
        .expect("partial config");
        assert_eq!(config.column.legend_position, LegendPosition::Right);
        assert_eq!(config.column.palette.len(), 1);
        assert_eq!(config.column.group_width_ratio, 0.75);
        assert_eq!(config.bubble.tooltip_timeout_ms, 1_500);
        assert_eq!(config.categories.periods.len(), 3);
        assert_eq!(config.categories.products.len(), 3);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = DashboardConfig::default();
        let json = config.to_json_pretty().expect("serialize config");
        let back = DashboardConfig::from_json_str(&json).expect("parse config");
        assert_eq!(back.categories, config.categories);
        assert_eq!(back.update, config.update);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(DashboardConfig::from_json_str(r#"{"column":{"palette":[]}}"#).is_err());
        assert!(DashboardConfig::from_json_str(r#"{"column":{"group_width_ratio":1.5}}"#).is_err());
        assert!(DashboardConfig::from_json_str(r#"{"bubble":{"headroom":0.9}}"#).is_err());
        assert!(DashboardConfig::from_json_str(r#"{"bubble":{"size_range":[60,10]}}"#).is_err());
        assert!(
            DashboardConfig::from_json_str(r#"{"update":{"perturbation":{"min":1.5,"max":1.2}}}"#)
                .is_err()
        );
    }
}
