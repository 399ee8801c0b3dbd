mod bubble_chart;
mod column_chart;
mod config;
mod dashboard;
mod data_loader;
mod engine_gate;
mod layout_helpers;

pub use bubble_chart::{BubbleChartScene, BubbleLayout, BubbleMark};
pub use column_chart::{ColumnBar, ColumnChartScene};
pub use config::{
    BubbleChartOptions, ColumnChartOptions, DashboardConfig, LegendPosition, UpdateOptions,
};
pub use dashboard::{Dashboard, EngineLoader, RenderReport};
pub use data_loader::{DataSource, load_dataset, load_dataset_or_empty};
pub use engine_gate::EngineGate;
pub use layout_helpers::PlotArea;
