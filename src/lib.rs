//! sales-dashboard: a two-chart sales analytics dashboard.
//!
//! A static dataset of sales records feeds a grouped column chart and an
//! animated bubble chart. Chart layout produces backend-agnostic render frames;
//! rendering engines (headless, SVG, Cairo) sit behind lazily loaded gates.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{Dashboard, DashboardConfig};
pub use error::{DashboardError, DashboardResult};
