#![cfg(feature = "cairo-backend")]

use sales_dashboard::api::{Dashboard, DashboardConfig};
use sales_dashboard::core::{SalesDataset, SalesRecord, Viewport};
use sales_dashboard::error::DashboardError;
use sales_dashboard::render::{CairoRenderer, Renderer};
use std::time::Duration;

fn dataset() -> SalesDataset {
    SalesDataset::new(vec![
        SalesRecord::new("Smartphone A", "Enero", 120, 60_000.0, 500.0),
        SalesRecord::new("Smartphone B", "Febrero", 80, 32_000.0, 400.0),
        SalesRecord::new("Tablet X", "Febrero", 30, 9_000.0, 300.0),
    ])
    .expect("valid dataset")
}

#[test]
fn cairo_engines_draw_both_charts_offscreen() {
    let mut dashboard: Dashboard<CairoRenderer, CairoRenderer> = Dashboard::new(
        DashboardConfig::default(),
        Box::new(|| CairoRenderer::new(900, 400)),
        Box::new(|| CairoRenderer::new(900, 540)),
    )
    .expect("dashboard");
    dashboard.set_dataset(dataset(), Duration::ZERO);

    let mut circles = 0;
    dashboard
        .render_bubble_chart_with(
            Viewport::new(900, 540),
            Duration::from_millis(800),
            |engine, frame| {
                engine.render(frame)?;
                circles = engine.last_stats().circles_drawn;
                Ok(())
            },
        )
        .expect("bubble render");
    assert_eq!(circles, 3 + 3);

    let mut png = Vec::new();
    dashboard
        .render_column_chart_with(Viewport::new(900, 400), |engine, frame| {
            engine.render(frame)?;
            engine.write_png(&mut png)
        })
        .expect("column render");
    assert!(png.starts_with(b"\x89PNG"));
}

#[test]
fn zero_sized_surface_fails_engine_load() {
    let dashboard: Dashboard<CairoRenderer, CairoRenderer> = Dashboard::new(
        DashboardConfig::default(),
        Box::new(|| CairoRenderer::new(0, 0)),
        Box::new(|| CairoRenderer::new(1, 1)),
    )
    .expect("dashboard");
    let err = dashboard
        .render_column_chart(Viewport::new(900, 400))
        .expect_err("load fails");
    assert!(matches!(err, DashboardError::EngineLoad(_)));
    assert_eq!(dashboard.column_gate().load_attempts(), 1);
}
