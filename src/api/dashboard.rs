use std::time::Duration;

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::core::{SalesDataset, Viewport};
use crate::error::DashboardResult;
use crate::interaction::BubbleHoverState;
use crate::render::{NullRenderer, RenderFrame, Renderer};

use super::{
    BubbleChartScene, ColumnChartScene, DashboardConfig, DataSource, EngineGate,
    load_dataset_or_empty,
};

/// Deferred constructor of a rendering engine, run by its [`EngineGate`].
pub type EngineLoader<E> = Box<dyn Fn() -> DashboardResult<E>>;

/// Outcome of one render pass over both charts.
///
/// A failing chart leaves its region blank; the other chart still renders.
#[derive(Debug)]
pub struct RenderReport {
    /// Number of non-zero bars drawn.
    pub column: DashboardResult<usize>,
    /// Number of bubbles drawn.
    pub bubble: DashboardResult<usize>,
}

impl RenderReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.column.is_ok() && self.bubble.is_ok()
    }
}

/// Explicit application state of the sales dashboard.
///
/// Holds the current dataset snapshot, one engine gate per chart, the bubble
/// chart's hover state and the update acknowledgment deadline. Times are
/// session-clock offsets supplied by the caller.
pub struct Dashboard<C, B> {
    config: DashboardConfig,
    dataset: SalesDataset,
    generation: u64,
    column_gate: EngineGate<C>,
    bubble_gate: EngineGate<B>,
    column_loader: EngineLoader<C>,
    bubble_loader: EngineLoader<B>,
    bubble_scene: Option<CachedBubbleScene>,
    animation_origin: Duration,
    hover: BubbleHoverState,
    acknowledgment_until: Option<Duration>,
}

struct CachedBubbleScene {
    generation: u64,
    container_width: u32,
    scene: BubbleChartScene,
}

impl Dashboard<NullRenderer, NullRenderer> {
    /// Dashboard whose engines discard frames after validating them.
    pub fn headless(config: DashboardConfig) -> DashboardResult<Self> {
        Self::new(
            config,
            Box::new(|| Ok(NullRenderer::default())),
            Box::new(|| Ok(NullRenderer::default())),
        )
    }
}

impl<C, B> Dashboard<C, B> {
    /// Creates an empty dashboard. Engines are not loaded until first render.
    pub fn new(
        config: DashboardConfig,
        column_loader: EngineLoader<C>,
        bubble_loader: EngineLoader<B>,
    ) -> DashboardResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            dataset: SalesDataset::empty(),
            generation: 0,
            column_gate: EngineGate::new("column"),
            bubble_gate: EngineGate::new("bubble"),
            column_loader,
            bubble_loader,
            bubble_scene: None,
            animation_origin: Duration::ZERO,
            hover: BubbleHoverState::default(),
            acknowledgment_until: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub fn dataset(&self) -> &SalesDataset {
        &self.dataset
    }

    /// Incremented every time a new snapshot is published.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn hover(&self) -> &BubbleHoverState {
        &self.hover
    }

    #[must_use]
    pub fn column_gate(&self) -> &EngineGate<C> {
        &self.column_gate
    }

    #[must_use]
    pub fn bubble_gate(&self) -> &EngineGate<B> {
        &self.bubble_gate
    }

    /// Bubble scene of the last render pass, if it still matches the dataset.
    #[must_use]
    pub fn bubble_scene(&self) -> Option<&BubbleChartScene> {
        self.bubble_scene
            .as_ref()
            .filter(|cached| cached.generation == self.generation)
            .map(|cached| &cached.scene)
    }

    /// Reads the dataset once; on failure the dashboard keeps going with an
    /// empty dataset.
    pub fn load(&mut self, source: &DataSource, now: Duration) -> usize {
        let dataset = load_dataset_or_empty(source);
        let records = dataset.len();
        self.set_dataset(dataset, now);
        records
    }

    /// Publishes `dataset` as the current snapshot and restarts the bubble
    /// chart's entry animation at `now`.
    pub fn set_dataset(&mut self, dataset: SalesDataset, now: Duration) {
        debug!(
            records = dataset.len(),
            previous = self.dataset.len(),
            generation = self.generation + 1,
            "dataset replaced"
        );
        self.dataset = dataset;
        self.generation += 1;
        self.bubble_scene = None;
        self.animation_origin = now;
        self.hover.reset();
    }

    /// Applies one random perturbation to the current snapshot and swaps the
    /// result in. Both charts re-render from scratch on their next pass.
    pub fn trigger_update<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        now: Duration,
    ) -> DashboardResult<()> {
        let next = self
            .dataset
            .perturbed(self.config.update.perturbation, rng)?;
        self.set_dataset(next, now);
        self.acknowledgment_until =
            Some(now + Duration::from_millis(self.config.update.acknowledgment_ms));
        Ok(())
    }

    /// Whether the "data updated" acknowledgment is still showing.
    #[must_use]
    pub fn is_acknowledgment_visible(&self, now: Duration) -> bool {
        self.acknowledgment_until
            .is_some_and(|until| now < until)
    }

    /// Builds the column chart frame for the current snapshot, along with
    /// the number of non-zero bars in it.
    pub fn column_frame(&self, container: Viewport) -> DashboardResult<(RenderFrame, usize)> {
        let scene = ColumnChartScene::build(
            &self.dataset,
            container,
            &self.config.column,
            &self.config.categories,
        )?;
        let bars = scene.bars.iter().filter(|bar| bar.value > 0).count();
        Ok((scene.frame().clone(), bars))
    }

    /// Renders the column chart with a custom draw call on the loaded engine.
    ///
    /// `draw` only runs once the engine is loaded; nothing is drawn if the
    /// load fails.
    pub fn render_column_chart_with<D>(&self, container: Viewport, draw: D) -> DashboardResult<usize>
    where
        D: FnOnce(&mut C, &RenderFrame) -> DashboardResult<()>,
    {
        let (frame, bars) = self.column_frame(container)?;
        self.column_gate
            .with_engine(|| (self.column_loader)(), |engine| draw(engine, &frame))?;
        trace!(bars, "column chart rendered");
        Ok(bars)
    }

    /// Brings the cached bubble scene up to date with the dataset and the
    /// container width. Rebuilding discards hover state.
    fn refresh_bubble_scene(&mut self, container: Viewport) -> DashboardResult<()> {
        let fresh = self.bubble_scene.as_ref().is_some_and(|cached| {
            cached.generation == self.generation && cached.container_width == container.width
        });
        if fresh {
            return Ok(());
        }
        let scene = BubbleChartScene::build(
            &self.dataset,
            container,
            &self.config.bubble,
            &self.config.categories,
        )?
        .with_animation_origin(self.animation_origin);
        self.hover.reset();
        self.bubble_scene = Some(CachedBubbleScene {
            generation: self.generation,
            container_width: container.width,
            scene,
        });
        Ok(())
    }

    /// Builds the bubble chart frame at session time `now`.
    pub fn bubble_frame(
        &mut self,
        container: Viewport,
        now: Duration,
    ) -> DashboardResult<(RenderFrame, usize)> {
        self.refresh_bubble_scene(container)?;
        let Some(cached) = self.bubble_scene.as_ref() else {
            return Ok((RenderFrame::new(container), 0));
        };
        cached.scene.expire_tooltips(&mut self.hover, now);
        let frame = cached.scene.frame_at(&self.hover, now)?;
        Ok((frame, cached.scene.marks.len()))
    }

    /// Renders the bubble chart with a custom draw call on the loaded engine.
    pub fn render_bubble_chart_with<D>(
        &mut self,
        container: Viewport,
        now: Duration,
        draw: D,
    ) -> DashboardResult<usize>
    where
        D: FnOnce(&mut B, &RenderFrame) -> DashboardResult<()>,
    {
        let (frame, marks) = self.bubble_frame(container, now)?;
        self.bubble_gate
            .with_engine(|| (self.bubble_loader)(), |engine| draw(engine, &frame))?;
        trace!(marks, "bubble chart rendered");
        Ok(marks)
    }

    /// Routes pointer motion over the bubble chart to its current scene.
    pub fn pointer_move(&mut self, x: f64, y: f64, now: Duration) {
        if let Some(cached) = &self.bubble_scene {
            if cached.generation == self.generation {
                cached.scene.pointer_move(&mut self.hover, x, y, now);
            }
        }
    }

    pub fn pointer_leave(&mut self, now: Duration) {
        if let Some(cached) = &self.bubble_scene {
            cached.scene.pointer_leave(&mut self.hover, now);
        }
    }

    /// Drops expired tooltips and reports whether the bubble chart needs a
    /// redraw at `now`.
    pub fn tick(&mut self, now: Duration) -> bool {
        let Some(cached) = &self.bubble_scene else {
            return false;
        };
        let expired = cached.scene.expire_tooltips(&mut self.hover, now);
        expired > 0
            || !cached.scene.is_entry_complete(now)
            || self.hover.is_animating(now)
    }
}

impl<C: Renderer, B: Renderer> Dashboard<C, B> {
    pub fn render_column_chart(&self, container: Viewport) -> DashboardResult<usize> {
        self.render_column_chart_with(container, |engine, frame| engine.render(frame))
    }

    pub fn render_bubble_chart(&mut self, container: Viewport, now: Duration) -> DashboardResult<usize> {
        self.render_bubble_chart_with(container, now, |engine, frame| engine.render(frame))
    }

    /// Renders both charts. A failure in one chart is logged and reported
    /// without preventing the other from rendering.
    pub fn render_all(
        &mut self,
        column_container: Viewport,
        bubble_container: Viewport,
        now: Duration,
    ) -> RenderReport {
        let column = self.render_column_chart(column_container);
        if let Err(err) = &column {
            warn!(chart = "column", error = %err, "render pass skipped");
        }
        let bubble = self.render_bubble_chart(bubble_container, now);
        if let Err(err) = &bubble {
            warn!(chart = "bubble", error = %err, "render pass skipped");
        }
        RenderReport { column, bubble }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::Dashboard;
    use crate::api::DashboardConfig;
    use crate::core::{SalesDataset, SalesRecord, Viewport};
    use crate::error::DashboardError;
    use crate::render::NullRenderer;

    const COLUMN: Viewport = Viewport {
        width: 800,
        height: 400,
    };
    const BUBBLE: Viewport = Viewport {
        width: 840,
        height: 504,
    };

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn sample() -> SalesDataset {
        SalesDataset::new(vec![
            SalesRecord::new("Smartphone A", "Enero", 120, 60_000.0, 500.0),
            SalesRecord::new("Smartphone B", "Febrero", 80, 32_000.0, 400.0),
        ])
        .expect("valid dataset")
    }

    #[test]
    fn renders_both_charts_and_loads_engines_once() {
        let mut dashboard = Dashboard::headless(DashboardConfig::default()).expect("dashboard");
        dashboard.set_dataset(sample(), ms(0));
        for now in [0, 100, 900] {
            let report = dashboard.render_all(COLUMN, BUBBLE, ms(now));
            assert!(report.is_complete());
            assert_eq!(report.column.expect("column"), 2);
            assert_eq!(report.bubble.expect("bubble"), 2);
        }
        assert_eq!(dashboard.column_gate().load_attempts(), 1);
        assert_eq!(dashboard.bubble_gate().load_attempts(), 1);
    }

    #[test]
    fn update_swaps_snapshot_and_shows_acknowledgment() {
        let mut dashboard = Dashboard::headless(DashboardConfig::default()).expect("dashboard");
        dashboard.set_dataset(sample(), ms(0));
        let before = dashboard.dataset().clone();
        let mut rng = StdRng::seed_from_u64(11);

        dashboard.trigger_update(&mut rng, ms(5_000)).expect("update");
        assert!(!dashboard.dataset().same_snapshot(&before));
        assert_eq!(dashboard.generation(), 2);
        assert!(dashboard.is_acknowledgment_visible(ms(6_999)));
        assert!(!dashboard.is_acknowledgment_visible(ms(7_000)));
    }

    #[test]
    fn update_restarts_entry_animation_and_clears_hover() {
        let mut dashboard = Dashboard::headless(DashboardConfig::default()).expect("dashboard");
        dashboard.set_dataset(sample(), ms(0));
        dashboard.render_bubble_chart(BUBBLE, ms(1_000)).expect("render");
        let mark = dashboard.bubble_scene().expect("scene").marks[0].clone();
        dashboard.pointer_move(mark.cx, mark.cy, ms(1_000));
        assert_eq!(dashboard.hover().hovered(), Some(0));

        let mut rng = StdRng::seed_from_u64(3);
        dashboard.trigger_update(&mut rng, ms(2_000)).expect("update");
        assert_eq!(dashboard.hover().hovered(), None);
        assert!(dashboard.bubble_scene().is_none());

        dashboard.render_bubble_chart(BUBBLE, ms(2_100)).expect("render");
        let scene = dashboard.bubble_scene().expect("scene");
        assert_eq!(scene.animation_origin(), ms(2_000));
        assert!(!scene.is_entry_complete(ms(2_100)));
        assert!(dashboard.tick(ms(2_100)));
    }

    #[test]
    fn failed_engine_load_blanks_only_that_chart() {
        let attempts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&attempts);
        let mut dashboard: Dashboard<NullRenderer, NullRenderer> = Dashboard::new(
            DashboardConfig::default(),
            Box::new(|| Ok(NullRenderer::default())),
            Box::new(move || {
                counter.set(counter.get() + 1);
                Err(DashboardError::EngineLoad("bubble backend missing".to_owned()))
            }),
        )
        .expect("dashboard");
        dashboard.set_dataset(sample(), ms(0));

        let report = dashboard.render_all(COLUMN, BUBBLE, ms(0));
        assert!(report.column.is_ok());
        assert!(matches!(report.bubble, Err(DashboardError::EngineLoad(_))));
        assert!(!dashboard.bubble_gate().is_loaded());

        let _ = dashboard.render_all(COLUMN, BUBBLE, ms(10));
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn width_change_remeasures_without_replaying_entry() {
        let mut dashboard = Dashboard::headless(DashboardConfig::default()).expect("dashboard");
        dashboard.set_dataset(sample(), ms(0));
        dashboard
            .render_bubble_chart(Viewport::new(900, 540), ms(1_000))
            .expect("render at 900");
        let scene = dashboard.bubble_scene().expect("scene");
        assert_eq!(scene.layout.width, 860.0);
        let mark = scene.marks[0].clone();
        dashboard.pointer_move(mark.cx, mark.cy, ms(1_000));
        assert_eq!(dashboard.hover().hovered(), Some(0));
        assert_eq!(dashboard.hover().tooltips().len(), 1);

        dashboard
            .render_bubble_chart(Viewport::new(600, 360), ms(1_200))
            .expect("render at 600");
        let scene = dashboard.bubble_scene().expect("scene");
        assert_eq!(scene.layout.width, 560.0);
        assert_eq!(scene.animation_origin(), ms(0));
        assert!(scene.is_entry_complete(ms(1_200)));
        assert_eq!(dashboard.hover().hovered(), None);
        assert!(dashboard.hover().tooltips().is_empty());
        assert_eq!(dashboard.generation(), 1);
    }

    #[test]
    fn draw_waits_for_engine_load() {
        let loads = Rc::new(Cell::new(0));
        let counter = Rc::clone(&loads);
        let mut dashboard: Dashboard<NullRenderer, NullRenderer> = Dashboard::new(
            DashboardConfig::default(),
            Box::new(move || {
                counter.set(counter.get() + 1);
                Ok(NullRenderer::default())
            }),
            Box::new(|| Err(DashboardError::EngineLoad("no bubble engine".to_owned()))),
        )
        .expect("dashboard");
        dashboard.set_dataset(sample(), ms(0));

        let mut draws = 0;
        for _ in 0..3 {
            dashboard
                .render_column_chart_with(COLUMN, |_, _| {
                    draws += 1;
                    Ok(())
                })
                .expect("column render");
        }
        assert_eq!(loads.get(), 1);
        assert_eq!(draws, 3);

        let mut bubble_draws = 0;
        let result = dashboard.render_bubble_chart_with(BUBBLE, ms(900), |_, _| {
            bubble_draws += 1;
            Ok(())
        });
        assert!(matches!(result, Err(DashboardError::EngineLoad(_))));
        assert_eq!(bubble_draws, 0);
        assert_eq!(dashboard.bubble_gate().load_attempts(), 1);
    }

    #[test]
    fn empty_dataset_renders_zero_marks() {
        let mut dashboard = Dashboard::headless(DashboardConfig::default()).expect("dashboard");
        let report = dashboard.render_all(COLUMN, BUBBLE, ms(0));
        assert_eq!(report.column.expect("column"), 0);
        assert_eq!(report.bubble.expect("bubble"), 0);
    }

    #[test]
    fn tooltips_expire_on_tick() {
        let mut dashboard = Dashboard::headless(DashboardConfig::default()).expect("dashboard");
        dashboard.set_dataset(sample(), ms(0));
        dashboard.render_bubble_chart(BUBBLE, ms(900)).expect("render");
        let mark = dashboard.bubble_scene().expect("scene").marks[1].clone();
        dashboard.pointer_move(mark.cx, mark.cy, ms(1_000));
        dashboard.pointer_leave(ms(1_050));
        assert_eq!(dashboard.hover().tooltips().len(), 1);

        assert!(!dashboard.tick(ms(3_999)));
        assert_eq!(dashboard.hover().tooltips().len(), 1);
        assert!(dashboard.tick(ms(4_000)));
        assert!(dashboard.hover().tooltips().is_empty());
    }
}
