use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use gtk4 as gtk;
use gtk4::prelude::*;
use tracing::warn;

use crate::api::{BubbleLayout, Dashboard, DashboardConfig, DataSource};
use crate::core::Viewport;
use crate::error::DashboardResult;
use crate::render::{CairoContextRenderer, CairoRenderer};

pub type UiDashboard = Rc<RefCell<Dashboard<CairoRenderer, CairoRenderer>>>;

const UPDATE_BUTTON_LABEL: &str = "Update Data (±10–20%)";
const ACKNOWLEDGMENT_TEXT: &str = "Data updated";
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// GTK4 widget tree for the sales dashboard.
///
/// One update button with its transient acknowledgment, a column chart area
/// and a bubble chart area. Both areas draw through Cairo engines that load on
/// their first draw.
pub struct GtkDashboard {
    dashboard: UiDashboard,
    started_at: Instant,
    root: gtk::Box,
    column_area: gtk::DrawingArea,
    bubble_area: gtk::DrawingArea,
}

impl GtkDashboard {
    pub fn new(config: DashboardConfig) -> DashboardResult<Self> {
        let column_height = i32::try_from(config.column.height_px).unwrap_or(i32::MAX);
        let acknowledgment = Duration::from_millis(config.update.acknowledgment_ms);
        let dashboard: UiDashboard = Rc::new(RefCell::new(Dashboard::new(
            config,
            Box::new(|| CairoRenderer::new(1, 1)),
            Box::new(|| CairoRenderer::new(1, 1)),
        )?));
        let started_at = Instant::now();

        let update_button = gtk::Button::with_label(UPDATE_BUTTON_LABEL);
        let acknowledgment_label = gtk::Label::new(Some(ACKNOWLEDGMENT_TEXT));
        acknowledgment_label.set_visible(false);

        let controls = gtk::Box::new(gtk::Orientation::Horizontal, 8);
        controls.append(&update_button);
        controls.append(&acknowledgment_label);

        let column_area = gtk::DrawingArea::new();
        column_area.set_hexpand(true);
        column_area.set_content_height(column_height);
        column_area.set_draw_func({
            let dashboard = Rc::clone(&dashboard);
            move |_widget, context, width, height| {
                if width <= 0 || height <= 0 {
                    return;
                }
                let Ok(dashboard) = dashboard.try_borrow() else {
                    return;
                };
                let container = Viewport::new(width as u32, height as u32);
                if let Err(err) = dashboard.render_column_chart_with(container, |engine, frame| {
                    engine.render_on_cairo_context(context, frame)
                }) {
                    warn!(chart = "column", error = %err, "render pass skipped");
                }
            }
        });

        let bubble_area = gtk::DrawingArea::new();
        bubble_area.set_hexpand(true);
        bubble_area.connect_resize({
            let dashboard = Rc::clone(&dashboard);
            move |area, width, _height| {
                let Ok(dashboard) = dashboard.try_borrow() else {
                    return;
                };
                let Ok(width) = u32::try_from(width) else {
                    return;
                };
                if let Ok(layout) = BubbleLayout::measure(width, &dashboard.config().bubble) {
                    let height = layout.height.ceil() as i32;
                    if area.content_height() != height {
                        area.set_content_height(height);
                    }
                }
            }
        });
        bubble_area.set_draw_func({
            let dashboard = Rc::clone(&dashboard);
            move |_widget, context, width, height| {
                if width <= 0 || height <= 0 {
                    return;
                }
                let Ok(mut dashboard) = dashboard.try_borrow_mut() else {
                    return;
                };
                let container = Viewport::new(width as u32, height as u32);
                if let Err(err) = dashboard.render_bubble_chart_with(
                    container,
                    started_at.elapsed(),
                    |engine, frame| engine.render_on_cairo_context(context, frame),
                ) {
                    warn!(chart = "bubble", error = %err, "render pass skipped");
                }
            }
        });

        let motion = gtk::EventControllerMotion::new();
        motion.connect_motion({
            let dashboard = Rc::clone(&dashboard);
            let bubble_area = bubble_area.clone();
            move |_, x, y| {
                if let Ok(mut dashboard) = dashboard.try_borrow_mut() {
                    dashboard.pointer_move(x, y, started_at.elapsed());
                }
                bubble_area.queue_draw();
            }
        });
        motion.connect_leave({
            let dashboard = Rc::clone(&dashboard);
            let bubble_area = bubble_area.clone();
            move |_| {
                if let Ok(mut dashboard) = dashboard.try_borrow_mut() {
                    dashboard.pointer_leave(started_at.elapsed());
                }
                bubble_area.queue_draw();
            }
        });
        bubble_area.add_controller(motion);

        update_button.connect_clicked({
            let dashboard = Rc::clone(&dashboard);
            let column_area = column_area.clone();
            let bubble_area = bubble_area.clone();
            let acknowledgment_label = acknowledgment_label.clone();
            move |_| {
                let Ok(mut state) = dashboard.try_borrow_mut() else {
                    return;
                };
                let mut rng = rand::thread_rng();
                if let Err(err) = state.trigger_update(&mut rng, started_at.elapsed()) {
                    warn!(error = %err, "data update rejected");
                    return;
                }
                drop(state);

                acknowledgment_label.set_visible(true);
                column_area.queue_draw();
                bubble_area.queue_draw();

                let dashboard = Rc::clone(&dashboard);
                let acknowledgment_label = acknowledgment_label.clone();
                gtk::glib::timeout_add_local_once(acknowledgment, move || {
                    if let Ok(state) = dashboard.try_borrow() {
                        acknowledgment_label
                            .set_visible(state.is_acknowledgment_visible(started_at.elapsed()));
                    }
                });
            }
        });

        gtk::glib::timeout_add_local(FRAME_INTERVAL, {
            let dashboard = Rc::clone(&dashboard);
            let bubble_area = bubble_area.clone();
            move || {
                if let Ok(mut state) = dashboard.try_borrow_mut() {
                    if state.tick(started_at.elapsed()) {
                        bubble_area.queue_draw();
                    }
                }
                gtk::glib::ControlFlow::Continue
            }
        });

        let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
        root.set_margin_top(10);
        root.set_margin_bottom(10);
        root.set_margin_start(10);
        root.set_margin_end(10);
        root.append(&controls);
        root.append(&column_area);
        root.append(&bubble_area);

        Ok(Self {
            dashboard,
            started_at,
            root,
            column_area,
            bubble_area,
        })
    }

    /// Reads the dataset and redraws both charts. Load failures leave the
    /// dashboard empty.
    pub fn load(&self, source: &DataSource) -> usize {
        let records = match self.dashboard.try_borrow_mut() {
            Ok(mut dashboard) => dashboard.load(source, self.started_at.elapsed()),
            Err(_) => return 0,
        };
        self.column_area.queue_draw();
        self.bubble_area.queue_draw();
        records
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::Box {
        &self.root
    }

    #[must_use]
    pub fn dashboard(&self) -> UiDashboard {
        Rc::clone(&self.dashboard)
    }
}
