use gtk4 as gtk;
use gtk4::prelude::*;
use sales_dashboard::api::{DashboardConfig, DataSource};
use sales_dashboard::platform_gtk::GtkDashboard;

fn main() {
    let _ = sales_dashboard::telemetry::init_default_tracing();

    let app = gtk::Application::builder()
        .application_id("rs.sales.dashboard.gtk_sales_dashboard")
        .build();
    app.connect_activate(build_ui);
    app.run_with_args::<&str>(&[]);
}

fn build_ui(app: &gtk::Application) {
    let source = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/ventas.json".to_owned());

    let dashboard = match GtkDashboard::new(DashboardConfig::default()) {
        Ok(dashboard) => dashboard,
        Err(err) => {
            eprintln!("failed to initialize sales dashboard: {err}");
            return;
        }
    };
    let records = dashboard.load(&DataSource::parse(&source));
    eprintln!("loaded {records} sales records from {source}");

    let scroller = gtk::ScrolledWindow::builder()
        .hscrollbar_policy(gtk::PolicyType::Never)
        .child(dashboard.widget())
        .build();

    let window = gtk::ApplicationWindow::builder()
        .application(app)
        .title("Sales Dashboard")
        .default_width(1100)
        .default_height(900)
        .build();
    window.set_child(Some(&scroller));
    window.present();
}
