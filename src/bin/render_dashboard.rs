use rand::SeedableRng;
use rand::rngs::StdRng;
use sales_dashboard::api::{BubbleLayout, Dashboard, DashboardConfig, DataSource};
use sales_dashboard::core::Viewport;
use sales_dashboard::render::{Renderer, SvgRenderer};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const USAGE: &str = "usage: render_dashboard [dataset] [--updates <n>] [--seed <n>] [--config <path>] [--out <dir>] [--width <px>]";

#[derive(Debug)]
struct CliArgs {
    source: DataSource,
    updates: u32,
    seed: u64,
    config: Option<PathBuf>,
    out_dir: PathBuf,
    width: u32,
}

fn main() {
    let _ = sales_dashboard::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
            DashboardConfig::from_json_str(&raw).map_err(|err| err.to_string())?
        }
        None => DashboardConfig::default(),
    };
    let entry = Duration::from_millis(config.bubble.entry_duration_ms);
    let column_container = Viewport::new(args.width, config.column.height_px);
    let bubble_height = BubbleLayout::measure(args.width, &config.bubble)
        .map_err(|err| err.to_string())?
        .viewport()
        .height;
    let bubble_container = Viewport::new(args.width, bubble_height);

    let mut dashboard = Dashboard::new(
        config,
        Box::new(|| Ok(SvgRenderer::new())),
        Box::new(|| Ok(SvgRenderer::new())),
    )
    .map_err(|err| err.to_string())?;

    let records = dashboard.load(&args.source, Duration::ZERO);
    eprintln!("loaded {records} records from {}", args.source);

    let mut rng = StdRng::seed_from_u64(args.seed);
    for _ in 0..args.updates {
        dashboard
            .trigger_update(&mut rng, Duration::ZERO)
            .map_err(|err| err.to_string())?;
    }

    let mut column_svg = String::new();
    let bars = dashboard
        .render_column_chart_with(column_container, |engine, frame| {
            engine.render(frame)?;
            column_svg = engine.document().to_owned();
            Ok(())
        })
        .map_err(|err| err.to_string())?;

    let mut bubble_svg = String::new();
    let marks = dashboard
        .render_bubble_chart_with(bubble_container, entry, |engine, frame| {
            engine.render(frame)?;
            bubble_svg = engine.document().to_owned();
            Ok(())
        })
        .map_err(|err| err.to_string())?;

    fs::create_dir_all(&args.out_dir)
        .map_err(|err| format!("failed to create `{}`: {err}", args.out_dir.display()))?;
    write_document(&args.out_dir.join("column_chart.svg"), &column_svg)?;
    write_document(&args.out_dir.join("bubble_chart.svg"), &bubble_svg)?;
    eprintln!(
        "rendered {bars} bars and {marks} bubbles into {}",
        args.out_dir.display()
    );
    Ok(())
}

fn write_document(path: &Path, document: &str) -> Result<(), String> {
    fs::write(path, document).map_err(|err| format!("failed to write `{}`: {err}", path.display()))
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut source = None::<DataSource>;
    let mut updates = 0_u32;
    let mut seed = 0_u64;
    let mut config = None::<PathBuf>;
    let mut out_dir = PathBuf::from(".");
    let mut width = 900_u32;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--updates" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --updates".to_owned())?;
                updates = value
                    .parse()
                    .map_err(|err| format!("invalid --updates `{value}`: {err}"))?;
            }
            "--seed" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --seed".to_owned())?;
                seed = value
                    .parse()
                    .map_err(|err| format!("invalid --seed `{value}`: {err}"))?;
            }
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                config = Some(PathBuf::from(value));
            }
            "--out" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --out".to_owned())?;
                out_dir = PathBuf::from(value);
            }
            "--width" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --width".to_owned())?;
                width = value
                    .parse()
                    .map_err(|err| format!("invalid --width `{value}`: {err}"))?;
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            flag if flag.starts_with("--") => return Err(format!("unknown argument `{flag}`")),
            location => {
                if source.is_some() {
                    return Err(USAGE.to_owned());
                }
                source = Some(DataSource::parse(location));
            }
        }
    }

    Ok(CliArgs {
        source: source.unwrap_or_else(|| DataSource::parse("data/ventas.json")),
        updates,
        seed,
        config,
        out_dir,
        width,
    })
}
