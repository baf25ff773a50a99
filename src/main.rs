use clap::{ArgAction, Parser, ValueEnum};
use recttrack::{process_frame, CameraModel, Frame, TargetReport, TrackerConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recttrack")]
#[command(about = "Find retro-reflective rectangle targets in a camera frame", long_about = None)]
struct Cli {
    /// JSON tracker configuration; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Camera model, sets the viewing angle
    #[arg(long, value_enum)]
    camera: Option<Camera>,

    /// Override the minimum contour area in pixels
    #[arg(long)]
    min_area: Option<u32>,

    /// Override the per-channel brightness threshold
    #[arg(long)]
    threshold: Option<u8>,

    /// Input image path
    image: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Camera {
    /// Axis M1011, 43.5 degrees
    M1011,
    /// Axis 206, 47 degrees
    Axis206,
}

impl From<Camera> for CameraModel {
    fn from(camera: Camera) -> Self {
        match camera {
            Camera::M1011 => CameraModel::M1011,
            Camera::Axis206 => CameraModel::Axis206,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    /// JSON output with full details
    Json,
    /// Human readable summary
    Text,
    /// TSV format: nx\tny\tdistance\tangle\tx1,y1,x2,y2,x3,y3,x4,y4
    Tsv,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = match &cli.config {
        Some(path) => TrackerConfig::from_json_file(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(camera) = cli.camera {
        config.viewing_angle = CameraModel::from(camera).viewing_angle();
    }
    if let Some(min_area) = cli.min_area {
        config.min_area = min_area;
    }
    if let Some(threshold) = cli.threshold {
        config.threshold = threshold;
    }
    config.validate()?;

    let frame = Frame::open(&cli.image, &config)?;
    let matches = process_frame(&frame, &config);
    let report = TargetReport::from_matches(&matches, &config);
    log::info!(
        "{}: {} match{} found",
        cli.image.display(),
        matches.len(),
        if matches.len() == 1 { "" } else { "es" }
    );

    let distance = |m: &recttrack::Match<'_>| m.distance(config.viewing_angle, config.target_height, config.camera_height);

    match cli.format {
        OutputFormat::Json => {
            let json_output = serde_json::json!({
                "width": frame.width,
                "height": frame.height,
                "matches": matches.iter().map(|m| serde_json::json!({
                    "points": m.points,
                    "center": m.center,
                    "normalized": [m.normalized_x, m.normalized_y],
                    "distance": distance(m),
                    "angle": m.angle_from_target(),
                })).collect::<Vec<_>>(),
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&json_output)?);
        }
        OutputFormat::Text => {
            for m in &matches {
                println!(
                    "{:.2}, {:.2}  {:.2}\"  {:.2}",
                    m.normalized_x,
                    m.normalized_y,
                    distance(m),
                    m.angle_from_target()
                );
            }
            println!(
                "{} match{} found.",
                matches.len(),
                if matches.len() == 1 { "" } else { "es" }
            );
        }
        OutputFormat::Tsv => {
            for m in &matches {
                let corners = m
                    .points
                    .iter()
                    .map(|p| format!("{},{}", p.x, p.y))
                    .collect::<Vec<_>>()
                    .join(",");
                println!(
                    "{:.4}\t{:.4}\t{:.3}\t{:.4}\t{}",
                    m.normalized_x,
                    m.normalized_y,
                    distance(m),
                    m.angle_from_target(),
                    corners
                );
            }
        }
    }

    Ok(())
}
