use anyhow::{Context, Result};
use flexpose::{
    cooldown::{Cooldown, Event},
    decode::Decode,
    engine::{Engine, Report, Timing},
};
use indicatif::{ProgressBar, ProgressStyle};
use num_traits::cast::ToPrimitive;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::channel,
        Arc,
    },
    time::Duration,
};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Keypoint observations, one JSON frame per line. Reads stdin when
    /// absent or `-`.
    #[structopt(short, long)]
    input: Option<PathBuf>,

    /// Number of decoded frames that may wait for classification.
    #[structopt(short, long, default_value = "1")]
    queue_size: usize,

    /// Seconds to suppress further detections after a flex is seen.
    #[structopt(short, long, default_value = "5")]
    cooldown_secs: u64,

    /// Log and skip lines that fail to decode instead of stopping.
    #[structopt(long)]
    skip_invalid: bool,

    #[structopt(short, long, default_value = "info", env = "RUST_LOG")]
    log_level: tracing_subscriber::filter::EnvFilter,

    #[structopt(short, long)]
    show_progress: bool,

    #[structopt(subcommand)]
    decoder: Decode,
}

fn open_input(input: Option<PathBuf>) -> Result<Box<dyn BufRead + Send>> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(std::io::stdin()))),
    }
}

fn progress_message(report: &Report, detections: usize) -> String {
    let Timing {
        classification,
        frames,
    } = report.timing;
    let micros_per_frame =
        classification.as_secs_f64() * 1e6 / frames.max(1).to_f64().unwrap_or(1.0);
    format!(
        "frame {} => detections: {}, classify: {:.1}µs/frame",
        report.frame, detections, micros_per_frame
    )
}

fn main() -> Result<()> {
    let opt = Opt::from_args();

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(opt.log_level),
    )?;

    let input = open_input(opt.input)?;

    let cooldown = Cooldown::new(Duration::from_secs(opt.cooldown_secs));
    info!(window = ?cooldown.window(), "suppressing repeat detections");

    let engine = Engine::new(opt.decoder, opt.queue_size, cooldown)
        .context("failed constructing engine")?
        .skip_invalid(opt.skip_invalid);

    let running = Arc::new(AtomicBool::new(true));
    let running_ctrl_c = running.clone();

    ctrlc::set_handler(move || {
        running_ctrl_c.store(false, Ordering::SeqCst);
    })
    .context("failed setting Ctrl-C handler")?;

    let pb_detections = if opt.show_progress {
        Some(
            ProgressBar::new_spinner().with_style(
                ProgressStyle::default_spinner()
                    .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
                    .template("{prefix:.bold.dim} {spinner} {wide_msg}"),
            ),
        )
    } else {
        None
    };

    let (reports_tx, reports_rx) = channel();

    let timing = crossbeam::thread::scope(|scope| {
        let engine_thread = scope.spawn(|_| engine.run(input, &running, reports_tx));

        let mut detections = 0;
        for report in reports_rx {
            if report.events.contains(&Event::Detected) {
                detections += 1;
            }
            if let Some(pb_detections) = pb_detections.as_ref() {
                pb_detections.set_message(progress_message(&report, detections));
                pb_detections.inc(1);
            }
        }

        engine_thread
            .join()
            .map_err(|_| anyhow::anyhow!("engine thread panicked"))?
            .context("failed running engine")
    })
    .map_err(|_| anyhow::anyhow!("failed joining pipeline threads"))??;

    if let Some(pb_detections) = pb_detections {
        pb_detections.finish_and_clear();
    }

    info!(
        frames = timing.frames,
        classification = ?timing.classification,
        "done"
    );

    Ok(())
}
