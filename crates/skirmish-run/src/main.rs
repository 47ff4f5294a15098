//! Headless skirmish runner.
//!
//! ```text
//! skirmish [--config battle.json] [--duration-ms 10000 | --ticks 500] [--report-every 50]
//! ```
//!
//! Without `--ticks` the battle runs in real time on its own thread until the
//! duration elapses. With `--ticks` it runs that many unpaced sweeps on the
//! main thread. Set `RUST_LOG` to change verbosity and `LOG_FORMAT=json` for
//! JSON output.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use skirmish_core::{PopulationSummary, RenderSink, RenderSnapshot, SimConfig, Simulation};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: battle events from this workspace,
/// warnings from everything else.
const DEFAULT_LOG_FILTER: &str = "warn,skirmish=info,skirmish_core=info";

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_tracing() {
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_thread_names(true);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    duration: Duration,
    ticks: Option<u64>,
    report_every: u64,
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> Result<Self> {
        let mut args = Self {
            config: None,
            duration: Duration::from_secs(10),
            ticks: None,
            report_every: 50,
        };
        while let Some(flag) = raw.next() {
            let mut value = || raw.next().with_context(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--config" => args.config = Some(PathBuf::from(value()?)),
                "--duration-ms" => {
                    let ms = value()?.parse().context("--duration-ms expects milliseconds")?;
                    args.duration = Duration::from_millis(ms);
                }
                "--ticks" => args.ticks = Some(value()?.parse().context("--ticks expects a count")?),
                "--report-every" => {
                    args.report_every = value()?.parse().context("--report-every expects a count")?;
                }
                other => bail!("unknown argument '{other}'"),
            }
        }
        if args.report_every == 0 {
            bail!("--report-every must be at least 1");
        }
        Ok(args)
    }
}

// =============================================================================
// Sink
// =============================================================================

/// Logs the population every few sweeps and each destruction as it happens.
#[derive(Debug)]
struct LogSink {
    report_every: u64,
    frames: u64,
    items: usize,
    last: PopulationSummary,
}

impl LogSink {
    fn new(report_every: u64) -> Self {
        Self {
            report_every,
            frames: 0,
            items: 0,
            last: PopulationSummary::new(),
        }
    }
}

impl RenderSink for LogSink {
    fn update_item(&mut self, item: RenderSnapshot) {
        self.items += 1;
        if item.destroyed {
            debug!(id = %item.id, kind = %item.kind, "destroyed");
        }
    }

    fn update_info(&mut self, summary: &PopulationSummary) {
        self.frames += 1;
        if self.frames % self.report_every == 0 {
            info!(frame = self.frames, items = self.items, "{summary}");
        }
        self.items = 0;
        self.last = summary.clone();
    }
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("load battle config '{}'", path.display()))?,
        None => SimConfig::default(),
    };
    let mut sim = Simulation::new(&config).context("build simulation")?;
    info!(
        entities = sim.arena().len(),
        seed = ?config.seed,
        "battle ready"
    );

    let (sim, sink) = match args.ticks {
        Some(ticks) => {
            let mut sink = LogSink::new(args.report_every);
            sim.run_for(ticks, &mut sink);
            (sim, sink)
        }
        None => {
            let control = sim.control();
            let handle = sim
                .spawn(LogSink::new(args.report_every))
                .context("spawn tick thread")?;
            thread::sleep(args.duration);
            control.stop();
            match handle.join() {
                Ok(done) => done,
                Err(_) => bail!("tick thread panicked"),
            }
        }
    };

    info!(tick = sim.tick(), remaining = sim.arena().len(), "battle over");
    info!("{}", sink.last);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn defaults_without_arguments() {
        let args = parse(&[]).unwrap();
        assert!(args.config.is_none());
        assert!(args.ticks.is_none());
        assert_eq!(args.duration, Duration::from_secs(10));
        assert_eq!(args.report_every, 50);
    }

    #[test]
    fn parses_every_flag() {
        let args = parse(&[
            "--config",
            "battle.json",
            "--duration-ms",
            "250",
            "--ticks",
            "40",
            "--report-every",
            "5",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("battle.json")));
        assert_eq!(args.duration, Duration::from_millis(250));
        assert_eq!(args.ticks, Some(40));
        assert_eq!(args.report_every, 5);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--ticks"]).is_err());
        assert!(parse(&["--ticks", "many"]).is_err());
        assert!(parse(&["--report-every", "0"]).is_err());
        assert!(parse(&["--fast"]).is_err());
    }

    #[test]
    fn default_log_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert!(DEFAULT_LOG_FILTER.contains("skirmish_core=info"));
    }

    #[test]
    fn log_sink_keeps_last_summary() {
        let mut sim = Simulation::new(&SimConfig {
            seed: Some(3),
            ..SimConfig::default()
        })
        .unwrap();
        let mut sink = LogSink::new(1);
        sim.run_for(3, &mut sink);
        assert_eq!(sink.frames, 3);
        assert_eq!(&sink.last, sim.arena().population());
    }
}
