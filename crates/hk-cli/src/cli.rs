use clap::{Parser, ValueEnum};
use hk_core::RunPlan;
use hk_observe::{Console, LogConfig, LogFormat};

/// Command-line interface for hk.
#[derive(Debug, Parser)]
#[command(name = "hk")]
#[command(version, about = "hk is a benchmark tool that executes producers")]
#[command(long_about = "hk takes a producer and executes it many times.\n\n\
A producer is any command that prints a JSON object with numeric \
`startDate` and `endDate` fields to stdout. hk runs it \
producers x scripts times, at most `workers` at once, and reports the \
distribution of endDate - startDate.")]
pub struct Cli {
    /// Producer command to execute (split on whitespace, no quoting)
    #[arg(short, long, env = "HK_COMMAND")]
    pub command: String,

    /// Number of producers to execute
    #[arg(short, long, env = "HK_PRODUCERS", default_value_t = 100)]
    pub producers: usize,

    /// Number of scripts to burn per producer
    #[arg(short, long, env = "HK_SCRIPTS", default_value_t = 20)]
    pub scripts: usize,

    /// Number of workers to execute concurrently
    #[arg(short, long, env = "HK_WORKERS", default_value_t = 50)]
    pub workers: usize,

    /// Number of histogram bins
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    pub bins: u16,

    /// Width of the widest histogram bar
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Log filter directive (e.g. "info", "hk.core.scheduler=debug")
    #[arg(long, env = "HK_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format: text, json or journald
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    pub fn plan(&self) -> RunPlan {
        RunPlan::new(self.command.clone())
            .with_producers(self.producers)
            .with_scripts(self.scripts)
            .with_workers(self.workers)
    }

    /// Logging setup writing through `console`, which the progress bar also uses.
    pub fn log_config(&self, console: Console) -> LogConfig {
        LogConfig {
            format: self.log_format,
            filter: self.log_level.clone(),
            console,
            ..Default::default()
        }
    }

    /// The bar would interleave with JSON on a shared terminal, so only text output shows it.
    pub fn show_progress(&self) -> bool {
        !self.no_progress && self.output == OutputFormat::Text
    }
}
