use std::{
    io::{self, Write},
    time::Instant,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;

use hk_observe::Console;
use hk_report::{Summary, render_summary, write_json};

mod bar;
mod cli;

use cli::{Cli, OutputFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let console = Console::stderr();
    hk_observe::init(&cli.log_config(console.clone())).context("logger")?;

    let plan = cli.plan();
    plan.validate().context("invalid run configuration")?;
    let total = plan.shape().total()?;
    info!(command = %plan.command, producers = plan.producers, scripts = plan.scripts, workers = plan.workers, "starting");

    let pb = cli.show_progress().then(|| bar::new(total as u64));
    if let Some(pb) = &pb {
        console.attach(pb.clone());
    }
    let progress = pb.map(bar::progress);

    let started = Instant::now();
    let results = hk_exec::run(&plan, progress).await?;
    let elapsed = started.elapsed();
    if let Some(pb) = console.detach() {
        pb.finish();
    }

    let summary = Summary::from_results(&results, usize::from(cli.bins))?;

    let mut out = io::stdout().lock();
    match cli.output {
        OutputFormat::Text => {
            writeln!(out)?;
            writeln!(
                out,
                "{total} scripts executed in {:.2}s",
                elapsed.as_secs_f64()
            )?;
            writeln!(out)?;
            render_summary(&mut out, &summary, cli.width)?;
        }
        OutputFormat::Json => write_json(&mut out, &summary)?,
    }
    out.flush()?;

    Ok(())
}
