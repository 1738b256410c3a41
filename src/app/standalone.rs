use anyhow::Result;
use clap::Parser;
use log::info;
use mrunit::standalone::{engine::run_job, Args, Job};
use mrunit::workload;

fn main() -> Result<()> {
    pretty_env_logger::init();

    let job = Job::from_args(Args::parse())?;
    let engine = workload::named(&job.workload)?;
    info!("Running {} over {}", job.workload, job.input);

    let emitted = run_job(&job, &engine)?;
    println!("{} records written to {}", emitted, job.output);
    Ok(())
}
