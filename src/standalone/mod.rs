use crate::config::Configuration;
use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod engine;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a job on the local machine
    Submit {
        /// Glob spec for the input files
        #[arg(short, long)]
        input: String,

        /// Name of the workload
        #[arg(short, long)]
        workload: String,

        /// Output directory
        #[arg(short, long)]
        output: String,

        /// Number of reduce buckets (and output files)
        #[arg(short = 'n', long, default_value_t = 11, value_parser = clap::value_parser!(u32).range(1..))]
        n_reduce: u32,

        /// Configuration setting passed to the workload, as key=value
        #[arg(short = 'D', value_name = "KEY=VALUE")]
        define: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct Job {
    pub input: String,
    pub workload: String,
    pub output: String,
    pub n_reduce: u32,
    pub conf: Configuration,
}

impl Job {
    pub fn from_args(args: Args) -> Result<Job> {
        match args.command {
            Commands::Submit {
                input,
                workload,
                output,
                n_reduce,
                define,
            } => Ok(Job {
                input,
                workload,
                output,
                n_reduce,
                conf: Configuration::from_pairs(&define)?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_builds_a_job() {
        let args = Args::try_parse_from([
            "standalone",
            "submit",
            "-i",
            "input/*.tsv",
            "-w",
            "awesomeness",
            "-o",
            "out",
            "-D",
            "awesomeness.users.file.path=users.tsv",
        ])
        .unwrap();
        let job = Job::from_args(args).unwrap();
        assert_eq!(job.input, "input/*.tsv");
        assert_eq!(job.n_reduce, 11);
        assert_eq!(job.conf.get("awesomeness.users.file.path"), Some("users.tsv"));
    }

    #[test]
    fn malformed_define_is_rejected() {
        let args = Args::try_parse_from([
            "standalone", "submit", "-i", "x", "-w", "awesomeness", "-o", "out", "-D", "oops",
        ])
        .unwrap();
        assert!(Job::from_args(args).is_err());
    }
}
