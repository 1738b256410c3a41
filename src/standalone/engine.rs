use anyhow::{bail, Context, Result};
use bytes::Bytes;
use dashmap::DashMap;
use glob::glob;
use itertools::Itertools;
use log::{debug, info};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
};

use crate::standalone::Job;
use crate::utils::read_file;
use crate::*;

// types related to this engine
pub type BucketIndex = u32;
pub type Buckets = DashMap<BucketIndex, Vec<KeyValue>>;

/// Groups intermediate records by key.
///
/// This stands in for the shuffle/sort of a MapReduce runtime. Keys come
/// out in ascending byte order; within a key, values keep the order they
/// were emitted in.
pub fn group_by_key(mut records: Vec<KeyValue>) -> Vec<(Bytes, Vec<Bytes>)> {
    records.sort_by_key(KeyValue::key);
    let chunks = records.into_iter().chunk_by(KeyValue::key);
    let groups = (&chunks)
        .into_iter()
        .map(|(key, group)| (key, group.map(KeyValue::into_value).collect()))
        .collect();
    groups
}

pub fn perform_map(job: &Job, engine: &Workload, serialized_args: &Bytes) -> Result<Buckets> {
    if job.n_reduce == 0 {
        bail!("A job needs at least one reduce bucket");
    }
    // Iterator going through all files in the input file path, precisely, input/*
    let input_files = glob(&job.input)?;
    let buckets: Buckets = Buckets::new();
    for pathspec in input_files.flatten() {
        let buf = read_file(&pathspec)?;
        let filename = pathspec.to_str().unwrap_or("unknown").to_string();
        debug!("Mapping {} ({} bytes)", filename, buf.len());
        let input_kv = KeyValue {
            key: Bytes::from(filename),
            value: buf,
        };
        let map_func = engine.map_fn;
        // Each emitted pair goes into the bucket picked by its hashed key
        for item in map_func(input_kv, serialized_args.clone())? {
            let KeyValue { key, value } = item?;
            let bucket_no = ihash(&key) % job.n_reduce;

            buckets
                .entry(bucket_no)
                .or_default()
                .push(KeyValue { key, value });
        }
    }

    Ok(buckets)
}

/// Reduces every bucket into `<output>/mr-out-<bucket>`, one
/// `key\tvalue` line per emitted pair. Returns the number of lines written.
pub fn perform_reduce(
    job: &Job,
    engine: &Workload,
    serialized_args: &Bytes,
    buckets: Buckets,
) -> Result<usize> {
    let reduce_func = engine.reduce_fn;
    let output_dir = &job.output;
    fs::create_dir_all(output_dir).with_context(|| format!("Failed to create {}", output_dir))?;

    let mut emitted = 0;
    for (reduce_id, bkt) in buckets.into_iter() {
        let out_pathspec = format!("{}/mr-out-{}", &output_dir, reduce_id);
        let out_file =
            File::create(&out_pathspec).with_context(|| format!("Failed to create {}", out_pathspec))?;
        let mut out_file = BufWriter::new(out_file);
        for (key, values) in group_by_key(bkt) {
            let out = reduce_func(key, Box::new(values.into_iter()), serialized_args.clone())?;
            if let Some(KeyValue { key, value }) = out {
                out_file.write_all(&key)?;
                out_file.write_all(b"\t")?;
                out_file.write_all(&value)?;
                out_file.write_all(b"\n")?;
                emitted += 1;
            }
        }
        out_file.flush()?;
    }
    Ok(emitted)
}

/// Runs a whole job: map and shuffle, then reduce.
pub fn run_job(job: &Job, engine: &Workload) -> Result<usize> {
    let serialized_args = job.conf.to_aux()?;
    // The map logic carries out mapping and also shuffle, since everything
    // runs on one machine.
    let buckets = perform_map(job, engine, &serialized_args)?;
    info!("Map phase filled {} buckets", buckets.len());
    let emitted = perform_reduce(job, engine, &serialized_args, buckets)?;
    info!("Reduce phase wrote {} records to {}", emitted, job.output);
    Ok(emitted)
}
