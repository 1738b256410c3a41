//! Drivers for unit-testing map and reduce functions.
//!
//! Each driver follows the same pattern: give it inputs, optionally declare
//! the outputs you expect, then either [`run`](MapDriver::run) it to get the
//! outputs or [`run_test`](MapDriver::run_test) it to compare them.
//!
//! ```
//! # use anyhow::Result;
//! use mrunit::driver::MapReduceDriver;
//! use mrunit::workload;
//! # fn main() -> Result<()> {
//! MapReduceDriver::new(workload::named("awesomeness")?)
//!     .with_input("input.tsv", "42\tJane\tDoe\tUS\tNYC\tEng\tCS\n42\t8.2\n")
//!     .with_output("42", "Jane\tDoe\tUS\tNYC\tEng\tCS\t8.2")
//!     .run_test()?;
//! # Ok(())
//! # }
//! ```

use crate::config::Configuration;
use crate::standalone::engine::group_by_key;
use crate::*;
use anyhow::{bail, Result};
use bytes::Bytes;
use log::debug;

fn show(kv: &KeyValue) -> String {
    format!(
        "({}, {})",
        String::from_utf8_lossy(&kv.key).escape_debug(),
        String::from_utf8_lossy(&kv.value).escape_debug()
    )
}

/// Compares outputs in order.
fn check_outputs(actual: &[KeyValue], expected: &[KeyValue]) -> Result<()> {
    if let Some(i) = actual.iter().zip(expected).position(|(a, e)| a != e) {
        bail!(
            "Output {} differs: expected {}, got {}",
            i,
            show(&expected[i]),
            show(&actual[i])
        );
    }
    if actual.len() != expected.len() {
        let extra = if actual.len() > expected.len() {
            format!("unexpected {}", show(&actual[expected.len()]))
        } else {
            format!("missing {}", show(&expected[actual.len()]))
        };
        bail!(
            "Expected {} outputs, got {}: {}",
            expected.len(),
            actual.len(),
            extra
        );
    }
    Ok(())
}

fn run_map(map_fn: MapFn, inputs: &[KeyValue], aux: &Bytes) -> Result<Vec<KeyValue>> {
    let mut outputs = Vec::new();
    for input in inputs {
        for item in map_fn(input.clone(), aux.clone())? {
            outputs.push(item?);
        }
    }
    Ok(outputs)
}

fn run_reduce(
    reduce_fn: ReduceFn,
    inputs: Vec<(Bytes, Vec<Bytes>)>,
    aux: &Bytes,
) -> Result<Vec<KeyValue>> {
    let mut outputs = Vec::new();
    for (key, values) in inputs {
        if let Some(kv) = reduce_fn(key, Box::new(values.into_iter()), aux.clone())? {
            outputs.push(kv);
        }
    }
    Ok(outputs)
}

/// Runs a map function over a list of inputs.
#[derive(Clone)]
pub struct MapDriver {
    map_fn: MapFn,
    conf: Configuration,
    inputs: Vec<KeyValue>,
    expected: Vec<KeyValue>,
}

impl MapDriver {
    pub fn new(map_fn: MapFn) -> Self {
        Self {
            map_fn,
            conf: Configuration::default(),
            inputs: Vec::new(),
            expected: Vec::new(),
        }
    }

    pub fn with_configuration(mut self, conf: Configuration) -> Self {
        self.conf = conf;
        self
    }

    pub fn with_input(mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        self.inputs.push(KeyValue::new(key, value));
        self
    }

    pub fn with_output(mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        self.expected.push(KeyValue::new(key, value));
        self
    }

    /// Maps every input in order and returns everything emitted.
    pub fn run(&self) -> Result<Vec<KeyValue>> {
        let outputs = run_map(self.map_fn, &self.inputs, &self.conf.to_aux()?)?;
        debug!("Map driver: {} inputs, {} outputs", self.inputs.len(), outputs.len());
        Ok(outputs)
    }

    pub fn run_test(&self) -> Result<()> {
        check_outputs(&self.run()?, &self.expected)
    }
}

/// Runs a reduce function over already grouped inputs.
#[derive(Clone)]
pub struct ReduceDriver {
    reduce_fn: ReduceFn,
    conf: Configuration,
    inputs: Vec<(Bytes, Vec<Bytes>)>,
    expected: Vec<KeyValue>,
}

impl ReduceDriver {
    pub fn new(reduce_fn: ReduceFn) -> Self {
        Self {
            reduce_fn,
            conf: Configuration::default(),
            inputs: Vec::new(),
            expected: Vec::new(),
        }
    }

    pub fn with_configuration(mut self, conf: Configuration) -> Self {
        self.conf = conf;
        self
    }

    /// Adds one key group. Each call is reduced separately, even if the
    /// same key is given twice.
    pub fn with_input<V>(mut self, key: impl Into<Bytes>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<Bytes>,
    {
        self.inputs
            .push((key.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    pub fn with_output(mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        self.expected.push(KeyValue::new(key, value));
        self
    }

    pub fn run(&self) -> Result<Vec<KeyValue>> {
        let outputs = run_reduce(self.reduce_fn, self.inputs.clone(), &self.conf.to_aux()?)?;
        debug!("Reduce driver: {} groups, {} outputs", self.inputs.len(), outputs.len());
        Ok(outputs)
    }

    pub fn run_test(&self) -> Result<()> {
        check_outputs(&self.run()?, &self.expected)
    }
}

/// Runs a whole workload: map, group by key, reduce.
#[derive(Clone)]
pub struct MapReduceDriver {
    workload: Workload,
    conf: Configuration,
    inputs: Vec<KeyValue>,
    expected: Vec<KeyValue>,
}

impl MapReduceDriver {
    pub fn new(workload: Workload) -> Self {
        Self {
            workload,
            conf: Configuration::default(),
            inputs: Vec::new(),
            expected: Vec::new(),
        }
    }

    pub fn with_configuration(mut self, conf: Configuration) -> Self {
        self.conf = conf;
        self
    }

    pub fn with_input(mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        self.inputs.push(KeyValue::new(key, value));
        self
    }

    pub fn with_output(mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        self.expected.push(KeyValue::new(key, value));
        self
    }

    /// Outputs come back in ascending byte order of the encoded intermediate
    /// keys.
    pub fn run(&self) -> Result<Vec<KeyValue>> {
        let aux = self.conf.to_aux()?;
        let intermediate = run_map(self.workload.map_fn, &self.inputs, &aux)?;
        let groups = group_by_key(intermediate);
        debug!("MapReduce driver: {} key groups", groups.len());
        run_reduce(self.workload.reduce_fn, groups, &aux)
    }

    pub fn run_test(&self) -> Result<()> {
        check_outputs(&self.run()?, &self.expected)
    }
}
