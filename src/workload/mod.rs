//! Converts MapReduce application names to actual application code.
//!
//! # Example
//!
//! To get the awesomeness rating application:
//! ```
//! # use anyhow::Result;
//! use mrunit::workload;
//! # fn main() -> Result<()> {
//! let app = workload::named("awesomeness")?;
//! # Ok(())
//! # }
//! ```

use crate::Workload;
use anyhow::{bail, Result};

pub mod awesomeness;

/// Gets the [`Workload`] named `name`.
///
/// Returns [`None`] if no application with the given name was found.
pub fn try_named(name: &str) -> Option<Workload> {
    match name {
        "awesomeness" => Some(Workload {
            map_fn: awesomeness::map,
            reduce_fn: awesomeness::reduce,
        }),
        _ => None,
    }
}

/// Gets the [`Workload`] named `name`.
///
/// Returns an [`anyhow::Error`] if no application with the given name was found.
pub fn named(name: &str) -> Result<Workload> {
    match try_named(name) {
        Some(app) => Ok(app),
        None => bail!("No app named `{}` found.", name),
    }
}
