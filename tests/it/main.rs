mod batch;
mod common;
mod config;
mod row_classifier;
mod table;

#[allow(unused_imports)]
use anyhow::{anyhow, bail, Error, Result};
