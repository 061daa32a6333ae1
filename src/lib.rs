// src/lib.rs — Library root for cdrelay

pub mod api;
pub mod cli;
pub mod infra;
pub mod listener;
pub mod loadgen;
pub mod metric;
pub mod proto;
pub mod sink;
