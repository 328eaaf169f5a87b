//! Command line front end for the nonresident filing core.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod w2_csv;
