//! Core library for the `stress` CLI.
//!
//! Targets are parsed into [`targets::Targets`], sent by an
//! [`attack::Attacker`] at a fixed rate or a fixed concurrency, collected as
//! timestamp-sorted [`results::Results`], and rendered by a
//! [`report::Reporter`]. The `stress` binary wires these together behind the
//! `attack` and `report` subcommands.
pub mod args;
pub mod attack;
pub mod config;
pub mod error;
pub mod report;
pub mod results;
pub mod targets;
