//! kbpack - knowledge base package builder.
//!
//! Stages a content package into the directory layout the external
//! packager expects, then runs the packager to produce a `.kb` archive.

pub mod commands;
pub mod common;
pub mod config;
pub mod eol;
pub mod metainfo;
pub mod origin;
pub mod package;
pub mod packager;
pub mod pipeline;
pub mod preflight;
pub mod prefix;
pub mod process;
pub mod prune;
pub mod staging;
pub mod timing;
