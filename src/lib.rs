//! pkganalyzer - build order and package analyzer for .NET solutions
//!
//! This crate reads a Visual Studio solution, collects the dependencies
//! between its projects and the NuGet packages each project uses, and
//! computes a deterministic build order.
//!
//! The ordering core lives in [`graph`] and is independent of .NET: any
//! hashable identifier can be ordered with [`graph::build_graph`] and
//! [`graph::resolve`].

pub mod export;
pub mod graph;
pub mod parser;
