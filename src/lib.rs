//! Loteamento Server Library
//!
//! This crate exposes the extraction engine for benchmarking and testing.
//! The server binary is in main.rs.

pub mod extract;
