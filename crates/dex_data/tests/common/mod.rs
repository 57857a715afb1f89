//! Shared helpers for dex_data integration tests.
//!
//! `tree` lays out a miniature project on disk so the extractors can run
//! against real files.

#![allow(dead_code)]

pub mod tree;
