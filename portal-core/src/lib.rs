//! Core engine for the animated portal navigation diagram.
//!
//! Main components:
//! - [`rng`] — seeded scalar stream for reproducible placement.
//! - [`config`] — compile-time tuning constants and validation.
//! - [`field`] — the point field and its seeding pass.
//! - [`motion`] — per-tick kinetic integration with pointer attraction.
//! - [`tessellation`] — Delaunay triangulation and clipped Voronoi geometry.
//! - [`region`] — per-category region extraction (outline, label, hit radius).
//! - [`pointer`] — pointer state and the smoothed energy scalar.
//! - [`throttle`] — rebuild pacing.
//! - [`session`] — the owned simulation context and sync layer.
//! - [`navigation`] — the navigation collaborator seam.
//! - [`error`] — startup configuration errors.

pub mod config;
pub mod error;
pub mod field;
pub mod motion;
pub mod navigation;
pub mod pointer;
pub mod region;
pub mod rng;
pub mod session;
pub mod tessellation;
pub mod throttle;
