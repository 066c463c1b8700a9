//! Utility helpers for tests.
//!
//! Fixture constructors shared by the integration suites: rasters with known
//! surface colours, marker layouts and a headless drive app.
pub mod app;
pub mod raster;
pub mod track;
