//! 2D rasterization and region-flush compositing for small bit-packed panel
//! displays.
//!
//! The crate is layered leaf-first: [`geometry`] holds pure value math,
//! [`raster`] turns shape descriptors into pixel writes, [`device`] is the
//! capability interface those writes go through, and the backends under
//! [`device`] pack pixels into page/nibble stores and flush dirty regions
//! over a [`transport`]. [`sim`] provides an in-process panel for demos and
//! wire-level tests.

pub mod bitmap;
pub mod config;
pub mod device;
pub mod geometry;
pub mod raster;
pub mod sim;
pub mod transport;
