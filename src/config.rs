//! Panel profiles.
//!
//! A profile describes a concrete panel well enough to construct the right
//! backend: geometry, color depth, bus address, and the staging capacity
//! used by clipped blits. Profiles persist as JSON so a demo setup can be
//! edited without recompiling.

use crate::bitmap::DEFAULT_STAGING_CAPACITY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorDepth {
    /// 1 bit per pixel, page-packed.
    Mono,
    /// 4 bits per pixel, nibble-packed.
    Grey4,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelProfile {
    pub name: String,
    pub width: u16,
    pub height: u16,
    pub depth: ColorDepth,
    /// 7-bit transport address.
    pub address: u8,
    pub staging_capacity: usize,
}

impl PanelProfile {
    pub fn new(name: impl Into<String>, width: u16, height: u16, depth: ColorDepth) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            depth,
            address: 0x3C,
            staging_capacity: DEFAULT_STAGING_CAPACITY,
        }
    }

    /// The common 128x64 monochrome module.
    pub fn mono_128x64() -> Self {
        Self::new("mono-128x64", 128, 64, ColorDepth::Mono)
    }

    /// The common 128x96 greyscale module.
    pub fn grey_128x96() -> Self {
        let mut profile = Self::new("grey-128x96", 128, 96, ColorDepth::Grey4);
        profile.address = 0x3D;
        profile
    }

    /// Save profile to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Load profile from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }
}

impl Default for PanelProfile {
    fn default() -> Self {
        Self::mono_128x64()
    }
}
