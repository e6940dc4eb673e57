use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use menger_fractal::DEFAULT_MAX_CUBES;
use menger_geom::Vec3;

/// Sponge parameters, loadable from TOML. Missing keys take the defaults below.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SpongeConfig {
    #[serde(default = "default_iterations")]
    pub iterations: i32,
    #[serde(default)]
    pub center: [f32; 3],
    #[serde(default = "default_half_extent")]
    pub half_extent: f32,
    /// Weld distance; derived from the leaf size when absent.
    #[serde(default)]
    pub tolerance: Option<f32>,
    /// Leaf-cube ceiling. 0 disables it.
    #[serde(default = "default_max_cubes")]
    pub max_cubes: u64,
    #[serde(default = "default_weld")]
    pub weld: bool,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_iterations() -> i32 {
    3
}
fn default_half_extent() -> f32 {
    0.5
}
fn default_max_cubes() -> u64 {
    DEFAULT_MAX_CUBES
}
fn default_weld() -> bool {
    true
}

impl Default for SpongeConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            center: [0.0; 3],
            half_extent: default_half_extent(),
            tolerance: None,
            max_cubes: default_max_cubes(),
            weld: default_weld(),
            output: None,
        }
    }
}

impl SpongeConfig {
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&s).with_context(|| format!("parsing config {}", path.display()))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        let [x, y, z] = self.center;
        Vec3::new(x, y, z)
    }

    #[inline]
    pub fn half_extent(&self) -> Vec3 {
        Vec3::splat(self.half_extent)
    }

    #[inline]
    pub fn max_cubes(&self) -> Option<u64> {
        (self.max_cubes > 0).then_some(self.max_cubes)
    }
}
