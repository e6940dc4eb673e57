//! `menger`: builds a Menger sponge mesh and optionally writes it as OBJ.
mod config;
mod export;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use config::SpongeConfig;
use menger_fractal::projected_peak_bytes;
use menger_geom::Vec3;
use menger_mesh::SpongeBuilder;

#[derive(Parser, Debug)]
#[command(name = "menger", version, about = "Generate a Menger sponge mesh")]
struct Args {
    /// TOML file with sponge parameters; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Subdivision rounds (20^n cubes).
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    iterations: Option<i32>,
    /// Half extent of the seed cube.
    #[arg(long)]
    size: Option<f32>,
    /// Seed cube center as `x,y,z`.
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    center: Option<Vec3>,
    /// Weld distance; defaults to a fraction of the leaf edge.
    #[arg(long)]
    tolerance: Option<f32>,
    /// Leaf-cube ceiling, 0 for none.
    #[arg(long)]
    max_cubes: Option<u64>,
    /// Keep every cube's corners separate.
    #[arg(long)]
    no_weld: bool,
    /// Write the mesh to this OBJ file.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let &[x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got '{s}'"));
    };
    let num = |v: &str| v.parse::<f32>().map_err(|e| format!("'{v}': {e}"));
    Ok(Vec3::new(num(x)?, num(y)?, num(z)?))
}

impl Args {
    fn resolve(&self) -> anyhow::Result<SpongeConfig> {
        let mut cfg = match &self.config {
            Some(path) => SpongeConfig::from_path(path)?,
            None => SpongeConfig::default(),
        };
        if let Some(n) = self.iterations {
            cfg.iterations = n;
        }
        if let Some(size) = self.size {
            cfg.half_extent = size;
        }
        if let Some(c) = self.center {
            cfg.center = [c.x, c.y, c.z];
        }
        if self.tolerance.is_some() {
            cfg.tolerance = self.tolerance;
        }
        if let Some(m) = self.max_cubes {
            cfg.max_cubes = m;
        }
        if self.no_weld {
            cfg.weld = false;
        }
        if self.output.is_some() {
            cfg.output = self.output.clone();
        }
        Ok(cfg)
    }
}

fn run(cfg: &SpongeConfig) -> anyhow::Result<()> {
    if let Some(bytes) = u32::try_from(cfg.iterations)
        .ok()
        .and_then(projected_peak_bytes)
    {
        log::debug!("projected peak cube memory: {bytes} bytes");
    }

    let t0 = Instant::now();
    let sponge = SpongeBuilder::new(cfg.center(), cfg.half_extent())
        .iterations(cfg.iterations)
        .tolerance(cfg.tolerance)
        .max_cubes(cfg.max_cubes())
        .weld(cfg.weld)
        .build()
        .with_context(|| format!("building sponge with {} iteration(s)", cfg.iterations))?;
    log::info!(target: "perf", "ms={} sponge_build n={}", t0.elapsed().as_millis(), cfg.iterations);

    log::info!("menger sponge of {} iteration(s)", cfg.iterations);
    log::info!("cubes: {}", sponge.cubes);
    log::info!("vertices before weld: {}", sponge.raw_vertices);
    log::info!(
        "vertices after weld: {} (merged {}, tolerance {})",
        sponge.mesh.vertex_count(),
        sponge.merged_vertices(),
        sponge.tolerance
    );
    log::info!("faces: {}", sponge.mesh.face_count());

    if let Some(path) = &cfg.output {
        let t1 = Instant::now();
        export::write_obj_file(&sponge.mesh, path)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!(target: "perf", "ms={} obj_write path={}", t1.elapsed().as_millis(), path.display());
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let cfg = args.resolve()?;
    log::debug!("config: {cfg:?}");
    run(&cfg)
}
