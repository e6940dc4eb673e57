use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use menger_geom::Vec3;
use rayon::prelude::*;

use crate::cancel::CancelToken;
use crate::cube::Cube;
use crate::error::MengerError;

/// Survivors of the 3x3x3 split: 27 minus the center and the 6 face centers.
pub const CHILDREN_PER_CUBE: usize = 20;

/// Default ceiling on the leaf count: five rounds (3.2M cubes, ~380 MiB peak).
pub const DEFAULT_MAX_CUBES: u64 = 3_200_000;

/// Rounds with at least this many input cubes subdivide on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Grid offsets of the surviving children, x outermost then y then z.
fn child_offsets() -> impl Iterator<Item = Vec3> {
    (-1i8..=1).flat_map(|x| {
        (-1i8..=1).flat_map(move |y| {
            (-1i8..=1).filter_map(move |z| {
                if x.abs() + y.abs() + z.abs() <= 1 {
                    None
                } else {
                    Some(Vec3::new(f32::from(x), f32::from(y), f32::from(z)))
                }
            })
        })
    })
}

fn children(cube: &Cube) -> impl Iterator<Item = Cube> + '_ {
    let child_half = cube.half_extent() / 3.0;
    child_offsets().map(move |idx| Cube::new(cube.center() + idx * child_half * 2.0, child_half))
}

/// Splits `cube` into the 20 sub-cubes that survive one Menger step.
pub fn subdivide(cube: &Cube) -> Vec<Cube> {
    let mut out = Vec::with_capacity(CHILDREN_PER_CUBE);
    out.extend(children(cube));
    out
}

/// Leaf count after `iterations` rounds (`20^n`), or `None` on `u64` overflow.
pub fn projected_cube_count(iterations: u32) -> Option<u64> {
    (CHILDREN_PER_CUBE as u64).checked_pow(iterations)
}

/// Peak bytes held by cube buffers while running `iterations` rounds.
///
/// During the last round the previous working set and the new one are both
/// alive; that pair dominates every earlier round.
pub fn projected_peak_bytes(iterations: u32) -> Option<u64> {
    let last = projected_cube_count(iterations)?;
    let prev = match iterations {
        0 => 0,
        n => projected_cube_count(n - 1)?,
    };
    last.checked_add(prev)?
        .checked_mul(std::mem::size_of::<Cube>() as u64)
}

/// Runs [`Generator::default`] on `seed`.
///
/// Every round multiplies the cube count by 20: 4 rounds already yield 160k
/// cubes, and 5 rounds (3.2M cubes) is the most the default ceiling allows.
pub fn generate(seed: Cube, iterations: i32) -> Result<Vec<Cube>, MengerError> {
    Generator::default().generate(seed, iterations)
}

/// Called after each finished round with the round number (1-based) and the
/// cube count it produced.
pub type RoundHook = Arc<dyn Fn(u32, usize) + Send + Sync>;

/// Iterative sponge generator with a resource ceiling and optional cancellation.
#[derive(Clone)]
pub struct Generator {
    max_cubes: Option<u64>,
    cancel: Option<CancelToken>,
    parallel_threshold: usize,
    on_round: Option<RoundHook>,
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("max_cubes", &self.max_cubes)
            .field("cancel", &self.cancel)
            .field("parallel_threshold", &self.parallel_threshold)
            .field("on_round", &self.on_round.is_some())
            .finish()
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            max_cubes: Some(DEFAULT_MAX_CUBES),
            cancel: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            on_round: None,
        }
    }
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` lifts the ceiling entirely.
    pub fn max_cubes(mut self, limit: Option<u64>) -> Self {
        self.max_cubes = limit;
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn parallel_threshold(mut self, min_cubes: usize) -> Self {
        self.parallel_threshold = min_cubes;
        self
    }

    /// Progress callback; a cancel issued from it takes effect before the next round.
    pub fn on_round(mut self, hook: impl Fn(u32, usize) + Send + Sync + 'static) -> Self {
        self.on_round = Some(Arc::new(hook));
        self
    }

    /// Checks the arguments and the ceiling without allocating anything.
    /// Returns the number of rounds to run and the projected leaf count.
    pub fn plan(&self, seed: &Cube, iterations: i32) -> Result<(u32, u64), MengerError> {
        let rounds = u32::try_from(iterations).map_err(|_| {
            MengerError::invalid(format!("iterations must be >= 0, got {iterations}"))
        })?;
        validate_seed(seed)?;
        let Some(projected) = projected_cube_count(rounds) else {
            return Err(MengerError::ResourceLimitExceeded {
                what: "cubes",
                projected: u64::MAX,
                limit: self.max_cubes.unwrap_or(u64::MAX),
            });
        };
        if let Some(limit) = self.max_cubes {
            if projected > limit {
                return Err(MengerError::ResourceLimitExceeded {
                    what: "cubes",
                    projected,
                    limit,
                });
            }
        }
        if usize::try_from(projected).is_err() {
            return Err(MengerError::ResourceLimitExceeded {
                what: "cubes",
                projected,
                limit: usize::MAX as u64,
            });
        }
        Ok((rounds, projected))
    }

    /// Replaces every cube with its 20 children, `iterations` times.
    ///
    /// The leaf order is the depth-first order of [`subdivide`] applied cube by
    /// cube, whether or not a round ran in parallel.
    pub fn generate(&self, seed: Cube, iterations: i32) -> Result<Vec<Cube>, MengerError> {
        let (rounds, projected) = self.plan(&seed, iterations)?;
        let t0 = Instant::now();
        let mut cubes = vec![seed];
        for round in 0..rounds {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                log::debug!("sponge generation cancelled after {round} round(s)");
                return Err(MengerError::Cancelled {
                    completed_rounds: round,
                });
            }
            cubes = if cubes.len() >= self.parallel_threshold {
                cubes.par_iter().flat_map_iter(children).collect()
            } else {
                let mut next = Vec::with_capacity(cubes.len() * CHILDREN_PER_CUBE);
                for cube in &cubes {
                    next.extend(children(cube));
                }
                next
            };
            log::debug!("round {} -> {} cubes", round + 1, cubes.len());
            if let Some(hook) = &self.on_round {
                hook(round + 1, cubes.len());
            }
        }
        debug_assert_eq!(cubes.len() as u64, projected);
        log::info!(target: "perf", "ms={} sponge_generate rounds={} cubes={}", t0.elapsed().as_millis(), rounds, cubes.len());
        Ok(cubes)
    }
}

fn validate_seed(seed: &Cube) -> Result<(), MengerError> {
    let h = seed.half_extent();
    if !seed.center().is_finite() {
        return Err(MengerError::invalid(format!(
            "seed center must be finite, got {:?}",
            seed.center()
        )));
    }
    if !h.is_finite() || h.min_element() <= 0.0 {
        return Err(MengerError::invalid(format!(
            "seed half extent must be finite and positive, got {h:?}"
        )));
    }
    Ok(())
}
