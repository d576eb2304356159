//! Rank dispatch.
//!
//! Every walk goes through here: shapes are checked, a [`Plan`] is built and
//! the walker matching its rank is picked from a fixed table.

use log::trace;
use ndwalk_view::{Layout, WalkError};

use crate::blocked::walk_blocked;
use crate::config::WalkConfig;
use crate::plan::Plan;
use crate::walker::{Generic, Ranked, Scalar, Walker};
use crate::Result;

/// What an operation knows about its views that layouts alone do not say.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct WalkHints {
    /// Largest element size in bytes, for tiling. 0 if unknown.
    pub(crate) elem_size: usize,
    /// Index of the destination view.
    pub(crate) dest: Option<usize>,
}

impl WalkHints {
    pub(crate) fn new(elem_size: usize, dest: usize) -> Self {
        Self {
            elem_size,
            dest: Some(dest),
        }
    }
}

pub(crate) fn ensure_same_shape(a: &[usize], b: &[usize]) -> Result<()> {
    if a.len() != b.len() {
        return Err(WalkError::RankMismatch(a.len(), b.len()));
    }
    if a != b {
        return Err(WalkError::ShapeMismatch(a.to_vec(), b.to_vec()));
    }
    Ok(())
}

/// Walk `layouts` together with the default configuration.
///
/// `f` receives the visit index and one buffer offset per layout. The first
/// layout's order drives the traversal.
pub fn walk_layouts<const M: usize, F>(layouts: [&Layout; M], f: F) -> Result<()>
where
    F: FnMut(usize, &[isize; M]) -> Result<()>,
{
    walk_layouts_with(layouts, &WalkConfig::default(), f)
}

/// Walk `layouts` together under `config`.
pub fn walk_layouts_with<const M: usize, F>(
    layouts: [&Layout; M],
    config: &WalkConfig,
    f: F,
) -> Result<()>
where
    F: FnMut(usize, &[isize; M]) -> Result<()>,
{
    dispatch(layouts, config, WalkHints::default(), f)
}

pub(crate) fn dispatch<const M: usize, F>(
    layouts: [&Layout; M],
    config: &WalkConfig,
    hints: WalkHints,
    f: F,
) -> Result<()>
where
    F: FnMut(usize, &[isize; M]) -> Result<()>,
{
    let Some(primary) = layouts.first() else {
        return Ok(());
    };
    for layout in &layouts[1..] {
        ensure_same_shape(primary.shape(), layout.shape())?;
    }
    if primary.is_empty() {
        trace!("empty walk, shape {:?}", primary.shape());
        return Ok(());
    }

    let plan = Plan::new(layouts, config.fuse);
    if config.blocked {
        let block = config.block_len(hints.elem_size);
        trace!(
            "blocked walker, rank {}, dims {:?}, block {}",
            plan.rank(),
            plan.dims(),
            block
        );
        return walk_blocked(&plan, block, hints.dest, f);
    }
    walk_plan(&plan, f)
}

macro_rules! ranked_table {
    ($plan:expr, $f:expr; $($n:literal)*) => {
        match $plan.rank() {
            0 => {
                trace!("scalar walker");
                Scalar::walk($plan, $f)
            }
            $(
                $n => {
                    trace!("ranked walker, rank {}, dims {:?}", $n, $plan.dims());
                    Ranked::<$n>::walk($plan, $f)
                }
            )*
            rank => {
                trace!("generic walker, rank {}, dims {:?}", rank, $plan.dims());
                Generic::walk($plan, $f)
            }
        }
    };
}

/// Walk an already-built plan with the walker for its rank.
pub(crate) fn walk_plan<const M: usize, E, F>(plan: &Plan<M>, f: F) -> std::result::Result<(), E>
where
    F: FnMut(usize, &[isize; M]) -> std::result::Result<(), E>,
{
    // Ranks 1..=MAX_SPECIALIZED_RANK.
    ranked_table!(plan, f; 1 2 3 4 5 6 7 8)
}
