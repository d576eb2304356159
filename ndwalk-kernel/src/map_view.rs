//! Element-wise map operations: `dest[i] = f(a[i], b[i], ...)` for one to
//! five inputs.
//!
//! Every operation checks that all views share the destination's shape, then
//! calls `f` exactly once per position and always writes the result. The
//! first source view's order drives the traversal.

use std::mem::size_of;

use ndwalk_traits::{Accessor, AccessorMut};
use ndwalk_view::{ArrayView, ArrayViewMut};

use crate::config::WalkConfig;
use crate::dispatch::{dispatch, ensure_same_shape, WalkHints};
use crate::Result;

#[cfg(feature = "parallel")]
use crate::config::MINTHREADLENGTH;
#[cfg(feature = "parallel")]
use crate::dispatch::walk_plan;
#[cfg(feature = "parallel")]
use crate::plan::Plan;
#[cfg(feature = "parallel")]
use crate::threading::{may_overlap, par_walk, SendPtr};
#[cfg(feature = "parallel")]
use log::trace;

/// Apply `f` element-wise from `src` to `dest`.
///
/// Views: `[src, dest]`.
pub fn map_into<D, A, Ad, Aa>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    src: &ArrayView<'_, A, Aa>,
    mut f: impl FnMut(Aa::Elem) -> Ad::Elem,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
{
    ensure_same_shape(dest.shape(), src.shape())?;
    let dl = dest.layout().clone();
    let elem = size_of::<Ad::Elem>().max(size_of::<Aa::Elem>());
    dispatch(
        [src.layout(), &dl],
        &WalkConfig::default(),
        WalkHints::new(elem, 1),
        |_, o| {
            let v = f(src.read(o[0]));
            dest.write(o[1], v);
            Ok(())
        },
    )
}

/// Binary element-wise operation: `dest[i] = f(a[i], b[i])`.
///
/// Views: `[a, b, dest]`.
pub fn zip_map2_into<D, A, B, Ad, Aa, Ab>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    mut f: impl FnMut(Aa::Elem, Ab::Elem) -> Ad::Elem,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
{
    ensure_same_shape(dest.shape(), a.shape())?;
    ensure_same_shape(dest.shape(), b.shape())?;
    let dl = dest.layout().clone();
    let elem = size_of::<Ad::Elem>()
        .max(size_of::<Aa::Elem>())
        .max(size_of::<Ab::Elem>());
    dispatch(
        [a.layout(), b.layout(), &dl],
        &WalkConfig::default(),
        WalkHints::new(elem, 2),
        |_, o| {
            let v = f(a.read(o[0]), b.read(o[1]));
            dest.write(o[2], v);
            Ok(())
        },
    )
}

/// Ternary element-wise operation: `dest[i] = f(a[i], b[i], c[i])`.
///
/// Views: `[a, b, c, dest]`.
pub fn zip_map3_into<D, A, B, C, Ad, Aa, Ab, Ac>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    c: &ArrayView<'_, C, Ac>,
    mut f: impl FnMut(Aa::Elem, Ab::Elem, Ac::Elem) -> Ad::Elem,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
    Ac: Accessor<C>,
{
    ensure_same_shape(dest.shape(), a.shape())?;
    ensure_same_shape(dest.shape(), b.shape())?;
    ensure_same_shape(dest.shape(), c.shape())?;
    let dl = dest.layout().clone();
    let elem = size_of::<Ad::Elem>()
        .max(size_of::<Aa::Elem>())
        .max(size_of::<Ab::Elem>())
        .max(size_of::<Ac::Elem>());
    dispatch(
        [a.layout(), b.layout(), c.layout(), &dl],
        &WalkConfig::default(),
        WalkHints::new(elem, 3),
        |_, o| {
            let v = f(a.read(o[0]), b.read(o[1]), c.read(o[2]));
            dest.write(o[3], v);
            Ok(())
        },
    )
}

/// Quaternary element-wise operation: `dest[i] = f(a[i], b[i], c[i], e[i])`.
///
/// Views: `[a, b, c, e, dest]`.
#[allow(clippy::too_many_arguments)]
pub fn zip_map4_into<D, A, B, C, E, Ad, Aa, Ab, Ac, Ae>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    c: &ArrayView<'_, C, Ac>,
    e: &ArrayView<'_, E, Ae>,
    mut f: impl FnMut(Aa::Elem, Ab::Elem, Ac::Elem, Ae::Elem) -> Ad::Elem,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
    Ac: Accessor<C>,
    Ae: Accessor<E>,
{
    ensure_same_shape(dest.shape(), a.shape())?;
    ensure_same_shape(dest.shape(), b.shape())?;
    ensure_same_shape(dest.shape(), c.shape())?;
    ensure_same_shape(dest.shape(), e.shape())?;
    let dl = dest.layout().clone();
    let elem = size_of::<Ad::Elem>()
        .max(size_of::<Aa::Elem>())
        .max(size_of::<Ab::Elem>())
        .max(size_of::<Ac::Elem>())
        .max(size_of::<Ae::Elem>());
    dispatch(
        [a.layout(), b.layout(), c.layout(), e.layout(), &dl],
        &WalkConfig::default(),
        WalkHints::new(elem, 4),
        |_, o| {
            let v = f(a.read(o[0]), b.read(o[1]), c.read(o[2]), e.read(o[3]));
            dest.write(o[4], v);
            Ok(())
        },
    )
}

/// Quinary element-wise operation: `dest[i] = f(a[i], b[i], c[i], e[i], g[i])`.
///
/// Views: `[a, b, c, e, g, dest]`.
#[allow(clippy::too_many_arguments)]
pub fn zip_map5_into<D, A, B, C, E, G, Ad, Aa, Ab, Ac, Ae, Ag>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    c: &ArrayView<'_, C, Ac>,
    e: &ArrayView<'_, E, Ae>,
    g: &ArrayView<'_, G, Ag>,
    mut f: impl FnMut(Aa::Elem, Ab::Elem, Ac::Elem, Ae::Elem, Ag::Elem) -> Ad::Elem,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
    Ac: Accessor<C>,
    Ae: Accessor<E>,
    Ag: Accessor<G>,
{
    for shape in [a.shape(), b.shape(), c.shape(), e.shape(), g.shape()] {
        ensure_same_shape(dest.shape(), shape)?;
    }
    let dl = dest.layout().clone();
    let elem = [
        size_of::<Aa::Elem>(),
        size_of::<Ab::Elem>(),
        size_of::<Ac::Elem>(),
        size_of::<Ae::Elem>(),
        size_of::<Ag::Elem>(),
    ]
    .into_iter()
    .fold(size_of::<Ad::Elem>(), usize::max);
    dispatch(
        [a.layout(), b.layout(), c.layout(), e.layout(), g.layout(), &dl],
        &WalkConfig::default(),
        WalkHints::new(elem, 5),
        |_, o| {
            let v = f(
                a.read(o[0]),
                b.read(o[1]),
                c.read(o[2]),
                e.read(o[3]),
                g.read(o[4]),
            );
            dest.write(o[5], v);
            Ok(())
        },
    )
}

// ============================================================================
// Parallel variants
// ============================================================================

/// Parallel [`map_into`] for directly indexed buffers.
///
/// Splits the outermost loop level across the rayon pool once the walk
/// exceeds [`MINTHREADLENGTH`] elements. Falls back to [`map_into`] for small
/// walks and for destinations where two positions can share a slot.
#[cfg(feature = "parallel")]
pub fn par_map_into<D, A>(
    dest: &mut ArrayViewMut<'_, D>,
    src: &ArrayView<'_, A>,
    f: impl Fn(A) -> D + Sync,
) -> Result<()>
where
    D: Copy + Send + Sync,
    A: Copy + Sync,
{
    ensure_same_shape(dest.shape(), src.shape())?;
    let dl = dest.layout().clone();
    if dl.is_empty() {
        return Ok(());
    }
    let plan = Plan::new([src.layout(), &dl], true);
    if plan.len() <= MINTHREADLENGTH || may_overlap(&dl) {
        trace!("parallel map: sequential fallback, {} elements", plan.len());
        return map_into(dest, src, f);
    }
    dl.validate(dest.data().len())?;
    let sdata = src.data();
    let dst = SendPtr::new(dest.data_mut());
    trace!("parallel map, dims {:?}", plan.dims());
    par_walk(&plan, &|leaf| {
        walk_plan(leaf, |_, o| {
            let v = f(sdata[o[0] as usize]);
            // SAFETY: offsets lie inside the validated destination layout, and
            // leaves cover disjoint positions of a non-overlapping layout.
            unsafe { dst.write(o[1] as usize, v) };
            Ok(())
        })
    })
}

/// Parallel [`zip_map2_into`] for directly indexed buffers.
#[cfg(feature = "parallel")]
pub fn par_zip_map2_into<D, A, B>(
    dest: &mut ArrayViewMut<'_, D>,
    a: &ArrayView<'_, A>,
    b: &ArrayView<'_, B>,
    f: impl Fn(A, B) -> D + Sync,
) -> Result<()>
where
    D: Copy + Send + Sync,
    A: Copy + Sync,
    B: Copy + Sync,
{
    ensure_same_shape(dest.shape(), a.shape())?;
    ensure_same_shape(dest.shape(), b.shape())?;
    let dl = dest.layout().clone();
    if dl.is_empty() {
        return Ok(());
    }
    let plan = Plan::new([a.layout(), b.layout(), &dl], true);
    if plan.len() <= MINTHREADLENGTH || may_overlap(&dl) {
        trace!("parallel zip_map2: sequential fallback, {} elements", plan.len());
        return zip_map2_into(dest, a, b, f);
    }
    dl.validate(dest.data().len())?;
    let adata = a.data();
    let bdata = b.data();
    let dst = SendPtr::new(dest.data_mut());
    trace!("parallel zip_map2, dims {:?}", plan.dims());
    par_walk(&plan, &|leaf| {
        walk_plan(leaf, |_, o| {
            let v = f(adata[o[0] as usize], bdata[o[1] as usize]);
            // SAFETY: as in `par_map_into`.
            unsafe { dst.write(o[2] as usize, v) };
            Ok(())
        })
    })
}
