//! Masked operations.
//!
//! A mask view has the destination's shape. Where the mask element is truthy
//! the destination keeps its value and the callback is not called. Where it
//! is falsy the operation behaves like its unmasked counterpart.

use std::mem::size_of;

use ndwalk_traits::{Accessor, AccessorMut, Store, Truthy};
use ndwalk_view::{ArrayView, ArrayViewMut, MaskView};

use crate::config::WalkConfig;
use crate::dispatch::{dispatch, ensure_same_shape, WalkHints};
use crate::visit::Visit;
use crate::Result;

/// `dest[i] = f(src[i])` wherever `mask[i]` is falsy.
///
/// Views: `[src, mask, dest]`.
pub fn mask_map_into<D, A, M, Ad, Aa, Am>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    src: &ArrayView<'_, A, Aa>,
    mask: &MaskView<'_, M, Am>,
    mut f: impl FnMut(Aa::Elem) -> Ad::Elem,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Am: Accessor<M>,
    Am::Elem: Truthy,
{
    ensure_same_shape(dest.shape(), src.shape())?;
    ensure_same_shape(dest.shape(), mask.shape())?;
    let dl = dest.layout().clone();
    let elem = size_of::<Ad::Elem>().max(size_of::<Aa::Elem>());
    dispatch(
        [src.layout(), mask.layout(), &dl],
        &WalkConfig::default(),
        WalkHints::new(elem, 2),
        |_, o| {
            if !mask.read(o[1]).is_truthy() {
                dest.write(o[2], f(src.read(o[0])));
            }
            Ok(())
        },
    )
}

/// `dest[i] = f(a[i], b[i])` wherever `mask[i]` is falsy.
///
/// Views: `[a, b, mask, dest]`.
pub fn mask_zip_map2_into<D, A, B, M, Ad, Aa, Ab, Am>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    mask: &MaskView<'_, M, Am>,
    mut f: impl FnMut(Aa::Elem, Ab::Elem) -> Ad::Elem,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
    Am: Accessor<M>,
    Am::Elem: Truthy,
{
    ensure_same_shape(dest.shape(), a.shape())?;
    ensure_same_shape(dest.shape(), b.shape())?;
    ensure_same_shape(dest.shape(), mask.shape())?;
    let dl = dest.layout().clone();
    let elem = size_of::<Ad::Elem>()
        .max(size_of::<Aa::Elem>())
        .max(size_of::<Ab::Elem>());
    dispatch(
        [a.layout(), b.layout(), mask.layout(), &dl],
        &WalkConfig::default(),
        WalkHints::new(elem, 3),
        |_, o| {
            if !mask.read(o[2]).is_truthy() {
                dest.write(o[3], f(a.read(o[0]), b.read(o[1])));
            }
            Ok(())
        },
    )
}

/// `dest[i] = f(a[i], b[i], c[i])` wherever `mask[i]` is falsy.
///
/// Views: `[a, b, c, mask, dest]`.
pub fn mask_zip_map3_into<D, A, B, C, M, Ad, Aa, Ab, Ac, Am>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    c: &ArrayView<'_, C, Ac>,
    mask: &MaskView<'_, M, Am>,
    mut f: impl FnMut(Aa::Elem, Ab::Elem, Ac::Elem) -> Ad::Elem,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
    Ac: Accessor<C>,
    Am: Accessor<M>,
    Am::Elem: Truthy,
{
    ensure_same_shape(dest.shape(), a.shape())?;
    ensure_same_shape(dest.shape(), b.shape())?;
    ensure_same_shape(dest.shape(), c.shape())?;
    ensure_same_shape(dest.shape(), mask.shape())?;
    let dl = dest.layout().clone();
    let elem = size_of::<Ad::Elem>()
        .max(size_of::<Aa::Elem>())
        .max(size_of::<Ab::Elem>())
        .max(size_of::<Ac::Elem>());
    dispatch(
        [a.layout(), b.layout(), c.layout(), mask.layout(), &dl],
        &WalkConfig::default(),
        WalkHints::new(elem, 4),
        |_, o| {
            if !mask.read(o[3]).is_truthy() {
                dest.write(o[4], f(a.read(o[0]), b.read(o[1]), c.read(o[2])));
            }
            Ok(())
        },
    )
}

/// `dest[i] = f(a[i], b[i], c[i], e[i])` wherever `mask[i]` is falsy.
///
/// Views: `[a, b, c, e, mask, dest]`.
#[allow(clippy::too_many_arguments)]
pub fn mask_zip_map4_into<D, A, B, C, G, M, Ad, Aa, Ab, Ac, Ag, Am>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    c: &ArrayView<'_, C, Ac>,
    e: &ArrayView<'_, G, Ag>,
    mask: &MaskView<'_, M, Am>,
    mut f: impl FnMut(Aa::Elem, Ab::Elem, Ac::Elem, Ag::Elem) -> Ad::Elem,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
    Ac: Accessor<C>,
    Ag: Accessor<G>,
    Am: Accessor<M>,
    Am::Elem: Truthy,
{
    ensure_same_shape(dest.shape(), a.shape())?;
    ensure_same_shape(dest.shape(), b.shape())?;
    ensure_same_shape(dest.shape(), c.shape())?;
    ensure_same_shape(dest.shape(), e.shape())?;
    ensure_same_shape(dest.shape(), mask.shape())?;
    let dl = dest.layout().clone();
    let elem = size_of::<Ad::Elem>()
        .max(size_of::<Aa::Elem>())
        .max(size_of::<Ab::Elem>())
        .max(size_of::<Ac::Elem>())
        .max(size_of::<Ag::Elem>());
    dispatch(
        [a.layout(), b.layout(), c.layout(), e.layout(), mask.layout(), &dl],
        &WalkConfig::default(),
        WalkHints::new(elem, 5),
        |_, o| {
            if !mask.read(o[4]).is_truthy() {
                let v = f(a.read(o[0]), b.read(o[1]), c.read(o[2]), e.read(o[3]));
                dest.write(o[5], v);
            }
            Ok(())
        },
    )
}

/// Masked [`crate::map_by_into`]: the callback runs only where `mask[i]` is
/// falsy, and may still return [`Store::Skip`].
///
/// Views: `[src, mask, dest]`.
pub fn mask_map_by_into<D, A, M, Ad, Aa, Am>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    src: &ArrayView<'_, A, Aa>,
    mask: &MaskView<'_, M, Am>,
    mut clbk: impl FnMut(Aa::Elem, &Visit<'_, 3>) -> Store<Ad::Elem>,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Am: Accessor<M>,
    Am::Elem: Truthy,
{
    ensure_same_shape(dest.shape(), src.shape())?;
    ensure_same_shape(dest.shape(), mask.shape())?;
    let dl = dest.layout().clone();
    let layouts = [src.layout(), mask.layout(), &dl];
    let elem = size_of::<Ad::Elem>().max(size_of::<Aa::Elem>());
    dispatch(
        layouts,
        &WalkConfig::default(),
        WalkHints::new(elem, 2),
        |i, o| {
            if mask.read(o[1]).is_truthy() {
                return Ok(());
            }
            if let Store::Write(v) = clbk(src.read(o[0]), &Visit::new(i, *o, layouts)) {
                dest.write(o[2], v);
            }
            Ok(())
        },
    )
}
