//! Callback-with-metadata operations for one to four inputs.
//!
//! The callback sees the element value(s) and a [`Visit`] describing the
//! position, and returns a [`Store`]: `Write(v)` stores `v`, `Skip` leaves the
//! destination element as it was. Fallible variants stop at the first error;
//! elements already written stay written.

use std::error::Error;
use std::mem::size_of;

use ndwalk_traits::{Accessor, AccessorMut, Store};
use ndwalk_view::{ArrayView, ArrayViewMut, Layout, WalkError};

use crate::config::WalkConfig;
use crate::dispatch::{dispatch, ensure_same_shape, WalkHints};
use crate::visit::Visit;
use crate::Result;

/// `dest[i] = clbk(src[i], visit)` where the callback chooses to write.
///
/// Views: `[src, dest]`.
pub fn map_by_into<D, A, Ad, Aa>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    src: &ArrayView<'_, A, Aa>,
    mut clbk: impl FnMut(Aa::Elem, &Visit<'_, 2>) -> Store<Ad::Elem>,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
{
    try_map_by_into(dest, src, |x, v| Ok::<_, WalkError>(clbk(x, v)))
}

/// Fallible [`map_by_into`]. A callback error is returned as
/// [`WalkError::Callback`].
pub fn try_map_by_into<D, A, Ad, Aa, E>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    src: &ArrayView<'_, A, Aa>,
    mut clbk: impl FnMut(Aa::Elem, &Visit<'_, 2>) -> std::result::Result<Store<Ad::Elem>, E>,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    ensure_same_shape(dest.shape(), src.shape())?;
    let dl = dest.layout().clone();
    let layouts = [src.layout(), &dl];
    let elem = size_of::<Ad::Elem>().max(size_of::<Aa::Elem>());
    dispatch(
        layouts,
        &WalkConfig::default(),
        WalkHints::new(elem, 1),
        |i, o| {
            let visit = Visit::new(i, *o, layouts);
            match clbk(src.read(o[0]), &visit) {
                Ok(Store::Write(v)) => dest.write(o[1], v),
                Ok(Store::Skip) => {}
                Err(e) => return Err(callback_error(e)),
            }
            Ok(())
        },
    )
}

/// `dest[i] = clbk(a[i], b[i], visit)` where the callback chooses to write.
///
/// Views: `[a, b, dest]`.
pub fn zip_map2_by_into<D, A, B, Ad, Aa, Ab>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    mut clbk: impl FnMut(Aa::Elem, Ab::Elem, &Visit<'_, 3>) -> Store<Ad::Elem>,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
{
    try_zip_map2_by_into(dest, a, b, |x, y, v| Ok::<_, WalkError>(clbk(x, y, v)))
}

/// Fallible [`zip_map2_by_into`].
pub fn try_zip_map2_by_into<D, A, B, Ad, Aa, Ab, E>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    mut clbk: impl FnMut(Aa::Elem, Ab::Elem, &Visit<'_, 3>) -> std::result::Result<Store<Ad::Elem>, E>,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    ensure_same_shape(dest.shape(), a.shape())?;
    ensure_same_shape(dest.shape(), b.shape())?;
    let dl = dest.layout().clone();
    let layouts = [a.layout(), b.layout(), &dl];
    let elem = size_of::<Ad::Elem>()
        .max(size_of::<Aa::Elem>())
        .max(size_of::<Ab::Elem>());
    dispatch(
        layouts,
        &WalkConfig::default(),
        WalkHints::new(elem, 2),
        |i, o| {
            let visit = Visit::new(i, *o, layouts);
            match clbk(a.read(o[0]), b.read(o[1]), &visit) {
                Ok(Store::Write(v)) => dest.write(o[2], v),
                Ok(Store::Skip) => {}
                Err(e) => return Err(callback_error(e)),
            }
            Ok(())
        },
    )
}

/// `dest[i] = clbk(a[i], b[i], c[i], visit)` where the callback chooses to
/// write.
///
/// Views: `[a, b, c, dest]`.
pub fn zip_map3_by_into<D, A, B, C, Ad, Aa, Ab, Ac>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    c: &ArrayView<'_, C, Ac>,
    mut clbk: impl FnMut(Aa::Elem, Ab::Elem, Ac::Elem, &Visit<'_, 4>) -> Store<Ad::Elem>,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
    Ac: Accessor<C>,
{
    try_zip_map3_by_into(dest, a, b, c, |x, y, z, v| {
        Ok::<_, WalkError>(clbk(x, y, z, v))
    })
}

/// Fallible [`zip_map3_by_into`].
pub fn try_zip_map3_by_into<D, A, B, C, Ad, Aa, Ab, Ac, E>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    c: &ArrayView<'_, C, Ac>,
    mut clbk: impl FnMut(
        Aa::Elem,
        Ab::Elem,
        Ac::Elem,
        &Visit<'_, 4>,
    ) -> std::result::Result<Store<Ad::Elem>, E>,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
    Ac: Accessor<C>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    ensure_same_shape(dest.shape(), a.shape())?;
    ensure_same_shape(dest.shape(), b.shape())?;
    ensure_same_shape(dest.shape(), c.shape())?;
    let dl = dest.layout().clone();
    let layouts = [a.layout(), b.layout(), c.layout(), &dl];
    let elem = size_of::<Ad::Elem>()
        .max(size_of::<Aa::Elem>())
        .max(size_of::<Ab::Elem>())
        .max(size_of::<Ac::Elem>());
    dispatch(
        layouts,
        &WalkConfig::default(),
        WalkHints::new(elem, 3),
        |i, o| {
            let visit = Visit::new(i, *o, layouts);
            match clbk(a.read(o[0]), b.read(o[1]), c.read(o[2]), &visit) {
                Ok(Store::Write(v)) => dest.write(o[3], v),
                Ok(Store::Skip) => {}
                Err(e) => return Err(callback_error(e)),
            }
            Ok(())
        },
    )
}

/// `dest[i] = clbk(a[i], b[i], c[i], e[i], visit)` where the callback chooses
/// to write.
///
/// Views: `[a, b, c, e, dest]`.
#[allow(clippy::too_many_arguments)]
pub fn zip_map4_by_into<D, A, B, C, G, Ad, Aa, Ab, Ac, Ag>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    c: &ArrayView<'_, C, Ac>,
    e: &ArrayView<'_, G, Ag>,
    mut clbk: impl FnMut(Aa::Elem, Ab::Elem, Ac::Elem, Ag::Elem, &Visit<'_, 5>) -> Store<Ad::Elem>,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
    Ac: Accessor<C>,
    Ag: Accessor<G>,
{
    try_zip_map4_by_into(dest, a, b, c, e, |w, x, y, z, v| {
        Ok::<_, WalkError>(clbk(w, x, y, z, v))
    })
}

/// Fallible [`zip_map4_by_into`].
#[allow(clippy::too_many_arguments)]
pub fn try_zip_map4_by_into<D, A, B, C, G, Ad, Aa, Ab, Ac, Ag, E>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    a: &ArrayView<'_, A, Aa>,
    b: &ArrayView<'_, B, Ab>,
    c: &ArrayView<'_, C, Ac>,
    e: &ArrayView<'_, G, Ag>,
    mut clbk: impl FnMut(
        Aa::Elem,
        Ab::Elem,
        Ac::Elem,
        Ag::Elem,
        &Visit<'_, 5>,
    ) -> std::result::Result<Store<Ad::Elem>, E>,
) -> Result<()>
where
    Ad: AccessorMut<D>,
    Aa: Accessor<A>,
    Ab: Accessor<B>,
    Ac: Accessor<C>,
    Ag: Accessor<G>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    ensure_same_shape(dest.shape(), a.shape())?;
    ensure_same_shape(dest.shape(), b.shape())?;
    ensure_same_shape(dest.shape(), c.shape())?;
    ensure_same_shape(dest.shape(), e.shape())?;
    let dl = dest.layout().clone();
    let layouts = [a.layout(), b.layout(), c.layout(), e.layout(), &dl];
    let elem = size_of::<Ad::Elem>()
        .max(size_of::<Aa::Elem>())
        .max(size_of::<Ab::Elem>())
        .max(size_of::<Ac::Elem>())
        .max(size_of::<Ag::Elem>());
    dispatch(
        layouts,
        &WalkConfig::default(),
        WalkHints::new(elem, 4),
        |i, o| {
            let visit = Visit::new(i, *o, layouts);
            match clbk(a.read(o[0]), b.read(o[1]), c.read(o[2]), e.read(o[3]), &visit) {
                Ok(Store::Write(v)) => dest.write(o[4], v),
                Ok(Store::Skip) => {}
                Err(err) => return Err(callback_error(err)),
            }
            Ok(())
        },
    )
}

/// Update `view` in place: each element is replaced by what `clbk` returns
/// for it, unless it returns [`Store::Skip`].
///
/// Views: `[view]`.
pub fn update_into<S, A>(
    view: &mut ArrayViewMut<'_, S, A>,
    mut clbk: impl FnMut(A::Elem, &Visit<'_, 1>) -> Store<A::Elem>,
) -> Result<()>
where
    A: AccessorMut<S>,
{
    let layout = view.layout().clone();
    let layouts = [&layout];
    dispatch(
        layouts,
        &WalkConfig::default(),
        WalkHints::new(size_of::<A::Elem>(), 0),
        |i, o| {
            let x = view.read(o[0]);
            if let Store::Write(v) = clbk(x, &Visit::new(i, *o, layouts)) {
                view.write(o[0], v);
            }
            Ok(())
        },
    )
}

/// Read-only traversal of `view` in its own order.
///
/// Views: `[view]`.
pub fn for_each<S, A>(
    view: &ArrayView<'_, S, A>,
    mut f: impl FnMut(A::Elem, &Visit<'_, 1>),
) -> Result<()>
where
    A: Accessor<S>,
{
    let layouts = [view.layout()];
    dispatch(
        layouts,
        &WalkConfig::default(),
        WalkHints::new(size_of::<A::Elem>(), 0),
        |i, o| {
            f(view.read(o[0]), &Visit::new(i, *o, layouts));
            Ok(())
        },
    )
}

/// Walk `layouts` together under `config`, handing each position's offsets
/// to `f`. The first layout's order drives the traversal.
pub fn for_each_offsets<const M: usize>(
    layouts: [&Layout; M],
    config: &WalkConfig,
    mut f: impl FnMut(&Visit<'_, M>),
) -> Result<()> {
    dispatch(layouts, config, WalkHints::default(), |i, o| {
        f(&Visit::new(i, *o, layouts));
        Ok(())
    })
}

fn callback_error<E: Into<Box<dyn Error + Send + Sync>>>(e: E) -> WalkError {
    let boxed: Box<dyn Error + Send + Sync> = e.into();
    // Errors raised by nested walks pass through unchanged.
    match boxed.downcast::<WalkError>() {
        Ok(walk) => *walk,
        Err(other) => WalkError::Callback(other),
    }
}
