//! Nullary operations: fill a destination from a generator.

use std::mem::size_of;

use ndwalk_traits::{AccessorMut, Store};
use ndwalk_view::ArrayViewMut;

use crate::config::WalkConfig;
use crate::dispatch::{dispatch, WalkHints};
use crate::visit::Visit;
use crate::Result;

/// Write `f()` to every element of `dest`, in `dest`'s order.
pub fn fill_into<D, Ad>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    mut f: impl FnMut() -> Ad::Elem,
) -> Result<()>
where
    Ad: AccessorMut<D>,
{
    let dl = dest.layout().clone();
    dispatch(
        [&dl],
        &WalkConfig::default(),
        WalkHints::new(size_of::<Ad::Elem>(), 0),
        |_, o| {
            dest.write(o[0], f());
            Ok(())
        },
    )
}

/// Call `clbk` for every element of `dest` and store what it returns.
/// [`Store::Skip`] leaves the element untouched.
///
/// Views: `[dest]`.
pub fn fill_by_into<D, Ad>(
    dest: &mut ArrayViewMut<'_, D, Ad>,
    mut clbk: impl FnMut(&Visit<'_, 1>) -> Store<Ad::Elem>,
) -> Result<()>
where
    Ad: AccessorMut<D>,
{
    let dl = dest.layout().clone();
    let layouts = [&dl];
    dispatch(
        layouts,
        &WalkConfig::default(),
        WalkHints::new(size_of::<Ad::Elem>(), 0),
        |i, o| {
            if let Store::Write(v) = clbk(&Visit::new(i, *o, layouts)) {
                dest.write(o[0], v);
            }
            Ok(())
        },
    )
}
