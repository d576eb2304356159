use std::convert::Infallible;

use ndwalk_kernel::{
    for_each_offsets, increments, walk_layouts, Generic, Layout, Order, Plan, WalkConfig, Walker,
};
use proptest::prelude::*;

type Visits<const M: usize> = Vec<(usize, [isize; M])>;

fn dispatched<const M: usize>(layouts: [&Layout; M], config: &WalkConfig) -> Visits<M> {
    let mut out = Vec::new();
    for_each_offsets(layouts, config, |v| out.push((v.index(), *v.offsets()))).unwrap();
    out
}

fn generic<const M: usize>(layouts: [&Layout; M]) -> Visits<M> {
    let plan = Plan::new(layouts, false);
    let mut out = Vec::new();
    if plan.is_empty() {
        return out;
    }
    Generic::walk(&plan, |i, o| {
        out.push((i, *o));
        Ok::<(), Infallible>(())
    })
    .unwrap();
    out
}

/// Strided layout with padding between rows and an optional flip per axis.
fn padded(shape: &[usize], order: Order, pad: usize, flips: &[bool]) -> Layout {
    let rank = shape.len();
    let mut strides = vec![0isize; rank];
    let mut acc = 1isize;
    for k in 0..rank {
        let d = order.dim_at(rank, k);
        strides[d] = acc;
        acc *= shape[d].max(1) as isize + pad as isize;
    }
    let mut layout = Layout::new(shape, &strides, 0, order).unwrap();
    for (axis, &flip) in flips.iter().enumerate().take(rank) {
        if flip {
            layout = layout.reversed(axis).unwrap();
        }
    }
    layout
}

fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop_oneof![
        prop::collection::vec(0usize..=4, 0..=5),
        prop::collection::vec(1usize..=2, 6..=11),
    ]
}

fn order_strategy() -> impl Strategy<Value = Order> {
    prop_oneof![Just(Order::RowMajor), Just(Order::ColMajor)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn visit_count_is_shape_product(shape in shape_strategy(), order in order_strategy()) {
        let layout = match order {
            Order::RowMajor => Layout::row_major(&shape),
            Order::ColMajor => Layout::col_major(&shape),
        };
        let mut n = 0usize;
        walk_layouts([&layout], |i, _| {
            assert_eq!(i, n);
            n += 1;
            Ok(())
        })
        .unwrap();
        prop_assert_eq!(n, shape.iter().product::<usize>());
    }

    #[test]
    fn every_offset_visited_once(shape in shape_strategy(), order in order_strategy()) {
        let layout = match order {
            Order::RowMajor => Layout::row_major(&shape),
            Order::ColMajor => Layout::col_major(&shape),
        };
        let mut seen: Vec<isize> = dispatched([&layout], &WalkConfig::default())
            .into_iter()
            .map(|(_, [o])| o)
            .collect();
        seen.sort_unstable();
        let expected: Vec<isize> = (0..layout.len() as isize).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn dispatch_matches_generic(
        shape in shape_strategy(),
        a_order in order_strategy(),
        b_order in order_strategy(),
        pad in 0usize..3,
        flips in prop::collection::vec(any::<bool>(), 11),
    ) {
        let a = padded(&shape, a_order, pad, &flips);
        let b = padded(&shape, b_order, 0, &[]);
        let fused = dispatched([&a, &b], &WalkConfig::default());
        let plain = dispatched([&a, &b], &WalkConfig { fuse: false, ..WalkConfig::default() });
        let reference = generic([&a, &b]);
        prop_assert_eq!(&fused, &reference);
        prop_assert_eq!(&plain, &reference);
    }

    #[test]
    fn blocked_visits_same_pairs(
        shape in shape_strategy(),
        a_order in order_strategy(),
        b_order in order_strategy(),
        block_bytes in 1usize..64,
    ) {
        let a = padded(&shape, a_order, 1, &[]);
        let b = padded(&shape, b_order, 0, &[]);
        let config = WalkConfig { blocked: true, block_bytes, ..WalkConfig::default() };
        let mut blocked = dispatched([&a, &b], &config);
        blocked.sort_unstable();
        let reference = generic([&a, &b]);
        prop_assert_eq!(blocked, reference);
    }

    #[test]
    fn subscripts_address_offsets(shape in shape_strategy(), order in order_strategy()) {
        let layout = padded(&shape, order, 1, &[true]);
        for_each_offsets([&layout], &WalkConfig::default(), |v| {
            let subs = v.subscripts().unwrap();
            assert_eq!(layout.index_of(&subs), v.offset(0));
        })
        .unwrap();
    }

    #[test]
    fn increments_reproduce_walk(
        shape in prop::collection::vec(1usize..=4, 1..=6),
        order in order_strategy(),
        pad in 0usize..3,
    ) {
        let layout = padded(&shape, order, pad, &[]);
        let incs = increments(layout.shape(), layout.strides(), order);
        let rank = shape.len();
        let dims: Vec<usize> = (0..rank).map(|k| shape[order.dim_at(rank, k)]).collect();

        // Odometer driven only by the increments: every level steps past its
        // end before the next level advances.
        let mut off = layout.offset() as isize;
        let mut counters = vec![0usize; rank];
        let mut stepped = Vec::new();
        'outer: loop {
            for _ in 0..dims[0] {
                stepped.push(off);
                off += incs[0];
            }
            for k in 1..rank {
                off += incs[k];
                counters[k] += 1;
                if counters[k] < dims[k] {
                    continue 'outer;
                }
                counters[k] = 0;
            }
            break;
        }

        let walked: Vec<isize> = dispatched([&layout], &WalkConfig { fuse: false, ..WalkConfig::default() })
            .into_iter()
            .map(|(_, [o])| o)
            .collect();
        prop_assert_eq!(stepped, walked);
    }
}
