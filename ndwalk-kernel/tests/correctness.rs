use approx::assert_relative_eq;
use ndwalk_kernel::{
    fill_by_into, for_each, for_each_offsets, map_by_into, map_into, mask_map_into,
    mask_zip_map2_into, update_into, zip_map2_into, ArrayView, ArrayViewMut, Interleaved, Layout,
    NdArray, Order, Store, WalkConfig, WalkError,
};
use num_complex::Complex64;

fn make_tensor(rows: usize, cols: usize) -> NdArray<f64> {
    NdArray::from_fn_row_major(&[rows, cols], |idx| (idx[0] * cols + idx[1]) as f64)
}

#[test]
fn test_strided_source_picks_every_other() {
    let data = [1.0, 2.0, 3.0, 4.0, 5.0];
    let src = ArrayView::new(&data, &[3], &[2], 0, Order::RowMajor).unwrap();
    let mut out = NdArray::<f64>::zeros(&[3]);
    map_into(&mut out.view_mut(), &src, |x| x).unwrap();
    assert_eq!(out.data(), &[1.0, 3.0, 5.0]);
}

#[test]
fn test_doubling_2x2() {
    let a = NdArray::from_fn_row_major(&[2, 2], |i| (i[0] * 2 + i[1] + 1) as f64);
    let mut out = NdArray::<f64>::zeros(&[2, 2]);
    map_into(&mut out.view_mut(), &a.view(), |x| 2.0 * x).unwrap();
    assert_eq!(out.data(), &[2.0, 4.0, 6.0, 8.0]);
}

#[test]
fn test_map_into_transposed() {
    let a = make_tensor(8, 5);
    let a_t = a.view().permute(&[1, 0]).unwrap();
    let mut out = NdArray::<f64>::row_major(&[5, 8]);
    map_into(&mut out.view_mut(), &a_t, |x| x * 2.0).unwrap();
    for i in 0..5 {
        for j in 0..8 {
            assert_relative_eq!(out.get(&[i, j]), a.get(&[j, i]) * 2.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_zip_map2_row_and_col_major_inputs() {
    let a = make_tensor(6, 4);
    let b = NdArray::from_fn_col_major(&[6, 4], |i| (i[0] as f64).sin() + i[1] as f64);
    let mut out = NdArray::<f64>::col_major(&[6, 4]);
    zip_map2_into(&mut out.view_mut(), &a.view(), &b.view(), |x, y| x * y).unwrap();
    for i in 0..6 {
        for j in 0..4 {
            assert_relative_eq!(
                out.get(&[i, j]),
                a.get(&[i, j]) * b.get(&[i, j]),
                epsilon = 1e-12
            );
        }
    }
}

#[test]
fn test_interleaved_complex_elements() {
    let buf = [1.0, 2.0, 3.0, 4.0];
    let src = ArrayView::with_accessor(&buf, Layout::row_major(&[2]), Interleaved).unwrap();
    let mut seen = Vec::new();
    for_each(&src, |z: Complex64, _| seen.push(z)).unwrap();
    assert_eq!(seen, vec![Complex64::new(1.0, 2.0), Complex64::new(3.0, 4.0)]);

    let mut out = vec![0.0f64; 4];
    let mut dest =
        ArrayViewMut::with_accessor(&mut out, Layout::row_major(&[2]), Interleaved).unwrap();
    map_into(&mut dest, &src, |z: Complex64| z * Complex64::i()).unwrap();
    assert_eq!(out, vec![-2.0, 1.0, -4.0, 3.0]);
}

#[test]
fn test_interleaved_rejects_short_buffer() {
    let buf = [1.0, 2.0, 3.0];
    let res = ArrayView::with_accessor(&buf, Layout::row_major(&[2]), Interleaved);
    assert!(matches!(res, Err(WalkError::OutOfBounds { .. })));
}

#[test]
fn test_mask_all_truthy_leaves_destination() {
    let a = make_tensor(3, 4);
    let mask = NdArray::from_fn_row_major(&[3, 4], |_| true);
    let mut out = NdArray::from_fn_row_major(&[3, 4], |_| -7.0f64);
    mask_map_into(&mut out.view_mut(), &a.view(), &mask.view(), |x| x + 1.0).unwrap();
    assert!(out.data().iter().all(|&x| x == -7.0));
}

#[test]
fn test_mask_all_falsy_matches_unmasked() {
    let a = make_tensor(3, 4);
    let b = NdArray::from_fn_col_major(&[3, 4], |i| (i[0] + 2 * i[1]) as f64);
    let mask = NdArray::from_fn_col_major(&[3, 4], |_| 0.0f64);
    let mut masked = NdArray::<f64>::zeros(&[3, 4]);
    let mut plain = NdArray::<f64>::zeros(&[3, 4]);
    mask_zip_map2_into(&mut masked.view_mut(), &a.view(), &b.view(), &mask.view(), |x, y| {
        x - y
    })
    .unwrap();
    zip_map2_into(&mut plain.view_mut(), &a.view(), &b.view(), |x, y| x - y).unwrap();
    assert_eq!(masked.data(), plain.data());
}

#[test]
fn test_negative_strides_visit_same_set() {
    let a = make_tensor(4, 3);
    let flipped = a.view().reversed(0).unwrap().reversed(1).unwrap();
    let mut fwd = Vec::new();
    let mut rev = Vec::new();
    for_each(&a.view(), |x, _| fwd.push(x)).unwrap();
    for_each(&flipped, |x, _| rev.push(x)).unwrap();
    assert_eq!(rev.len(), 12);
    rev.reverse();
    assert_eq!(fwd, rev);
}

#[test]
fn test_row_and_col_major_same_pairs() {
    let shape = [3, 2, 4];
    let row = Layout::row_major(&shape);
    let col = Layout::col_major(&shape);
    let mut by_row = Vec::new();
    let mut by_col = Vec::new();
    for_each_offsets([&row, &col], &WalkConfig::default(), |v| by_row.push(*v.offsets())).unwrap();
    for_each_offsets([&col, &row], &WalkConfig::default(), |v| {
        let [c, r] = *v.offsets();
        by_col.push([r, c]);
    })
    .unwrap();
    assert_ne!(by_row, by_col);
    by_row.sort_unstable();
    by_col.sort_unstable();
    assert_eq!(by_row, by_col);
}

#[test]
fn test_first_view_order_drives_traversal() {
    let a = NdArray::from_fn_col_major(&[2, 3], |i| (i[0] * 3 + i[1]) as i32);
    let b = NdArray::from_fn_row_major(&[2, 3], |i| (i[0] * 3 + i[1]) as i32);
    let mut order = Vec::new();
    let mut out = NdArray::<i32>::zeros(&[2, 3]);
    map_by_into(&mut out.view_mut(), &a.view(), |x, v| {
        order.push(x);
        assert_eq!(v.index(), order.len() - 1);
        Store::Write(x)
    })
    .unwrap();
    assert_eq!(order, vec![0, 3, 1, 4, 2, 5]);
    order.clear();
    map_by_into(&mut out.view_mut(), &b.view(), |x, _| {
        order.push(x);
        Store::Write(x)
    })
    .unwrap();
    assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_fill_by_subscripts() {
    let mut a = NdArray::<usize>::col_major(&[3, 4]);
    fill_by_into(&mut a.view_mut(), |v| {
        let subs = v.subscripts().unwrap();
        Store::Write(subs[0] * 10 + subs[1])
    })
    .unwrap();
    for i in 0..3 {
        for j in 0..4 {
            assert_eq!(a.get(&[i, j]), i * 10 + j);
        }
    }
}

#[test]
fn test_update_into_clamps_in_place() {
    let mut a = NdArray::from_fn_row_major(&[5, 5], |i| i[0] as f64 - i[1] as f64);
    let mut flipped = a.view_mut().reversed(1).unwrap();
    update_into(&mut flipped, |x, _| {
        if x < 0.0 {
            Store::Write(0.0)
        } else {
            Store::Skip
        }
    })
    .unwrap();
    assert!(a.data().iter().all(|&x| x >= 0.0));
    assert_relative_eq!(a.get(&[4, 0]), 4.0);
}

#[test]
fn test_empty_shape_never_calls() {
    let a = NdArray::<f64>::zeros(&[3, 0, 2]);
    let mut out = NdArray::<f64>::zeros(&[3, 0, 2]);
    map_into(&mut out.view_mut(), &a.view(), |_| -> f64 {
        panic!("callback on empty walk")
    })
    .unwrap();
}

#[test]
fn test_shape_mismatch_is_error() {
    let a = NdArray::<f64>::zeros(&[2, 3]);
    let mut out = NdArray::<f64>::zeros(&[2, 3, 1]);
    let err = map_into(&mut out.view_mut(), &a.view(), |x| x).unwrap_err();
    assert!(matches!(err, WalkError::RankMismatch(3, 2)));
}

#[test]
fn test_high_rank_walk() {
    let shape = [2usize; 12];
    let a = NdArray::from_fn_row_major(&shape, |i| i.iter().sum::<usize>() as f64);
    let mut out = NdArray::<f64>::col_major(&shape);
    map_into(&mut out.view_mut(), &a.view(), |x| x * x).unwrap();
    let mut subs = [0usize; 12];
    subs[3] = 1;
    subs[11] = 1;
    assert_relative_eq!(out.get(&subs), 4.0);
    let total: f64 = out.data().iter().sum();
    let expected: f64 = a.data().iter().map(|x| x * x).sum();
    assert_relative_eq!(total, expected, epsilon = 1e-9);
}
