//! SIMD kernels using the wide crate for true vectorization.

use wide::{f32x8, f64x4};

#[inline]
fn load(values: &[f32], start: usize) -> f32x8 {
    f32x8::new([
        values[start],
        values[start + 1],
        values[start + 2],
        values[start + 3],
        values[start + 4],
        values[start + 5],
        values[start + 6],
        values[start + 7],
    ])
}

/// SIMD-optimized dot product for vectors.
///
/// Panics if the slices differ in length; callers validate dimensions first.
pub fn dot_product_simd(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len());

    let mut sum = f32x8::splat(0.0);
    let chunks = a.len() / 8;

    for i in 0..chunks {
        let start = i * 8;
        sum += load(a, start) * load(b, start);
    }

    // Sum the SIMD register
    let mut result = sum.to_array().iter().sum::<f32>();

    // Handle remaining elements
    for i in (chunks * 8)..a.len() {
        result += a[i] * b[i];
    }

    result
}

#[inline]
fn load_wide(values: &[f32], start: usize) -> f64x4 {
    f64x4::new([
        f64::from(values[start]),
        f64::from(values[start + 1]),
        f64::from(values[start + 2]),
        f64::from(values[start + 3]),
    ])
}

/// Dot product accumulated in `f64` lanes.
///
/// Products of two `f32` values are exact in `f64`, so distance algebra built
/// on this kernel only loses precision in the running sums.
pub fn dot_product_wide(a: &[f32], b: &[f32]) -> f64 {
    assert_eq!(a.len(), b.len());

    let mut sum = f64x4::splat(0.0);
    let chunks = a.len() / 4;

    for i in 0..chunks {
        let start = i * 4;
        sum += load_wide(a, start) * load_wide(b, start);
    }

    let mut result = sum.to_array().iter().sum::<f64>();

    for i in (chunks * 4)..a.len() {
        result += f64::from(a[i]) * f64::from(b[i]);
    }

    result
}

/// Squared L2 norm accumulated in `f64` lanes.
pub fn squared_norm_wide(vector: &[f32]) -> f64 {
    let mut sum_squares = f64x4::splat(0.0);
    let chunks = vector.len() / 4;

    for i in 0..chunks {
        let v = load_wide(vector, i * 4);
        sum_squares += v * v;
    }

    let mut result = sum_squares.to_array().iter().sum::<f64>();

    for &val in &vector[chunks * 4..] {
        result += f64::from(val) * f64::from(val);
    }

    result
}
