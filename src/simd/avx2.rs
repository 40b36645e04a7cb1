#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Inner product of two equal-length slices (AVX2 + FMA).
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn dot_product_avx2(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    let mut sum256 = _mm256_setzero_ps();
    let mut i = 0;

    // Process 8 floats at a time
    while i + 8 <= n {
        let a_vec = _mm256_loadu_ps(a.as_ptr().add(i));
        let b_vec = _mm256_loadu_ps(b.as_ptr().add(i));
        // FMA: sum = sum + a * b
        sum256 = _mm256_fmadd_ps(a_vec, b_vec, sum256);
        i += 8;
    }

    // Reduce to 128 bits
    let sum128 = _mm_add_ps(_mm256_castps256_ps128(sum256), _mm256_extractf128_ps(sum256, 1));
    let sum128 = _mm_hadd_ps(sum128, sum128);
    let sum128 = _mm_hadd_ps(sum128, sum128);

    let mut sum = _mm_cvtss_f32(sum128);

    // 18 dims leaves a tail of 2
    while i < n {
        sum += a[i] * b[i];
        i += 1;
    }

    sum
}
