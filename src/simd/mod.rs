pub mod distance;
pub mod avx2;

pub type DotProductFunc = unsafe fn(&[f32], &[f32]) -> f32;

/// Pick the fastest dot product kernel for this CPU.
/// Callers must pass slices of equal length.
pub fn get_dot_product() -> DotProductFunc {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            return avx2::dot_product_avx2;
        }
    }

    // Fallback
    wrapper_scalar
}

unsafe fn wrapper_scalar(a: &[f32], b: &[f32]) -> f32 {
    distance::dot_product(a, b)
}
