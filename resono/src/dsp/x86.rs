use std::arch::x86_64::*;

use super::{native, Backend, CpuFeatures};

pub static SSE: Backend = Backend {
    name: "sse",
    requires: CpuFeatures::SSE2,
    add2: sse::add2,
    fmadd_k3: sse::fmadd_k3,
};

pub static AVX: Backend = Backend {
    name: "avx",
    requires: CpuFeatures::SSE2.union(CpuFeatures::AVX),
    add2: avx::add2,
    fmadd_k3: avx::fmadd_k3,
};

// SSE2 is part of the x86_64 baseline so these are always safe to call
mod sse {
    use super::*;

    pub fn add2(dst: &mut [f32], src: &[f32]) {
        let count = dst.len().min(src.len());
        let body = count - count % 4;
        unsafe {
            for i in (0..body).step_by(4) {
                let d = _mm_loadu_ps(dst.as_ptr().add(i));
                let s = _mm_loadu_ps(src.as_ptr().add(i));
                _mm_storeu_ps(dst.as_mut_ptr().add(i), _mm_add_ps(d, s));
            }
        }
        native::add2(&mut dst[body..count], &src[body..count]);
    }

    pub fn fmadd_k3(dst: &mut [f32], src: &[f32], k: f32) {
        let count = dst.len().min(src.len());
        let body = count - count % 4;
        unsafe {
            let vk = _mm_set1_ps(k);
            for i in (0..body).step_by(4) {
                let d = _mm_loadu_ps(dst.as_ptr().add(i));
                let s = _mm_loadu_ps(src.as_ptr().add(i));
                _mm_storeu_ps(dst.as_mut_ptr().add(i), _mm_add_ps(d, _mm_mul_ps(s, vk)));
            }
        }
        native::fmadd_k3(&mut dst[body..count], &src[body..count], k);
    }
}

// The table is only handed out after AVX has been detected, see `dsp::available`
mod avx {
    use super::*;

    pub fn add2(dst: &mut [f32], src: &[f32]) {
        unsafe { add2_impl(dst, src) }
    }

    pub fn fmadd_k3(dst: &mut [f32], src: &[f32], k: f32) {
        unsafe { fmadd_k3_impl(dst, src, k) }
    }

    #[target_feature(enable = "avx")]
    unsafe fn add2_impl(dst: &mut [f32], src: &[f32]) {
        let count = dst.len().min(src.len());
        let body = count - count % 8;
        for i in (0..body).step_by(8) {
            let d = _mm256_loadu_ps(dst.as_ptr().add(i));
            let s = _mm256_loadu_ps(src.as_ptr().add(i));
            _mm256_storeu_ps(dst.as_mut_ptr().add(i), _mm256_add_ps(d, s));
        }
        super::sse::add2(&mut dst[body..count], &src[body..count]);
    }

    #[target_feature(enable = "avx")]
    unsafe fn fmadd_k3_impl(dst: &mut [f32], src: &[f32], k: f32) {
        let count = dst.len().min(src.len());
        let body = count - count % 8;
        let vk = _mm256_set1_ps(k);
        for i in (0..body).step_by(8) {
            let d = _mm256_loadu_ps(dst.as_ptr().add(i));
            let s = _mm256_loadu_ps(src.as_ptr().add(i));
            _mm256_storeu_ps(
                dst.as_mut_ptr().add(i),
                _mm256_add_ps(d, _mm256_mul_ps(s, vk)),
            );
        }
        super::sse::fmadd_k3(&mut dst[body..count], &src[body..count], k);
    }
}
