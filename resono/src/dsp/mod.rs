//! Bulk buffer kernels.
//!
//! Every kernel exists in a portable `native` version and, where the target has
//! them, vectorized versions. The implementations are collected into [`Backend`]
//! tables and the best one for the running CPU is picked once, see
//! [`crate::runtime`]. Call sites only ever go through a `&Backend`.

mod native;
#[cfg(target_arch = "x86_64")]
mod x86;

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Instruction set extensions relevant to the kernels.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct CpuFeatures: u32 {
        const SSE2 = 0b0001;
        const AVX = 0b0010;
    }
}

/// Dispatch table of buffer kernels.
///
/// All kernels operate on `min(dst.len(), src.len())` elements.
pub struct Backend {
    pub name: &'static str,
    /// Features the kernels in this table need.
    pub requires: CpuFeatures,
    /// `dst[i] += src[i]`
    pub add2: fn(dst: &mut [f32], src: &[f32]),
    /// `dst[i] += src[i] * k`
    pub fmadd_k3: fn(dst: &mut [f32], src: &[f32], k: f32),
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .finish()
    }
}

pub static NATIVE: Backend = Backend {
    name: "native",
    requires: CpuFeatures::empty(),
    add2: native::add2,
    fmadd_k3: native::fmadd_k3,
};

/// Probes the running CPU.
pub fn detect() -> CpuFeatures {
    #[allow(unused_mut)]
    let mut features = CpuFeatures::empty();
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("sse2") {
            features |= CpuFeatures::SSE2;
        }
        if is_x86_feature_detected!("avx") {
            features |= CpuFeatures::AVX;
        }
    }
    features
}

/// Returns all backends usable with `features`, best first. `native` is always last.
pub fn available(features: CpuFeatures) -> Vec<&'static Backend> {
    #[allow(unused_mut)]
    let mut ret: Vec<&'static Backend> = Vec::new();
    #[cfg(target_arch = "x86_64")]
    {
        for backend in [&x86::AVX, &x86::SSE] {
            if features.contains(backend.requires) {
                ret.push(backend);
            }
        }
    }
    ret.push(&NATIVE);
    ret
}

/// Picks the best backend for `features`.
pub fn select(features: CpuFeatures) -> &'static Backend {
    available(features)[0]
}
