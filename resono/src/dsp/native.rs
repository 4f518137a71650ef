use itertools::izip;

pub fn add2(dst: &mut [f32], src: &[f32]) {
    for (d, s) in izip!(dst.iter_mut(), src.iter()) {
        *d += *s;
    }
}

pub fn fmadd_k3(dst: &mut [f32], src: &[f32], k: f32) {
    for (d, s) in izip!(dst.iter_mut(), src.iter()) {
        *d += *s * k;
    }
}
