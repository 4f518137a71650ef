#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use resono::{Material, OrderRange, RayTraceSettings, SharedBuffer};

    use crate::common::*;

    fn trace(thread_count: usize, seed: Option<u64>) -> (SharedBuffer, usize) {
        let mut tracer = tracer(
            RayTraceSettings {
                detalization: 0.1,
                seed,
                ..RayTraceSettings::default()
            },
            room(Material::BRICK),
        );
        let captures = add_stereo_pair(&mut tracer);
        let buffer = bind_all(&mut tracer, &captures, OrderRange::ALL, 9600);
        let stats = tracer.process(thread_count, 1.0).unwrap();
        (buffer, stats.arrivals)
    }

    fn assert_matches(a: &SharedBuffer, b: &SharedBuffer) {
        for ch in 0..2 {
            let a = channel(a, ch);
            let b = channel(b, ch);
            let peak = a.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
            assert!(peak > 0.0);
            for (a, b) in a.iter().zip(b.iter()) {
                assert_relative_eq!(a, b, epsilon = 1e-6 * peak, max_relative = 1e-4);
            }
        }
    }

    #[test]
    fn thread_count_does_not_change_output() {
        let (single, single_arrivals) = trace(1, None);
        for thread_count in [2, 3, 7, 0] {
            let (multi, multi_arrivals) = trace(thread_count, None);
            assert_eq!(single_arrivals, multi_arrivals);
            assert_matches(&single, &multi);
        }
    }

    #[test]
    fn seeded_runs_repeat() {
        let (a, _) = trace(1, Some(1234));
        let (b, _) = trace(4, Some(1234));
        assert_matches(&a, &b);
    }

    #[test]
    fn more_threads_than_rays() {
        // 20 rays and a direct item per source
        let mut tracer = tracer(
            RayTraceSettings {
                detalization: 10.0,
                ..RayTraceSettings::default()
            },
            room(Material::BRICK),
        );
        let captures = add_stereo_pair(&mut tracer);
        let buffer = bind_all(&mut tracer, &captures, OrderRange::ALL, 4800);
        let stats = tracer.process(64, 1.0).unwrap();
        assert_eq!(stats.rays, 20);
        assert!(channel(&buffer, 0).iter().any(|&s| s > 0.0));
    }
}
