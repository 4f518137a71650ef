#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use resono::{
        CapturePattern, Material, OrderRange, RayTraceSettings, SourcePattern, Transducer, Vec3,
    };

    use crate::common::*;

    const LENGTH: usize = 1000;

    #[test]
    fn direct_and_reflections_split_by_order() {
        let mut tracer = tracer(
            RayTraceSettings {
                detalization: 0.2,
                ..RayTraceSettings::default()
            },
            wall(),
        );
        tracer
            .add_source(Transducer::new(Vec3::ZERO, Vec3::ZERO), SourcePattern::Omni)
            .unwrap();
        let capture = tracer
            .add_capture(
                Transducer::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 0.0, 0.1)),
                CapturePattern::Omni,
            )
            .unwrap();
        let direct = bind_all(&mut tracer, &[capture], OrderRange::DIRECT, LENGTH);
        let indirect = bind_all(&mut tracer, &[capture], OrderRange::INDIRECT, LENGTH);
        let all = bind_all(&mut tracer, &[capture], OrderRange::ALL, LENGTH);

        tracer.process(1, 1.0).unwrap();

        let direct = channel(&direct, 0);
        let indirect = channel(&indirect, 0);
        let all = channel(&all, 0);

        // 0.5 units is 70.53 samples at 48kHz
        for (i, &s) in direct.iter().enumerate() {
            if i == 70 || i == 71 {
                assert!(s > 0.0);
            } else {
                assert_eq!(s, 0.0);
            }
        }
        let expected = 0.01 / (0.01 + 0.25);
        assert_relative_eq!(direct[70] + direct[71], expected, max_relative = 1e-4);

        // Nothing can arrive through the wall before the mirror image path
        let first = indirect.iter().position(|&s| s != 0.0).unwrap();
        assert!(first >= 290);
        assert!(indirect.iter().sum::<f32>() > 0.0);

        let peak = all.iter().fold(0.0f32, |m, &s| m.max(s));
        for i in 0..LENGTH {
            assert_relative_eq!(
                all[i],
                direct[i] + indirect[i],
                epsilon = 1e-6 * peak,
                max_relative = 1e-4
            );
        }
    }

    #[test]
    fn late_is_part_of_all() {
        let mut tracer = tracer(
            RayTraceSettings {
                detalization: 0.1,
                ..RayTraceSettings::default()
            },
            room(Material::CONCRETE),
        );
        let captures = add_stereo_pair(&mut tracer);
        let all = bind_all(&mut tracer, &captures, OrderRange::ALL, 4800);
        let direct = bind_all(&mut tracer, &captures, OrderRange::DIRECT, 4800);
        let late = bind_all(
            &mut tracer,
            &captures,
            OrderRange::new(4, None).unwrap(),
            4800,
        );

        tracer.process(2, 1.0).unwrap();

        for ch in 0..2 {
            let all = channel(&all, ch);
            let direct = channel(&direct, ch);
            let late = channel(&late, ch);
            let peak = all.iter().fold(0.0f32, |m, &s| m.max(s));
            assert!(peak > 0.0);
            for i in 0..all.len() {
                assert!(direct[i] >= 0.0 && late[i] >= 0.0);
                assert!(direct[i] <= all[i] + 1e-6 * peak);
                assert!(late[i] <= all[i] + 1e-6 * peak);
            }
            let all_total: f32 = all.iter().sum();
            let direct_total: f32 = direct.iter().sum();
            let late_total: f32 = late.iter().sum();
            assert!(direct_total > 0.0);
            assert!(late_total > 0.0);
            assert!(direct_total + late_total < all_total);
        }
    }

    #[test]
    fn unreachable_orders_stay_silent() {
        let mut tracer = tracer(
            RayTraceSettings {
                detalization: 0.2,
                max_reflections: 3,
                ..RayTraceSettings::default()
            },
            room(Material::CONCRETE),
        );
        let captures = add_stereo_pair(&mut tracer);
        let beyond = bind_all(
            &mut tracer,
            &captures,
            OrderRange::new(4, Some(10)).unwrap(),
            4800,
        );
        let early = bind_all(
            &mut tracer,
            &captures,
            OrderRange::new(1, Some(3)).unwrap(),
            4800,
        );

        tracer.process(1, 1.0).unwrap();

        for ch in 0..2 {
            assert!(channel(&beyond, ch).iter().all(|&s| s == 0.0));
            assert!(channel(&early, ch).iter().any(|&s| s > 0.0));
        }
    }
}
