#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use resono::{
        CapturePattern, Material, Mesh, OrderRange, RayTraceSettings, Scene, SourcePattern,
        Transducer, Vec3,
    };

    use crate::common::*;

    const SAMPLE_RATE: u32 = 48000;

    #[test]
    fn reference_room() {
        let mut tracer = tracer(
            RayTraceSettings {
                sample_rate: SAMPLE_RATE,
                energy_threshold: 1e-5,
                tolerance: 1e-5,
                detalization: 0.1,
                ..RayTraceSettings::default()
            },
            room(Material::CONCRETE),
        );
        let captures = add_stereo_pair(&mut tracer);
        let ranges = [
            OrderRange::DIRECT,
            OrderRange::new(1, Some(3)).unwrap(),
            OrderRange::new(4, None).unwrap(),
            OrderRange::ALL,
            OrderRange::INDIRECT,
        ];
        let buffers: Vec<_> = ranges
            .iter()
            .map(|&range| bind_all(&mut tracer, &captures, range, SAMPLE_RATE as usize))
            .collect();

        let stats = tracer.process(0, 1.0).unwrap();
        assert_eq!(stats.rays, 320);
        assert!(stats.segments > stats.rays);
        assert!(stats.arrivals > 0);

        for buffer in &buffers {
            let buffer = buffer.lock().unwrap();
            assert_eq!(buffer.sample_rate(), Some(SAMPLE_RATE));
            for ch in 0..2 {
                let samples = buffer.channel(ch).unwrap();
                assert!(samples.iter().all(|s| s.is_finite() && *s >= 0.0));
                let total = buffer.total(ch);
                assert!(total > 0.0);
                assert!(total < 1.0);
            }
        }
    }

    #[test]
    fn energy_scale_is_linear() {
        let run = |scale: f32| {
            let mut tracer = tracer(
                RayTraceSettings {
                    detalization: 0.2,
                    ..RayTraceSettings::default()
                },
                room(Material::CONCRETE),
            );
            let captures = add_stereo_pair(&mut tracer);
            let buffer = bind_all(&mut tracer, &captures, OrderRange::ALL, 4800);
            tracer.process(1, scale).unwrap();
            channel(&buffer, 0)
        };
        let unit = run(1.0);
        let scaled = run(0.5);
        for (u, s) in unit.iter().zip(scaled.iter()) {
            assert_relative_eq!(u * 0.5, s, max_relative = 1e-5);
        }
    }

    #[test]
    fn repeated_passes_accumulate() {
        let mut tracer = tracer(
            RayTraceSettings {
                detalization: 0.2,
                ..RayTraceSettings::default()
            },
            room(Material::CONCRETE),
        );
        let captures = add_stereo_pair(&mut tracer);
        let buffer = bind_all(&mut tracer, &captures, OrderRange::ALL, 4800);
        tracer.process(1, 1.0).unwrap();
        let once = buffer.lock().unwrap().total(0);
        tracer.process(1, 1.0).unwrap();
        let twice = buffer.lock().unwrap().total(0);
        assert_relative_eq!(twice, 2.0 * once, max_relative = 1e-4);
    }

    #[test]
    fn rigid_room_terminates() {
        // Nothing is absorbed so only the reflection cap ends the paths
        let mut tracer = tracer(
            RayTraceSettings {
                detalization: 0.2,
                max_reflections: 25,
                ..RayTraceSettings::default()
            },
            room(Material::RIGID),
        );
        let captures = add_stereo_pair(&mut tracer);
        let buffer = bind_all(&mut tracer, &captures, OrderRange::ALL, 48000);
        let stats = tracer.process(2, 1.0).unwrap();
        assert!(stats.segments <= stats.rays * 25);
        assert!(stats.segments > stats.rays * 20);
        assert!(channel(&buffer, 0).iter().all(|s| s.is_finite()));

        // Without the cap the buffer length bounds the paths
        let mut uncapped = crate::common::tracer(
            RayTraceSettings {
                detalization: 0.2,
                ..RayTraceSettings::default()
            },
            room(Material::RIGID),
        );
        let captures = add_stereo_pair(&mut uncapped);
        bind_all(&mut uncapped, &captures, OrderRange::ALL, 4800);
        let stats = uncapped.process(2, 1.0).unwrap();
        assert!(stats.segments > stats.rays);
        assert!(stats.segments < stats.rays * 10000);
    }

    #[test]
    fn centered_omni_source() {
        let mut scene = Scene::new();
        scene
            .attach(&Mesh::cuboid(
                Vec3::new(-3.0, -2.0, -1.5),
                Vec3::new(3.0, 2.0, 1.5),
                Material::GENERIC,
            ))
            .unwrap();
        assert_eq!(scene.triangles().len(), 12);

        let mut tracer = tracer(
            RayTraceSettings {
                sample_rate: SAMPLE_RATE,
                energy_threshold: 1e-5,
                tolerance: 1e-5,
                ..RayTraceSettings::default()
            },
            scene,
        );
        tracer
            .add_source(Transducer::new(Vec3::ZERO, Vec3::ZERO), SourcePattern::Omni)
            .unwrap();
        // Pair 0.08 apart facing the source
        let captures: Vec<usize> = [0.04, -0.04]
            .iter()
            .map(|&y| {
                tracer
                    .add_capture(
                        Transducer::new(Vec3::new(1.5, y, 0.0), Vec3::new(-0.015, 0.0, 0.0)),
                        CapturePattern::Cardioid,
                    )
                    .unwrap()
            })
            .collect();
        let ranges = [
            OrderRange::DIRECT,
            OrderRange::new(1, Some(3)).unwrap(),
            OrderRange::new(4, None).unwrap(),
            OrderRange::ALL,
            OrderRange::INDIRECT,
        ];
        let buffers: Vec<_> = ranges
            .iter()
            .map(|&range| bind_all(&mut tracer, &captures, range, SAMPLE_RATE as usize))
            .collect();

        tracer.process(1, 1.0).unwrap();

        // Unit source energy times the peak cardioid response
        let bound = 1.0;
        for buffer in &buffers {
            let buffer = buffer.lock().unwrap();
            assert_eq!(buffer.sample_rate(), Some(SAMPLE_RATE));
            for ch in 0..2 {
                let samples = buffer.channel(ch).unwrap();
                assert!(samples.iter().all(|s| s.is_finite()));
                assert!(samples.iter().any(|&s| s > 0.0));
                assert!(samples.iter().all(|&s| s >= 0.0 && s <= bound));
                assert!(buffer.total(ch) <= bound as f64);
            }
        }

        for ch in 0..2 {
            let direct = buffers[0].lock().unwrap().total(ch);
            let all = buffers[3].lock().unwrap().total(ch);
            let indirect = buffers[4].lock().unwrap().total(ch);
            assert!(direct < all);
            assert_relative_eq!(all, direct + indirect, max_relative = 1e-4);
        }
    }

    #[test]
    fn no_reflections_allowed() {
        let mut tracer = tracer(
            RayTraceSettings {
                detalization: 0.2,
                max_reflections: 0,
                ..RayTraceSettings::default()
            },
            room(Material::CONCRETE),
        );
        let captures = add_stereo_pair(&mut tracer);
        let direct = bind_all(&mut tracer, &captures, OrderRange::DIRECT, 4800);
        let indirect = bind_all(&mut tracer, &captures, OrderRange::INDIRECT, 4800);

        let stats = tracer.process(2, 1.0).unwrap();
        assert_eq!(stats.rays, 80);
        assert_eq!(stats.segments, 0);
        for ch in 0..2 {
            assert!(channel(&direct, ch).iter().any(|&s| s > 0.0));
            assert!(channel(&indirect, ch).iter().all(|&s| s == 0.0));
        }
    }
}
