#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use resono::{
        CaptureConfig, CapturePattern, CaptureSettings, Material, OrderRange, RayTraceSettings,
        SourcePattern, Transducer, Vec3,
    };
    use std::str::FromStr;

    use crate::common::*;

    #[test]
    fn ortf_pair() {
        let captures = CaptureSettings {
            position: Vec3::new(1.0, 0.0, 0.0),
            yaw: 180.0,
            config: CaptureConfig::ORTF,
            angle: 110.0,
            distance: 0.17,
            ..CaptureSettings::default()
        }
        .captures()
        .unwrap();
        assert_eq!(captures.len(), 2);
        // Facing -X the left side is -Y
        assert_abs_diff_eq!(captures[0].position().y, -0.085, epsilon = 1e-6);
        assert_abs_diff_eq!(captures[1].position().y, 0.085, epsilon = 1e-6);
        let a = captures[0].transducer.axis.normalize();
        let b = captures[1].transducer.axis.normalize();
        assert_abs_diff_eq!(a.dot(b), 110.0f32.to_radians().cos(), epsilon = 1e-5);
        assert!(a.x < 0.0 && b.x < 0.0);
    }

    #[test]
    fn mid_side_in_room() {
        let mut tracer = tracer(
            RayTraceSettings {
                detalization: 0.2,
                ..RayTraceSettings::default()
            },
            room(Material::PLASTER),
        );
        tracer
            .add_source(
                Transducer::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.1, 0.0, 0.0)),
                SourcePattern::from_str("Cardioid").unwrap(),
            )
            .unwrap();
        let captures = tracer
            .add_capture_config(&CaptureSettings {
                position: Vec3::new(1.0, 0.0, 0.0),
                yaw: 180.0,
                capsule: 0.05,
                config: CaptureConfig::MS,
                ..CaptureSettings::default()
            })
            .unwrap();
        assert_eq!(captures, vec![0, 1]);

        let direct = bind_all(&mut tracer, &captures, OrderRange::DIRECT, 4800);
        let all = bind_all(&mut tracer, &captures, OrderRange::ALL, 4800);
        tracer.process(0, 1.0).unwrap();

        // Mid faces the source, side is on its null
        let mid: f32 = channel(&direct, 0).iter().sum();
        let side: f32 = channel(&direct, 1).iter().sum();
        assert!(mid > 0.0);
        assert!(side.abs() < mid * 1e-3);

        // Reflections reach the side capsule with both polarities
        let side = channel(&all, 1);
        assert!(side.iter().any(|&s| s != 0.0));
        assert!(side.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn patterns_by_name() {
        for name in ["omni", "cardioid", "super_cardioid", "hyper_cardioid", "figure_eight"] {
            assert!(CapturePattern::from_str(name).is_ok());
        }
        assert_eq!(
            CapturePattern::from_str("FIGURE_EIGHT").unwrap(),
            CapturePattern::FigureEight
        );
    }
}
