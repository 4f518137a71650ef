#[cfg(test)]
mod tests {
    use resono::{
        CapturePattern, Error, Material, Mesh, OrderRange, RayTraceSettings, RayTracer,
        SampleBuffer, Scene, SourcePattern, Transducer, Vec3,
    };
    use std::{str::FromStr, sync::Arc};

    use crate::common::*;

    #[test]
    fn not_ready() {
        let tracer = RayTracer::new();
        assert!(matches!(tracer.process(0, 1.0), Err(Error::NotReady(_))));

        let mut tracer = tracer_without_scene();
        let captures = add_stereo_pair(&mut tracer);
        bind_all(&mut tracer, &captures, OrderRange::ALL, 100);
        assert!(matches!(tracer.process(0, 1.0), Err(Error::NotReady(_))));
    }

    fn tracer_without_scene() -> RayTracer {
        let mut tracer = RayTracer::new();
        tracer.init().unwrap();
        tracer
    }

    #[test]
    fn geometry() {
        assert!(matches!(Material::new(1.5), Err(Error::Geometry(_))));
        assert!(matches!(Material::new(f32::NAN), Err(Error::Geometry(_))));

        let mut tracer = tracer_without_scene();
        assert!(matches!(
            tracer.set_scene(Scene::new()),
            Err(Error::Geometry(_))
        ));

        let mut mesh = Mesh::new();
        mesh.add_position(Vec3::ZERO);
        mesh.add_position(Vec3::X);
        let m = mesh.add_material(Material::WOOD);
        mesh.add_triangle([0, 1, 2], m);
        let mut scene = Scene::new();
        assert!(matches!(scene.attach(&mesh), Err(Error::Geometry(_))));
        // Rejected meshes leave no trace
        assert!(scene.triangles().is_empty());
        assert!(scene.vertices().is_empty());
    }

    #[test]
    fn invalid_arguments() {
        let mut tracer = tracer_without_scene();
        let t = Transducer::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.05));
        assert!(matches!(
            tracer.add_source_named(t, "spotlight"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            tracer.add_capture_named(t, "shotgun"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            SourcePattern::try_from(5),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            CapturePattern::try_from(-1),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(
            SourcePattern::from_str("sphere").unwrap(),
            SourcePattern::Icosphere
        );

        let buffer = SampleBuffer::shared(1, 100);
        assert!(matches!(
            tracer.bind_capture(0, Arc::clone(&buffer), 0, -1, -1),
            Err(Error::InvalidArgument(_))
        ));
        // Point captures can't pick anything up, whatever the pattern
        let point = Transducer::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO);
        assert!(matches!(
            tracer.add_capture(point, CapturePattern::Omni),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(tracer.capture_count(), 0);

        let capture = tracer.add_capture(t, CapturePattern::HyperCardioid).unwrap();
        for (min, max) in [(2, 1), (-2, 3), (0, -5)] {
            assert!(matches!(
                tracer.bind_capture(capture, Arc::clone(&buffer), 0, min, max),
                Err(Error::InvalidArgument(_))
            ));
        }
        assert!(matches!(
            tracer.set_settings(RayTraceSettings {
                detalization: 0.0,
                ..RayTraceSettings::default()
            }),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn failed_process_leaves_buffers_untouched() {
        let mut tracer = tracer(RayTraceSettings::default(), room(Material::GLASS));
        let captures = add_stereo_pair(&mut tracer);
        let buffer = bind_all(&mut tracer, &captures, OrderRange::ALL, 100);
        assert!(matches!(
            tracer.process(1, f32::INFINITY),
            Err(Error::InvalidArgument(_))
        ));
        let buffer = buffer.lock().unwrap();
        assert_eq!(buffer.sample_rate(), None);
        assert_eq!(buffer.total(0), 0.0);
        assert_eq!(buffer.total(1), 0.0);
    }
}
