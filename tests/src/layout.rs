#[cfg(test)]
mod tests {
    use resono::geometry::{Edge, Triangle, Vertex};
    use std::mem::{align_of, size_of};

    #[test]
    fn records_are_16_byte_multiples() {
        assert_eq!(size_of::<Vertex>(), 16);
        assert_eq!(size_of::<Edge>(), 16);
        assert_eq!(size_of::<Triangle>(), 48);
        assert_eq!(align_of::<Vertex>(), 16);
        assert_eq!(align_of::<Edge>(), 16);
        assert_eq!(align_of::<Triangle>(), 16);
    }

    #[test]
    fn scene_arenas() {
        let mut scene = crate::common::room(resono::Material::BRICK);
        scene.finalize().unwrap();
        assert_eq!(scene.vertices().len(), 8);
        assert_eq!(scene.triangles().len(), 12);
        assert_eq!(scene.edges().len(), 18);
        assert!(scene.validity().is_closed());
        for (i, v) in scene.vertices().iter().enumerate() {
            assert_eq!(v.index as usize, i);
        }
        for e in scene.edges() {
            assert!(e.vertices[0] < e.vertices[1]);
            assert_eq!(e.triangle_count(), 2);
        }
    }
}
