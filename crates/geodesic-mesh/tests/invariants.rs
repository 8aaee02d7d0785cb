//! Property tests for the counting and compaction rules under random
//! subdivision depths and camera poses.

use geodesic_mesh::{BaseVariant, Camera, CullView, Projection, Topology};
use glam::Vec3;
use proptest::prelude::*;

fn arbitrary_variant() -> impl Strategy<Value = BaseVariant> {
    prop_oneof![Just(BaseVariant::Icosahedron), Just(BaseVariant::Cube)]
}

fn arbitrary_camera() -> impl Strategy<Value = Camera> {
    (
        0.0..std::f32::consts::TAU,
        -1.3_f32..1.3,
        0.2_f32..6.0,
        prop::array::uniform3(-0.1_f32..0.1),
        10.0_f32..100.0,
        0.5_f32..2.5,
    )
        .prop_map(|(yaw, pitch, distance, target, fov, aspect)| {
            let eye = Vec3::new(
                pitch.cos() * yaw.cos(),
                pitch.sin(),
                pitch.cos() * yaw.sin(),
            ) * distance;
            Camera::look_at(
                eye,
                Vec3::from(target),
                Vec3::Y,
                Projection::Perspective {
                    fov_y: fov.to_radians(),
                    aspect_ratio: aspect,
                },
            )
        })
}

/// Straightforward out-of-place cull used as the expected result.
fn reference_cull(topo: &Topology, view: &CullView) -> (Vec<Vec3>, Vec<u32>) {
    let positions = topo.positions();
    let kept: Vec<[u32; 3]> = (0..topo.triangle_count())
        .map(|t| topo.triangle(t))
        .filter(|tri| {
            let corners = tri.map(|v| positions[v as usize]);
            let centroid = (corners[0] + corners[1] + corners[2]) / 3.0;
            view.is_visible(centroid) || corners.iter().any(|&p| view.is_visible(p))
        })
        .collect();

    let mut referenced = vec![false; positions.len()];
    for &v in kept.iter().flatten() {
        referenced[v as usize] = true;
    }
    let mut remap = vec![0u32; positions.len()];
    let mut vertices = Vec::new();
    for (old, &used) in referenced.iter().enumerate() {
        if used {
            remap[old] = vertices.len() as u32;
            vertices.push(positions[old]);
        }
    }
    let indices = kept.iter().flatten().map(|&v| remap[v as usize]).collect();
    (vertices, indices)
}

proptest! {
    #[test]
    fn proptest_subdivision_keeps_counts_consistent(
        variant in arbitrary_variant(),
        steps in 0..120_usize,
    ) {
        let mut topo = Topology::new(variant, steps);
        topo.subdivide_steps(steps).unwrap();

        prop_assert_eq!(topo.vertex_count(), variant.vertex_count() + 3 * steps);
        prop_assert_eq!(topo.triangle_count(), variant.triangle_count() + 3 * steps);
        prop_assert!(topo.validate().is_ok());
        prop_assert_eq!(topo.remaining_subdivisions(), 0);
    }

    #[test]
    fn proptest_cull_compacts_in_order(
        variant in arbitrary_variant(),
        steps in 0..60_usize,
        camera in arbitrary_camera(),
        cushion in 0.0_f32..1.0,
    ) {
        let mut topo = Topology::new(variant, steps);
        topo.subdivide_steps(steps).unwrap();
        let before_triangles = topo.triangle_count();
        let view = CullView::new(&camera, cushion);
        let (expected_vertices, expected_indices) = reference_cull(&topo, &view);

        let stats = topo.cull(&view);

        prop_assert!(topo.validate().is_ok());
        prop_assert_eq!(stats.triangles, topo.triangle_count());
        prop_assert_eq!(stats.vertices, topo.vertex_count());
        prop_assert_eq!(stats.culled_triangles + stats.triangles, before_triangles);
        prop_assert!(topo.ref_counts().iter().all(|&c| c > 0));
        prop_assert_eq!(topo.positions(), &expected_vertices[..]);
        prop_assert_eq!(topo.indices(), &expected_indices[..]);
    }

    #[test]
    fn proptest_cull_is_idempotent(
        variant in arbitrary_variant(),
        steps in 0..60_usize,
        camera in arbitrary_camera(),
        cushion in 0.0_f32..1.0,
    ) {
        let mut topo = Topology::new(variant, steps);
        topo.subdivide_steps(steps).unwrap();

        let view = CullView::new(&camera, cushion);
        topo.cull(&view);
        let once = topo.emit();
        prop_assert!(topo.cull(&view).is_noop());
        prop_assert_eq!(topo.emit(), once);
    }

    #[test]
    fn proptest_emitted_mesh_is_well_formed(
        variant in arbitrary_variant(),
        steps in 0..60_usize,
        camera in arbitrary_camera(),
    ) {
        let mut topo = Topology::new(variant, steps);
        topo.subdivide_steps(steps).unwrap();
        topo.cull(&CullView::new(&camera, 0.1));

        let mesh = topo.emit();
        prop_assert_eq!(mesh.indices().len() % 3, 0);
        prop_assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));
        for v in mesh.vertices() {
            prop_assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }
}
