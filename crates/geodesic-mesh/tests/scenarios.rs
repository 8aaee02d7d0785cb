//! End-to-end scenarios: build, subdivide, cull and emit.

use geodesic_mesh::{
    BaseVariant, Camera, CullView, Projection, ScreenTiling, Topology, ViewportRect,
};
use glam::Vec3;

fn narrow_camera(eye: Vec3, target: Vec3, fov_degrees: f32) -> Camera {
    Camera::look_at(
        eye,
        target,
        Vec3::Y,
        Projection::Perspective {
            fov_y: fov_degrees.to_radians(),
            aspect_ratio: 1.0,
        },
    )
}

fn centroid(topo: &Topology, tri: usize) -> Vec3 {
    topo.triangle(tri)
        .iter()
        .map(|&v| topo.positions()[v as usize])
        .sum::<Vec3>()
        / 3.0
}

#[test]
fn base_icosahedron_emits_unchanged() {
    let topo = Topology::new(BaseVariant::Icosahedron, 0);
    let mesh = topo.emit();

    assert_eq!(mesh.vertex_count(), 12);
    assert_eq!(mesh.triangle_count(), 20);
    for v in mesh.vertices() {
        assert!((v.length() - 1.0).abs() < 1e-6);
    }
    let expected: Vec<u32> = BaseVariant::Icosahedron
        .triangles()
        .iter()
        .flatten()
        .copied()
        .collect();
    assert_eq!(mesh.indices(), &expected[..]);
}

#[test]
fn one_subdivision_of_triangle_zero() {
    let mut topo = Topology::new(BaseVariant::Icosahedron, 1);
    topo.subdivide_steps(1).unwrap();

    assert_eq!(topo.vertex_count(), 15);
    assert_eq!(topo.triangle_count(), 23);
    assert_eq!(topo.triangle(0), [12, 13, 14]);
    topo.validate().unwrap();
}

#[test]
fn camera_facing_away_culls_everything() {
    let mut topo = Topology::new(BaseVariant::Icosahedron, 10);
    topo.subdivide_steps(10).unwrap();

    let camera = narrow_camera(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 10.0), 60.0);
    let view = CullView::new(&camera, 0.5);
    let stats = topo.cull(&view);

    assert_eq!(stats.culled_triangles, 50);
    assert_eq!(stats.removed_vertices, 42);
    assert_eq!(topo.triangle_count(), 0);
    assert_eq!(topo.vertex_count(), 0);
    assert!(topo.emit().is_empty());
    topo.validate().unwrap();

    // Culling an empty mesh is a no-op.
    assert!(topo.cull(&view).is_noop());
    assert_eq!(topo.vertex_count(), 0);
}

#[test]
fn single_visible_centroid_keeps_one_triangle() {
    let mut topo = Topology::new(BaseVariant::Icosahedron, 0);
    let target_tri = 7;
    let corners = topo.triangle(target_tri);
    let dir = centroid(&topo, target_tri);

    // From the centre of the sphere the antipodal face is behind the camera.
    let camera = narrow_camera(Vec3::ZERO, dir, 10.0);
    let stats = topo.cull(&CullView::new(&camera, 0.0));

    assert_eq!(stats.triangles, 1);
    assert_eq!(topo.triangle_count(), 1);
    assert_eq!(topo.vertex_count(), 3);

    // Surviving vertices keep their relative order.
    let mut sorted = corners;
    sorted.sort_unstable();
    let renumbered = corners.map(|v| sorted.iter().position(|&s| s == v).unwrap() as u32);
    assert_eq!(topo.triangle(0), renumbered);
    assert_eq!(topo.ref_counts(), &[1, 1, 1]);
    topo.validate().unwrap();
}

#[test]
fn camera_inside_frustum_keeps_whole_mesh() {
    let mut topo = Topology::new(BaseVariant::Cube, 8);
    topo.subdivide_steps(8).unwrap();
    let before = topo.emit();

    let camera = narrow_camera(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, 60.0);
    let stats = topo.cull(&CullView::new(&camera, 0.0));

    assert!(stats.is_noop());
    assert_eq!(topo.emit(), before);
}

#[test]
fn repeated_cull_is_idempotent() {
    let mut topo = Topology::new(BaseVariant::Icosahedron, 40);
    topo.subdivide_steps(40).unwrap();

    // Close and narrow: the flanks of the sphere fall outside the frame.
    let camera = narrow_camera(Vec3::new(1.0, 0.3, 1.0), Vec3::ZERO, 30.0);
    let view = CullView::new(&camera, 0.05);
    let first = topo.cull(&view);
    assert!(!first.is_noop());
    let snapshot = topo.emit();

    assert!(topo.cull(&view).is_noop());
    assert_eq!(topo.emit(), snapshot);
}

#[test]
fn subdivision_after_cull_stays_consistent() {
    let mut topo = Topology::new(BaseVariant::Icosahedron, 20);
    topo.subdivide_steps(10).unwrap();

    let camera = narrow_camera(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, 50.0);
    topo.cull(&CullView::new(&camera, 0.0));
    let triangles = topo.triangle_count();
    assert!(triangles > 0);

    topo.subdivide_steps(5).unwrap();
    assert_eq!(topo.triangle_count(), triangles + 15);
    topo.validate().unwrap();
}

#[test]
fn screen_tiles_partition_the_view() {
    let camera = narrow_camera(Vec3::new(0.0, 0.0, 2.5), Vec3::ZERO, 60.0);
    let subdivided = || {
        let mut topo = Topology::new(BaseVariant::Icosahedron, 20);
        topo.subdivide_steps(20).unwrap();
        topo
    };

    let mut full = subdivided();
    full.cull(&CullView::new(&camera, 0.0).with_rect(ViewportRect::FULL));
    let full_count = full.triangle_count();

    let tiling = ScreenTiling::new(2, 2);
    let mut total = 0;
    for rect in tiling.rects() {
        let mut topo = subdivided();
        topo.cull(&CullView::new(&camera, 0.0).with_rect(rect));
        total += topo.triangle_count();
        topo.validate().unwrap();
    }

    // Every visible triangle lands in at least one tile; not every tile
    // keeps everything.
    assert!(total >= full_count);
    assert!(total < tiling.tile_count() * full_count);
}
