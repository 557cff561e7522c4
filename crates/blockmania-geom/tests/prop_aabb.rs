use blockmania_geom::{Aabb, Vec3};
use proptest::num::f32::NORMAL;
use proptest::prelude::*;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e4)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_extents() -> impl Strategy<Value = Vec3> {
    (0.5f32..64.0, 0.5f32..128.0, 0.5f32..64.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // The center is always inside its own box
    #[test]
    fn aabb_contains_center(c in arb_vec3(), e in arb_extents()) {
        let b = Aabb::new(c, e);
        prop_assert!(b.contains(c));
    }

    // min/max are symmetric around the center
    #[test]
    fn aabb_min_max_symmetric(c in arb_vec3(), e in arb_extents()) {
        let b = Aabb::new(c, e);
        let mid = (b.min() + b.max()) / 2.0;
        prop_assert!(approx(mid.x, c.x, 1e-2) && approx(mid.y, c.y, 1e-2) && approx(mid.z, c.z, 1e-2));
    }

    // Points beyond the max corner are rejected
    #[test]
    fn aabb_rejects_outside(c in arb_vec3(), e in arb_extents()) {
        let b = Aabb::new(c, e);
        let outside = b.max() + Vec3::new(1.0, 0.0, 0.0);
        prop_assert!(!b.contains(outside));
    }
}

#[test]
fn planar_distance_matches_pythagoras() {
    let origin = Vec3::new(3.0, 50.0, 4.0);
    assert!((origin.planar_distance(0.0, 0.0) - 5.0).abs() < 1e-9);
    assert_eq!(Vec3::ZERO.length(), 0.0);
}
