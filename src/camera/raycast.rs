use nalgebra_glm as glm;

use crate::camera::pose::FOV_Y;

/// Distance along a pointer ray at which the zoom target point is taken.
/// A fixed reference depth, not a measured one: the zoom direction only needs
/// to point "through the cursor", not hit actual scene geometry.
pub const REFERENCE_DISTANCE: f32 = 10.0;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: glm::Vec3,
    pub dir: glm::Vec3,
}

/// Map window pixel coordinates to normalized device coordinates in
/// [-1, 1] on both axes, y flipped so screen-up is positive. Coordinates
/// outside the viewport map outside [-1, 1] and are not rejected; only a
/// degenerate viewport yields `None`.
pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Option<(f32, f32)> {
    if width < 1.0 || height < 1.0 {
        return None;
    }
    let ndc_x = (x / width) * 2.0 - 1.0;
    let ndc_y = -((y / height) * 2.0 - 1.0);
    Some((ndc_x, ndc_y))
}

/// Cast a ray from the camera through a point in normalized device
/// coordinates. The camera orientation is fixed (looking along -z, +y up),
/// so the direction comes straight from the perspective frustum; no view
/// rotation is involved.
pub fn compute_ray(ndc_x: f32, ndc_y: f32, eye: glm::Vec3, aspect: f32) -> Ray {
    let half_h = (FOV_Y * 0.5).tan();
    let dir = glm::normalize(&glm::vec3(ndc_x * half_h * aspect, ndc_y * half_h, -1.0));
    Ray { origin: eye, dir }
}

pub fn point_at_distance(ray: &Ray, distance: f32) -> glm::Vec3 {
    ray.origin + ray.dir * distance
}

/// Intersect a ray with the plane z = `plane_z`. `None` for rays parallel to
/// the plane or hits behind the origin.
pub fn intersect_z_plane(ray: &Ray, plane_z: f32) -> Option<glm::Vec3> {
    const EPSILON: f32 = 1e-6;
    if ray.dir.z.abs() < EPSILON {
        return None;
    }
    let t = (plane_z - ray.origin.z) / ray.dir.z;
    if t < 0.0 {
        return None;
    }
    Some(point_at_distance(ray, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EYE: (f32, f32, f32) = (0.0, 0.0, 10.0);

    fn eye() -> glm::Vec3 {
        glm::vec3(EYE.0, EYE.1, EYE.2)
    }

    #[test]
    fn ndc_flips_vertical_axis() {
        let (x, y) = pointer_to_ndc(0.0, 0.0, 800.0, 600.0).unwrap();
        assert!((x + 1.0).abs() < 1e-6);
        assert!((y - 1.0).abs() < 1e-6);

        let (x, y) = pointer_to_ndc(800.0, 600.0, 800.0, 600.0).unwrap();
        assert!((x - 1.0).abs() < 1e-6);
        assert!((y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn ndc_center_is_origin() {
        let (x, y) = pointer_to_ndc(400.0, 300.0, 800.0, 600.0).unwrap();
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn ndc_outside_viewport_is_not_rejected() {
        let (x, _) = pointer_to_ndc(1200.0, 300.0, 800.0, 600.0).unwrap();
        assert!(x > 1.0);
    }

    #[test]
    fn ndc_degenerate_viewport_is_none() {
        assert!(pointer_to_ndc(10.0, 10.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn center_ray_points_down_negative_z() {
        let ray = compute_ray(0.0, 0.0, eye(), 4.0 / 3.0);
        assert!(ray.dir.x.abs() < 1e-6);
        assert!(ray.dir.y.abs() < 1e-6);
        assert!((ray.dir.z + 1.0).abs() < 1e-6);
        assert_eq!(ray.origin, eye());
    }

    #[test]
    fn off_center_ray_leans_toward_the_pointer() {
        let right = compute_ray(1.0, 0.0, eye(), 4.0 / 3.0);
        assert!(right.dir.x > 0.0);
        let up = compute_ray(0.0, 1.0, eye(), 4.0 / 3.0);
        assert!(up.dir.y > 0.0);
        // Directions are unit length.
        assert!((glm::length(&right.dir) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn point_at_distance_walks_the_ray() {
        let ray = compute_ray(0.0, 0.0, eye(), 1.0);
        let p = point_at_distance(&ray, REFERENCE_DISTANCE);
        assert!(glm::length(&(p - glm::vec3(0.0, 0.0, 0.0))) < 1e-5);
    }

    #[test]
    fn z_plane_intersection() {
        let ray = compute_ray(0.0, 0.0, eye(), 1.0);
        let hit = intersect_z_plane(&ray, 0.0).unwrap();
        assert!(glm::length(&hit) < 1e-5);
    }

    #[test]
    fn z_plane_parallel_ray_misses() {
        let ray = Ray {
            origin: eye(),
            dir: glm::vec3(1.0, 0.0, 0.0),
        };
        assert!(intersect_z_plane(&ray, 0.0).is_none());
    }

    #[test]
    fn z_plane_behind_origin_misses() {
        let ray = Ray {
            origin: eye(),
            dir: glm::vec3(0.0, 0.0, 1.0),
        };
        assert!(intersect_z_plane(&ray, 0.0).is_none());
    }
}
