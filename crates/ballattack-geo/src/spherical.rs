//! Sphere-surface math: lat/lng mapping, angular distance, and
//! great-circle interpolation.
//!
//! All functions treat the world origin as the sphere center. Positions
//! produced here satisfy `|p| == radius` up to floating error, which is the
//! invariant every surface entity relies on.

use glam::{DQuat, DVec3};

/// Convert (latitude, longitude) in degrees to a Cartesian point at
/// `radius` from the origin, using the polar angle φ = 90° − lat and
/// azimuth θ = lng + 180°.
pub fn surface_point(lat_deg: f64, lng_deg: f64, radius: f64) -> DVec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lng_deg + 180.0).to_radians();
    DVec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Recover (latitude, longitude) in degrees from a Cartesian point.
/// Longitude is normalized to [−180, 180). The origin maps to (0, 0).
pub fn lat_lng_of(p: DVec3) -> (f64, f64) {
    let r = p.length();
    if r <= f64::EPSILON {
        return (0.0, 0.0);
    }
    let lat = 90.0 - (p.y / r).clamp(-1.0, 1.0).acos().to_degrees();
    let mut lng = p.z.atan2(-p.x).to_degrees() - 180.0;
    if lng < -180.0 {
        lng += 360.0;
    }
    (lat, lng)
}

/// Great-circle angular distance between two points (radians), i.e. the
/// angle they subtend at the sphere center. Degenerate inputs yield 0.
pub fn angular_distance(a: DVec3, b: DVec3) -> f64 {
    match (a.try_normalize(), b.try_normalize()) {
        (Some(a), Some(b)) => a.dot(b).clamp(-1.0, 1.0).acos(),
        _ => 0.0,
    }
}

/// Rotate `current` toward `target` about their common perpendicular by at
/// most `max_step` radians. Preserves `|current|` exactly, so surface
/// entities stay on the sphere no matter how many steps they take.
pub fn rotate_toward(current: DVec3, target: DVec3, max_step: f64) -> DVec3 {
    let total = angular_distance(current, target);
    if total <= f64::EPSILON || max_step <= 0.0 {
        return current;
    }
    let step = max_step.min(total);

    let axis = match current.cross(target).try_normalize() {
        Some(axis) => axis,
        None => {
            // Antiparallel: any axis perpendicular to `current` works.
            let reference = if current.x.abs() < 0.9 {
                DVec3::X
            } else {
                DVec3::Y
            };
            match current.cross(reference).try_normalize() {
                Some(axis) => axis,
                None => return current,
            }
        }
    };

    DQuat::from_axis_angle(axis, step) * current
}

/// Walk `arc` radians along the great circle leaving `origin` at `bearing`
/// (radians, 0 = toward the north pole), returning a point at `radius`.
/// Degenerate origins are returned unchanged.
pub fn offset_by_bearing(origin: DVec3, bearing: f64, arc: f64, radius: f64) -> DVec3 {
    let up = match origin.try_normalize() {
        Some(up) => up,
        None => return origin,
    };

    // Local tangent frame. At the poles "north" is undefined; fall back
    // to the X axis as the reference direction.
    let north = match (DVec3::Y - up * up.y).try_normalize() {
        Some(north) => north,
        None => (DVec3::X - up * up.x).normalize(),
    };
    let east = north.cross(up);
    let tangent = north * bearing.cos() + east * bearing.sin();

    (up * arc.cos() + tangent * arc.sin()) * radius
}

/// Clamp a surface point's latitude to ±`max_lat_deg`, re-projected onto
/// the sphere of the given radius.
pub fn clamp_latitude(p: DVec3, max_lat_deg: f64, radius: f64) -> DVec3 {
    let (lat, lng) = lat_lng_of(p);
    surface_point(lat.clamp(-max_lat_deg, max_lat_deg), lng, radius)
}
