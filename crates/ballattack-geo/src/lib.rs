//! Spherical geometry for BALL ATTACK.
//!
//! Latitude/longitude mapping onto the globe surface, great-circle
//! angular distance, and quaternion-based surface interpolation.

pub mod spherical;

// Re-export key functions for convenience.
pub use spherical::{
    angular_distance, clamp_latitude, lat_lng_of, offset_by_bearing, rotate_toward,
    surface_point,
};
