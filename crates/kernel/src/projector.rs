//! Straight-tangent projection of one survey segment.

use crate::geometry::vector::Vec3;

/// Displacement produced by drilling `depth_delta` along a fixed orientation.
///
/// `x` is easting, `y` vertical (negative dip gives negative `y`), `z`
/// northing. NaN inputs come out as NaN components.
pub fn project(depth_delta: f64, azimuth_deg: f64, dip_deg: f64) -> Vec3 {
    let az = azimuth_deg.to_radians();
    let dip = dip_deg.to_radians();
    let horizontal = depth_delta * dip.cos();
    Vec3::new(
        horizontal * az.sin(),
        depth_delta * dip.sin(),
        horizontal * az.cos(),
    )
}
