//! Rotation of 2D vectors about the origin.

/// Rotates a vector given in `(y, x)` order by `angle_deg` degrees.
///
/// The result is returned in the same `(Y, X)` order:
///
/// ```text
/// Y = x·sin(θ) + y·cos(θ)
/// X = x·cos(θ) − y·sin(θ)
/// ```
///
/// Any real angle is accepted; rotation is periodic.
///
/// # Example
///
/// ```
/// use annobox::geom::rotate_yx;
///
/// let (y, x) = rotate_yx((0.0, 1.0), 90.0);
/// assert!((y - 1.0).abs() < 1e-12);
/// assert!(x.abs() < 1e-12);
/// ```
#[inline]
pub fn rotate_yx(yx: (f64, f64), angle_deg: f64) -> (f64, f64) {
    let theta = angle_deg.to_radians();
    let (sin_t, cos_t) = theta.sin_cos();
    let (y, x) = yx;

    let rotated_x = x * cos_t - y * sin_t;
    let rotated_y = x * sin_t + y * cos_t;
    (rotated_y, rotated_x)
}
