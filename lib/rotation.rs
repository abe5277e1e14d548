//! Rotations of directions on the unit sphere parameterized by Euler angles
//! `(Φ, Θ, Ψ)` in the "zxz" convention.

use std::f64::consts::TAU;
use ndarray as nd;

/// Euler angles `[Φ, Θ, Ψ]`.
pub type EulerAngles = [f64; 3];

/// Convert polar and azimuthal angles to a unit vector.
pub fn spherical_to_cartesian(theta: f64, phi: f64) -> nd::Array1<f64> {
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    nd::array![st * cp, st * sp, ct]
}

/// Convert a vector to polar and azimuthal angles, with the azimuth in
/// `[0, 2π)`.
///
/// The azimuth is meaningless for vectors on the z axis.
pub fn cartesian_to_spherical(v: &nd::Array1<f64>) -> (f64, f64) {
    let r = v.dot(v).sqrt();
    let theta = (v[2] / r).clamp(-1.0, 1.0).acos();
    let phi = v[1].atan2(v[0]).rem_euclid(TAU);
    // rem_euclid can round up to exactly 2π
    (theta, if phi >= TAU { 0.0 } else { phi })
}

/// Stateless rotation by Euler angles.
///
/// [`rotate_back`][Self::rotate_back] applies the angles `[-Ψ, -Θ, -Φ]` and
/// undoes [`rotate`][Self::rotate].
#[derive(Copy, Clone, Debug, Default)]
pub struct EulerAngleRotation;

impl EulerAngleRotation {
    /// Rotation matrix `A(Φ, Θ, Ψ)`.
    pub fn rotation_matrix(euler: EulerAngles) -> nd::Array2<f64> {
        let [Phi, Theta, Psi] = euler;
        let (sf, cf) = Phi.sin_cos();
        let (st, ct) = Theta.sin_cos();
        let (sp, cp) = Psi.sin_cos();
        nd::array![
            [cp * cf - ct * sf * sp,  cp * sf + ct * cf * sp, sp * st],
            [-sp * cf - ct * sf * cp, -sp * sf + ct * cf * cp, cp * st],
            [st * sf,                 -st * cf,                ct     ],
        ]
    }

    fn inverse(euler: EulerAngles) -> EulerAngles {
        let [Phi, Theta, Psi] = euler;
        [-Psi, -Theta, -Phi]
    }

    pub fn rotate_cartesian(v: &nd::Array1<f64>, euler: EulerAngles)
        -> nd::Array1<f64>
    {
        Self::rotation_matrix(euler).dot(v)
    }

    pub fn rotate_back_cartesian(v: &nd::Array1<f64>, euler: EulerAngles)
        -> nd::Array1<f64>
    {
        Self::rotate_cartesian(v, Self::inverse(euler))
    }

    /// Rotate the direction `(theta, phi)`.
    pub fn rotate(theta: f64, phi: f64, euler: EulerAngles) -> (f64, f64) {
        let v = spherical_to_cartesian(theta, phi);
        cartesian_to_spherical(&Self::rotate_cartesian(&v, euler))
    }

    /// Undo [`Self::rotate`].
    pub fn rotate_back(theta: f64, phi: f64, euler: EulerAngles) -> (f64, f64) {
        Self::rotate(theta, phi, Self::inverse(euler))
    }
}
