use crate::axis_angle::AxisAngle;
use crate::euler::{EulerAngles, EulerOrder};
use crate::util::to_display_precision;
use crate::{DegenerateVector, Quaternion, UnitQuaternion, Vector3, EPSILON};
use nalgebra::Unit;
use std::fmt;
use std::fmt::{Display, Formatter};
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;
use uom::ConstZero;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An orientation in 3D space, described as a unit "pointing" direction plus a twist about
/// that direction.
///
/// The direction is the unit vector from the center of the oriented object towards whatever it
/// is pointing at; the twist is the remaining degree of freedom, the rotation of the object
/// about its own pointing axis (analogous to roll). Together they pin down an orientation
/// completely, without the order-dependence of Euler angles.
///
/// The direction is renormalized on every mutation, so `x² + y² + z² == 1` always holds (to
/// within floating point). Because of that, constructors and mutators that accept direction
/// components are fallible: handing them the zero vector yields [`DegenerateVector`]. The
/// twist is *not* wrapped into any particular range; callers that pass a twist of `3π` get a
/// twist of `3π` back out of the accessor (though conversions will of course treat it modulo
/// full turns).
///
/// To construct one, use [`OrientationVector::new`] or — to make the field order explicit at
/// the call site — [`OrientationVector::build`] with [`Components`]:
///
/// ```rust
/// use orivec::{Components, OrientationVector};
/// use uom::si::f64::Angle;
/// use uom::si::angle::degree;
///
/// OrientationVector::build(Components {
///     x: 0.,
///     y: 0.,
///     z: 1.,
///     twist: Angle::new::<degree>(30.),
/// })
/// .expect("direction is not the zero vector");
/// ```
///
/// The default value points along global +Z with no twist.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientationVector {
    /// Unit direction; every write goes through normalization.
    vec: Vector3,
    twist: Angle,
}

/// The constituent parts of an [`OrientationVector`] for use with [`OrientationVector::build`]
/// and [`OrientationVector::components`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Components {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub twist: Angle,
}

impl Default for OrientationVector {
    fn default() -> Self {
        Self {
            vec: Vector3::z(),
            twist: Angle::ZERO,
        }
    }
}

impl OrientationVector {
    /// Constructs an orientation vector pointing along `(x, y, z)` with the given twist.
    ///
    /// The direction is normalized; it does not need to be unit length on the way in. A
    /// zero-length direction yields [`DegenerateVector`].
    pub fn new(
        x: f64,
        y: f64,
        z: f64,
        twist: impl Into<Angle>,
    ) -> Result<Self, DegenerateVector> {
        let mut ov = Self::default();
        ov.set(x, y, z, twist)?;
        Ok(ov)
    }

    /// Constructs an orientation vector from named [`Components`].
    ///
    /// Equivalent to [`OrientationVector::new`], just harder to get the argument order wrong
    /// with.
    pub fn build(Components { x, y, z, twist }: Components) -> Result<Self, DegenerateVector> {
        Self::new(x, y, z, twist)
    }

    /// Constructs the orientation vector equivalent to the given unit quaternion.
    ///
    /// See [`OrientationVector::set_from_quaternion`] for the semantics.
    #[must_use]
    pub fn from_quaternion(quaternion: &UnitQuaternion) -> Self {
        let mut ov = Self::default();
        ov.set_from_quaternion(quaternion);
        ov
    }

    /// The direction's x component.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.vec.x
    }

    /// The direction's y component.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.vec.y
    }

    /// The direction's z component.
    #[must_use]
    pub fn z(&self) -> f64 {
        self.vec.z
    }

    /// The twist about the pointing direction.
    ///
    /// Unwrapped; this is whatever the last mutation stored.
    #[must_use]
    pub fn twist(&self) -> Angle {
        self.twist
    }

    /// Returns the constituent parts of this orientation vector.
    #[must_use]
    pub fn components(&self) -> Components {
        Components {
            x: self.vec.x,
            y: self.vec.y,
            z: self.vec.z,
            twist: self.twist,
        }
    }

    /// The length of the direction vector.
    ///
    /// This is 1 (to within floating point) by construction; it is exposed so that callers
    /// can assert the invariant rather than trust it.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.vec.norm()
    }

    /// Renormalizes the direction vector.
    ///
    /// The direction is already renormalized on every mutation, so this only ever corrects
    /// accumulated floating-point drift.
    pub fn normalize(&mut self) -> &mut Self {
        self.vec.normalize_mut();
        self
    }

    /// Sets all components of this orientation vector, normalizing the direction.
    pub fn set(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
        twist: impl Into<Angle>,
    ) -> Result<&mut Self, DegenerateVector> {
        self.set_direction(x, y, z)?;
        self.twist = twist.into();
        Ok(self)
    }

    /// Sets the pointing direction, normalizing it; the twist is left untouched.
    pub fn set_direction(&mut self, x: f64, y: f64, z: f64) -> Result<&mut Self, DegenerateVector> {
        let direction =
            Unit::try_new(Vector3::new(x, y, z), f64::EPSILON).ok_or(DegenerateVector)?;
        self.vec = direction.into_inner();
        Ok(self)
    }

    /// Sets the twist about the pointing direction; the direction is left untouched.
    pub fn set_twist(&mut self, twist: impl Into<Angle>) -> &mut Self {
        self.twist = twist.into();
        self
    }

    /// Copies the components of `other` into `self`.
    pub fn copy_from(&mut self, other: &Self) -> &mut Self {
        *self = *other;
        self
    }

    /// Returns this orientation vector with the direction's x component replaced.
    ///
    /// The direction is renormalized, so the other two components generally change as well —
    /// which is why this is an explicit method rather than a field.
    pub fn with_x(mut self, x: f64) -> Result<Self, DegenerateVector> {
        self.set_direction(x, self.vec.y, self.vec.z)?;
        Ok(self)
    }

    /// Returns this orientation vector with the direction's y component replaced.
    ///
    /// See [`OrientationVector::with_x`] for the renormalization caveat.
    pub fn with_y(mut self, y: f64) -> Result<Self, DegenerateVector> {
        self.set_direction(self.vec.x, y, self.vec.z)?;
        Ok(self)
    }

    /// Returns this orientation vector with the direction's z component replaced.
    ///
    /// See [`OrientationVector::with_x`] for the renormalization caveat.
    pub fn with_z(mut self, z: f64) -> Result<Self, DegenerateVector> {
        self.set_direction(self.vec.x, self.vec.y, z)?;
        Ok(self)
    }

    /// Returns this orientation vector with the twist replaced.
    #[must_use]
    pub fn with_twist(mut self, twist: impl Into<Angle>) -> Self {
        self.twist = twist.into();
        self
    }

    /// Returns the unit quaternion describing the same orientation as this orientation
    /// vector.
    ///
    /// The direction is read as a point on the unit sphere: its colatitude is `acos(z)` and
    /// its longitude `atan2(y, x)`. The result is then the intrinsic Z-Y-Z composition of
    /// longitude, colatitude, and twist, written out as the closed-form half-angle product.
    ///
    /// At a pole (`1 - |z| ≤` [`EPSILON`]) the longitude is undefined and taken to be zero by
    /// convention; movement through the pole stays smooth because the twist picks up what the
    /// longitude can no longer express. This function is total — any orientation vector
    /// converts.
    #[must_use]
    pub fn to_quaternion(&self) -> UnitQuaternion {
        // clamp to guard against normalization leaving z at 1 + 1e-16
        let lat = self.vec.z.clamp(-1., 1.).acos();
        let lon = if 1. - self.vec.z.abs() > EPSILON {
            self.vec.y.atan2(self.vec.x)
        } else {
            0.
        };

        let (s0, c0) = (lon / 2.).sin_cos();
        let (s1, c1) = (lat / 2.).sin_cos();
        let (s2, c2) = (self.twist.get::<radian>() / 2.).sin_cos();

        UnitQuaternion::new_normalize(Quaternion::new(
            c0 * c1 * c2 - s0 * c1 * s2,
            c0 * s1 * s2 - s0 * s1 * c2,
            c0 * s1 * c2 + s0 * s1 * s2,
            s0 * c1 * c2 + c0 * c1 * s2,
        ))
    }

    /// Sets this orientation vector to describe the same rotation as the given unit
    /// quaternion.
    ///
    /// The direction falls out directly: it is where the rotation sends the body +Z axis.
    /// The twist takes more care. Away from the poles it is the angle between two planes
    /// through the direction — the one containing the rotated body X axis and the one
    /// containing global +Z — recovered via their normals. `acos` of the normals' dot
    /// product strips the sign of that angle, so the sign is resolved by probing: rotate
    /// global +Z by the negated candidate angle about the pointing direction, and if that
    /// lands in the body-X plane (normals agreeing to within [`EPSILON`]²), the negative
    /// candidate was the right one.
    ///
    /// At a pole the planes above are undefined, and the twist is instead read off the
    /// rotated body X axis directly. The two pole branches (+Z vs −Z) differ by a sign flip
    /// of one `atan2` argument; that asymmetry is what keeps
    /// `to_quaternion(set_from_quaternion(q))` consistent with `q` on both sides of the
    /// sphere.
    ///
    /// This function is total; accuracy degrades smoothly as the input approaches the pole
    /// threshold.
    pub fn set_from_quaternion(&mut self, quaternion: &UnitQuaternion) -> &mut Self {
        // Where the rotation sends the body -X and +Z axes. -X (rather than +X) is the
        // representation's probe convention; the pole branches below assume it.
        let new_x = quaternion * Vector3::new(-1., 0., 0.);
        let new_z = quaternion * Vector3::z();

        let twist = if 1. - new_z.z.abs() > EPSILON {
            // normal to the plane spanned by the pointing direction and the rotated body X
            let normal_local = new_z.cross(&new_x);
            // normal to the plane spanned by the pointing direction and global +Z
            let normal_global = new_z.cross(&Vector3::z());

            let cos_theta = (normal_local.dot(&normal_global)
                / (normal_local.norm() * normal_global.norm()))
            .clamp(-1., 1.);
            let theta = cos_theta.acos();

            if theta > EPSILON {
                // probe with the -theta candidate: rotate global +Z about the pointing
                // direction and check whether we wind up coplanar with the rotated body X
                let probe = AxisAngle::new(
                    Angle::new::<radian>(-theta),
                    new_z.x,
                    new_z.y,
                    new_z.z,
                )
                .expect("rotating a unit vector by a unit quaternion keeps it unit length")
                .to_quaternion();
                let test_z = probe * Vector3::z();
                let normal_test = new_z.cross(&test_z);

                let cos_test = normal_local.dot(&normal_test)
                    / (normal_local.norm() * normal_test.norm());
                if 1. - cos_test < EPSILON * EPSILON {
                    -theta
                } else {
                    theta
                }
            } else {
                // the planes coincide; no twist to resolve
                0.
            }
        } else if new_z.z < 0. {
            // pointing (nearly) straight along global -Z; longitude is degenerate, so the
            // twist comes straight off the rotated body X axis
            -new_x.y.atan2(new_x.x)
        } else {
            // same, along global +Z; note the flipped atan2 x-argument relative to the -Z
            // branch
            -new_x.y.atan2(-new_x.x)
        };

        self.vec = new_z.normalize();
        self.twist = Angle::new::<radian>(twist);
        self
    }

    /// Returns the Euler angles (in the given order) describing the same orientation.
    ///
    /// Composes [`OrientationVector::to_quaternion`] with
    /// [`EulerAngles::from_quaternion`].
    #[must_use]
    pub fn to_euler_angles(&self, order: EulerOrder) -> EulerAngles {
        EulerAngles::from_quaternion(&self.to_quaternion(), order)
    }
}

impl Display for OrientationVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pointing ({:?}, {:?}, {:?}) twisted by {:?}°",
            to_display_precision(self.vec.x),
            to_display_precision(self.vec.y),
            to_display_precision(self.vec.z),
            to_display_precision(self.twist.get::<degree>()),
        )
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for OrientationVector {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.vec.abs_diff_eq(&other.vec, epsilon)
            && self
                .twist
                .get::<radian>()
                .abs_diff_eq(&other.twist.get::<radian>(), epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for OrientationVector {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.vec.relative_eq(&other.vec, epsilon, max_relative)
            && self.twist.get::<radian>().relative_eq(
                &other.twist.get::<radian>(),
                epsilon,
                max_relative,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use quickcheck::{quickcheck, TestResult};
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn r(radians: f64) -> Angle {
        Angle::new::<radian>(radians)
    }

    fn quat(w: f64, i: f64, j: f64, k: f64) -> UnitQuaternion {
        UnitQuaternion::new_normalize(Quaternion::new(w, i, j, k))
    }

    /// Unit quaternions that differ only by global sign describe the same rotation.
    fn assert_same_rotation(a: &UnitQuaternion, b: &UnitQuaternion, epsilon: f64) {
        let dot = a.quaternion().dot(b.quaternion());
        assert!(
            dot.abs() > 1. - epsilon,
            "quaternions describe different rotations: {a} vs {b} (|dot| = {})",
            dot.abs()
        );
    }

    #[rstest]
    #[case((0., -1., 0., FRAC_PI_2), (0.707_106_781_186_547_6, 0.707_106_781_186_547_6, 0., 0.))]
    #[case((0., 1., 0., -FRAC_PI_2), (0.707_106_781_186_547_6, -0.707_106_781_186_547_6, 0., 0.))]
    #[case((-0.5376, 0., 0.8432, -PI), (0.96, 0., -0.28, 0.))]
    #[case((0., 0., 1., -0.567_588_218_416_655_7), (0.96, 0., 0., -0.28))]
    #[case((0., 0.5376, 0.8432, -FRAC_PI_2), (0.96, -0.28, 0., 0.))]
    #[case((0., -0.5376, 0.8432, FRAC_PI_2), (0.96, 0.28, 0., 0.))]
    #[case((0., 1., 0., -PI), (0.5, -0.5, -0.5, -0.5))]
    #[case(
        (0.504_843_794_294_005_4, 0.588_984_426_676_339_7, 0.631_054_742_867_507, 0.02),
        (0.816_632_212_270_443, -0.175_559_660_254_131_42, 0.391_983_971_939_798_17, 0.385_537_548_516_400_1)
    )]
    fn converts_to_the_expected_quaternion(
        #[case] ov: (f64, f64, f64, f64),
        #[case] expected: (f64, f64, f64, f64),
    ) {
        let (x, y, z, twist) = ov;
        let (w, i, j, k) = expected;

        let sut = OrientationVector::new(x, y, z, r(twist)).expect("direction is non-zero");
        assert_same_rotation(&sut.to_quaternion(), &quat(w, i, j, k), 1e-9);
    }

    #[rstest]
    #[case((0.707_106_781_186_547_6, 0.707_106_781_186_547_6, 0., 0.), (0., -1., 0., FRAC_PI_2))]
    #[case((0.707_106_781_186_547_6, -0.707_106_781_186_547_6, 0., 0.), (0., 1., 0., -FRAC_PI_2))]
    #[case((0.96, 0., -0.28, 0.), (-0.5376, 0., 0.8432, -PI))]
    #[case((0.96, 0., 0., -0.28), (0., 0., 1., -0.567_588_218_416_655_7))]
    #[case((0.96, -0.28, 0., 0.), (0., 0.5376, 0.8432, -FRAC_PI_2))]
    #[case((0.96, 0.28, 0., 0.), (0., -0.5376, 0.8432, FRAC_PI_2))]
    #[case((0.5, -0.5, -0.5, -0.5), (0., 1., 0., -PI))]
    #[case(
        (0.816_632_212_270_443, -0.175_559_660_254_131_42, 0.391_983_971_939_798_17, 0.385_537_548_516_400_1),
        (0.504_843_794_294_005_4, 0.588_984_426_676_339_7, 0.631_054_742_867_507, 0.02)
    )]
    fn converts_from_the_expected_quaternion(
        #[case] quaternion: (f64, f64, f64, f64),
        #[case] expected: (f64, f64, f64, f64),
    ) {
        let (w, i, j, k) = quaternion;
        let (x, y, z, twist) = expected;

        let sut = OrientationVector::from_quaternion(&quat(w, i, j, k));
        let expected = OrientationVector::new(x, y, z, r(twist)).expect("direction is non-zero");
        assert_abs_diff_eq!(sut, expected, epsilon = 1e-7);
    }

    /// The sign disambiguation must tell `+theta` from `-theta` — a probe about the wrong
    /// axis passes the symmetric vectors above but mangles small negative twists.
    #[rstest]
    #[case(0.02)]
    #[case(-0.02)]
    #[case(1.3)]
    #[case(-1.3)]
    fn twist_sign_is_disambiguated(#[case] twist: f64) {
        let sut = OrientationVector::new(0.3, -0.2, 0.5, r(twist)).expect("direction is non-zero");
        let back = OrientationVector::from_quaternion(&sut.to_quaternion());
        assert_abs_diff_eq!(sut, back, epsilon = 1e-7);
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert_eq!(
            OrientationVector::new(0., 0., 0., r(1.)),
            Err(DegenerateVector)
        );

        let mut ov = OrientationVector::default();
        assert_eq!(ov.set_direction(0., 0., 0.), Err(DegenerateVector));
        // the failed write must not have clobbered the direction
        assert_eq!(ov, OrientationVector::default());
    }

    #[rstest]
    #[case((10., 0., 0.))]
    #[case((1., 2., -2.))]
    #[case((1e-3, 1e-3, 1e-3))]
    fn direction_is_normalized_on_every_mutation(#[case] direction: (f64, f64, f64)) {
        let (x, y, z) = direction;

        let sut = OrientationVector::new(x, y, z, r(0.1)).expect("direction is non-zero");
        assert_abs_diff_eq!(sut.length(), 1., epsilon = 1e-12);

        let sut = sut.with_x(4.).expect("direction stays non-zero");
        assert_abs_diff_eq!(sut.length(), 1., epsilon = 1e-12);

        let mut sut = sut;
        sut.set_direction(y, z, x).expect("direction is non-zero");
        assert_abs_diff_eq!(sut.length(), 1., epsilon = 1e-12);
    }

    #[test]
    fn set_from_quaternion_keeps_the_direction_unit_length() {
        let q = quat(0.3, -0.4, 0.2, 0.6);
        let mut sut = OrientationVector::default();
        sut.set_from_quaternion(&q);
        assert_abs_diff_eq!(sut.length(), 1., epsilon = 1e-12);
    }

    /// At the pole the longitude is conventionally zero, with the twist absorbing the whole
    /// rotation about global Z.
    #[rstest]
    #[case(0.3, 0.4)]
    #[case(-1.0, 0.25)]
    #[case(2.0, -0.5)]
    fn pole_twist_folds_in_the_longitude(#[case] lon: f64, #[case] twist: f64) {
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), lon)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), twist);
        let sut = OrientationVector::from_quaternion(&q);
        assert_abs_diff_eq!(sut.twist().get::<radian>(), lon + twist, epsilon = 1e-9);
        assert_abs_diff_eq!(sut.z(), 1., epsilon = 1e-12);
    }

    /// Round-trip accuracy must not jump as a direction crosses the pole threshold; the
    /// branches disagree on how the rotation splits into longitude and twist, but must agree
    /// on the rotation itself.
    #[rstest]
    #[case(0.010)] // inside the pole threshold: 1 - cos(0.010) ≈ 5.0e-5 ≤ EPSILON
    #[case(0.015)] // outside: 1 - cos(0.015) ≈ 1.1e-4 > EPSILON
    #[case(0.100)] // comfortably outside
    fn round_trip_is_continuous_across_the_pole(#[case] tilt: f64) {
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.3)
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), tilt)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.4);

        let back = OrientationVector::from_quaternion(&q).to_quaternion();
        assert_same_rotation(&q, &back, 1e-5);
    }

    quickcheck! {
        fn round_trips_through_a_quaternion_up_to_sign(w: f64, i: f64, j: f64, k: f64) -> TestResult {
            if ![w, i, j, k].iter().all(|c| c.is_finite()) {
                return TestResult::discard();
            }
            let q = Quaternion::new(w, i, j, k);
            if !(1e-3..1e6).contains(&q.norm()) {
                return TestResult::discard();
            }
            let q = UnitQuaternion::new_normalize(q);

            // the property holds away from the poles; the pole neighborhood is covered by
            // the continuity test above
            let new_z = q * Vector3::z();
            if 1. - new_z.z.abs() <= EPSILON * 10. {
                return TestResult::discard();
            }

            let back = OrientationVector::from_quaternion(&q).to_quaternion();
            let dot = q.quaternion().dot(back.quaternion());
            TestResult::from_bool(dot.abs() > 1. - 1e-7)
        }
    }

    #[test]
    fn copy_from_copies_everything() {
        let source = OrientationVector::new(0.2, -0.7, 0.4, r(2.5)).expect("non-zero");
        let mut sut = OrientationVector::default();
        sut.copy_from(&source);
        assert_eq!(sut, source);
    }

    #[test]
    fn twist_is_not_wrapped() {
        let sut = OrientationVector::default().with_twist(r(3. * PI));
        assert_eq!(sut.twist(), r(3. * PI));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn round_trips_through_serde() {
        let sut = OrientationVector::new(0.2, -0.7, 0.4, r(1.25)).expect("non-zero");
        let yaml = serde_yaml::to_string(&sut).expect("serializes");
        let back: OrientationVector = serde_yaml::from_str(&yaml).expect("deserializes");
        assert_eq!(sut, back);
    }
}
