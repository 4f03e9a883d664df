use crate::{DegenerateVector, UnitQuaternion, Vector3};
use nalgebra::Unit;
use std::fmt;
use std::fmt::{Display, Formatter};
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rotation by an angle about an arbitrary (unit) axis.
///
/// This is the minimal rotate-a-point-about-an-axis helper that
/// [`OrientationVector::set_from_quaternion`](crate::OrientationVector::set_from_quaternion)
/// uses to probe twist-sign candidates, exposed because it is occasionally the
/// representation you are handed by other tooling.
///
/// The axis is normalized at construction, so a value of this type always holds a valid
/// rotation; a zero-length axis is rejected with [`DegenerateVector`] up front rather than
/// producing NaNs later.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisAngle {
    axis: Unit<Vector3>,
    angle: Angle,
}

impl AxisAngle {
    /// Constructs a rotation of `angle` about the axis `(x, y, z)`.
    ///
    /// The axis is normalized; it does not need to be unit length on the way in.
    pub fn new(
        angle: impl Into<Angle>,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<Self, DegenerateVector> {
        let axis = Unit::try_new(Vector3::new(x, y, z), f64::EPSILON).ok_or(DegenerateVector)?;
        Ok(Self {
            axis,
            angle: angle.into(),
        })
    }

    /// The (unit) rotation axis.
    #[must_use]
    pub fn axis(&self) -> Unit<Vector3> {
        self.axis
    }

    /// The rotation angle.
    #[must_use]
    pub fn angle(&self) -> Angle {
        self.angle
    }

    /// Returns the unit quaternion describing the same rotation,
    /// `(axis · sin(angle/2), cos(angle/2))`.
    #[must_use]
    pub fn to_quaternion(&self) -> UnitQuaternion {
        UnitQuaternion::from_axis_angle(&self.axis, self.angle.get::<radian>())
    }
}

impl Display for AxisAngle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}° about ({:?}, {:?}, {:?})",
            self.angle.get::<degree>(),
            self.axis.x,
            self.axis.y,
            self.axis.z,
        )
    }
}
