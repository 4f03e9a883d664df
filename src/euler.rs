use crate::util::to_display_precision;
use crate::{UnitQuaternion, Vector3};
use std::fmt;
use std::fmt::{Display, Formatter};
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The order in which the three per-axis rotations of an [`EulerAngles`] are applied.
///
/// Rotations are *intrinsic*: each subsequent rotation is about the body axis as moved by the
/// rotations before it. The same physical rotation decomposes into different angle triples
/// under different orders, which is why the order is part of the value's identity rather than
/// a convention left to the reader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EulerOrder {
    Xyz,
    Yxz,
    Zxy,
    Zyx,
    Yzx,
    Xzy,
}

impl EulerOrder {
    fn axes(self) -> [Axis; 3] {
        use Axis::{X, Y, Z};
        match self {
            Self::Xyz => [X, Y, Z],
            Self::Yxz => [Y, X, Z],
            Self::Zxy => [Z, X, Y],
            Self::Zyx => [Z, Y, X],
            Self::Yzx => [Y, Z, X],
            Self::Xzy => [X, Z, Y],
        }
    }
}

impl Display for EulerOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Xyz => "XYZ",
            Self::Yxz => "YXZ",
            Self::Zxy => "ZXY",
            Self::Zyx => "ZYX",
            Self::Yzx => "YZX",
            Self::Xzy => "XZY",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
    Z,
}

/// Three per-axis rotation angles plus the [`EulerOrder`] they are applied in.
///
/// `x` is always the rotation about the body X axis, `y` about Y, and `z` about Z — the order
/// tag decides only the sequence in which the three are applied, not which angle belongs to
/// which axis.
///
/// Be aware that Euler angles are the representation most prone to ambiguity in the
/// literature (intrinsic vs extrinsic, which axis is "yaw", and so on). Within this crate
/// they exist because they are what humans type into orientation fields; for computation,
/// convert to a quaternion early via [`EulerAngles::to_quaternion`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EulerAngles {
    x: Angle,
    y: Angle,
    z: Angle,
    order: EulerOrder,
}

impl EulerAngles {
    /// Constructs an Euler-angle triple applied in the given order.
    #[must_use]
    pub fn new(x: impl Into<Angle>, y: impl Into<Angle>, z: impl Into<Angle>, order: EulerOrder) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
            order,
        }
    }

    /// Constructs the all-zero (identity) triple in the given order.
    #[must_use]
    pub fn identity(order: EulerOrder) -> Self {
        use uom::ConstZero;
        Self::new(Angle::ZERO, Angle::ZERO, Angle::ZERO, order)
    }

    /// The rotation about the body X axis.
    #[must_use]
    pub fn x(&self) -> Angle {
        self.x
    }

    /// The rotation about the body Y axis.
    #[must_use]
    pub fn y(&self) -> Angle {
        self.y
    }

    /// The rotation about the body Z axis.
    #[must_use]
    pub fn z(&self) -> Angle {
        self.z
    }

    /// The order the three rotations are applied in.
    #[must_use]
    pub fn order(&self) -> EulerOrder {
        self.order
    }

    /// Returns the unit quaternion describing the same rotation: the product of the three
    /// axis rotations, composed intrinsically in the order named by the tag.
    #[must_use]
    pub fn to_quaternion(&self) -> UnitQuaternion {
        let [first, second, third] = self.order.axes();
        self.rotation_about(first) * self.rotation_about(second) * self.rotation_about(third)
    }

    fn rotation_about(&self, axis: Axis) -> UnitQuaternion {
        match axis {
            Axis::X => {
                UnitQuaternion::from_axis_angle(&Vector3::x_axis(), self.x.get::<radian>())
            }
            Axis::Y => {
                UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.y.get::<radian>())
            }
            Axis::Z => {
                UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.z.get::<radian>())
            }
        }
    }

    /// Decomposes a unit quaternion into Euler angles applied in the given order.
    ///
    /// This is the standard rotation-matrix extraction: one angle comes from an `asin` of a
    /// single matrix element (clamped to [-1, 1] against floating-point overshoot), the other
    /// two from `atan2`s of element pairs. When the `asin` element saturates the rotation is
    /// gimbal locked — the two remaining axes have collapsed onto each other — and only the
    /// sum or difference of their angles is observable; the extraction then conventionally
    /// zeroes one of them.
    #[must_use]
    pub fn from_quaternion(quaternion: &UnitQuaternion, order: EulerOrder) -> Self {
        // beyond this the asin axis is within ~0.026° of ±90° and the atan2 element pairs
        // degenerate; same cutoff the major scene-graph libraries use
        const GIMBAL_CUTOFF: f64 = 0.999_999_9;

        let rotation = quaternion.to_rotation_matrix();
        let m = rotation.matrix();

        let (x, y, z) = match order {
            EulerOrder::Xyz => {
                let y = m[(0, 2)].clamp(-1., 1.).asin();
                if m[(0, 2)].abs() < GIMBAL_CUTOFF {
                    ((-m[(1, 2)]).atan2(m[(2, 2)]), y, (-m[(0, 1)]).atan2(m[(0, 0)]))
                } else {
                    (m[(2, 1)].atan2(m[(1, 1)]), y, 0.)
                }
            }
            EulerOrder::Yxz => {
                let x = (-m[(1, 2)].clamp(-1., 1.)).asin();
                if m[(1, 2)].abs() < GIMBAL_CUTOFF {
                    (x, m[(0, 2)].atan2(m[(2, 2)]), m[(1, 0)].atan2(m[(1, 1)]))
                } else {
                    (x, (-m[(2, 0)]).atan2(m[(0, 0)]), 0.)
                }
            }
            EulerOrder::Zxy => {
                let x = m[(2, 1)].clamp(-1., 1.).asin();
                if m[(2, 1)].abs() < GIMBAL_CUTOFF {
                    (x, (-m[(2, 0)]).atan2(m[(2, 2)]), (-m[(0, 1)]).atan2(m[(1, 1)]))
                } else {
                    (x, 0., m[(1, 0)].atan2(m[(0, 0)]))
                }
            }
            EulerOrder::Zyx => {
                let y = (-m[(2, 0)].clamp(-1., 1.)).asin();
                if m[(2, 0)].abs() < GIMBAL_CUTOFF {
                    (m[(2, 1)].atan2(m[(2, 2)]), y, m[(1, 0)].atan2(m[(0, 0)]))
                } else {
                    (0., y, (-m[(0, 1)]).atan2(m[(1, 1)]))
                }
            }
            EulerOrder::Yzx => {
                let z = m[(1, 0)].clamp(-1., 1.).asin();
                if m[(1, 0)].abs() < GIMBAL_CUTOFF {
                    ((-m[(1, 2)]).atan2(m[(1, 1)]), (-m[(2, 0)]).atan2(m[(0, 0)]), z)
                } else {
                    (0., m[(0, 2)].atan2(m[(2, 2)]), z)
                }
            }
            EulerOrder::Xzy => {
                let z = (-m[(0, 1)].clamp(-1., 1.)).asin();
                if m[(0, 1)].abs() < GIMBAL_CUTOFF {
                    (m[(2, 1)].atan2(m[(1, 1)]), m[(0, 2)].atan2(m[(0, 0)]), z)
                } else {
                    ((-m[(1, 2)]).atan2(m[(2, 2)]), 0., z)
                }
            }
        };

        Self {
            x: Angle::new::<radian>(x),
            y: Angle::new::<radian>(y),
            z: Angle::new::<radian>(z),
            order,
        }
    }
}

impl Display for EulerAngles {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x: {:?}°, y: {:?}°, z: {:?}° applied {}",
            to_display_precision(self.x.get::<degree>()),
            to_display_precision(self.y.get::<degree>()),
            to_display_precision(self.z.get::<degree>()),
            self.order,
        )
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for EulerAngles {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.order == other.order
            && self
                .x
                .get::<radian>()
                .abs_diff_eq(&other.x.get::<radian>(), epsilon)
            && self
                .y
                .get::<radian>()
                .abs_diff_eq(&other.y.get::<radian>(), epsilon)
            && self
                .z
                .get::<radian>()
                .abs_diff_eq(&other.z.get::<radian>(), epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for EulerAngles {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.order == other.order
            && self.x.get::<radian>().relative_eq(
                &other.x.get::<radian>(),
                epsilon,
                max_relative,
            )
            && self.y.get::<radian>().relative_eq(
                &other.y.get::<radian>(),
                epsilon,
                max_relative,
            )
            && self.z.get::<radian>().relative_eq(
                &other.z.get::<radian>(),
                epsilon,
                max_relative,
            )
    }
}
