//! This library provides an easy-to-reason-about 3D orientation representation — the
//! [orientation vector][ov-docs] — for roboticists with other things to worry about than
//! quaternions.
//!
//! An [`OrientationVector`] describes an orientation as "a direction to point in" (a unit
//! vector) plus "how much to spin about that direction" (a twist angle). For a robot
//! end-effector this tends to be far more intuitive than a quaternion or a triple of Euler
//! angles: the vector is where the tool points, and the twist is how the tool is rolled about
//! its own axis. Unlike rotation matrices there is no representational redundancy, and unlike
//! Euler angles there is no rotation-order ambiguity baked into the value.
//!
//! The crate's job is the conversion machinery between that representation, unit quaternions
//! (via [`OrientationVector::to_quaternion`] and [`OrientationVector::set_from_quaternion`]),
//! and Euler angles with an explicit rotation order ([`EulerAngles`]). Quaternions are
//! [`nalgebra`]'s right-handed, Hamilton-convention [`UnitQuaternion`], re-exported here so
//! that you can feed the results straight into whatever else speaks nalgebra.
//!
//! ```
//! use orivec::OrientationVector;
//! use uom::si::f64::Angle;
//! use uom::si::angle::degree;
//!
//! // point along -Y, twisted a quarter turn about that direction
//! let ov = OrientationVector::new(0., -1., 0., Angle::new::<degree>(90.))
//!     .expect("direction is not the zero vector");
//!
//! let quaternion = ov.to_quaternion();
//!
//! // and back again
//! let mut back = OrientationVector::default();
//! back.set_from_quaternion(&quaternion);
//! # use approx::assert_abs_diff_eq;
//! # assert_abs_diff_eq!(ov, back, epsilon = 1e-9);
//! ```
//!
//! When several representations of the same rotation need to coexist — say a UI that shows a
//! quaternion, Euler angles, and an orientation vector side by side and lets the user edit any
//! of them — use [`SynchronizedPose`]. Mutating any one representation through its setters
//! propagates consistent values into the other two before the call returns:
//!
//! ```
//! use orivec::{EulerAngles, EulerOrder, SynchronizedPose};
//! use uom::si::f64::Angle;
//! use uom::si::angle::radian;
//!
//! let mut pose = SynchronizedPose::new();
//! pose.set_euler_angles(EulerAngles::new(
//!     Angle::new::<radian>(0.),
//!     Angle::new::<radian>(0.),
//!     Angle::new::<radian>(1.2),
//!     EulerOrder::Xyz,
//! ));
//!
//! // the quaternion and the orientation vector now agree with the Euler angles
//! assert!((pose.orientation_vector().twist().get::<radian>() - 1.2).abs() < 1e-9);
//! ```
//!
//! # Degeneracies
//!
//! An orientation vector pointing (nearly) straight along global ±Z is at a *pole*: the
//! longitude of the direction is undefined there, much like longitude at the Earth's poles.
//! This is not an error — the conversions resolve it by convention (longitude zero, with the
//! twist absorbing the residual rotation about Z) — but conversion accuracy degrades smoothly
//! as a direction approaches the pole threshold. The shared tolerance governing that
//! threshold (and the twist sign disambiguation) is [`EPSILON`].
//!
//! The one hard error in this crate is [`DegenerateVector`]: asking for a direction from a
//! zero-length vector. That is always surfaced to the caller and never silently defaulted.
//!
//! [ov-docs]: https://docs.viam.com/operate/mobility/orientation-vector/

mod axis_angle;
mod euler;
mod orientation_vector;
mod pose;
mod util;

pub(crate) type Vector3 = nalgebra::Vector3<f64>;
pub(crate) type Quaternion = nalgebra::Quaternion<f64>;

/// The unit quaternion type consumed and produced by this crate's conversions.
///
/// Re-exported from [`nalgebra`]; right-handed, Hamilton convention.
pub type UnitQuaternion = nalgebra::UnitQuaternion<f64>;

/// Shared tolerance for the degenerate-configuration tests in the conversion algorithms.
///
/// A direction counts as being at a pole when `1 - |z|` is at most `EPSILON`, and a twist
/// whose plane angle comes out at most `EPSILON` is conventionally zero. The twist sign
/// disambiguation in [`OrientationVector::set_from_quaternion`] uses `EPSILON²`, which is
/// deliberately tighter — it compares the cosine of an angle between plane normals, where
/// first-order error terms vanish.
pub const EPSILON: f64 = 1e-4;

/// Error returned when an operation needs a direction but was handed a zero-length vector.
///
/// Normalizing the zero vector is meaningless, so constructors and mutators that would have
/// to do so refuse instead. There is deliberately no fallback direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot derive a direction from a zero-length vector")]
pub struct DegenerateVector;

pub use axis_angle::AxisAngle;
pub use euler::{EulerAngles, EulerOrder};
pub use orientation_vector::{Components, OrientationVector};
pub use pose::SynchronizedPose;
