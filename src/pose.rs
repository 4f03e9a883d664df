use crate::euler::{EulerAngles, EulerOrder};
use crate::orientation_vector::OrientationVector;
use crate::{DegenerateVector, UnitQuaternion};
use std::fmt;
use std::fmt::{Display, Formatter};
use uom::si::f64::Angle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One rotation, held simultaneously as a unit quaternion, an Euler-angle triple, and an
/// [`OrientationVector`] — and kept that way.
///
/// Every setter propagates the mutation into the other two representations before it
/// returns, so the accessors always agree with each other (to within numerical epsilon; see
/// the conversion docs for the pole caveats). This is the type to reach for when something —
/// typically a properties panel — wants to show and edit the same orientation in all three
/// notations at once.
///
/// Propagation happens in a single internal pass that writes the other two representations
/// directly, rather than through change notifications that could observe each other; a
/// mutation can therefore never trigger a second round of propagation, by construction.
///
/// The Euler order travels with the stored [`EulerAngles`] value: it is chosen at
/// construction (see [`SynchronizedPose::with_order`]), and replaced only when
/// [`SynchronizedPose::set_euler_angles`] stores a value with a different order.
///
/// There is no internal synchronization — a `SynchronizedPose` should be owned by one
/// caller, and concurrent mutation from several threads serialized externally.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SynchronizedPose {
    quaternion: UnitQuaternion,
    euler: EulerAngles,
    orientation_vector: OrientationVector,
}

/// Which representation the caller just wrote; the other two get recomputed from it.
enum Changed {
    Quaternion,
    Euler,
    OrientationVector,
}

impl SynchronizedPose {
    /// Constructs the identity rotation, with Euler angles in [`EulerOrder::Xyz`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_order(EulerOrder::Xyz)
    }

    /// Constructs the identity rotation, with Euler angles in the given order.
    #[must_use]
    pub fn with_order(order: EulerOrder) -> Self {
        Self {
            quaternion: UnitQuaternion::identity(),
            euler: EulerAngles::identity(order),
            orientation_vector: OrientationVector::default(),
        }
    }

    /// The rotation as a unit quaternion.
    #[must_use]
    pub fn quaternion(&self) -> UnitQuaternion {
        self.quaternion
    }

    /// The rotation as Euler angles (in the pose's current order).
    #[must_use]
    pub fn euler_angles(&self) -> EulerAngles {
        self.euler
    }

    /// The rotation as an orientation vector.
    #[must_use]
    pub fn orientation_vector(&self) -> OrientationVector {
        self.orientation_vector
    }

    /// Replaces the rotation with the given quaternion, recomputing the Euler angles and the
    /// orientation vector before returning.
    pub fn set_quaternion(&mut self, quaternion: UnitQuaternion) -> &mut Self {
        self.quaternion = quaternion;
        self.reconcile(Changed::Quaternion)
    }

    /// Replaces the rotation with the given Euler angles, recomputing the quaternion and the
    /// orientation vector before returning.
    ///
    /// The stored value's order becomes the pose's order.
    pub fn set_euler_angles(&mut self, euler: EulerAngles) -> &mut Self {
        self.euler = euler;
        self.reconcile(Changed::Euler)
    }

    /// Replaces the rotation with the given orientation vector, recomputing the quaternion
    /// and the Euler angles before returning.
    pub fn set_orientation_vector(&mut self, orientation_vector: OrientationVector) -> &mut Self {
        self.orientation_vector = orientation_vector;
        self.reconcile(Changed::OrientationVector)
    }

    /// Replaces just the twist of the orientation vector, propagating as
    /// [`SynchronizedPose::set_orientation_vector`] does.
    pub fn set_twist(&mut self, twist: impl Into<Angle>) -> &mut Self {
        self.orientation_vector.set_twist(twist);
        self.reconcile(Changed::OrientationVector)
    }

    /// Replaces just the pointing direction of the orientation vector (normalizing it),
    /// propagating as [`SynchronizedPose::set_orientation_vector`] does.
    ///
    /// On [`DegenerateVector`] nothing changes and nothing propagates.
    pub fn set_direction(
        &mut self,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<&mut Self, DegenerateVector> {
        self.orientation_vector.set_direction(x, y, z)?;
        Ok(self.reconcile(Changed::OrientationVector))
    }

    /// Recomputes the two representations the caller did not write.
    ///
    /// All writes here are direct field assignments; nothing in this function (or in the
    /// conversions it calls) goes back through the public setters, so a propagation pass
    /// cannot re-trigger itself.
    fn reconcile(&mut self, changed: Changed) -> &mut Self {
        match changed {
            Changed::Quaternion => {
                self.euler = EulerAngles::from_quaternion(&self.quaternion, self.euler.order());
                self.orientation_vector.set_from_quaternion(&self.quaternion);
            }
            Changed::Euler => {
                self.quaternion = self.euler.to_quaternion();
                self.orientation_vector.set_from_quaternion(&self.quaternion);
            }
            Changed::OrientationVector => {
                self.quaternion = self.orientation_vector.to_quaternion();
                self.euler = EulerAngles::from_quaternion(&self.quaternion, self.euler.order());
            }
        }
        self
    }
}

impl Default for SynchronizedPose {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SynchronizedPose {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}; quaternion {})",
            self.orientation_vector, self.euler, self.quaternion
        )
    }
}
