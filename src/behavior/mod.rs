//! Decision logic for the kit's driving modes, kept free of hardware so it
//! can be tested on the host: each function or state machine maps sensor
//! updates to [`DriveAction`](crate::actuators::drive::DriveAction)s.

pub mod avoid;
pub mod follow;
pub mod remote;

pub use avoid::ObstacleAvoider;
