//! Host-side control library for the OpenArm DM-series CAN servo
//! actuators: a two-joint arm plus a compliant gripper on a shared CAN
//! 2.0B/CAN-FD bus.
//!
//! The public surface is flat, mirroring the original Python bindings:
//! `OpenArm` is the entry point, `MotorType`/`MotorVariable` describe the
//! actuator family, and `codec` exposes the wire-level encode/decode
//! functions for callers who want to bypass the facade.

pub mod codec;
pub mod device;
pub mod error;
pub mod limit;
pub mod motor;
pub mod openarm;
pub mod socket;
pub mod types;
pub mod variable;

pub use codec::{CanPacketDecoder, CanPacketEncoder};
pub use device::{ArmComponent, DeviceCollection, GripperComponent};
pub use error::{Error, Result};
pub use limit::{LimitParam, MotorType};
pub use motor::Motor;
pub use openarm::OpenArm;
pub use socket::CanBus;
pub use types::{
    CANPacket, CallbackMode, CanFdFrame, CanFrame, ControlMode, MITParam, MotorStateResult,
    ParamResult, PosForceParam, PosVelParam, BROADCAST_CAN_ID,
};
pub use variable::MotorVariable;
