//! Device collections: an ordered list of motors plus a receive-ID index
//! for O(1) dispatch during `recv_all`.
//!
//! [`ArmComponent`] and [`GripperComponent`] both wrap [`DeviceCollection`];
//! the gripper additionally constrains itself to exactly one motor and adds
//! a couple of convenience methods over the shared operations.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use tracing::{debug, warn};

use crate::codec::{decode, encode};
use crate::error::{Error, Result};
use crate::limit::{LimitParam, MotorType};
use crate::motor::Motor;
use crate::socket::CanBus;
use crate::types::{CanFrame, ControlMode, MITParam, PosForceParam, PosVelParam};
use crate::variable::MotorVariable;

/// Default upper bound on frames drained by one `recv_all` call, expressed
/// as a multiple of the collection's motor count (spec.md §4.4). Exposed to
/// [`crate::openarm`] so it can size its own combined drain the same way.
pub(crate) const DRAIN_FACTOR: usize = 2;

/// An ordered set of motors sharing one socket, dispatched by receive ID.
pub struct DeviceCollection {
    motors: Vec<Motor>,
    recv_index: HashMap<u32, usize>,
}

impl DeviceCollection {
    /// Builds a collection from motor records, rejecting overlapping
    /// receive IDs.
    pub fn new(motors: Vec<Motor>) -> Result<Self> {
        let mut recv_index = HashMap::with_capacity(motors.len());
        for (i, m) in motors.iter().enumerate() {
            if recv_index.insert(m.recv_id(), i).is_some() {
                return Err(Error::config(format!(
                    "duplicate receive id 0x{:X} in device collection",
                    m.recv_id()
                )));
            }
        }
        Ok(Self { motors, recv_index })
    }

    #[must_use]
    pub fn motor_count(&self) -> usize {
        self.motors.len()
    }

    #[must_use]
    pub fn motors(&self) -> &[Motor] {
        &self.motors
    }

    #[must_use]
    pub fn motor(&self, index: usize) -> Option<&Motor> {
        self.motors.get(index)
    }

    /// Unchecked index access for callers (namely [`crate::openarm::OpenArm`])
    /// that already resolved `index` via their own copy of this collection's
    /// receive-ID map.
    pub(crate) fn motor_at_mut(&mut self, index: usize) -> Option<&mut Motor> {
        self.motors.get_mut(index)
    }

    fn motor_mut(&mut self, index: usize) -> Result<&mut Motor> {
        self.motors
            .get_mut(index)
            .ok_or_else(|| Error::config(format!("no motor at index {index}")))
    }

    fn check_arity(&self, got: usize) -> Result<()> {
        let expected = self.motors.len();
        if got != expected {
            return Err(Error::Arity { expected, got });
        }
        Ok(())
    }

    fn write_one(&self, bus: &CanBus, index: usize, frame: CanFrame) -> Result<()> {
        debug!(index, can_id = frame.can_id, "writing command frame");
        bus.write(&frame)
    }

    pub fn enable_one(&mut self, bus: &CanBus, index: usize) -> Result<()> {
        let send_id = self.motor_mut(index)?.send_id();
        self.write_one(bus, index, encode::encode_enable(send_id).to_frame())?;
        self.motor_mut(index)?.set_enabled(true);
        Ok(())
    }

    pub fn enable_all(&mut self, bus: &CanBus) -> Result<()> {
        for i in 0..self.motors.len() {
            self.enable_one(bus, i)?;
        }
        Ok(())
    }

    pub fn disable_one(&mut self, bus: &CanBus, index: usize) -> Result<()> {
        let send_id = self.motor_mut(index)?.send_id();
        self.write_one(bus, index, encode::encode_disable(send_id).to_frame())?;
        self.motor_mut(index)?.set_enabled(false);
        Ok(())
    }

    pub fn disable_all(&mut self, bus: &CanBus) -> Result<()> {
        for i in 0..self.motors.len() {
            self.disable_one(bus, i)?;
        }
        Ok(())
    }

    pub fn set_zero_one(&mut self, bus: &CanBus, index: usize) -> Result<()> {
        let send_id = self.motor_mut(index)?.send_id();
        self.write_one(bus, index, encode::encode_set_zero(send_id).to_frame())
    }

    pub fn set_zero_all(&mut self, bus: &CanBus) -> Result<()> {
        for i in 0..self.motors.len() {
            self.set_zero_one(bus, i)?;
        }
        Ok(())
    }

    pub fn refresh_one(&self, bus: &CanBus, index: usize) -> Result<()> {
        let motor = self.motors.get(index).ok_or_else(|| Error::config(format!("no motor at index {index}")))?;
        self.write_one(bus, index, encode::encode_refresh(motor.send_id()).to_frame())
    }

    /// Polls every motor in turn, optionally sleeping `inter_frame_delay`
    /// between polls (Open Question 3 — see DESIGN.md).
    pub fn refresh_all(&self, bus: &CanBus, inter_frame_delay: Option<Duration>) -> Result<()> {
        for i in 0..self.motors.len() {
            self.refresh_one(bus, i)?;
            if let Some(delay) = inter_frame_delay {
                std::thread::sleep(delay);
            }
        }
        Ok(())
    }

    pub fn mit_control_one(&mut self, bus: &CanBus, index: usize, param: MITParam) -> Result<()> {
        let motor = self.motor_mut(index)?;
        let frame = encode::encode_mit(motor.send_id(), motor.limits(), param).to_frame();
        motor.set_control_mode(ControlMode::Mit);
        self.write_one(bus, index, frame)
    }

    pub fn mit_control_all(&mut self, bus: &CanBus, params: &[MITParam]) -> Result<()> {
        self.check_arity(params.len())?;
        for (i, param) in params.iter().enumerate() {
            self.mit_control_one(bus, i, *param)?;
        }
        Ok(())
    }

    pub fn posvel_control_one(&mut self, bus: &CanBus, index: usize, param: PosVelParam) -> Result<()> {
        let motor = self.motor_mut(index)?;
        let frame = encode::encode_pos_vel(motor.send_id(), param).to_frame();
        motor.set_control_mode(ControlMode::PosVel);
        self.write_one(bus, index, frame)
    }

    pub fn posvel_control_all(&mut self, bus: &CanBus, params: &[PosVelParam]) -> Result<()> {
        self.check_arity(params.len())?;
        for (i, param) in params.iter().enumerate() {
            self.posvel_control_one(bus, i, *param)?;
        }
        Ok(())
    }

    pub fn vel_control_one(&mut self, bus: &CanBus, index: usize, dq: f32) -> Result<()> {
        let motor = self.motor_mut(index)?;
        let frame = encode::encode_vel(motor.send_id(), dq).to_frame();
        motor.set_control_mode(ControlMode::Vel);
        self.write_one(bus, index, frame)
    }

    pub fn vel_control_all(&mut self, bus: &CanBus, values: &[f32]) -> Result<()> {
        self.check_arity(values.len())?;
        for (i, dq) in values.iter().enumerate() {
            self.vel_control_one(bus, i, *dq)?;
        }
        Ok(())
    }

    pub fn posforce_control_one(&mut self, bus: &CanBus, index: usize, param: PosForceParam) -> Result<()> {
        let motor = self.motor_mut(index)?;
        let frame = encode::encode_pos_force(motor.send_id(), motor.limits(), param).to_frame();
        motor.set_control_mode(ControlMode::PosForce);
        self.write_one(bus, index, frame)
    }

    pub fn posforce_control_all(&mut self, bus: &CanBus, params: &[PosForceParam]) -> Result<()> {
        self.check_arity(params.len())?;
        for (i, param) in params.iter().enumerate() {
            self.posforce_control_one(bus, i, *param)?;
        }
        Ok(())
    }

    pub fn set_callback_mode_all(&mut self, mode: crate::types::CallbackMode) {
        for m in &mut self.motors {
            m.set_callback_mode(mode);
        }
    }

    pub fn query_param_one(&self, bus: &CanBus, index: usize, variable: MotorVariable) -> Result<()> {
        let motor = self.motors.get(index).ok_or_else(|| Error::config(format!("no motor at index {index}")))?;
        self.write_one(bus, index, encode::encode_query_param(motor.send_id(), variable).to_frame())
    }

    pub fn query_param_all(&self, bus: &CanBus, variable: MotorVariable) -> Result<()> {
        for i in 0..self.motors.len() {
            self.query_param_one(bus, i, variable)?;
        }
        Ok(())
    }

    /// Drains up to `motor_count * DRAIN_FACTOR` frames from `bus`, stopping
    /// early on the first receive timeout. Returns the number of frames
    /// dispatched (matches, not misses).
    ///
    /// `timeout` overrides the bus's configured receive timeout for the
    /// duration of this drain only (spec.md §4.4's `recv_all(timeout_us?)`);
    /// `None` keeps whatever timeout the bus already has.
    ///
    /// This only dispatches against *this* collection's receive-ID index. If
    /// `bus` is shared with another collection (as `OpenArm`'s arm and
    /// gripper share one bus), a frame belonging to the other collection
    /// would be read off the socket here and then dropped — use
    /// [`crate::openarm::OpenArm::recv_all`] in that case, which drains the
    /// bus once against a combined index instead.
    pub fn recv_all(&mut self, bus: &CanBus, timeout: Option<Duration>) -> Result<usize> {
        let max_frames = self.motors.len().saturating_mul(DRAIN_FACTOR).max(1);
        let motors = &mut self.motors;
        let recv_index = &self.recv_index;
        bus.with_recv_timeout(timeout, || {
            let mut dispatched = 0;
            for _ in 0..max_frames {
                let frame = match bus.read() {
                    Ok(frame) => frame,
                    Err(Error::Timeout { .. }) => break,
                    Err(e) => return Err(e),
                };
                if dispatch_frame(motors, recv_index, &frame) {
                    dispatched += 1;
                } else {
                    warn!(can_id = frame.can_id, "frame not dispatched (unknown id or ignored motor)");
                }
            }
            Ok(dispatched)
        })
    }
}

/// Pure per-motor dispatch step: applies the decode path selected by the
/// motor's `CallbackMode` and returns whether the frame was claimed. No I/O.
pub(crate) fn dispatch_to_motor(motor: &mut Motor, frame: &CanFrame) -> bool {
    match motor.callback_mode() {
        crate::types::CallbackMode::Ignore => false,
        crate::types::CallbackMode::State => {
            let result = decode::decode_state(&frame.data, motor.limits(), motor.recv_id());
            if result.valid {
                motor.apply_state(result);
            }
            if let Some(enabled) = decode::decode_enabled(&frame.data) {
                motor.set_enabled(enabled);
            }
            true
        }
        crate::types::CallbackMode::Param => {
            let result = decode::decode_param(&frame.data);
            if result.valid {
                motor.apply_param(result);
            }
            true
        }
    }
}

/// Pure dispatch step: looks up `frame.can_id` in `recv_index` and, if
/// claimed, applies [`dispatch_to_motor`]. No I/O.
pub fn dispatch_frame(motors: &mut [Motor], recv_index: &HashMap<u32, usize>, frame: &CanFrame) -> bool {
    let Some(&index) = recv_index.get(&frame.can_id) else {
        return false;
    };
    dispatch_to_motor(&mut motors[index], frame)
}

/// An arm's joint motors.
pub struct ArmComponent(DeviceCollection);

impl ArmComponent {
    pub(crate) fn new(collection: DeviceCollection) -> Self {
        Self(collection)
    }
}

impl Deref for ArmComponent {
    type Target = DeviceCollection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ArmComponent {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// A single compliant gripper motor.
pub struct GripperComponent(DeviceCollection);

impl GripperComponent {
    pub(crate) fn new(motor: Motor) -> Result<Self> {
        Ok(Self(DeviceCollection::new(vec![motor])?))
    }

    /// Reshapes the gripper motor's quantisation range in place. Does not
    /// emit a `SetParam` broadcast (Open Question 2 — see DESIGN.md).
    pub fn set_limit(&mut self, v_max: f32, t_max: f32) -> Result<()> {
        let motor = self.0.motor_mut(0)?;
        let p_max = motor.limits().p_max;
        motor.set_limits(LimitParam::new(p_max, v_max, t_max));
        Ok(())
    }

    /// Composes a `PosForceParam` from physical units and the gripper's
    /// current limits, then issues a POS_FORCE control frame. Sugar over
    /// `posforce_control_one`, not a new control mode.
    pub fn set_position(&mut self, bus: &CanBus, position: f32, speed_rad_s: f32, torque_pu: f32) -> Result<()> {
        let limits = self
            .0
            .motor(0)
            .ok_or_else(|| Error::config("gripper has no motor"))?
            .limits();
        let i_cmd = limits.t_max * torque_pu.clamp(0.0, 1.0);
        let param = PosForceParam::new(position, speed_rad_s, i_cmd, limits.t_max);
        self.0.posforce_control_one(bus, 0, param)
    }

    #[must_use]
    pub fn motor_type(&self) -> MotorType {
        self.0.motors[0].motor_type()
    }
}

impl Deref for GripperComponent {
    type Target = DeviceCollection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for GripperComponent {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CallbackMode;

    fn motor(recv_id: u32) -> Motor {
        Motor::new(MotorType::DM4310, recv_id, recv_id, ControlMode::Mit)
    }

    #[test]
    fn duplicate_recv_ids_are_rejected() {
        let result = DeviceCollection::new(vec![motor(1), motor(1)]);
        assert!(result.is_err());
    }

    #[test]
    fn dispatch_updates_cached_state_on_valid_decode() {
        let mut motors = vec![motor(1), motor(2)];
        let mut index = HashMap::new();
        index.insert(1, 0);
        index.insert(2, 1);

        let frame = CanFrame::new(1, &[0x10, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x28]);
        assert!(dispatch_frame(&mut motors, &index, &frame));
        assert!(motors[0].state_valid());
        assert_eq!(motors[0].t_rotor(), 0x28);
        assert!(!motors[1].state_valid());
    }

    #[test]
    fn ignore_mode_leaves_motor_unchanged() {
        let mut motors = vec![motor(1)];
        motors[0].set_callback_mode(CallbackMode::Ignore);
        let mut index = HashMap::new();
        index.insert(1, 0);

        let frame = CanFrame::new(1, &[0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x28]);
        assert!(!dispatch_frame(&mut motors, &index, &frame));
        assert!(!motors[0].state_valid());
    }

    #[test]
    fn unknown_can_id_is_dropped() {
        let mut motors = vec![motor(1)];
        let mut index = HashMap::new();
        index.insert(1, 0);

        let frame = CanFrame::new(99, &[0; 8]);
        assert!(!dispatch_frame(&mut motors, &index, &frame));
    }

    #[test]
    fn param_mode_updates_last_param_only() {
        let mut motors = vec![motor(1)];
        motors[0].set_callback_mode(CallbackMode::Param);
        let mut index = HashMap::new();
        index.insert(1, 0);

        let frame = CanFrame::new(1, &[0x00, 21, 0x00, 0x00, 0x00, 0x00, 0x48, 0x41]);
        assert!(dispatch_frame(&mut motors, &index, &frame));
        assert!(!motors[0].state_valid());
        assert_eq!(motors[0].last_param().rid, 21);
        assert!((motors[0].last_param().value - 12.5).abs() < 1e-4);
    }

    #[test]
    fn arity_check_rejects_length_mismatch() {
        let collection = DeviceCollection::new(vec![motor(1), motor(2)]).unwrap();
        assert!(matches!(
            collection.check_arity(1),
            Err(Error::Arity { expected: 2, got: 1 })
        ));
        assert!(collection.check_arity(2).is_ok());
    }

    #[test]
    fn gripper_set_limit_reshapes_quantisation_keeping_p_max() {
        let mut gripper = GripperComponent::new(motor(9)).unwrap();
        let p_max_before = gripper.motor(0).unwrap().limits().p_max;

        gripper.set_limit(3.0, 1.5).unwrap();

        let limits = gripper.motor(0).unwrap().limits();
        assert_eq!(limits.p_max, p_max_before);
        assert_eq!(limits.v_max, 3.0);
        assert_eq!(limits.t_max, 1.5);
    }

    #[test]
    fn gripper_is_always_a_single_motor() {
        let gripper = GripperComponent::new(motor(9)).unwrap();
        assert_eq!(gripper.motor_count(), 1);
        assert_eq!(gripper.motor_type(), MotorType::DM4310);
    }
}
