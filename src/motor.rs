//! A single DM-series actuator: identity, cached telemetry, and the
//! mutable control-mode/callback-mode selectors.
//!
//! Mutation only happens through [`crate::device::DeviceCollection`] and
//! [`crate::openarm::OpenArm`] — `Motor` itself exposes read-only
//! accessors for its cached state.

use crate::limit::{LimitParam, MotorType};
use crate::types::{CallbackMode, ControlMode, MotorStateResult, ParamResult};

/// One actuator's identity, configuration, and last-decoded telemetry.
#[derive(Debug, Clone)]
pub struct Motor {
    motor_type: MotorType,
    send_id: u32,
    recv_id: u32,
    control_mode: ControlMode,
    callback_mode: CallbackMode,
    enabled: bool,
    limits: LimitParam,
    state: MotorStateResult,
    last_param: ParamResult,
}

impl Motor {
    #[must_use]
    pub fn new(motor_type: MotorType, send_id: u32, recv_id: u32, control_mode: ControlMode) -> Self {
        Self {
            motor_type,
            send_id,
            recv_id,
            control_mode,
            callback_mode: CallbackMode::State,
            enabled: false,
            limits: motor_type.limits(),
            state: MotorStateResult::default(),
            last_param: ParamResult::default(),
        }
    }

    #[must_use]
    pub fn motor_type(&self) -> MotorType {
        self.motor_type
    }

    #[must_use]
    pub fn send_id(&self) -> u32 {
        self.send_id
    }

    #[must_use]
    pub fn recv_id(&self) -> u32 {
        self.recv_id
    }

    #[must_use]
    pub fn control_mode(&self) -> ControlMode {
        self.control_mode
    }

    pub(crate) fn set_control_mode(&mut self, mode: ControlMode) {
        self.control_mode = mode;
    }

    #[must_use]
    pub fn callback_mode(&self) -> CallbackMode {
        self.callback_mode
    }

    pub(crate) fn set_callback_mode(&mut self, mode: CallbackMode) {
        self.callback_mode = mode;
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn limits(&self) -> LimitParam {
        self.limits
    }

    /// Reshapes the quantisation range this motor's codec calls use, in
    /// place, without emitting any frame.
    pub(crate) fn set_limits(&mut self, limits: LimitParam) {
        self.limits = limits;
    }

    #[must_use]
    pub fn position(&self) -> f32 {
        self.state.position
    }

    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.state.velocity
    }

    #[must_use]
    pub fn torque(&self) -> f32 {
        self.state.torque
    }

    #[must_use]
    pub fn t_mos(&self) -> u8 {
        self.state.t_mos
    }

    #[must_use]
    pub fn t_rotor(&self) -> u8 {
        self.state.t_rotor
    }

    #[must_use]
    pub fn state_valid(&self) -> bool {
        self.state.valid
    }

    #[must_use]
    pub fn state(&self) -> MotorStateResult {
        self.state
    }

    pub(crate) fn apply_state(&mut self, state: MotorStateResult) {
        self.state = state;
    }

    #[must_use]
    pub fn last_param(&self) -> ParamResult {
        self.last_param
    }

    pub(crate) fn apply_param(&mut self, param: ParamResult) {
        self.last_param = param;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_motor_starts_disabled_with_type_limits() {
        let m = Motor::new(MotorType::DM4310, 1, 1, ControlMode::Mit);
        assert!(!m.enabled());
        assert_eq!(m.limits(), MotorType::DM4310.limits());
        assert!(!m.state_valid());
    }

    #[test]
    fn set_limits_reshapes_quantisation_only() {
        let mut m = Motor::new(MotorType::DM4310, 1, 1, ControlMode::Mit);
        let custom = LimitParam::new(12.5, 5.0, 2.0);
        m.set_limits(custom);
        assert_eq!(m.limits(), custom);
        assert!(!m.enabled());
    }
}
