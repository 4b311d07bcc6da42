//! Stateless codec: quantisation, command encoders, response decoders.
//!
//! Every function here is pure — no I/O, no motor mutation — and reads only
//! the values passed to it. [`device`](crate::device) and
//! [`motor`](crate::motor) are the only modules that call into this one with
//! real motor state.

pub mod decode;
pub mod encode;
pub mod quant;

use crate::limit::LimitParam;
use crate::types::{CANPacket, ControlMode, MITParam, MotorStateResult, ParamResult, PosForceParam, PosVelParam};
use crate::variable::MotorVariable;

/// Namespaced access to the command encoders, mirroring the original
/// Python bindings' `CanPacketEncoder` class surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanPacketEncoder;

impl CanPacketEncoder {
    #[must_use]
    pub fn create_enable_command(self, send_id: u32) -> CANPacket {
        encode::encode_enable(send_id)
    }

    #[must_use]
    pub fn create_disable_command(self, send_id: u32) -> CANPacket {
        encode::encode_disable(send_id)
    }

    #[must_use]
    pub fn create_set_zero_command(self, send_id: u32) -> CANPacket {
        encode::encode_set_zero(send_id)
    }

    #[must_use]
    pub fn create_refresh_command(self, send_id: u32) -> CANPacket {
        encode::encode_refresh(send_id)
    }

    #[must_use]
    pub fn create_set_control_mode_command(self, send_id: u32, mode: ControlMode) -> CANPacket {
        encode::encode_set_control_mode(send_id, mode)
    }

    #[must_use]
    pub fn create_query_param_command(self, send_id: u32, variable: MotorVariable) -> CANPacket {
        encode::encode_query_param(send_id, variable)
    }

    #[must_use]
    pub fn create_mit_command(self, send_id: u32, limits: LimitParam, params: MITParam) -> CANPacket {
        encode::encode_mit(send_id, limits, params)
    }

    #[must_use]
    pub fn create_pos_vel_command(self, send_id: u32, params: PosVelParam) -> CANPacket {
        encode::encode_pos_vel(send_id, params)
    }

    #[must_use]
    pub fn create_vel_command(self, send_id: u32, dq: f32) -> CANPacket {
        encode::encode_vel(send_id, dq)
    }

    #[must_use]
    pub fn create_pos_force_command(self, send_id: u32, limits: LimitParam, params: PosForceParam) -> CANPacket {
        encode::encode_pos_force(send_id, limits, params)
    }
}

/// Namespaced access to the response decoders, mirroring the original
/// Python bindings' `CanPacketDecoder` class surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanPacketDecoder;

impl CanPacketDecoder {
    #[must_use]
    pub fn parse_motor_state_data(self, data: &[u8], limits: LimitParam, recv_id: u32) -> MotorStateResult {
        decode::decode_state(data, limits, recv_id)
    }

    #[must_use]
    pub fn parse_param_data(self, data: &[u8]) -> ParamResult {
        decode::decode_param(data)
    }
}
