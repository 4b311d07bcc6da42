//! Command encoders. Every function is pure: no I/O, no motor mutation.

use crate::limit::LimitParam;
use crate::types::{CANPacket, ControlMode, MITParam, PosForceParam, PosVelParam, BROADCAST_CAN_ID};
use crate::variable::MotorVariable;

use super::quant::{encode, encode_symmetric};

/// CAN ID every Refresh/SetControlMode/QueryParam command targets.
pub const BROADCAST_ID: u32 = BROADCAST_CAN_ID;

const KP_RANGE: (f32, f32) = (0.0, 500.0);
const KD_RANGE: (f32, f32) = (0.0, 5.0);

/// Opcode prefixing a register-read command's payload (spec.md §4.1's
/// parameter-frame response implies a matching request opcode).
const OP_READ_PARAM: u8 = 0x33;
/// Opcode prefixing a register-write command's payload.
const OP_WRITE_PARAM: u8 = 0x55;

fn send_id_bytes(send_id: u32) -> (u8, u8) {
    ((send_id & 0xFF) as u8, ((send_id >> 8) & 0xFF) as u8)
}

#[must_use]
pub fn encode_enable(send_id: u32) -> CANPacket {
    CANPacket::new(send_id, [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFC])
}

#[must_use]
pub fn encode_disable(send_id: u32) -> CANPacket {
    CANPacket::new(send_id, [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFD])
}

#[must_use]
pub fn encode_set_zero(send_id: u32) -> CANPacket {
    CANPacket::new(send_id, [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE])
}

/// State-poll broadcast: `[send_id_lo, send_id_hi, 0xCC, 0, 0, 0, 0, 0]` on
/// the broadcast ID.
#[must_use]
pub fn encode_refresh(send_id: u32) -> CANPacket {
    let (lo, hi) = send_id_bytes(send_id);
    CANPacket::new(BROADCAST_ID, [lo, hi, 0xCC, 0x00, 0x00, 0x00, 0x00, 0x00])
}

/// Write-register command targeting `CTRL_MODE` (`MotorVariable::CtrlMode`).
#[must_use]
pub fn encode_set_control_mode(send_id: u32, mode: ControlMode) -> CANPacket {
    encode_write_param(send_id, MotorVariable::CtrlMode.rid(), mode as u8 as u32)
}

/// Read-register command for an arbitrary [`MotorVariable`].
#[must_use]
pub fn encode_query_param(send_id: u32, variable: MotorVariable) -> CANPacket {
    let (lo, hi) = send_id_bytes(send_id);
    let rid = variable.rid();
    CANPacket::new(
        BROADCAST_ID,
        [lo, hi, OP_READ_PARAM, (rid & 0xFF) as u8, 0x00, 0x00, 0x00, 0x00],
    )
}

fn encode_write_param(send_id: u32, rid: u16, value: u32) -> CANPacket {
    let (lo, hi) = send_id_bytes(send_id);
    let v = value.to_le_bytes();
    CANPacket::new(
        BROADCAST_ID,
        [lo, hi, OP_WRITE_PARAM, (rid & 0xFF) as u8, v[0], v[1], v[2], v[3]],
    )
}

/// Packs three big-endian-nibble fields of width 16/12/12 bits into the
/// first five bytes of an 8-byte buffer (MIT's `q, dq, tau` and
/// POS_FORCE's `q, dq, i`), zero-filling the rest.
fn pack_16_12_12(a16: u16, b12: u16, c12: u16) -> [u8; 8] {
    let mut data = [0u8; 8];
    data[0] = (a16 >> 8) as u8;
    data[1] = (a16 & 0xFF) as u8;
    data[2] = (b12 >> 4) as u8;
    data[3] = (((b12 & 0xF) << 4) | (c12 >> 8)) as u8;
    data[4] = (c12 & 0xFF) as u8;
    data
}

/// MIT control frame: `can_id = send_id`, payload packs `q` (16b), `dq`
/// (12b), `tau` (12b) big-endian-nibble across bytes 0-4, followed by `kp`
/// (12b) and `kd` (12b) across bytes 5-7.
#[must_use]
pub fn encode_mit(send_id: u32, limits: LimitParam, params: MITParam) -> CANPacket {
    let q = encode_symmetric(params.q, limits.p_max, 16);
    let dq = encode_symmetric(params.dq, limits.v_max, 12);
    let tau = encode_symmetric(params.tau, limits.t_max, 12);
    let kp = encode(params.kp, KP_RANGE.0, KP_RANGE.1, 12);
    let kd = encode(params.kd, KD_RANGE.0, KD_RANGE.1, 12);

    let mut data = pack_16_12_12(q, dq, tau);
    data[5] = (kp >> 4) as u8;
    data[6] = (((kp & 0xF) << 4) | (kd >> 8)) as u8;
    data[7] = (kd & 0xFF) as u8;

    CANPacket::new(send_id + ControlMode::Mit.can_id_offset(), data)
}

/// POS_VEL control frame: `can_id = send_id + 0x100`, payload is
/// `f32_le(q) ++ f32_le(dq)`.
#[must_use]
pub fn encode_pos_vel(send_id: u32, params: PosVelParam) -> CANPacket {
    let mut data = [0u8; 8];
    data[0..4].copy_from_slice(&params.q.to_le_bytes());
    data[4..8].copy_from_slice(&params.dq.to_le_bytes());
    CANPacket::new(send_id + ControlMode::PosVel.can_id_offset(), data)
}

/// VEL control frame: `can_id = send_id + 0x200`, payload is
/// `f32_le(dq)` followed by four reserved zero bytes.
#[must_use]
pub fn encode_vel(send_id: u32, dq: f32) -> CANPacket {
    let mut data = [0u8; 8];
    data[0..4].copy_from_slice(&dq.to_le_bytes());
    CANPacket::new(send_id + ControlMode::Vel.can_id_offset(), data)
}

/// POS_FORCE control frame: `can_id = send_id + 0x300`. `q`/`dq` are
/// quantised against the motor's own limits; `i` is quantised against the
/// caller-supplied `params.i_max` (Open Question 1).
#[must_use]
pub fn encode_pos_force(send_id: u32, limits: LimitParam, params: PosForceParam) -> CANPacket {
    let q = encode_symmetric(params.q, limits.p_max, 16);
    let dq = encode_symmetric(params.dq, limits.v_max, 12);
    let i = encode_symmetric(params.i, params.i_max, 12);
    let data = pack_16_12_12(q, dq, i);
    CANPacket::new(send_id + ControlMode::PosForce.can_id_offset(), data)
}
