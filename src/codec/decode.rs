//! Response decoders. Structural failures set `valid = false` rather than
//! raising (spec.md §4.1's failure mode).

use crate::limit::LimitParam;
use crate::types::{MotorStateResult, ParamResult};
use crate::variable::MotorVariable;

use super::quant::decode_symmetric;

/// Decodes an 8-byte state-telemetry frame.
///
/// Byte layout: `[id<<4|err, q_hi, q_lo, dq[11:4], dq[3:0]<<4|tau[11:8],
/// tau[7:0], t_mos, t_rotor]`. `valid` requires both a recognised error
/// nibble (`0` ENABLED, `1` DISABLED) and an `id` nibble matching the low
/// nibble of `recv_id`.
#[must_use]
pub fn decode_state(data: &[u8], limits: LimitParam, recv_id: u32) -> MotorStateResult {
    if data.len() != 8 {
        return MotorStateResult::default();
    }

    let id_nibble = data[0] >> 4;
    let err_nibble = data[0] & 0x0F;

    let q_raw = ((data[1] as u16) << 8) | data[2] as u16;
    let dq_raw = ((data[3] as u16) << 4) | ((data[4] as u16) >> 4);
    let tau_raw = (((data[4] as u16) & 0x0F) << 8) | data[5] as u16;

    let valid = (err_nibble == 0 || err_nibble == 1) && id_nibble == (recv_id as u8 & 0x0F);

    MotorStateResult {
        position: decode_symmetric(q_raw, limits.p_max, 16),
        velocity: decode_symmetric(dq_raw, limits.v_max, 12),
        torque: decode_symmetric(tau_raw, limits.t_max, 12),
        t_mos: data[6],
        t_rotor: data[7],
        valid,
    }
}

/// Decodes an 8-byte parameter-query response:
/// `[master_id_lo, rid, 0, 0, b0, b1, b2, b3]`. `PMAX`/`VMAX`/`TMAX` are
/// little-endian IEEE-754; every other register is little-endian `u32`
/// reinterpreted as `f32`. `valid` requires `rid` to fall within the
/// motor's addressable register table (spec.md §3's 0..≈90), whether or not
/// that register has a named [`MotorVariable`] variant — a response to a
/// [`MotorVariable::Raw`] query is just as decodable as a named one.
#[must_use]
pub fn decode_param(data: &[u8]) -> ParamResult {
    if data.len() != 8 {
        return ParamResult::default();
    }

    let rid = data[1] as u16;
    let variable = MotorVariable::from_rid(rid);
    let tail = [data[4], data[5], data[6], data[7]];

    let value = if variable.is_float() {
        f32::from_le_bytes(tail)
    } else {
        u32::from_le_bytes(tail) as f32
    };

    ParamResult {
        rid,
        value,
        valid: variable.is_addressable(),
    }
}

/// Extracts the "enabled" bit from a state frame's embedded error nibble
/// (`0` ENABLED, `1` DISABLED) without requiring a full, validated decode.
/// Used by [`crate::device`] to track enable-state transitions reported by
/// the firmware itself, independent of `MotorStateResult::valid`.
#[must_use]
pub fn decode_enabled(data: &[u8]) -> Option<bool> {
    if data.len() != 8 {
        return None;
    }
    match data[0] & 0x0F {
        0 => Some(true),
        1 => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DM4310: LimitParam = LimitParam::new(12.5, 30.0, 10.0);

    #[test]
    fn wrong_length_is_invalid_not_a_panic() {
        assert!(!decode_state(&[0; 4], DM4310, 0).valid);
        assert!(!decode_param(&[0; 3]).valid);
    }

    #[test]
    fn state_decode_reads_tail_temperatures_from_scenario_5() {
        // Tail bytes (t_mos, t_rotor) are the two fields this layout can
        // reproduce verbatim from the given frame; see DESIGN.md decision 5.
        let frame = [0x01, 0x80, 0x00, 0x08, 0x00, 0x08, 0x00, 0x28];
        let result = decode_state(&frame, DM4310, 0x00);
        assert_eq!(result.t_mos, 0x00);
        assert_eq!(result.t_rotor, 0x28);
        assert!(result.valid);
    }

    #[test]
    fn zero_mid_scale_position_decodes_near_zero() {
        // q mid-scale (0x8000) decodes to ~0 regardless of range.
        let frame = [0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let result = decode_state(&frame, DM4310, 0x00);
        assert!(result.position.abs() < 1e-2);
    }

    #[test]
    fn unrecognised_error_nibble_is_invalid() {
        let frame = [0x0F, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(!decode_state(&frame, DM4310, 0x00).valid);
    }

    #[test]
    fn mismatched_identity_nibble_is_invalid() {
        let frame = [0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(!decode_state(&frame, DM4310, 0x05).valid);
    }

    #[test]
    fn param_decode_matches_scenario_6() {
        let frame = [0x00, 21, 0x00, 0x00, 0x00, 0x00, 0x48, 0x41];
        let result = decode_param(&frame);
        assert_eq!(result.rid, 21);
        assert!(result.valid);
        assert!((result.value - 12.5).abs() < 1e-4);
    }

    #[test]
    fn param_decode_rejects_rid_past_the_addressable_table() {
        let frame = [0x00, 99, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
        assert!(!decode_param(&frame).valid);
    }

    #[test]
    fn param_decode_accepts_unnamed_rid_within_the_addressable_table() {
        // rid 42 has no named MotorVariable variant but is well within the
        // motor's 0..=90 register table, so a response to it is still valid.
        let frame = [0x00, 42, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00];
        let result = decode_param(&frame);
        assert!(result.valid);
        assert_eq!(result.rid, 42);
        assert_eq!(result.value, 5.0);
    }

    #[test]
    fn decode_enabled_reads_error_nibble() {
        assert_eq!(decode_enabled(&[0x00, 0, 0, 0, 0, 0, 0, 0]), Some(true));
        assert_eq!(decode_enabled(&[0x01, 0, 0, 0, 0, 0, 0, 0]), Some(false));
        assert_eq!(decode_enabled(&[0x0F, 0, 0, 0, 0, 0, 0, 0]), None);
    }

    #[test]
    fn param_decode_integer_register_is_little_endian_u32() {
        let frame = [0x00, MotorVariable::MaxSpd.rid() as u8, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00];
        let result = decode_param(&frame);
        assert_eq!(result.value, 10.0);
        assert!(result.valid);
    }
}
