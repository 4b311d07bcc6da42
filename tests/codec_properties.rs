//! Property- and scenario-based tests for the wire codec, independent of
//! any CAN hardware — these exercise `openarm_can::codec` directly.

use openarm_can::codec::decode::{decode_param, decode_state};
use openarm_can::codec::encode::{
    encode_disable, encode_enable, encode_pos_vel, encode_query_param, encode_refresh,
    encode_set_zero, BROADCAST_ID,
};
use openarm_can::codec::quant::{decode_symmetric, encode_symmetric};
use openarm_can::limit::MotorType;
use openarm_can::types::PosVelParam;
use openarm_can::variable::MotorVariable;

#[test]
fn quantisation_round_trips_within_one_lsb_for_every_motor_type() {
    for motor_type in MotorType::ALL {
        let limits = motor_type.limits();
        for (range, bits) in [(limits.p_max, 16u32), (limits.v_max, 12), (limits.t_max, 12)] {
            let lsb = 2.0 * range / ((1u32 << bits) - 1) as f32;
            for step in -10..=10 {
                let x = range * (step as f32 / 10.0);
                let u = encode_symmetric(x, range, bits);
                let back = decode_symmetric(u, range, bits);
                assert!(
                    (back - x).abs() <= lsb + 1e-4,
                    "motor_type={motor_type:?} range={range} bits={bits} x={x} back={back}"
                );
            }
        }
    }
}

#[test]
fn command_tails_are_ff_padded_with_the_contract_terminator() {
    for send_id in [0x001u32, 0x07, 0x1FF] {
        let enable = encode_enable(send_id);
        assert_eq!(&enable.data[..7], &[0xFF; 7]);
        assert_eq!(enable.data[7], 0xFC);

        let disable = encode_disable(send_id);
        assert_eq!(&disable.data[..7], &[0xFF; 7]);
        assert_eq!(disable.data[7], 0xFD);

        let set_zero = encode_set_zero(send_id);
        assert_eq!(&set_zero.data[..7], &[0xFF; 7]);
        assert_eq!(set_zero.data[7], 0xFE);
    }
}

#[test]
fn scenario_1_enable_frame_dm4310() {
    let pkt = encode_enable(0x001);
    assert_eq!(pkt.send_can_id, 0x001);
    assert_eq!(pkt.data, [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFC]);
}

#[test]
fn scenario_3_refresh_broadcast() {
    let pkt = encode_refresh(7);
    assert_eq!(pkt.send_can_id, BROADCAST_ID);
    assert_eq!(pkt.data, [0x07, 0x00, 0xCC, 0x00, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn scenario_4_pos_vel_control() {
    let pkt = encode_pos_vel(0x002, PosVelParam::new(1.0, 2.0));
    assert_eq!(pkt.send_can_id, 0x102);
    assert_eq!(pkt.data, [0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0x40]);
}

#[test]
fn scenario_6_param_result_for_pmax() {
    let frame = [0x00, MotorVariable::Pmax.rid() as u8, 0x00, 0x00, 0x00, 0x00, 0x48, 0x41];
    let result = decode_param(&frame);
    assert_eq!(result.rid, 21);
    assert!(result.valid);
    assert!((result.value - 12.5).abs() < 1e-4);
}

#[test]
fn query_param_round_trips_rid_through_the_wire() {
    for variable in [
        MotorVariable::Pmax,
        MotorVariable::Vmax,
        MotorVariable::Tmax,
        MotorVariable::MaxSpd,
    ] {
        let pkt = encode_query_param(0x001, variable);
        assert_eq!(pkt.send_can_id, BROADCAST_ID);
        assert_eq!(pkt.data[3], variable.rid() as u8);
    }
}

#[test]
fn state_decode_structural_failure_is_invalid_not_a_panic() {
    assert!(!decode_state(&[0, 1, 2], MotorType::DM4310.limits(), 0).valid);
}
