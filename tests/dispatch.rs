//! Dispatch and arity behaviour, independent of any CAN hardware.

use std::collections::HashMap;

use openarm_can::device::{dispatch_frame, DeviceCollection};
use openarm_can::limit::MotorType;
use openarm_can::types::{CanFrame, ControlMode};
use openarm_can::Motor;

fn motor(recv_id: u32) -> Motor {
    Motor::new(MotorType::DM4310, recv_id, recv_id, ControlMode::Mit)
}

#[test]
fn recv_all_dispatches_most_recent_matching_frame_per_motor() {
    let mut motors = vec![motor(1), motor(2), motor(3)];
    let mut index = HashMap::new();
    for (i, m) in motors.iter().enumerate() {
        index.insert(m.recv_id(), i);
    }

    // data[0]'s high nibble carries the motor's own id, which must match
    // the low nibble of the receive id it was dispatched against.
    let first = CanFrame::new(1, &[0x10, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10]);
    let stale = CanFrame::new(1, &[0x10, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20]);
    let other = CanFrame::new(2, &[0x20, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x30]);

    assert!(dispatch_frame(&mut motors, &index, &first));
    assert!(dispatch_frame(&mut motors, &index, &other));
    assert!(dispatch_frame(&mut motors, &index, &stale));

    assert_eq!(motors[0].t_rotor(), 0x20);
    assert_eq!(motors[1].t_rotor(), 0x30);
    assert!(!motors[2].state_valid());
}

#[test]
fn unknown_receive_id_frames_are_dropped_without_panicking() {
    let mut motors = vec![motor(1)];
    let mut index = HashMap::new();
    index.insert(1, 0);

    let unrelated = CanFrame::new(0x555, &[0; 8]);
    assert!(!dispatch_frame(&mut motors, &index, &unrelated));
}

#[test]
fn device_collection_rejects_overlapping_receive_ids_at_construction() {
    let result = DeviceCollection::new(vec![motor(5), motor(5)]);
    assert!(result.is_err());
}
