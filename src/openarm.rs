//! `OpenArm` — the top-level facade combining one socket, one arm
//! component and one gripper component.
//!
//! Construction order mirrors `examples/original_source/rust/examples/move_test.py`:
//! open the bus, `init_arm_motors`, `init_gripper_motor`, pick callback
//! modes, enable, then drive the control loop with `recv_all`.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{info, warn};

use crate::device::{self, ArmComponent, DeviceCollection, GripperComponent};
use crate::error::{Error, Result};
use crate::limit::MotorType;
use crate::motor::Motor;
use crate::socket::CanBus;
use crate::types::{CallbackMode, ControlMode};

/// Which collection owns a given receive ID, for `OpenArm`'s combined
/// dispatch index (see [`OpenArm::recv_all`]).
#[derive(Debug, Clone, Copy)]
enum Owner {
    Arm(usize),
    Gripper(usize),
}

/// One physical CAN bus shared by an arm and a gripper.
pub struct OpenArm {
    bus: CanBus,
    arm: ArmComponent,
    gripper: GripperComponent,
    /// Merged `arm`+`gripper` receive-ID index, so [`OpenArm::recv_all`] can
    /// drain the shared bus in a single pass instead of one drain per
    /// collection (which would let each collection steal frames addressed
    /// to the other off the socket).
    recv_owner: HashMap<u32, Owner>,
}

impl OpenArm {
    /// Opens `interface` and builds the arm/gripper collections from
    /// parallel arrays. `modes` defaults every motor to
    /// [`ControlMode::Mit`] when omitted.
    ///
    /// Fails with a *config-error* when the input arrays' lengths
    /// disagree, or when the arm and gripper receive-ID spaces overlap.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        interface: &str,
        enable_fd: bool,
        recv_timeout: Duration,
        arm_types: &[MotorType],
        arm_send_ids: &[u32],
        arm_recv_ids: &[u32],
        arm_modes: Option<&[ControlMode]>,
        gripper_type: MotorType,
        gripper_send_id: u32,
        gripper_recv_id: u32,
    ) -> Result<Self> {
        let bus = CanBus::open(interface, enable_fd, recv_timeout)?;
        let arm = Self::init_arm_motors(arm_types, arm_send_ids, arm_recv_ids, arm_modes)?;
        let gripper = Self::init_gripper_motor(gripper_type, gripper_send_id, gripper_recv_id, None)?;
        let recv_owner = Self::merge_recv_owners(&arm, &gripper)?;

        info!(interface, arm_motors = arm.motor_count(), "OpenArm initialised");
        Ok(Self { bus, arm, gripper, recv_owner })
    }

    /// Builds the combined receive-ID → owner index backing
    /// [`OpenArm::recv_all`], rejecting a gripper receive ID that collides
    /// with one already claimed by the arm.
    fn merge_recv_owners(arm: &ArmComponent, gripper: &GripperComponent) -> Result<HashMap<u32, Owner>> {
        let mut recv_owner = HashMap::with_capacity(arm.motor_count() + gripper.motor_count());
        for (i, motor) in arm.motors().iter().enumerate() {
            recv_owner.insert(motor.recv_id(), Owner::Arm(i));
        }
        for (i, motor) in gripper.motors().iter().enumerate() {
            if recv_owner.insert(motor.recv_id(), Owner::Gripper(i)).is_some() {
                return Err(Error::config(format!(
                    "gripper receive id 0x{:X} overlaps the arm's receive-id space",
                    motor.recv_id()
                )));
            }
        }
        Ok(recv_owner)
    }

    fn init_arm_motors(
        types: &[MotorType],
        send_ids: &[u32],
        recv_ids: &[u32],
        modes: Option<&[ControlMode]>,
    ) -> Result<ArmComponent> {
        let n = types.len();
        if send_ids.len() != n || recv_ids.len() != n {
            return Err(Error::config(format!(
                "init_arm_motors: mismatched array lengths (types={}, send_ids={}, recv_ids={})",
                n,
                send_ids.len(),
                recv_ids.len()
            )));
        }
        if let Some(modes) = modes {
            if modes.len() != n {
                return Err(Error::config(format!(
                    "init_arm_motors: modes length {} does not match motor count {n}",
                    modes.len()
                )));
            }
        }

        let motors = (0..n)
            .map(|i| {
                let mode = modes.map_or(ControlMode::Mit, |m| m[i]);
                Motor::new(types[i], send_ids[i], recv_ids[i], mode)
            })
            .collect();

        Ok(ArmComponent::new(DeviceCollection::new(motors)?))
    }

    fn init_gripper_motor(
        motor_type: MotorType,
        send_id: u32,
        recv_id: u32,
        mode: Option<ControlMode>,
    ) -> Result<GripperComponent> {
        let motor = Motor::new(motor_type, send_id, recv_id, mode.unwrap_or(ControlMode::Mit));
        GripperComponent::new(motor)
    }

    #[must_use]
    pub fn arm(&self) -> &ArmComponent {
        &self.arm
    }

    #[must_use]
    pub fn arm_mut(&mut self) -> &mut ArmComponent {
        &mut self.arm
    }

    #[must_use]
    pub fn gripper(&self) -> &GripperComponent {
        &self.gripper
    }

    #[must_use]
    pub fn gripper_mut(&mut self) -> &mut GripperComponent {
        &mut self.gripper
    }

    #[must_use]
    pub fn bus(&self) -> &CanBus {
        &self.bus
    }

    pub fn enable_all(&mut self) -> Result<()> {
        self.arm.enable_all(&self.bus)?;
        self.gripper.enable_all(&self.bus)
    }

    pub fn disable_all(&mut self) -> Result<()> {
        self.arm.disable_all(&self.bus)?;
        self.gripper.disable_all(&self.bus)
    }

    pub fn refresh_all(&mut self, inter_frame_delay: Option<Duration>) -> Result<()> {
        self.arm.refresh_all(&self.bus, inter_frame_delay)?;
        self.gripper.refresh_all(&self.bus, inter_frame_delay)
    }

    pub fn set_callback_mode_all(&mut self, mode: CallbackMode) {
        self.arm.set_callback_mode_all(mode);
        self.gripper.set_callback_mode_all(mode);
    }

    pub fn query_param_all(&mut self, variable: crate::variable::MotorVariable) -> Result<()> {
        self.arm.query_param_all(&self.bus, variable)?;
        self.gripper.query_param_all(&self.bus, variable)
    }

    /// Drains the shared bus once, dispatching each frame into whichever
    /// collection owns its receive ID. Returns the total number of frames
    /// dispatched across both collections.
    ///
    /// Reads `bus` in a single pass rather than delegating to each
    /// collection's own `recv_all` in turn — two sequential per-collection
    /// drains would each read the socket against only their own index,
    /// silently consuming and discarding frames addressed to the other
    /// collection when arm and gripper state replies interleave on the wire
    /// (spec.md §4.5).
    ///
    /// `timeout` overrides the bus's receive timeout for this call only
    /// (spec.md §4.5); `None` keeps the bus's configured timeout.
    pub fn recv_all(&mut self, timeout: Option<Duration>) -> Result<usize> {
        let max_frames = (self.arm.motor_count() + self.gripper.motor_count())
            .saturating_mul(device::DRAIN_FACTOR)
            .max(1);
        let bus = &self.bus;
        let arm = &mut self.arm;
        let gripper = &mut self.gripper;
        let recv_owner = &self.recv_owner;
        bus.with_recv_timeout(timeout, || {
            let mut dispatched = 0;
            for _ in 0..max_frames {
                let frame = match bus.read() {
                    Ok(frame) => frame,
                    Err(Error::Timeout { .. }) => break,
                    Err(e) => return Err(e),
                };
                let claimed = match recv_owner.get(&frame.can_id) {
                    Some(Owner::Arm(index)) => arm
                        .motor_at_mut(*index)
                        .map(|motor| device::dispatch_to_motor(motor, &frame))
                        .unwrap_or(false),
                    Some(Owner::Gripper(index)) => gripper
                        .motor_at_mut(*index)
                        .map(|motor| device::dispatch_to_motor(motor, &frame))
                        .unwrap_or(false),
                    None => false,
                };
                if claimed {
                    dispatched += 1;
                } else {
                    warn!(can_id = frame.can_id, "frame not dispatched (unknown id or ignored motor)");
                }
            }
            Ok(dispatched)
        })
    }

    pub fn close(&mut self) {
        self.bus.close();
    }
}
