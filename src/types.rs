//! Control-mode/callback-mode selectors and the wire-adjacent data
//! structures passed between the codec, device collections and callers.

/// Selects which command encoder, CAN-ID offset and payload layout a motor
/// uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ControlMode {
    Mit = 1,
    PosVel = 2,
    Vel = 3,
    PosForce = 4,
}

impl ControlMode {
    /// The CAN-ID offset applied to a motor's `send_id` for this mode's
    /// control frames. `Refresh`/`SetControlMode`/`QueryParam` frames never
    /// use this offset — they always target the broadcast ID.
    #[must_use]
    pub const fn can_id_offset(self) -> u32 {
        match self {
            Self::Mit => 0x000,
            Self::PosVel => 0x100,
            Self::Vel => 0x200,
            Self::PosForce => 0x300,
        }
    }
}

/// Selects how an inbound frame on a motor's receive ID is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CallbackMode {
    State = 0,
    Param = 1,
    Ignore = 2,
}

/// Decoded motor telemetry.
///
/// `valid == false` means the last decode failed a structural check and
/// the motor's previously cached state was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorStateResult {
    pub position: f32,
    pub velocity: f32,
    pub torque: f32,
    pub t_mos: u8,
    pub t_rotor: u8,
    pub valid: bool,
}

/// Decoded parameter-query response.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParamResult {
    pub rid: u16,
    pub value: f32,
    pub valid: bool,
}

/// MIT-mode command parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MITParam {
    pub kp: f32,
    pub kd: f32,
    pub q: f32,
    pub dq: f32,
    pub tau: f32,
}

impl MITParam {
    #[must_use]
    pub const fn new(kp: f32, kd: f32, q: f32, dq: f32, tau: f32) -> Self {
        Self { kp, kd, q, dq, tau }
    }
}

/// POS_VEL-mode command parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PosVelParam {
    pub q: f32,
    pub dq: f32,
}

impl PosVelParam {
    #[must_use]
    pub const fn new(q: f32, dq: f32) -> Self {
        Self { q, dq }
    }
}

/// POS_FORCE-mode command parameters. `i_max` is the caller-supplied
/// absolute current cap used to quantise `i` (see DESIGN.md decision 1) —
/// it is not part of the motor's static `LimitParam`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PosForceParam {
    pub q: f32,
    pub dq: f32,
    pub i: f32,
    pub i_max: f32,
}

impl PosForceParam {
    #[must_use]
    pub const fn new(q: f32, dq: f32, i: f32, i_max: f32) -> Self {
        Self { q, dq, i, i_max }
    }
}

/// A classic CAN 2.0B frame: up to 8 payload bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct CanFrame {
    pub can_id: u32,
    pub data: Vec<u8>,
}

impl CanFrame {
    #[must_use]
    pub fn new(can_id: u32, data: &[u8]) -> Self {
        Self {
            can_id,
            data: data.to_vec(),
        }
    }
}

/// A CAN-FD frame: up to 64 payload bytes.
///
/// spec.md §3 models this with a `flags: u8` field for BRS/ESI, but no
/// accessor for those bits is wired through this crate's `socketcan`
/// backend: `write_fd`/`read_fd` (`socket.rs`) only round-trip `can_id`/
/// `data`. Carrying a field that writes always ignore and reads always
/// report as zero is a silent correctness gap, so the field is dropped here
/// rather than kept as dead plumbing (see DESIGN.md).
#[derive(Debug, Clone, PartialEq)]
pub struct CanFdFrame {
    pub can_id: u32,
    pub data: Vec<u8>,
}

impl CanFdFrame {
    #[must_use]
    pub fn new(can_id: u32, data: &[u8]) -> Self {
        Self {
            can_id,
            data: data.to_vec(),
        }
    }
}

impl From<CanFrame> for CanFdFrame {
    /// Classic frames accepted on an FD-enabled socket are padded to the FD
    /// representation (spec.md §4.2).
    fn from(frame: CanFrame) -> Self {
        Self {
            can_id: frame.can_id,
            data: frame.data,
        }
    }
}

/// The codec's command output: always an 8-byte payload on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct CANPacket {
    pub send_can_id: u32,
    pub data: [u8; 8],
}

impl CANPacket {
    #[must_use]
    pub const fn new(send_can_id: u32, data: [u8; 8]) -> Self {
        Self { send_can_id, data }
    }

    #[must_use]
    pub fn to_frame(&self) -> CanFrame {
        CanFrame::new(self.send_can_id, &self.data)
    }
}

/// CAN ID used for refresh polls, `SetControlMode` and `QueryParam`
/// broadcasts.
pub const BROADCAST_CAN_ID: u32 = 0x7FF;
