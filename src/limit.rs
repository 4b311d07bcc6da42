//! Actuator variants and their symmetric quantisation ranges.

/// Closed enumeration of the DM-series actuator variants this crate
/// supports. Ordinal values match the original `openarm_can` Python
/// bindings (`MotorType.DM3507 == 0`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum MotorType {
    DM3507 = 0,
    DM4310 = 1,
    DM4310_48V = 2,
    DM4340 = 3,
    DM4340_48V = 4,
    DM6006 = 5,
    DM8006 = 6,
    DM8009 = 7,
    DM10010L = 8,
    DM10010 = 9,
    DMH3510 = 10,
    DMH6215 = 11,
    DMG6220 = 12,
}

impl MotorType {
    /// All variants, in ordinal order.
    pub const ALL: [MotorType; 13] = [
        MotorType::DM3507,
        MotorType::DM4310,
        MotorType::DM4310_48V,
        MotorType::DM4340,
        MotorType::DM4340_48V,
        MotorType::DM6006,
        MotorType::DM8006,
        MotorType::DM8009,
        MotorType::DM10010L,
        MotorType::DM10010,
        MotorType::DMH3510,
        MotorType::DMH6215,
        MotorType::DMG6220,
    ];

    /// This variant's symmetric quantisation range.
    #[must_use]
    pub const fn limits(self) -> LimitParam {
        LIMITS[self as usize]
    }
}

/// Absolute range used for symmetric fixed-point quantisation of a motor's
/// position, velocity and torque/current fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitParam {
    pub p_max: f32,
    pub v_max: f32,
    pub t_max: f32,
}

impl LimitParam {
    #[must_use]
    pub const fn new(p_max: f32, v_max: f32, t_max: f32) -> Self {
        Self { p_max, v_max, t_max }
    }
}

/// Per-type limit table, indexed by `MotorType as usize`.
///
/// `p_max` is 12.5 rad across the family (shared output-stage travel);
/// `v_max`/`t_max` are scaled per variant's speed/torque class. See
/// DESIGN.md decision 4 for how these were chosen.
pub const LIMITS: [LimitParam; 13] = [
    LimitParam::new(12.5, 50.0, 5.0),   // DM3507
    LimitParam::new(12.5, 30.0, 10.0),  // DM4310
    LimitParam::new(12.5, 50.0, 10.0),  // DM4310_48V
    LimitParam::new(12.5, 8.0, 28.0),   // DM4340
    LimitParam::new(12.5, 10.0, 28.0),  // DM4340_48V
    LimitParam::new(12.5, 45.0, 12.0),  // DM6006
    LimitParam::new(12.5, 45.0, 20.0),  // DM8006
    LimitParam::new(12.5, 45.0, 54.0),  // DM8009
    LimitParam::new(12.5, 25.0, 200.0), // DM10010L
    LimitParam::new(12.5, 20.0, 200.0), // DM10010
    LimitParam::new(12.5, 20.0, 28.0),  // DMH3510
    LimitParam::new(12.5, 15.0, 45.0),  // DMH6215
    LimitParam::new(12.5, 10.0, 60.0),  // DMG6220
];
