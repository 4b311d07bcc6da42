//! `MotorVariable` — register indices addressable via the parameter-query
//! protocol (`QueryParam` / `SetControlMode`).

/// A register index in a motor's internal parameter table.
///
/// Only the entries named in spec.md §3 are given variants; the full
/// register map (0..~90) is otherwise addressed via [`MotorVariable::Raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum MotorVariable {
    UvValue,
    KtValue,
    Acc,
    Dec,
    MaxSpd,
    MstId,
    EscId,
    Timeout,
    CtrlMode,
    Pmax,
    Vmax,
    Tmax,
    RunState,
    ErrorState,
    CurAngle,
    /// Any register index not given a named variant above.
    Raw(u16),
}

impl MotorVariable {
    /// The register index this variable addresses.
    #[must_use]
    pub const fn rid(self) -> u16 {
        match self {
            Self::UvValue => 0,
            Self::KtValue => 1,
            Self::Acc => 4,
            Self::Dec => 5,
            Self::MaxSpd => 6,
            Self::MstId => 7,
            Self::EscId => 8,
            Self::Timeout => 9,
            Self::CtrlMode => 10,
            Self::Pmax => 21,
            Self::Vmax => 22,
            Self::Tmax => 23,
            Self::RunState => 56,
            Self::ErrorState => 80,
            Self::CurAngle => 81,
            Self::Raw(rid) => rid,
        }
    }

    /// Maps a wire register index back to a named variant, falling back to
    /// [`MotorVariable::Raw`] for anything not explicitly named.
    #[must_use]
    pub const fn from_rid(rid: u16) -> Self {
        match rid {
            0 => Self::UvValue,
            1 => Self::KtValue,
            4 => Self::Acc,
            5 => Self::Dec,
            6 => Self::MaxSpd,
            7 => Self::MstId,
            8 => Self::EscId,
            9 => Self::Timeout,
            10 => Self::CtrlMode,
            21 => Self::Pmax,
            22 => Self::Vmax,
            23 => Self::Tmax,
            56 => Self::RunState,
            80 => Self::ErrorState,
            81 => Self::CurAngle,
            other => Self::Raw(other),
        }
    }

    /// Whether this register's value is a little-endian IEEE-754 float
    /// (`PMAX`/`VMAX`/`TMAX`) rather than a little-endian `u32`.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Pmax | Self::Vmax | Self::Tmax)
    }

    /// Whether this register index falls within the motor's addressable
    /// parameter table (spec.md §3's "register indices (0..≈90)"), named or
    /// not. A [`MotorVariable::Raw`] register inside this range is just as
    /// queryable as a named one — only the name is missing.
    #[must_use]
    pub const fn is_addressable(self) -> bool {
        self.rid() <= MAX_RID
    }
}

/// Upper bound (inclusive) of the motor's addressable parameter register
/// table (spec.md §3).
pub const MAX_RID: u16 = 90;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rid_values_match_binding_contract() {
        assert_eq!(MotorVariable::UvValue.rid(), 0);
        assert_eq!(MotorVariable::KtValue.rid(), 1);
        assert_eq!(MotorVariable::Acc.rid(), 4);
        assert_eq!(MotorVariable::Dec.rid(), 5);
        assert_eq!(MotorVariable::MaxSpd.rid(), 6);
        assert_eq!(MotorVariable::MstId.rid(), 7);
        assert_eq!(MotorVariable::EscId.rid(), 8);
        assert_eq!(MotorVariable::Timeout.rid(), 9);
        assert_eq!(MotorVariable::CtrlMode.rid(), 10);
        assert_eq!(MotorVariable::Pmax.rid(), 21);
        assert_eq!(MotorVariable::Vmax.rid(), 22);
        assert_eq!(MotorVariable::Tmax.rid(), 23);
        assert_eq!(MotorVariable::RunState.rid(), 56);
        assert_eq!(MotorVariable::ErrorState.rid(), 80);
        assert_eq!(MotorVariable::CurAngle.rid(), 81);
    }

    #[test]
    fn from_rid_round_trips_named_variants() {
        for v in [
            MotorVariable::UvValue,
            MotorVariable::Pmax,
            MotorVariable::RunState,
            MotorVariable::CurAngle,
        ] {
            assert_eq!(MotorVariable::from_rid(v.rid()), v);
        }
    }

    #[test]
    fn unknown_rid_is_raw() {
        assert_eq!(MotorVariable::from_rid(42), MotorVariable::Raw(42));
    }

    #[test]
    fn raw_register_within_range_is_addressable() {
        assert!(MotorVariable::Raw(42).is_addressable());
        assert!(MotorVariable::Raw(90).is_addressable());
        assert!(!MotorVariable::Raw(91).is_addressable());
    }

    #[test]
    fn named_variants_are_always_addressable() {
        assert!(MotorVariable::CurAngle.is_addressable());
    }
}
