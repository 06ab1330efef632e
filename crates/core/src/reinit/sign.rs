//! Sign reference for the reinitialization equation

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Magnitude below which a sign reference counts as zero
///
/// Points on the interface get a zero RHS rather than a ±1 picked by round-off.
pub const SIGN_TOLERANCE: f64 = 1.0e-13;

/// Which field supplies sgn(·) in the reinitialization RHS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignPolicy {
    /// sgn(φ) of the current iterate (flag 0)
    #[default]
    Phi,
    /// sgn(φ0) of the initial condition (flag 1)
    Phi0,
}

impl SignPolicy {
    /// Decode the integer `use_phi0_for_sgn` flag
    ///
    /// `1` selects φ0 and `0` selects φ. Any other value also selects φ; this
    /// leniency is kept for compatibility with existing drivers and is logged.
    pub fn from_flag(flag: i32) -> Self {
        match flag {
            1 => SignPolicy::Phi0,
            0 => SignPolicy::Phi,
            other => {
                warn!(
                    flag = other,
                    "unrecognized use_phi0_for_sgn flag, falling back to sgn(phi)"
                );
                SignPolicy::Phi
            }
        }
    }

    /// Integer flag understood by [`SignPolicy::from_flag`]
    pub const fn flag(self) -> i32 {
        match self {
            SignPolicy::Phi => 0,
            SignPolicy::Phi0 => 1,
        }
    }

    /// Pick the sign reference value from the two candidates
    #[inline(always)]
    pub fn reference(self, phi: f64, phi0: f64) -> f64 {
        match self {
            SignPolicy::Phi => phi,
            SignPolicy::Phi0 => phi0,
        }
    }
}

/// sgn(v) with a dead zone of [`SIGN_TOLERANCE`] around zero
#[inline(always)]
pub fn sgn(v: f64) -> f64 {
    if v > SIGN_TOLERANCE {
        1.0
    } else if v < -SIGN_TOLERANCE {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_decoding() {
        assert_eq!(SignPolicy::from_flag(0), SignPolicy::Phi);
        assert_eq!(SignPolicy::from_flag(1), SignPolicy::Phi0);
        assert_eq!(SignPolicy::from_flag(2), SignPolicy::Phi);
        assert_eq!(SignPolicy::from_flag(-1), SignPolicy::Phi);
        assert_eq!(SignPolicy::from_flag(SignPolicy::Phi0.flag()), SignPolicy::Phi0);
    }

    #[test]
    fn test_sgn_dead_zone() {
        assert_eq!(sgn(0.3), 1.0);
        assert_eq!(sgn(-2.0), -1.0);
        assert_eq!(sgn(0.0), 0.0);
        assert_eq!(sgn(-0.0), 0.0);
        assert_eq!(sgn(1.0e-300), 0.0);
    }

    #[test]
    fn test_reference_selection() {
        assert_eq!(SignPolicy::Phi.reference(1.0, -1.0), 1.0);
        assert_eq!(SignPolicy::Phi0.reference(1.0, -1.0), -1.0);
    }
}
