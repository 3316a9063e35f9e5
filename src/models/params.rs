use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, TunerError};

/// The two tunable KDF families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfFamily {
    Argon2,
    Scrypt,
}

impl KdfFamily {
    /// Tag understood by the measurement oracle on its command line.
    pub fn tag(self) -> &'static str {
        match self {
            KdfFamily::Argon2 => "ARGON2",
            KdfFamily::Scrypt => "scrypt",
        }
    }

    /// Starting point used when the caller does not supply one.
    pub fn default_start(self) -> ParameterPoint {
        match self {
            KdfFamily::Argon2 => ParameterPoint::argon2(1, 1, 1),
            KdfFamily::Scrypt => ParameterPoint::scrypt(1, 1, 1),
        }
    }

    /// Build a point of this family from fields in wire order.
    pub fn point(self, fields: [u32; 3]) -> ParameterPoint {
        match self {
            KdfFamily::Argon2 => ParameterPoint::argon2(fields[0], fields[1], fields[2]),
            KdfFamily::Scrypt => ParameterPoint::scrypt(fields[0], fields[1], fields[2]),
        }
    }
}

impl fmt::Display for KdfFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KdfFamily::Argon2 => write!(f, "argon2"),
            KdfFamily::Scrypt => write!(f, "scrypt"),
        }
    }
}

impl FromStr for KdfFamily {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "argon2" => Ok(KdfFamily::Argon2),
            "scrypt" => Ok(KdfFamily::Scrypt),
            other => Err(format!("unknown KDF family: {other}")),
        }
    }
}

/// One concrete assignment of a KDF family's cost knobs.
///
/// Points are pure values: created by neighbor generation, never mutated.
/// Structural equality and hashing back the visited-set, so two equal points
/// are always the same point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum ParameterPoint {
    Argon2 {
        time_cost: u32,
        memory_cost: u32,
        parallelism: u32,
    },
    Scrypt {
        /// Work factor N, stepped multiplicatively by 4.
        cost: u32,
        block_size: u32,
        parallelism: u32,
    },
}

impl ParameterPoint {
    pub fn argon2(time_cost: u32, memory_cost: u32, parallelism: u32) -> Self {
        ParameterPoint::Argon2 {
            time_cost,
            memory_cost,
            parallelism,
        }
    }

    pub fn scrypt(cost: u32, block_size: u32, parallelism: u32) -> Self {
        ParameterPoint::Scrypt {
            cost,
            block_size,
            parallelism,
        }
    }

    pub fn family(&self) -> KdfFamily {
        match self {
            ParameterPoint::Argon2 { .. } => KdfFamily::Argon2,
            ParameterPoint::Scrypt { .. } => KdfFamily::Scrypt,
        }
    }

    /// Oracle command-line tag for this point's family.
    pub fn family_tag(&self) -> &'static str {
        self.family().tag()
    }

    /// Cost knobs in the fixed order the oracle expects them.
    pub fn fields(&self) -> [u32; 3] {
        match *self {
            ParameterPoint::Argon2 {
                time_cost,
                memory_cost,
                parallelism,
            } => [time_cost, memory_cost, parallelism],
            ParameterPoint::Scrypt {
                cost,
                block_size,
                parallelism,
            } => [cost, block_size, parallelism],
        }
    }

    /// Canonical key, stable across runs. Used for CSV rows and display.
    pub fn key(&self) -> String {
        let [a, b, c] = self.fields();
        format!("{}({},{},{})", self.family_tag(), a, b, c)
    }

    /// Reject points with any knob below 1, before any oracle call is made.
    pub fn validate(&self) -> Result<()> {
        if self.fields().iter().any(|&f| f < 1) {
            return Err(TunerError::InvalidParameter(format!(
                "all cost knobs must be >= 1, got {}",
                self.key()
            )));
        }
        Ok(())
    }

    /// All structurally distinct points one step away.
    ///
    /// Additive knobs move by one in each direction; the scrypt work factor
    /// moves by a factor of four. Steps that would take a knob below 1 (or
    /// overflow it) are omitted, not clamped, so every returned point is
    /// valid. The set never contains `self`.
    pub fn neighbors(&self) -> Vec<ParameterPoint> {
        let mut out = Vec::with_capacity(6);
        match *self {
            ParameterPoint::Argon2 {
                time_cost: t,
                memory_cost: m,
                parallelism: d,
            } => {
                if t > 1 {
                    out.push(Self::argon2(t - 1, m, d));
                }
                out.push(Self::argon2(t + 1, m, d));

                if m > 1 {
                    out.push(Self::argon2(t, m - 1, d));
                }
                out.push(Self::argon2(t, m + 1, d));

                if d > 1 {
                    out.push(Self::argon2(t, m, d - 1));
                }
                out.push(Self::argon2(t, m, d + 1));
            }
            ParameterPoint::Scrypt {
                cost: n,
                block_size: r,
                parallelism: p,
            } => {
                if n / 4 > 1 {
                    out.push(Self::scrypt(n / 4, r, p));
                }
                if let Some(up) = n.checked_mul(4) {
                    out.push(Self::scrypt(up, r, p));
                }

                if r > 1 {
                    out.push(Self::scrypt(n, r - 1, p));
                }
                out.push(Self::scrypt(n, r + 1, p));

                if p > 1 {
                    out.push(Self::scrypt(n, r, p - 1));
                }
                out.push(Self::scrypt(n, r, p + 1));
            }
        }
        out
    }

    /// Increment-direction neighbors only, one per knob.
    ///
    /// With a bound (which must be of the same family), a knob's successor is
    /// omitted once the stepped value would exceed the bound's knob, which
    /// makes exhaustive traversal terminate and keeps every visited point
    /// inside the bound.
    pub fn successors(&self, bound: Option<&ParameterPoint>) -> Vec<ParameterPoint> {
        let limit = bound.map(|b| b.fields());
        let within = |idx: usize, next: u32| limit.is_none_or(|f| next <= f[idx]);

        let mut out = Vec::with_capacity(3);
        match *self {
            ParameterPoint::Argon2 {
                time_cost: t,
                memory_cost: m,
                parallelism: d,
            } => {
                if within(0, t + 1) {
                    out.push(Self::argon2(t + 1, m, d));
                }
                if within(1, m + 1) {
                    out.push(Self::argon2(t, m + 1, d));
                }
                if within(2, d + 1) {
                    out.push(Self::argon2(t, m, d + 1));
                }
            }
            ParameterPoint::Scrypt {
                cost: n,
                block_size: r,
                parallelism: p,
            } => {
                if let Some(up) = n.checked_mul(4) {
                    if within(0, up) {
                        out.push(Self::scrypt(up, r, p));
                    }
                }
                if within(1, r + 1) {
                    out.push(Self::scrypt(n, r + 1, p));
                }
                if within(2, p + 1) {
                    out.push(Self::scrypt(n, r, p + 1));
                }
            }
        }
        out
    }
}

impl fmt::Display for ParameterPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParameterPoint::Argon2 {
                time_cost,
                memory_cost,
                parallelism,
            } => write!(f, "t={} m={} p={}", time_cost, memory_cost, parallelism),
            ParameterPoint::Scrypt {
                cost,
                block_size,
                parallelism,
            } => write!(f, "N={} r={} p={}", cost, block_size, parallelism),
        }
    }
}
