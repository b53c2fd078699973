use std::str::FromStr;

use crate::error::{Error, Result};

/// selects every bit
pub const ALL_BITS: u32 = 0xFFFF_FFFF;

/// a permission update: bits selected by `mask` take their value from `mode`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeChange {
    pub mask: u32,
    pub mode: u32,
}

impl ModeChange {
    /// replace every bit with `mode`
    pub fn absolute(mode: u32) -> Self {
        Self {
            mask: ALL_BITS,
            mode,
        }
    }

    /// apply to a permission value
    pub fn apply(&self, perm: u32) -> u32 {
        (self.mask & self.mode) | (perm & !self.mask)
    }
}

/// parses `0NNN` or `<who><op><perm>`
///
/// who: `a` all, `u` 0700, `g` 0070, `w` 0007 (others).
/// op: `=` sets the who bits to exactly perm, `+` adds, `-` clears.
/// perm: `r` 0444, `w` 0222, `x` 0111.
impl FromStr for ModeChange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() == 4 && s.starts_with('0') {
            let digits = &s[1..];
            if !digits.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
                return Err(invalid(s));
            }
            return u32::from_str_radix(digits, 8)
                .map(Self::absolute)
                .map_err(|_| invalid(s));
        }

        let op_idx = s.find(['=', '+', '-']).ok_or_else(|| invalid(s))?;
        let (who, rest) = s.split_at(op_idx);
        let (op, perms) = rest.split_at(1);
        if who.is_empty() || perms.is_empty() {
            return Err(invalid(s));
        }

        let mut who_mask = 0;
        for c in who.chars() {
            who_mask |= match c {
                'a' => ALL_BITS,
                'u' => 0o700,
                'g' => 0o070,
                'w' => 0o007,
                _ => return Err(invalid(s)),
            };
        }

        let mut perm_mask = 0;
        for c in perms.chars() {
            perm_mask |= match c {
                'r' => 0o444,
                'w' => 0o222,
                'x' => 0o111,
                _ => return Err(invalid(s)),
            };
        }

        Ok(match op {
            "=" => Self {
                mask: who_mask,
                mode: perm_mask,
            },
            "+" => Self {
                mask: who_mask & perm_mask,
                mode: ALL_BITS,
            },
            _ => Self {
                mask: who_mask & perm_mask,
                mode: 0,
            },
        })
    }
}

fn invalid(s: &str) -> Error {
    Error::InvalidSpec(format!("invalid mode {:?}", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(spec: &str, perm: u32) -> u32 {
        spec.parse::<ModeChange>().unwrap().apply(perm)
    }

    #[test]
    fn test_all_set_rwx() {
        assert_eq!(apply("a=rwx", 0o000), 0o777);
    }

    #[test]
    fn test_user_clear_write() {
        assert_eq!(apply("u-w", 0o666), 0o466);
    }

    #[test]
    fn test_absolute_ignores_prior() {
        for prior in [0o000, 0o777, 0o644, 0o7777] {
            assert_eq!(apply("0755", prior), 0o755);
        }
    }

    #[test]
    fn test_plus_keeps_other_bits() {
        assert_eq!(apply("g+w", 0o644), 0o664);
        assert_eq!(apply("ug+x", 0o644), 0o754);
        assert_eq!(apply("a+x", 0o4644), 0o4755);
    }

    #[test]
    fn test_equals_clears_within_who() {
        assert_eq!(apply("w=r", 0o777), 0o774);
        assert_eq!(apply("u=rw", 0o755), 0o655);
    }

    #[test]
    fn test_others_symbol_is_w() {
        assert_eq!(apply("w-rwx", 0o777), 0o770);
        assert!("o+r".parse::<ModeChange>().is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "755", "0855", "07555", "0+75", "a", "a+", "+r", "a*r", "u+q", "x0755"] {
            assert!(bad.parse::<ModeChange>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_absolute_mask() {
        let m: ModeChange = "0640".parse().unwrap();
        assert_eq!(m, ModeChange::absolute(0o640));
        assert_eq!(m.mask, ALL_BITS);
    }
}
