//! Outer-totalistic birth/survival rules in `B.../S...` notation.

use std::fmt;
use std::str::FromStr;

use crate::error::RuleError;

/// A birth/survival rule over Moore neighbour counts `0..=8`.
///
/// Bit `n` of `birth` set means a dead cell with `n` live neighbours is
/// born; bit `n` of `survival` set means a live cell with `n` live
/// neighbours survives. Every other cell is dead next generation.
///
/// ```
/// use petri_engine::Rule;
///
/// let highlife: Rule = "B36/S23".parse().unwrap();
/// assert!(highlife.next_state(false, 6));
/// assert!(!Rule::CONWAY.next_state(false, 6));
/// assert_eq!(Rule::CONWAY.to_string(), "B3/S23");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rule {
    /// Birth mask.
    pub birth: u16,
    /// Survival mask.
    pub survival: u16,
}

impl Rule {
    /// Conway's Game of Life, `B3/S23`.
    pub const CONWAY: Rule = Rule {
        birth: 1 << 3,
        survival: (1 << 2) | (1 << 3),
    };

    /// Liveness of a cell next generation.
    pub fn next_state(&self, alive: bool, neighbours: u8) -> bool {
        let mask = if alive { self.survival } else { self.birth };
        neighbours <= 8 && mask & (1 << neighbours) != 0
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::CONWAY
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |mask: u16| -> String {
            (0..=8u8)
                .filter(|n| mask & (1 << n) != 0)
                .map(|n| char::from(b'0' + n))
                .collect()
        };
        write!(f, "B{}/S{}", digits(self.birth), digits(self.survival))
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    /// Parse `B3/S23` style notation. Case-insensitive; the two halves may
    /// appear in either order, and either may be empty (`B/S23`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| RuleError::Malformed {
            rule: s.to_owned(),
            reason: reason.to_owned(),
        };

        let (first, second) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| malformed("expected two halves separated by '/'"))?;

        let mut birth = None;
        let mut survival = None;
        for half in [first, second] {
            let half = half.trim();
            let mut chars = half.chars();
            let slot = match chars.next().map(|c| c.to_ascii_uppercase()) {
                Some('B') => &mut birth,
                Some('S') => &mut survival,
                _ => return Err(malformed("each half must start with 'B' or 'S'")),
            };
            if slot.is_some() {
                return Err(malformed("duplicate half"));
            }
            let mut mask = 0u16;
            for c in chars {
                match c.to_digit(10) {
                    Some(n) if n <= 8 => mask |= 1 << n,
                    _ => return Err(malformed("neighbour counts must be digits 0-8")),
                }
            }
            *slot = Some(mask);
        }

        match (birth, survival) {
            (Some(birth), Some(survival)) => Ok(Rule { birth, survival }),
            _ => Err(malformed("need one 'B' half and one 'S' half")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conway_transitions() {
        let r = Rule::CONWAY;
        assert!(r.next_state(false, 3));
        assert!(!r.next_state(false, 2));
        assert!(r.next_state(true, 2));
        assert!(r.next_state(true, 3));
        assert!(!r.next_state(true, 1));
        assert!(!r.next_state(true, 4));
        assert!(!r.next_state(true, 9));
    }

    #[test]
    fn parse_is_case_insensitive_and_order_free() {
        assert_eq!("B3/S23".parse::<Rule>().unwrap(), Rule::CONWAY);
        assert_eq!("b3/s23".parse::<Rule>().unwrap(), Rule::CONWAY);
        assert_eq!("S23/B3".parse::<Rule>().unwrap(), Rule::CONWAY);
        assert_eq!(" B3 / S23 ".parse::<Rule>().unwrap(), Rule::CONWAY);
    }

    #[test]
    fn empty_halves_are_allowed() {
        let r: Rule = "B/S".parse().unwrap();
        assert_eq!(r, Rule { birth: 0, survival: 0 });
        assert_eq!(r.to_string(), "B/S");
    }

    #[test]
    fn malformed_rules_are_rejected() {
        for bad in ["", "B3", "B3/B3", "X3/S23", "B9/S23", "B3/S2x", "23/3"] {
            let err = bad.parse::<Rule>().unwrap_err();
            let RuleError::Malformed { rule, .. } = err;
            assert_eq!(rule, bad);
        }
    }

    #[test]
    fn display_round_trips() {
        for text in ["B3/S23", "B36/S23", "B2/S", "B0123/S45678"] {
            let r: Rule = text.parse().unwrap();
            assert_eq!(r.to_string(), text);
        }
    }
}
