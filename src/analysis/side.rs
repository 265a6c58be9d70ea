use serde::{Deserialize, Serialize};

/// Side of the body an injury was operated on, as recorded on the injury.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Unknown,
}

/// Field suffix of a bilateral measurement column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suffix {
    L,
    R,
}

impl Suffix {
    pub fn as_str(self) -> &'static str {
        match self {
            Suffix::L => "l",
            Suffix::R => "r",
        }
    }
}

/// Which suffix holds the operated limb and which the healthy one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidePair {
    pub operated: Suffix,
    pub healthy: Suffix,
}

impl Side {
    /// Parse the stored `zijde` value. Both the stored Dutch values and English names are accepted.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("Links") | Some("Left") => Side::Left,
            Some("Rechts") | Some("Right") => Side::Right,
            _ => Side::Unknown,
        }
    }

    /// Resolve once per injury; `None` means the injury takes no part in side-dependent aggregates.
    pub fn resolve(self) -> Option<SidePair> {
        match self {
            Side::Left => Some(SidePair {
                operated: Suffix::L,
                healthy: Suffix::R,
            }),
            Side::Right => Some(SidePair {
                operated: Suffix::R,
                healthy: Suffix::L,
            }),
            Side::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_operates_on_l() {
        let pair = Side::parse(Some("Links")).resolve().unwrap();
        assert_eq!(pair.operated, Suffix::L);
        assert_eq!(pair.healthy, Suffix::R);
        assert_eq!(Side::parse(Some("Left")), Side::Left);
    }

    #[test]
    fn right_operates_on_r() {
        let pair = Side::parse(Some("Rechts")).resolve().unwrap();
        assert_eq!(pair.operated.as_str(), "r");
        assert_eq!(pair.healthy.as_str(), "l");
    }

    #[test]
    fn anything_else_is_unresolved() {
        assert_eq!(Side::parse(None).resolve(), None);
        assert_eq!(Side::parse(Some("")).resolve(), None);
        assert_eq!(Side::parse(Some("links")).resolve(), None);
        assert_eq!(Side::Unknown.resolve(), None);
    }
}
