//! Node names and ids.
//!
//! Names are matched the way ngspice matches them: case-insensitively, with
//! `0` and `gnd` both meaning the reference node.

use std::fmt;

/// Position of a node in its circuit's node table. Ground is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const GROUND: Self = Self(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_ground(self) -> bool {
        self.0 == Self::GROUND.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ground prints as its SPICE name
        write!(f, "{}", self.0)
    }
}

pub fn is_ground_name(name: &str) -> bool {
    let name = name.trim();
    name == "0" || name.eq_ignore_ascii_case("gnd")
}

/// Lookup key for a node name: trimmed and lower-case, ground aliases as `0`.
pub fn canonical_name(name: &str) -> String {
    if is_ground_name(name) {
        "0".to_string()
    } else {
        name.trim().to_lowercase()
    }
}

/// A declared node: its id and the spelling first used for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
}

impl Node {
    pub(crate) fn ground() -> Self {
        Self {
            id: NodeId::GROUND,
            name: "0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_id() {
        assert!(NodeId::GROUND.is_ground());
        assert!(!NodeId::new(4).is_ground());
        assert_eq!(NodeId::GROUND.to_string(), "0");
        assert_eq!(Node::ground().name, "0");
    }

    #[test]
    fn test_ground_aliases() {
        assert!(is_ground_name("0"));
        assert!(is_ground_name(" GND "));
        assert!(!is_ground_name("00"));
        assert!(!is_ground_name("led_node1"));
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name(" Rect_Out2"), "rect_out2");
        assert_eq!(canonical_name("Gnd"), "0");
    }
}
