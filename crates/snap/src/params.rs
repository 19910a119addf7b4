//! Query parameters: which objects to consider and which element kind to snap to.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Object selection filter for the scene loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapSelect {
    /// Everything except the active object (the edit object is tried first)
    #[default]
    All,
    /// Only objects that are neither selected nor were selected when the operation started
    NotSelected,
    /// Everything except the active object, without trying the edit object first
    NotEditObject,
}

/// Element kind of a single-kind query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapElement {
    #[default]
    Vertex,
    Edge,
    Face,
}

impl SnapElement {
    /// Order in which mixed queries try the kinds
    pub const MIXED_ORDER: [SnapElement; 3] = [SnapElement::Vertex, SnapElement::Edge, SnapElement::Face];

    pub fn flag(self) -> SnapElementFlags {
        match self {
            SnapElement::Vertex => SnapElementFlags::VERTEX,
            SnapElement::Edge => SnapElementFlags::EDGE,
            SnapElement::Face => SnapElementFlags::FACE,
        }
    }
}

bitflags! {
    /// Set of element kinds for mixed queries
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SnapElementFlags: u8 {
        const VERTEX = 1 << 0;
        const EDGE = 1 << 1;
        const FACE = 1 << 2;
    }
}

impl Default for SnapElementFlags {
    fn default() -> Self {
        SnapElementFlags::VERTEX
    }
}

impl SnapElementFlags {
    /// The kind named by a single-bit set
    pub fn single(self) -> Option<SnapElement> {
        SnapElement::MIXED_ORDER
            .into_iter()
            .find(|element| element.flag() == self)
    }
}

/// Per-query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SnapObjectParams {
    pub snap_select: SnapSelect,
    /// Kind for single-kind queries
    pub snap_to: SnapElement,
    /// Kinds for mixed queries
    pub snap_to_flags: SnapElementFlags,
    /// Give the active object special treatment (skip it, or snap it first in particle edit)
    pub use_object_active: bool,
    /// Snap the edit object against its edit cage
    pub use_object_edit: bool,
}

impl SnapObjectParams {
    pub fn new(snap_to: SnapElement) -> Self {
        Self {
            snap_to,
            snap_to_flags: snap_to.flag(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flag_resolves_to_kind() {
        assert_eq!(SnapElementFlags::EDGE.single(), Some(SnapElement::Edge));
        assert_eq!((SnapElementFlags::VERTEX | SnapElementFlags::FACE).single(), None);
        assert_eq!(SnapElementFlags::empty().single(), None);
    }

    #[test]
    fn test_flag_bits() {
        assert_eq!(SnapElementFlags::VERTEX.bits(), 1);
        assert_eq!(SnapElementFlags::EDGE.bits(), 2);
        assert_eq!(SnapElementFlags::FACE.bits(), 4);
    }
}
