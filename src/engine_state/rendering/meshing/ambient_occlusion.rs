//! Per-vertex ambient occlusion and quad diagonal selection.
//!
//! Each face corner looks at the three voxels around it in the plane in front of
//! the face: two sharing an edge with the corner and one touching it diagonally.
//! The more of them are solid, the darker the corner.

/// Brightest AO level, used when nothing occludes a corner.
pub const AO_UNOCCLUDED: u8 = 3;

/// Computes the AO level of one face corner.
///
/// Two solid edge neighbours close the corner off completely and give level 0
/// whatever the diagonal holds. Otherwise every solid sample darkens the corner
/// by one step.
///
/// # Returns
/// A level in `0..=3`, 3 being unoccluded.
#[inline]
pub fn vertex_ao(edge_a: bool, edge_b: bool, diagonal: bool) -> u8 {
    if edge_a && edge_b {
        return 0;
    }
    AO_UNOCCLUDED - (edge_a as u8 + edge_b as u8 + diagonal as u8)
}

/// Which diagonal a quad is split along.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuadDiagonal {
    /// Split along corners 0 and 2
    Main,
    /// Split along corners 1 and 3
    Flipped,
}

/// Picks the split that keeps AO interpolation from producing a visible seam.
///
/// The main diagonal is used only when its corners are strictly brighter in sum;
/// ties flip.
///
/// # Arguments
/// * `ao` - AO levels of corners 0 to 3
#[inline]
pub fn choose_diagonal(ao: [u8; 4]) -> QuadDiagonal {
    if ao[0] + ao[2] > ao[1] + ao[3] {
        QuadDiagonal::Main
    } else {
        QuadDiagonal::Flipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unoccluded_corner() {
        assert_eq!(vertex_ao(false, false, false), 3);
    }

    #[test]
    fn test_each_sample_darkens_one_step() {
        assert_eq!(vertex_ao(true, false, false), 2);
        assert_eq!(vertex_ao(false, true, false), 2);
        assert_eq!(vertex_ao(false, false, true), 2);
        assert_eq!(vertex_ao(true, false, true), 1);
        assert_eq!(vertex_ao(false, true, true), 1);
    }

    #[test]
    fn test_both_edges_ignore_diagonal() {
        assert_eq!(vertex_ao(true, true, false), 0);
        assert_eq!(vertex_ao(true, true, true), 0);
    }

    #[test]
    fn test_ties_flip() {
        assert_eq!(choose_diagonal([3, 3, 3, 3]), QuadDiagonal::Flipped);
        assert_eq!(choose_diagonal([2, 3, 3, 2]), QuadDiagonal::Flipped);
        assert_eq!(choose_diagonal([0, 0, 0, 0]), QuadDiagonal::Flipped);
    }

    #[test]
    fn test_brighter_main_diagonal_wins() {
        assert_eq!(choose_diagonal([3, 2, 3, 3]), QuadDiagonal::Main);
        assert_eq!(choose_diagonal([3, 3, 3, 2]), QuadDiagonal::Main);
        assert_eq!(choose_diagonal([2, 3, 2, 3]), QuadDiagonal::Flipped);
    }
}
