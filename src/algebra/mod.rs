//! Finite group algebra used to keep channel remapping consistent with rotational symmetry.

/// Signed permutations.
pub mod permutation;
