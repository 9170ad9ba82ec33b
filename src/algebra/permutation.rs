//! Signed permutations (elements of the hyperoctahedral group).
//!
//! A permutation of rank `n` is stored as `n` signed, 1-based indices. Entry `c` names the
//! source index for position `c`; a negative entry additionally flips the sign of the value.
//! Applied to color channels, a flipped channel is inverted within the display range.

use std::fmt;

use smallvec::SmallVec;

use crate::foundation::error::{SymmetraError, SymmetraResult};

/// Largest rank accepted by [`Permutation::closing`]; enumeration is `n! * 2^n`.
const MAX_ENUMERATION_RANK: usize = 6;

/// Signed bijection over `{1..n}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct Permutation {
    indices: SmallVec<[i32; 4]>,
}

impl Permutation {
    /// Validate and build a permutation from signed 1-based indices.
    ///
    /// The absolute values must be distinct and span exactly `1..=n`.
    pub fn new(indices: impl IntoIterator<Item = i32>) -> SymmetraResult<Self> {
        let indices = indices.into_iter().collect::<SmallVec<[i32; 4]>>();
        let n = indices.len();
        if n == 0 {
            return Err(SymmetraError::validation("permutation rank must be >= 1"));
        }
        let mut seen = vec![false; n];
        for &v in &indices {
            let a = v.unsigned_abs() as usize;
            if a == 0 || a > n {
                return Err(SymmetraError::validation(format!(
                    "permutation entry {v} out of range for rank {n}"
                )));
            }
            if std::mem::replace(&mut seen[a - 1], true) {
                return Err(SymmetraError::validation(format!(
                    "permutation entry {a} appears more than once"
                )));
            }
        }
        Ok(Self { indices })
    }

    /// Identity permutation of rank `n`.
    pub fn unity(rank: usize) -> Self {
        Self {
            indices: (1..=rank as i32).collect(),
        }
    }

    /// Number of permuted positions.
    pub fn rank(&self) -> usize {
        self.indices.len()
    }

    /// Signed 1-based entries.
    pub fn indices(&self) -> &[i32] {
        &self.indices
    }

    /// `true` for the identity.
    pub fn is_unity(&self) -> bool {
        self.indices
            .iter()
            .enumerate()
            .all(|(i, &v)| v == i as i32 + 1)
    }

    /// Source position (0-based) for output position `pos` and whether the value is negated.
    pub fn source(&self, pos: usize) -> (usize, bool) {
        let v = self.indices[pos];
        ((v.unsigned_abs() as usize) - 1, v < 0)
    }

    fn image_of(&self, signed: i32) -> i32 {
        let v = self.indices[(signed.unsigned_abs() as usize) - 1];
        if signed < 0 { -v } else { v }
    }

    fn compose_unchecked(&self, other: &Self) -> Self {
        Self {
            indices: other.indices.iter().map(|&i| self.image_of(i)).collect(),
        }
    }

    /// Composition `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> SymmetraResult<Self> {
        if self.rank() != other.rank() {
            return Err(SymmetraError::validation(format!(
                "cannot compose permutations of rank {} and {}",
                self.rank(),
                other.rank()
            )));
        }
        Ok(self.compose_unchecked(other))
    }

    /// `self` composed with itself `k` times; `power(0)` is unity.
    pub fn power(&self, k: u32) -> Self {
        let mut acc = Self::unity(self.rank());
        let mut base = self.clone();
        let mut k = k;
        while k > 0 {
            if k & 1 == 1 {
                acc = acc.compose_unchecked(&base);
            }
            base = base.compose_unchecked(&base);
            k >>= 1;
        }
        acc
    }

    /// Group inverse.
    pub fn inverse(&self) -> Self {
        let mut out = SmallVec::<[i32; 4]>::from_elem(0, self.rank());
        for (pos, &v) in self.indices.iter().enumerate() {
            let target = (v.unsigned_abs() as usize) - 1;
            let p = pos as i32 + 1;
            out[target] = if v < 0 { -p } else { p };
        }
        Self { indices: out }
    }

    /// Cyclic orbit `[unity, P, P^2, ..., P^(order-1)]`.
    pub fn ring(&self) -> Vec<Self> {
        let unity = Self::unity(self.rank());
        let mut ring = vec![unity.clone()];
        let mut cur = self.clone();
        while cur != unity {
            ring.push(cur.clone());
            cur = cur.compose_unchecked(self);
        }
        ring
    }

    /// Multiplicative order: smallest `k >= 1` with `P^k = unity`.
    pub fn order(&self) -> usize {
        self.ring().len()
    }

    /// `true` when `P^k = unity`.
    pub fn closes_after(&self, k: u32) -> bool {
        k > 0 && self.power(k).is_unity()
    }

    /// Every signed permutation of rank `rank` whose `k`-th power is unity.
    pub fn closing(rank: usize, k: u32) -> SymmetraResult<Vec<Self>> {
        if rank == 0 || rank > MAX_ENUMERATION_RANK {
            return Err(SymmetraError::validation(format!(
                "permutation enumeration supports ranks 1..={MAX_ENUMERATION_RANK}, got {rank}"
            )));
        }
        let mut out = Vec::new();
        let mut current = Vec::with_capacity(rank);
        let mut used = vec![false; rank];
        enumerate_unsigned(rank, &mut current, &mut used, &mut |perm| {
            for signs in 0u32..(1 << rank) {
                let indices = perm
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| if signs & (1 << i) != 0 { -v } else { v })
                    .collect();
                let p = Self { indices };
                if p.closes_after(k) {
                    out.push(p);
                }
            }
        });
        Ok(out)
    }
}

fn enumerate_unsigned(
    rank: usize,
    current: &mut Vec<i32>,
    used: &mut [bool],
    emit: &mut dyn FnMut(&[i32]),
) {
    if current.len() == rank {
        emit(current);
        return;
    }
    for v in 0..rank {
        if used[v] {
            continue;
        }
        used[v] = true;
        current.push(v as i32 + 1);
        enumerate_unsigned(rank, current, used, emit);
        current.pop();
        used[v] = false;
    }
}

impl TryFrom<Vec<i32>> for Permutation {
    type Error = SymmetraError;

    fn try_from(v: Vec<i32>) -> SymmetraResult<Self> {
        Self::new(v)
    }
}

impl From<Permutation> for Vec<i32> {
    fn from(p: Permutation) -> Self {
        p.indices.into_vec()
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.indices.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/algebra/permutation.rs"]
mod tests;
