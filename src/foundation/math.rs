/// FNV-1a accumulator used for stable parameter identities (cache keys).
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Canonical little-endian encoding of parameters. Two encodings compare equal exactly when
/// the parameters do; the FNV-1a hash of the bytes is only a bucketing aid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct IdentityBytes(Vec<u8>);

impl IdentityBytes {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.0.push(v);
    }

    pub(crate) fn write_u32(&mut self, v: u32) {
        self.0.extend_from_slice(&v.to_le_bytes());
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.0.extend_from_slice(&v.to_le_bytes());
    }

    /// Encode the bit pattern, with `-0.0` folded onto `0.0` so equal parameters encode equally.
    pub(crate) fn write_f64(&mut self, v: f64) {
        let v = if v == 0.0 { 0.0 } else { v };
        self.write_u64(v.to_bits());
    }

    pub(crate) fn hash(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_bytes(&self.0);
        h.finish()
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Minimal 3-vector for sphere charts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Vec3 {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
}

impl Vec3 {
    pub(crate) const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub(crate) fn dot(self, o: Self) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    pub(crate) fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub(crate) fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(Self::new(self.x / len, self.y / len, self.z / len))
    }
}

/// Row-major 3x3 matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Mat3(pub(crate) [[f64; 3]; 3]);

impl Mat3 {
    pub(crate) const IDENTITY: Self = Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Right-handed rotation by `angle` about the unit vector `axis`.
    pub(crate) fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let Vec3 { x, y, z } = axis.normalized().unwrap_or(Vec3::new(0.0, 0.0, 1.0));
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        Self([
            [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
            [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
            [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
        ])
    }

    pub(crate) fn rotation_z(angle: f64) -> Self {
        Self::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), angle)
    }

    pub(crate) fn rotation_y(angle: f64) -> Self {
        Self::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), angle)
    }

    pub(crate) fn mul(&self, o: &Self) -> Self {
        let mut out = [[0.0; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.0[r][k] * o.0[k][c]).sum();
            }
        }
        Self(out)
    }

    pub(crate) fn apply(&self, v: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    pub(crate) fn approx_eq(&self, o: &Self, eps: f64) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(o.0.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= eps)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
