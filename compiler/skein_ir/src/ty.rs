//! Value types.
//!
//! The hoisting pipeline treats types as opaque labels: they are copied
//! onto newly created results and printed, never inspected. A ranked
//! static-shape tensor type is enough for every graph the passes see.

use std::fmt;

use smallvec::SmallVec;

/// Element type of a tensor value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    F32,
    F16,
    Bf16,
    I32,
    I64,
    /// Boolean predicate.
    Pred,
}

impl DType {
    fn as_str(self) -> &'static str {
        match self {
            DType::F32 => "f32",
            DType::F16 => "f16",
            DType::Bf16 => "bf16",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::Pred => "pred",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ranked tensor type with a static shape.
///
/// Rank 0 is a scalar and prints as the bare element type (`f32`);
/// higher ranks print as `f32[2x4]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ty {
    pub dtype: DType,
    pub shape: SmallVec<[u32; 4]>,
}

impl Ty {
    /// Scalar (rank-0) type.
    pub fn scalar(dtype: DType) -> Self {
        Self {
            dtype,
            shape: SmallVec::new(),
        }
    }

    /// Ranked tensor type with the given dimensions.
    pub fn tensor(dtype: DType, dims: &[u32]) -> Self {
        Self {
            dtype,
            shape: SmallVec::from_slice(dims),
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shape.is_empty() {
            return write!(f, "{}", self.dtype);
        }
        write!(f, "{}[", self.dtype)?;
        for (i, dim) in self.shape.iter().enumerate() {
            if i > 0 {
                f.write_str("x")?;
            }
            write!(f, "{dim}")?;
        }
        f.write_str("]")
    }
}
