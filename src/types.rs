// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Generic types.

use hdf5::types::TypeDescriptor;

/// The element type of a dataset or attribute, named the way numpy names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    /// Signed integer; the number of bytes per element.
    Int(usize),
    /// Unsigned integer; the number of bytes per element.
    UInt(usize),
    /// Floating point; the number of bytes per element.
    Float(usize),
    Bool,
    /// Fixed-length string (ASCII or UTF-8); the number of bytes per element.
    FixedString(usize),
    /// Variable-length string, variable-length array or reference. h5py
    /// hands all of these back as python objects.
    Object,
    Enum,
    Compound,
    /// A fixed-size array element type.
    Array,
    Other,
}

impl DType {
    /// Numeric types get min/max/mean/std summaries. Booleans and strings
    /// don't.
    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Int(_) | DType::UInt(_) | DType::Float(_))
    }
}

impl From<&TypeDescriptor> for DType {
    fn from(desc: &TypeDescriptor) -> Self {
        match desc {
            TypeDescriptor::Integer(size) => DType::Int(*size as usize),
            TypeDescriptor::Unsigned(size) => DType::UInt(*size as usize),
            TypeDescriptor::Float(size) => DType::Float(*size as usize),
            TypeDescriptor::Boolean => DType::Bool,
            TypeDescriptor::FixedAscii(n) | TypeDescriptor::FixedUnicode(n) => {
                DType::FixedString(*n)
            }
            TypeDescriptor::VarLenAscii
            | TypeDescriptor::VarLenUnicode
            | TypeDescriptor::VarLenArray(_)
            | TypeDescriptor::Reference(_) => DType::Object,
            TypeDescriptor::Enum(_) => DType::Enum,
            TypeDescriptor::Compound(_) => DType::Compound,
            TypeDescriptor::FixedArray(_, _) => DType::Array,
            #[allow(unreachable_patterns)]
            _ => DType::Other,
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DType::Int(n) => write!(f, "int{}", n * 8),
            DType::UInt(n) => write!(f, "uint{}", n * 8),
            DType::Float(n) => write!(f, "float{}", n * 8),
            DType::Bool => write!(f, "bool"),
            DType::FixedString(n) => write!(f, "|S{n}"),
            DType::Object => write!(f, "object"),
            DType::Enum => write!(f, "enum"),
            DType::Compound => write!(f, "compound"),
            DType::Array => write!(f, "array"),
            DType::Other => write!(f, "other"),
        }
    }
}

/// The dimensions of an array. An empty shape is a scalar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Shape(pub Vec<usize>);

impl Shape {
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// The total number of elements. A scalar has one.
    pub fn size(&self) -> usize {
        self.0.iter().product()
    }

    pub fn is_scalar(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape(dims.to_vec())
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape(dims)
    }
}

/// Rendered like a python tuple: `()`, `(3,)`, `(2, 3)`.
impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "()"),
            [n] => write!(f, "({n},)"),
            [first, rest @ ..] => {
                write!(f, "({first}")?;
                for n in rest {
                    write!(f, ", {n}")?;
                }
                write!(f, ")")
            }
        }
    }
}
