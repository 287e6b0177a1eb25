// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Array content read out of HDF5 datasets and attributes.

use hdf5::types::{
    FixedAscii, FixedUnicode, FloatSize, IntSize, TypeDescriptor, VarLenAscii, VarLenUnicode,
};
use ndarray::{ArrayD, Slice};

use crate::constants::*;
use crate::types::{DType, Shape};

/// The fully-read content of a dataset or attribute. A 0-d array is a
/// scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Int8(ArrayD<i8>),
    Int16(ArrayD<i16>),
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
    UInt8(ArrayD<u8>),
    UInt16(ArrayD<u16>),
    UInt32(ArrayD<u32>),
    UInt64(ArrayD<u64>),
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
    Bool(ArrayD<bool>),
    /// Fixed- or variable-length strings. `dtype` remembers which.
    Str { values: ArrayD<String>, dtype: DType },
    /// Element types we don't decode (compound, enum, array, reference...).
    /// Only the shape and type are kept.
    Opaque { shape: Shape, dtype: DType },
}

/// Evaluate `$body` with `$arr` bound to the array of any numeric variant.
macro_rules! with_numeric {
    ($data:expr, $arr:ident => $body:expr, $($rest:pat => $fallback:expr),+ $(,)?) => {
        match $data {
            ArrayData::Int8($arr) => $body,
            ArrayData::Int16($arr) => $body,
            ArrayData::Int32($arr) => $body,
            ArrayData::Int64($arr) => $body,
            ArrayData::UInt8($arr) => $body,
            ArrayData::UInt16($arr) => $body,
            ArrayData::UInt32($arr) => $body,
            ArrayData::UInt64($arr) => $body,
            ArrayData::Float32($arr) => $body,
            ArrayData::Float64($arr) => $body,
            $($rest => $fallback,)+
        }
    };
}

/// Like [`with_numeric`], but also covers booleans; i.e. everything that
/// `.npy` can hold.
macro_rules! with_writable {
    ($data:expr, $arr:ident => $body:expr, $($rest:pat => $fallback:expr),+ $(,)?) => {
        match $data {
            ArrayData::Int8($arr) => $body,
            ArrayData::Int16($arr) => $body,
            ArrayData::Int32($arr) => $body,
            ArrayData::Int64($arr) => $body,
            ArrayData::UInt8($arr) => $body,
            ArrayData::UInt16($arr) => $body,
            ArrayData::UInt32($arr) => $body,
            ArrayData::UInt64($arr) => $body,
            ArrayData::Float32($arr) => $body,
            ArrayData::Float64($arr) => $body,
            ArrayData::Bool($arr) => $body,
            $($rest => $fallback,)+
        }
    };
}

/// Every variant that actually holds an array.
macro_rules! with_array {
    ($data:expr, $arr:ident => $body:expr, $($rest:pat => $fallback:expr),+ $(,)?) => {
        match $data {
            ArrayData::Int8($arr) => $body,
            ArrayData::Int16($arr) => $body,
            ArrayData::Int32($arr) => $body,
            ArrayData::Int64($arr) => $body,
            ArrayData::UInt8($arr) => $body,
            ArrayData::UInt16($arr) => $body,
            ArrayData::UInt32($arr) => $body,
            ArrayData::UInt64($arr) => $body,
            ArrayData::Float32($arr) => $body,
            ArrayData::Float64($arr) => $body,
            ArrayData::Bool($arr) => $body,
            ArrayData::Str { values: $arr, .. } => $body,
            $($rest => $fallback,)+
        }
    };
}

pub(crate) use with_writable;

macro_rules! impl_from_array {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<ArrayD<$t>> for ArrayData {
                fn from(a: ArrayD<$t>) -> Self {
                    ArrayData::$variant(a)
                }
            }
        )*
    };
}

impl_from_array!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    bool => Bool,
);

impl ArrayData {
    /// Read everything held by an HDF5 dataset or attribute (both deref to
    /// [`hdf5::Container`]).
    pub fn read(container: &hdf5::Container) -> Result<ArrayData, hdf5::Error> {
        let desc = match container.dtype()?.to_descriptor() {
            Ok(desc) => desc,
            // The hdf5 crate can't describe every HDF5 type.
            Err(_) => {
                return Ok(ArrayData::Opaque {
                    shape: Shape(container.shape()),
                    dtype: DType::Other,
                })
            }
        };
        let data = match &desc {
            TypeDescriptor::Integer(IntSize::U1) => ArrayData::Int8(container.read_dyn()?),
            TypeDescriptor::Integer(IntSize::U2) => ArrayData::Int16(container.read_dyn()?),
            TypeDescriptor::Integer(IntSize::U4) => ArrayData::Int32(container.read_dyn()?),
            TypeDescriptor::Integer(IntSize::U8) => ArrayData::Int64(container.read_dyn()?),
            TypeDescriptor::Unsigned(IntSize::U1) => ArrayData::UInt8(container.read_dyn()?),
            TypeDescriptor::Unsigned(IntSize::U2) => ArrayData::UInt16(container.read_dyn()?),
            TypeDescriptor::Unsigned(IntSize::U4) => ArrayData::UInt32(container.read_dyn()?),
            TypeDescriptor::Unsigned(IntSize::U8) => ArrayData::UInt64(container.read_dyn()?),
            TypeDescriptor::Float(FloatSize::U4) => ArrayData::Float32(container.read_dyn()?),
            TypeDescriptor::Float(FloatSize::U8) => ArrayData::Float64(container.read_dyn()?),
            TypeDescriptor::Boolean => ArrayData::Bool(container.read_dyn()?),
            TypeDescriptor::VarLenUnicode => ArrayData::Str {
                values: container
                    .read_dyn::<VarLenUnicode>()?
                    .map(|s| s.as_str().to_owned()),
                dtype: DType::from(&desc),
            },
            TypeDescriptor::VarLenAscii => ArrayData::Str {
                values: container
                    .read_dyn::<VarLenAscii>()?
                    .map(|s| s.as_str().to_owned()),
                dtype: DType::from(&desc),
            },
            // libhdf5 converts between fixed string lengths, padding or
            // truncating to our buffer.
            TypeDescriptor::FixedAscii(_) => ArrayData::Str {
                values: container
                    .read_dyn::<FixedAscii<FIXED_STRING_BUF>>()?
                    .map(|s| s.as_str().to_owned()),
                dtype: DType::from(&desc),
            },
            TypeDescriptor::FixedUnicode(_) => ArrayData::Str {
                values: container
                    .read_dyn::<FixedUnicode<FIXED_STRING_BUF>>()?
                    .map(|s| s.as_str().to_owned()),
                dtype: DType::from(&desc),
            },
            _ => ArrayData::Opaque {
                shape: Shape(container.shape()),
                dtype: DType::from(&desc),
            },
        };
        Ok(data)
    }

    pub fn shape(&self) -> Shape {
        with_array!(
            self,
            a => Shape::from(a.shape()),
            ArrayData::Opaque { shape, .. } => shape.clone()
        )
    }

    pub fn dtype(&self) -> DType {
        match self {
            ArrayData::Int8(_) => DType::Int(1),
            ArrayData::Int16(_) => DType::Int(2),
            ArrayData::Int32(_) => DType::Int(4),
            ArrayData::Int64(_) => DType::Int(8),
            ArrayData::UInt8(_) => DType::UInt(1),
            ArrayData::UInt16(_) => DType::UInt(2),
            ArrayData::UInt32(_) => DType::UInt(4),
            ArrayData::UInt64(_) => DType::UInt(8),
            ArrayData::Float32(_) => DType::Float(4),
            ArrayData::Float64(_) => DType::Float(8),
            ArrayData::Bool(_) => DType::Bool,
            ArrayData::Str { dtype, .. } | ArrayData::Opaque { dtype, .. } => *dtype,
        }
    }

    /// The total number of elements.
    pub fn size(&self) -> usize {
        self.shape().size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// 0-d content, i.e. what h5py would hand back as a plain value rather
    /// than an array.
    pub fn is_scalar(&self) -> bool {
        self.shape().is_scalar()
    }

    /// Min/max/mean/std of numeric content. `None` for non-numeric or empty
    /// content.
    pub fn summary(&self) -> Option<Summary> {
        with_numeric!(self, a => Summary::of(a.iter().map(|&x| x as f64)), _ => None)
    }

    /// The first few elements of 1-, 2- and 3-D content: 1-D gives the
    /// first 10 elements, 2-D the first 3 rows, 3-D the first 2x2 along the
    /// first two axes. `None` for anything else, which is only worth
    /// describing by its shape.
    pub fn preview(&self) -> Option<ArrayData> {
        with_writable!(
            self,
            a => head(a).map(ArrayData::from),
            ArrayData::Str { values, dtype } => head(values).map(|values| ArrayData::Str {
                values,
                dtype: *dtype,
            }),
            ArrayData::Opaque { .. } => None,
        )
    }
}

fn head<T: Clone>(a: &ArrayD<T>) -> Option<ArrayD<T>> {
    let limits: &[usize] = match a.ndim() {
        1 => &[PREVIEW_1D_ELEMENTS],
        2 => &[PREVIEW_2D_ROWS],
        3 => &PREVIEW_3D_SLICE,
        _ => return None,
    };
    let view = a.slice_each_axis(|ax| {
        let end = limits
            .get(ax.axis.index())
            .map_or(ax.len, |&limit| limit.min(ax.len));
        Slice::from(..end)
    });
    Some(view.to_owned())
}

impl std::fmt::Display for ArrayData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        with_array!(
            self,
            a => write!(f, "{a}"),
            ArrayData::Opaque { dtype, .. } => write!(f, "<{dtype} values not decoded>")
        )
    }
}

/// Summary statistics of numeric content. The standard deviation is the
/// population one (divide by N), like numpy's default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl Summary {
    /// `None` if there are no values. Any NaN makes the min and max NaN.
    ///
    /// One pass, with Welford's running mean and variance; the std is the
    /// population std.
    pub fn of<I: IntoIterator<Item = f64>>(values: I) -> Option<Summary> {
        let mut n = 0usize;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for x in values {
            n += 1;
            let delta = x - mean;
            mean += delta / n as f64;
            m2 += delta * (x - mean);
            if x.is_nan() || min.is_nan() {
                min = f64::NAN;
                max = f64::NAN;
            } else {
                min = min.min(x);
                max = max.max(x);
            }
        }
        if n == 0 {
            return None;
        }
        Some(Summary {
            min,
            max,
            mean,
            std: (m2 / n as f64).sqrt(),
        })
    }
}
