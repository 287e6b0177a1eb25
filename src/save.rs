// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Write extracted content to NumPy files.

use std::path::{Path, PathBuf};

use ndarray_npy::NpzWriter;
use tracing::info;

use crate::data::with_writable;
use crate::{ArrayData, Extracted, InspectError};

/// Write what [`crate::extract`] returned. A single dataset becomes a `.npy`
/// file, everything becomes a `.npz` file with one member per dataset path.
/// Like `np.save`, the extension is appended if `output` doesn't already
/// have it. The file is overwritten if it exists.
///
/// Returns the path that was actually written.
pub fn save_extracted<P: AsRef<Path>>(
    extracted: &Extracted,
    output: P,
) -> Result<PathBuf, InspectError> {
    let output = output.as_ref();
    let written = match extracted {
        Extracted::Dataset { path, data } => {
            let out = with_extension(output, "npy");
            with_writable!(
                data,
                a => ndarray_npy::write_npy(&out, a)?,
                other => return Err(unsupported(path, other)),
            );
            out
        }

        Extracted::All(datasets) => {
            // Check everything first so we don't leave half a file behind.
            for (path, data) in datasets {
                if matches!(data, ArrayData::Str { .. } | ArrayData::Opaque { .. }) {
                    return Err(unsupported(path, data));
                }
            }

            let out = with_extension(output, "npz");
            let mut npz = NpzWriter::new(std::fs::File::create(&out)?);
            for (path, data) in datasets {
                with_writable!(
                    data,
                    a => npz.add_array(path.as_str(), a)?,
                    other => return Err(unsupported(path, other)),
                );
            }
            npz.finish()?;
            out
        }
    };

    info!("Wrote '{}'", written.display());
    Ok(written)
}

fn unsupported(path: &str, data: &ArrayData) -> InspectError {
    InspectError::UnsupportedSave {
        name: path.to_string(),
        dtype: data.dtype(),
    }
}

fn with_extension(path: &Path, ext: &str) -> PathBuf {
    if path.extension().is_some_and(|e| e == ext) {
        path.to_path_buf()
    } else {
        let mut s = path.as_os_str().to_owned();
        s.push(".");
        s.push(ext);
        PathBuf::from(s)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use ndarray::prelude::*;
    use ndarray_npy::{read_npy, NpzReader};

    use super::*;
    use crate::DType;

    fn single(data: ArrayData) -> Extracted {
        Extracted::Dataset {
            path: "observations/qpos".to_string(),
            data,
        }
    }

    #[test]
    fn test_with_extension() {
        assert_eq!(
            with_extension(Path::new("out.npy"), "npy"),
            PathBuf::from("out.npy")
        );
        assert_eq!(
            with_extension(Path::new("qpos_data"), "npy"),
            PathBuf::from("qpos_data.npy")
        );
        assert_eq!(
            with_extension(Path::new("dir/out.npy"), "npz"),
            PathBuf::from("dir/out.npy.npz")
        );
    }

    #[test]
    fn test_save_npy() {
        let dir = tempfile::tempdir().unwrap();
        let array = array![[1.5f32, -2.0], [f32::MAX, 0.0]].into_dyn();
        let extracted = single(ArrayData::from(array.clone()));
        let written = save_extracted(&extracted, dir.path().join("qpos")).unwrap();
        assert_eq!(written, dir.path().join("qpos.npy"));

        let reloaded: ArrayD<f32> = read_npy(&written).unwrap();
        assert_eq!(reloaded, array);
    }

    #[test]
    fn test_save_npy_bool_scalar() {
        let dir = tempfile::tempdir().unwrap();
        let array = arr0(true).into_dyn();
        let extracted = single(ArrayData::from(array.clone()));
        let written = save_extracted(&extracted, dir.path().join("flag.npy")).unwrap();
        let reloaded: ArrayD<bool> = read_npy(&written).unwrap();
        assert_eq!(reloaded, array);
    }

    #[test]
    fn test_save_strings_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data = ArrayData::Str {
            values: array!["a".to_string(), "b".to_string()].into_dyn(),
            dtype: DType::Object,
        };
        let result = save_extracted(&single(data), dir.path().join("names.npy"));
        assert!(matches!(
            result,
            Err(InspectError::UnsupportedSave {
                dtype: DType::Object,
                ..
            })
        ));
        assert!(!dir.path().join("names.npy").exists());
    }

    #[test]
    fn test_save_npz() {
        let dir = tempfile::tempdir().unwrap();
        let mut datasets = BTreeMap::new();
        datasets.insert(
            "action".to_string(),
            ArrayData::from(array![1.0f64, 2.0, 3.0].into_dyn()),
        );
        datasets.insert(
            "observations/count".to_string(),
            ArrayData::from(array![[1u16, 2], [3, 4]].into_dyn()),
        );
        let written = save_extracted(&Extracted::All(datasets), dir.path().join("all")).unwrap();
        assert_eq!(written, dir.path().join("all.npz"));

        let mut npz = NpzReader::new(std::fs::File::open(&written).unwrap()).unwrap();
        assert_eq!(npz.len(), 2);
        // Members are written in path order.
        let action: ArrayD<f64> = npz.by_index(0).unwrap();
        assert_eq!(action, array![1.0, 2.0, 3.0].into_dyn());
    }

    #[test]
    fn test_save_npz_with_strings_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut datasets = BTreeMap::new();
        datasets.insert(
            "action".to_string(),
            ArrayData::from(array![1.0f64].into_dyn()),
        );
        datasets.insert(
            "labels".to_string(),
            ArrayData::Str {
                values: array!["x".to_string()].into_dyn(),
                dtype: DType::FixedString(1),
            },
        );
        let result = save_extracted(&Extracted::All(datasets), dir.path().join("all.npz"));
        assert!(matches!(result, Err(InspectError::UnsupportedSave { .. })));
        assert!(!dir.path().join("all.npz").exists());
    }
}
