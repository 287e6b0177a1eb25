// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! HDF5 files written on the fly for tests.

use std::path::{Path, PathBuf};

use hdf5::types::{FixedAscii, FixedUnicode, VarLenAscii, VarLenUnicode};
use ndarray::prelude::*;
use tempfile::TempDir;

/// Every dataset path in the file written by [`episode`].
pub(crate) const EPISODE_DATASETS: [&str; 10] = [
    "action",
    "camera_names",
    "caption",
    "empty",
    "labels",
    "matrix",
    "note",
    "observations/images/top",
    "observations/qpos",
    "step",
];

/// Write a small robot-episode-like file into a fresh temporary directory.
///
/// ```text
/// /action                   float32 (4,)        [1, 2, 3, 4]
/// /camera_names             |S10    (3,)        [left, right, top]
/// /caption                  |S16    ()          grasp (fixed-length UTF-8)
/// /empty                    float64 (0,)
/// /labels                   object  (2,)        [pick, place] (variable-length UTF-8)
/// /matrix                   int32   (4, 3)      1..=12
/// /note                     object  ()          ok (variable-length ASCII)
/// /observations/images/top  uint8   (2, 3, 4, 3)
/// /observations/qpos        float64 (25,)       0..25, attrs scale=1.5, units="rad"
/// /step                     int64   ()          7
/// ```
///
/// The directory must be kept alive for as long as the file is used.
pub(crate) fn episode() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("episode_0.hdf5");
    write_episode(&path).unwrap();
    (dir, path)
}

fn write_episode(path: &Path) -> hdf5::Result<()> {
    let file = hdf5::File::create(path)?;

    write_array(&file, "action", &array![1.0f32, 2.0, 3.0, 4.0])?;
    let camera_names = ["left", "right", "top"]
        .iter()
        .map(|s| FixedAscii::<10>::from_ascii(s.as_bytes()).unwrap())
        .collect::<Array1<_>>();
    write_array(&file, "camera_names", &camera_names)?;
    let caption: FixedUnicode<16> = "grasp".parse().unwrap();
    file.new_dataset::<FixedUnicode<16>>()
        .shape(())
        .create("caption")?
        .write_scalar(&caption)?;
    let no_elements: &[usize] = &[0];
    file.new_dataset::<f64>().shape(no_elements).create("empty")?;
    let labels = ["pick", "place"]
        .iter()
        .map(|s| s.parse::<VarLenUnicode>().unwrap())
        .collect::<Array1<_>>();
    write_array(&file, "labels", &labels)?;
    let note = VarLenAscii::from_ascii("ok").unwrap();
    file.new_dataset::<VarLenAscii>()
        .shape(())
        .create("note")?
        .write_scalar(&note)?;

    write_array(
        &file,
        "matrix",
        &Array1::from_iter(1..=12i32).into_shape_with_order((4, 3)).unwrap(),
    )?;

    let obs = file.create_group("observations")?;
    let images = obs.create_group("images")?;
    write_array(
        &images,
        "top",
        &Array4::from_shape_fn((2, 3, 4, 3), |(i, j, k, l)| (i + j + k + l) as u8),
    )?;
    let qpos = write_array(&obs, "qpos", &Array1::from_iter((0..25).map(f64::from)))?;
    qpos.new_attr::<f64>().create("scale")?.write_scalar(&1.5)?;
    let units: VarLenUnicode = "rad".parse().unwrap();
    qpos.new_attr::<VarLenUnicode>()
        .create("units")?
        .write_scalar(&units)?;

    let step = file.new_dataset::<i64>().shape(()).create("step")?;
    step.write_scalar(&7i64)?;
    Ok(())
}

/// Every dataset in the file written by [`linked`], each reachable by only
/// one path once links are accounted for.
pub(crate) const LINKED_DATASETS: [&str; 2] = ["action", "observations/qpos"];

/// Write a file whose links would make a naive walk loop or repeat itself.
///
/// ```text
/// /action                 float32 (2,)
/// /observations/back      hard link to /
/// /observations/dangling  soft link to /nowhere
/// /observations/qpos      float64 (3,)
/// /observations/up        soft link to /
/// /zz_action              hard link to /action
/// /zz_observations        hard link to /observations
/// ```
pub(crate) fn linked() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("linked.hdf5");
    write_linked(&path).unwrap();
    (dir, path)
}

fn write_linked(path: &Path) -> hdf5::Result<()> {
    let file = hdf5::File::create(path)?;
    write_array(&file, "action", &array![0.5f32, 1.5])?;
    let obs = file.create_group("observations")?;
    write_array(&obs, "qpos", &array![1.0, 2.0, 3.0])?;

    file.link_hard("/", "observations/back")?;
    file.link_soft("/nowhere", "observations/dangling")?;
    file.link_soft("/", "observations/up")?;
    file.link_hard("/action", "zz_action")?;
    file.link_hard("/observations", "zz_observations")?;
    Ok(())
}

/// Write a file holding only 1-D float64 datasets of the given lengths.
pub(crate) fn write_flat(path: &Path, datasets: &[(&str, usize)]) -> hdf5::Result<()> {
    let file = hdf5::File::create(path)?;
    for &(name, len) in datasets {
        write_array(&file, name, &Array1::from_iter((0..len).map(|i| i as f64)))?;
    }
    Ok(())
}

fn write_array<T: hdf5::H5Type, D: Dimension>(
    group: &hdf5::Group,
    name: &str,
    array: &Array<T, D>,
) -> hdf5::Result<hdf5::Dataset> {
    let dataset = group
        .new_dataset::<T>()
        .shape(array.shape())
        .create(name)?;
    dataset.write(array)?;
    Ok(dataset)
}
