// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The three ways of looking at HDF5 files: exploring one, extracting
//! datasets from one, and comparing the structure of several.
//!
//! Everything is reported as human-readable text to the supplied writer.


use std::{
    collections::{BTreeMap, BTreeSet},
    io::Write,
    path::Path,
};

use tracing::info;

use crate::{
    constants::PREVIEW_FULL_MAX, ArrayData, Container, DType, DatasetNode, Group, InspectError,
    Node, Shape,
};

const RULE_WIDTH: usize = 80;

/// Print the structure of a file, then every dataset's summary statistics.
/// With `verbose`, a sample of each dataset's values is printed too.
///
/// Any dataset that can't be read aborts the whole exploration.
pub fn explore<P: AsRef<Path>, W: Write>(
    file: P,
    verbose: bool,
    out: &mut W,
) -> Result<(), InspectError> {
    let container = Container::open(file)?;
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "{rule}")?;
    writeln!(out, "Reading HDF5 file: {}", container.path().display())?;
    writeln!(out, "{rule}")?;

    writeln!(out, "\nFile Structure:")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    write_group(out, container.root(), "")?;
    for (depth, node) in container.walk() {
        let prefix = "  ".repeat(depth);
        match node {
            Node::Group(g) => write_group(out, g, &prefix)?,
            Node::Dataset(d) => {
                writeln!(out, "{prefix}Dataset: {}", d.path())?;
                writeln!(out, "{prefix}   Shape: {}", d.shape())?;
                writeln!(out, "{prefix}   Dtype: {}", d.dtype())?;
                writeln!(out, "{prefix}   Size: {} elements", d.size())?;
                if !d.attrs().is_empty() {
                    writeln!(out, "{prefix}   Attributes:")?;
                    for (name, value) in d.attrs() {
                        writeln!(out, "{prefix}     - {name}: {value}")?;
                    }
                }
            }
        }
    }

    writeln!(out, "\n{rule}")?;
    writeln!(out, "Detailed Analysis:")?;
    writeln!(out, "{rule}")?;
    for (_, node) in container.walk() {
        match node {
            Node::Group(g) => writeln!(out, "\nGroup: {}", g.path())?,
            Node::Dataset(d) => analyse_dataset(out, d, verbose)?,
        }
    }

    writeln!(out, "\n{rule}")?;
    writeln!(out, "Analysis complete!")?;
    writeln!(out, "{rule}")?;
    Ok(())
}

fn write_group<W: Write>(out: &mut W, group: &Group, prefix: &str) -> std::io::Result<()> {
    writeln!(out, "{prefix}Group: {}", group.path())?;
    writeln!(out, "{prefix}   Keys: {:?}", group.keys())
}

fn analyse_dataset<W: Write>(
    out: &mut W,
    dataset: &DatasetNode,
    verbose: bool,
) -> Result<(), InspectError> {
    writeln!(out, "\nDataset: {}", dataset.path())?;
    writeln!(out, "   Shape: {}, Dtype: {}", dataset.shape(), dataset.dtype())?;

    let data = dataset.read()?;
    if data.is_scalar() {
        writeln!(out, "   Value: {data}")?;
    } else if !data.is_empty() {
        if let Some(s) = data.summary() {
            writeln!(out, "   Min: {:.6}, Max: {:.6}", s.min, s.max)?;
            writeln!(out, "   Mean: {:.6}, Std: {:.6}", s.mean, s.std)?;
        }
        if verbose {
            write_sample(out, &data)?;
        }
    }

    if !dataset.attrs().is_empty() {
        writeln!(out, "   Attributes:")?;
        for (name, value) in dataset.attrs() {
            writeln!(out, "     {name}: {value}")?;
        }
    }
    Ok(())
}

fn write_sample<W: Write>(out: &mut W, data: &ArrayData) -> std::io::Result<()> {
    if data.size() <= PREVIEW_FULL_MAX {
        return writeln!(out, "   Data: {data}");
    }
    writeln!(out, "   First few elements:")?;
    match data.preview() {
        Some(preview) => writeln!(out, "   {preview}"),
        None => writeln!(out, "   Shape: {} (too large to display)", data.shape()),
    }
}

/// What [`extract`] pulled out of a file.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    /// A single dataset.
    Dataset { path: String, data: ArrayData },
    /// Every dataset in the file, keyed by path.
    All(BTreeMap<String, ArrayData>),
}

/// Read a single dataset, or every dataset if `dataset_path` is `None`.
///
/// If the requested dataset doesn't exist, all of the available dataset
/// paths are listed and `Ok(None)` is returned; it's up to the caller to
/// decide whether that's a problem.
pub fn extract<P: AsRef<Path>, W: Write>(
    file: P,
    dataset_path: Option<&str>,
    out: &mut W,
) -> Result<Option<Extracted>, InspectError> {
    let container = Container::open(file)?;

    let wanted = match dataset_path {
        Some(p) => p,
        None => {
            let mut datasets = BTreeMap::new();
            for d in container.datasets() {
                datasets.insert(d.path().to_string(), d.read()?);
            }
            writeln!(out, "Extracted {} datasets", datasets.len())?;
            return Ok(Some(Extracted::All(datasets)));
        }
    };

    match container.dataset(wanted) {
        Ok(d) => {
            let data = d.read()?;
            info!("Extracted '{}'", d.path());
            writeln!(out, "Extracted dataset: {wanted}")?;
            writeln!(out, "Shape: {}, Dtype: {}", data.shape(), d.dtype())?;
            Ok(Some(Extracted::Dataset {
                path: d.path().to_string(),
                data,
            }))
        }

        Err(InspectError::DatasetNotFound(_)) => {
            writeln!(out, "Dataset {wanted} not found!")?;
            writeln!(out, "Available datasets:")?;
            for path in container.dataset_paths() {
                writeln!(out, "  - {path}")?;
            }
            Ok(None)
        }

        Err(e) => Err(e),
    }
}

/// The dataset layout of one file.
#[derive(Debug, Clone)]
pub struct FileStructure {
    /// The file name, without any directories.
    pub name: String,
    /// Dataset path -> (shape, dtype).
    pub datasets: BTreeMap<String, (Shape, DType)>,
}

impl FileStructure {
    /// Open a file and record the shape and type of every dataset. Dataset
    /// contents aren't read. The file is closed before returning.
    pub fn load<P: AsRef<Path>>(file: P) -> Result<Self, InspectError> {
        let container = Container::open(&file)?;
        let name = file
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.as_ref().display().to_string());
        let datasets = container
            .datasets()
            .map(|d| (d.path().to_string(), (d.shape().clone(), d.dtype())))
            .collect();
        Ok(Self { name, datasets })
    }
}

/// The dataset layouts of several files, side by side.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub files: Vec<FileStructure>,
}

impl Comparison {
    /// Every dataset path in any of the files, sorted.
    pub fn paths(&self) -> BTreeSet<&str> {
        self.files
            .iter()
            .flat_map(|f| f.datasets.keys().map(String::as_str))
            .collect()
    }

    /// For a dataset path, what each file has there (in file order).
    pub fn row(&self, path: &str) -> Vec<Option<&(Shape, DType)>> {
        self.files.iter().map(|f| f.datasets.get(path)).collect()
    }
}

/// Load the structure of each file in turn, then print one block per
/// dataset path showing what each file has there, or that it's missing.
pub fn compare<P: AsRef<Path>, W: Write>(
    files: &[P],
    out: &mut W,
) -> Result<Comparison, InspectError> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}")?;
    writeln!(out, "Comparing multiple HDF5 files:")?;
    writeln!(out, "{rule}")?;

    let mut structures = Vec::with_capacity(files.len());
    for file in files {
        writeln!(out, "\nLoading: {}", file.as_ref().display())?;
        structures.push(FileStructure::load(file)?);
    }
    let comparison = Comparison { files: structures };

    writeln!(out, "\nStructure comparison:")?;
    for path in comparison.paths() {
        writeln!(out, "\n  Dataset: {path}")?;
        for (file, entry) in comparison.files.iter().zip(comparison.row(path)) {
            match entry {
                Some((shape, dtype)) => {
                    writeln!(out, "    {}: shape={shape}, dtype={dtype}", file.name)?
                }
                None => writeln!(out, "    {}: MISSING", file.name)?,
            }
        }
    }
    Ok(comparison)
}
