// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Errors associated with all aspects of h5inspect.
 */

use thiserror::Error;

use crate::types::DType;

#[derive(Error, Debug)]
pub enum InspectError {
    /// The container couldn't be opened at all.
    #[error("Couldn't open '{path}': {source}")]
    FileAccess {
        path: String,
        #[source]
        source: FileAccessError,
    },

    /// A requested path doesn't name a dataset in the container.
    #[error("Dataset '{0}' not found")]
    DatasetNotFound(String),

    #[error("Can't save '{name}' with dtype {dtype}; only numeric and boolean arrays can be written to .npy")]
    UnsupportedSave { name: String, dtype: DType },

    /// An error associated with the hdf5 crate.
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),

    #[error("Couldn't write .npy file: {0}")]
    WriteNpy(#[from] ndarray_npy::WriteNpyError),

    #[error("Couldn't write .npz file: {0}")]
    WriteNpz(#[from] ndarray_npy::WriteNpzError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum FileAccessError {
    #[error("the file doesn't exist")]
    DoesntExist,

    /// libhdf5 refused the file, e.g. it isn't HDF5 or isn't readable.
    #[error("{0}")]
    Hdf5(#[from] hdf5::Error),
}
