// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Inspect the structure and contents of HDF5 files.
 */

mod constants;
pub mod container;
pub mod data;
pub mod error;
pub mod inspect;
pub mod save;
#[cfg(test)]
mod test_files;
pub mod types;

pub use constants::FILE_ENV_VAR;
pub use container::{Container, DatasetNode, Group, Node};
pub use data::{ArrayData, Summary};
pub use error::{FileAccessError, InspectError};
pub use inspect::{compare, explore, extract, Comparison, Extracted, FileStructure};
pub use save::save_extracted;
pub use types::{DType, Shape};
