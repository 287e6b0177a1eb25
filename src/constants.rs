// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.
 */

/// Content with at most this many elements is printed in full in verbose
/// mode.
pub(crate) const PREVIEW_FULL_MAX: usize = 20;
/// 1-D preview: the first 10 elements.
pub(crate) const PREVIEW_1D_ELEMENTS: usize = 10;
/// 2-D preview: the first 3 rows (all columns).
pub(crate) const PREVIEW_2D_ROWS: usize = 3;
/// 3-D preview: the first 2x2 along the first two axes (all of the third).
pub(crate) const PREVIEW_3D_SLICE: [usize; 2] = [2, 2];

/// Fixed-length strings are converted into buffers of this many bytes when
/// read. Longer strings are truncated.
pub(crate) const FIXED_STRING_BUF: usize = 1024;

/// The environment variable that can supply the file to inspect.
pub const FILE_ENV_VAR: &str = "H5INSPECT_FILE";
