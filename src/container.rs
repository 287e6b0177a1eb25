// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Code to open an HDF5 file and load its tree of groups and datasets.
 */

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{ArrayData, DType, FileAccessError, InspectError, Shape};

/// An open HDF5 file and the tree of nodes inside it.
///
/// The file stays open for as long as this struct lives; dropping it closes
/// the file, however the caller leaves the scope.
pub struct Container {
    path: PathBuf,
    root: Group,
    /// Declared after `root` so that the dataset handles are released before
    /// the file.
    _h5: hdf5::File,
}

/// A node in the tree. Datasets are always leaves.
pub enum Node {
    Group(Group),
    Dataset(DatasetNode),
}

pub struct Group {
    /// Empty for the root group.
    path: String,
    /// In the order libhdf5 lists them.
    children: Vec<Node>,
}

pub struct DatasetNode {
    path: String,
    shape: Shape,
    dtype: DType,
    attrs: Vec<(String, ArrayData)>,
    dataset: hdf5::Dataset,
}

impl Container {
    /// Given the path to an HDF5 file, open it and load its structure.
    /// Dataset contents are only read when asked for.
    pub fn open<T: AsRef<Path>>(file: T) -> Result<Self, InspectError> {
        // so that libhdf5 doesn't print errors to stdout
        hdf5::silence_errors(true);

        let path = file.as_ref();
        // If the file doesn't exist, hdf5::File::open will handle it, but the
        // error message is horrendous.
        if !path.exists() {
            return Err(InspectError::FileAccess {
                path: path.display().to_string(),
                source: FileAccessError::DoesntExist,
            });
        }
        let h5 = hdf5::File::open(path).map_err(|e| InspectError::FileAccess {
            path: path.display().to_string(),
            source: e.into(),
        })?;
        info!("Opened '{}'", path.display());

        let mut seen = Visited::default();
        seen.first_visit(&h5)?;
        let root = Group::load(&h5, String::new(), &mut seen)?;
        Ok(Self {
            path: path.to_path_buf(),
            root,
            _h5: h5,
        })
    }

    /// The filesystem path this container was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    /// Every node below the root, depth first, in store order.
    pub fn walk(&self) -> Walk<'_> {
        self.root.walk()
    }

    /// Every dataset in the file, depth first.
    pub fn datasets(&self) -> impl Iterator<Item = &DatasetNode> {
        self.walk().filter_map(|(_, node)| match node {
            Node::Dataset(d) => Some(d),
            Node::Group(_) => None,
        })
    }

    pub fn dataset_paths(&self) -> Vec<&str> {
        self.datasets().map(|d| d.path()).collect()
    }

    /// Look up a node by its path. Leading and trailing slashes are ignored,
    /// so "/observations/qpos" and "observations/qpos" are the same node.
    /// The root isn't a [`Node`]; use [`Container::root`] for it.
    pub fn find(&self, path: &str) -> Option<&Node> {
        let mut keys = path.split('/').filter(|k| !k.is_empty());
        let first = keys.next()?;
        let mut node = self.root.child(first)?;
        for key in keys {
            match node {
                Node::Group(g) => node = g.child(key)?,
                Node::Dataset(_) => return None,
            }
        }
        Some(node)
    }

    /// Look up a dataset by its path. Groups don't count.
    pub fn dataset(&self, path: &str) -> Result<&DatasetNode, InspectError> {
        match self.find(path) {
            Some(Node::Dataset(d)) => Ok(d),
            _ => Err(InspectError::DatasetNotFound(path.to_string())),
        }
    }
}

impl Node {
    pub fn path(&self) -> &str {
        match self {
            Node::Group(g) => g.path(),
            Node::Dataset(d) => d.path(),
        }
    }

    /// The last key of the path.
    pub fn name(&self) -> &str {
        let path = self.path();
        path.rsplit('/').next().unwrap_or(path)
    }
}

impl Group {
    /// Soft and external links aren't followed, and an object reachable
    /// through more than one hard link is only loaded under the first path
    /// that reaches it. Every object therefore appears once, and link cycles
    /// end.
    fn load(h5: &hdf5::Group, path: String, seen: &mut Visited) -> Result<Self, InspectError> {
        let links = h5.iter_visit_default(Vec::<(String, bool)>::new(), |_, name, info, links| {
            links.push((name.to_owned(), matches!(info.link_type, hdf5::LinkType::Hard)));
            true
        })?;

        let mut children = vec![];
        for (name, is_hard) in links {
            let child_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{path}/{name}")
            };
            if !is_hard {
                debug!("Not following link '{child_path}'");
                continue;
            }
            if let Ok(group) = h5.group(&name) {
                if !seen.first_visit(&group)? {
                    debug!("Already loaded the group at '{child_path}'");
                    continue;
                }
                debug!("Loading group '{child_path}'");
                children.push(Node::Group(Group::load(&group, child_path, seen)?));
            } else if let Ok(dataset) = h5.dataset(&name) {
                if !seen.first_visit(&dataset)? {
                    debug!("Already loaded the dataset at '{child_path}'");
                    continue;
                }
                debug!("Loading dataset '{child_path}'");
                children.push(Node::Dataset(DatasetNode::load(dataset, child_path)?));
            } else {
                // Named datatypes.
                warn!("Skipping '{child_path}'; it is neither a group nor a dataset");
            }
        }
        Ok(Self { path, children })
    }

    /// "/" for the root group.
    pub fn path(&self) -> &str {
        if self.path.is_empty() {
            "/"
        } else {
            &self.path
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The keys of the immediate children, in store order.
    pub fn keys(&self) -> Vec<&str> {
        self.children.iter().map(Node::name).collect()
    }

    fn child(&self, key: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name() == key)
    }

    /// Every node below this group, depth first. Children of this group are
    /// at depth 1.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.children.iter().rev().map(|c| (1, c)).collect(),
        }
    }
}

impl DatasetNode {
    fn load(dataset: hdf5::Dataset, path: String) -> Result<Self, InspectError> {
        let shape = Shape(dataset.shape());
        let dtype = match dataset.dtype()?.to_descriptor() {
            Ok(desc) => DType::from(&desc),
            Err(e) => {
                debug!("Couldn't describe the type of '{path}': {e}");
                DType::Other
            }
        };
        let mut attrs = vec![];
        for name in dataset.attr_names()? {
            let attr = dataset.attr(&name)?;
            attrs.push((name, ArrayData::read(&attr)?));
        }
        Ok(Self {
            path,
            shape,
            dtype,
            attrs,
            dataset,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// The total number of elements.
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    pub fn attrs(&self) -> &[(String, ArrayData)] {
        &self.attrs
    }

    /// Read the whole dataset into memory.
    pub fn read(&self) -> Result<ArrayData, InspectError> {
        debug!("Reading '{}'", self.path);
        Ok(ArrayData::read(&self.dataset)?)
    }
}

/// The objects loaded so far, by their location in the file.
#[derive(Default)]
struct Visited(Vec<hdf5::LocationToken>);

impl Visited {
    /// Record an object. `false` if it had already been recorded.
    fn first_visit(&mut self, obj: &hdf5::Location) -> Result<bool, InspectError> {
        let token = obj.loc_info()?.token;
        if self.0.contains(&token) {
            return Ok(false);
        }
        self.0.push(token);
        Ok(true)
    }
}

/// Pre-order depth-first iterator over a [`Group`]'s descendants, yielding
/// each node with its depth.
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        if let Node::Group(g) = node {
            self.stack
                .extend(g.children.iter().rev().map(|c| (depth + 1, c)));
        }
        Some((depth, node))
    }
}
