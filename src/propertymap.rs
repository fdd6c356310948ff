//! Ordered, grouped registry of declared properties.

use std::sync::Arc;

use crate::error::ConfigError;
use crate::property::{AnyProperty, Property, PropertyValue};

/// A registered property together with the comment lines attached to its
/// path.
pub struct PropertyEntry {
    property: Arc<dyn AnyProperty>,
    comments: Vec<String>,
}

impl PropertyEntry {
    pub fn property(&self) -> &dyn AnyProperty {
        self.property.as_ref()
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }
}

pub(crate) enum MapNode {
    Group(Vec<(String, MapNode)>),
    Entry(PropertyEntry),
}

/// Registry of properties that iterates grouped by path prefix.
///
/// Entries are kept in a tree of ordered children, one level per path
/// segment. Each node preserves its own insertion order, so iteration is a
/// depth-first walk that (a) respects first-insertion order at every
/// prefix level and (b) keeps siblings of a prefix contiguous even when
/// unrelated properties were registered in between. Adding
/// `DataSource.host`, `security.mode`, `DataSource.port` iterates as
/// `DataSource.host`, `DataSource.port`, `security.mode`.
#[derive(Default)]
pub struct PropertyMap {
    root: Vec<(String, MapNode)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a property with its comment lines.
    ///
    /// Fails with [`ConfigError::DuplicatePath`] when anything already
    /// exists at the property's path, and with
    /// [`ConfigError::StructuralConflict`] when a prefix of the path was
    /// previously registered as a property itself.
    pub fn add<T: PropertyValue>(
        &mut self,
        property: &Property<T>,
        comments: &[&str],
    ) -> Result<(), ConfigError> {
        let path = property.path().to_string();
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();

        let mut children = &mut self.root;
        for (depth, segment) in segments[..segments.len() - 1].iter().enumerate() {
            let position = children.iter().position(|(name, _)| name == segment);
            let index = match position {
                Some(index) => match children[index].1 {
                    MapNode::Group(_) => index,
                    MapNode::Entry(_) => {
                        return Err(ConfigError::StructuralConflict {
                            path,
                            prefix: segments[..=depth].join("."),
                        });
                    }
                },
                None => {
                    children.push((segment.to_string(), MapNode::Group(Vec::new())));
                    children.len() - 1
                }
            };
            children = match &mut children[index].1 {
                MapNode::Group(grandchildren) => grandchildren,
                MapNode::Entry(_) => unreachable!("checked above"),
            };
        }

        let last = segments.last().expect("path has at least one segment");
        if children.iter().any(|(name, _)| name == last) {
            return Err(ConfigError::DuplicatePath(path));
        }
        children.push((
            last.clone(),
            MapNode::Entry(PropertyEntry {
                property: Arc::new(property.clone()),
                comments: comments.iter().map(|c| c.to_string()).collect(),
            }),
        ));
        Ok(())
    }

    /// All registered entries, depth-first in grouped insertion order.
    pub fn entries(&self) -> Vec<&PropertyEntry> {
        let mut result = Vec::new();
        collect_entries(&self.root, &mut result);
        result
    }

    pub(crate) fn children(&self) -> &[(String, MapNode)] {
        &self.root
    }
}

fn collect_entries<'a>(children: &'a [(String, MapNode)], result: &mut Vec<&'a PropertyEntry>) {
    for (_, node) in children {
        match node {
            MapNode::Group(grandchildren) => collect_entries(grandchildren, result),
            MapNode::Entry(entry) => result.push(entry),
        }
    }
}
