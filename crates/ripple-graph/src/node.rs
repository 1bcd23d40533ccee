//! Class nodes and the extractor signals used to classify them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::{classify, NodeFlags};

/// Marker signals reported by the extractor for one class.
///
/// These are facts about the source ("carries `@Entity`"), not judgments.
/// [`ClassNode::new`] turns them into [`NodeFlags`] once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSignals {
    /// The class carries a persistence-entity marker
    pub persistence_entity: bool,
    /// The class carries a configuration marker
    pub configuration: bool,
}

/// A class registered in the dependency graph.
///
/// Identity is the simple class name. Everything else is set at construction
/// and never changes. Relationships live in [`crate::DependencyGraph`], which
/// is the only place they can be read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    name: String,
    locator: PathBuf,
    namespace: String,
    flags: NodeFlags,
}

impl ClassNode {
    /// Create a node, classifying it from its name and signals.
    pub fn new(
        name: impl Into<String>,
        locator: impl Into<PathBuf>,
        namespace: impl Into<String>,
        signals: ClassSignals,
    ) -> Self {
        let name = name.into();
        let flags = classify(&name, signals);
        Self {
            name,
            locator: locator.into(),
            namespace: namespace.into(),
            flags,
        }
    }

    /// Simple class name (node identity).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the source unit that declared this class.
    #[must_use]
    pub fn locator(&self) -> &Path {
        &self.locator
    }

    /// Package the class was declared in (empty for the default package).
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Fully qualified name, `namespace.name` or just `name`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Classification flags computed at construction.
    #[must_use]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// `true` for persistence entities.
    #[must_use]
    pub fn is_data_entity(&self) -> bool {
        self.flags.is_data_entity
    }

    /// `true` for request/response/transfer objects.
    #[must_use]
    pub fn is_data_transfer_object(&self) -> bool {
        self.flags.is_data_transfer_object
    }

    /// `true` for configuration classes.
    #[must_use]
    pub fn is_config(&self) -> bool {
        self.flags.is_config
    }

    /// `true` if the node only carries data (entity or transfer object).
    #[must_use]
    pub fn is_data_carrier(&self) -> bool {
        self.flags.is_data_carrier()
    }
}
