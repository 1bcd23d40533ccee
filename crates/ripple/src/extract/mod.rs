//! Per-file extraction of Java compilation units.
//!
//! Each source file is parsed with tree-sitter and reduced to a [`JavaUnit`]:
//! the facts about its first top-level type that dependency discovery and
//! test discovery need. Files are independent, so extraction runs on any
//! thread and returns owned data.
//!
//! ## Referenced symbols
//!
//! A unit references another class when
//!
//! - it imports it from the configured base package,
//! - it has a field of that type annotated `@Autowired` or `@Inject`,
//! - a constructor (or record header) takes a parameter of that type,
//! - it is annotated `@AllArgsConstructor` and has a field of that type, or
//!   `@RequiredArgsConstructor` and has a `final` field of that type.
//!
//! References are simple names. Names that do not match a registered class
//! are dropped later when the graph is built.

pub mod java;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ripple_graph::ClassSignals;

use crate::error::ExtractError;

/// Field annotations that mark dependency injection.
const INJECTION_ANNOTATIONS: &[&str] = &["Autowired", "Inject"];

/// A field declaration of the first top-level type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldInfo {
    /// Annotation simple names
    pub annotations: Vec<String>,
    /// Declared `final`
    pub is_final: bool,
    /// Every type name mentioned by the declared type
    pub type_names: Vec<String>,
}

impl FieldInfo {
    /// Whether the field is injected by the container.
    #[must_use]
    pub fn is_injected(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| INJECTION_ANNOTATIONS.contains(&a.as_str()))
    }
}

/// Facts extracted from one `.java` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaUnit {
    /// Source file
    pub path: PathBuf,
    /// Package declaration, if any
    pub package: Option<String>,
    /// Simple name of the first top-level type
    pub type_name: String,
    /// Annotation simple names on that type
    pub annotations: Vec<String>,
    /// Non-static, non-wildcard import paths
    pub imports: Vec<String>,
    /// Field declarations of the type
    pub fields: Vec<FieldInfo>,
    /// Type names of constructor and record parameters
    pub constructor_param_types: Vec<String>,
    /// Some method is annotated `@Test`
    pub has_test_method: bool,
}

impl JavaUnit {
    /// Whether the type carries the given annotation.
    #[must_use]
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }

    /// Package-qualified type name, or the bare name without a package.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.package {
            Some(package) => format!("{package}.{}", self.type_name),
            None => self.type_name.clone(),
        }
    }

    /// Classification signals for the graph node.
    #[must_use]
    pub fn signals(&self) -> ClassSignals {
        ClassSignals {
            persistence_entity: self.has_annotation("Entity"),
            configuration: self.has_annotation("Configuration"),
        }
    }

    /// Simple names this unit depends on, sorted.
    ///
    /// Self-references are kept; the graph accepts self-edges.
    #[must_use]
    pub fn referenced_symbols(&self, base_package: &str) -> BTreeSet<String> {
        let mut symbols = BTreeSet::new();

        for import in &self.imports {
            if import.starts_with(base_package) {
                if let Some(simple) = import.rsplit('.').next() {
                    symbols.insert(simple.to_string());
                }
            }
        }

        for field in self.fields.iter().filter(|f| f.is_injected()) {
            symbols.extend(field.type_names.iter().cloned());
        }

        symbols.extend(self.constructor_param_types.iter().cloned());

        if self.has_annotation("AllArgsConstructor") {
            for field in &self.fields {
                symbols.extend(field.type_names.iter().cloned());
            }
        } else if self.has_annotation("RequiredArgsConstructor") {
            for field in self.fields.iter().filter(|f| f.is_final) {
                symbols.extend(field.type_names.iter().cloned());
            }
        }

        symbols
    }
}

/// Read and extract one file.
///
/// Returns `Ok(None)` for a file without any type declaration.
///
/// # Errors
///
/// Returns an [`ExtractError`] when the file cannot be read, is not UTF-8, or
/// contains syntax errors.
pub fn parse_file(path: &Path) -> Result<Option<JavaUnit>, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractError::io_error(path.to_path_buf(), &e))?;
    let content =
        String::from_utf8(bytes).map_err(|_| ExtractError::encoding_error(path.to_path_buf()))?;
    java::extract_unit(path, &content)
}
