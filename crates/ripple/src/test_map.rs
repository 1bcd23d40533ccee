//! Mapping of production classes to the tests that cover them.
//!
//! A test class `FooTest` covers `Foo` when it is annotated `@SpringBootTest`
//! or declares at least one `@Test` method. The test id is the
//! package-qualified test class name.

use std::collections::HashMap;
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::extract::{self, JavaUnit};

const TEST_SUFFIX: &str = "Test";
const SPRING_BOOT_TEST: &str = "SpringBootTest";

/// Test mapping plus the files that could not be read.
#[derive(Debug, Default, Clone)]
pub struct TestDiscovery {
    /// Source class simple name → test id
    pub tests: HashMap<String, String>,
    /// Test files skipped because of extraction errors
    pub failures: Vec<ExtractError>,
}

/// Source class and test id for a unit that qualifies as a test.
#[must_use]
pub fn test_target(unit: &JavaUnit) -> Option<(String, String)> {
    let source = unit.type_name.strip_suffix(TEST_SUFFIX)?;
    if source.is_empty() {
        return None;
    }
    if !(unit.has_annotation(SPRING_BOOT_TEST) || unit.has_test_method) {
        return None;
    }
    Some((source.to_string(), unit.qualified_name()))
}

/// Build the class → test map from already extracted test units.
///
/// Units are visited in the given order; the first test registered for a
/// source class is kept.
#[must_use]
pub fn map_tests<'a>(units: impl IntoIterator<Item = &'a JavaUnit>) -> HashMap<String, String> {
    let mut tests = HashMap::new();
    for unit in units {
        let Some((source, test_id)) = test_target(unit) else {
            continue;
        };
        match tests.get(&source) {
            Some(existing) => {
                warn!(
                    class = %source,
                    kept = %existing,
                    ignored = %test_id,
                    "Several tests target the same class, keeping the first"
                );
            }
            None => {
                debug!(class = %source, test = %test_id, "Mapped test");
                tests.insert(source, test_id);
            }
        }
    }
    tests
}

/// Extract every test file and build the class → test map.
///
/// `files` should be sorted so that duplicate resolution is stable.
#[must_use]
pub fn discover_tests(files: &[PathBuf]) -> TestDiscovery {
    let parsed: Vec<_> = files.par_iter().map(|file| extract::parse_file(file)).collect();

    let mut units = Vec::new();
    let mut failures = Vec::new();

    for result in parsed {
        match result {
            Ok(Some(unit)) => units.push(unit),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Skipping test file");
                failures.push(e);
            }
        }
    }

    let tests = map_tests(&units);
    debug!(mapped = tests.len(), files = files.len(), "Test discovery finished");
    TestDiscovery { tests, failures }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn unit(name: &str, annotations: &[&str], has_test_method: bool) -> JavaUnit {
        JavaUnit {
            path: PathBuf::from(format!("{name}.java")),
            package: Some("com.shop".to_string()),
            type_name: name.to_string(),
            annotations: annotations.iter().map(ToString::to_string).collect(),
            imports: Vec::new(),
            fields: Vec::new(),
            constructor_param_types: Vec::new(),
            has_test_method,
        }
    }

    #[rstest]
    #[case::test_method("OrderServiceTest", &[], true, Some("OrderService"))]
    #[case::spring_boot("OrderControllerTest", &["SpringBootTest"], false, Some("OrderController"))]
    #[case::no_marker("OrderServiceTest", &[], false, None)]
    #[case::wrong_suffix("OrderServiceTests", &[], true, None)]
    #[case::bare_suffix("Test", &[], true, None)]
    fn qualifies_test_classes(
        #[case] name: &str,
        #[case] annotations: &[&str],
        #[case] has_test_method: bool,
        #[case] expected: Option<&str>,
    ) {
        let target = test_target(&unit(name, annotations, has_test_method));
        assert_eq!(target.as_ref().map(|(source, _)| source.as_str()), expected);
    }

    #[test]
    fn test_id_is_package_qualified() {
        let (_, id) = test_target(&unit("OrderServiceTest", &[], true)).unwrap();
        assert_eq!(id, "com.shop.OrderServiceTest");
    }

    #[test]
    fn first_test_for_a_class_is_kept() {
        let mut second = unit("OrderServiceTest", &[], true);
        second.package = Some("com.shop.legacy".to_string());
        let units = [unit("OrderServiceTest", &[], true), second];

        let tests = map_tests(&units);

        assert_eq!(tests.len(), 1);
        assert_eq!(tests["OrderService"], "com.shop.OrderServiceTest");
    }
}
