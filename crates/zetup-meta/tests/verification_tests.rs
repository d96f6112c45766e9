//! Requirement verification against stubbed module probes.

use rstest::rstest;
use zetup_meta::{Error, ModuleProbe, ModuleVersionLookup, RequirementSet, StaticModules, Strictness};

fn pkg_requirements() -> RequirementSet {
    RequirementSet::from_text("pkg>=1.0,<2.0 # pkgmod").unwrap()
}

#[test]
fn test_matching_stub_passes() {
    let modules = StaticModules::new().with_module("pkgmod", "1.5");
    assert!(pkg_requirements().verify_all(&modules, Strictness::Strict).unwrap());
}

#[test]
fn test_out_of_range_stub_is_version_conflict() {
    let modules = StaticModules::new().with_module("pkgmod", "2.0");
    let err = pkg_requirements()
        .verify_all(&modules, Strictness::Strict)
        .unwrap_err();

    match err {
        Error::VersionConflict {
            subject,
            expected,
            found,
        } => {
            assert_eq!(subject, "pkg");
            assert_eq!(expected, "pkg>=1.0,<2.0");
            assert_eq!(found, "2.0");
        }
        other => panic!("expected VersionConflict, got {other:?}"),
    }
}

#[test]
fn test_missing_stub_is_distribution_not_found() {
    let mut modules = StaticModules::new().with_module("pkgmod", "1.5");
    modules.remove("pkgmod");

    let err = pkg_requirements()
        .verify_all(&modules, Strictness::Strict)
        .unwrap_err();
    assert!(matches!(err, Error::DistributionNotFound { ref requirement } if requirement == "pkg>=1.0,<2.0"));
    assert!(err.is_verification_failure());
}

#[rstest]
#[case(StaticModules::new().with_module("pkgmod", "2.0"))]
#[case(StaticModules::new())]
fn test_lenient_failures_return_false(#[case] modules: StaticModules) {
    assert!(!pkg_requirements().verify_all(&modules, Strictness::Lenient).unwrap());
}

#[rstest]
#[case(Strictness::Strict)]
#[case(Strictness::Lenient)]
fn test_missing_version_attribute_is_always_an_error(#[case] strictness: Strictness) {
    let modules = StaticModules::new().with_unversioned("pkgmod");
    let err = pkg_requirements().verify_all(&modules, strictness).unwrap_err();
    assert!(matches!(err, Error::MissingVersionAttribute { module } if module == "pkgmod"));
}

/// Records every module it was asked about.
struct Recording {
    inner: StaticModules,
    asked: std::cell::RefCell<Vec<String>>,
}

impl ModuleVersionLookup for Recording {
    fn module_version(&self, module: &str) -> zetup_meta::Result<ModuleProbe> {
        self.asked.borrow_mut().push(module.to_string());
        self.inner.module_version(module)
    }
}

#[test]
fn test_first_failure_in_source_order_is_reported() {
    let set = RequirementSet::from_text("alpha>=1\nbeta>=1\ngamma>=1").unwrap();
    let probe = Recording {
        inner: StaticModules::new()
            .with_module("alpha", "1.0")
            .with_module("gamma", "0.1"),
        asked: Default::default(),
    };

    let err = set.verify_all(&probe, Strictness::Strict).unwrap_err();
    assert!(matches!(err, Error::DistributionNotFound { requirement } if requirement == "beta>=1"));
    assert_eq!(*probe.asked.borrow(), ["alpha", "beta"]);
}

#[test]
fn test_empty_set_verifies() {
    assert!(RequirementSet::new()
        .verify_all(&StaticModules::new(), Strictness::Strict)
        .unwrap());
}
