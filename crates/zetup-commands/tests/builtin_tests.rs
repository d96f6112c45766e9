use std::rc::Rc;

use pretty_assertions::assert_eq;
use zetup_commands::{
    CommandResolver, INSTANCE_COMMANDS, LIBRARY_COMMANDS, instance_commands, is_static_command, library_commands,
};
use zetup_meta::{Project, PythonInterpreter};
use zetup_test_utils::project::TestProject;

fn run(resolver: &CommandResolver, token: &str) -> (i32, String, String) {
    let mut out = Vec::<u8>::new();
    let mut err = Vec::<u8>::new();
    let code = resolver.dispatch(token, &mut out, &mut err).unwrap();
    (code, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

fn instance_resolver(fixture: &TestProject) -> CommandResolver {
    let project = Rc::new(Project::load(fixture.root()).unwrap());
    CommandResolver::new().with(instance_commands(project))
}

#[test]
fn test_instance_commands_print_project_views() {
    let fixture = TestProject::minimal()
        .with_requirements("PyYAML>=3.10 # yaml\nsix\n")
        .with_extra("test", "pytest\n");
    let resolver = instance_resolver(&fixture);

    assert_eq!(run(&resolver, "requirements"), (0, "PyYAML>=3.10 # yaml\nsix # six\n".into(), String::new()));
    assert_eq!(run(&resolver, "extras").1, "[test]\npytest # pytest\n");
    assert_eq!(run(&resolver, "version").1, "1.0\n");
    assert_eq!(run(&resolver, "keywords").1, "demo testing python3\n");
    assert_eq!(
        run(&resolver, "data").1,
        "zetup.toml\nVERSION\nrequirements.txt\nrequirements.test.txt\n"
    );
    assert!(run(&resolver, "classifiers").1.ends_with("Programming Language :: Python :: 3.4\n"));
}

#[test]
fn test_empty_requirements_print_nothing() {
    let fixture = TestProject::minimal();
    let resolver = instance_resolver(&fixture);
    assert_eq!(run(&resolver, "requirements"), (0, String::new(), String::new()));
}

#[test]
fn test_static_command_names_match_tables() {
    let fixture = TestProject::minimal();
    let project = Rc::new(Project::load(fixture.root()).unwrap());
    let python = Rc::new(PythonInterpreter::new("python3"));

    let resolver = CommandResolver::new().with(library_commands(Rc::clone(&project), python));
    assert_eq!(resolver.vocabulary(), LIBRARY_COMMANDS);
    assert_eq!(instance_resolver(&fixture).vocabulary(), INSTANCE_COMMANDS);

    assert!(is_static_command("verify"));
    assert!(is_static_command("sdist"));
    assert!(!is_static_command("frobnicate"));
}

#[cfg(unix)]
mod with_interpreter {
    use super::*;
    use pretty_assertions::assert_eq;
    use zetup_test_utils::script::fake_python;

    fn library_resolver(fixture: &TestProject, modules: &[(&str, Option<&str>)]) -> CommandResolver {
        let python = fake_python(fixture.root(), modules, 0);
        let project = Rc::new(Project::load(fixture.root()).unwrap());
        CommandResolver::new().with(library_commands(project, Rc::new(PythonInterpreter::new(python))))
    }

    #[test]
    fn test_verify_success() {
        let fixture = TestProject::minimal().with_requirements("pkg>=1.0,<2.0 # pkgmod\n");
        let resolver = library_resolver(&fixture, &[("pkgmod", Some("1.5"))]);

        let (code, out, err) = run(&resolver, "verify");
        assert_eq!(code, 0);
        assert_eq!(out, "All 1 requirements of demo are satisfied\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_verify_conflict_is_command_error() {
        let fixture = TestProject::minimal().with_requirements("pkg>=1.0,<2.0 # pkgmod\n");
        let resolver = library_resolver(&fixture, &[("pkgmod", Some("2.0"))]);

        let (code, out, err) = run(&resolver, "verify");
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert_eq!(err, "Error: Version conflict for pkg: need pkg>=1.0,<2.0, found 2.0\n");
    }

    #[test]
    fn test_verify_missing_version_attribute_propagates() {
        let fixture = TestProject::minimal().with_requirements("pkg # pkgmod\n");
        let resolver = library_resolver(&fixture, &[("pkgmod", None)]);

        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        let result = resolver.dispatch("verify", &mut out, &mut err);
        assert!(matches!(
            result,
            Err(zetup_commands::Error::Meta(zetup_meta::Error::MissingVersionAttribute { .. }))
        ));
    }

    #[test]
    fn test_metadata_is_json() {
        let fixture = TestProject::minimal().with_requirements("six\n");
        let resolver = library_resolver(&fixture, &[]);

        let (code, out, _) = run(&resolver, "metadata");
        assert_eq!(code, 0);
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["install_requires"], serde_json::json!(["six"]));
    }

    #[test]
    fn test_dist_checks_installed_identity() {
        let fixture = TestProject::minimal();
        let resolver = library_resolver(&fixture, &[("demo", Some("1.0"))]);

        let (code, _, err) = run(&resolver, "dist");
        assert_eq!(code, 1);
        assert_eq!(err, "Error: Distribution not found: demo 1.0\n");

        fixture.write("site/demo-1.0.dist-info/METADATA", "Name: demo\nVersion: 1.0\n");
        let (code, out, _) = run(&resolver, "dist");
        assert_eq!(code, 0);
        assert!(out.starts_with("demo 1.0 installed at "));

        fixture.write("site/demo-1.0.dist-info/METADATA", "Name: demo\nVersion: 0.9\n");
        let (code, _, err) = run(&resolver, "dist");
        assert_eq!(code, 1);
        assert!(err.starts_with("Error: Version conflict for distribution demo"));
    }
}
