use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use zetup_commands::{
    CommandError, CommandResolver, CommandTable, Error, ExternalCommands, NamespaceKind, Outcome,
    ProcessSpawner, Result, SetupPy, ToolchainCommands,
};

/// Records spawned commands and answers with a fixed exit code.
#[derive(Default)]
struct CountingSpawner {
    calls: RefCell<Vec<(String, Vec<String>)>>,
    code: i32,
}

impl CountingSpawner {
    fn with_code(code: i32) -> Rc<Self> {
        Rc::new(Self {
            calls: RefCell::default(),
            code,
        })
    }

    fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.borrow().clone()
    }
}

impl ProcessSpawner for CountingSpawner {
    fn spawn(&self, program: &str, args: &[&str]) -> Result<i32> {
        self.calls.borrow_mut().push((
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));
        Ok(self.code)
    }
}

fn resolver(spawner: &Rc<CountingSpawner>) -> CommandResolver {
    let library = CommandTable::new(NamespaceKind::Library)
        .with("hello", || Ok(Outcome::message("hello from library")))
        .with("fail", || Err(CommandError::new("x").into()))
        .with("crash", || Err(Error::Io(std::io::Error::other("boom"))))
        .with("build", || Ok(Outcome::message("library build")));
    let instance = CommandTable::new(NamespaceKind::Instance)
        .with("hello", || Ok(Outcome::message("hello from instance")))
        .with("status", || Ok(Outcome::from(3)))
        .with("silent", || Ok(Outcome::Done));

    // registered out of rank order on purpose
    CommandResolver::new()
        .with(ExternalCommands::new(["tox", "sdist"], spawner.clone()))
        .with(ToolchainCommands::new(SetupPy::new("python3", spawner.clone())))
        .with(instance)
        .with(library)
}

fn dispatch(resolver: &CommandResolver, token: &str) -> (Result<i32>, String, String) {
    let mut out = Vec::<u8>::new();
    let mut err = Vec::<u8>::new();
    let result = resolver.dispatch(token, &mut out, &mut err);
    (
        result,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn test_unknown_command_never_spawns() {
    let spawner = CountingSpawner::with_code(0);
    let resolver = resolver(&spawner);

    let (result, out, err) = dispatch(&resolver, "frobnicate");
    assert!(matches!(result, Err(Error::UnknownCommand { command }) if command == "frobnicate"));
    assert!(out.is_empty() && err.is_empty());
    assert!(spawner.calls().is_empty());
}

#[rstest]
#[case(0)]
#[case(5)]
fn test_external_command_spawns_once(#[case] code: i32) {
    let spawner = CountingSpawner::with_code(code);
    let resolver = resolver(&spawner);

    let (result, _, _) = dispatch(&resolver, "tox");
    assert_eq!(result.unwrap(), code);
    assert_eq!(spawner.calls(), [("tox".to_string(), Vec::<String>::new())]);
}

#[test]
fn test_command_error_is_caught() {
    let spawner = CountingSpawner::with_code(0);
    let resolver = resolver(&spawner);

    let (result, out, err) = dispatch(&resolver, "fail");
    assert_eq!(result.unwrap(), 1);
    assert_eq!(err, "Error: x\n");
    assert!(out.is_empty());
}

#[test]
fn test_other_errors_propagate() {
    let spawner = CountingSpawner::with_code(0);
    let resolver = resolver(&spawner);

    let (result, _, err) = dispatch(&resolver, "crash");
    assert!(matches!(result, Err(Error::Io(_))));
    assert!(err.is_empty());
}

#[rstest]
#[case("hello", "hello from library\n")]
#[case("build", "library build\n")]
fn test_lower_rank_wins(#[case] token: &str, #[case] expected: &str) {
    let spawner = CountingSpawner::with_code(0);
    let resolver = resolver(&spawner);

    let (result, out, _) = dispatch(&resolver, token);
    assert_eq!(result.unwrap(), 0);
    assert_eq!(out, expected);
    assert!(spawner.calls().is_empty());
}

#[test]
fn test_toolchain_beats_external() {
    let spawner = CountingSpawner::with_code(2);
    let resolver = resolver(&spawner);

    let (result, _, _) = dispatch(&resolver, "sdist");
    assert_eq!(result.unwrap(), 2);
    assert_eq!(
        spawner.calls(),
        [(
            "python3".to_string(),
            vec!["setup.py".to_string(), "sdist".to_string()]
        )]
    );
}

#[test]
fn test_status_normalization() {
    let spawner = CountingSpawner::with_code(0);
    let resolver = resolver(&spawner);

    let (result, out, _) = dispatch(&resolver, "status");
    assert_eq!(result.unwrap(), 3);
    assert!(out.is_empty());

    let (result, out, _) = dispatch(&resolver, "silent");
    assert_eq!(result.unwrap(), 0);
    assert!(out.is_empty());
}

#[test]
fn test_resolve_reports_namespace() {
    let spawner = CountingSpawner::with_code(0);
    let resolver = resolver(&spawner);

    assert_eq!(resolver.resolve("hello").unwrap().0, NamespaceKind::Library);
    assert_eq!(resolver.resolve("status").unwrap().0, NamespaceKind::Instance);
    assert_eq!(resolver.resolve("bdist_wheel").unwrap().0, NamespaceKind::Toolchain);
    assert_eq!(resolver.resolve("tox").unwrap().0, NamespaceKind::External);
}

#[test]
fn test_vocabulary_is_ranked_and_unique() {
    let spawner = CountingSpawner::with_code(0);
    let resolver = resolver(&spawner);
    let vocabulary = resolver.vocabulary();

    assert_eq!(&vocabulary[..4], ["hello", "fail", "crash", "build"]);
    assert_eq!(vocabulary.iter().filter(|n| *n == "build").count(), 1);
    assert_eq!(vocabulary.iter().filter(|n| *n == "sdist").count(), 1);
    assert_eq!(vocabulary.last().map(String::as_str), Some("tox"));
    assert!(resolver.contains("egg_info"));
    assert!(!resolver.contains("frobnicate"));
}
