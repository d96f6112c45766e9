//! Executable stand-in scripts.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `#!/bin/sh` script named `name` into `dir`.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A fake `python` that answers the module-version probe from a table of
/// `(module, version)` pairs. A `None` version means "no `__version__`";
/// unlisted modules are not importable.
///
/// Answers carry the `::zetup::` reply prefix the real scripts write.
/// The site-packages probe reports `<dir>/site` and every module lives in
/// `<dir>/site/<module>`. `setup.py <command>` echoes
/// the command and exits with `setup_status`.
pub fn fake_python(dir: &Path, modules: &[(&str, Option<&str>)], setup_status: i32) -> PathBuf {
    let site = dir.join("site");
    let mut cases = String::new();
    for (module, version) in modules {
        match version {
            Some(v) => cases.push_str(&format!("    {module}) printf '::zetup::%s\\n' '{v}' ;;\n")),
            None => cases.push_str(&format!("    {module}) exit 4 ;;\n")),
        }
    }
    let body = format!(
        r#"if [ "$1" = "setup.py" ]; then
  echo "setup.py $2"
  exit {setup_status}
fi
if [ "$1" = "-c" ]; then
  case "$3" in
    --path) echo "::zetup::{site}/$4" ;;
{cases}    "") echo "{site}" ;;
    *) exit 3 ;;
  esac
  exit 0
fi
exit 2"#,
        site = site.display()
    );
    write_script(dir, "python", &body)
}
