//! Resolution of bare command names to executables on the search path.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Mapping from command name to the absolute path of the executable that runs it.
///
/// Built by listing every directory of the search path in order. When a name
/// appears in several directories the earliest directory wins. The index is
/// never patched: to pick up changes, build a new one.
#[derive(Debug, Clone, Default)]
pub struct ExecutableIndex {
    entries: HashMap<String, PathBuf>,
}

impl ExecutableIndex {
    /// Scan `search_paths` (a `PATH`-style list).
    ///
    /// Relative directories are made absolute against the process working
    /// directory. Directories that cannot be listed are skipped.
    pub fn from_search_path(search_paths: &OsStr) -> Self {
        let mut entries = HashMap::new();
        for dir in std::env::split_paths(search_paths) {
            if dir.as_os_str().is_empty() {
                continue;
            }
            let dir = std::path::absolute(&dir).unwrap_or(dir);
            index_dir(&dir, &mut entries);
        }
        log::debug!("indexed {} executables", entries.len());
        Self { entries }
    }

    /// Absolute path of the executable named `name`.
    pub fn lookup(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    /// Resolve what the user typed as a command.
    ///
    /// A bare name is looked up in the index. Anything containing a path
    /// separator (`./run.sh`, `/bin/ls`) bypasses the index and is accepted
    /// when it names an executable regular file.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.contains('/') {
            let path = Path::new(name);
            if !is_executable(path) {
                return None;
            }
            return Some(std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()));
        }
        self.lookup(name).map(Path::to_path_buf)
    }

    /// Names of all indexed executables, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn index_dir(dir: &Path, entries: &mut HashMap<String, PathBuf>) {
    let listing = match fs::read_dir(dir) {
        Ok(listing) => listing,
        Err(err) => {
            log::debug!("skipping {}: {err}", dir.display());
            return;
        }
    };

    for entry in listing.flatten() {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if entries.contains_key(&name) {
            continue;
        }
        let path = entry.path();
        if is_executable(&path) {
            entries.insert(name, path);
        }
    }
}

/// Regular file (after following symlinks) with at least one execute bit set.
fn is_executable(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env as stdenv;
    use std::ffi::OsString;
    use std::fs::File;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_unique_temp_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let p = stdenv::temp_dir().join(format!(
            "resolver_tests_{}_{}_{}",
            tag,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&p).expect("create temp dir");
        p
    }

    fn touch(path: &Path, mode: u32) {
        File::create(path).expect("touch");
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("chmod");
    }

    fn join_paths(dirs: &[&Path]) -> OsString {
        stdenv::join_paths(dirs).unwrap()
    }

    #[test]
    fn earliest_directory_wins() {
        let first = make_unique_temp_dir("first");
        let second = make_unique_temp_dir("second");
        touch(&first.join("foo"), 0o755);
        touch(&second.join("foo"), 0o755);
        touch(&second.join("bar"), 0o755);

        let index = ExecutableIndex::from_search_path(&join_paths(&[&first, &second]));
        assert_eq!(index.lookup("foo"), Some(first.join("foo").as_path()));
        assert_eq!(index.lookup("bar"), Some(second.join("bar").as_path()));

        let reversed = ExecutableIndex::from_search_path(&join_paths(&[&second, &first]));
        assert_eq!(reversed.lookup("foo"), Some(second.join("foo").as_path()));

        let _ = fs::remove_dir_all(first);
        let _ = fs::remove_dir_all(second);
    }

    #[test]
    fn skips_non_executables_and_directories() {
        let dir = make_unique_temp_dir("filter");
        touch(&dir.join("plain"), 0o644);
        touch(&dir.join("group_exec"), 0o610);
        fs::create_dir(dir.join("subdir")).unwrap();

        let index = ExecutableIndex::from_search_path(dir.as_os_str());
        assert_eq!(index.lookup("plain"), None);
        assert_eq!(index.lookup("subdir"), None);
        assert!(index.lookup("group_exec").is_some());
        assert_eq!(index.len(), 1);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn unreadable_directories_are_skipped() {
        let dir = make_unique_temp_dir("skip");
        touch(&dir.join("tool"), 0o755);
        let missing = dir.join("does_not_exist");

        let index = ExecutableIndex::from_search_path(&join_paths(&[&missing, &dir]));
        assert_eq!(index.lookup("tool"), Some(dir.join("tool").as_path()));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_search_path_is_empty_index() {
        let index = ExecutableIndex::from_search_path(OsStr::new(""));
        assert!(index.is_empty());
        assert_eq!(index.lookup("sh"), None);
    }

    #[test]
    fn resolve_path_with_separator_bypasses_index() {
        let dir = make_unique_temp_dir("direct");
        touch(&dir.join("script"), 0o755);
        touch(&dir.join("data"), 0o644);

        let index = ExecutableIndex::default();
        let script = dir.join("script");
        assert_eq!(index.resolve(script.to_str().unwrap()), Some(script.clone()));
        assert_eq!(index.resolve(dir.join("data").to_str().unwrap()), None);
        assert_eq!(index.resolve("script"), None);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn names_lists_every_entry() {
        let dir = make_unique_temp_dir("names");
        touch(&dir.join("alpha"), 0o755);
        touch(&dir.join("beta"), 0o755);

        let index = ExecutableIndex::from_search_path(dir.as_os_str());
        let mut names: Vec<&str> = index.names().collect();
        names.sort();
        assert_eq!(names, vec!["alpha", "beta"]);

        let _ = fs::remove_dir_all(dir);
    }
}
