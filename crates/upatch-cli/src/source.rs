//! Filesystem sources: turns command-line paths into comparison pairs.

use std::collections::BTreeMap;
use std::fs::{self, File, Metadata};
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context};
use upatch_diff::Object;
use upatch_types::{FileMode, ObjectId};
use walkdir::WalkDir;

/// Command-line spelling of an absent side.
pub const DEV_NULL: &str = "/dev/null";

/// A file found on disk, fingerprinted but not yet opened for diffing.
#[derive(Clone, Debug)]
pub struct Entry {
    /// Path shown in headers.
    pub path: PathBuf,
    /// Where the content lives.
    pub location: PathBuf,
    pub id: ObjectId,
    pub mode: FileMode,
}

impl Entry {
    pub fn load(location: &Path, path: PathBuf) -> anyhow::Result<Self> {
        let meta = fs::symlink_metadata(location)
            .with_context(|| format!("reading metadata of {}", location.display()))?;
        let mode = mode_of(&meta);
        let data = read_data(location, mode)
            .with_context(|| format!("reading {}", location.display()))?;
        Ok(Self {
            path,
            location: location.to_path_buf(),
            id: ObjectId::for_content(&data),
            mode,
        })
    }

    /// Open the content stream. Symlinks read as their target path.
    pub fn open(&self) -> io::Result<Box<dyn Read>> {
        if self.mode == FileMode::SYMLINK {
            Ok(Box::new(Cursor::new(link_target(&self.location)?)))
        } else {
            Ok(Box::new(BufReader::new(File::open(&self.location)?)))
        }
    }

    pub fn to_object<R>(&self, content: R) -> Object<R> {
        Object::new(content, self.id, self.path.clone(), self.mode)
    }
}

/// One file-level comparison. `None` marks an absent side.
#[derive(Clone, Debug)]
pub struct Comparison {
    pub src: Option<Entry>,
    pub dst: Option<Entry>,
}

impl Comparison {
    /// Both sides present with the same content and mode.
    pub fn is_unchanged(&self) -> bool {
        matches!((&self.src, &self.dst), (Some(s), Some(d)) if s.id == d.id && s.mode == d.mode)
    }

    pub fn describe(&self) -> String {
        let show = |e: &Option<Entry>| {
            e.as_ref()
                .map_or_else(|| DEV_NULL.to_string(), |e| e.path.display().to_string())
        };
        format!("{} -> {}", show(&self.src), show(&self.dst))
    }
}

enum Input {
    Null,
    File(Entry),
    Tree(BTreeMap<PathBuf, Entry>),
}

fn resolve(path: &Path) -> anyhow::Result<Input> {
    if path == Path::new(DEV_NULL) {
        return Ok(Input::Null);
    }
    let meta = fs::metadata(path).with_context(|| format!("cannot access {}", path.display()))?;
    if meta.is_dir() {
        Ok(Input::Tree(walk_tree(path)?))
    } else {
        Ok(Input::File(Entry::load(path, header_path(path))?))
    }
}

/// Pair up the files behind `old` and `new`.
///
/// Two files give one comparison. Two directories are walked and paired by
/// relative path in sorted order; a path present on one side only becomes a
/// creation or deletion. `/dev/null` stands for an absent file or an empty
/// tree.
pub fn collect(old: &Path, new: &Path) -> anyhow::Result<Vec<Comparison>> {
    let pairs = match (resolve(old)?, resolve(new)?) {
        (Input::Null, Input::Null) => vec![Comparison { src: None, dst: None }],
        (Input::File(src), Input::File(dst)) => vec![Comparison { src: Some(src), dst: Some(dst) }],
        (Input::File(src), Input::Null) => vec![Comparison { src: Some(src), dst: None }],
        (Input::Null, Input::File(dst)) => vec![Comparison { src: None, dst: Some(dst) }],
        (Input::Tree(src), Input::Tree(dst)) => pair_trees(src, dst),
        (Input::Tree(src), Input::Null) => pair_trees(src, BTreeMap::new()),
        (Input::Null, Input::Tree(dst)) => pair_trees(BTreeMap::new(), dst),
        _ => bail!(
            "cannot compare a file with a directory: {} and {}",
            old.display(),
            new.display()
        ),
    };
    Ok(pairs)
}

fn pair_trees(
    mut old: BTreeMap<PathBuf, Entry>,
    mut new: BTreeMap<PathBuf, Entry>,
) -> Vec<Comparison> {
    let mut paths: Vec<PathBuf> = old.keys().chain(new.keys()).cloned().collect();
    paths.sort();
    paths.dedup();
    paths
        .into_iter()
        .map(|path| Comparison {
            src: old.remove(&path),
            dst: new.remove(&path),
        })
        .collect()
}

/// Every non-directory entry under `root`, keyed by root-relative path.
pub fn walk_tree(root: &Path) -> anyhow::Result<BTreeMap<PathBuf, Entry>> {
    let mut tree = BTreeMap::new();
    for dent in WalkDir::new(root).follow_links(false) {
        let dent = dent.with_context(|| format!("walking {}", root.display()))?;
        if dent.file_type().is_dir() {
            continue;
        }
        let rel = dent.path().strip_prefix(root)?.to_path_buf();
        let entry = Entry::load(dent.path(), rel.clone())?;
        tree.insert(rel, entry);
    }
    Ok(tree)
}

/// Entry mode as recorded in headers.
pub fn mode_of(meta: &Metadata) -> FileMode {
    if meta.file_type().is_symlink() {
        return FileMode::SYMLINK;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 != 0 {
            return FileMode::EXECUTABLE;
        }
    }
    FileMode::REGULAR
}

/// Drop root and `.` components so prefixes join onto a relative path.
fn header_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
        .collect()
}

fn read_data(location: &Path, mode: FileMode) -> io::Result<Vec<u8>> {
    if mode == FileMode::SYMLINK {
        link_target(location)
    } else {
        fs::read(location)
    }
}

fn link_target(location: &Path) -> io::Result<Vec<u8>> {
    let target = fs::read_link(location)?;
    Ok(target.to_string_lossy().into_owned().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn header_path_strips_root_and_curdir() {
        assert_eq!(header_path(Path::new("./src/lib.rs")), PathBuf::from("src/lib.rs"));
        assert_eq!(header_path(Path::new("/tmp/x.txt")), PathBuf::from("tmp/x.txt"));
        assert_eq!(header_path(Path::new("../up.txt")), PathBuf::from("../up.txt"));
    }

    #[test]
    fn entry_fingerprints_content() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "f.txt", "hello\n");
        let entry = Entry::load(&dir.path().join("f.txt"), "f.txt".into()).unwrap();
        assert_eq!(entry.id, ObjectId::for_content(b"hello\n"));
        assert_eq!(entry.mode, FileMode::REGULAR);

        let mut content = String::new();
        entry.open().unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "hello\n");
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_maps_to_executable_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "run.sh", "#!/bin/sh\n");
        let path = dir.path().join("run.sh");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        let entry = Entry::load(&path, "run.sh".into()).unwrap();
        assert_eq!(entry.mode, FileMode::EXECUTABLE);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_read_as_target() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("target.txt", &link).unwrap();
        let entry = Entry::load(&link, "link".into()).unwrap();
        assert_eq!(entry.mode, FileMode::SYMLINK);
        assert_eq!(entry.id, ObjectId::for_content(b"target.txt"));
    }

    #[test]
    fn trees_pair_by_relative_path() {
        let old = tempfile::tempdir().unwrap();
        let new = tempfile::tempdir().unwrap();
        write(old.path(), "same.txt", "x\n");
        write(old.path(), "gone.txt", "bye\n");
        write(old.path(), "sub/edit.txt", "1\n");
        write(new.path(), "same.txt", "x\n");
        write(new.path(), "fresh.txt", "hi\n");
        write(new.path(), "sub/edit.txt", "2\n");

        let pairs = collect(old.path(), new.path()).unwrap();
        let described: Vec<String> = pairs.iter().map(Comparison::describe).collect();
        assert_eq!(
            described,
            vec![
                "/dev/null -> fresh.txt",
                "gone.txt -> /dev/null",
                "same.txt -> same.txt",
                "sub/edit.txt -> sub/edit.txt",
            ]
        );
        assert!(pairs[2].is_unchanged());
        assert!(!pairs[3].is_unchanged());
    }

    #[test]
    fn dev_null_against_tree_creates_everything() {
        let new = tempfile::tempdir().unwrap();
        write(new.path(), "a", "1\n");
        write(new.path(), "b", "2\n");
        let pairs = collect(Path::new(DEV_NULL), new.path()).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.src.is_none() && p.dst.is_some()));
    }

    #[test]
    fn both_dev_null_yields_empty_comparison() {
        let pairs = collect(Path::new(DEV_NULL), Path::new(DEV_NULL)).unwrap();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].src.is_none() && pairs[0].dst.is_none());
    }

    #[test]
    fn file_against_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "f", "x");
        let err = collect(&dir.path().join("f"), dir.path()).unwrap_err();
        assert!(err.to_string().contains("cannot compare a file with a directory"));
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect(&dir.path().join("nope"), Path::new(DEV_NULL)).is_err());
    }
}
