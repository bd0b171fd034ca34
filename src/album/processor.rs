//! Album processor
//!
//! Walks one album root depth-first. At every directory level all
//! subdirectories are processed (recursively) before the audio files of
//! that level. Each audio file is renamed to its transliterated name when
//! that differs, then recorded in the album's playlist under its path
//! relative to the album root.
//!
//! The first I/O error aborts the album. Renames and playlist lines already
//! done stay as they are.

use crate::error::{M3uError, Result};
use crate::transliterate::Transliterator;
use crate::types::{is_audio_name, AlbumReport, TraversalStats, PLAYLIST_EXTENSION};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Processes a single album root into a playlist
pub struct AlbumProcessor {
    root: PathBuf,
    playlist_path: PathBuf,
    writer: BufWriter<File>,
    transliterator: &'static Transliterator,
    stats: TraversalStats,
}

impl AlbumProcessor {
    /// Validate the album root and create (or truncate) its playlist
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        if !root.exists() {
            return Err(M3uError::PathNotFound(root));
        }

        let playlist_path = playlist_path_for(&root)?;
        let file = File::create(&playlist_path).map_err(|source| M3uError::PlaylistOpen {
            path: playlist_path.clone(),
            source,
        })?;
        debug!("Opened playlist {}", playlist_path.display());

        Ok(Self {
            root,
            playlist_path,
            writer: BufWriter::new(file),
            transliterator: Transliterator::global(),
            stats: TraversalStats::default(),
        })
    }

    /// Walk the album, rename non-Latin audio files and write the playlist
    ///
    /// The playlist is flushed whether or not the walk succeeds; flush errors
    /// are logged and otherwise ignored.
    pub fn run(mut self) -> Result<AlbumReport> {
        let walked = self.walk();

        if let Err(e) = self.writer.flush() {
            warn!(
                "Failed to flush playlist {}: {}",
                self.playlist_path.display(),
                e
            );
        }

        walked?;

        info!(
            "{}: {} dirs, {} files, {} renamed",
            self.root.display(),
            self.stats.dirs,
            self.stats.files,
            self.stats.renamed
        );

        Ok(AlbumReport {
            root: self.root,
            playlist: self.playlist_path,
            stats: self.stats,
        })
    }

    fn walk(&mut self) -> Result<()> {
        // Stable sort: directories first, filesystem order kept within each group.
        // Sorting also makes walkdir read a whole directory before yielding it,
        // so renaming siblings mid-iteration is safe.
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by(|a, b| is_dir_entry(b).cmp(&is_dir_entry(a)));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => match dangling_link(&e) {
                    // A link whose target is gone is an ordinary non-directory entry
                    Some(link) => {
                        self.visit_file(&link)?;
                        continue;
                    }
                    None => {
                        let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                        return Err(M3uError::directory_read(path, &e));
                    }
                },
            };

            if entry.file_type().is_dir() {
                self.stats.dirs += 1;
                debug!("Entering {}", entry.path().display());
                continue;
            }

            self.visit_file(entry.path())?;
        }

        Ok(())
    }

    /// Rename and record `path` if it carries the audio suffix
    fn visit_file(&mut self, path: &Path) -> Result<()> {
        let is_audio = path
            .file_name()
            .map_or(false, |name| is_audio_name(&name.to_string_lossy()));
        if !is_audio {
            return Ok(());
        }

        let final_name = self.rename_to_latin(path)?;
        let prefix = self.prefix_for(path);
        self.write_line(&prefix, &final_name)?;
        self.stats.files += 1;
        Ok(())
    }

    /// Rename `path` to its transliterated name; returns the name now on disk
    fn rename_to_latin(&mut self, path: &Path) -> Result<String> {
        let Some(original) = path.file_name().and_then(|n| n.to_str()) else {
            // Not valid UTF-8, so nothing to look up in the table
            let lossy = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!("Skipping rename of non-UTF-8 name {:?}", lossy);
            return Ok(lossy);
        };

        if self.transliterator.is_latin(original) {
            return Ok(original.to_string());
        }

        let latin = self.transliterator.transliterate(original);
        if latin == original {
            return Ok(latin);
        }

        let target = path.with_file_name(&latin);
        if fs::symlink_metadata(&target).is_ok() {
            return Err(M3uError::Rename {
                from: path.to_path_buf(),
                to: target,
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "target file already exists",
                ),
            });
        }

        fs::rename(path, &target).map_err(|source| M3uError::Rename {
            from: path.to_path_buf(),
            to: target.clone(),
            source,
        })?;
        debug!("Renamed {} -> {}", original, latin);

        self.stats.renamed += 1;
        Ok(latin)
    }

    /// Subdirectory names from the album root to the parent of `path`,
    /// each followed by the platform separator
    fn prefix_for(&self, path: &Path) -> String {
        let mut prefix = String::new();
        let parent = path.strip_prefix(&self.root).ok().and_then(Path::parent);
        if let Some(parent) = parent {
            for segment in parent.iter() {
                prefix.push_str(&segment.to_string_lossy());
                prefix.push(MAIN_SEPARATOR);
            }
        }
        prefix
    }

    fn write_line(&mut self, prefix: &str, name: &str) -> Result<()> {
        writeln!(self.writer, "{}{}", prefix, name).map_err(|source| M3uError::Write {
            path: self.playlist_path.clone(),
            source,
        })
    }
}

/// Directory test for sorting; walkdir has not followed symlinks yet at this point
fn is_dir_entry(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_dir() || (file_type.is_symlink() && entry.path().is_dir())
}

/// The symlink behind a walk error, when the error is only its missing target
fn dangling_link(err: &walkdir::Error) -> Option<PathBuf> {
    let path = err.path()?;
    let not_found = err
        .io_error()
        .map_or(false, |io| io.kind() == std::io::ErrorKind::NotFound);
    let is_link = fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    (not_found && is_link).then(|| path.to_path_buf())
}

/// Process one album root: construct, run and report
pub fn process_album(path: impl AsRef<Path>) -> Result<AlbumReport> {
    AlbumProcessor::new(path)?.run()
}

/// `<root>/<basename(root)>.m3u`
fn playlist_path_for(root: &Path) -> Result<PathBuf> {
    let name = match root.file_name() {
        Some(name) => name.to_os_string(),
        None => root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_os_string()))
            .ok_or_else(|| {
                M3uError::Config(format!(
                    "Album root has no directory name: {}",
                    root.display()
                ))
            })?,
    };

    let mut file_name = name;
    file_name.push(".");
    file_name.push(PLAYLIST_EXTENSION);
    Ok(root.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn album(tmp: &TempDir, name: &str) -> PathBuf {
        let dir = tmp.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_playlist_path_uses_directory_name() {
        let path = playlist_path_for(Path::new("/music/Kino")).unwrap();
        assert_eq!(path, PathBuf::from("/music/Kino/Kino.m3u"));
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        match AlbumProcessor::new(&missing) {
            Err(M3uError::PathNotFound(p)) => assert_eq!(p, missing),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected PathNotFound"),
        }
        assert!(!missing.exists());
    }

    #[test]
    fn test_subdirectories_before_files() {
        let tmp = TempDir::new().unwrap();
        let root = album(&tmp, "A");
        touch(&root.join("B").join("song.mp3"));
        touch(&root.join("track.mp3"));

        let report = process_album(&root).unwrap();

        let expected_nested = format!("B{}song.mp3", MAIN_SEPARATOR);
        assert_eq!(
            lines(&report.playlist),
            vec![expected_nested, "track.mp3".to_string()]
        );
        assert_eq!(report.stats.dirs, 2);
        assert_eq!(report.stats.files, 2);
        assert_eq!(report.stats.renamed, 0);
    }

    #[test]
    fn test_nested_dirs_without_audio() {
        let tmp = TempDir::new().unwrap();
        let root = album(&tmp, "Empty");
        fs::create_dir_all(root.join("a").join("b").join("c")).unwrap();
        touch(&root.join("a").join("cover.jpg"));
        touch(&root.join("a").join("b").join("notes.txt"));

        let report = process_album(&root).unwrap();

        assert_eq!(report.stats.dirs, 4);
        assert_eq!(report.stats.files, 0);
        assert!(report.playlist.exists());
        assert_eq!(fs::read_to_string(&report.playlist).unwrap(), "");
    }

    #[test]
    fn test_renames_mapped_names() {
        let tmp = TempDir::new().unwrap();
        let root = album(&tmp, "Album");
        let original = "\u{FB7C}\u{FEE7}\u{FEED}\u{FBA6}.mp3";
        touch(&root.join("cd1").join(original));

        let report = process_album(&root).unwrap();

        assert_eq!(report.stats.renamed, 1);
        assert!(!root.join("cd1").join(original).exists());
        assert!(root.join("cd1").join("Bors.mp3").exists());
        assert_eq!(
            lines(&report.playlist),
            vec![format!("cd1{}Bors.mp3", MAIN_SEPARATOR)]
        );
    }

    #[test]
    fn test_latin_names_untouched() {
        let tmp = TempDir::new().unwrap();
        let root = album(&tmp, "Latin");
        touch(&root.join("01 Intro.mp3"));

        let report = process_album(&root).unwrap();

        assert_eq!(report.stats.renamed, 0);
        assert!(root.join("01 Intro.mp3").exists());
    }

    #[test]
    fn test_rename_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let root = album(&tmp, "Clash");
        touch(&root.join("\u{FED3}.mp3"));
        touch(&root.join("a.mp3"));

        let err = process_album(&root).unwrap_err();
        assert!(matches!(err, M3uError::Rename { .. }), "got {err:?}");
        assert!(root.join("\u{FED3}.mp3").exists());
        assert!(root.join("a.mp3").exists());
    }

    #[test]
    fn test_second_run_is_identical() {
        let tmp = TempDir::new().unwrap();
        let root = album(&tmp, "Twice");
        touch(&root.join("disc").join("\u{FED5}.mp3"));
        touch(&root.join("x.mp3"));

        let first = process_album(&root).unwrap();
        let first_bytes = fs::read(&first.playlist).unwrap();
        let second = process_album(&root).unwrap();
        let second_bytes = fs::read(&second.playlist).unwrap();

        assert_eq!(first.stats.renamed, 1);
        assert_eq!(second.stats.renamed, 0);
        assert_eq!(first_bytes, second_bytes);
    }

    #[test]
    fn test_playlist_is_truncated() {
        let tmp = TempDir::new().unwrap();
        let root = album(&tmp, "Stale");
        fs::write(root.join("Stale.m3u"), "old line\nanother\n").unwrap();
        touch(&root.join("new.mp3"));

        let report = process_album(&root).unwrap();

        assert_eq!(fs::read_to_string(&report.playlist).unwrap(), "new.mp3\n");
    }

    #[test]
    fn test_failure_keeps_earlier_lines_and_renames() {
        let tmp = TempDir::new().unwrap();
        let root = album(&tmp, "Partial");
        touch(&root.join("sub").join("\u{FED5}.mp3"));
        touch(&root.join("\u{FED3}.mp3"));
        touch(&root.join("a.mp3"));

        let err = process_album(&root).unwrap_err();
        assert!(matches!(err, M3uError::Rename { .. }), "got {err:?}");

        // The nested rename happened before the failure and is not undone
        assert!(root.join("sub").join("b.mp3").exists());
        assert!(!root.join("sub").join("\u{FED5}.mp3").exists());

        // Lines written before the failure stay in the playlist
        let written = lines(&root.join("Partial.m3u"));
        assert_eq!(written[0], format!("sub{}b.mp3", MAIN_SEPARATOR));
        assert!(written.len() <= 2, "got {written:?}");
        assert!(written[1..].iter().all(|line| line == "a.mp3"), "got {written:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlinks_do_not_abort() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let root = album(&tmp, "Links");
        touch(&root.join("track.mp3"));
        symlink("../gone.jpg", root.join("cover.jpg")).unwrap();
        symlink("../gone.mp3", root.join("\u{FED3}.mp3")).unwrap();

        let report = process_album(&root).unwrap();

        assert_eq!(report.stats.files, 2);
        assert_eq!(report.stats.renamed, 1);
        assert!(fs::symlink_metadata(root.join("cover.jpg")).is_ok());
        assert!(fs::symlink_metadata(root.join("a.mp3")).is_ok());

        let mut written = lines(&report.playlist);
        written.sort();
        assert_eq!(written, vec!["a.mp3".to_string(), "track.mp3".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_come_before_files() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let root = album(&tmp, "Linked");
        touch(&tmp.path().join("elsewhere").join("song.mp3"));
        touch(&root.join("track.mp3"));
        symlink(tmp.path().join("elsewhere"), root.join("bonus")).unwrap();

        let report = process_album(&root).unwrap();

        assert_eq!(report.stats.dirs, 2);
        assert_eq!(
            lines(&report.playlist),
            vec![format!("bonus{}song.mp3", MAIN_SEPARATOR), "track.mp3".to_string()]
        );
    }
}
