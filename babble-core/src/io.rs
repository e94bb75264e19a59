use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Reads a text corpus and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_lines<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(path)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Derives the snapshot path sitting next to a corpus file.
///
/// Example:
/// `data/chatlog.txt` → `data/chatlog.bin`
pub(crate) fn snapshot_sibling<P: AsRef<Path>>(corpus_path: P) -> io::Result<PathBuf> {
	let corpus_path = corpus_path.as_ref();

	let parent = corpus_path.parent().unwrap_or_else(|| Path::new("."));
	let stem = corpus_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Corpus path has no filename"))?;

	let mut snapshot = PathBuf::from(parent);
	snapshot.push(stem);
	snapshot.set_extension("bin");

	Ok(snapshot)
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths).
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() {
			if path.extension() == Some(std::ffi::OsStr::new(extension)) {
				if let Some(name) = path.file_name() {
					files.push(name.to_string_lossy().to_string());
				}
			}
		}
	}

	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn snapshot_sits_next_to_the_corpus() {
		let snapshot = snapshot_sibling("data/chatlog.txt").unwrap();
		assert_eq!(snapshot, PathBuf::from("data/chatlog.bin"));

		let bare = snapshot_sibling("chatlog.txt").unwrap();
		assert_eq!(bare, PathBuf::from("chatlog.bin"));
	}

	#[test]
	fn a_path_without_filename_is_rejected() {
		assert!(snapshot_sibling("..").is_err());
	}
}
