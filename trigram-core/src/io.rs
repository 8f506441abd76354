use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Reads a whole text file into memory.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, so a stray
/// byte in a large corpus does not abort training.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut bytes = Vec::new();
	BufReader::new(File::open(filename)?).read_to_end(&mut bytes)?;
	Ok(match String::from_utf8(bytes) {
		Ok(text) => text,
		Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
	})
}

/// Directory holding `path`.
///
/// Examples:
/// - `"output/model.bin"` → `"output"`
/// - `"model.bin"` → `"."`
pub(crate) fn parent_dir(path: &Path) -> &Path {
	match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	#[test]
	fn parent_of_bare_filename_is_cwd() {
		assert_eq!(parent_dir(Path::new("model.bin")), Path::new("."));
		assert_eq!(parent_dir(Path::new("output/model.bin")), Path::new("output"));
	}

	#[test]
	fn read_file_tolerates_invalid_utf8() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("corpus.txt");
		fs::write(&path, b"caf\xff ok").unwrap();
		assert_eq!(read_file(&path).unwrap(), "caf\u{fffd} ok");
		assert!(read_file(dir.path().join("missing.txt")).is_err());
	}
}
