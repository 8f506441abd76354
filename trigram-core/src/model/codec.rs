//! Binary persistence of a [`TrigramModel`].
//!
//! Layout (every integer is a 32-bit little-endian signed value):
//!
//! ```text
//! total_trigrams
//! num_first_words
//! num_first_words × {
//!     len, bytes (word + NUL, `len` bytes), num_second_words
//!     num_second_words × {
//!         len, bytes, num_third_words
//!         num_third_words × { len, bytes, count }
//!     }
//! }
//! ```
//!
//! [`Format::Raw`] is exactly this layout, without any header. [`Format::Tagged`]
//! prefixes it with `b"TRGM"` and a `u32` version so incompatible files are
//! rejected instead of being misread.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::error::CodecError;
use crate::io::parent_dir;

use super::node::Node;
use super::trigram_model::TrigramModel;

/// Magic bytes of a tagged stream.
pub const MAGIC: [u8; 4] = *b"TRGM";

/// Version written in a tagged stream.
pub const VERSION: u32 = 1;

/// Stream framing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
	/// Bare layout, no header.
	#[default]
	Raw,
	/// Layout preceded by [`MAGIC`] and [`VERSION`].
	Tagged,
}

struct Encoder<W: Write> {
	writer: W,
}

impl<W: Write> Encoder<W> {
	fn int(&mut self, value: i32) -> Result<(), CodecError> {
		self.writer.write_all(&value.to_le_bytes())?;
		Ok(())
	}

	fn size(&mut self, value: usize, what: &'static str) -> Result<(), CodecError> {
		let value = i32::try_from(value).map_err(|_| CodecError::Overflow { what })?;
		self.int(value)
	}

	/// Writes the length (terminator included), the bytes and the NUL terminator.
	fn word(&mut self, word: &str, what: &'static str) -> Result<(), CodecError> {
		if word.as_bytes().contains(&0) {
			return Err(CodecError::EmbeddedNul { what });
		}
		self.size(word.len() + 1, what)?;
		self.writer.write_all(word.as_bytes())?;
		self.writer.write_all(&[0])?;
		Ok(())
	}

	fn model(&mut self, model: &TrigramModel) -> Result<(), CodecError> {
		let root = model.root();
		self.size(model.total_trigrams(), "total trigrams")?;
		self.size(root.children().len(), "number of first words")?;

		for first in root.children() {
			self.word(first.word(), "first word")?;
			self.size(first.children().len(), "number of second words")?;

			for second in first.children() {
				self.word(second.word(), "second word")?;
				self.size(second.children().len(), "number of third words")?;

				for third in second.children() {
					self.word(third.word(), "third word")?;
					self.size(third.count(), "trigram count")?;
				}
			}
		}
		Ok(())
	}
}

struct Decoder<R: Read> {
	reader: R,
}

impl<R: Read> Decoder<R> {
	fn bytes<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], CodecError> {
		let mut buf = [0u8; N];
		self.reader.read_exact(&mut buf).map_err(|err| match err.kind() {
			io::ErrorKind::UnexpectedEof => CodecError::Truncated { what },
			_ => CodecError::Io(err),
		})?;
		Ok(buf)
	}

	fn int(&mut self, what: &'static str) -> Result<i32, CodecError> {
		Ok(i32::from_le_bytes(self.bytes(what)?))
	}

	/// Reads a non-negative integer.
	fn size(&mut self, what: &'static str) -> Result<usize, CodecError> {
		let value = self.int(what)?;
		usize::try_from(value).map_err(|_| CodecError::InvalidLength { what, value })
	}

	/// Reads a NUL-terminated word, never trusting the length for a preallocation.
	fn word(&mut self, what: &'static str) -> Result<String, CodecError> {
		let len = self.int(what)?;
		if len < 1 {
			return Err(CodecError::InvalidLength { what, value: len });
		}

		let mut buf = Vec::new();
		(&mut self.reader).take(len as u64).read_to_end(&mut buf)?;
		if buf.len() != len as usize {
			return Err(CodecError::Truncated { what });
		}

		if buf.pop() != Some(0) {
			return Err(CodecError::MissingTerminator { what });
		}
		if buf.contains(&0) {
			return Err(CodecError::EmbeddedNul { what });
		}
		String::from_utf8(buf).map_err(|_| CodecError::InvalidUtf8 { what })
	}

	fn header(&mut self) -> Result<(), CodecError> {
		let found: [u8; 4] = self.bytes("magic")?;
		if found != MAGIC {
			return Err(CodecError::BadMagic { found });
		}
		let version = u32::from_le_bytes(self.bytes("version")?);
		if version != VERSION {
			return Err(CodecError::UnsupportedVersion(version));
		}
		Ok(())
	}

	fn second_level(&mut self, first: &mut Node) -> Result<(), CodecError> {
		let word = self.word("second word")?;
		let second = first.child_or_insert(&word);

		for _ in 0..self.size("number of third words")? {
			let word = self.word("third word")?;
			let count = self.int("trigram count")?;
			if count < 1 {
				return Err(CodecError::InvalidCount { word, value: count });
			}
			// Counts are stored, not accumulated: a repeated word keeps the last one
			second.child_or_insert(&word).set_count(count as usize);
		}
		Ok(())
	}

	fn model(&mut self) -> Result<TrigramModel, CodecError> {
		let mut model = TrigramModel::new();
		let total = self.size("total trigrams")?;
		model.set_total_trigrams(total);

		let num_first = self.size("number of first words")?;
		for _ in 0..num_first {
			let word = self.word("first word")?;
			let first = model.root_mut().child_or_insert(&word);
			for _ in 0..self.size("number of second words")? {
				self.second_level(first)?;
			}
		}

		let trailing = io::copy(&mut self.reader, &mut io::sink())?;
		if trailing > 0 {
			return Err(CodecError::TrailingBytes(trailing as usize));
		}

		debug!("decoded {num_first} first words, {total} trigrams");
		Ok(model)
	}
}

/// Writes `model` to `writer`, children in their stored order.
///
/// # Errors
/// - [`CodecError::Overflow`] if a length or count exceeds `i32::MAX`
/// - [`CodecError::EmbeddedNul`] if a word contains a NUL byte
/// - [`CodecError::Io`] on write failure
pub fn encode<W: Write>(model: &TrigramModel, writer: W, format: Format) -> Result<(), CodecError> {
	let mut encoder = Encoder { writer };
	if format == Format::Tagged {
		encoder.writer.write_all(&MAGIC)?;
		encoder.writer.write_all(&VERSION.to_le_bytes())?;
	}
	encoder.model(model)?;
	encoder.writer.flush()?;
	Ok(())
}

/// Encodes `model` into a new buffer.
pub fn encode_to_vec(model: &TrigramModel, format: Format) -> Result<Vec<u8>, CodecError> {
	let mut bytes = Vec::new();
	encode(model, &mut bytes, format)?;
	Ok(bytes)
}

/// Rebuilds a model from a complete stream.
///
/// Every record goes through the same find-or-create step as insertion, so
/// the result is a well-formed tree even if words repeat. The whole stream
/// must be consumed: truncation and trailing bytes are errors, and no partial
/// model is ever returned.
pub fn decode<R: Read>(reader: R, format: Format) -> Result<TrigramModel, CodecError> {
	let mut decoder = Decoder { reader };
	if format == Format::Tagged {
		decoder.header()?;
	}
	decoder.model()
}

/// Atomically writes `model` to `path`.
///
/// Parent directories are created. The stream is written to a temporary file
/// next to `path` and renamed over it, so readers never see a partial model.
pub fn save_to_file<P: AsRef<Path>>(model: &TrigramModel, path: P, format: Format) -> Result<(), CodecError> {
	let path = path.as_ref();
	let parent = parent_dir(path);
	fs::create_dir_all(parent)?;

	let mut temp_file = NamedTempFile::new_in(parent)?;
	{
		let mut writer = BufWriter::new(temp_file.as_file_mut());
		encode(model, &mut writer, format)?;
	}
	temp_file.persist(path).map_err(|err| err.error)?;

	info!("model saved to {}", path.display());
	Ok(())
}

/// Reads a model written by [`save_to_file`] with the same `format`.
pub fn load_from_file<P: AsRef<Path>>(path: P, format: Format) -> Result<TrigramModel, CodecError> {
	let path = path.as_ref();
	let model = decode(BufReader::new(File::open(path)?), format)?;
	info!("model loaded from {}", path.display());
	Ok(model)
}
