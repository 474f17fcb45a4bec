use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::err;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};

pub(super) const IDENTIFIER_LEN: u64 = 4;
pub(super) const ATOM_HEADER_LEN: u64 = 4 + IDENTIFIER_LEN;

/// The location and identity of an atom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AtomInfo {
	pub(crate) start: u64,
	/// The full length of the atom, including its header
	pub(crate) len: u64,
	/// Whether the length is stored in the 64-bit form
	pub(crate) extended: bool,
	pub(crate) ident: [u8; 4],
}

// Any identifier is technically allowed, which leaves no room for error detection.
// Printable ASCII and `©` are what is found in the wild.
fn is_valid_identifier_byte(b: u8) -> bool {
	(b' '..=b'~').contains(&b) || b == b'\xA9'
}

impl AtomInfo {
	/// Read an atom header, leaving the reader at the start of the content
	///
	/// `reader_size` is the number of bytes left in the parent. `None` is returned when the rest
	/// of the parent can't be made sense of, but the parsing mode allows it to be skipped.
	pub(crate) fn read<R>(data: &mut R, reader_size: u64, parse_mode: ParsingMode) -> Result<Option<Self>>
	where
		R: Read + Seek,
	{
		let start = data.stream_position()?;

		let len_raw = u64::from(data.read_u32::<BigEndian>()?);

		let mut ident = [0; IDENTIFIER_LEN as usize];
		data.read_exact(&mut ident)?;

		if !ident.iter().copied().all(is_valid_identifier_byte) {
			// Nothing past this point can be trusted
			data.seek(SeekFrom::End(0))?;

			if parse_mode == ParsingMode::Strict {
				err!(BadAtom("Encountered an atom with invalid characters"));
			}

			log::warn!("Encountered an atom with invalid characters, stopping");
			return Ok(None);
		}

		let (len, extended) = match len_raw {
			// The atom extends to the end of the file
			0 => {
				let pos = data.stream_position()?;
				let end = data.seek(SeekFrom::End(0))?;

				data.seek(SeekFrom::Start(pos))?;

				(end - start, false)
			},
			1 => (data.read_u64::<BigEndian>()?, true),
			_ => (len_raw, false),
		};

		let header_len = if extended { ATOM_HEADER_LEN + 8 } else { ATOM_HEADER_LEN };
		if len < header_len {
			data.seek(SeekFrom::End(0))?;
			err!(BadAtom("Found an invalid length (< 8)"));
		}

		if len > reader_size {
			log::warn!(
				"Atom {:?} claims {} bytes, only {} are left",
				ident.escape_ascii().to_string(),
				len,
				reader_size
			);

			// Trailing padding with a bad size is common enough to let go
			let skippable = (parse_mode != ParsingMode::Strict && &ident == b"free")
				|| parse_mode == ParsingMode::Relaxed;
			if skippable {
				data.seek(SeekFrom::End(0))?;
				return Ok(None);
			}

			err!(SizeMismatch);
		}

		log::trace!(
			"Found atom {:?} ({} bytes) at {}",
			ident.escape_ascii().to_string(),
			len,
			start
		);

		Ok(Some(Self {
			start,
			len,
			extended,
			ident,
		}))
	}

	pub(crate) fn header_size(&self) -> u64 {
		if self.extended {
			return ATOM_HEADER_LEN + 8;
		}

		ATOM_HEADER_LEN
	}

	pub(crate) fn content_len(&self) -> u64 {
		self.len - self.header_size()
	}

	pub(crate) fn end(&self) -> u64 {
		self.start + self.len
	}
}
