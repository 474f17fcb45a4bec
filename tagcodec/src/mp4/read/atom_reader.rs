use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::err;
use crate::mp4::atom_info::AtomInfo;
use crate::util::io::StreamLen;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};

/// A reader confined to a window of the underlying stream
///
/// * [`Self::next`] reads the next atom header in the window.
/// * Integers are always big-endian.
/// * Positions are absolute, but seeks never leave the window.
pub(crate) struct AtomReader<R>
where
	R: Read + Seek,
{
	reader: R,
	start: u64,
	remaining_size: u64,
	len: u64,
	parse_mode: ParsingMode,
}

impl<R> AtomReader<R>
where
	R: Read + Seek,
{
	/// Create an `AtomReader` over the entire stream
	pub(crate) fn new(mut reader: R, parse_mode: ParsingMode) -> Result<Self> {
		let len = reader.total_len()?;
		let position = reader.stream_position()?;

		Ok(Self {
			reader,
			start: 0,
			remaining_size: len.saturating_sub(position),
			len,
			parse_mode,
		})
	}

	/// Confine the reader to `len` bytes starting at `start_position`
	///
	/// The reader is left at the start of the window.
	pub(crate) fn reset_bounds(&mut self, start_position: u64, len: u64) -> Result<()> {
		self.start = start_position;
		self.remaining_size = len;
		self.len = len;

		self.reader.seek(SeekFrom::Start(start_position))?;
		Ok(())
	}

	pub(crate) fn read_u8(&mut self) -> std::io::Result<u8> {
		self.remaining_size = self.remaining_size.saturating_sub(1);
		self.reader.read_u8()
	}

	pub(crate) fn read_u32(&mut self) -> std::io::Result<u32> {
		self.remaining_size = self.remaining_size.saturating_sub(4);
		self.reader.read_u32::<BigEndian>()
	}

	pub(crate) fn read_u64(&mut self) -> std::io::Result<u64> {
		self.remaining_size = self.remaining_size.saturating_sub(8);
		self.reader.read_u64::<BigEndian>()
	}

	/// Read the next atom in the window
	///
	/// This will leave the reader at the beginning of the atom content.
	pub(crate) fn next(&mut self) -> Result<Option<AtomInfo>> {
		if self.remaining_size == 0 {
			return Ok(None);
		}

		if self.remaining_size < 8 {
			err!(SizeMismatch);
		}

		let remaining = self.remaining_size;
		let parse_mode = self.parse_mode;
		AtomInfo::read(self, remaining, parse_mode)
	}

	pub(crate) fn parse_mode(&self) -> ParsingMode {
		self.parse_mode
	}

	pub(crate) fn into_inner(self) -> R {
		self.reader
	}
}

impl<R> Seek for AtomReader<R>
where
	R: Read + Seek,
{
	fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
		let bound_end = self.start + self.len;

		let absolute = match pos {
			SeekFrom::Start(s) => s,
			SeekFrom::End(s) => bound_end.saturating_add_signed(s),
			SeekFrom::Current(s) => self.reader.stream_position()?.saturating_add_signed(s),
		};

		let absolute = absolute.clamp(self.start, bound_end);
		self.remaining_size = bound_end - absolute;

		self.reader.seek(SeekFrom::Start(absolute))
	}
}

impl<R> Read for AtomReader<R>
where
	R: Read + Seek,
{
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		if self.remaining_size == 0 {
			return Ok(0);
		}

		let max = buf.len().min(usize::try_from(self.remaining_size).unwrap_or(usize::MAX));
		let r = self.reader.read(&mut buf[..max])?;
		self.remaining_size = self.remaining_size.saturating_sub(r as u64);

		Ok(r)
	}
}
