//! The chunk model shared by every IFF-derived container
//!
//! RIFF/WAV and AIFF use a 4-byte size, DSF and DFF use an 8-byte size. In all of them a chunk
//! is `id + size + data`, and in WAV, AIFF and DFF an odd-sized chunk is followed by a pad byte
//! that is not counted in its size.

use crate::config::ParseOptions;
use crate::error::Result;
use crate::id3::v2::header::Id3v2Header;
use crate::id3::v2::read::parse_id3v2;
use crate::id3::v2::tag::Id3v2Tag;
use crate::macros::{err, try_vec};
use crate::util::io::{ReadExt, StreamLen};

use std::io::{Read, Seek, SeekFrom};
use std::marker::PhantomData;

use byteorder::{ByteOrder, ReadBytesExt};

/// The header of a single chunk, as found while walking a file
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ChunkHeader {
	pub id: [u8; 4],
	pub size: u64,
	/// The offset of the first byte of the chunk id
	pub start: u64,
	header_len: u64,
}

impl ChunkHeader {
	/// A 4-byte id followed by a 4-byte size (RIFF, AIFF)
	pub const SHORT_HEADER_SIZE: u64 = 8;
	/// A 4-byte id followed by an 8-byte size (DSF, DFF)
	pub const LONG_HEADER_SIZE: u64 = 12;

	/// Read an id and a 32-bit size in the byte order `B`
	pub fn read<B, R>(reader: &mut R) -> Result<Self>
	where
		B: ByteOrder,
		R: Read + Seek,
	{
		let start = reader.stream_position()?;
		let id = reader.read_fourcc()?;
		let size = reader.read_u32::<B>()?;

		Ok(Self {
			id,
			size: u64::from(size),
			start,
			header_len: Self::SHORT_HEADER_SIZE,
		})
	}

	/// Read an id and a 64-bit size in the byte order `B`
	pub fn read_long<B, R>(reader: &mut R) -> Result<Self>
	where
		B: ByteOrder,
		R: Read + Seek,
	{
		let start = reader.stream_position()?;
		let id = reader.read_fourcc()?;
		let size = reader.read_u64::<B>()?;

		Ok(Self {
			id,
			size,
			start,
			header_len: Self::LONG_HEADER_SIZE,
		})
	}

	/// The offset of the first byte of chunk data
	pub fn data_start(&self) -> u64 {
		self.start + self.header_len
	}

	/// The offset immediately after the chunk data, excluding any pad byte
	pub fn end(&self) -> u64 {
		self.data_start().saturating_add(self.size)
	}

	/// The offset where the next chunk begins in a padded container
	pub fn padded_end(&self) -> u64 {
		self.end().saturating_add(self.size % 2)
	}
}

/// Skip the pad byte that follows an odd-sized chunk
///
/// The reader is expected to be positioned at [`ChunkHeader::end`]. Nothing happens when the
/// chunk is even-sized or the stream ends right after the chunk data.
pub(crate) fn ensure_on_even_boundary<R>(reader: &mut R, header: &ChunkHeader) -> Result<()>
where
	R: Read + Seek,
{
	if header.size % 2 == 0 {
		return Ok(());
	}

	let position = reader.stream_position()?;
	if position < reader.total_len()? {
		reader.seek(SeekFrom::Current(1))?;
	}

	Ok(())
}

/// A walker over the chunks of a RIFF or AIFF file
pub(crate) struct Chunks<B>
where
	B: ByteOrder,
{
	pub header: ChunkHeader,
	remaining_size: u64,
	_phantom: PhantomData<B>,
}

impl<B: ByteOrder> Chunks<B> {
	#[must_use]
	pub const fn new(file_size: u64) -> Self {
		Self {
			header: ChunkHeader {
				id: [0; 4],
				size: 0,
				start: 0,
				header_len: ChunkHeader::SHORT_HEADER_SIZE,
			},
			remaining_size: file_size,
			_phantom: PhantomData,
		}
	}

	pub fn next<R>(&mut self, data: &mut R) -> Result<bool>
	where
		R: Read + Seek,
	{
		if self.remaining_size < ChunkHeader::SHORT_HEADER_SIZE {
			return Ok(false);
		}

		self.header = ChunkHeader::read::<B, R>(data)?;
		self.remaining_size = self
			.remaining_size
			.saturating_sub(ChunkHeader::SHORT_HEADER_SIZE);

		log::trace!(
			"Found chunk {:?} ({} bytes) at offset {}",
			String::from_utf8_lossy(&self.header.id),
			self.header.size,
			self.header.start
		);

		Ok(true)
	}

	pub fn fourcc(&self) -> [u8; 4] {
		self.header.id
	}

	pub fn size(&self) -> u64 {
		self.header.size
	}

	/// Read the entire chunk, leaving the reader at the start of the next one
	pub fn content<R>(&mut self, data: &mut R) -> Result<Vec<u8>>
	where
		R: Read + Seek,
	{
		let size = self.header.size;
		if size > self.remaining_size {
			err!(SizeMismatch);
		}

		let mut content = try_vec![0; size as usize];
		data.read_exact(&mut content)?;

		self.remaining_size = self.remaining_size.saturating_sub(size);
		self.correct_position(data)?;

		Ok(content)
	}

	pub fn id3_chunk<R>(&mut self, data: &mut R, parse_options: ParseOptions) -> Result<Id3v2Tag>
	where
		R: Read + Seek,
	{
		let content = self.content(data)?;

		let reader = &mut &*content;
		let header = Id3v2Header::parse(reader)?;

		parse_id3v2(reader, header, parse_options)
	}

	pub fn skip<R>(&mut self, data: &mut R) -> Result<()>
	where
		R: Read + Seek,
	{
		data.seek(SeekFrom::Start(self.header.end()))?;
		self.remaining_size = self.remaining_size.saturating_sub(self.header.size);

		self.correct_position(data)
	}

	fn correct_position<R>(&mut self, data: &mut R) -> Result<()>
	where
		R: Read + Seek,
	{
		// The pad byte is NOT the null terminator of the value, and it is NOT included in the chunk's size
		if self.header.size % 2 != 0 {
			ensure_on_even_boundary(data, &self.header)?;
			self.remaining_size = self.remaining_size.saturating_sub(1);
		}

		Ok(())
	}
}
