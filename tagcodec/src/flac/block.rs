use crate::error::Result;
use crate::macros::{decode_err, err, try_vec};

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

/// The largest length a block header can express (24 bits)
pub(super) const MAX_BLOCK_LENGTH: usize = 0x00FF_FFFF;
pub(super) const BLOCK_HEADER_SIZE: usize = 4;

/// The type of a FLAC metadata block
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BlockType {
	StreamInfo,
	Padding,
	Application,
	SeekTable,
	VorbisComment,
	CueSheet,
	Picture,
}

impl BlockType {
	/// Get a `BlockType` from its 7-bit identifier
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::flac::BlockType;
	///
	/// assert_eq!(BlockType::from_u8(4), Some(BlockType::VorbisComment));
	/// assert_eq!(BlockType::from_u8(127), None);
	/// ```
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::StreamInfo),
			1 => Some(Self::Padding),
			2 => Some(Self::Application),
			3 => Some(Self::SeekTable),
			4 => Some(Self::VorbisComment),
			5 => Some(Self::CueSheet),
			6 => Some(Self::Picture),
			_ => None,
		}
	}

	/// The 7-bit identifier of the block type
	pub fn as_u8(self) -> u8 {
		match self {
			Self::StreamInfo => 0,
			Self::Padding => 1,
			Self::Application => 2,
			Self::SeekTable => 3,
			Self::VorbisComment => 4,
			Self::CueSheet => 5,
			Self::Picture => 6,
		}
	}
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct BlockHeader {
	pub(crate) last: bool,
	pub(crate) ty: BlockType,
	pub(crate) length: u32,
}

impl BlockHeader {
	pub(crate) fn read<R>(data: &mut R) -> Result<Self>
	where
		R: Read,
	{
		let byte = data.read_u8()?;
		let last = (byte & 0x80) != 0;

		let Some(ty) = BlockType::from_u8(byte & 0x7F) else {
			decode_err!(@BAIL Flac, "Encountered an unknown metadata block type");
		};

		let length = data.read_u24::<BigEndian>()?;

		Ok(Self { last, ty, length })
	}

	fn write_to<W>(self, writer: &mut W) -> Result<()>
	where
		W: Write,
	{
		let mut byte = self.ty.as_u8();
		if self.last {
			byte |= 0x80;
		}

		writer.write_u8(byte)?;
		writer.write_u24::<BigEndian>(self.length)?;

		Ok(())
	}
}

pub(crate) struct Block {
	pub(crate) header: BlockHeader,
	pub(crate) content: Vec<u8>,
	pub(crate) start: u64,
	pub(crate) end: u64,
}

impl Block {
	/// Read a block, only keeping the content of the types accepted by `predicate`
	pub(crate) fn read<R, P>(data: &mut R, mut predicate: P) -> Result<Self>
	where
		R: Read + Seek,
		P: FnMut(BlockType) -> bool,
	{
		let start = data.stream_position()?;
		let header = BlockHeader::read(data)?;

		log::trace!(
			"Reading FLAC block, type: {:?}, size: {}",
			header.ty,
			header.length
		);

		let mut content;
		if predicate(header.ty) {
			content = try_vec![0; header.length as usize];
			data.read_exact(&mut content)?;
		} else {
			content = Vec::new();
			data.seek(SeekFrom::Current(i64::from(header.length)))?;
		}

		let end = data.stream_position()?;

		Ok(Self {
			header,
			content,
			start,
			end,
		})
	}

	pub(crate) fn new(ty: BlockType, content: Vec<u8>) -> Result<Self> {
		if content.len() > MAX_BLOCK_LENGTH {
			err!(TooMuchData);
		}

		let length = content.len() as u32;
		Ok(Self {
			header: BlockHeader {
				last: false,
				ty,
				length,
			},
			content,
			start: 0,
			end: 0,
		})
	}

	pub(crate) fn new_padding(size: usize) -> Result<Self> {
		Self::new(BlockType::Padding, try_vec![0; size])
	}

	/// The size of the block, including its header
	pub(crate) fn encoded_len(&self) -> usize {
		BLOCK_HEADER_SIZE + self.content.len()
	}

	pub(crate) fn write_to<W>(&self, writer: &mut W) -> Result<()>
	where
		W: Write,
	{
		self.header.write_to(writer)?;
		writer.write_all(&self.content)?;

		Ok(())
	}
}
