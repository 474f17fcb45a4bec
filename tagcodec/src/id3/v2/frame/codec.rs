//! Version specific frame header handling
//!
//! Every ID3v2 revision lays out its frame headers differently:
//!
//! | Version | Header size | Id       | Size                   | Flags   |
//! |---------|-------------|----------|------------------------|---------|
//! | v2.2    | 6           | 3 bytes  | 24-bit                 | none    |
//! | v2.3    | 10          | 4 bytes  | 32-bit                 | 2 bytes |
//! | v2.4    | 10          | 4 bytes  | 32-bit synchsafe       | 2 bytes |
//!
//! Everything past the header (the frame bodies) is shared between the versions.

use super::{FrameFlags, FrameId, V23_FLAGS, V24_FLAGS};
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::macros::err;

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};

/// A decoded frame header
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct FrameHeader {
	raw_id: [u8; 4],
	id_len: usize,
	/// The size of the frame, including any flag data
	pub size: u32,
	pub flags: FrameFlags,
}

impl FrameHeader {
	pub(crate) fn id(&self) -> Result<FrameId> {
		FrameId::from_bytes(&self.raw_id[..self.id_len])
	}
}

/// Encodes and decodes the frame headers of one ID3v2 revision
pub(crate) trait FrameCodec: Sync {
	/// The size of a frame header in bytes
	fn frame_header_size(&self) -> usize;

	/// Decode a frame header from exactly [`frame_header_size`](FrameCodec::frame_header_size) bytes
	///
	/// Returns `Ok(None)` when the header is the start of the tag padding.
	fn decode_header(&self, header: &[u8]) -> Result<Option<FrameHeader>>;

	/// Strip the extra data the flags announce from the start of the frame content
	///
	/// The values are stored in `flags`.
	fn read_flag_data(&self, flags: &mut FrameFlags, content: &mut &[u8]) -> Result<()>;

	/// Encode a frame header, including any extra data the flags announce
	///
	/// `content_len` is the size of the frame body alone.
	fn encode_header(&self, id: &FrameId, content_len: usize, flags: &FrameFlags)
	-> Result<Vec<u8>>;
}

fn is_padding(header: &[u8]) -> bool {
	header[0] == 0
}

fn check_id_len(id: &FrameId, expected: usize) -> Result<()> {
	if id.as_str().len() != expected {
		return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrame(
			id.to_string(),
			"Frame ID is not valid for the target version",
		))
		.into());
	}

	Ok(())
}

fn content_size(content_len: usize, extra_len: usize) -> Result<u32> {
	match u32::try_from(content_len + extra_len) {
		Ok(size) => Ok(size),
		Err(_) => err!(TooMuchData),
	}
}

pub(crate) struct V22Codec;
pub(crate) struct V23Codec;
pub(crate) struct V24Codec;

pub(crate) static V22_CODEC: V22Codec = V22Codec;
pub(crate) static V23_CODEC: V23Codec = V23Codec;
pub(crate) static V24_CODEC: V24Codec = V24Codec;

impl FrameCodec for V22Codec {
	fn frame_header_size(&self) -> usize {
		6
	}

	fn decode_header(&self, header: &[u8]) -> Result<Option<FrameHeader>> {
		if is_padding(header) {
			return Ok(None);
		}

		let mut raw_id = [0; 4];
		raw_id[..3].copy_from_slice(&header[..3]);

		Ok(Some(FrameHeader {
			raw_id,
			id_len: 3,
			size: BigEndian::read_u24(&header[3..6]),
			flags: FrameFlags::default(),
		}))
	}

	fn read_flag_data(&self, _flags: &mut FrameFlags, _content: &mut &[u8]) -> Result<()> {
		Ok(())
	}

	fn encode_header(
		&self,
		id: &FrameId,
		content_len: usize,
		_flags: &FrameFlags,
	) -> Result<Vec<u8>> {
		check_id_len(id, 3)?;

		let size = content_size(content_len, 0)?;
		if size > 0xFF_FFFF {
			err!(TooMuchData);
		}

		let mut header = Vec::with_capacity(6);
		header.extend_from_slice(id.as_str().as_bytes());
		header.write_u24::<BigEndian>(size)?;

		Ok(header)
	}
}

impl FrameCodec for V23Codec {
	fn frame_header_size(&self) -> usize {
		10
	}

	fn decode_header(&self, header: &[u8]) -> Result<Option<FrameHeader>> {
		if is_padding(header) {
			return Ok(None);
		}

		let mut raw_id = [0; 4];
		raw_id.copy_from_slice(&header[..4]);

		Ok(Some(FrameHeader {
			raw_id,
			id_len: 4,
			size: BigEndian::read_u32(&header[4..8]),
			flags: FrameFlags::decode(BigEndian::read_u16(&header[8..10]), &V23_FLAGS),
		}))
	}

	// Order: decompressed size, encryption method, group identifier
	fn read_flag_data(&self, flags: &mut FrameFlags, content: &mut &[u8]) -> Result<()> {
		if flags.compression {
			flags.data_length_indicator = Some(content.read_u32::<BigEndian>()?);
		}

		if let Some(method) = flags.encryption.as_mut() {
			*method = content.read_u8()?;
		}

		if let Some(group) = flags.grouping_identity.as_mut() {
			*group = content.read_u8()?;
		}

		Ok(())
	}

	fn encode_header(
		&self,
		id: &FrameId,
		content_len: usize,
		flags: &FrameFlags,
	) -> Result<Vec<u8>> {
		check_id_len(id, 4)?;

		let mut extra = Vec::new();
		if flags.compression {
			let Some(len) = flags.data_length_indicator else {
				return Err(Id3v2Error::new(Id3v2ErrorKind::MissingDataLengthIndicator).into());
			};

			extra.write_u32::<BigEndian>(len)?;
		}

		if let Some(method) = flags.encryption {
			extra.push(method);
		}

		if let Some(group) = flags.grouping_identity {
			extra.push(group);
		}

		let size = content_size(content_len, extra.len())?;

		let mut header = Vec::with_capacity(10 + extra.len());
		header.extend_from_slice(id.as_str().as_bytes());
		header.write_u32::<BigEndian>(size)?;
		header.write_u16::<BigEndian>(flags.encode(&V23_FLAGS))?;
		header.extend_from_slice(&extra);

		Ok(header)
	}
}

impl FrameCodec for V24Codec {
	fn frame_header_size(&self) -> usize {
		10
	}

	fn decode_header(&self, header: &[u8]) -> Result<Option<FrameHeader>> {
		if is_padding(header) {
			return Ok(None);
		}

		let mut raw_id = [0; 4];
		raw_id.copy_from_slice(&header[..4]);

		Ok(Some(FrameHeader {
			raw_id,
			id_len: 4,
			size: BigEndian::read_u32(&header[4..8]).unsynch(),
			flags: FrameFlags::decode(BigEndian::read_u16(&header[8..10]), &V24_FLAGS),
		}))
	}

	// Order: group identifier, encryption method, data length indicator
	fn read_flag_data(&self, flags: &mut FrameFlags, content: &mut &[u8]) -> Result<()> {
		if let Some(group) = flags.grouping_identity.as_mut() {
			*group = content.read_u8()?;
		}

		if let Some(method) = flags.encryption.as_mut() {
			*method = content.read_u8()?;
		}

		// Some encoders set the compression flag without the data length indicator flag, the
		// indicator is still written
		if flags.data_length_indicator.is_some() || flags.compression {
			flags.data_length_indicator = Some(content.read_u32::<BigEndian>()?.unsynch());
		}

		Ok(())
	}

	fn encode_header(
		&self,
		id: &FrameId,
		content_len: usize,
		flags: &FrameFlags,
	) -> Result<Vec<u8>> {
		check_id_len(id, 4)?;

		let mut extra = Vec::new();
		if let Some(group) = flags.grouping_identity {
			extra.push(group);
		}

		if let Some(method) = flags.encryption {
			extra.push(method);
		}

		match flags.data_length_indicator {
			Some(len) => extra.write_u32::<BigEndian>(len.synch()?)?,
			None if flags.compression => {
				return Err(Id3v2Error::new(Id3v2ErrorKind::MissingDataLengthIndicator).into());
			},
			None => {},
		}

		let size = content_size(content_len, extra.len())?.synch()?;

		let mut header = Vec::with_capacity(10 + extra.len());
		header.extend_from_slice(id.as_str().as_bytes());
		header.write_u32::<BigEndian>(size)?;
		header.write_u16::<BigEndian>(flags.encode(&V24_FLAGS))?;
		header.extend_from_slice(&extra);

		Ok(header)
	}
}
