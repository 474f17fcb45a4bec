use super::frame::codec::{FrameCodec, V22_CODEC, V23_CODEC, V24_CODEC};
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::macros::err;

use std::io::Read;

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};

/// The ID3v2 version
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum Id3v2Version {
	/// ID3v2.2
	V2,
	/// ID3v2.3
	V3,
	/// ID3v2.4
	V4,
}

impl Id3v2Version {
	/// The major version byte, as written after the `ID3` signature
	pub fn major(self) -> u8 {
		match self {
			Self::V2 => 2,
			Self::V3 => 3,
			Self::V4 => 4,
		}
	}

	/// The codec responsible for frame headers of this version
	pub(crate) fn codec(self) -> &'static dyn FrameCodec {
		match self {
			Self::V2 => &V22_CODEC,
			Self::V3 => &V23_CODEC,
			Self::V4 => &V24_CODEC,
		}
	}
}

/// Flags that apply to the entire tag
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct Id3v2TagFlags {
	/// Whether or not all frames are unsynchronised. See [`FrameFlags::unsynchronisation`](crate::id3::v2::FrameFlags::unsynchronisation)
	pub unsynchronisation: bool,
	/// Indicates if the tag is in an experimental stage
	pub experimental: bool,
	/// Indicates that the tag includes a footer
	///
	/// A footer will never be written.
	pub footer: bool,
}

impl Id3v2TagFlags {
	/// The flag byte written to a new tag
	///
	/// Frames are never unsynchronised on write and no footer is produced, only the
	/// experimental indicator carries over.
	pub(crate) fn as_byte(&self, version: Id3v2Version) -> u8 {
		match version {
			Id3v2Version::V3 | Id3v2Version::V4 if self.experimental => 0x20,
			_ => 0,
		}
	}
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Id3v2Header {
	pub version: Id3v2Version,
	pub flags: Id3v2TagFlags,
	/// The size of everything following the header, excluding the footer
	pub size: u32,
	/// The number of bytes of `size` taken by the extended header
	pub extended_size: u32,
}

impl Id3v2Header {
	pub(crate) fn parse<R>(bytes: &mut R) -> Result<Self>
	where
		R: Read,
	{
		log::debug!("Parsing ID3v2 header");

		let mut header = [0; 10];
		bytes.read_exact(&mut header)?;

		if &header[..3] != b"ID3" {
			err!(FakeTag);
		}

		// Version is stored as [major, minor], the minor revision is irrelevant unless it's an error
		let version = match header[3] {
			2 => Id3v2Version::V2,
			3 => Id3v2Version::V3,
			4 => Id3v2Version::V4,
			major => {
				return Err(
					Id3v2Error::new(Id3v2ErrorKind::BadId3v2Version(major, header[4])).into(),
				);
			},
		};

		let flags = header[5];

		// ID3v2.2 never defined a compression scheme, the tag can't be read
		if version == Id3v2Version::V2 && flags & 0x40 == 0x40 {
			return Err(Id3v2Error::new(Id3v2ErrorKind::V2Compression).into());
		}

		let flags_parsed = Id3v2TagFlags {
			unsynchronisation: flags & 0x80 == 0x80,
			experimental: version != Id3v2Version::V2 && flags & 0x20 == 0x20,
			footer: version == Id3v2Version::V4 && flags & 0x10 == 0x10,
		};

		let size = BigEndian::read_u32(&header[6..]).unsynch();
		let mut extended_size = 0;

		if version != Id3v2Version::V2 && flags & 0x40 == 0x40 {
			extended_size = skip_extended_header(bytes, version)?;

			if extended_size >= size {
				return Err(Id3v2Error::new(Id3v2ErrorKind::BadExtendedHeaderSize).into());
			}
		}

		log::trace!(
			"ID3v2 header: version {:?}, size {}, extended header size {}",
			version,
			size,
			extended_size
		);

		Ok(Id3v2Header {
			version,
			flags: flags_parsed,
			size,
			extended_size,
		})
	}

	/// The size of the tag including the header and footer
	pub(crate) fn full_tag_size(&self) -> u32 {
		self.size + 10 + if self.flags.footer { 10 } else { 0 }
	}
}

// Returns the total number of bytes the extended header occupies
//
// The extended header only carries a CRC and, in ID3v2.4, restrictions. Neither survive a
// rewrite, so the contents are discarded.
fn skip_extended_header<R>(bytes: &mut R, version: Id3v2Version) -> Result<u32>
where
	R: Read,
{
	let raw_size = bytes.read_u32::<BigEndian>()?;

	// ID3v2.3: a plain integer that excludes itself
	// ID3v2.4: a synchsafe integer that includes itself
	let (total, remaining) = match version {
		Id3v2Version::V4 => {
			let size = raw_size.unsynch();
			if size < 6 {
				return Err(Id3v2Error::new(Id3v2ErrorKind::BadExtendedHeaderSize).into());
			}

			(size, size - 4)
		},
		_ => {
			if raw_size < 6 {
				return Err(Id3v2Error::new(Id3v2ErrorKind::BadExtendedHeaderSize).into());
			}

			(raw_size.saturating_add(4), raw_size)
		},
	};

	let skipped = std::io::copy(
		&mut bytes.by_ref().take(u64::from(remaining)),
		&mut std::io::sink(),
	)?;
	if skipped != u64::from(remaining) {
		return Err(Id3v2Error::new(Id3v2ErrorKind::BadExtendedHeaderSize).into());
	}

	Ok(total)
}
