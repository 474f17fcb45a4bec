mod chunk_file;

pub(crate) use chunk_file::write_to_chunk_file;

use super::frame::content::encode_content;
use super::{FrameFlags, FrameId, Id3v2Tag, Id3v2Version};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::util::frame_ids;
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::macros::encode_err;

use byteorder::{BigEndian, ByteOrder};

const HEADER_SIZE: usize = 10;

/// Encode a tag, ready to be placed in a file
///
/// The tag is written as `WriteOptions::id3v2_version`, or its original version if none is set.
/// An empty `Vec` is returned when there is nothing to write, which means the tag should be
/// removed from the file.
pub(crate) fn create_tag(tag: &Id3v2Tag, write_options: WriteOptions) -> Result<Vec<u8>> {
	let version = write_options
		.id3v2_version
		.unwrap_or(tag.original_version);
	let codec = version.codec();

	log::debug!(
		"Creating ID3v2.{} tag from {} frames",
		version.major(),
		tag.len()
	);

	let mut id3v2 = Vec::new();
	id3v2.extend_from_slice(b"ID3");
	id3v2.extend_from_slice(&[version.major(), 0, tag.flags().as_byte(version)]);
	// Size placeholder
	id3v2.extend_from_slice(&[0; 4]);

	let mut frame_count = 0;
	for frame in tag.frames() {
		if frame.is_empty() && !write_options.keep_empty_fields {
			log::trace!("Skipping empty frame {}", frame.id());
			continue;
		}

		let Some(id) = frame_ids::translate(frame.id_str(), tag.original_version, version) else {
			log::warn!(
				"Frame {} has no ID3v2.{} equivalent, dropping it",
				frame.id(),
				version.major()
			);
			continue;
		};

		let Some(flags) = flags_for_write(frame.flags(), version) else {
			log::warn!(
				"Encrypted frame {} can't be written to ID3v2.2, dropping it",
				frame.id()
			);
			continue;
		};

		let id = FrameId::new(&id)?;
		let content = encode_content(frame.value(), &id, version)?;
		id3v2.extend(codec.encode_header(&id, content.len(), &flags)?);
		id3v2.extend(content);
		frame_count += 1;
	}

	if frame_count == 0 {
		log::debug!("No frames to write, the tag will be removed");
		return Ok(Vec::new());
	}

	let padding = write_options.preferred_padding.unwrap_or(0) as usize;
	if padding > 0 {
		log::trace!("Padding tag with {} bytes", padding);
		id3v2.resize(id3v2.len() + padding, 0);
	}

	// The body must be even so that the tag fits its container without extra padding
	if (id3v2.len() - HEADER_SIZE) % 2 != 0 {
		log::trace!("Adding a pad byte for an even tag length");
		id3v2.push(0);
	}

	let Ok(body_size) = u32::try_from(id3v2.len() - HEADER_SIZE) else {
		crate::macros::err!(TooMuchData);
	};

	id3v2[6..HEADER_SIZE].copy_from_slice(&body_size.synch()?.to_be_bytes());

	// The size field must describe exactly the bytes that follow it
	let written = BigEndian::read_u32(&id3v2[6..HEADER_SIZE]).unsynch();
	if written as usize != id3v2.len() - HEADER_SIZE {
		encode_err!(@BAIL "ID3v2 tag size does not match the encoded length");
	}

	Ok(id3v2)
}

// Compression and unsynchronisation are never applied on write. Encrypted frames keep their flags,
// since their content can't be touched.
fn flags_for_write(flags: FrameFlags, version: Id3v2Version) -> Option<FrameFlags> {
	if flags.encryption.is_some() {
		if version == Id3v2Version::V2 {
			return None;
		}

		return Some(FrameFlags {
			unsynchronisation: false,
			..flags
		});
	}

	Some(FrameFlags {
		compression: false,
		unsynchronisation: false,
		data_length_indicator: None,
		..flags
	})
}
