use super::content::parse_content;
use super::{Frame, FrameFlags, FrameId, FrameValue};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::header::{Id3v2TagFlags, Id3v2Version};
use crate::id3::v2::util::synchsafe::resynchronize;
use crate::macros::{parse_mode_choice, try_vec};

use std::io::Read;

pub(crate) enum ParsedFrame {
	Next(Frame),
	Skip,
	Eof,
}

impl ParsedFrame {
	pub(crate) fn read<R>(
		reader: &mut R,
		version: Id3v2Version,
		tag_flags: Id3v2TagFlags,
		parse_options: ParseOptions,
	) -> Result<Self>
	where
		R: Read,
	{
		let parse_mode = parse_options.parsing_mode;
		let codec = version.codec();

		let mut header_buf = [0; 10];
		let header_buf = &mut header_buf[..codec.frame_header_size()];

		let filled = fill_buf(reader, header_buf)?;
		if filled == 0 || header_buf[0] == 0 {
			return Ok(Self::Eof);
		}

		if filled < header_buf.len() {
			log::warn!("Frame header is truncated, treating it as the end of the tag");
			return parse_mode_choice!(
				parse_mode,
				STRICT: Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into()),
				DEFAULT: Ok(Self::Eof)
			);
		}

		let Some(header) = codec.decode_header(header_buf)? else {
			return Ok(Self::Eof);
		};

		let id = match header.id() {
			Ok(id) => id,
			Err(err) => {
				if parse_mode == ParsingMode::Strict {
					return Err(err);
				}

				log::warn!("Failed to read frame header, skipping: {}", err);
				skip_frame(reader, header.size)?;
				return Ok(Self::Skip);
			},
		};

		log::trace!("Found frame {} ({} bytes)", id, header.size);

		let mut content = try_vec![0; header.size as usize];
		if let Err(err) = reader.read_exact(&mut content) {
			if parse_mode == ParsingMode::Strict || err.kind() != std::io::ErrorKind::UnexpectedEof
			{
				return Err(err.into());
			}

			log::warn!("Frame {} extends past the end of the tag, stopping", id);
			return Ok(Self::Eof);
		}

		if header.size == 0 {
			if parse_mode == ParsingMode::Strict {
				return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
			}

			log::debug!("Encountered a zero length frame, skipping");
			return Ok(Self::Skip);
		}

		if !parse_options.read_cover_art && matches!(id.as_str(), "APIC" | "PIC") {
			return Ok(Self::Skip);
		}

		let mut flags = header.flags;

		// In ID3v2.4, the tag-wide flag only says that every frame is unsynchronised
		if version == Id3v2Version::V4 && tag_flags.unsynchronisation {
			flags.unsynchronisation = true;
		}

		let mut body = &content[..];
		if let Err(err) = codec.read_flag_data(&mut flags, &mut body) {
			return bad_frame(err, parse_mode, id, flags, content);
		}

		let mut body = body.to_vec();
		if flags.unsynchronisation {
			body = resynchronize(&body);
			flags.unsynchronisation = false;
		}

		// Nothing further can be done with encrypted frames, the compression flag and data length
		// indicator stay with the data
		if flags.encryption.is_some() {
			if flags.compression && flags.data_length_indicator.is_none() {
				return Err(Id3v2Error::new(Id3v2ErrorKind::MissingDataLengthIndicator).into());
			}

			log::debug!("Keeping encrypted frame {} as binary", id);
			return Ok(Self::Next(Frame {
				id,
				flags,
				value: FrameValue::Binary(body),
			}));
		}

		if flags.compression {
			match decompress(&body) {
				Ok(decompressed) => {
					body = decompressed;
					flags.compression = false;
					flags.data_length_indicator = None;
				},
				Err(err) => return bad_frame(err, parse_mode, id, flags, body),
			}
		}

		match parse_content(&body, &id, version) {
			Ok(value) => Ok(Self::Next(Frame { id, flags, value })),
			Err(err) => bad_frame(err, parse_mode, id, flags, body),
		}
	}
}

// A frame whose content couldn't be understood
//
// * Strict: the error is returned
// * BestAttempt: the frame is kept as binary
// * Relaxed: the frame is dropped
fn bad_frame(
	err: crate::error::TagCodecError,
	parse_mode: ParsingMode,
	id: FrameId,
	flags: FrameFlags,
	content: Vec<u8>,
) -> Result<ParsedFrame> {
	parse_mode_choice!(
		parse_mode,
		STRICT: Err(err),
		RELAXED: {
			log::warn!("Failed to parse frame {}, discarding: {}", id, err);
			Ok(ParsedFrame::Skip)
		},
		DEFAULT: {
			log::warn!("Failed to parse frame {}, keeping it as binary: {}", id, err);
			Ok(ParsedFrame::Next(Frame {
				id,
				flags,
				value: FrameValue::Binary(content),
			}))
		}
	)
}

#[cfg(feature = "id3v2_compression_support")]
fn decompress(content: &[u8]) -> Result<Vec<u8>> {
	use crate::util::alloc::ALLOCATION_LIMIT;

	let mut decompressed = Vec::new();
	flate2::read::ZlibDecoder::new(content)
		.take(ALLOCATION_LIMIT as u64 + 1)
		.read_to_end(&mut decompressed)?;

	if decompressed.len() > ALLOCATION_LIMIT {
		crate::macros::err!(TooMuchData);
	}

	Ok(decompressed)
}

#[cfg(not(feature = "id3v2_compression_support"))]
fn decompress(_: &[u8]) -> Result<Vec<u8>> {
	Err(Id3v2Error::new(Id3v2ErrorKind::CompressedFrameEncountered).into())
}

// Read until `buf` is full or the reader is exhausted
fn fill_buf<R>(reader: &mut R, buf: &mut [u8]) -> Result<usize>
where
	R: Read,
{
	let mut filled = 0;
	while filled < buf.len() {
		match reader.read(&mut buf[filled..]) {
			Ok(0) => break,
			Ok(n) => filled += n,
			Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
			Err(err) => return Err(err.into()),
		}
	}

	Ok(filled)
}

fn skip_frame(reader: &mut impl Read, size: u32) -> Result<()> {
	log::trace!("Skipping frame of size {}", size);

	let size = u64::from(size);
	let skipped = std::io::copy(&mut reader.take(size), &mut std::io::sink())?;
	if skipped != size {
		log::warn!("Skipped frame extends past the end of the tag");
	}

	Ok(())
}
