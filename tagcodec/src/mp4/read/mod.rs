mod atom_reader;

use super::Mp4File;
use super::atom_info::AtomInfo;
use super::moov::Moov;
use super::properties::{Mp4Properties, read_properties};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::Result;
use crate::macros::{decode_err, err};
use crate::util::io::StreamLen;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};

pub(super) use atom_reader::AtomReader;

/// Verify the `ftyp` atom, returning the major brand
pub(super) fn verify_mp4<R>(reader: &mut AtomReader<R>) -> Result<String>
where
	R: Read + Seek,
{
	let Some(atom) = reader.next()? else {
		err!(UnknownFormat);
	};

	if &atom.ident != b"ftyp" {
		err!(UnknownFormat);
	}

	// size + identifier + major brand
	if atom.len < 12 {
		decode_err!(@BAIL Mp4, "\"ftyp\" atom too short");
	}

	let mut major_brand = [0; 4];
	reader.read_exact(&mut major_brand)?;

	reader.seek(SeekFrom::Start(atom.end()))?;

	let major_brand = String::from_utf8_lossy(&major_brand).into_owned();

	log::debug!("Verified to be an MP4 file. Major brand: {}", major_brand);
	Ok(major_brand)
}

pub(crate) fn read_from<R>(data: &mut R, parse_options: ParseOptions) -> Result<Mp4File>
where
	R: Read + Seek,
{
	data.rewind()?;

	let mut reader = AtomReader::new(data, parse_options.parsing_mode)?;
	let file_length = reader.total_len()?;

	let ftyp = verify_mp4(&mut reader)?;

	let moov_info = Moov::find(&mut reader)?;
	reader.reset_bounds(moov_info.start + moov_info.header_size(), moov_info.content_len())?;

	let moov = Moov::parse(&mut reader, parse_options)?;

	let mut properties = Mp4Properties::default();
	if parse_options.read_properties {
		reader.reset_bounds(0, file_length)?;
		properties = read_properties(&mut reader, &moov, file_length)?;
	}

	Ok(Mp4File {
		ftyp,
		ilst: moov.ilst,
		properties,
	})
}

/// Seek the reader to the end of `atom`
pub(super) fn skip_atom<R>(reader: &mut R, atom: &AtomInfo) -> Result<()>
where
	R: Read + Seek,
{
	log::trace!("Skipping {} bytes", atom.content_len());

	reader.seek(SeekFrom::Start(atom.end()))?;
	Ok(())
}

/// Find the first child atom of `parent` with the given identifier
///
/// The reader is expected to be at the start of the parent's children, and is left at the start
/// of the found atom's content.
pub(super) fn find_child_atom<R>(
	reader: &mut R,
	parent_end: u64,
	expected: [u8; 4],
	parse_mode: ParsingMode,
) -> Result<Option<AtomInfo>>
where
	R: Read + Seek,
{
	loop {
		let position = reader.stream_position()?;
		if position + 8 > parent_end {
			return Ok(None);
		}

		let Some(atom) = AtomInfo::read(reader, parent_end - position, parse_mode)? else {
			return Ok(None);
		};

		if atom.ident == expected {
			return Ok(Some(atom));
		}

		skip_atom(reader, &atom)?;
	}
}

/// Check whether a `meta` atom has a version and flags, skipping them if so
///
/// The reader is expected to be at the start of the `meta` content. Some encoders write it as a
/// plain container.
pub(super) fn meta_is_full<R>(reader: &mut R) -> Result<bool>
where
	R: Read + Seek,
{
	let _version_flags = reader.read_u32::<BigEndian>()?;

	// If this is a plain container, these are the identifier of the first child
	let mut possible_ident = [0; 4];
	reader.read_exact(&mut possible_ident)?;

	match &possible_ident {
		b"hdlr" | b"ilst" | b"mhdr" | b"ctry" | b"lang" | b"free" => {
			log::warn!("File contains a non-full 'meta' atom");

			reader.seek(SeekFrom::Current(-8))?;
			Ok(false)
		},
		_ => {
			reader.seek(SeekFrom::Current(-4))?;
			Ok(true)
		},
	}
}
