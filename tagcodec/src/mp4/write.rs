use super::atom_info::{ATOM_HEADER_LEN, AtomInfo};
use super::ilst::Mp4Ilst;
use super::ilst::write::build_ilst;
use super::read::{AtomReader, meta_is_full, skip_atom, verify_mp4};
use crate::config::{ParsingMode, WriteOptions};
use crate::error::{Result, TagCodecError};
use crate::macros::{encode_err, err};
use crate::util::io::{FileLike, Length, Truncate, overwrite_changed};

use std::io::{Cursor, Read, Seek};
use std::ops::Range;

use byteorder::{BigEndian, ByteOrder};

const PARSE_MODE: ParsingMode = ParsingMode::BestAttempt;

/// A `hdlr` atom declaring an iTunes style `meta`
#[rustfmt::skip]
const HDLR: [u8; 33] = [
	0, 0, 0, 33, b'h', b'd', b'l', b'r',
	// Version/flags, pre-defined
	0, 0, 0, 0, 0, 0, 0, 0,
	b'm', b'd', b'i', b'r', b'a', b'p', b'p', b'l',
	// Reserved
	0, 0, 0, 0, 0, 0, 0, 0,
	// Empty name
	0,
];

/// Containers that are descended into, everything else is a leaf
#[rustfmt::skip]
const IMPORTANT_CONTAINERS: &[[u8; 4]] = &[
	*b"moov",
		*b"udta",
			*b"meta",
		*b"trak",
			*b"mdia",
				*b"minf",
					*b"stbl",
	*b"moof",
		*b"traf",
];

/// An [`AtomInfo`] along with the children of the containers we care about
#[derive(Debug)]
pub(super) struct ContextualAtom {
	pub(super) info: AtomInfo,
	pub(super) children: Vec<ContextualAtom>,
}

impl ContextualAtom {
	pub(super) fn read<R>(
		reader: &mut R,
		reader_len: &mut u64,
		parse_mode: ParsingMode,
	) -> Result<Option<ContextualAtom>>
	where
		R: Read + Seek,
	{
		if *reader_len == 0 {
			return Ok(None);
		}

		if *reader_len < ATOM_HEADER_LEN {
			err!(BadAtom("Found trailing bytes too short to be an atom"));
		}

		let Some(info) = AtomInfo::read(reader, *reader_len, parse_mode)? else {
			return Ok(None);
		};

		*reader_len = reader_len.saturating_sub(info.len);

		// Past the version and flags of a full `meta`
		let mut children_start = info.start + info.header_size();

		// `meta_is_full` needs to look at 8 bytes
		let is_container = IMPORTANT_CONTAINERS.contains(&info.ident)
			&& !(&info.ident == b"meta" && info.content_len() < 8);
		if !is_container {
			skip_atom(reader, &info)?;
			return Ok(Some(ContextualAtom {
				info,
				children: Vec::new(),
			}));
		}

		if &info.ident == b"meta" && meta_is_full(reader)? {
			children_start += 4;
		}

		let mut len = info.end() - children_start;
		let mut children = Vec::new();

		while let Some(child) = Self::read(reader, &mut len, parse_mode)? {
			children.push(child);
		}

		if len != 0 {
			log::error!(
				"Unable to read the entire {:?} container",
				info.ident.escape_ascii().to_string()
			);
			err!(BadAtom("Unable to read entire container"));
		}

		Ok(Some(ContextualAtom { info, children }))
	}

	fn child(&self, ident: [u8; 4]) -> Option<&ContextualAtom> {
		self.children.iter().find(|atom| atom.info.ident == ident)
	}

	/// Collect every descendant with one of the `expected` identifiers
	fn find_all(&self, expected: &[[u8; 4]], found: &mut Vec<AtomInfo>) {
		for child in &self.children {
			if expected.contains(&child.info.ident) {
				found.push(child.info);
			}

			child.find_all(expected, found);
		}
	}
}

/// A single splice of the file
struct Edit {
	range: Range<usize>,
	replacement: Vec<u8>,
	/// Every container enclosing `range`, outermost first
	ancestors: Vec<AtomInfo>,
}

/// Replace, create, or remove the `moov.udta.meta.ilst` atom
///
/// Existing `free` atoms surrounding the `ilst` are used as a budget. When the new `ilst` fits in
/// it, the remainder stays `free` and nothing else in the file moves. Otherwise the file grows,
/// with [`WriteOptions::preferred_padding`] reserved for the next write.
pub(crate) fn write_to<F>(file: &mut F, tag: &Mp4Ilst, write_options: WriteOptions) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
	TagCodecError: From<<F as Length>::Error>,
{
	file.rewind()?;

	let mut contents = Vec::new();
	file.read_to_end(&mut contents)?;

	let atoms = {
		let mut reader = AtomReader::new(Cursor::new(contents.as_slice()), PARSE_MODE)?;
		if verify_mp4(&mut reader).is_err() {
			encode_err!(@BAIL Mp4, "File is not a valid MP4 file");
		}

		let mut cursor = reader.into_inner();
		cursor.rewind()?;

		let mut len = contents.len() as u64;
		let mut atoms = Vec::new();
		while let Some(atom) = ContextualAtom::read(&mut cursor, &mut len, PARSE_MODE)? {
			atoms.push(atom);
		}

		atoms
	};

	let Some(moov) = atoms.iter().find(|atom| &atom.info.ident == b"moov") else {
		encode_err!(@BAIL Mp4, "File has no \"moov\" atom");
	};

	let ilst = if tag.is_empty() {
		None
	} else {
		Some(build_ilst(&tag.fields)?)
	};

	let Some(edit) = plan_edit(moov, ilst, write_options.preferred_padding)? else {
		log::debug!("Nothing to do");
		return Ok(());
	};

	let original = contents.clone();

	let diff = edit.replacement.len() as i64 - edit.range.len() as i64;
	if diff != 0 {
		for ancestor in &edit.ancestors {
			update_size(&mut contents, ancestor, diff)?;
		}

		let mut tables = Vec::new();
		for atom in &atoms {
			atom.find_all(&[*b"stco", *b"co64", *b"tfhd"], &mut tables);
		}

		let edit_start = edit.range.start as u64;
		for table in tables {
			let content =
				&mut contents[(table.start + table.header_size()) as usize..table.end() as usize];
			match &table.ident {
				b"stco" => shift_offsets(content, 4, edit_start, diff)?,
				b"co64" => shift_offsets(content, 8, edit_start, diff)?,
				_ => shift_base_data_offset(content, edit_start, diff)?,
			}
		}
	}

	log::debug!(
		"Replacing {} bytes at {} with {} bytes",
		edit.range.len(),
		edit.range.start,
		edit.replacement.len()
	);

	contents.splice(edit.range, edit.replacement);

	overwrite_changed(file, &original, &contents)
}

fn plan_edit(moov: &ContextualAtom, ilst: Option<Vec<u8>>, padding: Option<u32>) -> Result<Option<Edit>> {
	let udtas = moov
		.children
		.iter()
		.filter(|atom| &atom.info.ident == b"udta")
		.collect::<Vec<_>>();

	let existing = udtas.iter().find_map(|udta| {
		let meta = udta.child(*b"meta")?;
		let position = meta
			.children
			.iter()
			.position(|atom| &atom.info.ident == b"ilst")?;
		Some((*udta, meta, position))
	});

	if let Some((udta, meta, position)) = existing {
		let siblings = &meta.children;
		let is_free = |index: usize| &siblings[index].info.ident == b"free";

		let mut first = position;
		while first > 0 && is_free(first - 1) {
			first -= 1;
		}

		let mut last = position;
		while last + 1 < siblings.len() && is_free(last + 1) {
			last += 1;
		}

		let range = siblings[first].info.start as usize..siblings[last].info.end() as usize;
		let replacement = match ilst {
			Some(ilst) => with_padding(ilst, range.len(), padding)?,
			None => Vec::new(),
		};

		return Ok(Some(Edit {
			range,
			replacement,
			ancestors: vec![moov.info, udta.info, meta.info],
		}));
	}

	let Some(ilst) = ilst else {
		return Ok(None);
	};

	let ilst = with_padding(ilst, 0, padding)?;

	if let Some((udta, meta)) = udtas
		.iter()
		.find_map(|udta| Some((*udta, udta.child(*b"meta")?)))
	{
		let end = meta.info.end() as usize;
		return Ok(Some(Edit {
			range: end..end,
			replacement: ilst,
			ancestors: vec![moov.info, udta.info, meta.info],
		}));
	}

	let meta = meta_atom(&ilst)?;

	if let Some(udta) = udtas.first() {
		let end = udta.info.end() as usize;
		return Ok(Some(Edit {
			range: end..end,
			replacement: meta,
			ancestors: vec![moov.info, udta.info],
		}));
	}

	let end = moov.info.end() as usize;
	Ok(Some(Edit {
		range: end..end,
		replacement: atom(*b"udta", &meta)?,
		ancestors: vec![moov.info],
	}))
}

/// Fit `ilst` into `available` bytes, or append `padding` if it doesn't fit
fn with_padding(mut ilst: Vec<u8>, available: usize, padding: Option<u32>) -> Result<Vec<u8>> {
	if ilst.len() == available {
		return Ok(ilst);
	}

	if available >= ilst.len() + 8 {
		let free_len = available - ilst.len();
		ilst.extend(free(free_len)?);
		return Ok(ilst);
	}

	if let Some(padding) = padding.filter(|padding| u64::from(*padding) >= ATOM_HEADER_LEN) {
		ilst.extend(free(padding as usize)?);
	}

	Ok(ilst)
}

fn free(len: usize) -> Result<Vec<u8>> {
	let Ok(size) = u32::try_from(len) else {
		err!(TooMuchData);
	};

	let mut free = Vec::with_capacity(len);
	free.extend_from_slice(&size.to_be_bytes());
	free.extend_from_slice(b"free");
	free.resize(len, 0);

	Ok(free)
}

fn atom(ident: [u8; 4], content: &[u8]) -> Result<Vec<u8>> {
	let Ok(size) = u32::try_from(content.len() + 8) else {
		err!(TooMuchData);
	};

	let mut atom = Vec::with_capacity(content.len() + 8);
	atom.extend_from_slice(&size.to_be_bytes());
	atom.extend_from_slice(&ident);
	atom.extend_from_slice(content);

	Ok(atom)
}

fn meta_atom(ilst: &[u8]) -> Result<Vec<u8>> {
	let mut content = Vec::with_capacity(4 + HDLR.len() + ilst.len());
	// Version/flags
	content.extend_from_slice(&[0; 4]);
	content.extend_from_slice(&HDLR);
	content.extend_from_slice(ilst);

	atom(*b"meta", &content)
}

fn update_size(contents: &mut [u8], atom: &AtomInfo, diff: i64) -> Result<()> {
	let start = atom.start as usize;

	let Some(new_len) = atom.len.checked_add_signed(diff) else {
		err!(SizeMismatch);
	};

	if atom.extended {
		BigEndian::write_u64(&mut contents[start + 8..start + 16], new_len);
		return Ok(());
	}

	let Ok(new_len) = u32::try_from(new_len) else {
		err!(TooMuchData);
	};

	BigEndian::write_u32(&mut contents[start..start + 4], new_len);
	Ok(())
}

/// Move the entries of an `stco` or `co64` table that point past `edit_start`
fn shift_offsets(table: &mut [u8], entry_size: usize, edit_start: u64, diff: i64) -> Result<()> {
	// Version/flags (4), entry count (4)
	if table.len() < 8 {
		log::warn!("Skipping a truncated chunk offset table");
		return Ok(());
	}

	let count = BigEndian::read_u32(&table[4..8]) as usize;
	for entry in table[8..].chunks_exact_mut(entry_size).take(count) {
		let offset = match entry_size {
			4 => u64::from(BigEndian::read_u32(entry)),
			_ => BigEndian::read_u64(entry),
		};

		if offset < edit_start {
			continue;
		}

		let Some(shifted) = offset.checked_add_signed(diff) else {
			err!(SizeMismatch);
		};

		match entry_size {
			4 => {
				let Ok(shifted) = u32::try_from(shifted) else {
					err!(TooMuchData);
				};
				BigEndian::write_u32(entry, shifted);
			},
			_ => BigEndian::write_u64(entry, shifted),
		}
	}

	Ok(())
}

fn shift_base_data_offset(tfhd: &mut [u8], edit_start: u64, diff: i64) -> Result<()> {
	const BASE_DATA_OFFSET_PRESENT: u32 = 0x01;

	// Version/flags (4), track ID (4), base data offset (8)
	if tfhd.len() < 16 || BigEndian::read_u32(&tfhd[..4]) & BASE_DATA_OFFSET_PRESENT == 0 {
		return Ok(());
	}

	let offset = BigEndian::read_u64(&tfhd[8..16]);
	if offset < edit_start {
		return Ok(());
	}

	let Some(shifted) = offset.checked_add_signed(diff) else {
		err!(SizeMismatch);
	};

	BigEndian::write_u64(&mut tfhd[8..16], shifted);
	Ok(())
}
