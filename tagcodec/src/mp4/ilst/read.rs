use super::{Mp4Field, Mp4Ilst};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::Result;
use crate::macros::{err, try_vec};
use crate::mp4::atom_info::AtomInfo;
use crate::mp4::read::{AtomReader, skip_atom};

use std::io::{Cursor, Read, Seek};

/// Read the items of `ilst`, the reader is expected to be at the start of its content
pub(in crate::mp4) fn parse_ilst<R>(
	reader: &mut AtomReader<R>,
	ilst: &AtomInfo,
	parse_options: ParseOptions,
) -> Result<Mp4Ilst>
where
	R: Read + Seek,
{
	let parsing_mode = parse_options.parsing_mode;

	let mut contents = try_vec![0; ilst.content_len() as usize];
	reader.read_exact(&mut contents)?;

	let mut cursor = Cursor::new(contents);
	let mut ilst_reader = AtomReader::new(&mut cursor, parsing_mode)?;

	let mut tag = Mp4Ilst::default();

	while let Some(atom) = ilst_reader.next()? {
		match &atom.ident {
			b"free" | b"skip" => {
				skip_atom(&mut ilst_reader, &atom)?;
				continue;
			},
			b"covr" if !parse_options.read_cover_art => {
				skip_atom(&mut ilst_reader, &atom)?;
				continue;
			},
			_ => {},
		}

		let mut content = try_vec![0; atom.content_len() as usize];
		ilst_reader.read_exact(&mut content)?;

		if content.is_empty() {
			log::warn!(
				"Skipping empty item {:?}",
				atom.ident.escape_ascii().to_string()
			);
			continue;
		}

		if &atom.ident == b"covr" {
			split_covr(&content, parsing_mode, &mut tag)?;
			continue;
		}

		tag.fields.push(Mp4Field {
			ident: atom.ident,
			data: content,
		});
	}

	Ok(tag)
}

// Every `data` child of `covr` is a separate image
fn split_covr(mut content: &[u8], parsing_mode: ParsingMode, tag: &mut Mp4Ilst) -> Result<()> {
	while !content.is_empty() {
		let size = match content {
			[a, b, c, d, _, _, _, _, ..] => u32::from_be_bytes([*a, *b, *c, *d]) as usize,
			_ => 0,
		};

		if size < 8 || size > content.len() {
			if parsing_mode == ParsingMode::Strict {
				err!(BadAtom("Found a `covr` child with an invalid size"));
			}

			log::warn!("Found a `covr` child with an invalid size, discarding the rest");
			break;
		}

		let (child, rest) = content.split_at(size);
		content = rest;

		if &child[4..8] != b"data" {
			log::debug!(
				"Skipping `covr` child {:?}",
				child[4..8].escape_ascii().to_string()
			);
			continue;
		}

		tag.fields.push(Mp4Field {
			ident: super::constants::COVER_ART,
			data: child.to_vec(),
		});
	}

	Ok(())
}
