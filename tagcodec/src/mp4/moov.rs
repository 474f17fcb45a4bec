use super::atom_info::AtomInfo;
use super::ilst::Mp4Ilst;
use super::ilst::read::parse_ilst;
use super::read::{AtomReader, find_child_atom, meta_is_full, skip_atom};
use crate::config::ParseOptions;
use crate::error::Result;
use crate::macros::decode_err;

use std::io::{Read, Seek};

pub(crate) struct Moov {
	pub(crate) mvhd: Option<AtomInfo>,
	/// The `mdia` atom of every track
	pub(crate) traks: Vec<AtomInfo>,
	/// `moov.udta.meta.ilst`
	pub(crate) ilst: Option<Mp4Ilst>,
}

impl Moov {
	pub(super) fn find<R>(reader: &mut AtomReader<R>) -> Result<AtomInfo>
	where
		R: Read + Seek,
	{
		while let Some(atom) = reader.next()? {
			if &atom.ident == b"moov" {
				return Ok(atom);
			}

			skip_atom(reader, &atom)?;
		}

		decode_err!(@BAIL Mp4, "No \"moov\" atom found");
	}

	pub(super) fn parse<R>(reader: &mut AtomReader<R>, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
	{
		let mut mvhd = None;
		let mut traks = Vec::new();
		let mut ilst: Option<Mp4Ilst> = None;

		while let Some(atom) = reader.next()? {
			match &atom.ident {
				b"mvhd" => mvhd = Some(atom),
				b"trak" if parse_options.read_properties => {
					if let Some(mdia) =
						find_child_atom(reader, atom.end(), *b"mdia", parse_options.parsing_mode)?
					{
						traks.push(mdia);
					}
				},
				b"udta" if parse_options.read_tags => {
					if let Some(parsed) = ilst_from_udta(reader, &atom, parse_options)? {
						match &mut ilst {
							Some(existing) => {
								log::warn!("Multiple `ilst` atoms found, combining them");
								existing.fields.extend(parsed.fields);
							},
							None => ilst = Some(parsed),
						}
					}
				},
				_ => {},
			}

			skip_atom(reader, &atom)?;
		}

		Ok(Self { mvhd, traks, ilst })
	}
}

fn ilst_from_udta<R>(
	reader: &mut AtomReader<R>,
	udta: &AtomInfo,
	parse_options: ParseOptions,
) -> Result<Option<Mp4Ilst>>
where
	R: Read + Seek,
{
	let Some(meta) = find_child_atom(reader, udta.end(), *b"meta", parse_options.parsing_mode)?
	else {
		return Ok(None);
	};

	meta_is_full(reader)?;

	let Some(ilst) = find_child_atom(reader, meta.end(), *b"ilst", parse_options.parsing_mode)?
	else {
		return Ok(None);
	};

	parse_ilst(reader, &ilst, parse_options).map(Some)
}
