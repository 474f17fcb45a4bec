use super::Mp4Field;
use super::constants::COVER_ART;
use crate::error::Result;
use crate::macros::err;

/// Encode `fields` as an `ilst` atom
///
/// All `covr` fields are merged into a single `covr` atom at the position of the first one.
/// Fields without any content are skipped.
pub(crate) fn build_ilst(fields: &[Mp4Field]) -> Result<Vec<u8>> {
	log::debug!("Building `ilst` atom");

	let mut ilst = vec![0, 0, 0, 0, b'i', b'l', b's', b't'];
	let mut wrote_artwork = false;

	for field in fields {
		if field.data.is_empty() {
			log::warn!(
				"Skipping empty item {:?}",
				field.ident.escape_ascii().to_string()
			);
			continue;
		}

		if !field.is_artwork() {
			write_item(&mut ilst, field.ident, &[&field.data])?;
			continue;
		}

		if wrote_artwork {
			continue;
		}

		let artwork = fields
			.iter()
			.filter(|field| field.is_artwork())
			.map(|field| field.data.as_slice())
			.collect::<Vec<_>>();

		write_item(&mut ilst, COVER_ART, &artwork)?;
		wrote_artwork = true;
	}

	let Ok(size) = u32::try_from(ilst.len()) else {
		err!(TooMuchData);
	};

	ilst[..4].copy_from_slice(&size.to_be_bytes());
	Ok(ilst)
}

fn write_item(writer: &mut Vec<u8>, ident: [u8; 4], content: &[&[u8]]) -> Result<()> {
	let len = 8 + content.iter().map(|part| part.len()).sum::<usize>();
	let Ok(len) = u32::try_from(len) else {
		err!(TooMuchData);
	};

	writer.extend_from_slice(&len.to_be_bytes());
	writer.extend_from_slice(&ident);
	for part in content {
		writer.extend_from_slice(part);
	}

	Ok(())
}
