use super::guid::{
	CONTENT_BRANDING_OBJECT, CONTENT_DESCRIPTION_OBJECT, EXTENDED_CONTENT_DESCRIPTION_OBJECT,
	FILE_PROPERTIES_OBJECT, HEADER_EXTENSION_OBJECT, HEADER_EXTENSION_RESERVED, METADATA_LIBRARY_OBJECT,
	METADATA_OBJECT,
};
use super::metadata::{
	ContentBrandingObject, ContentDescription, ExtendedContentDescription, Metadata,
	MetadataObject, Placement, encode, placement,
};
use super::object::{
	AsfObjectGraph, HEADER_EXTENSION_SIZE, HEADER_OBJECT_SIZE, Location, OBJECT_HEADER_SIZE,
};
use super::read::verify_asf;
use super::tag::AsfTag;
use crate::config::WriteOptions;
use crate::error::{Result, TagCodecError};
use crate::macros::{encode_err, err};
use crate::util::io::{FileLike, Length, Truncate, overwrite_changed};

use std::collections::HashMap;

use byteorder::{LittleEndian, WriteBytesExt};

const METADATA_GUIDS: [super::guid::Guid; 5] = [
	CONTENT_DESCRIPTION_OBJECT,
	CONTENT_BRANDING_OBJECT,
	EXTENDED_CONTENT_DESCRIPTION_OBJECT,
	METADATA_OBJECT,
	METADATA_LIBRARY_OBJECT,
];

/// Offset of the file size in the File Properties object, after the file ID
const FILE_SIZE_OFFSET: usize = OBJECT_HEADER_SIZE + 16;

/// Regenerate the metadata objects of an ASF file from `tag`
///
/// Each metadata object replaces the existing object with the same GUID wherever it lives, and
/// is otherwise created in its default location. Every other object is copied as-is. An empty
/// tag removes all metadata objects.
pub(crate) fn write_to<F>(file: &mut F, tag: &AsfTag, _write_options: WriteOptions) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
	TagCodecError: From<<F as Length>::Error>,
{
	file.rewind()?;

	let mut file_bytes = Vec::new();
	file.read_to_end(&mut file_bytes)?;

	let Ok(header_size) = verify_asf(&mut &file_bytes[..]) else {
		encode_err!(@BAIL Asf, "File is not a valid ASF file");
	};

	let Ok(header_size) = usize::try_from(header_size) else {
		err!(TooMuchData);
	};

	if header_size > file_bytes.len() {
		err!(SizeMismatch);
	}

	let header = &file_bytes[..header_size];
	let graph = AsfObjectGraph::parse(header)?;

	let has_metadata = METADATA_GUIDS
		.iter()
		.any(|guid| graph.find_all(*guid).next().is_some());
	if tag.is_empty() && !has_metadata {
		log::debug!("Nothing to do");
		return Ok(());
	}

	let mut ecd_fields = Vec::new();
	let mut metadata_fields = Vec::new();
	let mut library_fields = Vec::new();
	for field in &tag.fields {
		match placement(field) {
			Placement::ExtendedContentDescription => ecd_fields.push(field),
			Placement::Metadata => metadata_fields.push(field),
			Placement::MetadataLibrary => library_fields.push(field),
		}
	}

	let content_description = ContentDescription { tag };
	let content_branding = ContentBrandingObject {
		branding: tag.branding.as_ref(),
	};
	let extended_content_description = ExtendedContentDescription { fields: ecd_fields };
	let metadata = Metadata {
		fields: metadata_fields,
		library: false,
	};
	let metadata_library = Metadata {
		fields: library_fields,
		library: true,
	};

	let objects: [&dyn MetadataObject; 5] = [
		&content_description,
		&content_branding,
		&extended_content_description,
		&metadata,
		&metadata_library,
	];

	// Entry index -> its replacement, `None` removes the object
	let mut edits: HashMap<usize, Option<Vec<u8>>> = HashMap::new();
	let mut header_additions = Vec::new();
	let mut extension_additions = Vec::new();

	for object in objects {
		let guid = object.guid();
		let encoded = encode(object)?;

		let existing = graph
			.find(guid, Location::Header)
			.or_else(|| graph.find(guid, Location::Extension));

		for (index, _) in graph
			.entries
			.iter()
			.enumerate()
			.filter(|(index, entry)| entry.guid == guid && Some(*index) != existing)
		{
			log::debug!("Removing duplicate object {}", guid);
			edits.insert(index, None);
		}

		match (existing, encoded) {
			(Some(index), encoded) => {
				// Identical objects stay put, so an untouched extension is never rebuilt
				if encoded.as_deref() != Some(graph.entries[index].bytes(header)) {
					edits.insert(index, encoded);
				}
			},
			(None, Some(encoded)) => match object.default_location() {
				Location::Header => header_additions.push(encoded),
				Location::Extension => extension_additions.push(encoded),
			},
			(None, None) => {},
		}
	}

	let extension_changed = !extension_additions.is_empty()
		|| edits
			.keys()
			.any(|index| graph.entries[*index].location == Location::Extension);

	if extension_changed {
		let extension = rebuild_extension(header, &graph, &edits, extension_additions)?;
		match graph.extension {
			Some(index) => {
				edits.insert(index, Some(extension));
			},
			None => header_additions.push(extension),
		}
	}

	let mut children = Vec::new();
	let mut file_properties_offset = None;
	for (index, entry) in graph.entries.iter().enumerate() {
		if entry.location != Location::Header {
			continue;
		}

		let bytes = match edits.get(&index) {
			Some(Some(replacement)) => replacement.as_slice(),
			Some(None) => continue,
			None => entry.bytes(header),
		};

		if entry.guid == FILE_PROPERTIES_OBJECT && file_properties_offset.is_none() {
			file_properties_offset = Some(children.len());
		}

		children.push(bytes);
	}

	children.extend(header_additions.iter().map(Vec::as_slice));

	let children_len = children.iter().map(|child| child.len()).sum::<usize>();
	let new_header_size = HEADER_OBJECT_SIZE + children_len;

	let mut new_file = Vec::with_capacity(new_header_size + file_bytes.len() - header_size);
	new_file.extend_from_slice(&header[..16]);
	new_file.write_u64::<LittleEndian>(new_header_size as u64)?;
	new_file.write_u32::<LittleEndian>(children.len() as u32)?;
	new_file.extend_from_slice(&header[OBJECT_HEADER_SIZE + 4..HEADER_OBJECT_SIZE]);

	let mut file_size_position = None;
	for (index, child) in children.iter().enumerate() {
		if Some(index) == file_properties_offset && child.len() >= FILE_SIZE_OFFSET + 8 {
			file_size_position = Some(new_file.len() + FILE_SIZE_OFFSET);
		}

		new_file.extend_from_slice(child);
	}

	new_file.extend_from_slice(&file_bytes[header_size..]);

	if let Some(position) = file_size_position {
		let file_size = (new_file.len() as u64).to_le_bytes();
		new_file[position..position + 8].copy_from_slice(&file_size);
	}

	log::debug!(
		"Header object resized from {} to {} bytes",
		header_size,
		new_header_size
	);

	overwrite_changed(file, &file_bytes, &new_file)
}

/// Build a header extension object from the current one, or from scratch if there is none
fn rebuild_extension(
	header: &[u8],
	graph: &AsfObjectGraph,
	edits: &HashMap<usize, Option<Vec<u8>>>,
	additions: Vec<Vec<u8>>,
) -> Result<Vec<u8>> {
	let mut data = Vec::new();
	for (index, entry) in graph.entries.iter().enumerate() {
		if entry.location != Location::Extension {
			continue;
		}

		match edits.get(&index) {
			Some(Some(replacement)) => data.extend_from_slice(replacement),
			Some(None) => {},
			None => data.extend_from_slice(entry.bytes(header)),
		}
	}

	for addition in additions {
		data.extend(addition);
	}

	let Ok(data_size) = u32::try_from(data.len()) else {
		err!(TooMuchData);
	};

	let mut extension = Vec::with_capacity(HEADER_EXTENSION_SIZE + data.len());
	extension.extend_from_slice(&HEADER_EXTENSION_OBJECT.as_bytes());
	extension.write_u64::<LittleEndian>((HEADER_EXTENSION_SIZE + data.len()) as u64)?;

	match graph.extension {
		// Reserved GUID and reserved u16
		Some(index) => {
			let offset = graph.entries[index].offset + OBJECT_HEADER_SIZE;
			extension.extend_from_slice(&header[offset..offset + 18]);
		},
		None => {
			extension.extend_from_slice(&HEADER_EXTENSION_RESERVED.as_bytes());
			extension.write_u16::<LittleEndian>(6)?;
		},
	}

	extension.write_u32::<LittleEndian>(data_size)?;
	extension.extend(data);

	Ok(extension)
}
