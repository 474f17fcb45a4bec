//! The object graph of an ASF header
//!
//! Every object is `GUID + u64 size (including this 24 byte header) + data`. The header object
//! holds the top-level objects, and the header extension object holds a second list of its own.

use super::guid::{Guid, HEADER_EXTENSION_OBJECT, HEADER_OBJECT};
use crate::error::Result;
use crate::macros::decode_err;

use std::collections::HashMap;

/// GUID + size
pub(super) const OBJECT_HEADER_SIZE: usize = 24;
/// GUID + size + child count + 2 reserved bytes
pub(super) const HEADER_OBJECT_SIZE: usize = 30;
/// Object header + reserved GUID + reserved u16 + data size
pub(super) const HEADER_EXTENSION_SIZE: usize = 46;

/// Where an object lives
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(super) enum Location {
	/// A direct child of the header object
	Header,
	/// A child of the header extension object
	Extension,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) struct AsfObjectEntry {
	pub(super) guid: Guid,
	/// The offset of the object from the start of the header object
	pub(super) offset: usize,
	/// The size of the object, including its header
	pub(super) size: usize,
	pub(super) location: Location,
}

impl AsfObjectEntry {
	pub(super) fn bytes<'a>(&self, header: &'a [u8]) -> &'a [u8] {
		&header[self.offset..self.offset + self.size]
	}

	/// The object data, after the GUID and size
	pub(super) fn content<'a>(&self, header: &'a [u8]) -> &'a [u8] {
		&self.bytes(header)[OBJECT_HEADER_SIZE..]
	}
}

/// An arena of the objects in a header, in file order
pub(super) struct AsfObjectGraph {
	pub(super) entries: Vec<AsfObjectEntry>,
	/// The first occurrence of every GUID in each location
	lookup: HashMap<(Guid, Location), usize>,
	/// The index of the header extension object
	pub(super) extension: Option<usize>,
}

impl AsfObjectGraph {
	/// Build the graph of a complete header object
	pub(super) fn parse(header: &[u8]) -> Result<Self> {
		if header.len() < HEADER_OBJECT_SIZE || header[..16] != HEADER_OBJECT.as_bytes() {
			decode_err!(@BAIL Asf, "File doesn't start with a header object");
		}

		let child_count = u32::from_le_bytes([header[24], header[25], header[26], header[27]]);

		let mut graph = Self {
			entries: Vec::new(),
			lookup: HashMap::new(),
			extension: None,
		};

		graph.walk(header, HEADER_OBJECT_SIZE, header.len(), Location::Header)?;

		let top_level = graph.entries.len();
		if top_level != child_count as usize {
			log::warn!(
				"Header object claims {} children, found {}",
				child_count,
				top_level
			);
		}

		if let Some(index) = graph.find(HEADER_EXTENSION_OBJECT, Location::Header) {
			let extension = graph.entries[index];
			if extension.size < HEADER_EXTENSION_SIZE {
				decode_err!(@BAIL Asf, "Header extension object is too small");
			}

			let data_start = extension.offset + HEADER_EXTENSION_SIZE;
			let data_size = u32::from_le_bytes([
				header[data_start - 4],
				header[data_start - 3],
				header[data_start - 2],
				header[data_start - 1],
			]) as usize;

			let extension_end = extension.offset + extension.size;
			if data_start + data_size > extension_end {
				decode_err!(@BAIL Asf, "Header extension data overruns the object");
			}

			graph.extension = Some(index);
			graph.walk(header, data_start, data_start + data_size, Location::Extension)?;
		}

		Ok(graph)
	}

	fn walk(&mut self, header: &[u8], mut offset: usize, end: usize, location: Location) -> Result<()> {
		while offset < end {
			if end - offset < OBJECT_HEADER_SIZE {
				decode_err!(@BAIL Asf, "Found a truncated object header");
			}

			let mut guid = [0; 16];
			guid.copy_from_slice(&header[offset..offset + 16]);
			let guid = Guid::from_bytes(guid);

			let mut size = [0; 8];
			size.copy_from_slice(&header[offset + 16..offset + OBJECT_HEADER_SIZE]);
			let size = u64::from_le_bytes(size);

			if size < OBJECT_HEADER_SIZE as u64 || size > (end - offset) as u64 {
				decode_err!(@BAIL Asf, "Found an object with an invalid size");
			}

			log::trace!(
				"Found object {} ({} bytes) at offset {} ({:?})",
				guid,
				size,
				offset,
				location
			);

			let index = self.entries.len();
			self.lookup.entry((guid, location)).or_insert(index);
			self.entries.push(AsfObjectEntry {
				guid,
				offset,
				size: size as usize,
				location,
			});

			offset += size as usize;
		}

		Ok(())
	}

	/// The index of the first object with `guid` in `location`
	pub(super) fn find(&self, guid: Guid, location: Location) -> Option<usize> {
		self.lookup.get(&(guid, location)).copied()
	}

	/// Every object with `guid`, in either location
	pub(super) fn find_all(&self, guid: Guid) -> impl Iterator<Item = &AsfObjectEntry> {
		self.entries.iter().filter(move |entry| entry.guid == guid)
	}
}

#[cfg(test)]
pub(super) mod tests {
	use super::{AsfObjectGraph, Location};
	use crate::asf::guid::{
		FILE_PROPERTIES_OBJECT, Guid, HEADER_EXTENSION_OBJECT, HEADER_EXTENSION_RESERVED,
		HEADER_OBJECT, METADATA_OBJECT,
	};

	pub(crate) fn object(guid: Guid, content: &[u8]) -> Vec<u8> {
		let mut object = guid.as_bytes().to_vec();
		object.extend_from_slice(&(content.len() as u64 + 24).to_le_bytes());
		object.extend_from_slice(content);
		object
	}

	pub(crate) fn extension(children: &[Vec<u8>]) -> Vec<u8> {
		let data = children.concat();

		let mut content = HEADER_EXTENSION_RESERVED.as_bytes().to_vec();
		content.extend_from_slice(&6_u16.to_le_bytes());
		content.extend_from_slice(&(data.len() as u32).to_le_bytes());
		content.extend(data);

		object(HEADER_EXTENSION_OBJECT, &content)
	}

	pub(crate) fn header(children: &[Vec<u8>]) -> Vec<u8> {
		let data = children.concat();

		let mut header = HEADER_OBJECT.as_bytes().to_vec();
		header.extend_from_slice(&(data.len() as u64 + 30).to_le_bytes());
		header.extend_from_slice(&(children.len() as u32).to_le_bytes());
		header.extend_from_slice(&[1, 2]);
		header.extend(data);
		header
	}

	#[test_log::test]
	fn both_locations() {
		let header = header(&[
			object(FILE_PROPERTIES_OBJECT, &[0; 80]),
			extension(&[object(METADATA_OBJECT, &[0, 0])]),
		]);

		let graph = AsfObjectGraph::parse(&header).unwrap();
		assert_eq!(graph.entries.len(), 3);
		assert_eq!(graph.extension, Some(1));

		let metadata = graph.find(METADATA_OBJECT, Location::Extension).unwrap();
		assert_eq!(graph.entries[metadata].offset, 30 + 104 + 46);
		assert_eq!(graph.entries[metadata].content(&header), [0, 0]);
		assert!(graph.find(METADATA_OBJECT, Location::Header).is_none());
	}

	#[test_log::test]
	fn object_overruns_header() {
		let mut header = header(&[object(FILE_PROPERTIES_OBJECT, &[0; 80])]);
		// Claim one more byte than there is
		header[46] = 105;

		assert!(AsfObjectGraph::parse(&header).is_err());
	}
}
