//! The `ilst` atom
//!
//! Items are kept as raw bytes, a [`Mp4Field`] is the identifier of an item and its content,
//! which is normally one or more `data` atoms.

mod data_type;
pub(crate) mod read;
pub(crate) mod write;

use crate::tag::Accessor;

use std::borrow::Cow;

pub use data_type::DataType;

/// Well-known item identifiers
pub mod constants {
	/// Title (`©nam`)
	pub const TITLE: [u8; 4] = *b"\xA9nam";
	/// Artist (`©ART`)
	pub const ARTIST: [u8; 4] = *b"\xA9ART";
	/// Album (`©alb`)
	pub const ALBUM: [u8; 4] = *b"\xA9alb";
	/// Genre (`©gen`)
	pub const GENRE: [u8; 4] = *b"\xA9gen";
	/// Comment (`©cmt`)
	pub const COMMENT: [u8; 4] = *b"\xA9cmt";
	/// Cover art (`covr`)
	pub const COVER_ART: [u8; 4] = *b"covr";
}

/// The size, identifier, type and locale of a `data` atom
pub(crate) const DATA_ATOM_HEADER_LEN: usize = 16;

/// A `data` atom within a [`Mp4Field`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataAtom<'a> {
	/// The type of the payload
	pub data_type: DataType,
	/// The locale, 0 for the default
	pub locale: u32,
	/// The payload
	pub payload: &'a [u8],
}

/// An `ilst` item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mp4Field {
	pub(crate) ident: [u8; 4],
	pub(crate) data: Vec<u8>,
}

fn data_atom(data_type: DataType, payload: &[u8]) -> Vec<u8> {
	let mut atom = Vec::with_capacity(DATA_ATOM_HEADER_LEN + payload.len());
	// Items larger than 4 GiB are rejected when the `ilst` is built
	atom.extend_from_slice(&((DATA_ATOM_HEADER_LEN + payload.len()) as u32).to_be_bytes());
	atom.extend_from_slice(b"data");
	// Version 0 + 24-bit type
	atom.extend_from_slice(&u32::from(data_type).to_be_bytes());
	atom.extend_from_slice(&[0; 4]);
	atom.extend_from_slice(payload);
	atom
}

impl Mp4Field {
	/// Create a field from the raw content of an item
	pub fn new(ident: [u8; 4], data: Vec<u8>) -> Self {
		Self { ident, data }
	}

	/// Create a field holding a single UTF-8 `data` atom
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::mp4::Mp4Field;
	/// use tagcodec::mp4::constants::TITLE;
	///
	/// let field = Mp4Field::text(TITLE, "Foo title");
	/// assert_eq!(field.as_text(), Some("Foo title"));
	/// ```
	pub fn text(ident: [u8; 4], value: &str) -> Self {
		Self {
			ident,
			data: data_atom(DataType::Utf8, value.as_bytes()),
		}
	}

	/// Create a `covr` field holding a single image
	///
	/// `data_type` should be [`DataType::Jpeg`], [`DataType::Png`] or [`DataType::Bmp`].
	pub fn artwork(data_type: DataType, image: &[u8]) -> Self {
		Self {
			ident: constants::COVER_ART,
			data: data_atom(data_type, image),
		}
	}

	/// The item identifier
	pub fn ident(&self) -> [u8; 4] {
		self.ident
	}

	/// The raw item content
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Whether this is a `covr` field
	pub fn is_artwork(&self) -> bool {
		self.ident == constants::COVER_ART
	}

	/// The `data` atoms of the item, stopping at the first malformed one
	pub fn values(&self) -> impl Iterator<Item = DataAtom<'_>> {
		let mut rest = self.data.as_slice();
		std::iter::from_fn(move || {
			if rest.len() < DATA_ATOM_HEADER_LEN || &rest[4..8] != b"data" {
				return None;
			}

			let size = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
			if size < DATA_ATOM_HEADER_LEN || size > rest.len() {
				return None;
			}

			let (atom, remaining) = rest.split_at(size);
			rest = remaining;

			Some(DataAtom {
				data_type: DataType::from(u32::from_be_bytes([0, atom[9], atom[10], atom[11]])),
				locale: u32::from_be_bytes([atom[12], atom[13], atom[14], atom[15]]),
				payload: &atom[DATA_ATOM_HEADER_LEN..],
			})
		})
	}

	/// The first UTF-8 value of the item
	pub fn as_text(&self) -> Option<&str> {
		self.values()
			.find(|value| value.data_type == DataType::Utf8)
			.and_then(|value| std::str::from_utf8(value.payload).ok())
	}
}

/// The items of an `ilst` atom
///
/// Fields keep the order they were read or added in. When written, every `covr` field is merged
/// into a single `covr` atom at the position of the first one.
///
/// # Examples
///
/// ```rust
/// use tagcodec::mp4::{DataType, Mp4Field, Mp4Ilst};
/// use tagcodec::tag::Accessor;
///
/// let mut ilst = Mp4Ilst::default();
/// ilst.set_title(String::from("Foo title"));
/// ilst.push(Mp4Field::artwork(DataType::Png, b"\x89PNG"));
///
/// assert_eq!(ilst.title().as_deref(), Some("Foo title"));
/// assert_eq!(ilst.artwork().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mp4Ilst {
	pub(crate) fields: Vec<Mp4Field>,
}

impl Mp4Ilst {
	/// Returns all fields
	pub fn fields(&self) -> &[Mp4Field] {
		&self.fields
	}

	/// Gets the first field with the identifier `ident`
	pub fn get(&self, ident: [u8; 4]) -> Option<&Mp4Field> {
		self.fields.iter().find(|field| field.ident == ident)
	}

	/// Replaces every field with the same identifier, at the position of the first one
	pub fn insert(&mut self, field: Mp4Field) {
		let Some(position) = self.fields.iter().position(|f| f.ident == field.ident) else {
			self.fields.push(field);
			return;
		};

		let ident = field.ident;
		self.fields[position] = field;

		let mut index = 0;
		self.fields.retain(|f| {
			let keep = index <= position || f.ident != ident;
			index += 1;
			keep
		});
	}

	/// Appends a field
	pub fn push(&mut self, field: Mp4Field) {
		self.fields.push(field);
	}

	/// Removes every field with the identifier `ident`
	pub fn remove(&mut self, ident: [u8; 4]) -> Vec<Mp4Field> {
		let (removed, kept) = std::mem::take(&mut self.fields)
			.into_iter()
			.partition(|field| field.ident == ident);
		self.fields = kept;
		removed
	}

	/// Every `covr` field, one per image
	pub fn artwork(&self) -> impl Iterator<Item = &Mp4Field> {
		self.fields.iter().filter(|field| field.is_artwork())
	}

	/// The number of fields
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether there are no fields
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	fn text(&self, ident: [u8; 4]) -> Option<Cow<'_, str>> {
		self.get(ident).and_then(Mp4Field::as_text).map(Cow::Borrowed)
	}
}

macro_rules! impl_accessor {
	($($name:ident => $ident:ident),+ $(,)?) => {
		paste::paste! {
			impl Accessor for Mp4Ilst {
				$(
					fn $name(&self) -> Option<Cow<'_, str>> {
						self.text(constants::$ident)
					}

					fn [<set_ $name>](&mut self, value: String) {
						self.insert(Mp4Field::text(constants::$ident, &value));
					}

					fn [<remove_ $name>](&mut self) {
						let _ = self.remove(constants::$ident);
					}
				)+
			}
		}
	};
}

impl_accessor!(
	title => TITLE,
	artist => ARTIST,
	album => ALBUM,
	genre => GENRE,
	comment => COMMENT,
);
