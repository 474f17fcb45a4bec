use super::guid::Guid;
use crate::tag::Accessor;

use std::borrow::Cow;

const ALBUM: &str = "WM/AlbumTitle";
const GENRE: &str = "WM/Genre";

/// The value of an [`AsfField`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsfValue {
	/// A UTF-16 string
	Unicode(String),
	/// Arbitrary bytes
	Binary(Vec<u8>),
	/// A boolean, stored as a DWORD or a WORD depending on the object
	Bool(bool),
	/// A 32-bit integer
	Dword(u32),
	/// A 64-bit integer
	Qword(u64),
	/// A 16-bit integer
	Word(u16),
	/// A GUID, only storable in the Metadata Library object
	Guid(Guid),
}

impl AsfValue {
	/// The type identifier used on disk
	pub(crate) fn type_id(&self) -> u16 {
		match self {
			Self::Unicode(_) => 0,
			Self::Binary(_) => 1,
			Self::Bool(_) => 2,
			Self::Dword(_) => 3,
			Self::Qword(_) => 4,
			Self::Word(_) => 5,
			Self::Guid(_) => 6,
		}
	}

	/// The encoded length of the value, `short_bool` selects the 2-byte boolean form
	pub(crate) fn encoded_len(&self, short_bool: bool) -> usize {
		match self {
			// UTF-16 plus a terminator
			Self::Unicode(text) => (text.encode_utf16().count() + 1) * 2,
			Self::Binary(data) => data.len(),
			Self::Bool(_) if short_bool => 2,
			Self::Bool(_) | Self::Dword(_) => 4,
			Self::Qword(_) => 8,
			Self::Word(_) => 2,
			Self::Guid(_) => 16,
		}
	}

	/// Returns the string, if the value is [`AsfValue::Unicode`]
	pub fn text(&self) -> Option<&str> {
		match self {
			Self::Unicode(text) => Some(text),
			_ => None,
		}
	}
}

/// A named attribute
///
/// Depending on its size, stream and language, a field is stored in the Extended Content
/// Description, Metadata, or Metadata Library object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsfField {
	/// The attribute name, such as `WM/AlbumTitle`
	pub name: String,
	/// The attribute value
	pub value: AsfValue,
	/// The stream the attribute applies to, 0 for the whole file
	pub stream: u16,
	/// Index into the language list, 0 for the default
	pub language: u16,
}

impl AsfField {
	/// Create a file-wide field in the default language
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::asf::{AsfField, AsfValue};
	///
	/// let field = AsfField::new("WM/Year", AsfValue::Unicode(String::from("2004")));
	/// assert_eq!(field.stream, 0);
	/// ```
	pub fn new(name: impl Into<String>, value: AsfValue) -> Self {
		Self {
			name: name.into(),
			value,
			stream: 0,
			language: 0,
		}
	}

	/// The encoded length of the name, including its terminator
	pub(crate) fn name_len(&self) -> usize {
		(self.name.encode_utf16().count() + 1) * 2
	}
}

/// The content of a Content Branding object
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentBranding {
	/// 0 = none, 1 = bitmap, 2 = JPEG, 3 = GIF
	pub banner_image_type: u32,
	/// The banner image
	pub banner_image_data: Vec<u8>,
	/// A link for the banner
	pub banner_image_url: String,
	/// A link to copyright information
	pub copyright_url: String,
}

/// The metadata of an ASF file
///
/// The five Content Description strings are stored directly, every other attribute is an
/// [`AsfField`]. An empty string means the value is absent.
///
/// # Examples
///
/// ```rust
/// use tagcodec::asf::AsfTag;
/// use tagcodec::tag::Accessor;
///
/// let mut tag = AsfTag::default();
/// tag.set_artist(String::from("Foo artist"));
///
/// assert_eq!(tag.author, "Foo artist");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AsfTag {
	/// Content Description title
	pub title: String,
	/// Content Description author
	pub author: String,
	/// Content Description copyright
	pub copyright: String,
	/// Content Description description
	pub description: String,
	/// Content Description rating
	pub rating: String,
	/// The Content Branding object
	pub branding: Option<ContentBranding>,
	pub(crate) fields: Vec<AsfField>,
}

impl AsfTag {
	/// Returns all fields in the order they were read or added
	pub fn fields(&self) -> &[AsfField] {
		&self.fields
	}

	/// Gets the first field named `name`
	pub fn get(&self, name: &str) -> Option<&AsfField> {
		self.fields.iter().find(|field| field.name == name)
	}

	/// Replaces every field with the same name, stream and language as `field`
	pub fn insert(&mut self, field: AsfField) {
		self.fields.retain(|existing| {
			existing.name != field.name
				|| existing.stream != field.stream
				|| existing.language != field.language
		});
		self.fields.push(field);
	}

	/// Appends a field
	pub fn push(&mut self, field: AsfField) {
		self.fields.push(field);
	}

	/// Removes every field named `name`
	pub fn remove(&mut self, name: &str) -> Vec<AsfField> {
		let (removed, kept) = std::mem::take(&mut self.fields)
			.into_iter()
			.partition(|field| field.name == name);
		self.fields = kept;
		removed
	}

	/// Whether there is nothing to write
	pub fn is_empty(&self) -> bool {
		!self.has_content_description() && self.branding.is_none() && self.fields.is_empty()
	}

	pub(crate) fn has_content_description(&self) -> bool {
		[
			&self.title,
			&self.author,
			&self.copyright,
			&self.description,
			&self.rating,
		]
		.iter()
		.any(|value| !value.is_empty())
	}

	fn field_text(&self, name: &str) -> Option<Cow<'_, str>> {
		self.get(name)
			.and_then(|field| field.value.text())
			.map(Cow::Borrowed)
	}
}

fn non_empty(value: &str) -> Option<Cow<'_, str>> {
	(!value.is_empty()).then_some(Cow::Borrowed(value))
}

impl Accessor for AsfTag {
	fn title(&self) -> Option<Cow<'_, str>> {
		non_empty(&self.title)
	}

	fn set_title(&mut self, value: String) {
		self.title = value;
	}

	fn remove_title(&mut self) {
		self.title.clear();
	}

	fn artist(&self) -> Option<Cow<'_, str>> {
		non_empty(&self.author)
	}

	fn set_artist(&mut self, value: String) {
		self.author = value;
	}

	fn remove_artist(&mut self) {
		self.author.clear();
	}

	fn album(&self) -> Option<Cow<'_, str>> {
		self.field_text(ALBUM)
	}

	fn set_album(&mut self, value: String) {
		self.insert(AsfField::new(ALBUM, AsfValue::Unicode(value)));
	}

	fn remove_album(&mut self) {
		let _ = self.remove(ALBUM);
	}

	fn genre(&self) -> Option<Cow<'_, str>> {
		self.field_text(GENRE)
	}

	fn set_genre(&mut self, value: String) {
		self.insert(AsfField::new(GENRE, AsfValue::Unicode(value)));
	}

	fn remove_genre(&mut self) {
		let _ = self.remove(GENRE);
	}

	fn comment(&self) -> Option<Cow<'_, str>> {
		non_empty(&self.description)
	}

	fn set_comment(&mut self, value: String) {
		self.description = value;
	}

	fn remove_comment(&mut self) {
		self.description.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::{AsfField, AsfTag, AsfValue};
	use crate::tag::Accessor;

	#[test_log::test]
	fn insert_replaces_same_slot() {
		let mut tag = AsfTag::default();
		tag.push(AsfField::new("WM/Year", AsfValue::Dword(2003)));
		tag.push(AsfField {
			stream: 1,
			..AsfField::new("WM/Year", AsfValue::Dword(2003))
		});

		tag.insert(AsfField::new("WM/Year", AsfValue::Dword(2004)));
		assert_eq!(tag.fields().len(), 2);
		assert_eq!(tag.fields()[0].stream, 1);
		assert_eq!(tag.fields()[1].value, AsfValue::Dword(2004));
	}

	#[test_log::test]
	fn album_is_a_field() {
		let mut tag = AsfTag::default();
		tag.set_album(String::from("Album"));
		assert_eq!(tag.get("WM/AlbumTitle").unwrap().value.text(), Some("Album"));

		tag.remove_album();
		assert!(tag.is_empty());
	}

	#[test_log::test]
	fn value_lengths() {
		assert_eq!(AsfValue::Unicode(String::from("ab")).encoded_len(false), 6);
		assert_eq!(AsfValue::Bool(true).encoded_len(false), 4);
		assert_eq!(AsfValue::Bool(true).encoded_len(true), 2);
	}
}
