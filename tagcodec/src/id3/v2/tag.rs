use super::frame::{Frame, FrameId, FrameValue};
use super::header::{Id3v2TagFlags, Id3v2Version};
use super::items::LanguageFrame;
use super::util::frame_ids;
use crate::tag::Accessor;
use crate::util::text::TextEncoding;

use std::borrow::Cow;

const V4_MULTI_VALUE_SEPARATOR: char = '\0';

// Used exclusively for `Accessor` convenience methods
fn remove_separators_from_frame_text(value: &str, version: Id3v2Version) -> Cow<'_, str> {
	if !value.contains(V4_MULTI_VALUE_SEPARATOR) || version != Id3v2Version::V4 {
		return Cow::Borrowed(value);
	}

	Cow::Owned(value.replace(V4_MULTI_VALUE_SEPARATOR, "/"))
}

macro_rules! impl_accessor {
	($($name:ident => $id:literal;)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					let id = self.native_id($id);
					self.get_text(&id)
						.map(|value| remove_separators_from_frame_text(value, self.original_version))
				}

				fn [<set_ $name>](&mut self, value: String) {
					let id = self.native_id($id);
					let _ = self.insert(Frame::text(FrameId::new_unchecked(id), value));
				}

				fn [<remove_ $name>](&mut self) {
					let id = self.native_id($id);
					let _ = self.remove(&id);
				}
			)+
		}
	}
}

/// An ID3v2 tag
///
/// Frames are kept in the order they were read or inserted, and their ids stay in the form of the
/// tag's [`original_version`](Id3v2Tag::original_version): a tag read from an ID3v2.2 file holds
/// 3-character ids. Ids are only translated when the tag is written with a different version.
///
/// ## [`Accessor`] Methods
///
/// As ID3v2.4 allows for multiple values to exist in a single frame, the raw strings, as provided by
/// [`Id3v2Tag::get_text`], may contain null separators. In the [`Accessor`] methods, these values
/// have the separators (`\0`) replaced with `"/"` for convenience.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Id3v2Tag {
	flags: Id3v2TagFlags,
	pub(crate) original_version: Id3v2Version,
	pub(crate) frames: Vec<Frame>,
}

impl Default for Id3v2Tag {
	fn default() -> Self {
		Self::new()
	}
}

impl Id3v2Tag {
	/// Create a new empty ID3v2.4 tag
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::id3::v2::Id3v2Tag;
	/// use tagcodec::tag::Accessor;
	///
	/// let mut tag = Id3v2Tag::new();
	/// tag.set_title(String::from("Foo title"));
	///
	/// assert_eq!(tag.title().as_deref(), Some("Foo title"));
	/// ```
	pub fn new() -> Self {
		Self::with_version(Id3v2Version::V4)
	}

	/// Create a new empty tag whose frame ids belong to `version`
	pub fn with_version(version: Id3v2Version) -> Self {
		Self {
			flags: Id3v2TagFlags::default(),
			original_version: version,
			frames: Vec::new(),
		}
	}

	/// The version the tag was read as, or created with
	pub fn original_version(&self) -> Id3v2Version {
		self.original_version
	}

	/// Returns the [`Id3v2TagFlags`]
	pub fn flags(&self) -> &Id3v2TagFlags {
		&self.flags
	}

	/// Set the tag's flags
	pub fn set_flags(&mut self, flags: Id3v2TagFlags) {
		self.flags = flags
	}

	/// The number of frames in the tag
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Whether the tag has no frames
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// An iterator over the frames, in order
	pub fn frames(&self) -> impl Iterator<Item = &Frame> {
		self.frames.iter()
	}

	/// Gets the first frame with `id`
	pub fn get(&self, id: &str) -> Option<&Frame> {
		self.frames.iter().find(|f| f.id_str() == id)
	}

	/// Gets the text of the first text information frame with `id`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::id3::v2::{Frame, FrameId, Id3v2Tag};
	///
	/// # fn main() -> tagcodec::error::Result<()> {
	/// let mut tag = Id3v2Tag::new();
	/// tag.insert(Frame::text(FrameId::new("TPE2")?, "Album artist"));
	///
	/// assert_eq!(tag.get_text("TPE2"), Some("Album artist"));
	/// # Ok(()) }
	/// ```
	pub fn get_text(&self, id: &str) -> Option<&str> {
		self.frames
			.iter()
			.filter(|f| f.id_str() == id)
			.find_map(|f| match f.value() {
				FrameValue::Text(text) => Some(text.value.as_str()),
				_ => None,
			})
	}

	/// Inserts a frame, replacing the frame that occupies the same slot
	///
	/// Frames share a slot when they have the same id, and for frames that are allowed to repeat,
	/// the same description, language or picture type. Binary frames never replace anything.
	///
	/// Returns the replaced frame, if any.
	pub fn insert(&mut self, frame: Frame) -> Option<Frame> {
		if let Some(pos) = self.frames.iter().position(|f| f.same_slot(&frame)) {
			return Some(std::mem::replace(&mut self.frames[pos], frame));
		}

		self.frames.push(frame);
		None
	}

	/// Removes every frame with `id`, returning them
	pub fn remove(&mut self, id: &str) -> Vec<Frame> {
		let (removed, kept): (Vec<Frame>, Vec<Frame>) = std::mem::take(&mut self.frames)
			.into_iter()
			.partition(|f| f.id_str() == id);
		self.frames = kept;
		removed
	}

	/// Retain frames based on the predicate
	pub fn retain<P>(&mut self, predicate: P)
	where
		P: FnMut(&Frame) -> bool,
	{
		self.frames.retain(predicate)
	}

	// The id of a frame, as written in the ID3v2.4 form, in this tag's version
	pub(crate) fn native_id(&self, v4_id: &str) -> String {
		frame_ids::translate(v4_id, Id3v2Version::V4, self.original_version)
			.unwrap_or_else(|| v4_id.to_owned())
	}

	fn first_comment(&self) -> Option<&LanguageFrame> {
		let id = self.native_id("COMM");
		self.frames
			.iter()
			.filter(|f| f.id_str() == id)
			.find_map(|f| match f.value() {
				FrameValue::Comment(comment) => Some(comment),
				_ => None,
			})
	}
}

impl Accessor for Id3v2Tag {
	impl_accessor!(
		title  => "TIT2";
		artist => "TPE1";
		album  => "TALB";
		genre  => "TCON";
	);

	fn comment(&self) -> Option<Cow<'_, str>> {
		self.first_comment()
			.map(|comment| Cow::Borrowed(comment.content.as_str()))
	}

	fn set_comment(&mut self, value: String) {
		let id = self.native_id("COMM");
		let _ = self.remove(&id);
		self.frames.push(Frame::new(
			FrameId::new_unchecked(id),
			FrameValue::Comment(LanguageFrame::new(
				TextEncoding::UTF8,
				*b"XXX",
				String::new(),
				value,
			)),
		));
	}

	fn remove_comment(&mut self) {
		let id = self.native_id("COMM");
		let _ = self.remove(&id);
	}
}

#[cfg(test)]
mod tests {
	use crate::id3::v2::{Frame, FrameId, FrameValue, Id3v2Tag, Id3v2Version};
	use crate::tag::Accessor;

	#[test_log::test]
	fn accessors_follow_the_version() {
		let mut tag = Id3v2Tag::with_version(Id3v2Version::V2);
		tag.set_title(String::from("Foo title"));
		tag.set_comment(String::from("Qux comment"));

		assert_eq!(tag.get_text("TT2"), Some("Foo title"));
		assert!(tag.get("COM").is_some());
		assert_eq!(tag.title().as_deref(), Some("Foo title"));
		assert_eq!(tag.comment().as_deref(), Some("Qux comment"));

		tag.remove_title();
		assert_eq!(tag.title(), None);
		assert_eq!(tag.len(), 1);
	}

	#[test_log::test]
	fn multi_value_separator() {
		let mut tag = Id3v2Tag::new();
		tag.set_artist(String::from("Foo\0Bar"));
		assert_eq!(tag.artist().as_deref(), Some("Foo/Bar"));
		assert_eq!(tag.get_text("TPE1"), Some("Foo\0Bar"));
	}

	#[test_log::test]
	fn insert_replaces_and_binary_accumulates() {
		let mut tag = Id3v2Tag::new();
		assert!(tag.insert(Frame::text(FrameId::new("TALB").unwrap(), "One")).is_none());
		let replaced = tag.insert(Frame::text(FrameId::new("TALB").unwrap(), "Two"));
		assert!(replaced.is_some());
		assert_eq!(tag.album().as_deref(), Some("Two"));

		let private = || Frame::new(FrameId::new("PRIV").unwrap(), FrameValue::Binary(vec![1]));
		assert!(tag.insert(private()).is_none());
		assert!(tag.insert(private()).is_none());
		assert_eq!(tag.len(), 3);
		assert_eq!(tag.remove("PRIV").len(), 2);
	}
}
