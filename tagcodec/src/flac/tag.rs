use crate::config::{ParseOptions, ParsingMode};
use crate::error::{FileDecodingError, Result};
use crate::file::FileType;
use crate::macros::{decode_err, err, try_vec};
use crate::tag::Accessor;
use crate::util::text::utf8_decode;

use std::borrow::Cow;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};

const TITLE: &str = "TITLE";
const ARTIST: &str = "ARTIST";
const ALBUM: &str = "ALBUM";
const GENRE: &str = "GENRE";
const COMMENT: &str = "COMMENT";

/// The vendor string used when a file had no comments to take one from
const DEFAULT_VENDOR: &str = "tagcodec";

/// The contents of a `VORBIS_COMMENT` block
///
/// Keys are case-insensitive, and may appear multiple times.
#[derive(Default, PartialEq, Eq, Debug, Clone)]
pub struct VorbisComments {
	/// An identifier for the encoding software
	pub(crate) vendor: String,
	/// `(KEY, VALUE)` pairs in the order they appear
	pub(crate) items: Vec<(String, String)>,
}

impl VorbisComments {
	/// Create a new empty `VorbisComments`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::flac::VorbisComments;
	///
	/// let comments = VorbisComments::new();
	/// assert!(comments.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the vendor string
	pub fn vendor(&self) -> &str {
		&self.vendor
	}

	/// Sets the vendor string
	///
	/// An empty vendor string is replaced by the file's existing one when writing.
	pub fn set_vendor(&mut self, vendor: String) {
		self.vendor = vendor;
	}

	/// Returns all `(KEY, VALUE)` pairs
	pub fn items(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + Clone {
		self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Number of items
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether there are no items
	///
	/// The vendor string doesn't count.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Gets the first value of `key`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagcodec::flac::VorbisComments;
	///
	/// let mut comments = VorbisComments::new();
	/// comments.push(String::from("TITLE"), String::from("Foo"));
	///
	/// assert_eq!(comments.get("title"), Some("Foo"));
	/// ```
	pub fn get(&self, key: &str) -> Option<&str> {
		self.items
			.iter()
			.find(|(k, _)| k.eq_ignore_ascii_case(key))
			.map(|(_, v)| v.as_str())
	}

	/// Gets every value of `key`
	pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + Clone + 'a {
		self.items
			.iter()
			.filter(move |(k, _)| k.eq_ignore_ascii_case(key))
			.map(|(_, v)| v.as_str())
	}

	/// Replaces every value of `key` with `value`
	///
	/// The item takes the position of the first existing one. Keys that aren't valid Vorbis
	/// comment keys (printable ASCII without `=`) are ignored.
	pub fn insert(&mut self, key: String, value: String) {
		if !verify_key(&key) {
			log::warn!("Ignoring invalid Vorbis comment key: {key:?}");
			return;
		}

		let mut value = Some(value);
		self.items.retain_mut(|(k, v)| {
			if !k.eq_ignore_ascii_case(&key) {
				return true;
			}

			// Only the first occurrence survives
			match value.take() {
				Some(value) => {
					k.clone_from(&key);
					*v = value;
					true
				},
				None => false,
			}
		});

		if let Some(value) = value {
			self.items.push((key, value));
		}
	}

	/// Appends an item without touching existing values of `key`
	pub fn push(&mut self, key: String, value: String) {
		if !verify_key(&key) {
			log::warn!("Ignoring invalid Vorbis comment key: {key:?}");
			return;
		}

		self.items.push((key, value));
	}

	/// Removes every value of `key`, returning them
	pub fn remove(&mut self, key: &str) -> Vec<String> {
		let mut removed = Vec::new();
		self.items.retain_mut(|(k, v)| {
			if k.eq_ignore_ascii_case(key) {
				removed.push(std::mem::take(v));
				return false;
			}

			true
		});

		removed
	}
}

fn verify_key(key: &str) -> bool {
	!key.is_empty() && key.bytes().all(|b| (0x20..=0x7D).contains(&b) && b != b'=')
}

/// A `PICTURE` block
#[derive(Default, PartialEq, Eq, Debug, Clone)]
pub struct FlacPicture {
	/// The picture type, using the ID3v2 `APIC` values (3 = front cover)
	pub picture_type: u32,
	/// The MIME type, such as `image/png`
	pub mime_type: String,
	/// A description of the picture
	pub description: String,
	/// Width in pixels
	pub width: u32,
	/// Height in pixels
	pub height: u32,
	/// Bits per pixel
	pub color_depth: u32,
	/// Number of colors for indexed images, 0 otherwise
	pub num_colors: u32,
	/// The image data
	pub data: Vec<u8>,
}

impl FlacPicture {
	/// Parse the content of a `PICTURE` block
	///
	/// # Errors
	///
	/// * The content is too short, or a length overruns it
	/// * The MIME type isn't valid UTF-8
	/// * [`ParsingMode::Strict`] and the picture type doesn't fit in a byte
	pub fn from_flac_bytes(content: &[u8], parsing_mode: ParsingMode) -> Result<Self> {
		if content.len() < 32 {
			decode_err!(@BAIL Flac, "Picture block is too short");
		}

		let mut reader = Cursor::new(content);

		let picture_type = reader.read_u32::<BigEndian>()?;
		if picture_type > 255 && parsing_mode == ParsingMode::Strict {
			decode_err!(@BAIL Flac, "Picture type is out of range");
		}

		let mime_type = read_length_prefixed(&mut reader)?;
		let mime_type = utf8_decode(mime_type)?;

		let description = read_length_prefixed(&mut reader)?;
		let description = match utf8_decode(description) {
			Ok(description) => description,
			Err(e) if parsing_mode == ParsingMode::Strict => return Err(e),
			Err(_) => {
				log::warn!("Picture description is not valid UTF-8, discarding");
				String::new()
			},
		};

		let width = reader.read_u32::<BigEndian>()?;
		let height = reader.read_u32::<BigEndian>()?;
		let color_depth = reader.read_u32::<BigEndian>()?;
		let num_colors = reader.read_u32::<BigEndian>()?;
		let data = read_length_prefixed(&mut reader)?;

		Ok(Self {
			picture_type,
			mime_type,
			description,
			width,
			height,
			color_depth,
			num_colors,
			data,
		})
	}

	/// Encode the picture as the content of a `PICTURE` block
	///
	/// # Errors
	///
	/// A field is too long for its 32-bit length prefix
	pub fn as_flac_bytes(&self) -> Result<Vec<u8>> {
		let mut content = Vec::with_capacity(32 + self.data.len());

		content.write_u32::<BigEndian>(self.picture_type)?;
		write_length_prefixed(&mut content, self.mime_type.as_bytes())?;
		write_length_prefixed(&mut content, self.description.as_bytes())?;
		content.write_u32::<BigEndian>(self.width)?;
		content.write_u32::<BigEndian>(self.height)?;
		content.write_u32::<BigEndian>(self.color_depth)?;
		content.write_u32::<BigEndian>(self.num_colors)?;
		write_length_prefixed(&mut content, &self.data)?;

		Ok(content)
	}
}

fn read_length_prefixed<R>(reader: &mut R) -> Result<Vec<u8>>
where
	R: Read + Seek,
{
	let len = reader.read_u32::<BigEndian>()?;

	let position = reader.stream_position()?;
	let end = reader.seek(SeekFrom::End(0))?;
	if u64::from(len) > end - position {
		err!(SizeMismatch);
	}

	reader.seek(SeekFrom::Start(position))?;

	let mut bytes = try_vec![0; len as usize];
	reader.read_exact(&mut bytes)?;

	Ok(bytes)
}

fn write_length_prefixed(writer: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
	let Ok(len) = u32::try_from(bytes.len()) else {
		err!(TooMuchData);
	};

	writer.write_u32::<BigEndian>(len)?;
	writer.write_all(bytes)?;

	Ok(())
}

/// The tag of a FLAC file
///
/// This is the file's Vorbis comments along with its `PICTURE` blocks, which are written back
/// together.
///
/// # Examples
///
/// ```rust
/// use tagcodec::flac::FlacTag;
/// use tagcodec::tag::Accessor;
///
/// let mut tag = FlacTag::default();
/// tag.set_artist(String::from("Foo artist"));
///
/// assert_eq!(tag.comments().get("ARTIST"), Some("Foo artist"));
/// ```
#[derive(Default, PartialEq, Eq, Debug, Clone)]
pub struct FlacTag {
	pub(crate) comments: VorbisComments,
	pub(crate) pictures: Vec<FlacPicture>,
}

impl FlacTag {
	/// Returns the Vorbis comments
	pub fn comments(&self) -> &VorbisComments {
		&self.comments
	}

	/// Returns the Vorbis comments mutably
	pub fn comments_mut(&mut self) -> &mut VorbisComments {
		&mut self.comments
	}

	/// Returns the pictures
	pub fn pictures(&self) -> &[FlacPicture] {
		&self.pictures
	}

	/// Adds a picture
	pub fn push_picture(&mut self, picture: FlacPicture) {
		self.pictures.push(picture);
	}

	/// Removes every picture
	pub fn remove_pictures(&mut self) -> Vec<FlacPicture> {
		std::mem::take(&mut self.pictures)
	}

	/// Whether there are neither comments nor pictures
	pub fn is_empty(&self) -> bool {
		self.comments.is_empty() && self.pictures.is_empty()
	}
}

macro_rules! impl_accessor {
	($($name:ident => $key:ident;)+) => {
		paste::paste! {
			$(
				fn $name(&self) -> Option<Cow<'_, str>> {
					self.comments.get($key).map(Cow::Borrowed)
				}

				fn [<set_ $name>](&mut self, value: String) {
					self.comments.insert(String::from($key), value)
				}

				fn [<remove_ $name>](&mut self) {
					let _ = self.comments.remove($key);
				}
			)+
		}
	}
}

impl Accessor for FlacTag {
	impl_accessor!(
		title   => TITLE;
		artist  => ARTIST;
		album   => ALBUM;
		genre   => GENRE;
		comment => COMMENT;
	);
}

// A 32-bit little endian length, then that many bytes
fn read_vorbis_string<'a>(data: &mut &'a [u8]) -> Result<&'a [u8]> {
	let len = data.read_u32::<LittleEndian>()? as usize;
	if len > data.len() {
		err!(SizeMismatch);
	}

	let (string, rest) = data.split_at(len);
	*data = rest;
	Ok(string)
}

// Split `KEY=VALUE`, naming what is wrong with a malformed item
fn parse_item(item: &[u8]) -> std::result::Result<(String, String), &'static str> {
	let Some(separator) = item.iter().position(|b| *b == b'=') else {
		return Err("Vorbis comment is missing a separator");
	};

	let (key, value) = (&item[..separator], &item[separator + 1..]);
	let (Ok(key), Ok(value)) = (utf8_decode(key.to_vec()), utf8_decode(value.to_vec())) else {
		return Err("Vorbis comment contains invalid UTF-8");
	};

	if !verify_key(&key) {
		return Err("Vorbis comment has an invalid key");
	}

	Ok((key, value))
}

/// Parse the content of a `VORBIS_COMMENT` block
///
/// Outside of [`ParsingMode::Strict`], malformed items are dropped with a warning.
pub(crate) fn read_comments(content: &[u8], parse_options: ParseOptions) -> Result<VorbisComments> {
	let strict = parse_options.parsing_mode == ParsingMode::Strict;
	let mut data = content;

	let vendor = match utf8_decode(read_vorbis_string(&mut data)?.to_vec()) {
		Ok(vendor) => vendor,
		Err(e) if strict => return Err(e),
		Err(_) => {
			log::warn!("Vendor string is not valid UTF-8, discarding");
			String::new()
		},
	};

	// Every item needs at least its 4 byte length
	let count = data.read_u32::<LittleEndian>()? as usize;
	if count > data.len() / 4 {
		err!(SizeMismatch);
	}

	let mut comments = VorbisComments {
		vendor,
		items: Vec::with_capacity(count),
	};

	for _ in 0..count {
		match parse_item(read_vorbis_string(&mut data)?) {
			Ok(item) => comments.items.push(item),
			Err(reason) if strict => {
				return Err(FileDecodingError::new(FileType::Flac, reason).into());
			},
			Err(reason) => log::warn!("{reason}, discarding"),
		}
	}

	Ok(comments)
}

/// Encode the content of a `VORBIS_COMMENT` block
///
/// `vendor` is used when the comments don't carry their own.
pub(crate) fn encode_comments(comments: &VorbisComments, vendor: &str) -> Result<Vec<u8>> {
	let vendor = match (comments.vendor.as_str(), vendor) {
		("", "") => DEFAULT_VENDOR,
		("", vendor) => vendor,
		(own, _) => own,
	};

	let mut content = Vec::new();
	write_vorbis_string(&mut content, vendor.as_bytes())?;

	let Ok(count) = u32::try_from(comments.items.len()) else {
		err!(TooMuchData);
	};
	content.write_u32::<LittleEndian>(count)?;

	for (key, value) in &comments.items {
		let mut item = Vec::with_capacity(key.len() + value.len() + 1);
		item.extend_from_slice(key.as_bytes());
		item.push(b'=');
		item.extend_from_slice(value.as_bytes());

		write_vorbis_string(&mut content, &item)?;
	}

	Ok(content)
}

fn write_vorbis_string(writer: &mut Vec<u8>, bytes: &[u8]) -> Result<()> {
	let Ok(len) = u32::try_from(bytes.len()) else {
		err!(TooMuchData);
	};

	writer.write_u32::<LittleEndian>(len)?;
	writer.write_all(bytes)?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::{FlacPicture, VorbisComments, encode_comments, read_comments};
	use crate::config::{ParseOptions, ParsingMode};

	#[test_log::test]
	fn keys_are_case_insensitive() {
		let mut comments = VorbisComments::new();
		comments.push(String::from("ARTIST"), String::from("A"));
		comments.push(String::from("TITLE"), String::from("T"));
		comments.push(String::from("artist"), String::from("B"));

		assert_eq!(comments.get_all("Artist").collect::<Vec<_>>(), ["A", "B"]);

		comments.insert(String::from("ARTIST"), String::from("C"));
		assert_eq!(
			comments.items().collect::<Vec<_>>(),
			[("ARTIST", "C"), ("TITLE", "T")]
		);

		assert_eq!(comments.remove("title"), ["T"]);
		assert_eq!(comments.len(), 1);
	}

	#[test_log::test]
	fn invalid_keys_are_ignored() {
		let mut comments = VorbisComments::new();
		comments.insert(String::from("A=B"), String::from("value"));
		comments.push(String::new(), String::from("value"));

		assert!(comments.is_empty());
	}

	#[test_log::test]
	fn encode_then_parse() {
		let mut comments = VorbisComments::new();
		comments.push(String::from("TITLE"), String::from("Foo=Bar"));
		comments.push(String::from("ARTIST"), String::from("Baz"));

		let content = encode_comments(&comments, "vendor").unwrap();
		assert_eq!(&content[..10], b"\x06\0\0\0vendor");

		let parsed = read_comments(&content, ParseOptions::new()).unwrap();
		assert_eq!(parsed.vendor(), "vendor");
		assert_eq!(parsed.get("TITLE"), Some("Foo=Bar"));
		assert_eq!(parsed.get("ARTIST"), Some("Baz"));
	}

	#[test_log::test]
	fn missing_separator() {
		let content = b"\0\0\0\0\x01\0\0\0\x05\0\0\0TITLE";

		let parsed = read_comments(content, ParseOptions::new()).unwrap();
		assert!(parsed.is_empty());

		assert!(
			read_comments(
				content,
				ParseOptions::new().parsing_mode(ParsingMode::Strict)
			)
			.is_err()
		);
	}

	#[test_log::test]
	fn item_count_overruns_block() {
		let content = b"\0\0\0\0\xFF\0\0\0";
		assert!(read_comments(content, ParseOptions::new()).is_err());
	}

	#[test_log::test]
	fn picture_block() {
		let picture = FlacPicture {
			picture_type: 3,
			mime_type: String::from("image/png"),
			description: String::from("cover"),
			width: 1,
			height: 1,
			color_depth: 24,
			num_colors: 0,
			data: vec![0x89, b'P', b'N', b'G'],
		};

		let bytes = picture.as_flac_bytes().unwrap();
		assert_eq!(&bytes[..4], &[0, 0, 0, 3]);
		assert_eq!(
			FlacPicture::from_flac_bytes(&bytes, ParsingMode::Strict).unwrap(),
			picture
		);

		// Data length runs past the end
		let mut truncated = bytes.clone();
		truncated.pop();
		assert!(FlacPicture::from_flac_bytes(&truncated, ParsingMode::BestAttempt).is_err());
	}
}
