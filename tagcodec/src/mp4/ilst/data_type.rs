/// The [well known] types of a `data` atom
///
/// [well known]: https://developer.apple.com/documentation/quicktime-file-format/well-known_types
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DataType {
	/// Reserved for use where no type needs to be indicated
	Reserved,
	/// UTF-8 string without any count or NULL terminator
	Utf8,
	/// A big-endian UTF-16 string
	Utf16,
	/// A JPEG in a JFIF wrapper
	Jpeg,
	/// A PNG in a PNG wrapper
	Png,
	/// A big-endian signed integer in 1,2,3 or 4 bytes
	BeSignedInteger,
	/// A big-endian unsigned integer in 1,2,3 or 4 bytes
	BeUnsignedInteger,
	/// Windows bitmap format graphics
	Bmp,
	/// Any other type
	Other(u32),
}

impl From<u32> for DataType {
	fn from(value: u32) -> Self {
		match value {
			0 => Self::Reserved,
			1 => Self::Utf8,
			2 => Self::Utf16,
			13 => Self::Jpeg,
			14 => Self::Png,
			21 => Self::BeSignedInteger,
			22 => Self::BeUnsignedInteger,
			27 => Self::Bmp,
			other => Self::Other(other),
		}
	}
}

impl From<DataType> for u32 {
	fn from(value: DataType) -> Self {
		match value {
			DataType::Reserved => 0,
			DataType::Utf8 => 1,
			DataType::Utf16 => 2,
			DataType::Jpeg => 13,
			DataType::Png => 14,
			DataType::BeSignedInteger => 21,
			DataType::BeUnsignedInteger => 22,
			DataType::Bmp => 27,
			DataType::Other(other) => other,
		}
	}
}

impl DataType {
	/// Whether the type is one of the image types
	pub fn is_image(self) -> bool {
		matches!(self, Self::Jpeg | Self::Png | Self::Bmp)
	}
}
