//! Storage traits shared by the read and write paths

use crate::error::{Result, TagCodecError};
use crate::util::math::F80;

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

/// Length of a seekable stream, leaving the position where it was
pub(crate) trait StreamLen: Seek {
	fn total_len(&mut self) -> Result<u64> {
		let position = self.stream_position()?;
		let len = self.seek(SeekFrom::End(0))?;
		if len != position {
			self.seek(SeekFrom::Start(position))?;
		}

		Ok(len)
	}
}

impl<T: Seek> StreamLen for T {}

/// Shrink a storage object to a given length
///
/// Write paths cut the file down with this after rewriting it, and assume that afterwards
/// exactly `new_len` bytes remain. An implementation that leaves stale bytes behind corrupts
/// the file.
///
/// ```rust
/// use tagcodec::io::Truncate;
///
/// let mut data = vec![1_u8, 2, 3, 4, 5];
/// Truncate::truncate(&mut data, 3).unwrap();
/// assert_eq!(data, [1, 2, 3]);
/// ```
pub trait Truncate {
	/// Failure type, [`Infallible`](std::convert::Infallible) for in-memory buffers
	type Error: Into<TagCodecError>;

	/// Cut the object down to `new_len` bytes
	///
	/// # Errors
	///
	/// Whatever the underlying storage reports.
	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error>;
}

/// The current length of a storage object
///
/// Write paths trust this to size containers, an inaccurate value corrupts the file.
///
/// ```rust
/// use tagcodec::io::Length;
///
/// let data = vec![1_u8, 2, 3];
/// assert_eq!(Length::len(&data).unwrap(), 3);
/// ```
pub trait Length {
	/// Failure type, [`Infallible`](std::convert::Infallible) for in-memory buffers
	type Error: Into<TagCodecError>;

	/// Length in bytes
	///
	/// # Errors
	///
	/// Whatever the underlying storage reports.
	fn len(&self) -> std::result::Result<u64, Self::Error>;
}

impl Truncate for File {
	type Error = std::io::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.set_len(new_len)
	}
}

impl Length for File {
	type Error = std::io::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Ok(self.metadata()?.len())
	}
}

impl Truncate for Vec<u8> {
	type Error = std::convert::Infallible;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.truncate(usize::try_from(new_len).unwrap_or(usize::MAX));
		Ok(())
	}
}

impl Length for Vec<u8> {
	type Error = std::convert::Infallible;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Ok(self.len() as u64)
	}
}

// Wrappers defer to whatever they hold
macro_rules! forward_storage {
	($($wrapper:ty),+ $(,)?) => {$(
		impl<T: Truncate + ?Sized> Truncate for $wrapper {
			type Error = T::Error;

			fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
				Truncate::truncate(&mut **self, new_len)
			}
		}

		impl<T: Length + ?Sized> Length for $wrapper {
			type Error = T::Error;

			fn len(&self) -> std::result::Result<u64, Self::Error> {
				Length::len(&**self)
			}
		}
	)+};
}

forward_storage!(Box<T>, &mut T);

impl<T: Truncate> Truncate for Cursor<T> {
	type Error = T::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.get_mut().truncate(new_len)
	}
}

impl<T: Length> Length for Cursor<T> {
	type Error = T::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		self.get_ref().len()
	}
}

/// Everything a write path needs from its target
///
/// Blanket implemented for any [`Read`] + [`Write`] + [`Seek`] + [`Truncate`] + [`Length`] type,
/// such as [`File`] or `Cursor<Vec<u8>>`.
pub trait FileLike: Read + Write + Seek + Truncate + Length
where
	<Self as Truncate>::Error: Into<TagCodecError>,
	<Self as Length>::Error: Into<TagCodecError>,
{
}

impl<T> FileLike for T
where
	T: Read + Write + Seek + Truncate + Length,
	<T as Truncate>::Error: Into<TagCodecError>,
	<T as Length>::Error: Into<TagCodecError>,
{
}

pub(crate) trait ReadExt: Read {
	fn read_f80(&mut self) -> Result<F80>;
	fn read_fourcc(&mut self) -> Result<[u8; 4]>;
}

impl<R> ReadExt for R
where
	R: Read,
{
	fn read_f80(&mut self) -> Result<F80> {
		let mut bytes = [0; 10];
		self.read_exact(&mut bytes)?;

		Ok(F80::from_be_bytes(bytes))
	}

	fn read_fourcc(&mut self) -> Result<[u8; 4]> {
		let mut fourcc = [0; 4];
		self.read_exact(&mut fourcc)?;

		Ok(fourcc)
	}
}

/// Replace the contents of `file`, currently `original`, with `contents`
///
/// Writing starts at the first byte that differs, and the file is only cut down once the new
/// bytes are in place. An interrupted write keeps at least the unchanged prefix.
pub(crate) fn overwrite_changed<F>(file: &mut F, original: &[u8], contents: &[u8]) -> Result<()>
where
	F: FileLike,
	TagCodecError: From<<F as Truncate>::Error>,
{
	let unchanged = original
		.iter()
		.zip(contents)
		.take_while(|(old, new)| old == new)
		.count();

	if unchanged == original.len() && unchanged == contents.len() {
		log::debug!("File contents are unchanged, nothing to write");
		return Ok(());
	}

	log::trace!(
		"Writing {} bytes from offset {}",
		contents.len() - unchanged,
		unchanged
	);

	file.seek(SeekFrom::Start(unchanged as u64))?;
	file.write_all(&contents[unchanged..])?;

	if contents.len() < original.len() {
		file.truncate(contents.len() as u64)?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::{Length, StreamLen, Truncate, overwrite_changed};

	use std::io::{Cursor, Read, Seek, SeekFrom, Write};

	#[test_log::test]
	fn stream_len_keeps_position() {
		let mut cursor = Cursor::new(vec![0u8; 64]);
		cursor.seek(SeekFrom::Start(10)).unwrap();

		assert_eq!(cursor.total_len().unwrap(), 64);
		assert_eq!(cursor.stream_position().unwrap(), 10);
	}

	#[test_log::test]
	fn truncate_through_references() {
		let mut buf = vec![1u8, 2, 3, 4, 5];
		{
			let mut cursor = Cursor::new(&mut buf);
			Truncate::truncate(&mut cursor, 3).unwrap();
			assert_eq!(Length::len(&cursor).unwrap(), 3);
		}

		assert_eq!(buf, [1, 2, 3]);
	}

	#[test_log::test]
	fn file_truncate_and_length() {
		let mut file = tempfile::tempfile().unwrap();
		file.write_all(&[0; 100]).unwrap();

		Truncate::truncate(&mut file, 28).unwrap();
		assert_eq!(Length::len(&file).unwrap(), 28);
	}

	// Records the lowest offset anything was written at
	struct Recorder {
		inner: Cursor<Vec<u8>>,
		first_write: Option<u64>,
	}

	impl Read for Recorder {
		fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
			self.inner.read(buf)
		}
	}

	impl Write for Recorder {
		fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
			let pos = self.inner.position();
			self.first_write = Some(self.first_write.map_or(pos, |first| first.min(pos)));
			self.inner.write(buf)
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	impl Seek for Recorder {
		fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
			self.inner.seek(pos)
		}
	}

	impl Truncate for Recorder {
		type Error = std::convert::Infallible;

		fn truncate(&mut self, new_len: u64) -> Result<(), Self::Error> {
			Truncate::truncate(&mut self.inner, new_len)
		}
	}

	impl Length for Recorder {
		type Error = std::convert::Infallible;

		fn len(&self) -> Result<u64, Self::Error> {
			Length::len(&self.inner)
		}
	}

	fn recorder(content: &[u8]) -> Recorder {
		Recorder {
			inner: Cursor::new(content.to_vec()),
			first_write: None,
		}
	}

	#[test_log::test]
	fn overwrite_starts_at_first_difference() {
		let original = b"RIFF\x10\0\0\0WAVEdata";

		let mut file = recorder(original);
		overwrite_changed(&mut file, original, b"RIFF\x10\0\0\0WAVEDATA").unwrap();
		assert_eq!(file.first_write, Some(12));
		assert_eq!(file.inner.get_ref(), b"RIFF\x10\0\0\0WAVEDATA");

		// A prefix of the original only needs the file cut down
		let mut file = recorder(original);
		overwrite_changed(&mut file, original, b"RIFF\x10\0\0\0WA").unwrap();
		assert_eq!(file.first_write, None);
		assert_eq!(file.inner.get_ref(), b"RIFF\x10\0\0\0WA");

		// Longer contents extend it
		let mut file = recorder(original);
		overwrite_changed(&mut file, original, b"RIFF\x10\0\0\0WAVEdata!!").unwrap();
		assert_eq!(file.first_write, Some(16));
		assert_eq!(file.inner.get_ref(), b"RIFF\x10\0\0\0WAVEdata!!");

		let mut file = recorder(original);
		overwrite_changed(&mut file, original, original).unwrap();
		assert_eq!(file.first_write, None);
	}
}
