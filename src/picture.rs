//! Cover art

use crate::error::Result;
use crate::macros::err;

use std::fmt::{Display, Formatter};
use std::io::Read;

/// Image types that can be embedded as cover art
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MimeType {
	/// JPEG image
	Jpeg,
	/// PNG image
	Png,
	/// BMP image
	Bmp,
	/// GIF image
	Gif,
}

impl MimeType {
	/// Identify an image from its leading bytes
	///
	/// # Examples
	///
	/// ```rust
	/// use alacenc::picture::MimeType;
	///
	/// assert_eq!(MimeType::from_magic(&[0xFF, 0xD8, 0xFF, 0xDB]), Some(MimeType::Jpeg));
	/// assert_eq!(MimeType::from_magic(b"GIF89a"), Some(MimeType::Gif));
	/// assert_eq!(MimeType::from_magic(b"RIFF"), None);
	/// ```
	pub fn from_magic(data: &[u8]) -> Option<Self> {
		match data {
			[0xFF, 0xD8, 0xFF, 0xDB | 0xE0 | 0xE1 | 0xE2 | 0xE8 | 0xEE, ..] => Some(Self::Jpeg),
			[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(Self::Png),
			[b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some(Self::Gif),
			[b'B', b'M', ..] => Some(Self::Bmp),
			_ => None,
		}
	}

	/// The well known data type code of an MP4 `data` atom holding this image
	pub fn data_type(self) -> u32 {
		match self {
			Self::Gif => 12,
			Self::Jpeg => 13,
			Self::Png => 14,
			Self::Bmp => 27,
		}
	}

	/// Get a str from a `MimeType`
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Jpeg => "image/jpeg",
			Self::Png => "image/png",
			Self::Bmp => "image/bmp",
			Self::Gif => "image/gif",
		}
	}
}

impl Display for MimeType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Cover art, with its type sniffed from the content
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Picture {
	pub(crate) mime_type: MimeType,
	pub(crate) data: Vec<u8>,
}

impl Picture {
	/// Create a `Picture` from a reader
	///
	/// The whole reader is consumed.
	///
	/// # Errors
	///
	/// * `reader` fails
	/// * The data does not start with a known image signature
	pub fn from_reader<R>(reader: &mut R) -> Result<Self>
	where
		R: Read,
	{
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;

		Self::from_data(data)
	}

	/// Create a `Picture` from raw image data
	///
	/// # Errors
	///
	/// The data does not start with a known image signature
	pub fn from_data(data: Vec<u8>) -> Result<Self> {
		let Some(mime_type) = MimeType::from_magic(&data) else {
			err!(UnsupportedImage);
		};

		log::debug!("Cover art: {} ({} bytes)", mime_type, data.len());
		Ok(Self { mime_type, data })
	}

	/// The image type
	pub fn mime_type(&self) -> MimeType {
		self.mime_type
	}

	/// The image data
	pub fn data(&self) -> &[u8] {
		&self.data
	}
}
