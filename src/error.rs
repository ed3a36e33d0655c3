//! Contains the errors that can arise within alacenc
//!
//! The primary error is [`AlacError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.

use crate::iff::wav::Dialect;

use std::borrow::Cow;
use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

/// Alias for `Result<T, AlacError>`
pub type Result<T> = std::result::Result<T, AlacError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// Input related errors
	/// A malformed or truncated WAV/Wave64 header
	Header(HeaderError),
	/// The PCM data ended before the length declared by its chunk
	ShortRead {
		/// The number of bytes the current frame required
		expected: usize,
		/// The number of bytes actually available
		actual: usize,
	},

	// Format setup errors
	/// A bit depth the encoder cannot handle
	UnsupportedBitDepth(u16),
	/// A format code other than integer PCM
	UnsupportedFormat(u16),
	/// A channel count outside of `1..=8`
	BadChannelCount(u16),

	// Tag related errors
	/// The cover art does not start with any known image signature
	UnsupportedImage,
	/// A `N/M` track or disc number could not be parsed
	InvalidNumberPair(String),
	/// A genre name that is not in [`GENRES`](crate::tag::GENRES)
	UnknownGenre(String),
	/// A tag name that does not map to any item key
	UnknownTagKey(String),
	/// A `NAME=VALUE` tag field without the `=`
	MissingTagSeparator(String),

	// Output related errors
	/// A packet encoder produced more bytes than it declared as its upper bound
	PacketTooLarge {
		/// The size of the packet
		size: usize,
		/// The encoder's upper bound
		max: usize,
	},
	/// A box size or file offset would not fit in 32 bits
	TooMuchData,

	// Conversions for external errors
	/// Unable to open an input or output stream
	Open {
		/// The path that failed to open
		path: PathBuf,
		/// The underlying OS error
		source: std::io::Error,
	},
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
}

/// An error that arises while reading a WAV or Wave64 header
pub struct HeaderError {
	dialect: Option<Dialect>,
	description: Cow<'static, str>,
}

impl HeaderError {
	/// Create a `HeaderError` from a [`Dialect`] and description
	#[must_use]
	pub fn new(dialect: Option<Dialect>, description: impl Into<Cow<'static, str>>) -> Self {
		Self {
			dialect,
			description: description.into(),
		}
	}

	/// Returns the dialect being read when the error occurred, if known
	pub fn dialect(&self) -> Option<Dialect> {
		self.dialect
	}

	/// Returns the error description
	pub fn description(&self) -> &str {
		&self.description
	}
}

impl Debug for HeaderError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.dialect {
			Some(dialect) => write!(f, "{:?}: {:?}", dialect, self.description),
			None => write!(f, "{:?}", self.description),
		}
	}
}

impl Display for HeaderError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.dialect {
			Some(Dialect::Classic) => write!(f, "WAV: {}", self.description),
			Some(Dialect::Wave64) => write!(f, "Wave64: {}", self.description),
			None => write!(f, "{}", self.description),
		}
	}
}

impl std::error::Error for HeaderError {}

/// Errors that could occur within alacenc
pub struct AlacError {
	pub(crate) kind: ErrorKind,
}

impl AlacError {
	/// Create an `AlacError` from an [`ErrorKind`]
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}
}

impl std::error::Error for AlacError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match &self.kind {
			ErrorKind::Header(err) => Some(err),
			ErrorKind::Open { source, .. } => Some(source),
			ErrorKind::Io(err) => Some(err),
			ErrorKind::Alloc(err) => Some(err),
			_ => None,
		}
	}
}

impl Debug for AlacError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<ErrorKind> for AlacError {
	fn from(input: ErrorKind) -> Self {
		Self { kind: input }
	}
}

impl From<HeaderError> for AlacError {
	fn from(input: HeaderError) -> Self {
		Self {
			kind: ErrorKind::Header(input),
		}
	}
}

impl From<std::io::Error> for AlacError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<TryReserveError> for AlacError {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl Display for AlacError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			ErrorKind::Header(ref err) => write!(f, "{err}"),
			ErrorKind::ShortRead { expected, actual } => write!(
				f,
				"Unexpected end of PCM data (expected {expected} bytes, got {actual})"
			),

			ErrorKind::UnsupportedBitDepth(bits) => {
				write!(f, "Unsupported bitsPerSample {bits}")
			},
			ErrorKind::UnsupportedFormat(code) => write!(
				f,
				"Unsupported audio format {code:#06x}, only integer PCM can be encoded"
			),
			ErrorKind::BadChannelCount(channels) => {
				write!(f, "Unsupported number of channels {channels}")
			},

			ErrorKind::UnsupportedImage => write!(f, "Unsupported file type"),
			ErrorKind::InvalidNumberPair(ref value) => write!(
				f,
				"{value}: invalid number, expected NUMBER/TOTAL (for example 3/12)"
			),
			ErrorKind::UnknownGenre(ref genre) => write!(f, "{genre}: Unknown genre"),
			ErrorKind::UnknownTagKey(ref key) => write!(f, "{key}: Unknown tag name"),
			ErrorKind::MissingTagSeparator(ref field) => {
				write!(f, "{field}: tag field contains no '=' character")
			},

			ErrorKind::PacketTooLarge { size, max } => write!(
				f,
				"Encoded packet of {size} bytes exceeds the encoder's bound of {max} bytes"
			),
			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to write more data than fits in a 32-bit sized container"
			),

			ErrorKind::Open {
				ref path,
				ref source,
			} => write!(f, "{}: {source}", path.display()),
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn header_error_names_dialect() {
		let err = AlacError::from(HeaderError::new(
			Some(Dialect::Wave64),
			"data chunk not found",
		));
		assert_eq!(err.to_string(), "Wave64: data chunk not found");

		let err = AlacError::from(HeaderError::new(None, "missing RIFF tag"));
		assert_eq!(err.to_string(), "missing RIFF tag");
	}

	#[test]
	fn open_error_wraps_os_text() {
		let err = AlacError::new(ErrorKind::Open {
			path: PathBuf::from("missing.wav"),
			source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
		});
		assert_eq!(err.to_string(), "missing.wav: No such file or directory");
		assert!(std::error::Error::source(&err).is_some());
	}

	#[test]
	fn io_error_converts() {
		let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
		let err: AlacError = io_err.into();
		assert!(matches!(err.kind(), ErrorKind::Io(_)));
		assert_eq!(err.to_string(), "access denied");
	}
}
