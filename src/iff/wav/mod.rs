//! WAV and Wave64 header items

mod properties;
mod read;
mod write;

use crate::error::Result;

use std::io::Read;

// Exports
pub use properties::{WavExtension, WavFormat};

/// The framing used by the input file
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
	/// Classic RIFF/WAVE, 32-bit little endian chunk sizes
	Classic,
	/// Sony Wave64, GUID chunk identifiers and 64-bit sizes
	Wave64,
}

/// The identifier of a chunk
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChunkId {
	/// A classic RIFF four character code
	Fourcc([u8; 4]),
	/// A Wave64 GUID
	Guid([u8; 16]),
}

impl ChunkId {
	/// The first four bytes of the identifier
	///
	/// For Wave64 GUIDs, this is the ASCII tag the GUID starts with.
	pub fn tag(&self) -> [u8; 4] {
		match self {
			ChunkId::Fourcc(fourcc) => *fourcc,
			ChunkId::Guid(guid) => [guid[0], guid[1], guid[2], guid[3]],
		}
	}

	pub(crate) fn as_bytes(&self) -> &[u8] {
		match self {
			ChunkId::Fourcc(fourcc) => fourcc,
			ChunkId::Guid(guid) => guid,
		}
	}
}

/// A chunk that is neither `fmt ` nor `data`, kept verbatim
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtherChunk {
	pub(crate) id: ChunkId,
	pub(crate) size: u64,
	pub(crate) data: Vec<u8>,
}

impl OtherChunk {
	/// The chunk identifier
	pub fn id(&self) -> ChunkId {
		self.id
	}

	/// The size as stored in the chunk header
	///
	/// NOTE: Wave64 sizes include the 24 byte chunk header.
	pub fn size(&self) -> u64 {
		self.size
	}

	/// The chunk body
	pub fn data(&self) -> &[u8] {
		&self.data
	}
}

/// A parsed WAV or Wave64 header
///
/// The header is read up to, and not including, the first byte of PCM data.
/// Use [`WavHeader::data_start`] and [`WavHeader::data_size`] to locate the audio.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WavHeader {
	pub(crate) dialect: Dialect,
	pub(crate) file_size: u64,
	pub(crate) fmt_size: u32,
	pub(crate) format: WavFormat,
	pub(crate) channels: u16,
	pub(crate) sample_rate: u32,
	pub(crate) byte_rate: u32,
	pub(crate) block_align: u16,
	pub(crate) bits_per_sample: u16,
	pub(crate) extension_size: Option<u16>,
	pub(crate) extension: Option<WavExtension>,
	pub(crate) data_start: u64,
	pub(crate) data_size: u64,
	pub(crate) other_chunks: Vec<OtherChunk>,
}

impl Default for WavHeader {
	fn default() -> Self {
		Self {
			dialect: Dialect::Classic,
			file_size: 0,
			fmt_size: 16,
			format: WavFormat::Pcm,
			channels: 0,
			sample_rate: 0,
			byte_rate: 0,
			block_align: 0,
			bits_per_sample: 0,
			extension_size: None,
			extension: None,
			data_start: 0,
			data_size: 0,
			other_chunks: Vec::new(),
		}
	}
}

impl WavHeader {
	/// Read a header from a stream positioned at its first byte
	///
	/// On success, `reader` is positioned at the first byte of PCM data.
	///
	/// # Errors
	///
	/// * The stream does not start with a `RIFF` or `riff` tag
	/// * A chunk is malformed (see [`HeaderError`](crate::error::HeaderError))
	/// * The stream ends before the `data` chunk
	pub fn read_from<R>(reader: &mut R) -> Result<Self>
	where
		R: Read,
	{
		read::read_from(reader)
	}

	/// The framing of the source
	pub fn dialect(&self) -> Dialect {
		self.dialect
	}

	/// Whether the source used 64-bit Wave64 framing
	pub fn is_64bit(&self) -> bool {
		self.dialect == Dialect::Wave64
	}

	/// Total file size as declared by the RIFF header
	pub fn file_size(&self) -> u64 {
		self.file_size
	}

	/// Format of the audio
	pub fn format(&self) -> WavFormat {
		self.format
	}

	/// Channel count
	pub fn channels(&self) -> u16 {
		self.channels
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Average bytes per second, as declared
	pub fn byte_rate(&self) -> u32 {
		self.byte_rate
	}

	/// Bytes per sample frame (all channels)
	pub fn block_align(&self) -> u16 {
		self.block_align
	}

	/// Bits per sample
	pub fn bits_per_sample(&self) -> u16 {
		self.bits_per_sample
	}

	/// The `cbSize` field of an 18 or 40 byte fmt chunk
	pub fn extension_size(&self) -> Option<u16> {
		self.extension_size
	}

	/// The extensible fields, only present for a 40 byte fmt chunk
	pub fn extension(&self) -> Option<&WavExtension> {
		self.extension.as_ref()
	}

	/// Byte offset of the first PCM byte in the source
	pub fn data_start(&self) -> u64 {
		self.data_start
	}

	/// Length of the PCM data in bytes
	pub fn data_size(&self) -> u64 {
		self.data_size
	}

	/// Every chunk that isn't `fmt ` or `data`, in file order
	pub fn other_chunks(&self) -> &[OtherChunk] {
		&self.other_chunks
	}

	/// The other chunks as they appeared in the source (id + size + body)
	pub fn other_chunks_bytes(&self) -> Vec<u8> {
		let mut out = Vec::new();
		for chunk in &self.other_chunks {
			out.extend_from_slice(chunk.id.as_bytes());
			match self.dialect {
				Dialect::Classic => out.extend_from_slice(&(chunk.size as u32).to_le_bytes()),
				Dialect::Wave64 => out.extend_from_slice(&chunk.size.to_le_bytes()),
			}
			out.extend_from_slice(&chunk.data);
		}

		out
	}

	/// Duration of the audio in milliseconds, rounded down
	pub fn duration(&self) -> u64 {
		if self.byte_rate == 0 {
			return 0;
		}

		(self.data_size * 1000) / u64::from(self.byte_rate)
	}

	/// Bytes per second derived from the stream parameters, rather than the declared byte rate
	pub fn bytes_per_second(&self) -> u32 {
		u32::from(self.channels) * u32::from(self.bits_per_sample) * self.sample_rate / 8
	}

	/// Whether this is 16-bit, 44.1 kHz stereo
	pub fn is_cd_quality(&self) -> bool {
		const CD_CHANNELS: u16 = 2;
		const CD_BITS_PER_SAMPLE: u16 = 16;
		const CD_SAMPLE_RATE: u32 = 44100;
		const CD_BYTE_RATE: u32 = 176_400;

		self.channels == CD_CHANNELS
			&& self.bits_per_sample == CD_BITS_PER_SAMPLE
			&& self.sample_rate == CD_SAMPLE_RATE
			&& self.byte_rate == CD_BYTE_RATE
	}

	/// Whether the samples are integer PCM, either directly or through an extensible sub-format
	pub fn is_integer_pcm(&self) -> bool {
		match self.format {
			WavFormat::Pcm => true,
			WavFormat::Extensible => self
				.extension
				.map_or(false, |ext| WavFormat::from(ext.sub_format_code()) == WavFormat::Pcm),
			_ => false,
		}
	}

	/// Change the length of the PCM data, updating the file size to match
	pub fn resize_data(&mut self, data_size: u64) {
		self.data_size = data_size;
		self.file_size = self.data_start + data_size;
	}
}
