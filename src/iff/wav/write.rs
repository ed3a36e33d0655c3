use super::read::{DATA, FMT, FMT_CHUNK_MIN, RIFF, WAVE, WAVE64_CHUNK_HEADER_SIZE};
use super::{ChunkId, WavHeader};
use crate::error::Result;
use crate::macros::err;

use byteorder::{LittleEndian, WriteBytesExt};

const WAVE64_GUID_RIFF: [u8; 16] = [
	0x72, 0x69, 0x66, 0x66, 0x2E, 0x91, 0xCF, 0x11, 0xA5, 0xD6, 0x28, 0xDB, 0x04, 0xC1, 0x00, 0x00,
];
const WAVE64_GUID_WAVE: [u8; 16] = [
	0x77, 0x61, 0x76, 0x65, 0xF3, 0xAC, 0xD3, 0x11, 0x8C, 0xD1, 0x00, 0xC0, 0x4F, 0x8E, 0xDB, 0x8A,
];
const WAVE64_GUID_FMT: [u8; 16] = [
	0x66, 0x6D, 0x74, 0x20, 0xF3, 0xAC, 0xD3, 0x11, 0x8C, 0xD1, 0x00, 0xC0, 0x4F, 0x8E, 0xDB, 0x8A,
];
const WAVE64_GUID_DATA: [u8; 16] = [
	0x64, 0x61, 0x74, 0x61, 0xF3, 0xAC, 0xD3, 0x11, 0x8C, 0xD1, 0x00, 0xC0, 0x4F, 0x8E, 0xDB, 0x8A,
];

impl WavHeader {
	/// Create a classic RIFF/WAVE header for this audio
	///
	/// The result ends with the `data` chunk header, so the PCM data can be appended directly.
	/// Chunks other than `fmt ` and `data` are only written if `keep_other_chunks` is set.
	///
	/// # Errors
	///
	/// The file would be larger than 4 GiB
	pub fn to_classic_bytes(&self, keep_other_chunks: bool) -> Result<Vec<u8>> {
		let mut out = Vec::new();
		out.extend_from_slice(&RIFF);
		out.write_u32::<LittleEndian>(0)?;
		out.extend_from_slice(&WAVE);

		out.extend_from_slice(&FMT);
		out.write_u32::<LittleEndian>(self.fmt_size)?;
		self.write_fmt_body(&mut out)?;

		if keep_other_chunks {
			for chunk in &self.other_chunks {
				out.extend_from_slice(&chunk.id.tag());
				out.write_u32::<LittleEndian>(chunk.data.len() as u32)?;
				out.extend_from_slice(&chunk.data);
			}
		}

		let Ok(data_size) = u32::try_from(self.data_size) else {
			err!(TooMuchData);
		};

		out.extend_from_slice(&DATA);
		out.write_u32::<LittleEndian>(data_size)?;

		let Ok(riff_size) = u32::try_from(self.data_size + out.len() as u64 - 8) else {
			err!(TooMuchData);
		};

		out[4..8].copy_from_slice(&riff_size.to_le_bytes());
		Ok(out)
	}

	/// Create a Wave64 header for this audio
	///
	/// Every chunk size includes its 24 byte header, and chunks are padded to 8 byte boundaries.
	pub fn to_wave64_bytes(&self) -> Result<Vec<u8>> {
		let mut out = Vec::new();
		out.extend_from_slice(&WAVE64_GUID_RIFF);
		out.write_u64::<LittleEndian>(0)?;
		out.extend_from_slice(&WAVE64_GUID_WAVE);

		out.extend_from_slice(&WAVE64_GUID_FMT);
		out.write_u64::<LittleEndian>(u64::from(self.fmt_size) + WAVE64_CHUNK_HEADER_SIZE)?;
		self.write_fmt_body(&mut out)?;
		pad_to_8(&mut out);

		for chunk in &self.other_chunks {
			match chunk.id {
				ChunkId::Guid(guid) => out.extend_from_slice(&guid),
				ChunkId::Fourcc(fourcc) => {
					// Registered RIFF chunk GUIDs share this suffix
					out.extend_from_slice(&fourcc);
					out.extend_from_slice(&WAVE64_GUID_FMT[4..]);
				},
			}
			out.write_u64::<LittleEndian>(chunk.data.len() as u64 + WAVE64_CHUNK_HEADER_SIZE)?;
			out.extend_from_slice(&chunk.data);
			pad_to_8(&mut out);
		}

		out.extend_from_slice(&WAVE64_GUID_DATA);
		out.write_u64::<LittleEndian>(self.data_size + WAVE64_CHUNK_HEADER_SIZE)?;

		let file_size = out.len() as u64 + self.data_size;
		out[16..24].copy_from_slice(&file_size.to_le_bytes());
		Ok(out)
	}

	fn write_fmt_body(&self, out: &mut Vec<u8>) -> Result<()> {
		out.write_u16::<LittleEndian>(self.format.code())?;
		out.write_u16::<LittleEndian>(self.channels)?;
		out.write_u32::<LittleEndian>(self.sample_rate)?;
		out.write_u32::<LittleEndian>(self.byte_rate)?;
		out.write_u16::<LittleEndian>(self.block_align)?;
		out.write_u16::<LittleEndian>(self.bits_per_sample)?;

		if self.fmt_size > FMT_CHUNK_MIN {
			out.write_u16::<LittleEndian>(self.extension_size.unwrap_or_default())?;
		}

		if let Some(ext) = self.extension {
			out.write_u16::<LittleEndian>(ext.valid_bits_per_sample)?;
			out.write_u32::<LittleEndian>(ext.channel_mask)?;
			out.extend_from_slice(&ext.sub_format);
		}

		Ok(())
	}
}

fn pad_to_8(out: &mut Vec<u8>) {
	let misalignment = out.len() % 8;
	if misalignment != 0 {
		out.resize(out.len() + 8 - misalignment, 0);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::iff::wav::{Dialect, OtherChunk, WavExtension, WavFormat};

	use std::io::Cursor;

	fn header() -> WavHeader {
		WavHeader {
			channels: 2,
			sample_rate: 48000,
			byte_rate: 288_000,
			block_align: 6,
			bits_per_sample: 24,
			data_size: 12,
			other_chunks: vec![OtherChunk {
				id: ChunkId::Fourcc(*b"LIST"),
				size: 5,
				data: b"INFOx".to_vec(),
			}],
			..WavHeader::default()
		}
	}

	#[test]
	fn classic_rereads() {
		let header = header();
		let mut file = header.to_classic_bytes(true).unwrap();
		let header_len = file.len() as u64;
		file.extend_from_slice(&[0; 12]);

		let reread = WavHeader::read_from(&mut Cursor::new(file)).unwrap();
		assert_eq!(reread.data_start(), header_len);
		assert_eq!(reread.data_size(), 12);
		assert_eq!(reread.sample_rate(), 48000);
		assert_eq!(reread.other_chunks()[0].data(), b"INFOx");
		assert_eq!(reread.file_size(), header_len + 12);
	}

	#[test]
	fn classic_drops_other_chunks() {
		let file = header().to_classic_bytes(false).unwrap();
		assert_eq!(file.len(), 12 + 8 + 16 + 8);
	}

	#[test]
	fn classic_too_large() {
		let header = WavHeader {
			data_size: u64::from(u32::MAX),
			..header()
		};
		assert!(header.to_classic_bytes(false).is_err());
	}

	#[test]
	fn wave64_rereads() {
		let mut sub_format = [0; 16];
		sub_format[0] = 1;

		let header = WavHeader {
			fmt_size: 40,
			format: WavFormat::Extensible,
			extension_size: Some(22),
			extension: Some(WavExtension {
				valid_bits_per_sample: 24,
				channel_mask: 3,
				sub_format,
			}),
			..header()
		};

		let mut file = header.to_wave64_bytes().unwrap();
		assert_eq!(file.len() % 8, 0);
		let header_len = file.len() as u64;
		file.extend_from_slice(&[0; 12]);

		let reread = WavHeader::read_from(&mut Cursor::new(file)).unwrap();
		assert_eq!(reread.dialect(), Dialect::Wave64);
		assert_eq!(reread.data_start(), header_len);
		assert_eq!(reread.data_size(), 12);
		assert_eq!(reread.extension(), header.extension());
		assert_eq!(reread.other_chunks()[0].id().tag(), *b"LIST");
		assert_eq!(reread.other_chunks()[0].data(), b"INFOx");
		assert!(reread.is_integer_pcm());
	}
}
