use super::properties::{WavExtension, WavFormat};
use super::{ChunkId, Dialect, OtherChunk, WavHeader};
use crate::error::{AlacError, Result};
use crate::macros::{header_err, try_vec};

use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

pub(super) const RIFF: [u8; 4] = *b"RIFF";
pub(super) const WAVE: [u8; 4] = *b"WAVE";
pub(super) const FMT: [u8; 4] = *b"fmt ";
pub(super) const DATA: [u8; 4] = *b"data";

pub(super) const WAVE64_RIFF: [u8; 4] = *b"riff";
pub(super) const WAVE64_WAVE: [u8; 4] = *b"wave";

/// 16 byte GUID + 64-bit size
pub(super) const WAVE64_CHUNK_HEADER_SIZE: u64 = 24;

pub(super) const FMT_CHUNK_MIN: u32 = 16;
pub(super) const FMT_CHUNK_MID: u32 = 18;
pub(super) const FMT_CHUNK_EXT: u32 = 40;

/// Tracks the byte position while reading, since the source may not be seekable
struct HeaderReader<'a, R> {
	reader: &'a mut R,
	pos: u64,
	dialect: Option<Dialect>,
}

impl<'a, R> HeaderReader<'a, R>
where
	R: Read,
{
	fn new(reader: &'a mut R) -> Self {
		Self {
			reader,
			pos: 0,
			dialect: None,
		}
	}

	fn eof(&self, err: std::io::Error) -> AlacError {
		if err.kind() == std::io::ErrorKind::UnexpectedEof {
			return match self.dialect {
				Some(Dialect::Classic) => {
					header_err!(Classic, format!("Unexpected end of file at {}", self.pos)).into()
				},
				Some(Dialect::Wave64) => {
					header_err!(Wave64, format!("Unexpected end of file at {}", self.pos)).into()
				},
				None => header_err!(format!("Unexpected end of file at {}", self.pos)).into(),
			};
		}

		err.into()
	}

	fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
		if let Err(e) = self.reader.read_exact(buf) {
			return Err(self.eof(e));
		}

		self.pos += buf.len() as u64;
		Ok(())
	}

	fn fourcc(&mut self) -> Result<[u8; 4]> {
		let mut fourcc = [0; 4];
		self.read_exact(&mut fourcc)?;
		Ok(fourcc)
	}

	fn guid(&mut self) -> Result<[u8; 16]> {
		let mut guid = [0; 16];
		self.read_exact(&mut guid)?;
		Ok(guid)
	}

	fn bytes(&mut self, len: u64) -> Result<Vec<u8>> {
		let mut content = try_vec![0; len as usize];
		self.read_exact(&mut content)?;
		Ok(content)
	}

	fn skip(&mut self, len: u64) -> Result<()> {
		let copied = std::io::copy(&mut self.reader.by_ref().take(len), &mut std::io::sink())?;
		self.pos += copied;

		if copied < len {
			let e = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
			return Err(self.eof(e));
		}

		Ok(())
	}

	fn u16(&mut self) -> Result<u16> {
		match self.reader.read_u16::<LittleEndian>() {
			Ok(n) => {
				self.pos += 2;
				Ok(n)
			},
			Err(e) => Err(self.eof(e)),
		}
	}

	fn u32(&mut self) -> Result<u32> {
		match self.reader.read_u32::<LittleEndian>() {
			Ok(n) => {
				self.pos += 4;
				Ok(n)
			},
			Err(e) => Err(self.eof(e)),
		}
	}

	fn u64(&mut self) -> Result<u64> {
		match self.reader.read_u64::<LittleEndian>() {
			Ok(n) => {
				self.pos += 8;
				Ok(n)
			},
			Err(e) => Err(self.eof(e)),
		}
	}
}

pub(super) fn read_from<R>(data: &mut R) -> Result<WavHeader>
where
	R: Read,
{
	let mut reader = HeaderReader::new(data);
	let tag = reader.fourcc()?;

	match tag {
		RIFF => {
			reader.dialect = Some(Dialect::Classic);
			read_classic(&mut reader)
		},
		WAVE64_RIFF => {
			reader.dialect = Some(Dialect::Wave64);
			// The rest of the 16 byte RIFF GUID
			reader.skip(12)?;
			read_wave64(&mut reader)
		},
		_ => header_err!(@BAIL "WAVE header is missing RIFF tag"),
	}
}

fn read_classic<R>(reader: &mut HeaderReader<'_, R>) -> Result<WavHeader>
where
	R: Read,
{
	let mut header = WavHeader {
		dialect: Dialect::Classic,
		file_size: u64::from(reader.u32()?) + 8,
		..WavHeader::default()
	};

	if reader.fourcc()? != WAVE {
		header_err!(@BAIL Classic, "WAVE header is missing WAVE tag");
	}

	let mut found_fmt = false;
	while reader.pos < header.file_size {
		let id = reader.fourcc()?;
		let size = reader.u32()?;

		if id == DATA {
			if !found_fmt {
				log::warn!("WAV: Found data chunk before fmt chunk");
			}

			header.data_size = u64::from(size);
			header.data_start = reader.pos;
			check_data_bounds(&header);

			log::debug!(
				"WAV: {} bytes of audio data at offset {}",
				header.data_size,
				header.data_start
			);
			return Ok(header);
		}

		if size == 0 {
			header_err!(@BAIL Classic, format!("Incorrect chunk size 0 at {}", reader.pos - 4));
		}

		if id == FMT {
			read_fmt_chunk(reader, &mut header, size)?;
			found_fmt = true;
			continue;
		}

		log::debug!(
			"WAV: Keeping chunk {:?} ({} bytes)",
			String::from_utf8_lossy(&id),
			size
		);
		let data = reader.bytes(u64::from(size))?;
		header.other_chunks.push(OtherChunk {
			id: ChunkId::Fourcc(id),
			size: u64::from(size),
			data,
		});
	}

	header_err!(@BAIL Classic, "data chunk not found");
}

// All chunks are aligned on 8-byte boundaries, but their size fields do not include the padding.
fn read_wave64<R>(reader: &mut HeaderReader<'_, R>) -> Result<WavHeader>
where
	R: Read,
{
	let mut header = WavHeader {
		dialect: Dialect::Wave64,
		file_size: reader.u64()?,
		..WavHeader::default()
	};

	if reader.guid()?[..4] != WAVE64_WAVE {
		header_err!(@BAIL Wave64, "WAVE64 header is missing WAVE tag");
	}

	let mut found_fmt = false;
	while reader.pos < header.file_size {
		let misalignment = reader.pos % 8;
		if misalignment != 0 {
			reader.skip(8 - misalignment)?;
		}

		let guid = reader.guid()?;
		let size = reader.u64()?;
		let id = ChunkId::Guid(guid);

		if size < WAVE64_CHUNK_HEADER_SIZE {
			header_err!(@BAIL Wave64, format!(
				"Incorrect chunk size {} at {}",
				size,
				reader.pos - 8
			));
		}

		let body_size = size - WAVE64_CHUNK_HEADER_SIZE;

		if id.tag() == DATA {
			if !found_fmt {
				log::warn!("Wave64: Found data chunk before fmt chunk");
			}

			header.data_size = body_size;
			header.data_start = reader.pos;
			check_data_bounds(&header);

			log::debug!(
				"Wave64: {} bytes of audio data at offset {}",
				header.data_size,
				header.data_start
			);
			return Ok(header);
		}

		if id.tag() == FMT {
			let Ok(fmt_size) = u32::try_from(body_size) else {
				header_err!(@BAIL Wave64, "fmt chunk in WAVE header has incorrect length");
			};

			read_fmt_chunk(reader, &mut header, fmt_size)?;
			found_fmt = true;
			continue;
		}

		log::debug!("Wave64: Keeping chunk {:02X?} ({} bytes)", guid, body_size);
		let data = reader.bytes(body_size)?;
		header.other_chunks.push(OtherChunk { id, size, data });
	}

	header_err!(@BAIL Wave64, "data chunk not found");
}

fn read_fmt_chunk<R>(
	reader: &mut HeaderReader<'_, R>,
	header: &mut WavHeader,
	size: u32,
) -> Result<()>
where
	R: Read,
{
	if size != FMT_CHUNK_MIN && size != FMT_CHUNK_MID && size != FMT_CHUNK_EXT {
		return Err(fmt_err(header.dialect, "fmt chunk in WAVE header has incorrect length"));
	}

	header.fmt_size = size;
	header.format = WavFormat::from(reader.u16()?);
	header.channels = reader.u16()?;
	header.sample_rate = reader.u32()?;
	header.byte_rate = reader.u32()?;
	header.block_align = reader.u16()?;
	header.bits_per_sample = reader.u16()?;

	if size == FMT_CHUNK_MIN {
		return Ok(());
	}

	let extension_size = reader.u16()?;
	header.extension_size = Some(extension_size);

	if size == FMT_CHUNK_MID {
		return Ok(());
	}

	if u32::from(extension_size) != FMT_CHUNK_EXT - FMT_CHUNK_MID {
		return Err(fmt_err(
			header.dialect,
			"Size of the extension in WAVE header has incorrect length",
		));
	}

	header.extension = Some(WavExtension {
		valid_bits_per_sample: reader.u16()?,
		channel_mask: reader.u32()?,
		sub_format: reader.guid()?,
	});

	Ok(())
}

fn fmt_err(dialect: Dialect, description: &'static str) -> AlacError {
	match dialect {
		Dialect::Classic => header_err!(Classic, description).into(),
		Dialect::Wave64 => header_err!(Wave64, description).into(),
	}
}

fn check_data_bounds(header: &WavHeader) {
	let end = header.data_start.saturating_add(header.data_size);
	if end > header.file_size {
		log::warn!(
			"{:?}: data chunk ends at {} but the file size is declared as {}",
			header.dialect,
			end,
			header.file_size
		);
	}
}
