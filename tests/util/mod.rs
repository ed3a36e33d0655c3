#![allow(dead_code)]

/// The 12 bytes following the fourcc in every registered Wave64 GUID, except `riff`
pub const WAVE64_GUID_SUFFIX: [u8; 12] = [
	0xF3, 0xAC, 0xD3, 0x11, 0x8C, 0xD1, 0x00, 0xC0, 0x4F, 0x8E, 0xDB, 0x8A,
];
pub const WAVE64_RIFF_GUID: [u8; 16] = [
	b'r', b'i', b'f', b'f', 0x2E, 0x91, 0xCF, 0x11, 0xA5, 0xD6, 0x28, 0xDB, 0x04, 0xC1, 0x00, 0x00,
];

pub fn fmt_chunk(format: u16, channels: u16, sample_rate: u32, bits_per_sample: u16) -> Vec<u8> {
	let block_align = channels * ((bits_per_sample + 7) / 8);

	let mut fmt = Vec::new();
	fmt.extend_from_slice(&format.to_le_bytes());
	fmt.extend_from_slice(&channels.to_le_bytes());
	fmt.extend_from_slice(&sample_rate.to_le_bytes());
	fmt.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
	fmt.extend_from_slice(&block_align.to_le_bytes());
	fmt.extend_from_slice(&bits_per_sample.to_le_bytes());
	fmt
}

/// A classic RIFF/WAVE file, with `extra` chunks placed between `fmt ` and `data`
pub fn classic_wav(fmt: &[u8], extra: &[([u8; 4], Vec<u8>)], data: &[u8]) -> Vec<u8> {
	let mut body = Vec::new();
	body.extend_from_slice(b"WAVE");

	let chunks = std::iter::once((*b"fmt ", fmt.to_vec()))
		.chain(extra.iter().cloned())
		.chain(std::iter::once((*b"data", data.to_vec())));
	for (id, content) in chunks {
		body.extend_from_slice(&id);
		body.extend_from_slice(&(content.len() as u32).to_le_bytes());
		body.extend_from_slice(&content);
	}

	let mut file = Vec::new();
	file.extend_from_slice(b"RIFF");
	file.extend_from_slice(&(body.len() as u32).to_le_bytes());
	file.extend_from_slice(&body);
	file
}

pub fn wave64_guid(fourcc: &[u8; 4]) -> [u8; 16] {
	let mut guid = [0; 16];
	guid[..4].copy_from_slice(fourcc);
	guid[4..].copy_from_slice(&WAVE64_GUID_SUFFIX);
	guid
}

/// A Wave64 file, with every chunk padded to 8 bytes
pub fn wave64(fmt: &[u8], extra: &[([u8; 4], Vec<u8>)], data: &[u8]) -> Vec<u8> {
	let mut file = Vec::new();
	file.extend_from_slice(&WAVE64_RIFF_GUID);
	file.extend_from_slice(&[0; 8]);
	file.extend_from_slice(&wave64_guid(b"wave"));

	let chunks = std::iter::once((*b"fmt ", fmt.to_vec()))
		.chain(extra.iter().cloned())
		.chain(std::iter::once((*b"data", data.to_vec())));
	for (id, content) in chunks {
		while file.len() % 8 != 0 {
			file.push(0);
		}

		file.extend_from_slice(&wave64_guid(&id));
		file.extend_from_slice(&(content.len() as u64 + 24).to_le_bytes());
		file.extend_from_slice(&content);
	}

	let len = file.len() as u64;
	file[16..24].copy_from_slice(&len.to_le_bytes());
	file
}

/// A position in an encoded file
#[derive(Copy, Clone, Debug)]
pub struct AtomRef<'a> {
	pub ident: [u8; 4],
	pub offset: usize,
	pub body: &'a [u8],
}

impl<'a> AtomRef<'a> {
	pub fn size(&self) -> usize {
		self.body.len() + 8
	}

	/// Bytes in front of the child atoms
	fn children_start(&self) -> usize {
		match &self.ident {
			b"meta" => 4,
			b"stsd" => 8,
			b"dref" => 8,
			_ => 0,
		}
	}

	pub fn children(&self) -> Vec<AtomRef<'a>> {
		let start = self.children_start();
		atoms(&self.body[start..], self.offset + 8 + start)
	}

	pub fn child(&self, ident: &[u8; 4]) -> AtomRef<'a> {
		self.children()
			.into_iter()
			.find(|atom| &atom.ident == ident)
			.unwrap_or_else(|| panic!("missing atom {}", String::from_utf8_lossy(ident)))
	}

	pub fn path(&self, path: &[&[u8; 4]]) -> AtomRef<'a> {
		path.iter().fold(*self, |atom, ident| atom.child(ident))
	}

	pub fn u32_at(&self, offset: usize) -> u32 {
		u32::from_be_bytes(self.body[offset..offset + 4].try_into().unwrap())
	}
}

/// Split `data` into atoms, asserting that they fill it exactly
pub fn atoms(data: &[u8], base: usize) -> Vec<AtomRef<'_>> {
	let mut out = Vec::new();
	let mut pos = 0;

	while pos < data.len() {
		assert!(pos + 8 <= data.len(), "truncated atom header at {}", base + pos);

		let size = u32::from_be_bytes(data[pos..pos + 4].try_into().unwrap()) as usize;
		assert!(size >= 8 && pos + size <= data.len(), "bad atom size at {}", base + pos);

		out.push(AtomRef {
			ident: data[pos + 4..pos + 8].try_into().unwrap(),
			offset: base + pos,
			body: &data[pos + 8..pos + size],
		});
		pos += size;
	}

	out
}

pub fn top_level(file: &[u8]) -> Vec<AtomRef<'_>> {
	atoms(file, 0)
}

pub fn find_top<'a>(file: &'a [u8], ident: &[u8; 4]) -> AtomRef<'a> {
	top_level(file)
		.into_iter()
		.find(|atom| &atom.ident == ident)
		.unwrap_or_else(|| panic!("missing atom {}", String::from_utf8_lossy(ident)))
}

/// Descend through every container, checking that child sizes add up
pub fn check_sizes(atom: &AtomRef<'_>) {
	const CONTAINERS: &[&[u8; 4]] = &[
		b"moov", b"trak", b"mdia", b"minf", b"dinf", b"dref", b"stbl", b"stsd", b"udta", b"meta",
		b"ilst",
	];

	if !CONTAINERS.contains(&&atom.ident) {
		return;
	}

	// `atoms` asserts the children fill the body
	for child in atom.children() {
		if atom.ident == *b"ilst" {
			for data in child.children() {
				assert_eq!(&data.ident, b"data");
			}
			continue;
		}

		check_sizes(&child);
	}
}

/// Interleaved little endian PCM with a recognizable pattern
pub fn pcm(bytes: usize) -> Vec<u8> {
	(0..bytes).map(|i| (i * 7 % 251) as u8).collect()
}
