use crate::error::Result;
use crate::macros::err;

use std::io::Write;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

/// Size of an atom header, a 32-bit size followed by the identifier
pub const ATOM_HEADER_LEN: u64 = 8;

/// A node in an MP4 atom tree
///
/// An atom is written as its 32-bit big endian size, its identifier, its payload and then every
/// child in order. The size always covers the header, payload and all children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Atom {
	ident: [u8; 4],
	payload: Vec<u8>,
	children: Vec<Atom>,
}

impl Atom {
	/// Create an empty atom
	///
	/// # Panics
	///
	/// `ident` is made entirely of spaces or zeros
	pub fn new(ident: [u8; 4]) -> Self {
		Self::with_payload(ident, Vec::new())
	}

	/// Create an atom with a payload and no children
	///
	/// # Panics
	///
	/// `ident` is made entirely of spaces or zeros
	pub fn with_payload(ident: [u8; 4], payload: Vec<u8>) -> Self {
		assert!(
			!ident.iter().all(|b| *b == b' ' || *b == 0),
			"atom identifier must not be blank"
		);

		Self {
			ident,
			payload,
			children: Vec::new(),
		}
	}

	/// Append a child, returning the atom for chaining
	#[must_use]
	pub fn child(mut self, child: Atom) -> Self {
		self.children.push(child);
		self
	}

	/// Append a child
	pub fn push(&mut self, child: Atom) {
		self.children.push(child);
	}

	/// The identifier
	pub fn ident(&self) -> [u8; 4] {
		self.ident
	}

	/// The payload, not including any children
	pub fn payload(&self) -> &[u8] {
		&self.payload
	}

	/// The children, in the order they are written
	pub fn children(&self) -> &[Atom] {
		&self.children
	}

	/// Find a descendant by following a path of identifiers
	///
	/// The first match is taken at every level.
	pub fn find(&self, path: &[&[u8; 4]]) -> Option<&Atom> {
		let mut current = self;
		for ident in path {
			current = current.children.iter().find(|c| &c.ident == *ident)?;
		}

		Some(current)
	}

	/// The total number of bytes this atom occupies
	pub fn size(&self) -> u64 {
		ATOM_HEADER_LEN
			+ self.payload.len() as u64
			+ self.children.iter().map(Atom::size).sum::<u64>()
	}

	/// Write the atom and its children
	///
	/// # Errors
	///
	/// * The atom, or any child, is larger than [`u32::MAX`]
	/// * `writer` fails
	pub fn write_to<W>(&self, writer: &mut W) -> Result<()>
	where
		W: Write,
	{
		let Ok(size) = u32::try_from(self.size()) else {
			err!(TooMuchData);
		};

		writer.write_u32::<BigEndian>(size)?;
		writer.write_all(&self.ident)?;
		writer.write_all(&self.payload)?;

		for child in &self.children {
			child.write_to(writer)?;
		}

		Ok(())
	}

	/// Serialize the atom into a new buffer
	///
	/// # Errors
	///
	/// See [`Atom::write_to`]
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		let mut bytes = Vec::with_capacity(self.size() as usize);
		self.write_to(&mut bytes)?;
		Ok(bytes)
	}
}

/// Builds big endian atom payloads
#[derive(Default)]
pub(crate) struct Payload(Vec<u8>);

impl Payload {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Version and flags of a full box, both 0
	pub(crate) fn full_box() -> Self {
		Self::new().u32(0)
	}

	pub(crate) fn u8(mut self, value: u8) -> Self {
		self.0.push(value);
		self
	}

	pub(crate) fn u16(self, value: u16) -> Self {
		self.put(2, |buf| BigEndian::write_u16(buf, value))
	}

	pub(crate) fn u32(self, value: u32) -> Self {
		self.put(4, |buf| BigEndian::write_u32(buf, value))
	}

	fn put(mut self, len: usize, write: impl FnOnce(&mut [u8])) -> Self {
		let start = self.0.len();
		self.0.resize(start + len, 0);
		write(&mut self.0[start..]);
		self
	}

	pub(crate) fn bytes(mut self, value: &[u8]) -> Self {
		self.0.extend_from_slice(value);
		self
	}

	pub(crate) fn zeros(mut self, count: usize) -> Self {
		self.0.resize(self.0.len() + count, 0);
		self
	}

	pub(crate) fn finish(self) -> Vec<u8> {
		self.0
	}
}

/// A sequential sink that tracks how many bytes were written
///
/// Output may be a pipe, so positions are counted rather than queried.
pub struct AtomWriter<W> {
	inner: W,
	position: u64,
}

impl<W> AtomWriter<W>
where
	W: Write,
{
	/// Wrap `inner`, starting at position 0
	pub fn new(inner: W) -> Self {
		Self { inner, position: 0 }
	}

	/// The number of bytes written so far
	pub fn position(&self) -> u64 {
		self.position
	}

	/// Write a complete atom
	///
	/// # Errors
	///
	/// See [`Atom::write_to`]
	pub fn write_atom(&mut self, atom: &Atom) -> Result<()> {
		atom.write_to(self)
	}

	/// Write an atom header for a body that is written separately
	///
	/// # Errors
	///
	/// * `body_len` + 8 is larger than [`u32::MAX`]
	/// * The underlying writer fails
	pub fn write_header(&mut self, ident: [u8; 4], body_len: u64) -> Result<()> {
		let Ok(size) = u32::try_from(body_len + ATOM_HEADER_LEN) else {
			err!(TooMuchData);
		};

		self.write_u32::<BigEndian>(size)?;
		self.write_all(&ident)?;
		Ok(())
	}

	/// Unwrap the inner writer
	pub fn into_inner(self) -> W {
		self.inner
	}
}

impl<W> Write for AtomWriter<W>
where
	W: Write,
{
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		let written = self.inner.write(buf)?;
		self.position += written as u64;
		Ok(written)
	}

	fn flush(&mut self) -> std::io::Result<()> {
		self.inner.flush()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tree() -> Atom {
		Atom::new(*b"moov")
			.child(Atom::with_payload(*b"mvhd", vec![1, 2, 3]))
			.child(
				Atom::new(*b"trak")
					.child(Atom::with_payload(*b"tkhd", vec![0; 10]))
					.child(Atom::new(*b"mdia")),
			)
	}

	#[test]
	fn size_is_recursive() {
		let moov = tree();
		assert_eq!(moov.size(), 8 + (8 + 3) + (8 + (8 + 10) + 8));
		assert_eq!(moov.to_bytes().unwrap().len() as u64, moov.size());
	}

	#[test]
	fn serialized_layout() {
		let bytes = Atom::new(*b"udta")
			.child(Atom::with_payload(*b"free", vec![0xAA]))
			.to_bytes()
			.unwrap();

		assert_eq!(
			bytes,
			[
				0, 0, 0, 17, b'u', b'd', b't', b'a', 0, 0, 0, 9, b'f', b'r', b'e', b'e', 0xAA
			]
		);
	}

	#[test]
	fn find_path() {
		let moov = tree();
		let tkhd = moov.find(&[b"trak", b"tkhd"]).unwrap();
		assert_eq!(tkhd.payload().len(), 10);
		assert!(moov.find(&[b"trak", b"stbl"]).is_none());
	}

	#[test]
	#[should_panic(expected = "must not be blank")]
	fn blank_ident() {
		let _ = Atom::new(*b"    ");
	}

	#[test]
	fn writer_tracks_position() {
		let mut writer = AtomWriter::new(Vec::new());
		writer.write_atom(&tree()).unwrap();
		writer.write_header(*b"mdat", 4).unwrap();
		assert_eq!(writer.position(), tree().size() + 8);
		assert_eq!(writer.into_inner().len() as u64, tree().size() + 8);
	}

	#[test]
	fn oversized_header() {
		let mut writer = AtomWriter::new(std::io::sink());
		assert!(writer.write_header(*b"mdat", u64::from(u32::MAX)).is_err());
	}

	#[test]
	fn payload_builder() {
		let payload = Payload::full_box().u16(0x0102).u8(3).zeros(2).bytes(b"ab").finish();
		assert_eq!(payload, [0, 0, 0, 0, 1, 2, 3, 0, 0, b'a', b'b']);
	}

	#[test]
	fn payload_integers_are_big_endian() {
		let payload = Payload::new().u32(0x0102_0304).u16(0xFFFE).u32(u32::MAX).finish();
		assert_eq!(payload, [1, 2, 3, 4, 0xFF, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF]);
	}
}
