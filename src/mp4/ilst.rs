use super::atom::{Atom, Payload};
use crate::tag::{ItemValue, NumberPair, Tags};

/// Well known data types of a `data` atom
const DATA_TYPE_IMPLICIT: u32 = 0;
const DATA_TYPE_UTF8: u32 = 1;
const DATA_TYPE_INTEGER: u32 = 21;

fn data_atom(data_type: u32, value: &[u8]) -> Atom {
	// Type, then a zeroed locale
	Atom::with_payload(
		*b"data",
		Payload::new().u32(data_type).u32(0).bytes(value).finish(),
	)
}

fn number_pair_atom(ident: [u8; 4], pair: NumberPair) -> Atom {
	let value = Payload::new()
		.u16(0)
		.u16(pair.number)
		.u16(pair.total)
		.u16(0)
		.finish();

	Atom::new(ident).child(data_atom(DATA_TYPE_IMPLICIT, &value))
}

/// Build the `ilst` atom
///
/// Items are written in this order, and skipped when they have nothing to say:
///
/// 1. Text items, skipped when empty
/// 2. Flag items, skipped when `false`
/// 3. `gnre`, skipped when no genre is set
/// 4. `trkn` and `disk`, skipped when unset or when the number is 0
/// 5. `covr`, skipped when there is no cover art
pub fn ilst(tags: &Tags) -> Atom {
	let mut ilst = Atom::new(*b"ilst");

	for (key, value) in tags.items() {
		if let ItemValue::Text(text) = value {
			if !text.is_empty() {
				ilst.push(Atom::new(key.fourcc()).child(data_atom(DATA_TYPE_UTF8, text.as_bytes())));
			}
		}
	}

	for (key, value) in tags.items() {
		if let ItemValue::Bool(true) = value {
			ilst.push(Atom::new(key.fourcc()).child(data_atom(DATA_TYPE_INTEGER, &[1])));
		}
	}

	let genre = tags.genre_index();
	if genre != 0 {
		ilst.push(Atom::new(*b"gnre").child(data_atom(DATA_TYPE_IMPLICIT, &genre.to_be_bytes())));
	}

	for (ident, pair) in [(*b"trkn", tags.track()), (*b"disk", tags.disc())] {
		match pair {
			Some(pair) if pair.number != 0 => ilst.push(number_pair_atom(ident, pair)),
			_ => {},
		}
	}

	if let Some(cover) = tags.cover() {
		let payload = Payload::new()
			.u32(cover.mime_type().data_type())
			.u32(0)
			.bytes(cover.data())
			.finish();
		ilst.push(Atom::new(*b"covr").child(Atom::with_payload(*b"data", payload)));
	}

	ilst
}
