//! Metadata for the MP4 item list
//!
//! [`Tags`] holds everything that ends up in `moov.udta.meta.ilst`: text and boolean items keyed
//! by [`ItemKey`], a genre, track and disc numbers, and cover art.

mod genres;
mod item;

use crate::error::{AlacError, ErrorKind, Result};
use crate::macros::err;
use crate::picture::Picture;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

// Exports

pub use genres::{genre_index, GENRES};
pub use item::ItemKey;

/// The value of an item
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemValue {
	/// UTF-8 text
	Text(String),
	/// A flag, stored as a single byte
	Bool(bool),
}

/// A track or disc number, with the total count
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NumberPair {
	/// The track or disc number
	pub number: u16,
	/// The number of tracks or discs
	pub total: u16,
}

impl NumberPair {
	/// Create a new `NumberPair`
	pub const fn new(number: u16, total: u16) -> Self {
		Self { number, total }
	}
}

impl FromStr for NumberPair {
	type Err = AlacError;

	/// Parse a `N/M` pair, such as `3/12`
	fn from_str(s: &str) -> Result<Self> {
		let invalid = || AlacError::new(ErrorKind::InvalidNumberPair(s.to_string()));

		let (number, total) = s.split_once('/').ok_or_else(invalid)?;
		let number = number.trim().parse().map_err(|_| invalid())?;
		let total = total.trim().parse().map_err(|_| invalid())?;

		Ok(Self { number, total })
	}
}

impl Display for NumberPair {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}", self.number, self.total)
	}
}

macro_rules! impl_accessor {
	($($name:ident => $key:ident;)+) => {
		paste::paste! {
			$(
				#[doc = "Returns the " $name ", if set"]
				pub fn $name(&self) -> Option<&str> {
					self.text(ItemKey::$key)
				}

				#[doc = "Sets the " $name]
				pub fn [<set_ $name>](&mut self, value: String) {
					self.insert_text(ItemKey::$key, value);
				}

				#[doc = "Removes the " $name]
				pub fn [<remove_ $name>](&mut self) {
					self.remove(ItemKey::$key);
				}
			)+
		}
	}
}

/// Everything that is written to the item list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tags {
	items: BTreeMap<ItemKey, ItemValue>,
	genre: u16,
	track: Option<NumberPair>,
	disc: Option<NumberPair>,
	cover: Option<Picture>,
}

impl Tags {
	/// Create an empty `Tags`
	pub fn new() -> Self {
		Self::default()
	}

	impl_accessor!(
		title        => TrackTitle;
		artist       => TrackArtist;
		album        => AlbumTitle;
		album_artist => AlbumArtist;
		comment      => Comment;
		date         => RecordingDate;
		composer     => Composer;
		group        => ContentGroup;
		lyrics       => Lyrics;
	);

	/// Set a text item, replacing any existing value
	///
	/// Empty values are kept, but never written.
	pub fn insert_text(&mut self, key: ItemKey, value: String) {
		self.items.insert(key, ItemValue::Text(value));
	}

	/// Set a flag item, replacing any existing value
	///
	/// Flags that are `false` are never written.
	pub fn insert_flag(&mut self, key: ItemKey, value: bool) {
		self.items.insert(key, ItemValue::Bool(value));
	}

	/// Remove an item
	pub fn remove(&mut self, key: ItemKey) -> Option<ItemValue> {
		self.items.remove(&key)
	}

	/// Get a text item
	pub fn text(&self, key: ItemKey) -> Option<&str> {
		match self.items.get(&key) {
			Some(ItemValue::Text(text)) => Some(text),
			_ => None,
		}
	}

	/// Get a flag item, unset flags are `false`
	pub fn flag(&self, key: ItemKey) -> bool {
		matches!(self.items.get(&key), Some(ItemValue::Bool(true)))
	}

	/// Whether this is part of a compilation
	pub fn compilation(&self) -> bool {
		self.flag(ItemKey::FlagCompilation)
	}

	/// Mark this as part of a compilation
	pub fn set_compilation(&mut self, value: bool) {
		self.insert_flag(ItemKey::FlagCompilation, value);
	}

	/// Every item, in [`ItemKey`] order
	pub fn items(&self) -> impl Iterator<Item = (ItemKey, &ItemValue)> + '_ {
		self.items.iter().map(|(key, value)| (*key, value))
	}

	/// Set the genre by name, ignoring ASCII case
	///
	/// # Errors
	///
	/// `name` is not in [`GENRES`]
	///
	/// # Examples
	///
	/// ```rust
	/// use alacenc::tag::Tags;
	///
	/// # fn main() -> alacenc::error::Result<()> {
	/// let mut tags = Tags::new();
	/// tags.set_genre("rock")?;
	///
	/// assert_eq!(tags.genre(), Some("Rock"));
	/// assert!(tags.set_genre("Not a genre").is_err());
	/// # Ok(()) }
	/// ```
	pub fn set_genre(&mut self, name: &str) -> Result<()> {
		let Some(index) = genre_index(name) else {
			err!(UnknownGenre(name.to_string()));
		};

		self.genre = index;
		Ok(())
	}

	/// The genre name, if set
	pub fn genre(&self) -> Option<&'static str> {
		match self.genre {
			0 => None,
			index => GENRES.get(usize::from(index)).copied(),
		}
	}

	/// The genre's index in [`GENRES`], 0 if unset
	pub fn genre_index(&self) -> u16 {
		self.genre
	}

	/// The track number and count
	pub fn track(&self) -> Option<NumberPair> {
		self.track
	}

	/// Set the track number and count
	pub fn set_track(&mut self, track: NumberPair) {
		self.track = Some(track);
	}

	/// The disc number and count
	pub fn disc(&self) -> Option<NumberPair> {
		self.disc
	}

	/// Set the disc number and count
	pub fn set_disc(&mut self, disc: NumberPair) {
		self.disc = Some(disc);
	}

	/// The cover art
	pub fn cover(&self) -> Option<&Picture> {
		self.cover.as_ref()
	}

	/// Set the cover art
	pub fn set_cover(&mut self, picture: Picture) {
		self.cover = Some(picture);
	}

	/// Read and set the cover art from a file
	///
	/// # Errors
	///
	/// * The file cannot be read
	/// * The file is not a supported image, see [`MimeType`](crate::picture::MimeType)
	pub fn set_cover_file<P>(&mut self, path: P) -> Result<()>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		let mut file = File::open(path).map_err(|source| {
			AlacError::new(ErrorKind::Open {
				path: path.to_path_buf(),
				source,
			})
		})?;

		self.cover = Some(Picture::from_reader(&mut file)?);
		Ok(())
	}

	/// Apply a `NAME=VALUE` field
	///
	/// `NAME` is an [`ItemKey::name`], or one of `GENRE`, `TRACKNUMBER` and `DISCNUMBER`.
	/// For flags, `VALUE` is `false` when it is empty, `0`, `false` or `no`.
	///
	/// # Errors
	///
	/// * `field` has no `=`
	/// * `NAME` is unknown
	/// * The genre, track or disc value is invalid
	///
	/// # Examples
	///
	/// ```rust
	/// use alacenc::tag::Tags;
	///
	/// # fn main() -> alacenc::error::Result<()> {
	/// let mut tags = Tags::new();
	/// tags.insert_field("TITLE=Foo title")?;
	/// tags.insert_field("TRACKNUMBER=3/12")?;
	///
	/// assert_eq!(tags.title(), Some("Foo title"));
	/// assert_eq!(tags.track().map(|track| track.total), Some(12));
	/// # Ok(()) }
	/// ```
	pub fn insert_field(&mut self, field: &str) -> Result<()> {
		let Some((name, value)) = field.split_once('=') else {
			err!(MissingTagSeparator(field.to_string()));
		};

		match name.to_ascii_uppercase().as_str() {
			"GENRE" => return self.set_genre(value),
			"TRACKNUMBER" => {
				self.set_track(value.parse()?);
				return Ok(());
			},
			"DISCNUMBER" => {
				self.set_disc(value.parse()?);
				return Ok(());
			},
			_ => {},
		}

		let Some(key) = ItemKey::from_name(name) else {
			err!(UnknownTagKey(name.to_string()));
		};

		if key.is_flag() {
			let value = value.trim();
			let off = value.is_empty()
				|| value == "0"
				|| value.eq_ignore_ascii_case("false")
				|| value.eq_ignore_ascii_case("no");
			self.insert_flag(key, !off);
		} else {
			self.insert_text(key, value.to_string());
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn number_pair() {
		assert_eq!("3/12".parse::<NumberPair>().unwrap(), NumberPair::new(3, 12));
		assert_eq!(NumberPair::new(3, 12).to_string(), "3/12");

		for invalid in ["3", "3/", "/12", "a/b", "3-12", "70000/1"] {
			let err = invalid.parse::<NumberPair>().unwrap_err();
			assert!(matches!(err.kind(), ErrorKind::InvalidNumberPair(_)));
		}
	}

	#[test]
	fn accessors() {
		let mut tags = Tags::new();
		tags.set_album_artist(String::from("Foo artist"));
		assert_eq!(tags.album_artist(), Some("Foo artist"));

		tags.remove_album_artist();
		assert!(tags.album_artist().is_none());
	}

	#[test]
	fn genre() {
		let mut tags = Tags::new();
		assert_eq!(tags.genre(), None);

		tags.set_genre("ROCK").unwrap();
		assert_eq!(tags.genre_index(), 18);

		let err = tags.set_genre("Bar genre").unwrap_err();
		assert_eq!(err.to_string(), "Bar genre: Unknown genre");
		assert_eq!(tags.genre_index(), 18);
	}

	#[test]
	fn fields() {
		let mut tags = Tags::new();
		tags.insert_field("artist=Foo=Bar").unwrap();
		tags.insert_field("COMPILATION=1").unwrap();
		tags.insert_field("GAPLESSPLAYBACK=no").unwrap();
		tags.insert_field("DISCNUMBER=1/2").unwrap();

		assert_eq!(tags.artist(), Some("Foo=Bar"));
		assert!(tags.compilation());
		assert!(!tags.flag(ItemKey::FlagGaplessPlayback));
		assert_eq!(tags.disc(), Some(NumberPair::new(1, 2)));

		let err = tags.insert_field("TITLE").unwrap_err();
		assert_eq!(err.to_string(), "TITLE: tag field contains no '=' character");

		let err = tags.insert_field("MOOD=happy").unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::UnknownTagKey(_)));
	}

	#[test]
	fn items_are_ordered_by_key() {
		let mut tags = Tags::new();
		tags.set_compilation(true);
		tags.set_lyrics(String::from("la la"));
		tags.set_title(String::from("Foo title"));

		let keys: Vec<ItemKey> = tags.items().map(|(key, _)| key).collect();
		assert_eq!(
			keys,
			[ItemKey::TrackTitle, ItemKey::Lyrics, ItemKey::FlagCompilation]
		);
	}
}
