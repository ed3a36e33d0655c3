use std::collections::HashMap;

use once_cell::sync::Lazy;

macro_rules! gen_item_keys {
	($($(#[$meta:meta])* $variant:ident => $fourcc:literal, $name:literal, $flag:literal);+ $(;)?) => {
		/// A generic representation of an MP4 item list key
		///
		/// The declaration order is the order items are written in.
		#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
		#[non_exhaustive]
		pub enum ItemKey {
			$(
				$(#[$meta])*
				$variant,
			)+
		}

		impl ItemKey {
			/// Every key, in declaration order
			pub const ALL: &'static [ItemKey] = &[$(ItemKey::$variant),+];

			/// The atom identifier for this key
			pub const fn fourcc(self) -> [u8; 4] {
				match self {
					$(ItemKey::$variant => *$fourcc,)+
				}
			}

			/// The name used for this key on the command line (`--tag NAME=VALUE`)
			pub const fn name(self) -> &'static str {
				match self {
					$(ItemKey::$variant => $name,)+
				}
			}

			/// Whether this key holds a boolean rather than text
			pub const fn is_flag(self) -> bool {
				match self {
					$(ItemKey::$variant => $flag,)+
				}
			}
		}
	};
}

gen_item_keys! {
	/// `©nam`
	TrackTitle => b"\xA9nam", "TITLE", false;
	/// `©ART`
	TrackArtist => b"\xA9ART", "ARTIST", false;
	/// `©alb`
	AlbumTitle => b"\xA9alb", "ALBUM", false;
	/// `aART`
	AlbumArtist => b"aART", "ALBUMARTIST", false;
	/// `©cmt`
	Comment => b"\xA9cmt", "COMMENT", false;
	/// `©day`
	RecordingDate => b"\xA9day", "DATE", false;
	/// `©wrt`
	Composer => b"\xA9wrt", "COMPOSER", false;
	/// `©grp`
	ContentGroup => b"\xA9grp", "GROUPING", false;
	/// `©lyr`
	Lyrics => b"\xA9lyr", "LYRICS", false;
	/// `©too`
	EncodedBy => b"\xA9too", "ENCODEDBY", false;
	/// `cprt`
	CopyrightMessage => b"cprt", "COPYRIGHT", false;
	/// `cpil`
	FlagCompilation => b"cpil", "COMPILATION", true;
	/// `pgap`
	FlagGaplessPlayback => b"pgap", "GAPLESSPLAYBACK", true;
}

static NAME_MAP: Lazy<HashMap<&'static str, ItemKey>> =
	Lazy::new(|| ItemKey::ALL.iter().map(|key| (key.name(), *key)).collect());

impl ItemKey {
	/// Map a command line name to an `ItemKey`, ignoring ASCII case
	///
	/// # Examples
	///
	/// ```rust
	/// use alacenc::tag::ItemKey;
	///
	/// assert_eq!(ItemKey::from_name("title"), Some(ItemKey::TrackTitle));
	/// assert_eq!(ItemKey::from_name("BPM"), None);
	/// ```
	pub fn from_name(name: &str) -> Option<Self> {
		NAME_MAP.get(name.to_ascii_uppercase().as_str()).copied()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fourccs() {
		assert_eq!(ItemKey::TrackTitle.fourcc(), [0xA9, b'n', b'a', b'm']);
		assert_eq!(ItemKey::AlbumArtist.fourcc(), *b"aART");
		assert_eq!(ItemKey::FlagCompilation.fourcc(), *b"cpil");
	}

	#[test]
	fn names_round_trip() {
		for key in ItemKey::ALL {
			assert_eq!(ItemKey::from_name(key.name()), Some(*key));
		}
	}

	#[test]
	fn flags() {
		assert!(ItemKey::FlagCompilation.is_flag());
		assert!(ItemKey::FlagGaplessPlayback.is_flag());
		assert!(!ItemKey::Lyrics.is_flag());
	}

	#[test]
	fn declaration_order() {
		assert!(ItemKey::TrackTitle < ItemKey::AlbumTitle);
		assert!(ItemKey::CopyrightMessage < ItemKey::FlagCompilation);
	}
}
