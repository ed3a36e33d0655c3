/// Options to control how an encode is run
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub struct EncodeOptions {
	pub(crate) show_progress: bool,
	pub(crate) fast: bool,
	pub(crate) frames_per_packet: u32,
}

impl Default for EncodeOptions {
	/// The default implementation for `EncodeOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// EncodeOptions {
	/// 	show_progress: true,
	/// 	fast: false,
	/// 	frames_per_packet: 4096,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl EncodeOptions {
	/// Default number of sample frames in one ALAC packet
	pub const DEFAULT_FRAMES_PER_PACKET: u32 = 4096;

	/// Creates a new `EncodeOptions`, alias for `Default` implementation
	///
	/// See also: [`EncodeOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use alacenc::EncodeOptions;
	///
	/// let encode_options = EncodeOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			show_progress: true,
			fast: false,
			frames_per_packet: Self::DEFAULT_FRAMES_PER_PACKET,
		}
	}

	/// Whether or not to report progress while encoding
	///
	/// When disabled, the progress callback passed to [`encode`](crate::encode) is never called.
	///
	/// # Examples
	///
	/// ```rust
	/// use alacenc::EncodeOptions;
	///
	/// // The caller is writing to stdout and wants nothing on stderr
	/// let encode_options = EncodeOptions::new().show_progress(false);
	/// ```
	pub const fn show_progress(mut self, show_progress: bool) -> Self {
		self.show_progress = show_progress;
		self
	}

	/// Whether to skip compression and write uncompressed ALAC packets
	///
	/// Only 16-bit input is ever compressed, so this has no effect on deeper input.
	///
	/// # Examples
	///
	/// ```rust
	/// use alacenc::EncodeOptions;
	///
	/// let encode_options = EncodeOptions::new().fast(true);
	/// ```
	pub const fn fast(mut self, fast: bool) -> Self {
		self.fast = fast;
		self
	}

	/// The number of sample frames in each ALAC packet
	///
	/// A value of 0 is treated as [`EncodeOptions::DEFAULT_FRAMES_PER_PACKET`].
	///
	/// # Examples
	///
	/// ```rust
	/// use alacenc::EncodeOptions;
	///
	/// let encode_options = EncodeOptions::new().frames_per_packet(352);
	/// ```
	pub const fn frames_per_packet(mut self, frames_per_packet: u32) -> Self {
		self.frames_per_packet = if frames_per_packet == 0 {
			Self::DEFAULT_FRAMES_PER_PACKET
		} else {
			frames_per_packet
		};
		self
	}
}
