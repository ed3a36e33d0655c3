// Shorthand for return Err(AlacError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)          -> return Err(AlacError::new(ErrorKind::Variant))
// - err!(Variant(Message)) -> return Err(AlacError::new(ErrorKind::Variant(Message)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::AlacError::new(crate::error::ErrorKind::$variant))
	};
	($variant:ident($reason:expr)) => {
		return Err(crate::error::AlacError::new(
			crate::error::ErrorKind::$variant($reason),
		))
	};
}

// Shorthand for HeaderError::new(Some(Dialect::Foo), Message)
//
// Usage:
//
// - header_err!(Variant, Message)
// - header_err!(Message)
//
// or bail:
//
// - header_err!(@BAIL Variant, Message)
// - header_err!(@BAIL Message)
macro_rules! header_err {
	(@BAIL $dialect:ident, $reason:expr) => {
		return Err(header_err!($dialect, $reason).into())
	};
	(@BAIL $reason:expr) => {
		return Err(header_err!($reason).into())
	};
	($dialect:ident, $reason:expr) => {
		crate::error::HeaderError::new(Some(crate::iff::wav::Dialect::$dialect), $reason)
	};
	($reason:expr) => {
		crate::error::HeaderError::new(None, $reason)
	};
}

// Allocates a zeroed vector whose length was read from the input.
macro_rules! try_vec {
	($elem:expr; $size:expr) => {{
		let mut v = Vec::new();
		v.try_reserve_exact($size)?;
		v.resize($size, $elem);

		v
	}};
}

pub(crate) use {err, header_err, try_vec};
