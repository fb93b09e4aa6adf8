use crate::{Contextual, Trace};
use std::{fmt::Display, panic::Location};

/// rewraps the error of a [`Result`] at a catch site.
///
/// ```
/// use errtrack::ResultExt;
///
/// fn open_file() -> Result<(), &'static str> {
/// 	Err("file not found")
/// }
///
/// let err = open_file().track(|| "cannot open db").unwrap_err();
/// assert_eq!(err.message(), "cannot open db\nfile not found");
/// ```
pub trait ResultExt<T, P> {
	/// replaces the error with a [`Trace`] of the error returned by `f`.
	fn track<E, F>(self, f: F) -> Result<T, Trace<E, P>>
	where
		E: Display,
		F: FnOnce() -> E;

	/// like [`ResultExt::track`], tagging the new error with the location
	/// of the caller.
	#[track_caller]
	fn contextual_track<E, F>(self, f: F) -> Result<T, Trace<Contextual<E>, P>>
	where
		E: Display,
		F: FnOnce() -> E;
}

impl<T, P: Display> ResultExt<T, P> for Result<T, P> {
	fn track<E, F>(self, f: F) -> Result<T, Trace<E, P>>
	where
		E: Display,
		F: FnOnce() -> E,
	{
		self.map_err(|prev| Trace::new(prev, f()))
	}

	#[track_caller]
	fn contextual_track<E, F>(self, f: F) -> Result<T, Trace<Contextual<E>, P>>
	where
		E: Display,
		F: FnOnce() -> E,
	{
		let location = Location::caller();
		self.map_err(|prev| Trace::new(prev, Contextual::at(location, f())))
	}
}
