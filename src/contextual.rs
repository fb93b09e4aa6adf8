use once_cell::sync::OnceCell;
use owo_colors::OwoColorize;
use std::{
	borrow::Cow,
	fmt::{Debug, Display},
	ops::Deref,
	panic::Location,
};

/// an error tagged with the source location it was raised at.
///
/// the rendered message is `"{file}:{line}: {error}"`. it is formatted the
/// first time it is asked for and cached for the lifetime of the value.
///
/// ```
/// use errtrack::Contextual;
///
/// let err = Contextual::new("db.rs", 12, "connection refused");
/// assert_eq!(err.message(), "db.rs:12: connection refused");
/// ```
#[derive(Clone)]
pub struct Contextual<E> {
	file: Cow<'static, str>,
	line: u32,
	error: E,
	cache: OnceCell<String>,
}

impl<E> Contextual<E> {
	/// wraps `error` with an explicit file and line.
	pub fn new(file: impl Into<Cow<'static, str>>, line: u32, error: E) -> Self {
		Contextual {
			file: file.into(),
			line,
			error,
			cache: OnceCell::new(),
		}
	}

	/// wraps `error` with the location of the caller.
	///
	/// ```
	/// use errtrack::Contextual;
	///
	/// let err = Contextual::caller("oops");
	/// assert_eq!(err.file(), file!());
	/// ```
	#[track_caller]
	pub fn caller(error: E) -> Self {
		Contextual::at(Location::caller(), error)
	}

	pub fn at(location: &Location<'static>, error: E) -> Self {
		Contextual::new(location.file(), location.line(), error)
	}

	pub fn file(&self) -> &str {
		&self.file
	}

	pub fn line(&self) -> u32 {
		self.line
	}

	pub fn error(&self) -> &E {
		&self.error
	}

	pub fn into_inner(self) -> E {
		self.error
	}
}

impl<E: Display> Contextual<E> {
	/// the location-prefixed message, formatted at most once.
	pub fn message(&self) -> &str {
		self.cache
			.get_or_init(|| format!("{}:{}: {}", self.file, self.line, self.error))
	}
}

impl<E> Deref for Contextual<E> {
	type Target = E;

	fn deref(&self) -> &E {
		&self.error
	}
}

impl<E: PartialEq> PartialEq for Contextual<E> {
	fn eq(&self, other: &Self) -> bool {
		self.file == other.file && self.line == other.line && self.error == other.error
	}
}

impl<E: Eq> Eq for Contextual<E> {}

impl<E: Display> Display for Contextual<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.message())
	}
}

impl<E: Display + Debug> Debug for Contextual<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if f.alternate() {
			return f
				.debug_struct("Contextual")
				.field("file", &self.file)
				.field("line", &self.line)
				.field("error", &self.error)
				.finish();
		}

		write!(f, "{}", self.error.red())?;
		write!(f, "\n\nLocation:")?;
		let location = format!("{}:{}", self.file, self.line);
		write!(f, "\n   {}", location.cyan())
	}
}

impl<E: std::error::Error> std::error::Error for Contextual<E> {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.error.source()
	}
}
