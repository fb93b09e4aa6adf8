//! location-tagged errors with owned cause chains.
//!
//! two wrappers do all the work:
//!
//! - [`Contextual`] tags an error with the file and line it was raised at.
//! - [`Trace`] replaces an error with a new one while keeping the old one
//!   around as its cause.
//!
//! each catch site decides which of the two (or both) it wants, and the
//! final message lists every layer on its own line, newest first.
//!
//! ```
//! use errtrack::{contextual, contextual_track, Contextual};
//!
//! #[derive(Debug, Clone, thiserror::Error)]
//! #[error("File not found -- {filename}")]
//! struct FileNotFound {
//! 	filename: String,
//! }
//!
//! #[derive(Debug, Clone, thiserror::Error)]
//! #[error("DB error -- {db_name}")]
//! struct DbError {
//! 	db_name: String,
//! }
//!
//! fn open_file(filename: &str) -> Result<(), Contextual<FileNotFound>> {
//! 	let filename = filename.to_owned();
//! 	Err(contextual!(FileNotFound { filename }))
//! }
//!
//! fn open_db(db_name: &str) -> Result<(), errtrack::Trace<Contextual<DbError>, Contextual<FileNotFound>>> {
//! 	open_file(&format!("{db_name}.txt")).map_err(|err| {
//! 		let db_name = db_name.to_owned();
//! 		contextual_track!(err, DbError { db_name })
//! 	})
//! }
//!
//! let err = open_db("db").unwrap_err();
//! assert_eq!(err.db_name, "db");
//! assert_eq!(err.cause().filename, "db.txt");
//! assert_eq!(err.message().lines().count(), 2);
//! ```

mod chain;
mod contextual;
mod ext;
mod trace;

pub use chain::{Cause, Chain, ErrorExt};
pub use contextual::Contextual;
pub use ext::ResultExt;
pub use trace::{contextual_track, track, track_caller, Flattened, Trace};

/// wraps an error in a [`Contextual`] tagged with the current file and line.
///
/// ```
/// let err = errtrack::contextual!("abc");
/// assert_eq!(err.message(), format!("{}:{}: abc", file!(), line!() - 1));
/// ```
#[macro_export]
macro_rules! contextual {
	($error:expr $(,)?) => {
		$crate::Contextual::new(::core::file!(), ::core::line!(), $error)
	};
}

/// builds a location-tagged [`Trace`] on top of `prev`, using the current
/// file and line.
#[macro_export]
macro_rules! contextual_track {
	($prev:expr, $error:expr $(,)?) => {
		$crate::contextual_track($prev, ::core::file!(), ::core::line!(), $error)
	};
}
