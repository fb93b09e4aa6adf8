use crate::{Contextual, Flattened, Trace};
use std::{any::Any, error::Error};

/// iterator over an error and every error it was caused by.
///
/// follows [`Error::source`], so a [`Trace`] yields itself, then its cause,
/// then that cause's source, and so on.
#[derive(Clone)]
pub struct Chain<'a> {
	next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Chain<'a> {
	pub fn new(head: &'a (dyn Error + 'static)) -> Self {
		Chain { next: Some(head) }
	}
}

impl<'a> Iterator for Chain<'a> {
	type Item = &'a (dyn Error + 'static);

	fn next(&mut self) -> Option<Self::Item> {
		let current = self.next?;
		self.next = current.source();
		Some(current)
	}
}

/// dynamic walk over the sources of any error.
pub trait ErrorExt {
	fn chain(&self) -> Chain<'_>;
}

impl<E: Error + 'static> ErrorExt for E {
	fn chain(&self) -> Chain<'_> {
		Chain::new(self)
	}
}

/// typed lookup through a cause chain.
///
/// implemented for every layer this crate builds. an error kind that sits
/// at the bottom of a chain without a location tag opts in with an empty
/// impl.
///
/// ```
/// use errtrack::{Cause, Contextual};
///
/// #[derive(Debug, Clone, thiserror::Error)]
/// #[error("file not found -- {0}")]
/// struct FileNotFound(String);
///
/// #[derive(Debug, Clone, thiserror::Error)]
/// #[error("db error -- {0}")]
/// struct DbError(String);
///
/// impl Cause for FileNotFound {}
///
/// let db = errtrack::track(FileNotFound("db.txt".into()), DbError("db".into()));
/// let err = errtrack::track(db, "request failed");
/// assert_eq!(err.find_cause::<DbError>().unwrap().0, "db");
/// assert_eq!(err.find_cause::<FileNotFound>().unwrap().0, "db.txt");
/// assert!(err.find_cause::<Contextual<DbError>>().is_none());
/// ```
pub trait Cause: Sized + 'static {
	/// this value, or anything it was caused by, as a `T`.
	///
	/// a [`Contextual<T>`] also matches `T`. returns `None` when no layer is
	/// of that kind.
	fn find<T: 'static>(&self) -> Option<&T> {
		tagged(self)
	}
}

fn tagged<T: 'static, E: 'static>(error: &E) -> Option<&T> {
	let any: &dyn Any = error;
	any.downcast_ref::<T>()
		.or_else(|| any.downcast_ref::<Contextual<T>>().map(Contextual::error))
}

impl<E: 'static, P: Cause> Cause for Trace<E, P> {
	fn find<T: 'static>(&self) -> Option<&T> {
		tagged(self)
			.or_else(|| tagged(self.error()))
			.or_else(|| self.cause().find())
	}
}

impl<E: 'static> Cause for Contextual<E> {
	fn find<T: 'static>(&self) -> Option<&T> {
		tagged(self).or_else(|| tagged(self.error()))
	}
}

impl Cause for Flattened {}
impl Cause for String {}
impl Cause for &'static str {}
