use crate::{Cause, Contextual};
use owo_colors::OwoColorize;
use std::{
	borrow::Cow,
	fmt::{Debug, Display},
	ops::Deref,
	panic::Location,
};

/// a new error that keeps an owned copy of the error it replaced.
///
/// the message is the new error's own message, a newline, then the full
/// message of the previous error. it is rendered once, when the trace is
/// built, so nesting traces yields one line per layer, newest first.
///
/// ```
/// use errtrack::Trace;
///
/// let root = Trace::new("file not found", "cannot open db");
/// assert_eq!(root.message(), "cannot open db\nfile not found");
/// assert_eq!(*root.cause(), "file not found");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Trace<E, P> {
	error: E,
	prev: P,
	rendered: String,
	split: usize,
}

impl<E: Display, P: Display> Trace<E, P> {
	pub fn new(prev: P, error: E) -> Self {
		let mut rendered = error.to_string();
		let split = rendered.len();
		rendered.push('\n');
		rendered.push_str(&prev.to_string());

		#[cfg(feature = "tracing")]
		tracing::trace!(error = %&rendered[..split], "tracking error");

		Trace {
			error,
			prev,
			rendered,
			split,
		}
	}
}

impl<E, P> Trace<E, P> {
	/// the full chain, one layer per line.
	pub fn message(&self) -> &str {
		&self.rendered
	}

	pub fn into_message(self) -> String {
		self.rendered
	}

	/// the message of this layer alone.
	pub fn own_message(&self) -> &str {
		&self.rendered[..self.split]
	}

	/// the full message of the previous error.
	pub fn cause_message(&self) -> &str {
		&self.rendered[self.split + 1..]
	}

	/// the error this one replaced.
	pub fn cause(&self) -> &P {
		&self.prev
	}

	pub fn into_cause(self) -> P {
		self.prev
	}

	pub fn error(&self) -> &E {
		&self.error
	}

	pub fn into_parts(self) -> (E, P) {
		(self.error, self.prev)
	}

	/// erases the types of the chain, keeping only its text.
	pub fn flatten(&self) -> Flattened {
		Flattened(self.rendered.clone())
	}
}

impl<E, P: Cause> Trace<E, P> {
	/// the first error of kind `T` this one was caused by.
	///
	/// looks at every earlier layer, tagged or not, but never at this one.
	pub fn find_cause<T: 'static>(&self) -> Option<&T> {
		self.prev.find()
	}
}

impl<E, P> Deref for Trace<E, P> {
	type Target = E;

	fn deref(&self) -> &E {
		&self.error
	}
}

impl<E, P> Display for Trace<E, P> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.rendered)
	}
}

impl<E: Debug, P: Debug> Debug for Trace<E, P> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if f.alternate() {
			return f
				.debug_struct("Trace")
				.field("error", &self.error)
				.field("prev", &self.prev)
				.finish();
		}

		write!(f, "{}", self.own_message().red())?;

		write!(f, "\n\nSource:")?;
		for (idx, line) in self.cause_message().lines().enumerate() {
			write!(f, "\n   {}: {}", idx, line.magenta())?;
		}

		Ok(())
	}
}

impl<E, P> std::error::Error for Trace<E, P>
where
	E: Debug,
	P: std::error::Error + 'static,
{
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(&self.prev)
	}
}

/// the rendered text of an error with its structure thrown away.
///
/// useful to cut a deeply nested cause type down to `Trace<E, Flattened>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Flattened(String);

impl Flattened {
	pub fn new(error: &impl Display) -> Self {
		Flattened(error.to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for Flattened {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl std::error::Error for Flattened {}

impl From<Flattened> for String {
	fn from(value: Flattened) -> Self {
		value.0
	}
}

/// builds a new error on top of `prev`.
///
/// ```
/// let level1 = errtrack::track("B", "C(12,34)");
/// let level2 = errtrack::track(level1, "A");
/// assert_eq!(level2.message(), "A\nC(12,34)\nB");
/// ```
pub fn track<E, P>(prev: P, error: E) -> Trace<E, P>
where
	E: Display,
	P: Display,
{
	Trace::new(prev, error)
}

/// builds a new location-tagged error on top of `prev`.
///
/// only the new error gets the location; `prev` is kept as it is.
///
/// ```
/// let level1 = errtrack::track("B", "A");
/// let level2 = errtrack::contextual_track(level1, "file", 42, "C(abc,def)");
/// assert_eq!(level2.message(), "file:42: C(abc,def)\nA\nB");
/// ```
pub fn contextual_track<E, P>(
	prev: P,
	file: impl Into<Cow<'static, str>>,
	line: u32,
	error: E,
) -> Trace<Contextual<E>, P>
where
	E: Display,
	P: Display,
{
	Trace::new(prev, Contextual::new(file, line, error))
}

/// like [`contextual_track`], with the location of the caller.
#[track_caller]
pub fn track_caller<E, P>(prev: P, error: E) -> Trace<Contextual<E>, P>
where
	E: Display,
	P: Display,
{
	Trace::new(prev, Contextual::at(Location::caller(), error))
}

#[cfg(test)]
mod tests {
	use super::{contextual_track, track, track_caller, Trace};
	use crate::Contextual;
	use std::{
		fmt::Display,
		sync::{
			atomic::{AtomicUsize, Ordering},
			Arc,
		},
	};

	#[derive(Debug, Clone, Default)]
	struct Counted(Arc<AtomicUsize>);

	impl Display for Counted {
		fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			self.0.fetch_add(1, Ordering::SeqCst);
			write!(f, "counted")
		}
	}

	#[test]
	fn renders_new_then_prev() {
		let trace = Trace::new("a", "b");
		assert_eq!(trace.message(), "b\na");
		assert_eq!(trace.own_message(), "b");
		assert_eq!(trace.cause_message(), "a");
		assert_eq!(trace.to_string(), "b\na");
	}

	#[test]
	fn renders_eagerly_and_once() {
		let new = Counted::default();
		let prev = Counted::default();
		let (new_calls, prev_calls) = (Arc::clone(&new.0), Arc::clone(&prev.0));

		let trace = Trace::new(prev, new);
		assert_eq!(new_calls.load(Ordering::SeqCst), 1);
		assert_eq!(prev_calls.load(Ordering::SeqCst), 1);

		assert_eq!(trace.message(), "counted\ncounted");
		assert_eq!(trace.to_string(), "counted\ncounted");
		assert_eq!(new_calls.load(Ordering::SeqCst), 1);
		assert_eq!(prev_calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn contextual_cause_is_formatted_once() {
		let prev = Counted::default();
		let calls = Arc::clone(&prev.0);

		let trace = track(Contextual::new("deep.rs", 3, prev), "top");
		assert_eq!(trace.message(), "top\ndeep.rs:3: counted");
		assert_eq!(trace.cause().message(), "deep.rs:3: counted");
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn nests_newest_first() {
		let level1 = track("A", "B");
		let level2 = track(level1, "A");
		assert_eq!(level2.message(), "A\nB\nA");
		assert_eq!(level2.cause().message(), "B\nA");
		assert_eq!(*level2.cause().cause(), "A");
	}

	#[test]
	fn cause_round_trips() {
		let prev = Contextual::new("prev.rs", 5, String::from("prev"));
		let trace = track(prev.clone(), "next");
		assert_eq!(trace.cause(), &prev);
		assert_eq!(trace.cause().message(), prev.message());

		let (error, cause) = trace.into_parts();
		assert_eq!(error, "next");
		assert_eq!(cause, prev);
	}

	#[test]
	fn cause_outlives_original() {
		let trace = {
			let prev = String::from("short lived");
			track(prev, "outer")
		};
		assert_eq!(trace.into_cause(), "short lived");
	}

	#[test]
	fn location_only_on_new_error() {
		let prev = Contextual::new("inner.rs", 1, "inner");
		let trace = contextual_track(prev, "outer.rs", 2, "outer");
		assert_eq!(trace.message(), "outer.rs:2: outer\ninner.rs:1: inner");
		assert_eq!(trace.error().file(), "outer.rs");
		assert_eq!(trace.cause().file(), "inner.rs");
	}

	#[test]
	fn track_caller_uses_call_site() {
		let line = line!() + 1;
		let trace = track_caller("prev", "next");
		assert_eq!(trace.error().line(), line);
		assert_eq!(trace.message(), format!("{}:{}: next\nprev", file!(), line));
	}

	#[test]
	fn flatten_keeps_text() {
		let deep = track(track("a", "b"), "c");
		let flat = track(deep.flatten(), "d");
		assert_eq!(flat.message(), "d\nc\nb\na");
		assert_eq!(flat.cause().as_str(), "c\nb\na");
		assert_eq!(String::from(flat.cause().clone()), "c\nb\na");
		assert_eq!(flat.into_message(), "d\nc\nb\na");
	}

	#[test]
	fn into_message_is_the_full_chain() {
		let trace = contextual_track(track("a", "b"), "m.rs", 4, "c");
		let expected = trace.message().to_owned();
		assert_eq!(trace.into_message(), expected);
		assert_eq!(expected, "m.rs:4: c\nb\na");
	}

	#[test]
	fn debug_lists_sources() {
		let trace = track(track("a", "b"), "c");
		let debug = format!("{:?}", trace);
		assert!(debug.contains("Source:"));
		assert!(debug.contains("0: "));
		assert!(debug.contains("1: "));

		let alternate = format!("{:#?}", trace);
		assert!(alternate.starts_with("Trace {"));
	}

	#[cfg(feature = "tracing")]
	#[test]
	fn emits_one_event_per_layer() {
		use std::sync::Mutex;
		use tracing::field::{Field, Visit};
		use tracing_subscriber::{layer::Context, prelude::*, Layer, Registry};

		#[derive(Clone, Default)]
		struct Recorder(Arc<Mutex<Vec<String>>>);

		struct ErrorField(Option<String>);

		impl Visit for ErrorField {
			fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
				if field.name() == "error" {
					self.0 = Some(format!("{:?}", value));
				}
			}
		}

		impl<S: tracing::Subscriber> Layer<S> for Recorder {
			fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
				let mut field = ErrorField(None);
				event.record(&mut field);
				if let Some(error) = field.0 {
					self.0.lock().unwrap().push(error);
				}
			}
		}

		let recorder = Recorder::default();
		let subscriber = Registry::default().with(recorder.clone());
		tracing::subscriber::with_default(subscriber, || {
			let level1 = track("a", "b");
			let _level2 = contextual_track(level1, "t.rs", 3, "c");
		});

		let events = recorder.0.lock().unwrap().clone();
		assert_eq!(events, ["b", "t.rs:3: c"]);
	}
}
