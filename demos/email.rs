use errtrack::{contextual, Contextual, Flattened, ResultExt, Trace};

#[derive(Debug, Clone, thiserror::Error)]
enum SendError {
	#[error("File not found -- {0}")]
	FileNotFound(String),
	#[error("Data length exceeded ({len} > {limit}) -- {data}", len = .data.len())]
	LengthExceeded { data: String, limit: usize },
	#[error("{0}")]
	Failed(&'static str),
}

// causes come in different shapes, so keep only their text
type Tracked = Trace<Contextual<SendError>, Flattened>;

fn flatten(err: impl std::fmt::Display) -> Flattened {
	Flattened::new(&err)
}

fn open_file(filename: &str) -> Result<(), Contextual<SendError>> {
	Err(contextual!(SendError::FileNotFound(filename.to_owned())))
}

fn big_brother(_dst: &str, _subject: &str, _body: &str) -> Result<(), Tracked> {
	open_file("observation.log")
		.map_err(flatten)
		.contextual_track(|| SendError::Failed("big brother sucks"))
}

fn send_packet(data: &str) -> Result<(), Contextual<SendError>> {
	const LIMIT: usize = 20;

	if data.len() > LIMIT {
		let data = data.to_owned();
		return Err(contextual!(SendError::LengthExceeded { data, limit: LIMIT }));
	}

	Ok(())
}

fn send_email(dst: &str, subject: &str, body: &str) -> Result<(), Tracked> {
	let res = if dst == "foo@bar.baz" {
		big_brother(dst, subject, body).map_err(flatten)
	} else {
		send_packet(&format!("{dst}{subject}{body}")).map_err(flatten)
	};

	res.contextual_track(|| SendError::Failed("send_email failed"))
}

fn main() {
	for dst in ["foo@bar.baz", "bar@foo.baz"] {
		if let Err(err) = send_email(dst, "Hello there", "How are you doing bro?") {
			println!("Operation failed: \n{}", err);
		}
	}
}
