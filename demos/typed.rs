use errtrack::{contextual, contextual_track, Contextual, Trace};

#[derive(Debug, Clone, thiserror::Error)]
#[error("File not found -- {filename}")]
struct FileNotFound {
	filename: String,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("DB error -- {db_name}")]
struct DbError {
	db_name: String,
}

type DbErrorFileNotFound = Trace<Contextual<DbError>, Contextual<FileNotFound>>;

fn open_file(filename: &str) -> Result<(), Contextual<FileNotFound>> {
	let filename = filename.to_owned();
	Err(contextual!(FileNotFound { filename }))
}

fn open_db(db_name: &str) -> Result<(), DbErrorFileNotFound> {
	open_file(&format!("{db_name}.txt")).map_err(|err| {
		let db_name = db_name.to_owned();
		contextual_track!(err, DbError { db_name })
	})
}

fn main() {
	if let Err(err) = open_db("inventory") {
		println!(
			"db ({}) cannot open file ({}). Traceback:",
			err.db_name,
			err.cause().filename
		);
		println!("{}", err);
		println!();
		println!("{:?}", err);
	}
}
