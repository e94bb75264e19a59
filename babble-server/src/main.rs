use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;
use babble_core::io::list_files;
use babble_core::model::brain::Brain;

/// Directory holding named brain snapshots.
const DATA_DIR: &str = "./data";

/// Struct representing query parameters for the snapshot endpoints
#[derive(Deserialize)]
struct SnapshotQuery {
	name: Option<String>
}

#[derive(Deserialize)]
struct LearningQuery {
	enabled: Option<bool>
}

struct SharedData {
	brain: Brain,
	learning: AtomicBool,
}

impl SharedData {
	/// Resolves a snapshot name to a path under the data directory.
	///
	/// Names are restricted to a single path component.
	fn snapshot_path(name: &str) -> Result<PathBuf, String> {
		if name.is_empty() || name == ".." || name.contains(['/', '\\']) {
			return Err("Snapshot name must be a single path component".to_owned());
		}
		Ok(PathBuf::from(DATA_DIR).join(format!("{name}.bin")))
	}
}

/// HTTP GET endpoint `/v1/talk`
///
/// Generates one utterance by a weighted random walk and returns it as the
/// response body. An empty body means the model has nothing to say yet.
#[get("/v1/talk")]
async fn get_talk(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().body(data.brain.generate())
}

/// HTTP PUT endpoint `/v1/learn`
///
/// Learns every non-blank line of the request body, unless learning has
/// been toggled off.
#[put("/v1/learn")]
async fn put_learn(data: web::Data<SharedData>, body: String) -> impl Responder {
	if !data.learning.load(Ordering::Relaxed) {
		return HttpResponse::Ok().body("learning disabled");
	}

	let mut learned = 0usize;
	for line in body.lines() {
		if !line.trim().is_empty() {
			data.brain.learn(line);
			learned += 1;
		}
	}

	HttpResponse::Ok().body(format!("learned {learned} utterances"))
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().body(data.brain.stats().to_string())
}

#[get("/v1/learning")]
async fn get_learning(data: web::Data<SharedData>) -> impl Responder {
	let enabled = data.learning.load(Ordering::Relaxed);
	HttpResponse::Ok().body(if enabled { "learning enabled" } else { "learning disabled" })
}

#[put("/v1/learning")]
async fn put_learning(data: web::Data<SharedData>, query: web::Query<LearningQuery>) -> impl Responder {
	let enabled = match query.enabled {
		Some(enabled) => enabled,
		None => return HttpResponse::BadRequest().body("Missing 'enabled' parameter"),
	};

	data.learning.store(enabled, Ordering::Relaxed);
	log::info!("learning toggled: {enabled}");
	HttpResponse::Ok().body(if enabled { "learning enabled" } else { "learning disabled" })
}

#[get("/v1/snapshots")]
async fn get_snapshots() -> impl Responder {
	match list_files(DATA_DIR, "bin") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".bin", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list snapshots")
	}
}

#[put("/v1/save")]
async fn put_save(data: web::Data<SharedData>, query: web::Query<SnapshotQuery>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty snapshot name"),
	};

	let path = match SharedData::snapshot_path(name) {
		Ok(path) => path,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	if let Err(e) = std::fs::create_dir_all(DATA_DIR) {
		return HttpResponse::InternalServerError().body(format!("Failed to create data directory: {e}"));
	}

	match data.brain.save(&path) {
		Ok(_) => HttpResponse::Ok().body(format!("snapshot '{name}' saved")),
		Err(e) => HttpResponse::InternalServerError().body(format!("Failed to save snapshot: {e}")),
	}
}

#[put("/v1/restore")]
async fn put_restore(data: web::Data<SharedData>, query: web::Query<SnapshotQuery>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty snapshot name"),
	};

	let path = match SharedData::snapshot_path(name) {
		Ok(path) => path,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	match data.brain.restore(&path) {
		Ok(_) => {
			log::info!("snapshot '{name}' restored");
			HttpResponse::Ok().body(format!("snapshot '{name}' restored. {}", data.brain.stats()))
		}
		Err(e) => HttpResponse::InternalServerError().body(format!("Failed to restore snapshot: {e}")),
	}
}

/// Main entry point for the server.
///
/// Creates the shared brain (empty, or bootstrapped from a corpus),
/// shares it across workers, and starts an Actix-web HTTP server.
///
/// # Notes
/// - The bind address comes from `BABBLE_BIND` (default 127.0.0.1:5000).
/// - `BABBLE_CORPUS` may point at a chat log to bootstrap from; the first
///   start learns it and writes a sibling `.bin` snapshot for later ones.
/// - The brain locks internally: generation requests only take the read
///   lock, so they do not queue behind each other.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let bind = std::env::var("BABBLE_BIND").unwrap_or_else(|_| "127.0.0.1:5000".to_owned());

	let brain = match std::env::var("BABBLE_CORPUS") {
		Ok(corpus) => match Brain::open(&corpus) {
			Ok(brain) => {
				log::info!("corpus '{corpus}' loaded: {}", brain.stats());
				brain
			}
			Err(e) => {
				log::error!("failed to load corpus '{corpus}': {e}");
				return Err(std::io::Error::other(e.to_string()));
			}
		},
		Err(_) => Brain::new(),
	};

	let shared_data = web::Data::new(SharedData {
		brain,
		learning: AtomicBool::new(true),
	});

	log::info!("listening on {bind}");

	HttpServer::new(move || {
		App::new()
			.app_data(shared_data.clone())
			.service(get_talk)
			.service(put_learn)
			.service(get_stats)
			.service(get_learning)
			.service(put_learning)
			.service(get_snapshots)
			.service(put_save)
			.service(put_restore)
	})
		.bind(bind)?
		.run()
		.await
}
