//! CLI driver for the contact engine.
//!
//! # Responsibility
//! - Load a JSON export of raw contact records through `ContactService`.
//! - Print summary stats and the filtered view as JSON lines.
//!
//! Usage: `contactdeck_cli <contacts.json> [config.json] [query...]`
//!
//! Set `CONTACTDECK_LOG_DIR` to an absolute path to enable file logging.

use contactdeck_core::db::open_db_in_memory;
use contactdeck_core::{
    default_log_level, init_logging_with, ConfigDocument, ContactService, FiltersPatch,
    JsonFileProvider, LoadOutcome, LoaderConfig, LogRotation, SqlitePreferenceRepository,
};
use log::info;
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "CONTACTDECK_LOG_DIR";

fn main() -> ExitCode {
    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let mut args = args.into_iter().peekable();
    let contacts_path = args
        .next()
        .ok_or("usage: contactdeck_cli <contacts.json> [config.json] [query...]")?;
    let document = match args.next_if(|arg| arg.ends_with(".json")) {
        Some(path) => ConfigDocument::from_path(&path).map_err(|err| err.to_string())?,
        None => ConfigDocument::default(),
    };
    run_with(&contacts_path, document, args.collect())
}

fn run_with(contacts_path: &str, document: ConfigDocument, query: Vec<String>) -> Result<(), String> {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        init_logging_with(
            default_log_level(),
            &log_dir,
            LogRotation::from_document(&document),
        )?;
    }
    let config = LoaderConfig::from_document(&document).map_err(|err| err.to_string())?;

    let conn = open_db_in_memory().map_err(|err| err.to_string())?;
    let provider = JsonFileProvider::new(contacts_path);
    let mut service =
        ContactService::new(provider, SqlitePreferenceRepository::new(&conn), config);

    match service.load_contacts() {
        LoadOutcome::Completed { .. } => {}
        _ => {
            return Err(service
                .error()
                .map_or_else(|| "load did not complete".to_string(), ToString::to_string));
        }
    }
    let batches = service.drain_background(std::thread::sleep);
    info!("event=cli_load module=cli status=ok batches={batches}");

    if !query.is_empty() {
        service.update_filters(FiltersPatch::query(query.join(" ")));
    }

    let stats = serde_json::to_string(service.stats()).map_err(|err| err.to_string())?;
    println!("{stats}");
    for contact in service.filtered_contacts() {
        let line = serde_json::to_string(contact).map_err(|err| err.to_string())?;
        println!("{line}");
    }
    service.shutdown();
    Ok(())
}
