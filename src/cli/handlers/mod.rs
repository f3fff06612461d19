mod config;
pub use config::cmd_config;

use std::io::Read;
use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::api::{NotesApi, connect};
use crate::io::config_io::{self, ConfigError};
use crate::model::config::ClientConfig;
use crate::model::NoteId;
use crate::ops::request::query;
use crate::ops::session::draft_from_edit;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let Some(command) = cli.command else {
        return Err("no subcommand (run `tn` alone to open the notes browser)".into());
    };

    match command {
        Commands::Config(args) => {
            cmd_config(args, &config, cli.config.as_deref().map(Path::new), json)
        }
        command => {
            let mut api = connect(&config, cli.demo)?;
            run_remote(api.as_mut(), command, json)
        }
    }
}

fn run_remote(
    api: &mut dyn NotesApi,
    command: Commands,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Tags(args) => cmd_tags(api, args, json),
        Commands::Titles(args) => cmd_titles(api, args, json),
        Commands::Show(args) => cmd_show(api, args, json),
        Commands::New(args) => cmd_new(api, args, json),
        Commands::Edit(args) => cmd_edit(api, args, json),
        Commands::Delete(args) => cmd_delete(api, args, json),
        Commands::Config(_) => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the config file, then let `--server` win over everything else.
pub fn resolve_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let mut config = config_io::load_config(cli.config.as_deref().map(Path::new))?;
    if let Some(server) = cli.server.as_deref().filter(|s| !s.trim().is_empty()) {
        config.server.base_url = server.trim().to_string();
    }
    Ok(config)
}

fn selection(tags: Vec<String>) -> Vec<String> {
    let mut tags: Vec<String> = tags
        .into_iter()
        .map(|t| t.trim_start_matches(['#', '\u{FF03}']).to_string())
        .filter(|t| !t.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// `-` reads the note text from stdin.
fn read_text(text: String) -> Result<String, Box<dyn std::error::Error>> {
    if text != "-" {
        return Ok(text);
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_tags(
    api: &mut dyn NotesApi,
    args: SelectionArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let selection = selection(args.tags);
    let tags = api.list_tags(query(&selection))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tags_to_json(&tags))?);
    } else if tags.is_empty() {
        println!("(no tags)");
    } else {
        for line in format_tag_listing(&tags) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_titles(
    api: &mut dyn NotesApi,
    args: SelectionArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let selection = selection(args.tags);
    let titles = api.list_titles(query(&selection))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&titles_to_json(&titles))?);
    } else if titles.is_empty() {
        println!("(no notes)");
    } else {
        for line in format_title_listing(&titles) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_show(
    api: &mut dyn NotesApi,
    args: ShowArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = NoteId::new(args.id);
    let note = api.get_note(&id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&note_to_json(&id, &note))?);
    } else {
        for line in format_note_detail(&id, &note, args.display) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_new(
    api: &mut dyn NotesApi,
    args: NewArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_text(args.text)?;
    let draft = draft_from_edit(None, &text)?;
    let id = api.save_note(&draft)?;
    if json {
        let out = SavedJson {
            id: id.to_string(),
            created: true,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_edit(
    api: &mut dyn NotesApi,
    args: EditArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_text(args.text)?;
    let draft = draft_from_edit(Some(NoteId::new(args.id)), &text)?;
    let id = api.save_note(&draft)?;
    if json {
        let out = SavedJson {
            id: id.to_string(),
            created: false,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_delete(
    api: &mut dyn NotesApi,
    args: DeleteArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = NoteId::new(args.id);
    api.delete_note(&id)?;
    if json {
        let out = DeletedJson {
            id: id.to_string(),
            deleted: true,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("deleted {}", id);
    }
    Ok(())
}
