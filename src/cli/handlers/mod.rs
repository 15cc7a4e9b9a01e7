use std::path::{Path, PathBuf};

use chrono::Local;
use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::store_io::{self, StoreError};
use crate::model::config::Config;
use crate::ops::entry_builder::{EntryBuilder, NewEntry};
use crate::ops::filter::{EntryFilter, select_entries};
use crate::ops::form::{self, EntryForm, FormEvent};
use crate::ops::labels;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Resolved data directory and the config read from it
struct Context {
    data_dir: PathBuf,
    config: Config,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref().map(Path::new))?;
    tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");

    let command = match cli.command {
        None => return crate::tui::run(&data_dir),
        // Config commands work even when config.toml is broken
        Some(Commands::Config(args)) => return cmd_config(args, &data_dir),
        Some(command) => command,
    };

    let ctx = Context {
        config: config_io::read_config(&data_dir)?,
        data_dir,
    };

    match command {
        Commands::Log(args) => cmd_log(args, &ctx, json),
        Commands::List(args) => cmd_list(args, &ctx, json),
        Commands::Show(args) => cmd_show(args, &ctx, json),
        Commands::Edit(args) => cmd_edit(args, &ctx, json),
        Commands::Delete(args) => cmd_delete(args, &ctx, json),
        Commands::Label(args) => cmd_label(args, &ctx, json),
        Commands::Config(args) => cmd_config(args, &ctx.data_dir),
    }
}

// ---------------------------------------------------------------------------
// Entry commands
// ---------------------------------------------------------------------------

fn cmd_log(args: LogArgs, ctx: &Context, json: bool) -> CmdResult {
    let builder = EntryBuilder::local();
    let now = builder.now().with_timezone(&Local);
    let date = args
        .date
        .unwrap_or_else(|| now.format("%Y-%m-%d").to_string());
    let time = args.time.unwrap_or_else(|| now.format("%H:%M").to_string());
    let entry_type = parse_entry_type(&args.entry_type)?;
    let category = match args.category {
        Some(c) => parse_category(&c)?,
        None => ctx.config.defaults.category,
    };

    if args.intensity.is_some() && !form::intensity_visible(entry_type) {
        eprintln!("warning: --intensity is only recorded for cravings");
    }
    if args.cost.is_some() && !form::cost_visible(entry_type, category) {
        eprintln!("warning: --cost is only recorded for alcohol consumption");
    }

    builder.validate(&date, &time)?;
    let entry = builder.build(&NewEntry {
        entry_type,
        category,
        date: &date,
        time: &time,
        note: args.note.as_deref(),
        intensity: Some(args.intensity.unwrap_or(ctx.config.defaults.intensity)),
        cost: args.cost.map(labels::slider_to_cost),
    })?;

    store_io::update_entries(&ctx.data_dir, |entries| {
        store_io::add_entry(entries, entry.clone());
        Ok(())
    })?;
    tracing::info!(id = entry.id, "logged entry");

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("{}", format_logged("Logged", &entry, &Local));
    }
    Ok(())
}

fn cmd_list(args: ListArgs, ctx: &Context, json: bool) -> CmdResult {
    let filter = EntryFilter {
        category: args.category.as_deref().map(parse_category).transpose()?,
        entry_type: args.entry_type.as_deref().map(parse_entry_type).transpose()?,
        note_pattern: args
            .grep
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| format!("invalid --grep pattern: {}", e))?,
    };

    let entries = store_io::load_entries(&ctx.data_dir)?;
    let selected = select_entries(&entries, &filter, args.limit);

    if json {
        let output = EntryListJson {
            count: selected.len(),
            entries: selected,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if selected.is_empty() {
        println!("No entries.");
    } else {
        for entry in selected {
            println!("{}", format_entry_line(entry, &Local, &ctx.config.display));
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, ctx: &Context, json: bool) -> CmdResult {
    let entries = store_io::load_entries(&ctx.data_dir)?;
    let entry = store_io::find_entry(&entries, args.id).ok_or(StoreError::NotFound(args.id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        for line in format_entry_detail(entry, &Local, &ctx.config.display) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_edit(args: EditArgs, ctx: &Context, json: bool) -> CmdResult {
    let entries = store_io::load_entries(&ctx.data_dir)?;
    let old = store_io::find_entry(&entries, args.id).ok_or(StoreError::NotFound(args.id))?;
    let mut form = EntryForm::from_entry(old, &Local).ok_or_else(|| {
        format!(
            "entry {} has an unreadable timestamp '{}'",
            old.id, old.timestamp
        )
    })?;

    // Changing category resets the type, so settle the type first
    let entry_type = match args.entry_type.as_deref() {
        Some(t) => parse_entry_type(t)?,
        None => form.entry_type,
    };
    if let Some(c) = args.category.as_deref() {
        form.apply(FormEvent::SetCategory(parse_category(c)?));
    }
    form.apply(FormEvent::SetType(entry_type));
    if let Some(date) = args.date {
        form.apply(FormEvent::SetDate(date));
    }
    if let Some(time) = args.time {
        form.apply(FormEvent::SetTime(time));
    }
    if let Some(note) = args.note {
        form.apply(FormEvent::SetNote(note));
    }
    if let Some(intensity) = args.intensity {
        form.apply(FormEvent::IntensityInput(intensity));
    }
    if let Some(position) = args.cost {
        form.apply(FormEvent::CostInput(position));
    }

    let builder = EntryBuilder::local();
    let entry = form.submit(&builder)?;

    store_io::update_entries(&ctx.data_dir, |entries| {
        store_io::replace_entry(entries, args.id, entry.clone())
    })?;
    tracing::info!(old_id = args.id, new_id = entry.id, "edited entry");

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("{}", format_logged("Updated", &entry, &Local));
    }
    Ok(())
}

fn cmd_delete(args: DeleteArgs, ctx: &Context, json: bool) -> CmdResult {
    let removed = store_io::update_entries(&ctx.data_dir, |entries| {
        store_io::remove_entry(entries, args.id)
    })?;
    tracing::info!(id = removed.id, "deleted entry");

    if json {
        println!("{}", serde_json::to_string_pretty(&removed)?);
    } else {
        println!("Deleted entry {}", removed.id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Labels & config
// ---------------------------------------------------------------------------

fn cmd_label(args: LabelCmd, ctx: &Context, json: bool) -> CmdResult {
    let currency = &ctx.config.display.currency;
    match args.action {
        LabelAction::Intensity(a) => {
            let label = labels::intensity_label(a.value);
            if json {
                let output = IntensityLabelJson {
                    value: a.value,
                    label,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", label);
            }
        }
        LabelAction::Cost(a) => print_cost_label(a.position, currency, json)?,
        LabelAction::Position(a) => {
            let position = labels::cost_to_slider(Some(a.amount));
            print_cost_label(position, currency, json)?;
        }
    }
    Ok(())
}

fn print_cost_label(position: u32, currency: &str, json: bool) -> CmdResult {
    let label = labels::cost_label(position, currency);
    if json {
        let output = CostLabelJson {
            position,
            amount: labels::slider_to_cost(position),
            label,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} (position {})", label, position);
    }
    Ok(())
}

fn cmd_config(args: ConfigCmd, data_dir: &Path) -> CmdResult {
    match args.action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let config = config_io::read_config(data_dir)?;
            print!("{}", toml::to_string(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", config_io::config_path(data_dir).display());
        }
        ConfigAction::Set(a) => {
            config_io::set_config_value(data_dir, &a.key, &a.value)?;
            println!("Set {} = {}", a.key, a.value);
        }
    }
    Ok(())
}
