use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeZone};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::read_config;
use crate::io::store_io;
use crate::model::config::Config;
use crate::ops::entry_builder::{EntryBuilder, Notifier};
use crate::ops::form::{EntryForm, FormEvent, Message, MessageKind};

use super::input;
use super::render;
use super::theme::Theme;

/// A row of the entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    Type,
    Date,
    Time,
    Note,
    Intensity,
    Cost,
}

const FIELD_ORDER: [Field; 7] = [
    Field::Category,
    Field::Type,
    Field::Date,
    Field::Time,
    Field::Note,
    Field::Intensity,
    Field::Cost,
];

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Category => "Category",
            Field::Type => "Type",
            Field::Date => "Date",
            Field::Time => "Time",
            Field::Note => "Note",
            Field::Intensity => "Intensity",
            Field::Cost => "Cost",
        }
    }

    /// Fields edited by typing
    pub fn is_text(self) -> bool {
        matches!(self, Field::Date | Field::Time | Field::Note)
    }
}

/// Entry form application state
pub struct App {
    pub data_dir: PathBuf,
    pub config: Config,
    pub theme: Theme,
    pub form: EntryForm,
    pub focus: Field,
    /// Blocking alert; input is ignored until it is dismissed
    pub alert: Option<String>,
    /// Transient success/warning message
    pub message: Option<Message>,
    /// Entries saved this session
    pub logged: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new<Tz: TimeZone>(data_dir: PathBuf, config: Config, now: &DateTime<Tz>) -> Self {
        let form = EntryForm::new(config.defaults.category, config.defaults.intensity, now);
        App {
            data_dir,
            config,
            theme: Theme::default(),
            form,
            focus: Field::Category,
            alert: None,
            message: None,
            logged: 0,
            should_quit: false,
        }
    }

    /// Form rows currently shown, in display order
    pub fn visible_fields(&self) -> Vec<Field> {
        FIELD_ORDER
            .iter()
            .copied()
            .filter(|f| match f {
                Field::Intensity => self.form.intensity_visible(),
                Field::Cost => self.form.cost_visible(),
                _ => true,
            })
            .collect()
    }

    pub fn focus_next(&mut self) {
        self.move_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.move_focus(-1);
    }

    fn move_focus(&mut self, step: isize) {
        let fields = self.visible_fields();
        let len = fields.len() as isize;
        let current = fields.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(len) as usize;
        if let Some(field) = fields.get(next) {
            self.focus = *field;
        }
    }

    /// Apply a form event, keeping focus on a visible row
    pub fn apply(&mut self, event: FormEvent) {
        self.form.apply(event);
        if !self.visible_fields().contains(&self.focus) {
            self.focus = Field::Type;
        }
    }

    pub fn submit(&mut self) {
        self.submit_with(&EntryBuilder::local());
    }

    /// Validate, build and store the current form
    pub fn submit_with<Tz: TimeZone>(&mut self, builder: &EntryBuilder<Tz>) {
        let date = self.form.date.clone();
        let time = self.form.time.clone();
        if !builder.validate_and_notify(&date, &time, self) {
            return;
        }

        let built = builder.build(&self.form.as_new_entry());
        let entry = match built {
            Ok(entry) => entry,
            Err(e) => {
                self.notify(&e.to_string());
                return;
            }
        };

        let saved = store_io::update_entries(&self.data_dir, |entries| {
            store_io::add_entry(entries, entry.clone());
            Ok(())
        });
        match saved {
            Ok(()) => {
                tracing::info!(id = entry.id, "logged entry from form");
                self.logged += 1;
                self.message = Some(Message::new(
                    MessageKind::Success,
                    format!("Logged: {}", self.form.type_label()),
                ));
                self.form.reset_after_submit(self.config.defaults.intensity);
            }
            Err(e) => {
                tracing::error!(error = %e, "could not save entry");
                self.message = Some(Message::new(
                    MessageKind::Warning,
                    format!("Could not save entry: {}", e),
                ));
            }
        }
    }

    /// Drop the message once it has been up long enough
    pub fn tick(&mut self, now: Instant) {
        if self.message.as_ref().is_some_and(|m| m.is_expired(now)) {
            self.message = None;
        }
    }
}

impl Notifier for App {
    fn notify(&mut self, message: &str) {
        self.alert = Some(message.to_string());
    }
}

/// Run the entry form until the user cancels
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config(data_dir)?;
    let mut app = App::new(data_dir.to_path_buf(), config, &Local::now());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal if we panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if app.logged > 0 {
        let noun = if app.logged == 1 { "entry" } else { "entries" };
        println!("Logged {} {}.", app.logged, noun);
    }
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
