use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::entry::{Category, EntryType};
use crate::ops::form::FormEvent;
use crate::ops::labels::{COST_SLIDER_MAX, INTENSITY_MAX, INTENSITY_MIN};
use crate::util::unicode::pop_grapheme;

use super::app::{App, Field};

/// Handle a key press in the entry form
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // An open alert swallows everything until dismissed
    if app.alert.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.alert = None;
        }
        return;
    }

    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => {
            app.should_quit = true;
        }
        (_, KeyCode::Enter) => app.submit(),
        (_, KeyCode::Tab) | (_, KeyCode::Down) => app.focus_next(),
        (_, KeyCode::BackTab) | (_, KeyCode::Up) => app.focus_prev(),
        (_, KeyCode::Left) => step_choice(app, -1),
        (_, KeyCode::Right) => step_choice(app, 1),
        (_, KeyCode::Char(' ')) if !app.focus.is_text() => step_choice(app, 1),
        (_, KeyCode::Backspace) if app.focus.is_text() => edit_text(app, pop_grapheme),
        (m, KeyCode::Char(c)) if app.focus.is_text() && !m.contains(KeyModifiers::CONTROL) => {
            edit_text(app, |s| s.push(c));
        }
        _ => {}
    }
}

/// Move the focused choice or slider by one step
fn step_choice(app: &mut App, step: i32) {
    let event = match app.focus {
        Field::Category => FormEvent::SetCategory(cycle_category(app.form.category, step)),
        Field::Type => FormEvent::SetType(match app.form.entry_type {
            EntryType::Craving => EntryType::Smoked,
            EntryType::Smoked => EntryType::Craving,
        }),
        Field::Intensity => {
            let value = (app.form.intensity as i32 + step)
                .clamp(INTENSITY_MIN as i32, INTENSITY_MAX as i32);
            FormEvent::IntensityInput(value as u8)
        }
        Field::Cost => {
            let position = (app.form.cost_position as i64 + step as i64)
                .clamp(0, COST_SLIDER_MAX as i64);
            FormEvent::CostInput(position as u32)
        }
        Field::Date | Field::Time | Field::Note => return,
    };
    app.apply(event);
}

fn cycle_category(current: Category, step: i32) -> Category {
    let all = Category::ALL;
    let len = all.len() as i32;
    let idx = all.iter().position(|c| *c == current).unwrap_or(0) as i32;
    all[(idx + step).rem_euclid(len) as usize]
}

/// Edit the focused text field and feed the result back as an event
fn edit_text(app: &mut App, edit: impl FnOnce(&mut String)) {
    let mut text = match app.focus {
        Field::Date => app.form.date.clone(),
        Field::Time => app.form.time.clone(),
        Field::Note => app.form.note.clone(),
        _ => return,
    };
    edit(&mut text);
    let event = match app.focus {
        Field::Date => FormEvent::SetDate(text),
        Field::Time => FormEvent::SetTime(text),
        _ => FormEvent::SetNote(text),
    };
    app.apply(event);
}
