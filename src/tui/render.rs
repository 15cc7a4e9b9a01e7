use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::entry::Category;
use crate::ops::form::MessageKind;
use crate::ops::labels::{COST_SLIDER_MAX, INTENSITY_MAX, INTENSITY_MIN};
use crate::util::unicode::{pad_to_width, truncate_to_width};

use super::app::{App, Field};

const MODAL_W: u16 = 60;
const LABEL_W: usize = 10;
const SLIDER_W: usize = 16;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let bg = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg), area);

    render_form(frame, app, area);
    if app.alert.is_some() {
        render_alert(frame, app, area);
    }
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let popup_w = MODAL_W.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        " Log an entry",
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    for field in app.visible_fields() {
        lines.push(field_line(app, field, inner_w));
    }

    lines.push(Line::from(""));
    lines.push(match &app.message {
        Some(msg) => {
            let color = match msg.kind {
                MessageKind::Success => app.theme.green,
                MessageKind::Warning => app.theme.yellow,
            };
            Line::from(Span::styled(
                format!(" {}", msg.text),
                Style::default().fg(color).bg(bg),
            ))
        }
        None => Line::from(Span::styled("", text_style)),
    });
    lines.push(Line::from(Span::styled(
        " Enter save  Tab next  \u{2190}/\u{2192} change  Esc quit",
        dim_style,
    )));

    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let modal = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, modal);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" urge ", dim_style))
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(
        Paragraph::new(lines).block(block).style(text_style),
        modal,
    );
}

/// One form row: label column, then the field's value
fn field_line(app: &App, field: Field, inner_w: usize) -> Line<'static> {
    let focused = app.focus == field;
    let row_bg = if focused {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let label_style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(row_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(row_bg)
    };
    let value_style = Style::default().fg(app.theme.text).bg(row_bg);
    let chosen_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(row_bg)
        .add_modifier(Modifier::BOLD);

    let marker = if focused { "\u{203a}" } else { " " };
    let mut spans = vec![Span::styled(
        format!("{}{} ", marker, pad_to_width(field.label(), LABEL_W)),
        label_style,
    )];
    let value_w = inner_w.saturating_sub(LABEL_W + 2);

    let form = &app.form;
    match field {
        Field::Category => {
            for category in Category::ALL {
                push_choice(
                    &mut spans,
                    category.as_str(),
                    category == form.category,
                    chosen_style,
                    value_style,
                );
            }
        }
        Field::Type => {
            for option in form.type_options() {
                push_choice(
                    &mut spans,
                    option.label,
                    option.value == form.entry_type,
                    chosen_style,
                    value_style,
                );
            }
        }
        Field::Date | Field::Time | Field::Note => {
            let text = match field {
                Field::Date => &form.date,
                Field::Time => &form.time,
                _ => &form.note,
            };
            let shown = truncate_to_width(text, value_w.saturating_sub(1));
            spans.push(Span::styled(shown, chosen_style));
            if focused {
                spans.push(Span::styled("\u{258f}", label_style));
            }
        }
        Field::Intensity => {
            let position = (form.intensity - INTENSITY_MIN) as u32;
            let max = (INTENSITY_MAX - INTENSITY_MIN) as u32;
            spans.push(Span::styled(slider(position, max, SLIDER_W), value_style));
            spans.push(Span::styled(format!(" {}", form.intensity_label()), chosen_style));
        }
        Field::Cost => {
            spans.push(Span::styled(
                slider(form.cost_position, COST_SLIDER_MAX, SLIDER_W),
                value_style,
            ));
            spans.push(Span::styled(
                format!(" {}", form.cost_label(&app.config.display.currency)),
                chosen_style,
            ));
        }
    }

    // Pad so the selection background spans the row
    let used: usize = spans.iter().map(|s| s.width()).sum();
    if used < inner_w {
        spans.push(Span::styled(" ".repeat(inner_w - used), value_style));
    }
    Line::from(spans)
}

fn push_choice(
    spans: &mut Vec<Span<'static>>,
    label: &str,
    chosen: bool,
    chosen_style: Style,
    style: Style,
) {
    if chosen {
        spans.push(Span::styled(format!("[{}]", label), chosen_style));
    } else {
        spans.push(Span::styled(format!(" {} ", label), style));
    }
    spans.push(Span::styled(" ", style));
}

/// Horizontal slider track with a knob at `position` of `max`
fn slider(position: u32, max: u32, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let knob = if max == 0 {
        0
    } else {
        (position.min(max) as usize * (width - 1)) / max as usize
    };
    (0..width)
        .map(|i| match i.cmp(&knob) {
            std::cmp::Ordering::Less => '\u{2501}',
            std::cmp::Ordering::Equal => '\u{25cf}',
            std::cmp::Ordering::Greater => '\u{2500}',
        })
        .collect()
}

/// Blocking alert shown over the form
fn render_alert(frame: &mut Frame, app: &App, area: Rect) {
    let text = app.alert.as_deref().unwrap_or("");
    let bg = app.theme.background;
    let popup_w: u16 = 40.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", truncate_to_width(text, inner_w.saturating_sub(1))),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " Press Enter to dismiss",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    let popup_h = (lines.len() as u16 + 2).min(area.height);
    let overlay = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}
