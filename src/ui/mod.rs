use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, Popup};
use crate::leads::columns::{ColumnId, ColumnSpec, REGISTRY};
use crate::leads::view::ViewMode;
use crate::leads::Lead;
use crate::theme::Theme;

// Load theme colors once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::load)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1), // Info / search line
            Constraint::Min(4),    // Leads list (table or cards)
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    match app.view.mode() {
        ViewMode::Table => draw_leads_table(f, app, chunks[1]),
        ViewMode::Cards => draw_leads_cards(f, app, chunks[1]),
    }
    draw_footer(f, app, chunks[2]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f),
        Popup::Confirm => draw_confirm_popup(f, app),
        Popup::Form => draw_form_popup(f, app),
        Popup::Columns => draw_columns_popup(f, app),
    }
}

/// Header glyph per column. Kept out of the registry so the core stays
/// free of rendering concerns.
fn column_glyph(id: ColumnId) -> &'static str {
    match id {
        ColumnId::Name => "󰀄",
        ColumnId::Company => "󰢌",
        ColumnId::Email => "󰇮",
        ColumnId::Phone => "󰏲",
        ColumnId::Status => "󰜎",
        ColumnId::Priority => "󰈸",
        ColumnId::Source => "󰋺",
        ColumnId::Value => "󰉁",
        ColumnId::Owner => "󰋜",
        ColumnId::LastActivity => "󰥔",
        ColumnId::FollowUp => "󰃰",
        ColumnId::Score => "󰔢",
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v >= 1000.0 => format!("${:.1}k", v / 1000.0),
        Some(v) => format!("${v:.0}"),
        None => "-".to_string(),
    }
}

/// Cell content and color for one lead attribute.
fn cell_for(lead: &Lead, id: ColumnId, now: DateTime<Utc>) -> (String, Color) {
    match id {
        ColumnId::Name => (lead.name.clone(), text()),
        ColumnId::Company => (
            lead.company.clone().unwrap_or_else(|| "-".to_string()),
            text(),
        ),
        ColumnId::Email => (
            lead.email.clone().unwrap_or_else(|| "-".to_string()),
            text_dim(),
        ),
        ColumnId::Phone => (
            lead.phone.clone().unwrap_or_else(|| "-".to_string()),
            text_dim(),
        ),
        ColumnId::Status => (
            lead.status.label().to_string(),
            theme().status_color(lead.status),
        ),
        ColumnId::Priority => (
            lead.priority.label().to_string(),
            theme().priority_color(lead.priority),
        ),
        ColumnId::Source => {
            let source = if lead.source.is_empty() {
                "-".to_string()
            } else {
                lead.source.clone()
            };
            (source, text_dim())
        }
        ColumnId::Value => (format_value(lead.estimated_value), success()),
        ColumnId::Owner => (
            lead.owner.clone().unwrap_or_else(|| "-".to_string()),
            text_dim(),
        ),
        ColumnId::LastActivity => (format_date(lead.last_activity), text_dim()),
        ColumnId::FollowUp => {
            let color = if lead.follow_up_due(now) { warning() } else { text_dim() };
            (format_date(lead.next_follow_up), color)
        }
        ColumnId::Score => (
            lead.lead_score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
            text_dim(),
        ),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.searching {
        Line::from(vec![
            Span::styled("/", Style::default().fg(accent())),
            Span::styled(app.filter.query(), Style::default().fg(text())),
            Span::styled("_", Style::default().fg(accent())),
            Span::styled("  (Enter keeps, Esc clears)", Style::default().fg(text_dim())),
        ])
    } else if let Some(ref status) = app.status_message {
        Line::from(vec![Span::styled(status, Style::default().fg(warning()))])
    } else {
        // Filter summary: counts plus any active constraints
        let shown = app.filter.cached().len();
        let total = app.leads.len();
        let mut spans = vec![Span::styled(
            format!("{shown}/{total} leads"),
            Style::default().fg(text_dim()),
        )];
        if !app.selection.is_empty() {
            spans.push(Span::styled(
                format!(" │ {} selected", app.selection.len()),
                Style::default().fg(accent()),
            ));
        }
        if !app.filter.query().is_empty() {
            spans.push(Span::styled(
                format!(" │ /{}", app.filter.query()),
                Style::default().fg(accent()),
            ));
        }
        if let Some(status) = app.filter.status() {
            spans.push(Span::styled(
                format!(" │ status:{}", status.label()),
                Style::default().fg(theme().status_color(status)),
            ));
        }
        if let Some(priority) = app.filter.priority() {
            spans.push(Span::styled(
                format!(" │ priority:{}", priority.label()),
                Style::default().fg(theme().priority_color(priority)),
            ));
        }
        if let Some(source) = app.filter.source() {
            spans.push(Span::styled(
                format!(" │ source:{source}"),
                Style::default().fg(accent()),
            ));
        }
        Line::from(spans)
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_leads_table(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(
            " Leads ",
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));

    let specs: Vec<&'static ColumnSpec> = app.columns.render();
    let now = Utc::now();

    let mut header_cells = vec![Span::styled("", Style::default().fg(header()))];
    header_cells.extend(specs.iter().map(|spec| {
        Span::styled(
            format!("{} {}", column_glyph(spec.id), spec.label),
            Style::default().fg(header()),
        )
    }));
    let header_row = Row::new(header_cells);

    let filtered = app.filtered_leads();
    let rows: Vec<Row> = if filtered.is_empty() {
        vec![Row::new(vec![
            Span::styled("  No leads match the current filters", Style::default().fg(text_dim())),
        ])]
    } else {
        filtered
            .iter()
            .enumerate()
            .map(|(i, lead)| {
                let mark = if app.selection.contains(&lead.id) { "●" } else { " " };
                let mark_color = if app.selection.contains(&lead.id) { accent() } else { text_dim() };

                let mut cells = vec![Span::styled(mark, Style::default().fg(mark_color))];
                cells.extend(specs.iter().map(|spec| {
                    let (content, color) = cell_for(lead, spec.id, now);
                    Span::styled(content, Style::default().fg(color))
                }));

                let row_style = if i == app.cursor {
                    Style::default().bg(bg_selected()).fg(text())
                } else {
                    Style::default()
                };
                Row::new(cells).style(row_style)
            })
            .collect()
    };

    let mut widths = vec![Constraint::Length(2)];
    widths.extend(specs.iter().map(|spec| Constraint::Length(spec.width)));

    let table = Table::new(rows, widths)
        .header(header_row.style(Style::default()))
        .block(block);

    f.render_widget(table, area);
}

const CARD_HEIGHT: u16 = 4;

fn draw_leads_cards(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(
            " Leads ",
            Style::default().fg(accent()).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let filtered = app.filtered_leads();
    if filtered.is_empty() {
        let empty = Paragraph::new("No leads match the current filters")
            .style(Style::default().fg(text_dim()));
        f.render_widget(empty, inner);
        return;
    }

    let per_page = (inner.height / CARD_HEIGHT).max(1) as usize;
    let page_start = (app.cursor / per_page) * per_page;
    let now = Utc::now();

    for (slot, (i, lead)) in filtered
        .iter()
        .enumerate()
        .skip(page_start)
        .take(per_page)
        .enumerate()
    {
        let card_area = Rect {
            x: inner.x,
            y: inner.y + (slot as u16) * CARD_HEIGHT,
            width: inner.width,
            height: CARD_HEIGHT.min(inner.height.saturating_sub((slot as u16) * CARD_HEIGHT)),
        };
        if card_area.height == 0 {
            break;
        }

        let is_cursor = i == app.cursor;
        let selected = app.selection.contains(&lead.id);
        let border_color = if is_cursor { accent() } else { inactive() };
        let mark = if selected { "● " } else { "" };

        let card_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                format!(" {}{} ", mark, lead.name),
                Style::default()
                    .fg(if is_cursor { accent() } else { text() })
                    .add_modifier(Modifier::BOLD),
            ));

        let company_line = Line::from(vec![
            Span::styled(
                lead.company.clone().unwrap_or_else(|| "-".to_string()),
                Style::default().fg(text()),
            ),
            Span::styled(
                lead.job_title
                    .as_ref()
                    .map(|t| format!(" · {t}"))
                    .unwrap_or_default(),
                Style::default().fg(text_dim()),
            ),
        ]);
        let followup_color = if lead.follow_up_due(now) { warning() } else { text_dim() };
        let badge_line = Line::from(vec![
            Span::styled(lead.status.label(), Style::default().fg(theme().status_color(lead.status))),
            Span::styled(" │ ", Style::default().fg(inactive())),
            Span::styled(
                lead.priority.label(),
                Style::default().fg(theme().priority_color(lead.priority)),
            ),
            Span::styled(" │ ", Style::default().fg(inactive())),
            Span::styled(format_value(lead.estimated_value), Style::default().fg(success())),
            Span::styled(" │ 󰃰 ", Style::default().fg(inactive())),
            Span::styled(format_date(lead.next_follow_up), Style::default().fg(followup_color)),
        ]);

        let card = Paragraph::new(vec![company_line, badge_line]).block(card_block);
        f.render_widget(card, card_area);
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match app.popup {
        Popup::Form => vec![
            ("Tab", "Field"),
            ("F2", "Save"),
            ("Esc", "Cancel"),
        ],
        Popup::Columns => vec![
            ("↑↓", "Nav"),
            ("Space", "Toggle"),
            ("r", "Reset"),
            ("Esc", "Close"),
        ],
        _ => vec![
            ("↑↓", "Nav"),
            ("/", "Search"),
            ("s/p/o", "Filters"),
            ("Space", "Mark"),
            ("a", "All"),
            ("n", "New"),
            ("e", "Edit"),
            ("d", "Del"),
            ("c", "Cols"),
            ("v", "View"),
            ("h", "Help"),
        ],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 5 } else if area.width < 90 { 8 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_form_popup(f: &mut Frame, app: &App) {
    let Some(form) = &app.form else { return };

    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 90 { 90 } else { 60 },
        if area.height < 30 { 90 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let title = if form.editing.is_some() {
        " 󰏫 Edit Lead "
    } else {
        " 󰝒 New Lead "
    };
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(accent())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let active = i == form.active;
        let label_color = if active { accent() } else { header() };
        let cursor = if active { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>10}: ", field.label), Style::default().fg(label_color)),
            Span::styled(
                format!("{}{}", field.value, cursor),
                Style::default().fg(text()),
            ),
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(vec![
        Span::styled("  [ ", Style::default().fg(text_dim())),
        Span::styled("F2 = Save", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
        Span::styled(" ]  [ ", Style::default().fg(text_dim())),
        Span::styled("Esc = Cancel", Style::default().fg(danger())),
        Span::styled(" ]", Style::default().fg(text_dim())),
    ]));

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(body, inner);
}

fn draw_columns_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 70 { 80 } else { 40 },
        if area.height < 30 { 90 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" 󰓫 Columns ", Style::default().fg(accent())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));

    let rows: Vec<Row> = REGISTRY
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let visible = app.columns.contains(spec.id);
            let mark = if visible { "[x]" } else { "[ ]" };
            let mark_color = if visible { success() } else { text_dim() };
            let sort_hint = if spec.sortable { "sortable" } else { "" };

            let row_style = if i == app.column_cursor {
                Style::default().bg(bg_selected()).fg(text())
            } else {
                Style::default()
            };

            Row::new(vec![
                Span::styled(mark, Style::default().fg(mark_color)),
                Span::styled(
                    format!("{} {}", column_glyph(spec.id), spec.label),
                    Style::default().fg(text()),
                ),
                Span::styled(sort_hint, Style::default().fg(text_dim())),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(60),
        Constraint::Percentage(30),
    ];
    let table = Table::new(rows, widths).block(block);
    f.render_widget(table, popup_area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 70 },
        if area.height < 40 { 95 } else { 80 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled("═══ Navigation ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  ↑/↓ j/k   ", Style::default().fg(accent())),
            Span::raw("Move through the lead list"),
        ]),
        Line::from(vec![
            Span::styled("  v         ", Style::default().fg(accent())),
            Span::raw("Toggle table / card view (cards auto-engage on narrow terminals)"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Filtering ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  /         ", Style::default().fg(accent())),
            Span::raw("Live search across name, email, company, phone"),
        ]),
        Line::from(vec![
            Span::styled("  s / p / o ", Style::default().fg(accent())),
            Span::raw("Cycle status / priority / source filter"),
        ]),
        Line::from(vec![
            Span::styled("  x         ", Style::default().fg(accent())),
            Span::raw("Clear all filters"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Selection & Bulk Actions ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  Space     ", Style::default().fg(accent())),
            Span::raw("Mark/unmark the highlighted lead"),
        ]),
        Line::from(vec![
            Span::styled("  a         ", Style::default().fg(accent())),
            Span::raw("Select all filtered leads (or clear, if all are selected)"),
        ]),
        Line::from(vec![
            Span::styled("  d         ", Style::default().fg(accent())),
            Span::raw("Delete marked leads (with confirmation)"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Leads ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  n / e     ", Style::default().fg(accent())),
            Span::raw("Create / edit a lead"),
        ]),
        Line::from(vec![
            Span::styled("  >         ", Style::default().fg(accent())),
            Span::raw("Advance the highlighted lead to the next pipeline stage"),
        ]),
        Line::from(vec![
            Span::styled("  c         ", Style::default().fg(accent())),
            Span::raw("Choose visible columns"),
        ]),
        Line::from(vec![
            Span::styled("  R         ", Style::default().fg(accent())),
            Span::raw("Reload from the API"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Quick Start ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  prospect             ", Style::default().fg(accent())),
            Span::raw("Launch against the configured API"),
        ]),
        Line::from(vec![
            Span::styled("  prospect --demo      ", Style::default().fg(accent())),
            Span::raw("Run on bundled sample data"),
        ]),
        Line::from(vec![
            Span::styled("  prospect --summary   ", Style::default().fg(accent())),
            Span::raw("Print a JSON pipeline summary for scripts"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("h", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" 󰋖 prospect Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(40, 20, f.area());

    f.render_widget(Clear, popup_area);

    let message = app.status_message.as_deref().unwrap_or("Confirm?");

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(warning()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
            Span::raw(" Yes   "),
            Span::styled("n", Style::default().fg(danger()).add_modifier(Modifier::BOLD)),
            Span::raw(" No"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Confirm ", Style::default().fg(warning())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(warning())),
    )
    .alignment(Alignment::Center);

    f.render_widget(confirm, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
