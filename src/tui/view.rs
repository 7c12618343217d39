use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::form::{classes, factory::REQUIRED_MARKER};
use crate::page::{NodeId, Page, Tag};

/// A focus target in the rendered form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    Field(String),
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Heading,
    SectionHelp,
    Field {
        id: String,
        label: String,
        required: bool,
        select: bool,
    },
    Help,
    Restricted,
    Submit,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub text: String,
}

impl Row {
    fn new(kind: RowKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    fn focus(&self) -> Option<Focus> {
        match &self.kind {
            RowKind::Field { id, .. } => Some(Focus::Field(id.clone())),
            RowKind::Submit => Some(Focus::Submit),
            _ => None,
        }
    }
}

/// Flatten the displayed part of the form region into terminal rows.
pub fn form_rows(page: &Page) -> Vec<Row> {
    let doc = &page.doc;
    let mut rows = Vec::new();
    for child in doc.node(page.form).children() {
        if !doc.is_displayed(*child) {
            continue;
        }
        let node = doc.node(*child);
        match node.tag {
            Tag::Div if node.has_class(classes::SECTION) => section_rows(page, *child, &mut rows),
            Tag::Div if node.has_class(classes::VALIDATION_SUMMARY) => {
                rows.push(Row::new(RowKind::Summary, node.text.as_str()))
            }
            Tag::Button => rows.push(Row::new(RowKind::Submit, node.text.as_str())),
            _ => {}
        }
    }
    rows
}

/// Focus targets in display order.
pub fn focus_targets(rows: &[Row]) -> Vec<Focus> {
    rows.iter().filter_map(Row::focus).collect()
}

fn section_rows(page: &Page, section: NodeId, rows: &mut Vec<Row>) {
    let doc = &page.doc;
    for child in doc.node(section).children() {
        let node = doc.node(*child);
        if node.hidden {
            continue;
        }
        match node.tag {
            Tag::H2 => rows.push(Row::new(RowKind::Heading, node.text.as_str())),
            Tag::P => rows.push(Row::new(RowKind::SectionHelp, node.text.as_str())),
            Tag::Div if node.has_class(classes::SUPPRESSED) => {
                rows.push(Row::new(RowKind::Restricted, "(restricted for your role)"))
            }
            Tag::Div => group_rows(page, *child, rows),
            _ => {}
        }
    }
}

fn group_rows(page: &Page, group: NodeId, rows: &mut Vec<Row>) {
    let doc = &page.doc;
    let mut label = String::new();
    for child in doc.node(group).children() {
        let node = doc.node(*child);
        match node.tag {
            Tag::Label => label = node.text.clone(),
            tag if tag.is_control() => {
                let id = node.id.clone().unwrap_or_default();
                let value = match tag {
                    Tag::Textarea => node.value.replace('\n', " ⏎ "),
                    Tag::Select => format!("‹ {} ›", node.value),
                    _ => node.value.clone(),
                };
                rows.push(Row::new(
                    RowKind::Field {
                        id,
                        label: label.clone(),
                        required: node.is_required(),
                        select: tag == Tag::Select,
                    },
                    value,
                ));
            }
            Tag::Small => rows.push(Row::new(RowKind::Help, node.text.as_str())),
            _ => {}
        }
    }
}

pub struct ViewModel<'a> {
    pub page: &'a Page,
    pub rows: &'a [Row],
    pub focus: Option<&'a Focus>,
    pub status: &'a str,
    pub help: Option<&'a str>,
}

pub fn draw(frame: &mut Frame<'_>, model: ViewModel<'_>) {
    let output_height = if model.page.output_revealed() {
        (model.page.output_text().lines().count() as u16 + 2).min(12)
    } else {
        0
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(output_height),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_meta(frame, chunks[0], model.page);
    render_body(frame, chunks[1], &model);
    if output_height > 0 {
        let output = Paragraph::new(model.page.output_text().to_string())
            .block(Block::default().title("Submitted").borders(Borders::ALL))
            .style(Style::default().fg(Color::Green));
        frame.render_widget(output, chunks[2]);
    }
    render_footer(frame, chunks[3], &model);
}

fn render_meta(frame: &mut Frame<'_>, area: Rect, page: &Page) {
    let doc = &page.doc;
    let mut lines = Vec::new();
    for child in doc.node(page.meta).children() {
        let node = doc.node(*child);
        let style = if node.tag == Tag::H1 {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let width = area.width.saturating_sub(2).max(1) as usize;
        for wrapped in textwrap::wrap(&node.text, width) {
            lines.push(Line::styled(wrapped.into_owned(), style));
        }
    }
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_body(frame: &mut Frame<'_>, area: Rect, model: &ViewModel<'_>) {
    let label_width = model
        .rows
        .iter()
        .filter_map(|row| match &row.kind {
            RowKind::Field {
                label, required, ..
            } => Some(label.width() + if *required { REQUIRED_MARKER.width() } else { 0 }),
            _ => None,
        })
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(model.rows.len());
    let mut focused_line = 0usize;
    for row in model.rows {
        let focused = row.focus().as_ref() == model.focus && model.focus.is_some();
        if focused {
            focused_line = lines.len();
        }
        lines.push(row_line(row, focused, label_width));
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let offset = focused_line.saturating_sub(inner_height.saturating_sub(1));
    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Form").borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((offset as u16, 0));
    frame.render_widget(paragraph, area);
}

fn row_line(row: &Row, focused: bool, label_width: usize) -> Line<'static> {
    match &row.kind {
        RowKind::Heading => Line::styled(
            row.text.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        RowKind::SectionHelp => Line::styled(
            row.text.clone(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ),
        RowKind::Field {
            label,
            required,
            select,
            ..
        } => {
            let mut label_text = label.clone();
            if *required {
                label_text.push_str(REQUIRED_MARKER);
            }
            let pad = label_width.saturating_sub(label_text.width());
            let value_style = if focused {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else if *select {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw("  "),
                Span::styled(label_text, label_style(*required)),
                Span::raw(format!("{}  ", " ".repeat(pad))),
                Span::styled(row.text.clone(), value_style),
            ])
        }
        RowKind::Help => Line::styled(
            format!("    {}", row.text),
            Style::default().fg(Color::DarkGray),
        ),
        RowKind::Restricted => Line::styled(
            format!("  {}", row.text),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
        RowKind::Submit => {
            let style = if focused {
                Style::default().fg(Color::Black).bg(Color::Green)
            } else {
                Style::default().fg(Color::Green)
            };
            Line::styled(format!("[ {} ]", row.text), style)
        }
        RowKind::Summary => Line::styled(
            row.text.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    }
}

fn label_style(required: bool) -> Style {
    if required {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, model: &ViewModel<'_>) {
    let mut spans = vec![Span::raw(model.status.to_string())];
    if let Some(help) = model.help {
        spans.push(Span::styled(
            format!("  |  {help}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let footer = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
