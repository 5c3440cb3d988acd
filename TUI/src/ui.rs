use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::session::{ActionStatus, MessageKind, Sender};
use crate::store::FileKind;
use crate::ui_state::Tab;

// Copper Sapphire Morning color palette
const BG_DARK: Color = Color::Rgb(12, 12, 16);           // Deep background
const BG_PANEL: Color = Color::Rgb(18, 18, 24);          // Slightly lighter for panels

// Sapphire blues
const SAPPHIRE: Color = Color::Rgb(101, 150, 243);       // #6596F3 - Primary accent
const CYAN_LIGHT: Color = Color::Rgb(178, 220, 226);     // #B2DCE2 - Light cyan

// Copper/warm tones
const COPPER: Color = Color::Rgb(138, 72, 38);           // #8A4826 - Copper
const PALE_YELLOW: Color = Color::Rgb(234, 208, 148);    // #EAD094 - Pale yellow

// Accent colors
const BURGUNDY: Color = Color::Rgb(204, 92, 68);         // #CC5C44 - Warnings/errors
const OLIVE: Color = Color::Rgb(131, 179, 102);          // #83B366 - Success/green
const LAVENDER: Color = Color::Rgb(211, 164, 234);       // #D3A4EA - Purple accent

// Text colors
const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 245);   // Near white
const TEXT_SECONDARY: Color = Color::Rgb(180, 180, 190); // Light gray
const TEXT_MUTED: Color = Color::Rgb(105, 116, 133);     // #697485 - Medium gray

// Border colors (subtle)
const BORDER_DIM: Color = Color::Rgb(45, 50, 60);        // Dim border
const BORDER_ACCENT: Color = Color::Rgb(70, 85, 110);    // Accent border

fn status_color(status: ActionStatus) -> Color {
    match status {
        ActionStatus::Success => OLIVE,
        ActionStatus::Error => BURGUNDY,
        ActionStatus::Warning => PALE_YELLOW,
    }
}

fn status_icon(status: ActionStatus) -> &'static str {
    match status {
        ActionStatus::Success => "✓",
        ActionStatus::Error => "✗",
        ActionStatus::Warning => "!",
    }
}

fn panel(title: &str, border: Color) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

/// Format byte counts with binary unit shorthand
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

/// Greedy word wrap measured in terminal cells
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }
    let mut result = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.width() + 1 + word.width() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            result.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
        }
    }
    if !current_line.is_empty() {
        result.push(current_line);
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}

pub fn draw(frame: &mut Frame, app: &App) {
    // Fill entire background
    let bg = Block::default().style(Style::default().bg(BG_DARK));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(8),    // Body
        ])
        .split(frame.area());

    draw_tab_bar(frame, app, chunks[0]);

    match app.ui.tab {
        Tab::Chat => draw_chat(frame, app, chunks[1]),
        Tab::Dashboard => draw_dashboard(frame, app, chunks[1]),
    }
}

fn draw_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " ◆ drivechat ",
        Style::default().fg(COPPER).add_modifier(Modifier::BOLD),
    )];

    for tab in [Tab::Chat, Tab::Dashboard] {
        let style = if tab == app.ui.tab {
            Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(TEXT_MUTED)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(tab.title(), style));
    }

    if let Some(status) = &app.ui.status_message {
        spans.push(Span::styled(format!("   {}", status), Style::default().fg(LAVENDER)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_chat(frame: &mut Frame, app: &App, area: Rect) {
    // Main layout with padding
    let padded = Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    };

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(app.config.sidebar_width), // Sidebar
            Constraint::Length(1),                        // Gap
            Constraint::Min(30),                          // Chat area
        ])
        .split(padded);

    draw_sidebar(frame, app, main_chunks[0]);
    draw_chat_area(frame, app, main_chunks[2]);

    if app.showing_command_popup() {
        draw_command_popup(frame, app, main_chunks[2]);
    }
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Drive overview
            Constraint::Length(5), // Session info
            Constraint::Min(0),    // Filler
            Constraint::Length(6), // Keyboard hints
        ])
        .split(area);

    draw_drive_overview(frame, app, chunks[0]);
    draw_session_info(frame, app, chunks[1]);
    draw_keyboard_hints(frame, chunks[3]);
}

fn draw_drive_overview(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel("Drive", BORDER_DIM);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let store = &app.session.store;
    if store.is_empty() {
        let empty = Line::styled(" Drive is empty", Style::default().fg(TEXT_MUTED));
        frame.render_widget(Paragraph::new(empty), inner);
        return;
    }

    let row = |label: &'static str, count: usize, color: Color| {
        Line::from(vec![
            Span::styled(format!(" {:<11}", label), Style::default().fg(TEXT_SECONDARY)),
            Span::styled(count.to_string(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ])
    };

    let mut lines = vec![
        row("Folders", store.by_kind(FileKind::Folder).len(), SAPPHIRE),
        row("Documents", store.by_kind(FileKind::Document).len(), CYAN_LIGHT),
        row("Images", store.by_kind(FileKind::Image).len(), LAVENDER),
        row("Other", store.by_kind(FileKind::Other).len(), TEXT_MUTED),
        row("Total", store.len(), TEXT_PRIMARY),
    ];

    let bytes: u64 = store.records().iter().filter_map(|r| r.size).sum();
    let latest = store.records().iter().map(|r| r.modified_at).max();
    lines.push(Line::from(vec![
        Span::styled(" Size       ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled(format_size(bytes), Style::default().fg(TEXT_PRIMARY)),
    ]));
    if let Some(latest) = latest {
        lines.push(Line::from(vec![
            Span::styled(" Updated    ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(latest.format("%Y-%m-%d").to_string(), Style::default().fg(TEXT_MUTED)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_session_info(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel("Session", BORDER_DIM);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let stats = app.session.log.stats();
    let lines = vec![
        Line::from(vec![
            Span::styled(" Messages   ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(app.session.conversation.len().to_string(), Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(vec![
            Span::styled(" Actions    ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(app.session.log.len().to_string(), Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(vec![
            Span::styled(" Errors     ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(stats.errors.to_string(), Style::default().fg(BURGUNDY)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_keyboard_hints(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_DIM));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let desc = |d: &'static str| Span::styled(d, Style::default().fg(TEXT_MUTED));

    let hints = Paragraph::new(vec![
        Line::from(vec![key("ESC", SAPPHIRE), desc(" quit  "), key("/", COPPER), desc(" presets")]),
        Line::from(vec![key("TAB", SAPPHIRE), desc(" dashboard")]),
        Line::from(vec![key("^P", LAVENDER), desc(" complete path")]),
        Line::from(vec![key("F3", LAVENDER), desc(" export")]),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(hints, inner);
}

fn draw_chat_area(frame: &mut Frame, app: &App, area: Rect) {
    // Input grows with content (min 3, max 6 rows)
    let input_width = area.width.saturating_sub(6) as usize;
    let input_lines = if input_width > 0 {
        (app.ui.input.width() / input_width) + 1
    } else {
        1
    };
    let input_height = (input_lines as u16 + 2).clamp(3, 6);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),               // Messages
            Constraint::Length(input_height), // Input (dynamic)
        ])
        .split(area);

    draw_messages(frame, app, chunks[0]);
    draw_input(frame, app, chunks[1]);
}

fn draw_messages(frame: &mut Frame, app: &App, area: Rect) {
    // Border flashes on send
    let border_color = if app.ui.send_animation > 0 {
        let intensity = app.ui.send_animation as f64 / 20.0;
        let r = (101.0 + (154.0 * intensity)) as u8;
        let g = (150.0 + (70.0 * intensity)) as u8;
        let b = (243.0 - (17.0 * intensity)) as u8;
        Color::Rgb(r, g, b)
    } else {
        BORDER_DIM
    };

    let block = panel("Chat", border_color);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padded = Rect {
        x: inner.x + 1,
        y: inner.y,
        width: inner.width.saturating_sub(2),
        height: inner.height,
    };

    // Fixed-width label for alignment
    const LABEL_WIDTH: usize = 12;
    let indent: String = " ".repeat(LABEL_WIDTH);
    let content_width = (padded.width as usize).saturating_sub(LABEL_WIDTH);

    let mut lines: Vec<Line> = Vec::new();

    for msg in app.session.conversation.messages() {
        let (label, label_style) = match msg.sender {
            Sender::User => ("you", Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)),
            Sender::Assistant => ("assistant", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)),
        };
        let content_style = match msg.kind {
            MessageKind::File => Style::default().fg(CYAN_LIGHT),
            MessageKind::Text => Style::default().fg(TEXT_PRIMARY),
        };

        let formatted_label = format!("{:>width$} │ ", label, width = LABEL_WIDTH - 3);
        let mut is_first_line = true;

        for content_line in msg.content.lines() {
            for wrapped_line in wrap_text(content_line, content_width) {
                let lead = if is_first_line {
                    Span::styled(formatted_label.clone(), label_style)
                } else {
                    Span::styled(format!("{:>width$} │ ", "", width = LABEL_WIDTH - 3), Style::default().fg(BORDER_DIM))
                };
                lines.push(Line::from(vec![lead, Span::styled(wrapped_line, content_style)]));
                is_first_line = false;
            }
        }

        let time = msg.timestamp.with_timezone(&Local).format("%H:%M").to_string();
        lines.push(Line::from(vec![
            Span::raw(indent.clone()),
            Span::styled(time, Style::default().fg(TEXT_MUTED).add_modifier(Modifier::ITALIC)),
        ]));
        lines.push(Line::from(""));
    }

    let total_lines = lines.len();
    let visible_height = padded.height as usize;

    // Scroll from bottom, clamp scroll_offset to valid range
    let max_scroll = total_lines.saturating_sub(visible_height);
    let clamped_offset = app.ui.scroll_offset.min(max_scroll);
    let scroll_pos = max_scroll.saturating_sub(clamped_offset);

    let messages = Paragraph::new(lines).scroll((scroll_pos as u16, 0));
    frame.render_widget(messages, padded);

    if total_lines > visible_height && area.width > 4 && area.height > 2 {
        if scroll_pos > 0 {
            let up_area = Rect { x: area.x + area.width - 2, y: area.y + 1, width: 1, height: 1 };
            frame.render_widget(Paragraph::new("▲").style(Style::default().fg(SAPPHIRE)), up_area);
        }
        if clamped_offset > 0 {
            let down_area = Rect { x: area.x + area.width - 2, y: area.y + area.height - 2, width: 1, height: 1 };
            frame.render_widget(Paragraph::new("▼").style(Style::default().fg(SAPPHIRE)), down_area);
        }
    }
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    // Pulsing border
    let glow = (app.animation_frame as f64 / 90.0).sin() * 0.3 + 0.7;
    let border_color = Color::Rgb((101.0 * glow) as u8, (150.0 * glow) as u8, (243.0 * glow) as u8);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cursor = if app.animation_frame % 30 < 15 { "|" } else { " " };
    let input_text = if app.ui.input.is_empty() {
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(TEXT_PRIMARY)),
            Span::styled("Type a command...", Style::default().fg(TEXT_MUTED).add_modifier(Modifier::ITALIC)),
        ])
    } else {
        Line::from(Span::styled(
            format!(" > {}{}", app.ui.input, cursor),
            Style::default().fg(TEXT_PRIMARY),
        ))
    };

    let input = Paragraph::new(input_text).wrap(Wrap { trim: false });
    frame.render_widget(input, inner);
}

fn draw_command_popup(frame: &mut Frame, app: &App, chat_area: Rect) {
    let filtered = app.get_filtered_commands();

    if filtered.is_empty() || chat_area.width < 8 || chat_area.height < 4 {
        return;
    }

    // +1 for the "your input" option, +2 for borders
    let popup_height = ((filtered.len() + 3) as u16).min(chat_area.height);
    let popup_width = 72.min(chat_area.width.saturating_sub(4));
    let popup_area = Rect {
        x: chat_area.x + 2,
        y: chat_area.y + chat_area.height.saturating_sub(popup_height + 4),
        width: popup_width,
        height: popup_height,
    };

    // Clear area behind popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Presets ", Style::default().fg(COPPER).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(COPPER))
        .style(Style::default().bg(BG_PANEL));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = Vec::new();

    // First option: current typed input (selected when command_selection is None)
    let input_selected = app.ui.command_selection.is_none();
    let input_style = if input_selected {
        Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_SECONDARY)
    };
    let indicator = if input_selected { ">" } else { " " };
    lines.push(Line::from(vec![
        Span::styled(format!("{} {} ", indicator, &app.ui.input), input_style),
        Span::styled("(your input)", Style::default().fg(TEXT_MUTED).add_modifier(Modifier::ITALIC)),
    ]));

    for (i, (cmd, desc)) in filtered.iter().enumerate() {
        let is_selected = app.ui.command_selection == Some(i);
        let style = if is_selected {
            Style::default().fg(CYAN_LIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_SECONDARY)
        };
        let indicator = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!("{} {} ", indicator, cmd), style),
            Span::styled(format!("- {}", desc), Style::default().fg(TEXT_MUTED)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let padded = Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Stat cards
            Constraint::Min(4),    // Recent activity
            Constraint::Length(8), // Command reference
        ])
        .split(padded);

    draw_stat_cards(frame, app, chunks[0]);
    draw_recent_activity(frame, app, chunks[1]);
    draw_command_reference(frame, chunks[2]);
}

fn draw_stat_cards(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.session.log.stats();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let card = |title: &str, value: String, color: Color, caption: String| {
        Paragraph::new(vec![
            Line::from(Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(caption, Style::default().fg(TEXT_MUTED))),
        ])
        .block(panel(title, BORDER_ACCENT))
    };

    frame.render_widget(
        card("Total Actions", stats.total.to_string(), TEXT_PRIMARY, "Lifetime commands executed".to_string()),
        cards[0],
    );
    frame.render_widget(
        card(
            "Success Rate",
            format!("{}%", stats.success_rate()),
            OLIVE,
            format!("{} successful operations", stats.successes),
        ),
        cards[1],
    );
    frame.render_widget(
        card(
            "Errors",
            stats.errors.to_string(),
            BURGUNDY,
            format!("{} warnings", stats.warnings),
        ),
        cards[2],
    );
}

fn draw_recent_activity(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel("Recent Activity", BORDER_DIM);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.session.log.is_empty() {
        let empty = Paragraph::new("No activity yet. Start chatting with the assistant!")
            .style(Style::default().fg(TEXT_MUTED))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for entry in app.session.log.recent(app.config.recent_activity_limit) {
        let color = status_color(entry.status);
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", status_icon(entry.status)), Style::default().fg(color)),
            Span::styled(entry.action.clone(), Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  [{}]", entry.status.label()), Style::default().fg(color)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled(entry.details.clone(), Style::default().fg(TEXT_SECONDARY)),
            Span::styled(
                format!("  {}", entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")),
                Style::default().fg(TEXT_MUTED),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_command_reference(frame: &mut Frame, area: Rect) {
    let block = panel("Command Reference", BORDER_DIM);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let code = |text: &'static str| {
        Line::from(Span::styled(format!(" {}", text), Style::default().fg(CYAN_LIGHT)))
    };
    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(COPPER).add_modifier(Modifier::BOLD)))
    };

    frame.render_widget(
        Paragraph::new(vec![
            heading("File Operations"),
            code("LIST /folder/path"),
            code("DELETE /path/file.ext"),
            code("MOVE /source /destination"),
        ]),
        columns[0],
    );
    frame.render_widget(
        Paragraph::new(vec![
            heading("AI Operations"),
            code("SUMMARY /folder/path"),
            code("HELP"),
        ]),
        columns[1],
    );
}
