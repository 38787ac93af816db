use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use crate::app::{char_width, display_width, wrap_text_to_width, App, FocusPane};
use crate::locale::Locale;

const TITLE: &str = "Museum Mate: Your Virtual Museum Guide";
const FOOTER: &str = "© 2024 Museum Explorer. All rights reserved.";
const PICKER_PROMPT: &str = "Please select your preferred language:";

const MESSAGE_GLYPH: &str = "✉";
const MENU_GLYPH: &str = "☰";
const SEND_GLYPH: &str = " ➤ ";

const INDIGO: Color = Color::Rgb(79, 70, 229);
const INDIGO_LIGHT: Color = Color::Rgb(99, 102, 241);

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let picker_height = if app.chat.show_language_picker() { 4 } else { 0 };

    // Main layout: header, transcript, picker, input, footer
    let [header_area, chat_area, picker_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(picker_height),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_transcript(app, frame, chat_area);
    if picker_height > 0 {
        render_language_picker(app, frame, picker_area);
    } else {
        app.language_areas.clear();
    }
    render_input(app, frame, input_area);
    render_footer(frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let style = Style::default().bg(INDIGO).fg(Color::White);

    let title = Paragraph::new(Line::from(Span::styled(
        format!(" {}", TITLE),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .style(style);
    frame.render_widget(title, area);

    let icons = Paragraph::new(Line::from(format!("{} {} ", MESSAGE_GLYPH, MENU_GLYPH)))
        .alignment(Alignment::Right)
        .style(style);
    frame.render_widget(icons, area);
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store area for mouse hit-testing
    app.chat_area = Some(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    let inner = block.inner(area);
    let resized = inner.width != app.chat_width || inner.height != app.chat_height;
    app.chat_width = inner.width;
    app.chat_height = inner.height;
    if resized {
        app.scroll_chat_to_bottom();
    }

    let width = app.chat_text_width();
    let mut lines: Vec<Line> = Vec::new();

    for msg in app.chat.transcript() {
        let (style, alignment) = if msg.is_bot() {
            (Style::default().bg(Color::White).fg(Color::Black), Alignment::Left)
        } else {
            (Style::default().bg(INDIGO_LIGHT).fg(Color::White), Alignment::Right)
        };

        let wrapped = wrap_text_to_width(msg.text(), width);
        // Pad every row to the bubble's widest row so it reads as one block
        let bubble = wrapped.iter().map(|l| display_width(l)).max().unwrap_or(0);
        for row in wrapped {
            let padding = bubble.saturating_sub(display_width(&row));
            let text = format!(" {}{} ", row, " ".repeat(padding));
            lines.push(Line::from(Span::styled(text, style)).alignment(alignment));
        }
        lines.push(Line::default());
    }

    if app.chat.replies_pending() {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("typing{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let transcript = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((app.chat_scroll, 0));

    frame.render_widget(transcript, area);
}

fn render_language_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let picker_focused = app.focus == FocusPane::LanguagePicker;
    let border_color = if picker_focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [prompt_area, buttons_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let prompt = Paragraph::new(PICKER_PROMPT)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(prompt, prompt_area);

    // Lay the buttons out centered on one row, remembering where each landed
    let locales = Locale::all();
    let labels: Vec<String> = locales
        .iter()
        .map(|locale| format!(" {} ", locale.display_name()))
        .collect();
    let gap = 3u16;
    let total_width: u16 = labels.iter().map(|l| display_width(l) as u16).sum::<u16>()
        + gap * (labels.len() as u16).saturating_sub(1);
    let mut x = buttons_area.x + buttons_area.width.saturating_sub(total_width) / 2;

    app.language_areas.clear();
    for (i, (locale, label)) in locales.iter().zip(labels).enumerate() {
        let highlighted = picker_focused && i == app.picker_selected;
        let bg = match locale {
            Locale::English => Color::Blue,
            Locale::Hindi => Color::Green,
        };
        let mut style = Style::default().bg(bg).fg(Color::White);
        if highlighted {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }

        let label_width = display_width(&label) as u16;
        let button_area = Rect::new(x, buttons_area.y, label_width, 1).intersection(buttons_area);
        frame.render_widget(Paragraph::new(Span::styled(label, style)), button_area);
        app.language_areas.push((*locale, button_area));

        x = x.saturating_add(label_width + gap);
    }
}

fn render_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let input_focused = app.focus == FocusPane::Input;
    let border_color = if input_focused { Color::Yellow } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Message (Enter to send, Esc to quit) ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let send_width = display_width(SEND_GLYPH) as u16;
    let [text_area, send_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(send_width),
    ])
    .areas(inner);
    app.send_area = Some(send_area);

    // Horizontal scrolling: the offset is in chars, the cursor column in cells
    let inner_width = text_area.width as usize;
    let chars: Vec<char> = app.chat.input().chars().collect();
    let cursor_pos = app.chat.cursor().min(chars.len());
    let mut cursor_x: usize = chars[..cursor_pos].iter().copied().map(char_width).sum();
    let mut scroll_offset = 0;
    while inner_width > 0 && cursor_x >= inner_width && scroll_offset < cursor_pos {
        cursor_x = cursor_x.saturating_sub(char_width(chars[scroll_offset]));
        scroll_offset += 1;
    }

    let text = if app.chat.input().is_empty() {
        Paragraph::new(Span::styled(
            app.chat.placeholder(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let visible_text: String = chars[scroll_offset..].iter().collect();
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };
    frame.render_widget(text, text_area);

    let send = Paragraph::new(SEND_GLYPH).style(Style::default().bg(INDIGO_LIGHT).fg(Color::White));
    frame.render_widget(send, send_area);

    if input_focused {
        frame.set_cursor_position((text_area.x + cursor_x as u16, text_area.y));
    }
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(FOOTER)
        .alignment(Alignment::Center)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .italic();
    frame.render_widget(footer, area);
}
