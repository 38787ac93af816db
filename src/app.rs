use ratatui::{layout::Rect, text::Span};
use crate::chat::{ChatWidget, Submission};
use crate::locale::Locale;
use crate::reply::ReplyScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Input,
    LanguagePicker,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: FocusPane,
    pub chat: ChatWidget,

    // Language picker highlight (index into Locale::all())
    pub picker_selected: usize,

    // Transcript view
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of transcript area for scroll calculations
    pub chat_width: u16,  // Width of transcript area for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for the typing ellipsis

    // Areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub language_areas: Vec<(Locale, Rect)>,
    pub send_area: Option<Rect>,
}

impl App {
    pub fn new(replies: ReplyScheduler) -> Self {
        Self {
            should_quit: false,
            focus: FocusPane::Input,
            chat: ChatWidget::new(replies),
            picker_selected: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            chat_area: None,
            language_areas: Vec::new(),
            send_area: None,
        }
    }

    pub fn submit(&mut self) {
        match self.chat.submit_message() {
            Submission::Ignored => return,
            Submission::Greeting => {
                self.picker_selected = 0;
                self.focus = FocusPane::LanguagePicker;
            }
            Submission::Turn => {}
        }
        self.scroll_chat_to_bottom();
    }

    pub fn reply_arrived(&mut self, text: &str) {
        self.chat.deliver_reply(text);
        self.scroll_chat_to_bottom();
    }

    pub fn select_language(&mut self, locale: Locale) {
        if !self.chat.show_language_picker() {
            return;
        }
        self.chat.select_language(locale);
        self.focus = FocusPane::Input;
        self.scroll_chat_to_bottom();
    }

    pub fn select_highlighted_language(&mut self) {
        if let Some(locale) = Locale::all().get(self.picker_selected).copied() {
            self.select_language(locale);
        }
    }

    pub fn picker_next(&mut self) {
        let len = Locale::all().len();
        self.picker_selected = (self.picker_selected + 1).min(len - 1);
    }

    pub fn picker_prev(&mut self) {
        self.picker_selected = self.picker_selected.saturating_sub(1);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Input if self.chat.show_language_picker() => FocusPane::LanguagePicker,
            _ => FocusPane::Input,
        };
    }

    pub fn quit(&mut self) {
        self.chat.cancel_replies();
        self.should_quit = true;
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.chat.replies_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        } else {
            self.animation_frame = 0;
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max_scroll = self.total_chat_lines().saturating_sub(self.visible_height());
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max_scroll);
    }

    pub fn page_size(&self) -> u16 {
        (self.visible_height() / 2).max(1)
    }

    /// Scroll the transcript so the newest message is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        self.chat_scroll = self.total_chat_lines().saturating_sub(self.visible_height());
    }

    fn visible_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        }
    }

    /// Rendered line count of the transcript, including the typing indicator
    /// Rendered line count of the transcript, including the typing indicator.
    /// Saturates at `u16::MAX`, the furthest a paragraph can scroll.
    pub fn total_chat_lines(&self) -> u16 {
        let width = self.chat_text_width();
        let mut total_lines: usize = 0;
        for msg in self.chat.transcript() {
            total_lines += wrap_text_to_width(msg.text(), width).len();
            total_lines += 1; // Blank line after message
        }

        if self.chat.replies_pending() {
            total_lines += 1;
        }
        u16::try_from(total_lines).unwrap_or(u16::MAX)
    }

    /// Text columns available inside a message bubble
    pub fn chat_text_width(&self) -> usize {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };
        // Bubbles take at most 4/5 of the pane, minus one column of padding per side
        (width * 4 / 5).saturating_sub(2).max(1)
    }
}

/// Terminal columns taken by `text`, as ratatui lays it out
pub fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// Terminal columns taken by a single character (0 for combining marks)
pub fn char_width(c: char) -> usize {
    let mut buf = [0u8; 4];
    display_width(c.encode_utf8(&mut buf))
}

/// Longest prefix of `word` that fits in `width` columns, never empty.
/// Returns the prefix, the remainder and the prefix width.
fn split_at_width(word: &str, width: usize) -> (&str, &str, usize) {
    let mut used = 0;
    let mut end = 0;
    for (i, c) in word.char_indices() {
        let w = char_width(c);
        if end > 0 && used + w > width {
            break;
        }
        used += w;
        end = i + c.len_utf8();
    }
    let (head, rest) = word.split_at(end);
    (head, rest, used)
}

/// Wrap text on word boundaries, measured in terminal columns; words wider
/// than `width` are split
pub fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current_line = String::new();
        let mut current_width = 0;

        for mut word in paragraph.split_whitespace() {
            let mut word_width: usize = word.chars().map(char_width).sum();

            // Hard-break words that can never fit
            while word_width > width && !word.is_empty() {
                if !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                    current_width = 0;
                }
                let (head, rest, head_width) = split_at_width(word, width);
                lines.push(head.to_string());
                word = rest;
                word_width = word_width.saturating_sub(head_width);
            }

            if word.is_empty() {
                continue;
            }
            if current_line.is_empty() {
                current_line.push_str(word);
                current_width = word_width;
            } else if current_width + 1 + word_width <= width {
                current_line.push(' ');
                current_line.push_str(word);
                current_width += 1 + word_width;
            } else {
                lines.push(std::mem::replace(&mut current_line, word.to_string()));
                current_width = word_width;
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
