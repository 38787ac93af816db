//! Conversation state and the operations that change it
//!
//! `ChatWidget` is the only owner of the transcript, the draft input, the
//! locale and the language-picker flag. The lifecycle is
//! `no locale -> "hi" -> picker shown -> locale set -> ordinary turns`.

use crate::locale::{strings_for, Locale};
use crate::message::{Message, Transcript};
use crate::reply::ReplyScheduler;

const GREETING: &str = "hi";

/// What a call to [`ChatWidget::submit_message`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Blank draft, nothing happened
    Ignored,
    /// First "hi": the language picker is now showing
    Greeting,
    /// Ordinary turn: a bot reply is on its way
    Turn,
}

/// Whitespace plus the byte-order mark, which pasted text sometimes carries
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct ChatWidget {
    transcript: Transcript,
    input: String,
    cursor: usize,
    locale: Option<Locale>,
    show_language_picker: bool,
    replies: ReplyScheduler,
}

impl ChatWidget {
    pub fn new(replies: ReplyScheduler) -> Self {
        Self {
            transcript: Transcript::new(),
            input: String::new(),
            cursor: 0,
            locale: None,
            show_language_picker: false,
            replies,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Cursor position in characters
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn locale(&self) -> Option<Locale> {
        self.locale
    }

    pub fn show_language_picker(&self) -> bool {
        self.show_language_picker
    }

    pub fn placeholder(&self) -> &'static str {
        strings_for(self.locale).placeholder
    }

    pub fn replies_pending(&self) -> bool {
        self.replies.has_pending()
    }

    /// Send the current draft.
    ///
    /// The message is stored exactly as typed; only the emptiness and
    /// greeting checks look at the trimmed text.
    pub fn submit_message(&mut self) -> Submission {
        let trimmed = self.input.trim_matches(is_blank);
        if trimmed.is_empty() {
            return Submission::Ignored;
        }

        let is_greeting = self.locale.is_none() && trimmed.eq_ignore_ascii_case(GREETING);
        let text = std::mem::take(&mut self.input);
        self.cursor = 0;
        self.transcript.push(Message::user(text));

        if is_greeting {
            self.show_language_picker = true;
            tracing::info!(messages = self.transcript.len(), "greeting received, showing language picker");
            Submission::Greeting
        } else {
            // Language is fixed now; a picker choice made while the reply is
            // pending does not change it
            self.replies.schedule(strings_for(self.locale).reply);
            tracing::info!(
                messages = self.transcript.len(),
                locale = self.locale.map(|l| l.as_str()).unwrap_or("unset"),
                "user message submitted"
            );
            Submission::Turn
        }
    }

    /// Append a reply that was scheduled by an earlier turn
    pub fn deliver_reply(&mut self, text: &str) {
        self.replies.prune();
        self.transcript.push(Message::bot(text));
        tracing::debug!(messages = self.transcript.len(), "bot reply delivered");
    }

    pub fn select_language(&mut self, choice: Locale) {
        self.locale = Some(choice);
        self.show_language_picker = false;
        self.transcript.push(Message::bot(choice.strings().welcome));
        tracing::info!(locale = choice.as_str(), "language selected");
    }

    /// Drop every reply that has not fired yet
    pub fn cancel_replies(&mut self) {
        self.replies.cancel_all();
    }

    // Input buffer editing
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    #[cfg(test)]
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.cursor_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::DEFAULT_REPLY_DELAY;
    use crate::tui::AppEvent;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    const ENGLISH_REPLY: &str =
        "Thank you for your message. How many tickets would you like to purchase?";
    const HINDI_REPLY: &str = "आपके संदेश के लिए धन्यवाद। आप कितने टिकट खरीदना चाहेंगे?";
    const ENGLISH_WELCOME: &str =
        "Welcome to our Museum! How can I assist you with ticket purchases today?";
    const HINDI_WELCOME: &str =
        "हमारे संग्रहालय में आपका स्वागत है! मैं आपकी टिकट खरीद में कैसे सहायता कर सकता हूँ?";

    fn widget() -> (ChatWidget, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChatWidget::new(ReplyScheduler::new(tx, DEFAULT_REPLY_DELAY)), rx)
    }

    fn submit(chat: &mut ChatWidget, text: &str) -> Submission {
        chat.set_input(text);
        chat.submit_message()
    }

    /// Wait for the next reply event and apply it
    async fn await_reply(chat: &mut ChatWidget, rx: &mut UnboundedReceiver<AppEvent>) {
        match rx.recv().await {
            Some(AppEvent::Reply(text)) => chat.deliver_reply(text),
            other => panic!("expected reply event, got {:?}", other),
        }
    }

    fn texts(chat: &ChatWidget) -> Vec<String> {
        chat.transcript().iter().map(|m| m.text().to_string()).collect()
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn blank_input_is_ignored() {
        let (mut chat, mut rx) = widget();

        for draft in ["", "   ", "\t\n "] {
            assert_eq!(submit(&mut chat, draft), Submission::Ignored);
            assert_eq!(chat.input(), draft);
        }
        assert!(chat.transcript().is_empty());
        assert!(!chat.replies_pending());

        tokio::time::advance(DEFAULT_REPLY_DELAY * 2).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn byte_order_mark_counts_as_blank() {
        let (mut chat, _rx) = widget();

        assert_eq!(submit(&mut chat, "\u{feff}"), Submission::Ignored);
        assert_eq!(submit(&mut chat, " \u{feff} \t"), Submission::Ignored);
        assert!(chat.transcript().is_empty());

        assert_eq!(submit(&mut chat, "\u{feff}hi\u{feff} "), Submission::Greeting);
        assert_eq!(texts(&chat), vec!["\u{feff}hi\u{feff} "]);
        assert!(chat.show_language_picker());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn greeting_shows_picker_without_reply() {
        let (mut chat, mut rx) = widget();

        assert_eq!(submit(&mut chat, " HI "), Submission::Greeting);

        assert_eq!(texts(&chat), vec![" HI "]);
        assert!(!chat.transcript().last().unwrap().is_bot());
        assert!(chat.show_language_picker());
        assert!(chat.input().is_empty());
        assert_eq!(chat.cursor(), 0);
        assert!(!chat.replies_pending());

        tokio::time::advance(DEFAULT_REPLY_DELAY * 2).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(chat.transcript().len(), 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn non_greeting_before_locale_gets_english_reply() {
        let (mut chat, mut rx) = widget();

        assert_eq!(submit(&mut chat, "hello"), Submission::Turn);
        assert!(!chat.show_language_picker());
        assert_eq!(texts(&chat), vec!["hello"]);

        await_reply(&mut chat, &mut rx).await;
        assert_eq!(texts(&chat), vec!["hello", ENGLISH_REPLY]);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn selecting_english() {
        let (mut chat, _rx) = widget();
        submit(&mut chat, "hi");

        chat.select_language(Locale::English);

        assert!(!chat.show_language_picker());
        assert_eq!(chat.locale(), Some(Locale::English));
        assert_eq!(texts(&chat), vec!["hi", ENGLISH_WELCOME]);
        assert!(chat.transcript().last().unwrap().is_bot());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn selecting_hindi() {
        let (mut chat, _rx) = widget();
        submit(&mut chat, "Hi");

        chat.select_language(Locale::Hindi);

        assert!(!chat.show_language_picker());
        assert_eq!(chat.locale(), Some(Locale::Hindi));
        assert_eq!(texts(&chat), vec!["Hi", HINDI_WELCOME]);
        assert_eq!(chat.placeholder(), "यहां अपना संदेश लिखें...");
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn english_turn_replies_after_delay() {
        let (mut chat, mut rx) = widget();
        submit(&mut chat, "hi");
        chat.select_language(Locale::English);

        assert_eq!(submit(&mut chat, "2 adult tickets"), Submission::Turn);
        assert_eq!(chat.transcript().len(), 3);
        assert_eq!(chat.transcript().last().unwrap().text(), "2 adult tickets");
        assert!(chat.replies_pending());

        tokio::task::yield_now().await;
        tokio::time::advance(DEFAULT_REPLY_DELAY / 2).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());

        await_reply(&mut chat, &mut rx).await;
        assert_eq!(chat.transcript().len(), 4);
        let reply = chat.transcript().last().unwrap();
        assert!(reply.is_bot());
        assert_eq!(reply.text(), ENGLISH_REPLY);

        tokio::time::advance(DEFAULT_REPLY_DELAY * 2).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn hindi_turn_replies_in_hindi() {
        let (mut chat, mut rx) = widget();
        submit(&mut chat, "hi");
        chat.select_language(Locale::Hindi);

        submit(&mut chat, "2 adult tickets");
        await_reply(&mut chat, &mut rx).await;

        assert_eq!(chat.transcript().last().unwrap().text(), HINDI_REPLY);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn hi_after_locale_is_an_ordinary_turn() {
        let (mut chat, mut rx) = widget();
        submit(&mut chat, "hi");
        chat.select_language(Locale::English);

        assert_eq!(submit(&mut chat, "hi"), Submission::Turn);
        assert!(!chat.show_language_picker());

        await_reply(&mut chat, &mut rx).await;
        assert_eq!(texts(&chat), vec!["hi", ENGLISH_WELCOME, "hi", ENGLISH_REPLY]);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn reply_keeps_language_of_its_turn() {
        let (mut chat, mut rx) = widget();

        submit(&mut chat, "hello");
        submit(&mut chat, "hi");
        assert!(chat.show_language_picker());
        chat.select_language(Locale::Hindi);

        await_reply(&mut chat, &mut rx).await;
        assert_eq!(texts(&chat), vec!["hello", "hi", HINDI_WELCOME, ENGLISH_REPLY]);

        submit(&mut chat, "दो टिकट");
        await_reply(&mut chat, &mut rx).await;
        assert_eq!(chat.transcript().last().unwrap().text(), HINDI_REPLY);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn overlapping_turns_each_get_a_reply() {
        let (mut chat, mut rx) = widget();
        submit(&mut chat, "hi");
        chat.select_language(Locale::English);

        submit(&mut chat, "one");
        submit(&mut chat, "two");
        await_reply(&mut chat, &mut rx).await;
        await_reply(&mut chat, &mut rx).await;

        assert_eq!(
            texts(&chat),
            vec!["hi", ENGLISH_WELCOME, "one", "two", ENGLISH_REPLY, ENGLISH_REPLY]
        );
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn transcript_is_append_only() {
        let (mut chat, mut rx) = widget();
        let mut snapshots: Vec<Vec<String>> = vec![texts(&chat)];

        submit(&mut chat, "   ");
        snapshots.push(texts(&chat));
        submit(&mut chat, "hI");
        snapshots.push(texts(&chat));
        chat.select_language(Locale::Hindi);
        snapshots.push(texts(&chat));
        submit(&mut chat, "टिकट");
        snapshots.push(texts(&chat));
        await_reply(&mut chat, &mut rx).await;
        snapshots.push(texts(&chat));

        for pair in snapshots.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            assert!(after.len() >= before.len());
            assert_eq!(&after[..before.len()], &before[..]);
        }
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn cancelled_replies_are_not_delivered() {
        let (mut chat, mut rx) = widget();
        submit(&mut chat, "hello");
        chat.cancel_replies();

        tokio::time::advance(DEFAULT_REPLY_DELAY * 2).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(chat.transcript().len(), 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn editing_is_utf8_safe() {
        let (mut chat, _rx) = widget();
        for c in "नमस्ते".chars() {
            chat.insert_char(c);
        }
        let len = "नमस्ते".chars().count();
        assert_eq!(chat.cursor(), len);

        chat.cursor_home();
        chat.delete();
        chat.cursor_end();
        chat.backspace();
        assert_eq!(chat.input().chars().count(), len - 2);

        chat.cursor_home();
        chat.cursor_right();
        chat.insert_char('x');
        chat.cursor_left();
        chat.cursor_left();
        chat.cursor_left();
        assert_eq!(chat.cursor(), 0);
        assert_eq!(chat.input().chars().nth(1), Some('x'));
    }
}
