use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tracing::{debug, info};

use folio_core::config::Config;
use folio_core::content::{SectionId, GREETING, SUGGESTED_QUESTIONS};
use folio_core::gallery::Gallery;
use folio_core::pixel::PixelArt;
use folio_core::trigger::{self, TriggerReceiver, TriggerSender};
use folio_core::{ChatController, Conversation, DanceStage, StreamEvent, SubmitOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Navigation,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Portrait {
    Loading,
    Ready(PixelArt),
    /// Download or decode failed; the monogram stands in
    Placeholder,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line text field with a character cursor
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Take the contents and reset the field
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,
    pub config: Config,

    // Section navigation
    pub section_state: ListState,
    pub content_scroll: u16,
    pub content_height: u16,
    pub total_content_lines: u16,

    // Hero ask prompt
    pub hero_input: TextInput,

    // Chat panel; the controller is created on first open
    pub chat_open: bool,
    pub chat: Option<ChatController>,
    pub chat_input: TextInput,
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // "Ask the assistant" requests from outside the panel
    pub trigger_tx: TriggerSender,
    trigger_rx: TriggerReceiver,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Media
    pub portrait: Portrait,
    pub album: Option<Gallery>,
    pub photo_state: ListState,
    pub lightbox: Option<usize>,

    // Portrait dance video; the loop spawns the job when requested
    pub dance: Option<DanceStage>,
    dance_requested: bool,

    // Panel areas for mouse hit-testing (updated during render)
    pub nav_area: Option<Rect>,
    pub content_area: Option<Rect>,
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let (trigger_tx, trigger_rx) = trigger::channel();

        let mut section_state = ListState::default();
        section_state.select(Some(0));

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: FocusPane::Navigation,
            config,

            section_state,
            content_scroll: 0,
            content_height: 0,
            total_content_lines: 0,

            hero_input: TextInput::default(),

            chat_open: false,
            chat: None,
            chat_input: TextInput::default(),
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            trigger_tx,
            trigger_rx,

            animation_frame: 0,

            portrait: Portrait::Loading,
            album: None,
            photo_state: ListState::default(),
            lightbox: None,

            dance: None,
            dance_requested: false,

            nav_area: None,
            content_area: None,
            chat_area: None,
        }
    }

    pub fn selected_section(&self) -> SectionId {
        let sections = SectionId::all();
        self.section_state
            .selected()
            .and_then(|i| sections.get(i).copied())
            .unwrap_or(SectionId::Hero)
    }

    fn select_section(&mut self, idx: usize) {
        let last = SectionId::all().len() - 1;
        self.section_state.select(Some(idx.min(last)));
        self.content_scroll = 0;
        self.lightbox = None;
    }

    pub fn nav_down(&mut self) {
        let i = self.section_state.selected().unwrap_or(0);
        self.select_section(i + 1);
    }

    pub fn nav_up(&mut self) {
        let i = self.section_state.selected().unwrap_or(0);
        self.select_section(i.saturating_sub(1));
    }

    pub fn nav_first(&mut self) {
        self.select_section(0);
    }

    pub fn nav_last(&mut self) {
        self.select_section(SectionId::all().len() - 1);
    }

    // Content scroll methods
    pub fn scroll_down(&mut self) {
        let max_scroll = self.total_content_lines.saturating_sub(self.content_height);
        self.content_scroll = (self.content_scroll + 1).min(max_scroll);
    }

    pub fn scroll_up(&mut self) {
        self.content_scroll = self.content_scroll.saturating_sub(1);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half = (self.content_height / 2).max(1);
        let max_scroll = self.total_content_lines.saturating_sub(self.content_height);
        self.content_scroll = (self.content_scroll + half).min(max_scroll);
    }

    pub fn scroll_half_page_up(&mut self) {
        let half = (self.content_height / 2).max(1);
        self.content_scroll = self.content_scroll.saturating_sub(half);
    }

    pub fn is_busy(&self) -> bool {
        self.chat.as_ref().map(|c| c.is_busy()).unwrap_or(false)
    }

    /// Provider label for the header, before and after the chat exists
    pub fn provider_label(&self) -> &'static str {
        match &self.chat {
            Some(chat) => chat.conversation().provider_name(),
            None if self.config.api_key().is_some() => "Gemini",
            None => "Offline",
        }
    }

    pub fn model_label(&self) -> &str {
        match &self.chat {
            Some(chat) => chat.conversation().model(),
            None => self.config.model(),
        }
    }

    pub fn open_chat(&mut self) {
        if self.chat.is_none() {
            let conversation = Conversation::from_config(&self.config);
            self.chat = Some(ChatController::new(conversation).with_greeting(GREETING));
        }
        self.chat_open = true;
        self.scroll_chat_to_bottom();
    }

    /// Closing the panel abandons any reply still streaming
    pub fn close_chat(&mut self) {
        if let Some(chat) = self.chat.as_mut() {
            chat.cancel();
        }
        self.chat_open = false;
    }

    pub fn toggle_chat(&mut self) {
        if self.chat_open {
            self.close_chat();
        } else {
            self.open_chat();
        }
    }

    pub fn submit_chat(&mut self) {
        let Some(chat) = self.chat.as_mut() else {
            return;
        };
        if chat.submit(&self.chat_input.value) == SubmitOutcome::Accepted {
            self.chat_input.take();
            self.scroll_chat_to_bottom();
        }
    }

    pub fn ask_from_hero(&mut self) {
        let question = self.hero_input.value.trim().to_string();
        if question.is_empty() {
            return;
        }
        self.hero_input.take();
        self.input_mode = InputMode::Normal;
        self.trigger_tx.fire(question);
    }

    pub fn ask_suggestion(&mut self, idx: usize) {
        if let Some(question) = SUGGESTED_QUESTIONS.get(idx) {
            self.trigger_tx.fire(*question);
        }
    }

    /// Submit a pending trigger once no reply is streaming
    pub fn consume_trigger(&mut self) {
        if self.is_busy() {
            return;
        }
        let Some(message) = self.trigger_rx.take() else {
            return;
        };

        info!(chars = message.len(), "trigger consumed");
        self.open_chat();
        if let Some(chat) = self.chat.as_mut() {
            chat.submit(&message);
        }
        self.scroll_chat_to_bottom();
    }

    /// Next event of the in-flight reply; resolves to `None` at once when idle
    pub async fn next_reply_event(&mut self) -> Option<StreamEvent> {
        match self.chat.as_mut() {
            Some(chat) => chat.next_event().await,
            None => None,
        }
    }

    pub fn apply_reply(&mut self, event: StreamEvent) {
        if let Some(chat) = self.chat.as_mut() {
            let status = chat.apply(event);
            debug!(?status, "reply event applied");
        }
        self.scroll_chat_to_bottom();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        let dancing = self.dance.as_ref().is_some_and(|stage| !stage.is_done());
        if self.is_busy() || dancing {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Scroll chat so the newest text (or "Thinking...") is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let Some(chat) = self.chat.as_ref() else {
            return;
        };

        // Use actual chat width for wrap calculation, default to 40 if not set
        let wrap_width = if self.chat_width > 0 { self.chat_width as usize } else { 40 };

        let mut total_lines: u16 = 0;
        for msg in chat.messages() {
            total_lines += 1; // Role line
            if msg.pending && msg.text.is_empty() {
                total_lines += 1; // "Thinking..."
            }
            for line in msg.text.lines() {
                let char_count = line.chars().count();
                total_lines += (char_count / wrap_width + 1) as u16;
            }
            total_lines += 1; // Blank line after message
        }

        let visible_height = if self.chat_height > 0 { self.chat_height } else { 20 };
        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }

    // Photography
    pub fn photo_count(&self) -> usize {
        self.album.as_ref().map(|a| a.len()).unwrap_or(0)
    }

    pub fn photo_nav_down(&mut self) {
        let len = self.photo_count();
        if len > 0 {
            let i = self.photo_state.selected().unwrap_or(0);
            self.photo_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn photo_nav_up(&mut self) {
        let i = self.photo_state.selected().unwrap_or(0);
        self.photo_state.select(Some(i.saturating_sub(1)));
    }

    pub fn open_lightbox(&mut self) {
        if self.photo_count() > 0 {
            self.lightbox = Some(self.photo_state.selected().unwrap_or(0));
        }
    }

    pub fn lightbox_next(&mut self) {
        if let (Some(i), Some(album)) = (self.lightbox, self.album.as_ref()) {
            let next = album.next_index(i);
            self.lightbox = Some(next);
            self.photo_state.select(Some(next));
        }
    }

    pub fn lightbox_prev(&mut self) {
        if let (Some(i), Some(album)) = (self.lightbox, self.album.as_ref()) {
            let prev = album.prev_index(i);
            self.lightbox = Some(prev);
            self.photo_state.select(Some(prev));
        }
    }

    pub fn set_portrait(&mut self, art: Option<PixelArt>) {
        self.portrait = match art {
            Some(art) => Portrait::Ready(art),
            None => Portrait::Placeholder,
        };
    }

    pub fn set_album(&mut self, album: Gallery) {
        if !album.is_empty() {
            self.photo_state.select(Some(0));
        }
        self.album = Some(album);
    }

    /// Ask for a dance video. Ignored while one is running or once one is
    /// saved; a failed attempt may be retried.
    pub fn request_dance(&mut self) {
        match &self.dance {
            Some(DanceStage::Failed(_)) | None => {
                self.dance = Some(DanceStage::Preparing);
                self.dance_requested = true;
            }
            Some(_) => debug!("dance already running or saved"),
        }
    }

    /// True once per request; the caller starts the job
    pub fn take_dance_request(&mut self) -> bool {
        std::mem::take(&mut self.dance_requested)
    }

    pub fn set_dance_stage(&mut self, stage: DanceStage) {
        if stage.is_done() {
            info!(status = %stage.status_text(), "dance finished");
        }
        self.dance = Some(stage);
    }

    /// Stop any in-flight reply before exit
    pub fn shutdown(&mut self) {
        if let Some(chat) = self.chat.as_mut() {
            chat.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::error::UNCONFIGURED_REPLY;

    /// App whose chat has no credential, independent of the environment
    fn offline_app() -> App {
        let mut app = App::new(Config::new());
        app.chat = Some(ChatController::new(Conversation::new(None)).with_greeting(GREETING));
        app
    }

    async fn drain(app: &mut App) {
        while let Some(event) = app.next_reply_event().await {
            app.apply_reply(event);
        }
    }

    #[test]
    fn test_section_navigation_clamps() {
        let mut app = App::new(Config::new());
        assert_eq!(app.selected_section(), SectionId::Hero);
        app.nav_up();
        assert_eq!(app.selected_section(), SectionId::Hero);
        app.nav_down();
        assert_eq!(app.selected_section(), SectionId::Experience);
        app.nav_last();
        assert_eq!(app.selected_section(), SectionId::Contact);
        app.nav_down();
        assert_eq!(app.selected_section(), SectionId::Contact);
        app.nav_first();
        assert_eq!(app.selected_section(), SectionId::Hero);
    }

    #[test]
    fn test_text_input_utf8() {
        let mut input = TextInput::default();
        for c in "héllo".chars() {
            input.insert(c);
        }
        input.left();
        input.left();
        input.backspace();
        assert_eq!(input.value, "hélo");
        input.home();
        input.delete();
        assert_eq!(input.value, "élo");
        assert_eq!(input.take(), "élo");
        assert_eq!(input.cursor, 0);
    }

    #[tokio::test]
    async fn test_trigger_opens_panel_and_submits() {
        let mut app = offline_app();
        assert!(!app.chat_open);

        app.ask_suggestion(0);
        app.consume_trigger();
        assert!(app.chat_open);
        drain(&mut app).await;

        let messages = app.chat.as_ref().unwrap().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].text, SUGGESTED_QUESTIONS[0]);
        assert_eq!(messages[2].text, UNCONFIGURED_REPLY);
    }

    #[tokio::test]
    async fn test_hero_prompt_fires_trimmed_question() {
        let mut app = offline_app();
        for c in "  Where did Ryan study?  ".chars() {
            app.hero_input.insert(c);
        }
        app.ask_from_hero();
        assert!(app.hero_input.value.is_empty());

        app.consume_trigger();
        let messages = app.chat.as_ref().unwrap().messages();
        assert_eq!(messages[1].text, "Where did Ryan study?");
    }

    #[tokio::test]
    async fn test_trigger_waits_for_idle_session() {
        let mut app = offline_app();
        app.open_chat();
        app.chat_input.value = "typed".to_string();
        app.submit_chat();
        assert!(app.is_busy());

        app.trigger_tx.fire("from hero");
        app.consume_trigger();
        assert_eq!(app.chat.as_ref().unwrap().messages().len(), 3);

        drain(&mut app).await;
        app.consume_trigger();
        let texts: Vec<String> = app
            .chat
            .as_ref()
            .unwrap()
            .messages()
            .iter()
            .map(|m| m.text.clone())
            .collect();
        assert_eq!(texts.len(), 5);
        assert_eq!(texts[3], "from hero");
    }

    #[tokio::test]
    async fn test_close_panel_cancels_reply() {
        let mut app = offline_app();
        app.open_chat();
        app.chat_input.value = "hi".to_string();
        app.submit_chat();
        assert!(app.chat_input.value.is_empty());
        assert!(app.is_busy());

        app.close_chat();
        assert!(!app.chat_open);
        assert!(!app.is_busy());
        let last = app.chat.as_ref().unwrap().messages().last().cloned().unwrap();
        assert!(!last.pending);
    }

    #[test]
    fn test_lightbox_wraps_through_album() {
        let mut app = App::new(Config::new());
        app.set_album(Gallery::fallback());
        app.photo_nav_up();
        app.open_lightbox();
        assert_eq!(app.lightbox, Some(0));
        app.lightbox_prev();
        assert_eq!(app.lightbox, Some(3));
        app.lightbox_next();
        assert_eq!(app.lightbox, Some(0));
    }

    #[test]
    fn test_portrait_failure_uses_placeholder() {
        let mut app = App::new(Config::new());
        assert_eq!(app.portrait, Portrait::Loading);
        app.set_portrait(None);
        assert_eq!(app.portrait, Portrait::Placeholder);
    }

    #[test]
    fn test_dance_request_is_single_flight() {
        let mut app = App::new(Config::new());
        app.request_dance();
        assert!(app.take_dance_request());
        assert!(!app.take_dance_request());

        // Running: further requests are ignored
        app.set_dance_stage(DanceStage::StillDancing);
        app.request_dance();
        assert!(!app.take_dance_request());
        assert_eq!(app.dance, Some(DanceStage::StillDancing));

        // A failure can be retried
        app.set_dance_stage(DanceStage::Failed("no luck".into()));
        app.request_dance();
        assert!(app.take_dance_request());
        assert_eq!(app.dance, Some(DanceStage::Preparing));

        // Saved: done for this visit
        app.set_dance_stage(DanceStage::Saved("/tmp/dance.mp4".into()));
        app.request_dance();
        assert!(!app.take_dance_request());
    }
}
