use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use folio_core::content::SectionId;
use ratatui::layout::Rect;

use crate::app::{App, FocusPane, InputMode, TextInput};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => app.scroll_chat_to_bottom(),
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Portrait(art) => app.set_portrait(art),
        AppEvent::Album(album) => app.set_album(album),
        AppEvent::Dance(stage) => app.set_dance_stage(stage),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.lightbox.is_some() {
        handle_lightbox(app, key);
    } else if app.chat_open {
        handle_chat(app, key);
    } else {
        match app.input_mode {
            InputMode::Normal => handle_normal_mode(app, key),
            InputMode::Editing => handle_hero_editing(app, key),
        }
    }
}

/// Shared line-editing keys; returns false when the key was not consumed
fn edit_input(input: &mut TextInput, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        KeyCode::Char(c) => input.insert(c),
        _ => return false,
    }
    true
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    let section = app.selected_section();
    let in_content = app.focus == FocusPane::Content;

    match key.code {
        // Quit
        KeyCode::Char('q') => app.should_quit = true,

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => {
            if !in_content {
                app.nav_down();
            } else if section == SectionId::Photography {
                app.photo_nav_down();
            } else {
                app.scroll_down();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if !in_content {
                app.nav_up();
            } else if section == SectionId::Photography {
                app.photo_nav_up();
            } else {
                app.scroll_up();
            }
        }
        KeyCode::Char('g') => {
            if in_content {
                app.content_scroll = 0;
            } else {
                app.nav_first();
            }
        }
        KeyCode::Char('G') => {
            if in_content {
                app.content_scroll = app.total_content_lines.saturating_sub(app.content_height);
            } else {
                app.nav_last();
            }
        }

        // Enter/Select
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if !in_content {
                app.focus = FocusPane::Content;
            } else if section == SectionId::Photography {
                app.open_lightbox();
            }
        }

        // Back
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => {
            app.focus = FocusPane::Navigation;
        }

        KeyCode::Tab => {
            app.focus = match app.focus {
                FocusPane::Navigation => FocusPane::Content,
                FocusPane::Content => FocusPane::Navigation,
            };
        }

        // Half-page scroll
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_down();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_up();
        }

        // Chat panel
        KeyCode::Char('c') => app.toggle_chat(),

        // Hero ask prompt and suggested questions
        KeyCode::Char('i') if section == SectionId::Hero => {
            app.focus = FocusPane::Content;
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char(c @ '1'..='4') if section == SectionId::Hero => {
            let idx = c as usize - '1' as usize;
            app.ask_suggestion(idx);
        }
        KeyCode::Char('v') if section == SectionId::Hero => app.request_dance(),

        _ => {}
    }
}

fn handle_hero_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => app.ask_from_hero(),
        _ => {
            edit_input(&mut app.hero_input, key);
        }
    }
}

fn handle_chat(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_chat(),
        KeyCode::Enter => app.submit_chat(),
        KeyCode::Up => app.chat_scroll = app.chat_scroll.saturating_sub(1),
        KeyCode::Down => app.chat_scroll = app.chat_scroll.saturating_add(1),
        KeyCode::PageUp => {
            let page = app.chat_height.max(1);
            app.chat_scroll = app.chat_scroll.saturating_sub(page);
        }
        KeyCode::PageDown => {
            let page = app.chat_height.max(1);
            app.chat_scroll = app.chat_scroll.saturating_add(page);
        }
        _ => {
            edit_input(&mut app.chat_input, key);
        }
    }
}

fn handle_lightbox(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => app.lightbox = None,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('j') => app.lightbox_next(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('k') => app.lightbox_prev(),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    // Scroll whichever pane is under the pointer
    let in_chat = app.chat_open && app.chat_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_nav = app.nav_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_content = app.content_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_photos = app.selected_section() == SectionId::Photography;

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_chat {
                app.chat_scroll = app.chat_scroll.saturating_add(3);
            } else if in_content && in_photos {
                app.photo_nav_down();
            } else if in_content {
                app.scroll_down();
                app.scroll_down();
                app.scroll_down();
            } else if in_nav {
                app.nav_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if in_chat {
                app.chat_scroll = app.chat_scroll.saturating_sub(3);
            } else if in_content && in_photos {
                app.photo_nav_up();
            } else if in_content {
                app.scroll_up();
                app.scroll_up();
                app.scroll_up();
            } else if in_nav {
                app.nav_up();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use folio_core::config::Config;
    use folio_core::DanceStage;

    fn press(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_tab_switches_focus() {
        let mut app = App::new(Config::new());
        handle_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.focus, FocusPane::Content);
        handle_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.focus, FocusPane::Navigation);
    }

    #[test]
    fn test_hero_prompt_editing() {
        let mut app = App::new(Config::new());
        handle_event(&mut app, press(KeyCode::Char('i')));
        assert_eq!(app.input_mode, InputMode::Editing);

        for c in "hi!".chars() {
            handle_event(&mut app, press(KeyCode::Char(c)));
        }
        handle_event(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.hero_input.value, "hi");

        // 'q' while editing is text, not quit
        handle_event(&mut app, press(KeyCode::Char('q')));
        assert!(!app.should_quit);

        handle_event(&mut app, press(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_suggestion_keys_only_on_hero() {
        let mut app = App::new(Config::new());
        app.nav_down();
        handle_event(&mut app, press(KeyCode::Char('2')));
        assert!(app.chat.is_none());
        assert!(!app.chat_open);
    }

    #[test]
    fn test_dance_key_and_progress() {
        let mut app = App::new(Config::new());
        app.nav_down();
        handle_event(&mut app, press(KeyCode::Char('v')));
        assert!(app.dance.is_none());

        app.nav_first();
        handle_event(&mut app, press(KeyCode::Char('v')));
        assert!(app.take_dance_request());

        handle_event(&mut app, AppEvent::Dance(DanceStage::Downloading));
        assert_eq!(app.dance, Some(DanceStage::Downloading));
    }

    #[test]
    fn test_ctrl_c_quits_from_anywhere() {
        let mut app = App::new(Config::new());
        app.input_mode = InputMode::Editing;
        let mut key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        key.kind = KeyEventKind::Press;
        handle_event(&mut app, AppEvent::Key(key));
        assert!(app.should_quit);
    }
}
