use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use folio_core::content::{
    PressKind, SectionId, CONTACT_BLURB, EDUCATION, EXPERIENCE, PRESS, PROFILE, PROJECTS,
    SKILLS, SKILLS_SUMMARY, SKILL_METRICS, SUGGESTED_QUESTIONS,
};
use folio_core::dance::DanceStage;
use folio_core::gallery::GallerySource;
use folio_core::pixel::PixelArt;
use folio_core::state::ChatRole;

use crate::app::{App, FocusPane, InputMode, Portrait, TextInput};

const ACCENT: Color = Color::Rgb(255, 90, 60);

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            chars.next();

            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;
            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(bold_text, Style::default().add_modifier(Modifier::BOLD)));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

/// Rows a set of lines occupies once wrapped to `width` columns
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    lines
        .iter()
        .map(|line| (line.width() / width + 1) as u16)
        .fold(0u16, |acc, n| acc.saturating_add(n))
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let page_area = if app.chat_open {
        let [page_area, chat_area] = Layout::horizontal([
            Constraint::Percentage(55),
            Constraint::Percentage(45),
        ])
        .areas(body_area);
        render_chat(app, frame, chat_area);
        page_area
    } else {
        app.chat_area = None;
        body_area
    };

    let [nav_area, content_area] = Layout::horizontal([
        Constraint::Length(18),
        Constraint::Min(0),
    ])
    .areas(page_area);

    // Store areas for mouse hit-testing
    app.nav_area = Some(nav_area);
    app.content_area = Some(content_area);

    render_navigation(app, frame, nav_area);
    render_content(app, frame, content_area);

    render_footer(app, frame, footer_area);

    if app.lightbox.is_some() {
        render_lightbox(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let key_indicator = match app.config.key_source() {
        Some(source) => format!(" [key: {}]", source),
        None => " [no key]".to_string(),
    };

    let title = Line::from(vec![
        Span::styled(format!(" {} ", PROFILE.name), Style::default().fg(ACCENT).bold()),
        Span::styled(PROFILE.headline, Style::default().fg(Color::White)),
        Span::raw("  "),
        Span::styled(
            format!("{}: {}", app.provider_label(), app.model_label()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(key_indicator, Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = if app.lightbox.is_some() {
        (" PHOTO ", Style::default().bg(Color::Magenta).fg(Color::White))
    } else if app.chat_open {
        (" CHAT ", Style::default().bg(ACCENT).fg(Color::White))
    } else if app.input_mode == InputMode::Editing {
        (" ASK ", Style::default().bg(Color::Yellow).fg(Color::Black))
    } else {
        (" BROWSE ", Style::default().bg(Color::Blue).fg(Color::White))
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let hint = |key: &'static str, label: &'static str| {
        [Span::styled(key, key_style), Span::styled(label, label_style)]
    };

    let pairs: Vec<[Span; 2]> = if app.lightbox.is_some() {
        vec![hint(" ←/→ ", " photo "), hint(" Esc ", " close ")]
    } else if app.chat_open {
        vec![
            hint(" Enter ", " send "),
            hint(" ↑/↓ ", " scroll "),
            hint(" Esc ", " close "),
        ]
    } else if app.input_mode == InputMode::Editing {
        vec![hint(" Enter ", " ask "), hint(" Esc ", " cancel ")]
    } else {
        let mut pairs = vec![hint(" j/k ", " nav "), hint(" Tab ", " focus ")];
        match app.selected_section() {
            SectionId::Hero => {
                pairs.push(hint(" i ", " ask "));
                pairs.push(hint(" 1-4 ", " suggested "));
                pairs.push(hint(" v ", " dance "));
            }
            SectionId::Photography if app.focus == FocusPane::Content => {
                pairs.push(hint(" Enter ", " view "));
            }
            _ => {}
        }
        pairs.push(hint(" c ", " chat "));
        pairs.push(hint(" q ", " quit "));
        pairs
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    spans.extend(pairs.into_iter().flatten());

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_navigation(app: &mut App, frame: &mut Frame, area: Rect) {
    let nav_focused = app.focus == FocusPane::Navigation && !app.chat_open;
    let border_color = if nav_focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", PROFILE.monogram));

    let items: Vec<ListItem> = SectionId::all()
        .iter()
        .map(|s| ListItem::new(format!(" {} ", s.title())))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.section_state);
}

fn content_block(app: &App, title: &str) -> Block<'static> {
    let focused = app.focus == FocusPane::Content && !app.chat_open;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", title))
}

fn render_content(app: &mut App, frame: &mut Frame, area: Rect) {
    let section = app.selected_section();
    match section {
        SectionId::Hero => render_hero(app, frame, area),
        SectionId::Photography => render_photos(app, frame, area),
        _ => {
            let block = content_block(app, section.title());
            let inner = block.inner(area);
            let lines = section_lines(section);

            app.content_height = inner.height;
            app.total_content_lines = wrapped_height(&lines, inner.width);

            let paragraph = Paragraph::new(Text::from(lines))
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((app.content_scroll, 0));
            frame.render_widget(paragraph, area);
        }
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))
}

fn dim(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(Color::DarkGray))
}

fn bullet(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled("  • ", Style::default().fg(ACCENT)), Span::raw(text.to_string())])
}

/// Static text for the plain sections
fn section_lines(section: SectionId) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    match section {
        SectionId::Experience => {
            for item in EXPERIENCE {
                lines.push(heading(item.company));
                lines.push(Line::from(vec![
                    Span::styled(item.role.to_string(), Style::default().bold()),
                    Span::raw("  "),
                    dim(item.period),
                ]));
                lines.extend(item.description.iter().map(|d| bullet(d)));
                lines.push(Line::default());
            }
        }
        SectionId::Education => {
            for item in EDUCATION {
                lines.push(heading(item.school));
                lines.push(Line::from(vec![
                    Span::styled(item.degree.to_string(), Style::default().bold()),
                    Span::raw("  "),
                    dim(item.period),
                ]));
                lines.extend(item.description.iter().map(|d| bullet(d)));
                lines.push(Line::default());
            }
        }
        SectionId::Projects => {
            for project in PROJECTS {
                lines.push(Line::from(vec![
                    Span::styled(project.title.to_string(), Style::default().fg(ACCENT).bold()),
                    Span::raw("  "),
                    dim(project.role),
                ]));
                lines.push(Line::from(project.description.to_string()));
                lines.push(Line::from(Span::styled(
                    project.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" "),
                    Style::default().fg(Color::Cyan),
                )));
                lines.push(Line::default());
            }
        }
        SectionId::Press => {
            for item in PRESS {
                let kind = match item.kind {
                    PressKind::Award => "AWARD",
                    PressKind::Talk => "TALK",
                    PressKind::Interview => "INTERVIEW",
                    PressKind::Video => "VIDEO",
                    PressKind::Book => "BOOK",
                    PressKind::Article => "ARTICLE",
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("[{}] ", kind), Style::default().fg(Color::Magenta)),
                    Span::styled(item.title.to_string(), Style::default().bold()),
                    Span::raw(" · "),
                    dim(item.source),
                ]));
                lines.push(Line::from(item.description.to_string()));
                lines.push(Line::from(Span::styled(
                    item.link.to_string(),
                    Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                )));
                lines.push(Line::default());
            }
        }
        SectionId::Skills => {
            lines.push(Line::from(SKILLS_SUMMARY.to_string()));
            lines.push(Line::default());
            lines.extend(SKILLS.iter().map(|s| bullet(s)));
            lines.push(Line::default());
            lines.push(heading("Proficiency"));
            for metric in SKILL_METRICS {
                lines.push(skill_bar(metric.subject, metric.score, metric.full_mark, 30));
            }
        }
        SectionId::Contact => {
            lines.push(Line::from(CONTACT_BLURB.to_string()));
            lines.push(Line::default());
            lines.push(Line::from(vec![dim("Email   "), Span::raw(PROFILE.email.to_string())]));
            lines.push(Line::from(vec![dim("Where   "), Span::raw(PROFILE.location.to_string())]));
            lines.push(Line::from(vec![dim("Resume  "), Span::raw(PROFILE.resume_url.to_string())]));
        }
        SectionId::Hero | SectionId::Photography => {}
    }

    lines
}

fn skill_bar(subject: &str, score: u8, full_mark: u8, width: usize) -> Line<'static> {
    let filled = if full_mark == 0 {
        0
    } else {
        (score as usize * width / full_mark as usize).min(width)
    };
    Line::from(vec![
        Span::raw(format!("{:<12}", subject)),
        Span::styled("█".repeat(filled), Style::default().fg(ACCENT)),
        Span::styled("░".repeat(width - filled), Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {:>3}", score)),
    ])
}

/// Two pixel rows per text row: upper half block in the top colour over the bottom colour
fn portrait_lines(art: &PixelArt) -> Vec<Line<'static>> {
    art.half_block_rows()
        .into_iter()
        .map(|row| {
            let spans: Vec<Span<'static>> = row
                .into_iter()
                .map(|(top, bottom)| {
                    let mut style = Style::default().fg(Color::Rgb(top[0], top[1], top[2]));
                    if let Some(b) = bottom {
                        style = style.bg(Color::Rgb(b[0], b[1], b[2]));
                    }
                    Span::styled("▀", style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn render_hero(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = content_block(app, SectionId::Hero.title());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [top_area, input_area, suggestions_area, dance_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(SUGGESTED_QUESTIONS.len() as u16),
        Constraint::Length(1),
    ])
    .areas(inner);

    let portrait_width = match &app.portrait {
        Portrait::Ready(art) => art.width() as u16,
        _ => 12,
    };
    let [portrait_area, text_area] = Layout::horizontal([
        Constraint::Length(portrait_width + 1),
        Constraint::Min(0),
    ])
    .areas(top_area);

    let portrait = match &app.portrait {
        Portrait::Ready(art) => Paragraph::new(Text::from(portrait_lines(art))),
        Portrait::Loading => Paragraph::new(dim("loading...")),
        Portrait::Placeholder => Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                format!("    {}    ", PROFILE.monogram),
                Style::default().bg(ACCENT).fg(Color::White).bold(),
            )),
        ]),
    };
    frame.render_widget(portrait, portrait_area);

    let text = vec![
        Line::from(Span::styled(PROFILE.kicker, Style::default().fg(ACCENT).bold())),
        Line::default(),
        Line::from(Span::styled(PROFILE.name, Style::default().bold())),
        Line::from(Span::styled(PROFILE.headline, Style::default().fg(Color::Cyan))),
        Line::default(),
        Line::from(PROFILE.intro),
        Line::default(),
        Line::from(dim(PROFILE.location)),
    ];
    app.content_height = text_area.height;
    app.total_content_lines = wrapped_height(&text, text_area.width);
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .scroll((app.content_scroll, 0)),
        text_area,
    );

    let editing = app.input_mode == InputMode::Editing && !app.chat_open;
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::DarkGray }))
        .title(" Ask the assistant (i) ");
    render_text_input(frame, &app.hero_input, input_block, input_area, editing);

    let suggestions: Vec<Line> = SUGGESTED_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| {
            Line::from(vec![
                Span::styled(format!(" {} ", i + 1), Style::default().bg(Color::DarkGray).fg(Color::White)),
                Span::raw(format!(" {}", q)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(suggestions), suggestions_area);
    frame.render_widget(Paragraph::new(dance_line(app.dance.as_ref(), app.animation_frame)), dance_area);
}

fn dance_line(stage: Option<&DanceStage>, frame_no: u8) -> Line<'static> {
    let Some(stage) = stage else {
        return Line::from(vec![
            Span::styled(" v ", Style::default().bg(Color::DarkGray).fg(Color::White)),
            dim(" make the portrait dance"),
        ]);
    };
    let style = match stage {
        DanceStage::Saved(_) => Style::default().fg(Color::Green),
        DanceStage::Failed(_) => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Yellow),
    };
    let marker = if stage.is_done() {
        "♪ ".to_string()
    } else {
        ["♪  ", " ♪ ", "  ♪"][frame_no as usize % 3].to_string()
    };
    Line::from(vec![
        Span::styled(marker, style),
        Span::styled(format!(" {}", stage.status_text()), style),
    ])
}

/// Single-line input with horizontal scrolling to keep the cursor visible
fn render_text_input(frame: &mut Frame, input: &TextInput, block: Block, area: Rect, show_cursor: bool) {
    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = input.cursor;

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = input
        .value
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let paragraph = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(block);
    frame.render_widget(paragraph, area);

    if show_cursor {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_photos(app: &mut App, frame: &mut Frame, area: Rect) {
    let title = match app.album.as_ref().map(|a| a.source) {
        Some(GallerySource::Flickr) => "Photography · Flickr",
        Some(GallerySource::Fallback) => "Photography · highlights",
        None => "Photography",
    };
    let block = content_block(app, title);

    let Some(album) = app.album.as_ref() else {
        let placeholder = Paragraph::new("Loading album...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let items: Vec<ListItem> = album
        .photos
        .iter()
        .map(|p| {
            let mut spans = vec![Span::raw(format!(" {} ", p.title))];
            if !p.date_taken.is_empty() {
                let date: String = p.date_taken.chars().take(10).collect();
                spans.push(dim(&date));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Magenta)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.photo_state);
}

fn render_lightbox(app: &App, frame: &mut Frame, area: Rect) {
    let (Some(idx), Some(album)) = (app.lightbox, app.album.as_ref()) else {
        return;
    };
    let Some(photo) = album.photos.get(idx) else {
        return;
    };

    let popup = centered_rect(area, 70, 9);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(format!(" {} / {} ", idx + 1, album.len()));

    let text = vec![
        Line::from(Span::styled(photo.title.clone(), Style::default().bold())),
        Line::from(dim(&photo.date_taken)),
        Line::default(),
        Line::from(vec![dim("Image  "), Span::raw(photo.high_res_url())]),
        Line::from(vec![dim("Page   "), Span::raw(photo.link.clone())]),
    ];

    frame.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: true }), popup);
}

fn centered_rect(area: Rect, width_pct: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(width_pct)])
        .flex(Flex::Center)
        .areas(row);
    popup
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    app.chat_area = Some(area);

    // Inner size minus borders, for scroll calculations
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(format!(" Assistant · {} ", app.model_label()));

    let mut lines: Vec<Line> = Vec::new();
    if let Some(chat) = app.chat.as_ref() {
        for msg in chat.messages() {
            let (label, color) = match msg.role {
                ChatRole::User => ("You:", Color::Cyan),
                ChatRole::Assistant => ("Assistant:", Color::Yellow),
            };
            lines.push(Line::from(Span::styled(
                label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));

            if msg.pending && msg.text.is_empty() {
                // Animated ellipsis: cycles through ".", "..", "..."
                let dots = ".".repeat((app.animation_frame as usize) + 1);
                lines.push(Line::from(Span::styled(
                    format!("Thinking{}", dots),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
            }
            for line in msg.text.lines() {
                lines.push(parse_markdown_line(line));
            }
            lines.push(Line::default());
        }
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    let busy = app.is_busy();
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if busy { Color::DarkGray } else { Color::Yellow }))
        .title(if busy { " Waiting for reply... " } else { " Message " });
    render_text_input(frame, &app.chat_input, input_block, input_area, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn span_texts(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_markdown_bold() {
        let line = parse_markdown_line("Ryan led **Slack AI** launches");
        assert_eq!(span_texts(&line), ["Ryan led ", "Slack AI", " launches"]);
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_markdown_unclosed_is_literal() {
        let line = parse_markdown_line("a **b");
        assert_eq!(span_texts(&line).concat(), "a **b");
    }

    #[test]
    fn test_markdown_single_star_literal() {
        let line = parse_markdown_line("5 * 3");
        assert_eq!(span_texts(&line).concat(), "5 * 3");
        assert_eq!(parse_markdown_line("").spans.len(), 0);
    }

    #[test]
    fn test_dance_line_states() {
        let idle = span_texts(&dance_line(None, 0)).concat();
        assert!(idle.contains("make the portrait dance"));

        let running = dance_line(Some(&DanceStage::StillDancing), 1);
        assert_eq!(running.spans[0].content, " ♪ ");
        assert_eq!(running.spans[1].style.fg, Some(Color::Yellow));

        let failed = dance_line(Some(&DanceStage::Failed("no key".into())), 2);
        assert_eq!(failed.spans[1].content, " no key");
        assert_eq!(failed.spans[1].style.fg, Some(Color::Red));
    }

    #[test]
    fn test_skill_bar_width() {
        let line = skill_bar("Strategy", 90, 100, 30);
        assert_eq!(line.spans[1].content.chars().count(), 27);
        assert_eq!(line.spans[2].content.chars().count(), 3);
    }

    #[test]
    fn test_portrait_lines_pair_rows() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([200, 10, 10, 255]));
        let art = folio_core::pixel::pixelate(&img, 4).unwrap();
        let lines = portrait_lines(&art);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 4);
        assert_eq!(lines[0].spans[0].style.bg, Some(Color::Rgb(200, 10, 10)));
    }
}
