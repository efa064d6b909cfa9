// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use colors::*;
pub use helpers::{centered_rect, marked_ratio, photo_count, truncate_middle};
pub use input::{handle_confirm_input, handle_key_event, handle_trash_input, KeyAction};

use crate::async_preview::{PreviewManager, PreviewState};
use crate::domain::{PermissionStatus, PhotoAsset, SwipeSession, TrashReview};
use crate::preview::PreviewContent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub const EMPTY_LIBRARY_TEXT: &str = "No photos found in your library.";

/// UI view state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Welcome screen shown on first launch
    Welcome,
    /// Main swipe view
    Swiping,
    /// Help overlay visible
    Help,
    /// Photos waiting for deletion
    Trash,
    /// Confirmation dialog before deleting the selection
    ConfirmDelete,
    /// Library access was refused
    PermissionDenied,
    /// "Would you like to rate PicPurge?"
    ReviewPrompt,
    /// A newer release is published
    UpdateAvailable,
}

/// Renders the swipe screen: header with trash size, the photo, key hints
pub fn render_swipe(
    frame: &mut Frame,
    session: &SwipeSession,
    preview_manager: &mut PreviewManager,
    status: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header with progress
            Constraint::Min(0),    // Photo
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], session, status);
    match session.current() {
        Some(asset) => render_photo(frame, chunks[1], asset, preview_manager),
        None => frame.render_widget(render_empty_state_widget(session.permission()), chunks[1]),
    }
    render_swipe_footer(frame, chunks[2]);

    if session.current().is_some()
        && matches!(preview_manager.current_state(), PreviewState::Loading)
    {
        if let Some(asset) = session.current() {
            render_loading_overlay(frame, asset);
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, session: &SwipeSession, status: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(2)])
        .split(area);

    let info = match (status, session.current()) {
        (Some(message), _) => vec![Span::styled(
            message.to_string(),
            Style::default().fg(ACCENT_HIGHLIGHT),
        )],
        (None, Some(asset)) => vec![
            Span::styled(
                truncate_middle(&asset.filename, 48),
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("({})", asset.creation_time.format("%Y-%m-%d")),
                Style::default().fg(TEXT_SECONDARY),
            ),
        ],
        (None, None) => vec![Span::styled(
            "Nothing to review",
            Style::default().fg(TEXT_SECONDARY),
        )],
    };

    let title_line = Line::from(vec![
        Span::styled(
            " PicPurge ",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" Trash: {} ", photo_count(session.queue_count())),
            Style::default().fg(ACCENT_PRIMARY),
        ),
    ]);

    let header = Paragraph::new(vec![title_line, Line::from(info)])
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Left);
    frame.render_widget(header, chunks[0]);

    let stats = session.statistics();
    let ratio = marked_ratio(stats.marked, stats.shown);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_PRIMARY).bg(BG_DARK))
        .ratio(ratio)
        .label(format!(
            "{} marked of {} shown",
            stats.marked, stats.shown
        ));
    frame.render_widget(gauge, chunks[1]);
}

fn render_photo(
    frame: &mut Frame,
    area: Rect,
    asset: &PhotoAsset,
    preview_manager: &mut PreviewManager,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(format!(" {} ", truncate_middle(&asset.filename, 40)));

    match preview_manager.request_preview(asset) {
        PreviewState::Loading => frame.render_widget(block, area),
        PreviewState::Ready(content) => {
            let lines: Vec<Line> = match content {
                PreviewContent::Text(text_lines) => {
                    text_lines.iter().map(|s| Line::from(s.clone())).collect()
                }
                PreviewContent::Styled(styled_lines) => styled_lines.clone(),
            };
            let paragraph = Paragraph::new(lines)
                .block(block)
                .style(Style::default().fg(TEXT_PRIMARY));
            frame.render_widget(paragraph, area);
        }
        PreviewState::Error(e) => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  [!] Could not display this photo",
                    Style::default()
                        .fg(ACCENT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("  {}", e)),
                Line::from(""),
                Line::from(format!("  {}", asset.uri)),
            ];
            let paragraph = Paragraph::new(lines)
                .block(block.border_style(Style::default().fg(ACCENT_PRIMARY)))
                .style(Style::default().fg(TEXT_PRIMARY))
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
        }
    }
}

/// Placeholder shown when there is no photo on screen
fn render_empty_state_widget(permission: PermissionStatus) -> Paragraph<'static> {
    let (title, detail) = match permission {
        PermissionStatus::Granted => (
            EMPTY_LIBRARY_TEXT,
            "Every photo has been shown. Press t to review the trash.",
        ),
        PermissionStatus::Denied => (
            "No access to your photos",
            "PicPurge cannot read this folder.",
        ),
        PermissionStatus::Pending => ("Loading your library…", ""),
    };

    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(detail, Style::default().fg(TEXT_SECONDARY))),
    ];

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center)
}

fn render_swipe_footer(frame: &mut Frame, area: Rect) {
    let controls = Line::from(vec![
        Span::styled(
            " ← ",
            Style::default()
                .fg(ACCENT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("Keep", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled(
            "→ ",
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("Delete", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("u ", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::styled("Undo", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("t ", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::styled("Trash", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("? ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Help", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Quit", Style::default().fg(TEXT_SECONDARY)),
    ]);

    frame.render_widget(footer(controls), area);
}

fn footer(controls: Line<'static>) -> Paragraph<'static> {
    Paragraph::new(controls)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center)
}

/// Renders the trash view: every queued photo with its selection mark
pub fn render_trash(frame: &mut Frame, review: &TrashReview, status: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let summary = match status {
        Some(message) => message.to_string(),
        None => format!(
            "{} in trash, {} selected",
            photo_count(review.entries().len()),
            review.selected_count()
        ),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Trash ",
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(summary, Style::default().fg(TEXT_SECONDARY)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );
    frame.render_widget(header, chunks[0]);

    if review.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "The trash is empty",
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Swipe right on a photo to put it here.",
                Style::default().fg(TEXT_SECONDARY),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);
        frame.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = review
            .entries()
            .iter()
            .map(|entry| {
                let (mark, style) = if review.is_selected(&entry.id) {
                    ("[x] ", Style::default().fg(ACCENT_PRIMARY))
                } else {
                    ("[ ] ", Style::default().fg(TEXT_PRIMARY))
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, style),
                    Span::styled(entry.uri.clone(), style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(BORDER_COLOR)),
            )
            .highlight_style(
                Style::default()
                    .bg(BORDER_COLOR)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut state = ListState::default();
        state.select(Some(review.cursor()));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    let select_label = if review.all_selected() {
        "Deselect all"
    } else {
        "Select all"
    };
    let controls = Line::from(vec![
        Span::styled(" ↑↓ ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Move", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("Space ", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::styled("Select", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("a ", Style::default().fg(ACCENT_HIGHLIGHT)),
        Span::styled(select_label, Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled(
            "x ",
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("Delete", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("r ", Style::default().fg(ACCENT_SECONDARY)),
        Span::styled("Restore", Style::default().fg(TEXT_SECONDARY)),
        Span::raw("  │  "),
        Span::styled("Esc ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled("Back", Style::default().fg(TEXT_SECONDARY)),
    ]);
    frame.render_widget(footer(controls), chunks[2]);
}

fn dialog_block(title: &'static str, accent: ratatui::style::Color) -> Block<'static> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(BG_DARK))
}

fn yes_no_line(yes: &'static str, no: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled("[Y] ", Style::default().fg(ACCENT_SECONDARY)),
        Span::raw(yes),
        Span::raw("     "),
        Span::styled("[N] ", Style::default().fg(ACCENT_PRIMARY)),
        Span::raw(no),
    ])
}

fn render_dialog(
    frame: &mut Frame,
    percent_x: u16,
    percent_y: u16,
    block: Block<'static>,
    lines: Vec<Line<'static>>,
) {
    let area = centered_rect(percent_x, percent_y, frame.area());
    frame.render_widget(Clear, area);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

/// Asks before the selected photos are deleted
pub fn render_confirm_delete_overlay(frame: &mut Frame, count: usize, dry_run: bool) {
    let consequence = if dry_run {
        "Dry run: nothing will actually be removed."
    } else {
        "They will be moved to your system trash."
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Delete {}?", photo_count(count)),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(consequence, Style::default().fg(TEXT_SECONDARY))),
        Line::from(""),
        yes_no_line("Delete", "Cancel"),
    ];
    render_dialog(frame, 50, 40, dialog_block(" ⚠ Confirm Delete ", ACCENT_PRIMARY), lines);
}

/// Explains that the folder cannot be read
pub fn render_permission_denied(frame: &mut Frame, directory: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "PicPurge needs access to your photos",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Could not read {}", directory),
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("r ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::raw("Try again     "),
            Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Quit"),
        ]),
    ];
    render_dialog(frame, 60, 40, dialog_block(" No Access ", ACCENT_PRIMARY), lines);
}

pub fn render_review_prompt(frame: &mut Frame) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Would you like to rate PicPurge?",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        yes_no_line("Rate now", "Later"),
    ];
    render_dialog(frame, 50, 30, dialog_block(" Enjoying PicPurge? ", ACCENT_HIGHLIGHT), lines);
}

pub fn render_update_overlay(frame: &mut Frame, store_url: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "A new version of PicPurge is available.",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            store_url.to_string(),
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        yes_no_line("Update now", "Later"),
    ];
    render_dialog(frame, 60, 35, dialog_block(" Update Available ", ACCENT_HIGHLIGHT), lines);
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let key = |k: &'static str, color| Span::styled(k, Style::default().fg(color));
    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let lines = vec![
        Line::from(""),
        heading("Swiping"),
        Line::from(vec![key("  → / d   ", ACCENT_PRIMARY), Span::raw("Mark for deletion")]),
        Line::from(vec![key("  ← / s   ", ACCENT_SECONDARY), Span::raw("Keep")]),
        Line::from(vec![key("  u       ", ACCENT_HIGHLIGHT), Span::raw("Undo last mark")]),
        Line::from(vec![key("  t       ", ACCENT_HIGHLIGHT), Span::raw("Open trash")]),
        Line::from(""),
        heading("Trash"),
        Line::from(vec![key("  ↑↓ / jk ", TEXT_SECONDARY), Span::raw("Move")]),
        Line::from(vec![key("  Space   ", ACCENT_HIGHLIGHT), Span::raw("Select")]),
        Line::from(vec![key("  a       ", ACCENT_HIGHLIGHT), Span::raw("Select all")]),
        Line::from(vec![key("  x / Del ", ACCENT_PRIMARY), Span::raw("Delete selected")]),
        Line::from(vec![key("  r       ", ACCENT_SECONDARY), Span::raw("Restore selected")]),
        Line::from(""),
        Line::from(vec![key("  q       ", TEXT_SECONDARY), Span::raw("Quit")]),
        Line::from(vec![key("  ?       ", TEXT_SECONDARY), Span::raw("Toggle help")]),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let area = centered_rect(50, 80, frame.area());
    frame.render_widget(Clear, area);
    let block = dialog_block(" Help ", ACCENT_HIGHLIGHT);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(TEXT_PRIMARY)),
        inner,
    );
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame) {
    let area = centered_rect(80, 70, frame.area());
    frame.render_widget(Clear, area);

    let bold = |color| Style::default().fg(color).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Welcome to PicPurge!", bold(ACCENT_HIGHLIGHT))),
        Line::from(""),
        Line::from("PicPurge shows your photos one at a time in random order."),
        Line::from("Decide quickly what stays and what goes."),
        Line::from(""),
        Line::from(vec![
            Span::styled("  → ", bold(ACCENT_PRIMARY)),
            Span::raw("puts a photo in the trash, "),
            Span::styled("← ", bold(ACCENT_SECONDARY)),
            Span::raw("keeps it."),
        ]),
        Line::from(vec![
            Span::styled("  t ", bold(ACCENT_HIGHLIGHT)),
            Span::raw("opens the trash, where you confirm what is really deleted."),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Nothing is deleted until you confirm in the trash"),
        ]),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("The trash survives restarts"),
        ]),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Run with "),
            Span::styled("--dry-run", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to try it without removing anything"),
        ]),
        Line::from(""),
        Line::from(Span::styled("Press any key to start...", bold(ACCENT_HIGHLIGHT))),
    ];

    let welcome = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(" Welcome ", bold(ACCENT_HIGHLIGHT)))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
                .style(Style::default().bg(BG_DARK)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    frame.render_widget(welcome, area);
}

/// Spinner shown while a photo is decoded
pub fn render_loading_overlay(frame: &mut Frame, asset: &PhotoAsset) {
    let spinners = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let spinner = spinners[(now / 100) as usize % spinners.len()];

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{} ", spinner), Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::raw("Loading photo"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            truncate_middle(&asset.filename, 30),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    render_dialog(frame, 40, 30, dialog_block(" Loading ", ACCENT_HIGHLIGHT), lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetSampler, DeleteQueue, QueueEntry, SamplerOptions};
    use crate::library::MemoryLibrary;
    use crate::storage::MemoryStore;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    async fn session_with(photos: usize) -> SwipeSession {
        let library = Arc::new(MemoryLibrary::with_photos(photos));
        let sampler = AssetSampler::with_options(
            library.clone(),
            SamplerOptions {
                seed: Some(1),
                ..SamplerOptions::default()
            },
        );
        let queue = Arc::new(DeleteQueue::new(Arc::new(MemoryStore::new())));
        let mut session = SwipeSession::new(sampler, queue);
        session.request_permission(library.as_ref()).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_render_empty_library() {
        let session = session_with(0).await;
        let mut preview = PreviewManager::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();

        terminal
            .draw(|frame| render_swipe(frame, &session, &mut preview, None))
            .unwrap();

        assert!(buffer_text(&terminal).contains(EMPTY_LIBRARY_TEXT));
    }

    #[tokio::test]
    async fn test_render_swipe_with_photo() {
        let session = session_with(3).await;
        let mut preview = PreviewManager::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal
            .draw(|frame| render_swipe(frame, &session, &mut preview, None))
            .unwrap();
        preview.settle().await;
        terminal
            .draw(|frame| render_swipe(frame, &session, &mut preview, None))
            .unwrap();

        let text = buffer_text(&terminal);
        let current = session.current().unwrap();
        assert!(text.contains(&current.filename));
        assert!(text.contains("(2024-01-01)"));
        assert!(text.contains("Trash: 0 photos"));
        assert!(text.contains("Keep"));
        assert!(text.contains("Quit"));
    }

    #[tokio::test]
    async fn test_render_status_message() {
        let session = session_with(1).await;
        let mut preview = PreviewManager::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();

        terminal
            .draw(|frame| render_swipe(frame, &session, &mut preview, Some("Storage is full")))
            .unwrap();

        assert!(buffer_text(&terminal).contains("Storage is full"));
    }

    #[tokio::test]
    async fn test_render_trash_list() {
        let queue = Arc::new(DeleteQueue::new(Arc::new(MemoryStore::new())));
        queue.add(QueueEntry::new("a", "file:///pics/a.jpg")).await.unwrap();
        queue.add(QueueEntry::new("b", "file:///pics/b.jpg")).await.unwrap();
        let mut review = TrashReview::new(Arc::new(MemoryLibrary::with_photos(0)), queue);
        review.refresh().await.unwrap();
        review.toggle("b");

        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|frame| render_trash(frame, &review, None))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("2 photos in trash, 1 selected"));
        assert!(text.contains("[x] file:///pics/b.jpg"));
        assert!(text.contains("[ ] file:///pics/a.jpg"));
    }

    #[tokio::test]
    async fn test_render_empty_trash() {
        let queue = Arc::new(DeleteQueue::new(Arc::new(MemoryStore::new())));
        let review = TrashReview::new(Arc::new(MemoryLibrary::with_photos(0)), queue);

        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|frame| render_trash(frame, &review, None))
            .unwrap();

        assert!(buffer_text(&terminal).contains("The trash is empty"));
    }

    #[test]
    fn test_render_overlays() {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();

        terminal.draw(render_help_overlay).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Help"));
        assert!(text.contains("Mark for deletion"));

        terminal
            .draw(|frame| render_confirm_delete_overlay(frame, 3, false))
            .unwrap();
        assert!(buffer_text(&terminal).contains("Delete 3 photos?"));

        terminal.draw(render_review_prompt).unwrap();
        assert!(buffer_text(&terminal).contains("Would you like to rate PicPurge?"));

        terminal
            .draw(|frame| render_update_overlay(frame, "https://example.invalid/app"))
            .unwrap();
        assert!(buffer_text(&terminal).contains("Update now"));

        terminal.draw(render_welcome_overlay).unwrap();
        assert!(buffer_text(&terminal).contains("Welcome to PicPurge!"));
    }
}
