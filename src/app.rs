//! Screen state and key handling for the terminal app.
//!
//! `main` owns the terminal and the event loop; everything that decides what
//! a key press does lives here so it can run against a test backend.

use crate::async_preview::PreviewManager;
use crate::config::UserConfig;
use crate::domain::{PermissionStatus, SwipeSession, TrashReview};
use crate::error::Result;
use crate::library::PermissionGate;
use crate::review::{ReviewService, StorePagePrompt};
use crate::tui::{
    handle_confirm_input, handle_key_event, handle_trash_input, render_confirm_delete_overlay,
    render_help_overlay, render_permission_denied, render_review_prompt, render_swipe,
    render_trash, render_update_overlay, render_welcome_overlay, KeyAction, ViewState,
};
use crossterm::event::KeyEvent;
use ratatui::Frame;
use std::path::PathBuf;
use std::sync::Arc;

pub struct App {
    session: SwipeSession,
    review: TrashReview,
    gate: Arc<dyn PermissionGate>,
    reviews: ReviewService,
    preview: PreviewManager,
    view: ViewState,
    /// View to return to when the help overlay closes
    underlying: ViewState,
    status: Option<String>,
    directory_label: String,
    dry_run: bool,
    store_url: String,
    update_pending: bool,
    user_config: UserConfig,
    /// `None` keeps preferences in memory only
    config_path: Option<PathBuf>,
}

/// Everything the app needs from `main`
pub struct AppParts {
    pub session: SwipeSession,
    pub review: TrashReview,
    pub gate: Arc<dyn PermissionGate>,
    pub reviews: ReviewService,
    pub directory_label: String,
    pub dry_run: bool,
    pub store_url: String,
    pub update_available: bool,
    pub show_welcome: bool,
    pub user_config: UserConfig,
    pub config_path: Option<PathBuf>,
}

impl App {
    pub fn new(parts: AppParts) -> Self {
        let view = if parts.show_welcome {
            ViewState::Welcome
        } else {
            ViewState::Swiping
        };

        Self {
            session: parts.session,
            review: parts.review,
            gate: parts.gate,
            reviews: parts.reviews,
            preview: PreviewManager::new(),
            view,
            underlying: ViewState::Swiping,
            status: None,
            directory_label: parts.directory_label,
            dry_run: parts.dry_run,
            store_url: parts.store_url,
            update_pending: parts.update_available,
            user_config: parts.user_config,
            config_path: parts.config_path,
        }
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn session(&self) -> &SwipeSession {
        &self.session
    }

    pub fn review(&self) -> &TrashReview {
        &self.review
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn user_config(&self) -> &UserConfig {
        &self.user_config
    }

    /// Requests library access and shows the first photo
    pub async fn start(&mut self) {
        let result = self.request_access().await;
        self.report(result);
        if self.view == ViewState::Swiping {
            self.show_pending_update();
        }
    }

    async fn request_access(&mut self) -> Result<()> {
        let status = self.session.request_permission(self.gate.as_ref()).await;
        self.session.refresh_queue_count().await?;
        if status? == PermissionStatus::Denied {
            self.view = ViewState::PermissionDenied;
        }
        Ok(())
    }

    /// Lets the render loop pick up finished photo decodes
    pub fn tick(&mut self) -> bool {
        self.preview.poll()
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let status = self.status.clone();
        let status = status.as_deref();

        match (self.view, self.underlying) {
            (ViewState::Trash | ViewState::ConfirmDelete | ViewState::ReviewPrompt, _)
            | (ViewState::Help, ViewState::Trash) => render_trash(frame, &self.review, status),
            _ => render_swipe(frame, &self.session, &mut self.preview, status),
        }

        match self.view {
            ViewState::Welcome => render_welcome_overlay(frame),
            ViewState::Help => render_help_overlay(frame),
            ViewState::ConfirmDelete => {
                render_confirm_delete_overlay(frame, self.review.selected_count(), self.dry_run)
            }
            ViewState::PermissionDenied => render_permission_denied(frame, &self.directory_label),
            ViewState::ReviewPrompt => render_review_prompt(frame),
            ViewState::UpdateAvailable => render_update_overlay(frame, &self.store_url),
            ViewState::Swiping | ViewState::Trash => {}
        }
    }

    /// Handles one key press. Returns true when the app should exit.
    pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.view {
            ViewState::Welcome => {
                self.dismiss_welcome();
                false
            }
            ViewState::Help => {
                if matches!(
                    handle_key_event(key),
                    KeyAction::Help | KeyAction::Quit | KeyAction::None
                ) {
                    self.view = self.underlying;
                }
                false
            }
            ViewState::Swiping => self.handle_swipe_key(key).await,
            ViewState::Trash => self.handle_trash_key(key).await,
            ViewState::ConfirmDelete => {
                match handle_confirm_input(key) {
                    KeyAction::Confirm => {
                        self.view = ViewState::Trash;
                        let result = self.confirm_delete().await;
                        self.report(result);
                    }
                    KeyAction::Cancel => self.view = ViewState::Trash,
                    _ => {}
                }
                false
            }
            ViewState::PermissionDenied => match handle_trash_input(key) {
                KeyAction::Quit => true,
                KeyAction::Restore => {
                    self.view = ViewState::Swiping;
                    self.start().await;
                    false
                }
                _ => false,
            },
            ViewState::ReviewPrompt => {
                let accepted = match handle_confirm_input(key) {
                    KeyAction::Confirm => true,
                    KeyAction::Cancel => false,
                    _ => return false,
                };
                self.view = ViewState::Trash;
                let prompt = StorePagePrompt::answered(self.store_url.clone(), accepted);
                let result = self.reviews.maybe_request_review(&prompt).await.map(|_| ());
                self.report(result);
                false
            }
            ViewState::UpdateAvailable => {
                match handle_confirm_input(key) {
                    KeyAction::Confirm => {
                        self.view = ViewState::Swiping;
                        if let Err(e) = open::that(&self.store_url) {
                            self.report(Err(e.into()));
                        }
                    }
                    KeyAction::Cancel => self.view = ViewState::Swiping,
                    _ => {}
                }
                false
            }
        }
    }

    async fn handle_swipe_key(&mut self, key: KeyEvent) -> bool {
        let result = match handle_key_event(key) {
            KeyAction::Quit => return true,
            KeyAction::Skip => self.session.swipe_left().await,
            KeyAction::Mark => self.session.swipe_right().await,
            KeyAction::Undo => self.session.undo_last_mark().await.map(|_| ()),
            KeyAction::OpenTrash => {
                self.view = ViewState::Trash;
                self.review.refresh().await
            }
            KeyAction::Help => {
                self.underlying = ViewState::Swiping;
                self.view = ViewState::Help;
                Ok(())
            }
            _ => return false,
        };
        self.status = None;
        self.report(result);
        false
    }

    async fn handle_trash_key(&mut self, key: KeyEvent) -> bool {
        let result = match handle_trash_input(key) {
            KeyAction::Quit => return true,
            KeyAction::Back => {
                self.view = ViewState::Swiping;
                self.session.refresh_queue_count().await.map(|_| ())
            }
            KeyAction::Next => {
                self.review.next();
                Ok(())
            }
            KeyAction::Previous => {
                self.review.previous();
                Ok(())
            }
            KeyAction::ToggleSelect => {
                self.review.toggle_current();
                Ok(())
            }
            KeyAction::SelectAll => {
                self.review.toggle_select_all();
                Ok(())
            }
            KeyAction::Delete => {
                if self.review.selected_count() > 0 {
                    self.view = ViewState::ConfirmDelete;
                }
                Ok(())
            }
            KeyAction::Restore => self.review.restore_selected().await.map(|count| {
                if count > 0 {
                    self.status = Some(format!("Restored {}", crate::tui::photo_count(count)));
                }
            }),
            KeyAction::Help => {
                self.underlying = ViewState::Trash;
                self.view = ViewState::Help;
                Ok(())
            }
            _ => return false,
        };
        self.report(result);
        false
    }

    async fn confirm_delete(&mut self) -> Result<()> {
        let deleted = self.review.confirm_delete().await?;
        if deleted == 0 {
            return Ok(());
        }
        self.status = Some(format!("Deleted {}", crate::tui::photo_count(deleted)));
        self.session.refresh_queue_count().await?;

        if self.reviews.should_prompt(!self.store_url.is_empty()).await? {
            self.view = ViewState::ReviewPrompt;
        }
        Ok(())
    }

    fn dismiss_welcome(&mut self) {
        self.view = if self.session.permission() == PermissionStatus::Denied {
            ViewState::PermissionDenied
        } else {
            ViewState::Swiping
        };

        self.user_config.welcome_shown = true;
        if let Some(path) = &self.config_path {
            if let Err(e) = self.user_config.save_to(path) {
                log::warn!("Failed to save user config: {}", e);
            }
        }
        if self.view == ViewState::Swiping {
            self.show_pending_update();
        }
    }

    fn show_pending_update(&mut self) {
        if self.update_pending {
            self.update_pending = false;
            self.view = ViewState::UpdateAvailable;
        }
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            log::error!("{}", e);
            self.status = Some(e.to_string());
        }
    }
}
