use std::mem;
use std::path::PathBuf;

use crossterm::event::KeyCode;
use directories::BaseDirs;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap,
};
use ratatui::Frame;
use tracing::warn;

use crate::audio::AudioPlayer;
use crate::config::AppConfig;
use crate::db::KeyValueStore;
use crate::error::PlaybackError;
use crate::models::{AppState, SoundBoard, SoundButton};
use crate::picker::{BrowserEntry, FileBrowser, PickOutcome};
use crate::repository::BoardRepository;

use super::forms::{BoardForm, ButtonField, ButtonForm, ConfirmBoardDelete, ConfirmButtonDelete};
use super::helpers::{build_button_card_lines, centered_rect, surface_error, tint};
use super::screens::{first_visible_row, row_count, GridCursor, GRID_COLUMNS};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the board selector strip.
const HEADER_HEIGHT: u16 = 3;
/// Height allocation per row of button cards.
const CARD_HEIGHT: u16 = 5;

/// Modal state layered over the single board screen.
enum Mode {
    Normal,
    AddingBoard(BoardForm),
    AddingButton(ButtonForm),
    PickingSound {
        form: ButtonForm,
        browser: FileBrowser,
    },
    ConfirmBoardDelete(ConfirmBoardDelete),
    ConfirmButtonDelete(ConfirmButtonDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Presentation state for the sound board screen. The repository is the only
/// owner of boards and buttons; everything here is view state.
pub struct App<S: KeyValueStore> {
    repo: BoardRepository<S>,
    player: Box<dyn AudioPlayer>,
    config: AppConfig,
    cursor: GridCursor,
    mode: Mode,
    status: Option<StatusMessage>,
    now_playing: Option<String>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(repo: BoardRepository<S>, player: Box<dyn AudioPlayer>, config: AppConfig) -> Self {
        Self {
            repo,
            player,
            config,
            cursor: GridCursor::default(),
            mode: Mode::Normal,
            status: None,
            now_playing: None,
        }
    }

    pub fn state(&self) -> &AppState {
        self.repo.current_state()
    }

    /// Called once per event-loop iteration so the header notices when a
    /// sound finishes on its own.
    pub fn on_tick(&mut self) {
        if self.now_playing.is_some() && !self.player.is_playing() {
            self.now_playing = None;
        }
    }

    /// Apply one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingBoard(form) => self.handle_add_board(code, form),
            Mode::AddingButton(form) => self.handle_add_button(code, form),
            Mode::PickingSound { form, browser } => self.handle_pick_sound(code, form, browser),
            Mode::ConfirmBoardDelete(confirm) => self.handle_confirm_board_delete(code, confirm),
            Mode::ConfirmButtonDelete(confirm) => {
                self.handle_confirm_button_delete(code, confirm)
            }
        };

        if exit {
            self.player.stop();
        }
        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Tab => self.select_relative_board(1),
            KeyCode::BackTab => self.select_relative_board(-1),
            KeyCode::Left => self.cursor.move_horizontal(-1, self.button_count()),
            KeyCode::Right => self.cursor.move_horizontal(1, self.button_count()),
            KeyCode::Up => self.cursor.move_vertical(-1, self.button_count()),
            KeyCode::Down => self.cursor.move_vertical(1, self.button_count()),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(button) = self.current_button().cloned() {
                    self.play(&button);
                } else {
                    self.set_status("No button selected.", StatusKind::Error);
                }
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.player.stop();
                self.now_playing = None;
                self.set_status("Playback stopped.", StatusKind::Info);
            }
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.clear_status();
                return Mode::AddingBoard(BoardForm::default());
            }
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                if self.current_board().is_some() {
                    self.clear_status();
                    return Mode::AddingButton(ButtonForm::default());
                }
                self.set_status("Add a board first (press 'b').", StatusKind::Error);
            }
            KeyCode::Char('-') => {
                let index = self.state().selected_board_index;
                if let Some(board) = self.current_board() {
                    let confirm = ConfirmBoardDelete {
                        index,
                        name: board.name.clone(),
                        button_count: board.buttons.len(),
                    };
                    self.clear_status();
                    return Mode::ConfirmBoardDelete(confirm);
                }
                self.set_status("No board selected to delete.", StatusKind::Error);
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                let board_index = self.state().selected_board_index;
                if let Some(button) = self.current_button() {
                    let confirm = ConfirmButtonDelete::new(board_index, button);
                    self.clear_status();
                    return Mode::ConfirmButtonDelete(confirm);
                }
                self.set_status("No button selected to delete.", StatusKind::Error);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_add_board(&mut self, code: KeyCode, mut form: BoardForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add board cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_name() {
                Ok(name) => {
                    self.repo.add_board(&name);
                    let last = self.state().boards.len().saturating_sub(1);
                    self.repo.set_selected_board_index(last);
                    self.cursor.reset();
                    self.set_status(format!("Added board \"{name}\"."), StatusKind::Info);
                    return Mode::Normal;
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingBoard(form)
    }

    fn handle_add_button(&mut self, code: KeyCode, mut form: ButtonForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add button cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left if form.active == ButtonField::Color => form.cycle_color(-1),
            KeyCode::Right if form.active == ButtonField::Color => form.cycle_color(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter if form.active == ButtonField::Sound => {
                return self.open_picker(form);
            }
            KeyCode::Enter => match form.parse_inputs() {
                Ok((title, sound, color)) => {
                    let board_index = self.state().selected_board_index;
                    self.repo
                        .add_colored_button(board_index, &title, sound, color);
                    let count = self.button_count();
                    self.cursor.selected = count.saturating_sub(1);
                    let added = self
                        .current_button()
                        .map(|button| button.title.clone())
                        .unwrap_or(title);
                    self.set_status(format!("Added \"{added}\"."), StatusKind::Info);
                    return Mode::Normal;
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingButton(form)
    }

    fn handle_pick_sound(
        &mut self,
        code: KeyCode,
        mut form: ButtonForm,
        mut browser: FileBrowser,
    ) -> Mode {
        match code {
            KeyCode::Esc => {
                form.apply_pick(PickOutcome::Cancelled);
                return Mode::AddingButton(form);
            }
            KeyCode::Up => browser.move_selection(-1),
            KeyCode::Down => browser.move_selection(1),
            KeyCode::PageUp => browser.move_selection(-10),
            KeyCode::PageDown => browser.move_selection(10),
            KeyCode::Home => browser.select_first(),
            KeyCode::End => browser.select_last(),
            KeyCode::Backspace | KeyCode::Left => {
                if let Err(err) = browser.go_up() {
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
            }
            KeyCode::Enter | KeyCode::Right => match browser.activate() {
                Ok(Some(outcome)) => {
                    form.apply_pick(outcome);
                    form.next_field();
                    self.clear_status();
                    return Mode::AddingButton(form);
                }
                Ok(None) => self.clear_status(),
                Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            },
            _ => {}
        }
        Mode::PickingSound { form, browser }
    }

    fn handle_confirm_board_delete(&mut self, code: KeyCode, confirm: ConfirmBoardDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.repo.delete_board(confirm.index);
                self.cursor.reset();
                self.set_status(
                    format!("Deleted board \"{}\".", confirm.name),
                    StatusKind::Info,
                );
                Mode::Normal
            }
            _ => Mode::ConfirmBoardDelete(confirm),
        }
    }

    fn handle_confirm_button_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmButtonDelete,
    ) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.repo
                    .delete_button(confirm.board_index, confirm.button_id);
                self.cursor.clamp(self.button_count());
                self.set_status(format!("Deleted \"{}\".", confirm.title), StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::ConfirmButtonDelete(confirm),
        }
    }

    fn play(&mut self, button: &SoundButton) {
        let result = match button.sound.locator() {
            Some(locator) => self.player.play(locator),
            None => Err(PlaybackError::Unplayable),
        };

        match result {
            Ok(()) => {
                self.now_playing = Some(button.title.clone());
                self.set_status(format!("Playing \"{}\".", button.title), StatusKind::Info);
            }
            Err(err) => {
                warn!(button = %button.id, error = %err, "playback failed");
                self.now_playing = None;
                self.set_status(format!("Cannot play: {err}"), StatusKind::Error);
            }
        }
    }

    fn open_picker(&mut self, form: ButtonForm) -> Mode {
        let start = self.picker_start_dir(&form);
        match FileBrowser::open(&start, &self.config.audio_extensions) {
            Ok(browser) => {
                self.clear_status();
                Mode::PickingSound { form, browser }
            }
            Err(err) => {
                self.set_status(surface_error(&err), StatusKind::Error);
                Mode::AddingButton(form)
            }
        }
    }

    /// Reopen where the last pick came from, else the configured sounds
    /// directory, else home.
    fn picker_start_dir(&self, form: &ButtonForm) -> PathBuf {
        let from_pick = form
            .sound
            .locator()
            .and_then(|locator| locator.as_path().parent().map(PathBuf::from))
            .filter(|dir| dir.is_dir());
        from_pick
            .or_else(|| self.config.sounds_dir.clone().filter(|dir| dir.is_dir()))
            .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn select_relative_board(&mut self, offset: isize) {
        let len = self.state().boards.len();
        if len == 0 {
            return;
        }
        let current = self.state().selected_board_index as isize;
        let target = (current + offset).rem_euclid(len as isize) as usize;
        self.repo.set_selected_board_index(target);
        self.cursor.reset();
    }

    fn current_board(&self) -> Option<&SoundBoard> {
        self.state().selected_board()
    }

    fn current_button(&self) -> Option<&SoundButton> {
        self.current_board()
            .and_then(|board| board.buttons.get(self.cursor.selected))
    }

    fn button_count(&self) -> usize {
        self.current_board()
            .map(|board| board.buttons.len())
            .unwrap_or(0)
    }

    fn set_status<T: Into<String>>(&mut self, text: T, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_board_tabs(frame, chunks[0]);
        self.draw_button_grid(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::AddingBoard(form) => self.draw_board_form(frame, area, form),
            Mode::AddingButton(form) => self.draw_button_form(frame, area, form),
            Mode::PickingSound { browser, .. } => self.draw_picker(frame, area, browser),
            Mode::ConfirmBoardDelete(confirm) => self.draw_confirm_board(frame, area, confirm),
            Mode::ConfirmButtonDelete(confirm) => self.draw_confirm_button(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_board_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut block = Block::default().borders(Borders::ALL).title("Boards");
        if let Some(title) = &self.now_playing {
            block = block.title(
                Line::from(Span::styled(
                    format!(" ♪ {title} "),
                    Style::default().fg(Color::Green),
                ))
                .right_aligned(),
            );
        }

        let state = self.state();
        if state.boards.is_empty() {
            let message = Paragraph::new(Span::styled(
                "No boards",
                Style::default().fg(Color::DarkGray),
            ))
            .block(block);
            frame.render_widget(message, area);
            return;
        }

        let titles: Vec<Line> = state
            .boards
            .iter()
            .map(|board| Line::from(format!("{} ({})", board.name, board.buttons.len())))
            .collect();
        let tabs = Tabs::new(titles)
            .block(block)
            .select(state.selected_board_index)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_button_grid(&self, frame: &mut Frame, area: Rect) {
        let Some(board) = self.current_board() else {
            let message = Paragraph::new("No boards yet. Press 'b' to add one.")
                .alignment(Alignment::Center);
            frame.render_widget(message, area);
            return;
        };

        if board.buttons.is_empty() {
            let message = Paragraph::new("No buttons on this board. Press '+' to add one.")
                .alignment(Alignment::Center);
            frame.render_widget(message, area);
            return;
        }

        let total_rows = row_count(board.buttons.len());
        let visible_rows = ((area.height / CARD_HEIGHT) as usize).max(1);
        let start_row = first_visible_row(self.cursor.row(), visible_rows, total_rows);
        let shown_rows = visible_rows.min(total_rows.saturating_sub(start_row));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(CARD_HEIGHT); shown_rows])
            .split(area);

        for (offset, row_area) in rows.iter().enumerate() {
            let row_idx = start_row + offset;
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
                .split(*row_area);

            for (col_idx, cell) in columns.iter().enumerate() {
                let index = row_idx * GRID_COLUMNS + col_idx;
                let Some(button) = board.buttons.get(index) else {
                    break;
                };
                let selected = index == self.cursor.selected;

                let mut block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(tint(button.color)));
                if selected {
                    block = block.border_type(BorderType::Thick);
                }
                let lines = build_button_card_lines(
                    button,
                    cell.width.saturating_sub(2),
                    cell.height.saturating_sub(2),
                    selected,
                );
                frame.render_widget(Paragraph::new(lines).block(block), *cell);
            }
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&str, &str)] = match &self.mode {
            Mode::AddingBoard(_) => &[("[Enter]", " Save   "), ("[Esc]", " Cancel")],
            Mode::AddingButton(_) => &[
                ("[Tab]", " Next Field   "),
                ("[Enter]", " Pick Sound / Save   "),
                ("[←→]", " Color   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::PickingSound { .. } => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open / Pick   "),
                ("[Backspace]", " Up   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmBoardDelete(_) | Mode::ConfirmButtonDelete(_) => {
                &[("[y]", " Confirm   "), ("[n]", " Cancel")]
            }
            Mode::Normal => &[
                ("[Tab]", " Board   "),
                ("[←↑↓→]", " Move   "),
                ("[Enter]", " Play   "),
                ("[s]", " Stop   "),
                ("[+]", " Add Sound   "),
                ("[d]", " Delete Sound   "),
                ("[b]", " Add Board   "),
                ("[-]", " Delete Board   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = keys
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_board_form(&self, frame: &mut Frame, area: Rect, form: &BoardForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Board").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![form.build_line(), Line::from("")];
        lines.push(hint_or_error(
            form.error.as_deref(),
            "Enter to save • Esc to cancel",
        ));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        let prefix = "Name: ".len() as u16;
        frame.set_cursor_position((inner.x + prefix + form.value_len() as u16, inner.y));
    }

    fn draw_button_form(&self, frame: &mut Frame, area: Rect, form: &ButtonForm) {
        let popup_area = centered_rect(70, 40, area);
        frame.render_widget(Clear, popup_area);

        let board_name = self
            .current_board()
            .map(|board| board.name.as_str())
            .unwrap_or("");
        let block = Block::default()
            .title(format!("Add Sound to {board_name}"))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(ButtonField::Title),
            form.build_line(ButtonField::Sound),
            form.build_line(ButtonField::Color),
            Line::from(""),
        ];
        lines.push(hint_or_error(
            form.error.as_deref(),
            "Enter to save • Tab to switch • Esc to cancel",
        ));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        if form.active == ButtonField::Title {
            let prefix = "Title: ".len() as u16;
            frame.set_cursor_position((inner.x + prefix + form.title_len() as u16, inner.y));
        }
    }

    fn draw_picker(&self, frame: &mut Frame, area: Rect, browser: &FileBrowser) {
        let popup_area = centered_rect(70, 70, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Pick a sound • {}", browser.dir().display()))
            .borders(Borders::ALL);

        if browser.entries().is_empty() {
            let message = Paragraph::new("No audio files here.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, popup_area);
            return;
        }

        let items: Vec<ListItem> = browser
            .entries()
            .iter()
            .map(|entry| {
                let style = match entry {
                    BrowserEntry::Parent | BrowserEntry::Dir(_) => {
                        Style::default().fg(Color::Cyan)
                    }
                    BrowserEntry::File(_) => Style::default(),
                };
                ListItem::new(Span::styled(entry.label(), style))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(browser.selected()));
        frame.render_stateful_widget(list, popup_area, &mut list_state);
    }

    fn draw_confirm_board(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBoardDelete) {
        let detail = match confirm.button_count {
            0 => "The board has no sounds.".to_string(),
            1 => "Its 1 sound will be removed too.".to_string(),
            n => format!("Its {n} sounds will be removed too."),
        };
        self.draw_confirm(
            frame,
            area,
            "Delete Board",
            format!("Delete board \"{}\"?", confirm.name),
            detail,
        );
    }

    fn draw_confirm_button(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmButtonDelete) {
        self.draw_confirm(
            frame,
            area,
            "Delete Sound",
            format!("Delete \"{}\"?", confirm.title),
            "The audio file itself is left alone.".to_string(),
        );
    }

    fn draw_confirm(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        question: String,
        detail: String,
    ) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(question),
            Line::from(detail),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

fn hint_or_error(error: Option<&str>, hint: &str) -> Line<'static> {
    match error {
        Some(error) => Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::Gray),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{SoundLocator, SoundSlot, PLACEHOLDER_TITLE};

    #[derive(Default)]
    struct Recorder {
        played: Vec<SoundLocator>,
        stops: usize,
        playing: bool,
    }

    struct FakePlayer(Rc<RefCell<Recorder>>);

    impl AudioPlayer for FakePlayer {
        fn play(&mut self, locator: &SoundLocator) -> Result<(), PlaybackError> {
            let mut rec = self.0.borrow_mut();
            rec.played.push(locator.clone());
            rec.playing = true;
            Ok(())
        }

        fn stop(&mut self) {
            let mut rec = self.0.borrow_mut();
            rec.stops += 1;
            rec.playing = false;
        }

        fn is_playing(&mut self) -> bool {
            self.0.borrow().playing
        }
    }

    fn app_with(config: AppConfig) -> (App<MemoryStore>, Rc<RefCell<Recorder>>) {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let repo = BoardRepository::load(MemoryStore::new());
        let app = App::new(repo, Box::new(FakePlayer(Rc::clone(&recorder))), config);
        (app, recorder)
    }

    fn app() -> (App<MemoryStore>, Rc<RefCell<Recorder>>) {
        app_with(AppConfig::default())
    }

    fn press(app: &mut App<MemoryStore>, codes: &[KeyCode]) {
        for code in codes {
            app.handle_key(*code);
        }
    }

    fn type_text(app: &mut App<MemoryStore>, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn add_board(app: &mut App<MemoryStore>, name: &str) {
        press(app, &[KeyCode::Char('b')]);
        type_text(app, name);
        press(app, &[KeyCode::Enter]);
    }

    fn screen_text(app: &App<MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn adding_a_board_selects_it() {
        let (mut app, _) = app();
        add_board(&mut app, "Music");
        add_board(&mut app, "Effects");

        let state = app.state();
        assert_eq!(state.boards.len(), 2);
        assert_eq!(state.boards[1].name, "Effects");
        assert_eq!(state.selected_board_index, 1);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn blank_board_name_keeps_form_open() {
        let (mut app, _) = app();
        press(&mut app, &[KeyCode::Char('b'), KeyCode::Char(' '), KeyCode::Enter]);
        assert!(app.state().boards.is_empty());
        assert!(matches!(app.mode, Mode::AddingBoard(_)));
    }

    #[test]
    fn add_button_needs_a_board() {
        let (mut app, _) = app();
        press(&mut app, &[KeyCode::Char('+')]);
        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.status.is_some());
    }

    #[test]
    fn add_button_without_sound_is_blocked() {
        let (mut app, _) = app();
        add_board(&mut app, "Music");
        press(&mut app, &[KeyCode::Char('+')]);
        type_text(&mut app, "Horn");
        press(&mut app, &[KeyCode::Enter]);

        assert!(matches!(app.mode, Mode::AddingButton(_)));
        assert!(app.state().boards[0].buttons.is_empty());
    }

    #[test]
    fn pick_sound_add_play_and_delete() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("horn.wav"), b"").unwrap();
        let config = AppConfig {
            sounds_dir: Some(temp.path().to_path_buf()),
            ..AppConfig::default()
        };
        let (mut app, recorder) = app_with(config);
        add_board(&mut app, "Music");

        press(&mut app, &[KeyCode::Char('+')]);
        type_text(&mut app, "Air Horn");
        // Title -> Sound, open picker, skip "../", pick the file.
        press(&mut app, &[KeyCode::Tab, KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::PickingSound { .. }));
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        // Back on the form with focus on Color; cycle once and save.
        press(&mut app, &[KeyCode::Right, KeyCode::Enter]);

        let button = app.state().boards[0].buttons[0].clone();
        assert_eq!(button.title, "Air Horn");
        assert_eq!(
            button.sound,
            SoundSlot::Set(SoundLocator::from_path(&temp.path().join("horn.wav")))
        );
        assert_eq!(button.color, crate::models::ButtonColor::Purple);

        press(&mut app, &[KeyCode::Enter]);
        assert_eq!(recorder.borrow().played.len(), 1);
        assert_eq!(app.now_playing.as_deref(), Some("Air Horn"));

        press(&mut app, &[KeyCode::Char('s')]);
        assert_eq!(recorder.borrow().stops, 1);
        app.on_tick();
        assert!(app.now_playing.is_none());

        press(&mut app, &[KeyCode::Char('d'), KeyCode::Char('y')]);
        assert!(app.state().boards[0].buttons.is_empty());
    }

    #[test]
    fn cancelled_pick_leaves_sound_unset() {
        let temp = tempfile::tempdir().unwrap();
        let config = AppConfig {
            sounds_dir: Some(temp.path().to_path_buf()),
            ..AppConfig::default()
        };
        let (mut app, _) = app_with(config);
        add_board(&mut app, "Music");

        press(&mut app, &[KeyCode::Char('+'), KeyCode::Tab, KeyCode::Enter, KeyCode::Esc]);
        match &app.mode {
            Mode::AddingButton(form) => assert_eq!(form.sound, SoundSlot::Unset),
            _ => panic!("expected the button form"),
        }
    }

    #[test]
    fn unplayable_button_reports_error() {
        let (mut app, recorder) = app();
        add_board(&mut app, "Music");
        app.repo.add_button_to_board(0, "", SoundSlot::Unset);

        press(&mut app, &[KeyCode::Enter]);
        assert!(recorder.borrow().played.is_empty());
        assert!(matches!(
            app.status,
            Some(StatusMessage {
                kind: StatusKind::Error,
                ..
            })
        ));
        assert_eq!(app.state().boards[0].buttons[0].title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn deleting_last_selected_board_reclamps() {
        let (mut app, _) = app();
        add_board(&mut app, "A");
        add_board(&mut app, "B");
        add_board(&mut app, "C");
        assert_eq!(app.state().selected_board_index, 2);

        press(&mut app, &[KeyCode::Char('-'), KeyCode::Char('y')]);
        assert_eq!(app.state().boards.len(), 2);
        assert_eq!(app.state().selected_board_index, 1);
    }

    #[test]
    fn declined_board_delete_keeps_board() {
        let (mut app, _) = app();
        add_board(&mut app, "A");
        press(&mut app, &[KeyCode::Char('-'), KeyCode::Char('n')]);
        assert_eq!(app.state().boards.len(), 1);
    }

    #[test]
    fn tab_cycles_boards() {
        let (mut app, _) = app();
        add_board(&mut app, "A");
        add_board(&mut app, "B");
        press(&mut app, &[KeyCode::Tab]);
        assert_eq!(app.state().selected_board_index, 0);
        press(&mut app, &[KeyCode::BackTab]);
        assert_eq!(app.state().selected_board_index, 1);
    }

    #[test]
    fn quitting_stops_playback() {
        let (mut app, recorder) = app();
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert_eq!(recorder.borrow().stops, 0);
        assert!(app.handle_key(KeyCode::Char('q')));
        assert_eq!(recorder.borrow().stops, 1);
    }

    #[test]
    fn renders_boards_and_buttons() {
        let (mut app, _) = app();
        assert!(screen_text(&app).contains("No boards yet"));

        add_board(&mut app, "Music");
        app.repo.add_button_to_board(
            0,
            "Air Horn",
            SoundSlot::Set(SoundLocator::new("/s/horn.wav")),
        );
        let text = screen_text(&app);
        assert!(text.contains("Music (1)"));
        assert!(text.contains("Air Horn"));
        assert!(text.contains("horn.wav"));
    }
}
