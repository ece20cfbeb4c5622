use anyhow::{anyhow, Result};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use uuid::Uuid;

use crate::models::{ButtonColor, SoundButton, SoundSlot};
use crate::picker::PickOutcome;

use super::helpers::tint;

/// Internal representation of the "add board" form.
#[derive(Default, Clone)]
pub(crate) struct BoardForm {
    pub(crate) name: String,
    pub(crate) error: Option<String>,
}

impl BoardForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.name.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.name.pop();
    }

    /// The repository accepts any name, so blank ones are stopped here.
    pub(crate) fn parse_name(&self) -> Result<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Board name is required."));
        }
        Ok(name.to_string())
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        let (display, style) = if self.name.is_empty() {
            ("<required>".to_string(), Style::default().fg(Color::DarkGray))
        } else {
            (self.name.clone(), Style::default().fg(Color::Yellow))
        };
        Line::from(vec![Span::raw("Name: "), Span::styled(display, style)])
    }

    pub(crate) fn value_len(&self) -> usize {
        self.name.chars().count()
    }
}

/// Fields available within the button form.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum ButtonField {
    #[default]
    Title,
    Sound,
    Color,
}

/// Form state for a new button. The sound slot is filled in by the picker.
#[derive(Default, Clone)]
pub(crate) struct ButtonForm {
    pub(crate) title: String,
    pub(crate) sound: SoundSlot,
    pub(crate) color: ButtonColor,
    pub(crate) active: ButtonField,
    pub(crate) error: Option<String>,
}

impl ButtonForm {
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            ButtonField::Title => ButtonField::Sound,
            ButtonField::Sound => ButtonField::Color,
            ButtonField::Color => ButtonField::Title,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            ButtonField::Title => ButtonField::Color,
            ButtonField::Sound => ButtonField::Title,
            ButtonField::Color => ButtonField::Sound,
        };
    }

    /// Only the title takes free text.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() || self.active != ButtonField::Title {
            return false;
        }
        self.title.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            ButtonField::Title => {
                self.title.pop();
            }
            ButtonField::Sound => self.sound = SoundSlot::Unset,
            ButtonField::Color => {}
        }
    }

    pub(crate) fn cycle_color(&mut self, offset: isize) {
        self.color = self.color.cycle(offset);
    }

    /// Cancelling the picker clears any earlier pick.
    pub(crate) fn apply_pick(&mut self, outcome: PickOutcome) {
        self.sound = outcome.into();
        self.error = None;
    }

    /// A button cannot be added until a sound is picked. The title may be
    /// blank; the repository substitutes the placeholder.
    pub(crate) fn parse_inputs(&self) -> Result<(String, SoundSlot, ButtonColor)> {
        if !self.sound.is_set() {
            return Err(anyhow!("Pick a sound first."));
        }
        Ok((self.title.trim().to_string(), self.sound.clone(), self.color))
    }

    pub(crate) fn build_line(&self, field: ButtonField) -> Line<'static> {
        let is_active = self.active == field;
        let label_style = if is_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        match field {
            ButtonField::Title => {
                let (display, style) = if self.title.is_empty() {
                    ("<optional>".to_string(), Style::default().fg(Color::DarkGray))
                } else {
                    (self.title.clone(), label_style)
                };
                Line::from(vec![Span::raw("Title: "), Span::styled(display, style)])
            }
            ButtonField::Sound => {
                let (display, style) = match self.sound.locator() {
                    Some(locator) => (locator.file_name(), label_style),
                    None => (
                        "<press Enter to pick>".to_string(),
                        Style::default().fg(Color::DarkGray),
                    ),
                };
                Line::from(vec![Span::raw("Sound: "), Span::styled(display, style)])
            }
            ButtonField::Color => {
                let swatch = Style::default()
                    .fg(tint(self.color))
                    .add_modifier(Modifier::BOLD);
                let arrows = if is_active { "◀ ▶" } else { "" };
                Line::from(vec![
                    Span::raw("Color: "),
                    Span::styled(format!("■ {}", self.color.label()), swatch),
                    Span::styled(format!(" {arrows}"), label_style),
                ])
            }
        }
    }

    pub(crate) fn title_len(&self) -> usize {
        self.title.chars().count()
    }
}

#[derive(Clone)]
pub(crate) struct ConfirmBoardDelete {
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) button_count: usize,
}

/// State for confirming a button deletion. Holds the id rather than a grid
/// position so a stale confirmation cannot hit a different button.
#[derive(Clone)]
pub(crate) struct ConfirmButtonDelete {
    pub(crate) board_index: usize,
    pub(crate) button_id: Uuid,
    pub(crate) title: String,
}

impl ConfirmButtonDelete {
    pub(crate) fn new(board_index: usize, button: &SoundButton) -> Self {
        Self {
            board_index,
            button_id: button.id,
            title: button.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SoundLocator;

    #[test]
    fn blank_board_name_is_rejected() {
        let mut form = BoardForm::default();
        form.push_char(' ');
        assert!(form.parse_name().is_err());
        form.push_char('A');
        assert_eq!(form.parse_name().unwrap(), "A");
    }

    #[test]
    fn button_requires_sound() {
        let mut form = ButtonForm::default();
        for ch in "Horn".chars() {
            form.push_char(ch);
        }
        assert!(form.parse_inputs().is_err());

        form.apply_pick(PickOutcome::Picked(SoundLocator::new("/s/horn.wav")));
        let (title, sound, color) = form.parse_inputs().unwrap();
        assert_eq!(title, "Horn");
        assert!(sound.is_set());
        assert_eq!(color, ButtonColor::Blue);
    }

    #[test]
    fn cancelled_pick_clears_previous_sound() {
        let mut form = ButtonForm::default();
        form.apply_pick(PickOutcome::Picked(SoundLocator::new("/s/horn.wav")));
        form.apply_pick(PickOutcome::Cancelled);
        assert_eq!(form.sound, SoundSlot::Unset);
    }

    #[test]
    fn typing_only_reaches_title() {
        let mut form = ButtonForm::default();
        form.next_field();
        assert!(!form.push_char('x'));
        form.previous_field();
        assert!(form.push_char('x'));
        assert_eq!(form.title, "x");
    }

    #[test]
    fn field_cycle_wraps() {
        let mut form = ButtonForm::default();
        form.next_field();
        form.next_field();
        assert_eq!(form.active, ButtonField::Color);
        form.next_field();
        assert_eq!(form.active, ButtonField::Title);
        form.previous_field();
        assert_eq!(form.active, ButtonField::Color);
    }
}
