/// Number of button cards shown in each row of the grid.
pub(crate) const GRID_COLUMNS: usize = 4;

/// Cursor over the button grid of the selected board. It only knows how many
/// buttons there are; the board itself lives in the repository.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GridCursor {
    pub(crate) selected: usize,
}

impl GridCursor {
    pub(crate) fn row(&self) -> usize {
        self.selected / GRID_COLUMNS
    }

    pub(crate) fn move_horizontal(&mut self, offset: isize, len: usize) {
        let new_index = self.selected as isize + offset;
        if (0..len as isize).contains(&new_index) {
            self.selected = new_index as usize;
        }
    }

    /// Moving down onto a short last row lands on its final card.
    pub(crate) fn move_vertical(&mut self, offset: isize, len: usize) {
        if len == 0 {
            return;
        }
        let new_index = self.selected as isize + offset * GRID_COLUMNS as isize;
        if new_index < 0 {
            return;
        }
        let last = len - 1;
        if new_index as usize > last {
            if offset > 0 && row_of(last) > self.row() {
                self.selected = last;
            }
            return;
        }
        self.selected = new_index as usize;
    }

    pub(crate) fn reset(&mut self) {
        self.selected = 0;
    }

    /// Keep the cursor on a real card after the list shrank.
    pub(crate) fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

pub(crate) fn row_of(index: usize) -> usize {
    index / GRID_COLUMNS
}

pub(crate) fn row_count(len: usize) -> usize {
    len.div_ceil(GRID_COLUMNS)
}

/// First grid row to draw so the cursor row stays within `visible_rows`.
pub(crate) fn first_visible_row(cursor_row: usize, visible_rows: usize, total_rows: usize) -> usize {
    let visible_rows = visible_rows.max(1);
    let mut start = if cursor_row >= visible_rows {
        cursor_row + 1 - visible_rows
    } else {
        0
    };
    if start + visible_rows > total_rows {
        start = total_rows.saturating_sub(visible_rows);
    }
    start
}
