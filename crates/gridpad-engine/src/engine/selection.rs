//! Active cell and rectangular range selection.
//!
//! All positions are displayed-grid coordinates. The range follows a small state machine:
//! `Idle -> Dragging` on [`Selection::begin_select`], focus updates while dragging, and
//! `Dragging -> Fixed` on [`Selection::release`].

use super::cell_ref::{CellRect, CellRef};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Dragging,
    Fixed,
}

/// Keyboard navigation commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nav {
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Enter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
    pub anchor: CellRef,
    pub focus: CellRef,
}

impl Range {
    pub fn rect(&self) -> CellRect {
        CellRect::from_corners(self.anchor, self.focus)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub active: Option<CellRef>,
    pub range: Option<Range>,
    pub phase: Phase,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag at `pos`, discarding any prior range.
    pub fn begin_select(&mut self, pos: CellRef) {
        self.active = Some(pos);
        self.range = Some(Range {
            anchor: pos,
            focus: pos,
        });
        self.phase = Phase::Dragging;
    }

    /// Move the focus corner. Ignored unless a drag is in progress.
    pub fn extend_select(&mut self, pos: CellRef) {
        if self.phase != Phase::Dragging {
            return;
        }
        if let Some(range) = self.range.as_mut() {
            range.focus = pos;
        }
    }

    pub fn release(&mut self) {
        if self.phase == Phase::Dragging {
            self.phase = Phase::Fixed;
        }
    }

    /// Make `pos` active without touching the range.
    pub fn set_active(&mut self, pos: CellRef) {
        self.active = Some(pos);
    }

    /// Move the active cell inside a `rows` x `cols` grid. Never modifies the range.
    pub fn navigate(&mut self, nav: Nav, rows: usize, cols: usize) {
        if rows == 0 || cols == 0 {
            return;
        }
        let Some(cur) = self.active else {
            self.active = Some(CellRef::new(0, 0));
            return;
        };
        let last_row = rows - 1;
        let last_col = cols - 1;
        let row = cur.row.min(last_row);
        let col = cur.col.min(last_col);

        let next = match nav {
            Nav::Up => CellRef::new(row.saturating_sub(1), col),
            Nav::Down | Nav::Enter => CellRef::new((row + 1).min(last_row), col),
            Nav::Left => CellRef::new(row, col.saturating_sub(1)),
            Nav::Right => CellRef::new(row, (col + 1).min(last_col)),
            Nav::Tab => {
                if col < last_col {
                    CellRef::new(row, col + 1)
                } else {
                    CellRef::new((row + 1).min(last_row), 0)
                }
            }
            Nav::BackTab => {
                if col > 0 {
                    CellRef::new(row, col - 1)
                } else {
                    CellRef::new(row.saturating_sub(1), last_col)
                }
            }
        };
        self.active = Some(next);
    }

    /// Rectangle covered by the range, if any.
    pub fn extent(&self) -> Option<CellRect> {
        self.range.map(|r| r.rect())
    }

    pub fn contains(&self, pos: CellRef) -> bool {
        self.extent().is_some_and(|rect| rect.contains(pos))
    }

    /// Cells an action applies to: the range when present, else the active cell.
    pub fn target(&self) -> Option<CellRect> {
        self.extent()
            .or_else(|| self.active.map(|a| CellRect::from_corners(a, a)))
    }

    /// Bring the selection back inside a `rows` x `cols` displayed grid.
    pub fn revalidate(&mut self, rows: usize, cols: usize) {
        if rows == 0 || cols == 0 {
            self.clear();
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.row = active.row.min(rows - 1);
            active.col = active.col.min(cols - 1);
        }
        let inside = |p: CellRef| p.row < rows && p.col < cols;
        if let Some(range) = self.range
            && !(inside(range.anchor) && inside(range.focus))
        {
            self.range = None;
            self.phase = Phase::Idle;
        }
    }

    /// Drop the range, keeping the active cell.
    pub fn clear_range(&mut self) {
        self.range = None;
        self.phase = Phase::Idle;
    }

    pub fn clear(&mut self) {
        *self = Selection::default();
    }
}
