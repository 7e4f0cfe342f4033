use crossterm::event::KeyCode;
use ratatui::widgets::TableState;

use crate::{
    dashboard::{Dashboard, Update},
    data::Endpoint,
    sort::{Column, SortState},
};

/// Work the event loop has to hand off to the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Refresh(Endpoint),
}

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub dashboard: Dashboard,
    pub table_state: TableState,
    /// Index into [`Column::ALL`] of the header the cursor sits on.
    pub header_cursor: usize,
}

impl Default for App {
    fn default() -> Self {
        Self::new(SortState::default())
    }
}

impl App {
    pub fn new(sort: SortState) -> Self {
        let header_cursor = Column::ALL
            .iter()
            .position(|&c| c == sort.column)
            .unwrap_or(0);
        Self {
            should_quit: false,
            dashboard: Dashboard::new(sort),
            table_state: TableState::default(),
            header_cursor,
        }
    }

    pub fn on_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => return Some(Action::Refresh(self.dashboard.begin_refresh())),
            KeyCode::Char('v') | KeyCode::Tab => {
                self.dashboard.toggle_view();
                self.table_state.select(None);
            }
            KeyCode::Left | KeyCode::Char('h') => self.move_header(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_header(1),
            KeyCode::Enter | KeyCode::Char('s') => self.sort_by_cursor(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            _ => {}
        }
        None
    }

    pub fn on_update(&mut self, update: Update) {
        self.dashboard.apply(update);
        let len = self.dashboard.visible_len();
        match self.table_state.selected() {
            Some(_) if len == 0 => self.table_state.select(None),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn cursor_column(&self) -> Column {
        Column::ALL[self.header_cursor % Column::ALL.len()]
    }

    fn move_header(&mut self, step: isize) {
        let n = Column::ALL.len() as isize;
        self.header_cursor = (self.header_cursor as isize + step).rem_euclid(n) as usize;
    }

    fn sort_by_cursor(&mut self) {
        let column = self.cursor_column();
        self.dashboard.select_column(column);
    }

    fn next(&mut self) {
        let len = self.dashboard.visible_len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn previous(&mut self) {
        let len = self.dashboard.visible_len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Player, sort::SortDirection};

    fn loaded_app(n: usize) -> App {
        let players = (0..n)
            .map(|i| Player {
                player_name: format!("P{}", i),
                minutes: "10:00".into(),
                custom_score: i as f64,
                ..Default::default()
            })
            .collect();
        let mut app = App::default();
        app.on_update(Update::Players { completed: Ok(players), live: Ok(vec![]) });
        app
    }

    #[test]
    fn test_cursor_starts_on_sort_column() {
        let app = App::default();
        assert_eq!(app.cursor_column(), Column::CustomScore);
    }

    #[test]
    fn test_header_cursor_wraps() {
        let mut app = App::default();
        app.on_key(KeyCode::Right);
        assert_eq!(app.cursor_column(), Column::PlayerName);
        app.on_key(KeyCode::Left);
        app.on_key(KeyCode::Left);
        assert_eq!(app.cursor_column(), Column::PlusMinus);
    }

    #[test]
    fn test_enter_sorts_by_cursor_column() {
        let mut app = App::default();
        app.on_key(KeyCode::Enter);
        assert_eq!(app.dashboard.sort().direction, SortDirection::Ascending);
        app.on_key(KeyCode::Enter);
        assert_eq!(app.dashboard.sort().direction, SortDirection::Descending);

        app.on_key(KeyCode::Right);
        app.on_key(KeyCode::Right);
        app.on_key(KeyCode::Char('s'));
        assert_eq!(app.dashboard.sort().column, Column::Team);
        assert_eq!(app.dashboard.sort().direction, SortDirection::Ascending);
    }

    #[test]
    fn test_row_selection_wraps() {
        let mut app = loaded_app(3);
        app.on_key(KeyCode::Up);
        assert_eq!(app.table_state.selected(), Some(0));
        app.on_key(KeyCode::Up);
        assert_eq!(app.table_state.selected(), Some(2));
        app.on_key(KeyCode::Down);
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_selection_clamped_when_data_shrinks() {
        let mut app = loaded_app(5);
        app.table_state.select(Some(4));
        app.on_update(Update::Players { completed: Ok(vec![]), live: Ok(vec![]) });
        assert_eq!(app.table_state.selected(), None);
    }

    #[test]
    fn test_refresh_and_quit_keys() {
        let mut app = loaded_app(1);
        assert_eq!(app.on_key(KeyCode::Char('r')), Some(Action::Refresh(Endpoint::Refresh)));
        assert_eq!(app.on_key(KeyCode::Char('q')), None);
        assert!(app.should_quit);
    }
}
