pub mod helpers;

use crate::app::state::App;
use crossterm::event::{KeyCode, MouseEvent, MouseEventKind};

pub fn handle_input(app: &mut App, key: KeyCode) {
    if handle_help_toggle(app, key) {
        return;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('r') => app.start_load(),
        KeyCode::Left | KeyCode::Char('h') => app.move_cursor(-1, 0),
        KeyCode::Right | KeyCode::Char('l') => app.move_cursor(1, 0),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(0, -1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(0, 1),
        KeyCode::PageUp => app.move_cursor(-10, 0),
        KeyCode::PageDown => app.move_cursor(10, 0),
        KeyCode::Char('g') => app.toggle_legend(),
        KeyCode::Char('e') => app.request_export(),
        _ => {}
    }
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Down(_) | MouseEventKind::Drag(_) => {
            app.hover(mouse.column, mouse.row);
        }
        _ => {}
    }
}

/// `?` or F1 open help; while it is open every key is swallowed and
/// `?`, F1 or Esc close it
fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('?') | KeyCode::F(1)) {
        app.toggle_help();
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use temperature_heatmap::AppConfig;

    #[test]
    fn quit_keys_stop_the_app() {
        let mut app = App::new(AppConfig::default());
        handle_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);

        let mut app = App::new(AppConfig::default());
        handle_input(&mut app, KeyCode::Esc);
        assert!(!app.running);
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = App::new(AppConfig::default());

        handle_input(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        handle_input(&mut app, KeyCode::Char('q'));
        assert!(app.running);

        handle_input(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn legend_toggles() {
        let mut app = App::new(AppConfig::default());
        assert!(app.show_legend);
        handle_input(&mut app, KeyCode::Char('g'));
        assert!(!app.show_legend);
    }

    #[test]
    fn scroll_events_do_not_move_cursor() {
        let mut app = App::new(AppConfig::default());
        handle_mouse(
            &mut app,
            MouseEvent {
                kind: MouseEventKind::ScrollDown,
                column: 12,
                row: 3,
                modifiers: KeyModifiers::NONE,
            },
        );
        assert_eq!(app.cursor, None);
    }
}
