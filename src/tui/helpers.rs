// Small formatting helpers for the views

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// "1 photo", "3 photos"
pub fn photo_count(count: usize) -> String {
    if count == 1 {
        "1 photo".to_string()
    } else {
        format!("{} photos", count)
    }
}

/// Shortens `name` to at most `max` characters, keeping both ends
pub fn truncate_middle(name: &str, max: usize) -> String {
    let len = name.chars().count();
    if len <= max || max < 5 {
        return name.to_string();
    }

    let keep = max - 1;
    let head = keep / 2 + keep % 2;
    let tail = keep / 2;
    let start: String = name.chars().take(head).collect();
    let end: String = name.chars().skip(len - tail).collect();
    format!("{}…{}", start, end)
}

/// Share of shown photos that were marked, 0.0 when nothing was shown
pub fn marked_ratio(marked: usize, shown: usize) -> f64 {
    if shown == 0 {
        0.0
    } else {
        (marked as f64 / shown as f64).min(1.0)
    }
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_count() {
        assert_eq!(photo_count(0), "0 photos");
        assert_eq!(photo_count(1), "1 photo");
        assert_eq!(photo_count(12), "12 photos");
    }

    #[test]
    fn test_truncate_middle() {
        assert_eq!(truncate_middle("short.jpg", 20), "short.jpg");
        assert_eq!(truncate_middle("IMG_20240101_123456.jpg", 11), "IMG_2…6.jpg");
        assert_eq!(truncate_middle("IMG_20240101_123456.jpg", 11).chars().count(), 11);
    }

    #[test]
    fn test_marked_ratio() {
        assert_eq!(marked_ratio(0, 0), 0.0);
        assert_eq!(marked_ratio(1, 4), 0.25);
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(50, 50, outer);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 25);
        assert!(inner.x >= 20 && inner.y >= 10);
    }
}
