use circle_dash_core::{Command, PlayArea, PointCount, Position, DEFAULT_MAX_POINTS};
use circle_dash_system_layout::{Config, Layout};

fn count(value: i64) -> PointCount {
    PointCount::new(value, DEFAULT_MAX_POINTS).expect("valid point count")
}

#[test]
fn scatter_produces_one_position_per_circle() {
    let mut layout = Layout::new(Config::new(1));
    let positions = layout.scatter(count(25), PlayArea::default());
    assert_eq!(positions.len(), 25);
}

#[test]
fn positions_stay_inside_placement_bounds() {
    let area = PlayArea::new(640.0, 300.0);
    let (max_x, max_y) = area.placement_bounds();
    let mut layout = Layout::new(Config::new(0xdead_beef));

    for position in layout.scatter(count(DEFAULT_MAX_POINTS as i64), area) {
        assert!(position.x() >= 0.0 && position.x() < max_x, "x out of range: {position:?}");
        assert!(position.y() >= 0.0 && position.y() < max_y, "y out of range: {position:?}");
    }
}

#[test]
fn small_play_area_stacks_circles_at_origin() {
    let mut layout = Layout::new(Config::new(3));
    let positions = layout.scatter(count(4), PlayArea::new(150.0, 40.0));
    assert!(positions.iter().all(|position| *position == Position::new(0.0, 0.0)));
}

#[test]
fn layouts_are_deterministic_for_same_seed() {
    let area = PlayArea::default();
    let mut first = Layout::new(Config::new(42));
    let mut second = Layout::new(Config::new(42));

    assert_eq!(first.scatter(count(10), area), second.scatter(count(10), area));
    assert_eq!(first.scatter(count(3), area), second.scatter(count(3), area));
}

#[test]
fn consecutive_games_get_fresh_layouts() {
    let area = PlayArea::default();
    let mut layout = Layout::new(Config::new(42));

    let first = layout.scatter(count(10), area);
    let second = layout.scatter(count(10), area);

    assert_ne!(first, second);
}

#[test]
fn start_command_wraps_scattered_positions() {
    let area = PlayArea::default();
    let mut reference = Layout::new(Config::new(9));
    let mut layout = Layout::new(Config::new(9));

    let expected = reference.scatter(count(5), area);
    let command = layout.start_command(count(5), area);

    assert_eq!(
        command,
        Command::StartGame {
            positions: expected
        }
    );
}
