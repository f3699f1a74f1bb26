use approx::assert_abs_diff_eq;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::utils::MIN_WINDOW_SIZE;

const OUTPUT: OutputId = OutputId(1);

#[derive(Debug, Clone)]
enum Op {
    AddOutput { id: u64, w: i32, h: i32 },
    RemoveOutput(u64),
    ResizeOutput { id: u64, w: i32, h: i32 },
    AddWindow { view: u64, output: u64, w: i32, h: i32 },
    RemoveWindow(u64),
    MoveWindow { view: u64, direction: Direction },
    MoveRowBack(u64),
    MoveRowForward(u64),
    ResizeRow { view: u64, delta: i32 },
    ResizeWindow { view: u64, delta: i32 },
    DropWindow { view: u64, output: u64, x: f64, y: f64 },
    Scroll { output: u64, amount: f64 },
    ScrollToView(u64),
    SetOptions { horizontal: bool, minimize_empty_space: bool },
    TakeConfigures,
}

impl Op {
    fn apply(self, layout: &mut Layout) {
        match self {
            Op::AddOutput { id, w, h } => {
                layout.add_output(OutputId(id), Size::from((w, h)));
            }
            Op::RemoveOutput(id) => {
                layout.remove_output(OutputId(id));
            }
            Op::ResizeOutput { id, w, h } => {
                layout.update_output_size(OutputId(id), Size::from((w, h)));
            }
            Op::AddWindow { view, output, w, h } => {
                layout.add_window(ViewId(view), OutputId(output), Size::from((w, h)));
            }
            Op::RemoveWindow(view) => {
                layout.remove_window_for_view(ViewId(view));
            }
            Op::MoveWindow { view, direction } => {
                layout.move_window(ViewId(view), direction);
            }
            Op::MoveRowBack(view) => {
                layout.move_row_back(ViewId(view));
            }
            Op::MoveRowForward(view) => {
                layout.move_row_forward(ViewId(view));
            }
            Op::ResizeRow { view, delta } => {
                let row = layout
                    .window_for_view(ViewId(view))
                    .and_then(|key| layout.window(key).unwrap().row());
                if let Some(row) = row {
                    layout.resize_row(row, delta);
                }
            }
            Op::ResizeWindow { view, delta } => {
                if let Some(key) = layout.window_for_view(ViewId(view)) {
                    layout.resize_window(key, delta);
                }
            }
            Op::DropWindow { view, output, x, y } => {
                let Some(key) = layout.window_for_view(ViewId(view)) else {
                    return;
                };
                let pos = Point::from((x, y));
                if let Some(edge) = layout.nearest_edge(OutputId(output), pos) {
                    layout.move_window_to_edge(key, edge);
                }
            }
            Op::Scroll { output, amount } => {
                layout.scroll_grid(OutputId(output), amount);
            }
            Op::ScrollToView(view) => {
                layout.scroll_to_view(ViewId(view));
            }
            Op::SetOptions {
                horizontal,
                minimize_empty_space,
            } => {
                layout.update_options(Options {
                    horizontal,
                    minimize_empty_space,
                    ..Options::default()
                });
            }
            Op::TakeConfigures => {
                layout.take_configures();
            }
        }
    }
}

#[track_caller]
fn check_ops_with_options(options: Options, ops: impl IntoIterator<Item = Op>) -> Layout {
    let mut layout = Layout::new(options);
    for op in ops {
        op.apply(&mut layout);
        layout.verify_invariants();
    }
    layout
}

#[track_caller]
fn check_ops(ops: impl IntoIterator<Item = Op>) -> Layout {
    check_ops_with_options(Options::default(), ops)
}

fn output(w: i32, h: i32) -> Op {
    Op::AddOutput { id: 1, w, h }
}

fn win(view: u64, w: i32, h: i32) -> Op {
    Op::AddWindow {
        view,
        output: 1,
        w,
        h,
    }
}

fn move_win(view: u64, direction: Direction) -> Op {
    Op::MoveWindow { view, direction }
}

/// View ids row by row.
fn view_order(layout: &Layout, output: OutputId) -> Vec<Vec<u64>> {
    layout
        .rows_of(output)
        .map(|row| {
            layout
                .windows_of(row)
                .map(|key| layout.window(key).unwrap().view().0)
                .collect()
        })
        .collect()
}

fn window_of(layout: &Layout, view: u64) -> &Window {
    layout
        .window(layout.window_for_view(ViewId(view)).unwrap())
        .unwrap()
}

fn row_of(layout: &Layout, view: u64) -> RowKey {
    window_of(layout, view).row().unwrap()
}

fn sizes(layout: &Layout, row: RowKey) -> Vec<i32> {
    layout
        .windows_of(row)
        .map(|key| layout.window(key).unwrap().size())
        .collect()
}

/// Three 300-wide windows in one row of a 900-wide output.
fn three_in_a_row() -> [Op; 6] {
    [
        output(900, 600),
        win(1, 300, 200),
        win(2, 300, 200),
        win(3, 300, 200),
        move_win(2, Direction::Up),
        move_win(3, Direction::Up),
    ]
}

#[test]
fn new_window_fills_output_by_default() {
    let layout = check_ops([output(1000, 800), win(1, 0, 0), win(2, 0, 0)]);
    assert_snapshot!(layout.snapshot(), @r"
    output 1 1000x800 scroll=0
      row 10+790: 1[10+980]
      row 810+790: 2[10+980]
    ");
}

#[test]
fn windows_that_fit_keep_preferred_size() {
    let layout = check_ops([output(1000, 800), win(1, 500, 300)]);
    let win = window_of(&layout, 1);
    assert_eq!(win.size(), 500);
    assert_eq!(win.preferred_size(), 500);
}

#[test]
fn minimize_empty_space_stretches_windows() {
    let options = Options {
        minimize_empty_space: true,
        ..Options::default()
    };
    let layout = check_ops_with_options(options, [output(1000, 800), win(1, 500, 300)]);
    let win = window_of(&layout, 1);
    assert_eq!(win.size(), 980);
    assert_eq!(win.preferred_size(), 500);
}

#[test]
fn overflowing_row_shrinks_proportionally() {
    let layout = check_ops(three_in_a_row());
    assert_eq!(view_order(&layout, OUTPUT), [[3, 2, 1]]);

    let row = row_of(&layout, 1);
    let sizes = sizes(&layout, row);
    // 900 minus four spacings.
    assert_eq!(sizes, [287, 286, 287]);
    assert_eq!(sizes.iter().sum::<i32>(), 860);

    for view in [1, 2, 3] {
        assert_eq!(window_of(&layout, view).preferred_size(), 300);
    }

    assert_snapshot!(layout.snapshot(), @r"
    output 1 900x600 scroll=0
      row 10+200: 3[10+287] 2[307+286] 1[603+287]
    ");
}

#[test]
fn shrunk_row_keeps_trailing_spacing() {
    let layout = check_ops([
        output(1052, 600),
        win(1, 256, 200),
        win(2, 256, 200),
        win(3, 256, 200),
        win(4, 256, 200),
        move_win(2, Direction::Up),
        move_win(3, Direction::Up),
        move_win(4, Direction::Up),
    ]);
    assert_eq!(view_order(&layout, OUTPUT), [[4, 3, 2, 1]]);

    let row = row_of(&layout, 1);
    let sizes = sizes(&layout, row);
    assert_eq!(sizes, [251, 250, 251, 250]);
    assert_eq!(sizes.iter().sum::<i32>(), 1002);

    let last = window_of(&layout, 1);
    assert_eq!(last.origin() + last.size() + 10, 1052);
}

#[test]
fn removing_a_window_restores_room() {
    let mut ops = three_in_a_row().to_vec();
    ops.push(Op::RemoveWindow(2));
    let layout = check_ops(ops);

    assert_eq!(sizes(&layout, row_of(&layout, 1)), [300, 300]);
}

#[test]
fn removing_only_window_destroys_row() {
    let mut layout = check_ops([output(1000, 800), win(1, 300, 300), win(2, 300, 300)]);
    let second = row_of(&layout, 2);

    assert!(layout.remove_window_for_view(ViewId(1)));
    layout.verify_invariants();

    assert_eq!(view_order(&layout, OUTPUT), [[2]]);
    assert_eq!(layout.rows_of(OUTPUT).next(), Some(second));
    assert_eq!(layout.row(second).unwrap().origin(), 10);

    assert!(layout.remove_window_for_view(ViewId(2)));
    layout.verify_invariants();
    assert!(layout.grid(OUTPUT).unwrap().is_empty());
    assert!(!layout.remove_window_for_view(ViewId(2)));
}

#[test]
fn adding_same_view_twice_is_ignored() {
    let mut layout = check_ops([output(1000, 800), win(1, 300, 300)]);
    assert_eq!(
        layout.add_window(ViewId(1), OUTPUT, Size::from((300, 300))),
        None
    );
    assert_eq!(
        layout.add_window(ViewId(2), OutputId(7), Size::from((300, 300))),
        None
    );
    layout.verify_invariants();
}

#[test]
fn scroll_clamps_to_content() {
    let mut layout = check_ops([output(1000, 510), win(1, 500, 400), win(2, 500, 400)]);

    assert!(layout.scroll_grid(OUTPUT, 1000.));
    assert_abs_diff_eq!(layout.grid(OUTPUT).unwrap().scroll(), 310.);

    assert!(layout.scroll_grid(OUTPUT, -5000.));
    assert_abs_diff_eq!(layout.grid(OUTPUT).unwrap().scroll(), 0.);
    assert!(!layout.scroll_grid(OUTPUT, -1.));
    layout.verify_invariants();
}

#[test]
fn scrolling_empty_grid_stays_at_zero() {
    let mut layout = check_ops([output(1000, 800)]);
    assert!(!layout.scroll_grid(OUTPUT, 250.));
    assert_abs_diff_eq!(layout.grid(OUTPUT).unwrap().scroll(), 0.);
}

#[test]
fn scroll_to_row_makes_it_visible() {
    let mut layout = check_ops([
        output(1000, 510),
        win(1, 500, 400),
        win(2, 500, 400),
        win(3, 500, 400),
    ]);

    layout.scroll_to_view(ViewId(3));
    assert_abs_diff_eq!(layout.grid(OUTPUT).unwrap().scroll(), 720.);

    // Already visible.
    layout.scroll_to_view(ViewId(3));
    assert_abs_diff_eq!(layout.grid(OUTPUT).unwrap().scroll(), 720.);

    // Leading edge goes to the top of the viewport.
    layout.scroll_to_view(ViewId(2));
    assert_abs_diff_eq!(layout.grid(OUTPUT).unwrap().scroll(), 410.);

    layout.scroll_to_view(ViewId(1));
    assert_abs_diff_eq!(layout.grid(OUTPUT).unwrap().scroll(), 0.);
    layout.verify_invariants();
}

#[test]
fn configures_carry_scrolled_geometry_and_visibility() {
    let mut layout = check_ops([
        output(1000, 510),
        win(1, 500, 400),
        win(2, 500, 400),
        win(3, 500, 400),
    ]);
    layout.take_configures();

    layout.scroll_to_view(ViewId(3));
    let mut configures = layout.take_configures();
    configures.sort_by_key(|c| c.view);

    assert_eq!(
        configures,
        [
            Configure {
                view: ViewId(1),
                geometry: Rectangle::new(Point::from((10, -710)), Size::from((500, 400))),
                visible: false,
            },
            Configure {
                view: ViewId(2),
                geometry: Rectangle::new(Point::from((10, -300)), Size::from((500, 400))),
                visible: true,
            },
            Configure {
                view: ViewId(3),
                geometry: Rectangle::new(Point::from((10, 110)), Size::from((500, 400))),
                visible: true,
            },
        ]
    );

    assert!(layout.take_configures().is_empty());
}

#[test]
fn row_partly_on_screen_is_visible() {
    let mut layout = check_ops([
        output(1000, 510),
        win(1, 500, 400),
        win(2, 500, 400),
        win(3, 500, 400),
    ]);

    // The first row ends 5px into the output, inside the leading spacing.
    assert!(layout.scroll_grid(OUTPUT, 405.));
    let (geo, visible) = layout.view_geometry(ViewId(1)).unwrap();
    assert_eq!(geo.loc.y + geo.size.h, 5);
    assert!(visible);

    assert!(layout.scroll_grid(OUTPUT, 5.));
    let (geo, visible) = layout.view_geometry(ViewId(1)).unwrap();
    assert_eq!(geo.loc.y + geo.size.h, 0);
    assert!(!visible);
}

#[test]
fn horizontal_grid_swaps_axes() {
    let options = Options {
        horizontal: true,
        ..Options::default()
    };
    let layout = check_ops_with_options(
        options,
        [output(800, 1000), win(1, 300, 500), win(2, 200, 400)],
    );

    let (geo, visible) = layout.view_geometry(ViewId(1)).unwrap();
    assert_eq!(geo, Rectangle::new(Point::from((10, 10)), Size::from((300, 500))));
    assert!(visible);

    let (geo, _) = layout.view_geometry(ViewId(2)).unwrap();
    assert_eq!(geo, Rectangle::new(Point::from((320, 10)), Size::from((200, 400))));
}

#[test]
fn vertical_grid_geometry() {
    let layout = check_ops([output(1000, 800), win(1, 300, 200), win(2, 400, 100)]);

    let (geo, _) = layout.view_geometry(ViewId(1)).unwrap();
    assert_eq!(geo, Rectangle::new(Point::from((10, 10)), Size::from((300, 200))));
    let (geo, _) = layout.view_geometry(ViewId(2)).unwrap();
    assert_eq!(geo, Rectangle::new(Point::from((10, 220)), Size::from((400, 100))));
}

#[test]
fn move_window_along_and_across_rows() {
    let mut layout = check_ops([
        output(1000, 800),
        win(1, 200, 300),
        win(2, 200, 300),
        win(3, 200, 300),
        move_win(2, Direction::Up),
        move_win(3, Direction::Up),
    ]);
    assert_eq!(view_order(&layout, OUTPUT), [[3, 2, 1]]);

    assert!(layout.move_window(ViewId(1), Direction::Left));
    assert_eq!(view_order(&layout, OUTPUT), [[3, 1, 2]]);

    assert!(layout.move_window(ViewId(3), Direction::Right));
    assert_eq!(view_order(&layout, OUTPUT), [[1, 3, 2]]);

    assert!(!layout.move_window(ViewId(1), Direction::Left));
    assert!(!layout.move_window(ViewId(2), Direction::Right));

    assert_snapshot!(layout.snapshot(), @r"
    output 1 1000x800 scroll=0
      row 10+300: 1[10+200] 3[220+200] 2[430+200]
    ");

    // Row-mates get split off into rows of their own.
    assert!(layout.move_window(ViewId(3), Direction::Down));
    assert_eq!(view_order(&layout, OUTPUT), [vec![1, 2], vec![3]]);
    assert!(layout.move_window(ViewId(2), Direction::Up));
    assert_eq!(view_order(&layout, OUTPUT), [[2], [1], [3]]);
    layout.verify_invariants();

    assert_snapshot!(layout.snapshot(), @r"
    output 1 1000x800 scroll=0
      row 10+300: 2[10+200]
      row 320+300: 1[10+200]
      row 630+300: 3[10+200]
    ");

    // Lone windows join the neighbouring row.
    assert!(layout.move_window(ViewId(1), Direction::Down));
    assert_eq!(view_order(&layout, OUTPUT), [vec![2], vec![1, 3]]);
    assert!(!layout.move_window(ViewId(2), Direction::Up));
    layout.verify_invariants();
}

#[test]
fn move_window_round_trip_stays_adjacent() {
    let mut layout = check_ops([
        output(1000, 800),
        win(1, 200, 300),
        win(2, 200, 300),
        move_win(2, Direction::Up),
    ]);
    assert_eq!(view_order(&layout, OUTPUT), [[2, 1]]);

    layout.move_window(ViewId(1), Direction::Down);
    layout.move_window(ViewId(1), Direction::Up);
    layout.verify_invariants();

    // Split off, then joined back at the start of the row.
    assert_eq!(view_order(&layout, OUTPUT), [[1, 2]]);
}

#[test]
fn horizontal_grid_maps_directions() {
    let options = Options {
        horizontal: true,
        ..Options::default()
    };
    let mut layout = check_ops_with_options(
        options,
        [output(1000, 800), win(1, 300, 200), win(2, 300, 200)],
    );

    assert_eq!(layout.neighbor(ViewId(1), Direction::Right), Some(ViewId(2)));
    assert_eq!(layout.neighbor(ViewId(2), Direction::Left), Some(ViewId(1)));
    assert_eq!(layout.neighbor(ViewId(1), Direction::Down), None);

    assert!(layout.move_window(ViewId(2), Direction::Left));
    assert_eq!(view_order(&layout, OUTPUT), [[2, 1]]);
    assert_eq!(layout.neighbor(ViewId(2), Direction::Down), Some(ViewId(1)));
    layout.verify_invariants();
}

#[test]
fn neighbor_across_rows_is_first_window() {
    let layout = check_ops([
        output(1000, 800),
        win(1, 200, 300),
        win(2, 200, 300),
        win(3, 200, 300),
        move_win(3, Direction::Up),
    ]);
    assert_eq!(view_order(&layout, OUTPUT), [vec![1], vec![3, 2]]);

    assert_eq!(layout.neighbor(ViewId(1), Direction::Down), Some(ViewId(3)));
    assert_eq!(layout.neighbor(ViewId(2), Direction::Up), Some(ViewId(1)));
    assert_eq!(layout.neighbor(ViewId(3), Direction::Right), Some(ViewId(2)));
    assert_eq!(layout.neighbor(ViewId(3), Direction::Left), None);
}

#[test]
fn focus_successor_order() {
    let layout = check_ops([
        output(1000, 800),
        win(1, 200, 300),
        win(2, 200, 300),
        win(3, 200, 300),
        win(4, 200, 300),
        move_win(3, Direction::Up),
    ]);
    assert_eq!(view_order(&layout, OUTPUT), [vec![1], vec![3, 2], vec![4]]);

    assert_eq!(layout.focus_successor(ViewId(3)), Some(ViewId(2)));
    assert_eq!(layout.focus_successor(ViewId(2)), Some(ViewId(3)));
    assert_eq!(layout.focus_successor(ViewId(1)), Some(ViewId(3)));
    assert_eq!(layout.focus_successor(ViewId(4)), Some(ViewId(3)));

    let layout = check_ops([output(1000, 800), win(1, 200, 300)]);
    assert_eq!(layout.focus_successor(ViewId(1)), None);
}

#[test]
fn move_row_swaps_with_neighbour() {
    let mut layout = check_ops([
        output(1000, 800),
        win(1, 200, 100),
        win(2, 200, 100),
        win(3, 200, 100),
    ]);

    assert!(layout.move_row_back(ViewId(3)));
    assert_eq!(view_order(&layout, OUTPUT), [[1], [3], [2]]);

    assert!(layout.move_row_forward(ViewId(1)));
    assert_eq!(view_order(&layout, OUTPUT), [[3], [1], [2]]);

    assert!(!layout.move_row_back(ViewId(3)));
    assert!(!layout.move_row_forward(ViewId(2)));
    layout.verify_invariants();

    assert_snapshot!(layout.snapshot(), @r"
    output 1 1000x800 scroll=0
      row 10+100: 3[10+200]
      row 120+100: 1[10+200]
      row 230+100: 2[10+200]
    ");
}

#[test]
fn resize_row_pushes_rows_after_it() {
    let mut layout = check_ops([output(1000, 800), win(1, 200, 300), win(2, 200, 300)]);
    let first = row_of(&layout, 1);
    let second = row_of(&layout, 2);

    layout.resize_row(first, 50);
    layout.verify_invariants();
    assert_eq!(layout.row(first).unwrap().size(), 350);
    assert_eq!(layout.row(first).unwrap().preferred_size(), 350);
    assert_eq!(layout.row(second).unwrap().origin(), 370);

    layout.resize_row(first, -1000);
    layout.verify_invariants();
    assert_eq!(layout.row(first).unwrap().size(), MIN_WINDOW_SIZE);
    assert_eq!(layout.row(second).unwrap().origin(), 84);
}

#[test]
fn resize_window_uses_free_space_then_next_window() {
    let mut layout = check_ops([
        output(1000, 800),
        win(1, 300, 300),
        win(2, 300, 300),
        move_win(2, Direction::Up),
        move_win(1, Direction::Left),
    ]);
    assert_eq!(view_order(&layout, OUTPUT), [[1, 2]]);
    let key = layout.window_for_view(ViewId(1)).unwrap();
    let row = row_of(&layout, 1);

    layout.resize_window(key, 100);
    layout.verify_invariants();
    assert_eq!(sizes(&layout, row), [400, 300]);

    // 270 free, the rest comes out of the next window.
    layout.resize_window(key, 500);
    layout.verify_invariants();
    assert_eq!(sizes(&layout, row), [900, 70]);

    // The next window can't go below the minimum.
    layout.resize_window(key, 100);
    layout.verify_invariants();
    assert_eq!(sizes(&layout, row), [906, MIN_WINDOW_SIZE]);

    let next = layout.window_for_view(ViewId(2)).unwrap();
    assert_eq!(layout.window(next).unwrap().preferred_size(), MIN_WINDOW_SIZE);
}

#[test]
fn resize_window_shrink_is_clamped_and_grows_next() {
    let mut layout = check_ops([
        output(1000, 800),
        win(1, 600, 300),
        win(2, 600, 300),
        move_win(2, Direction::Up),
        move_win(1, Direction::Left),
    ]);
    let row = row_of(&layout, 1);
    assert_eq!(sizes(&layout, row), [485, 485]);

    let key = layout.window_for_view(ViewId(1)).unwrap();
    layout.resize_window(key, -1000);
    layout.verify_invariants();

    // The next window grows back up to its preferred size.
    assert_eq!(sizes(&layout, row), [MIN_WINDOW_SIZE, 600]);
    assert_snapshot!(layout.snapshot(), @r"
    output 1 1000x800 scroll=0
      row 10+300: 1[10+64] 2[84+600]
    ");
}

#[test]
fn resize_window_shrink_with_minimize_empty_space() {
    let options = Options {
        minimize_empty_space: true,
        ..Options::default()
    };
    let mut layout = check_ops_with_options(
        options,
        [
            output(1000, 800),
            win(1, 600, 300),
            win(2, 600, 300),
            move_win(2, Direction::Up),
            move_win(1, Direction::Left),
        ],
    );
    let row = row_of(&layout, 1);
    let key = layout.window_for_view(ViewId(1)).unwrap();

    layout.resize_window(key, -1000);
    layout.verify_invariants();
    assert_eq!(sizes(&layout, row), [MIN_WINDOW_SIZE, 906]);
}

#[test]
fn resize_targets() {
    let layout = check_ops([output(1000, 800), win(1, 300, 300), win(2, 300, 300)]);
    let first = row_of(&layout, 1);
    let key = layout.window_for_view(ViewId(1)).unwrap();

    assert_eq!(
        layout.resize_target(Edge::Row {
            output: OUTPUT,
            before: Some(first)
        }),
        Some(ResizeTarget::Row(first))
    );
    assert_eq!(
        layout.resize_target(Edge::Row {
            output: OUTPUT,
            before: None
        }),
        None
    );
    assert_eq!(
        layout.resize_target(Edge::Window {
            row: first,
            before: Some(key)
        }),
        Some(ResizeTarget::Window(key))
    );
    assert_eq!(
        layout.resize_target(Edge::Window {
            row: first,
            before: None
        }),
        None
    );
}

/// Rows `[1, 2]` and `[3]`, all 300x300, on a 1000x800 output.
fn two_rows() -> Layout {
    let layout = check_ops([
        output(1000, 800),
        win(1, 300, 300),
        win(2, 300, 300),
        win(3, 300, 300),
        move_win(2, Direction::Up),
        move_win(1, Direction::Left),
    ]);
    assert_eq!(view_order(&layout, OUTPUT), [vec![1, 2], vec![3]]);
    layout
}

#[test]
fn exact_edge_hits_spacing_only() {
    let layout = two_rows();
    let first = row_of(&layout, 1);
    let second = row_of(&layout, 3);
    let w1 = layout.window_for_view(ViewId(1)).unwrap();
    let w2 = layout.window_for_view(ViewId(2)).unwrap();
    let edge = |x: f64, y: f64| layout.exact_edge(OUTPUT, Point::from((x, y)));

    assert_eq!(
        edge(500., 5.),
        Some(Edge::Row {
            output: OUTPUT,
            before: None
        })
    );
    assert_eq!(
        edge(500., 315.),
        Some(Edge::Row {
            output: OUTPUT,
            before: Some(first)
        })
    );
    assert_eq!(
        edge(500., 625.),
        Some(Edge::Row {
            output: OUTPUT,
            before: Some(second)
        })
    );
    assert_eq!(
        edge(5., 100.),
        Some(Edge::Window {
            row: first,
            before: None
        })
    );
    assert_eq!(
        edge(315., 100.),
        Some(Edge::Window {
            row: first,
            before: Some(w1)
        })
    );
    assert_eq!(
        edge(625., 100.),
        Some(Edge::Window {
            row: first,
            before: Some(w2)
        })
    );

    assert_eq!(edge(500., 100.), None);
    assert_eq!(edge(615., 100.), None);
    assert_eq!(edge(500., 700.), None);
}

#[test]
fn hovered_row_includes_trailing_spacing() {
    let layout = two_rows();
    let first = row_of(&layout, 1);
    let second = row_of(&layout, 3);
    let row = |y: f64| layout.hovered_row(OUTPUT, Point::from((100., y)));

    assert_eq!(row(0.), Some(first));
    assert_eq!(row(315.), Some(first));
    assert_eq!(row(320.), Some(second));
    assert_eq!(row(790.), Some(second));
}

#[test]
fn nearest_edge_prefers_row_seams_within_radius() {
    let layout = two_rows();
    let first = row_of(&layout, 1);
    let w1 = layout.window_for_view(ViewId(1)).unwrap();
    let w2 = layout.window_for_view(ViewId(2)).unwrap();
    let edge = |x: f64, y: f64| layout.nearest_edge(OUTPUT, Point::from((x, y)));

    assert_eq!(
        edge(100., 100.),
        Some(Edge::Window {
            row: first,
            before: None
        })
    );
    assert_eq!(
        edge(100., 20.),
        Some(Edge::Row {
            output: OUTPUT,
            before: None
        })
    );
    assert_eq!(
        edge(330., 100.),
        Some(Edge::Window {
            row: first,
            before: Some(w1)
        })
    );
    assert_eq!(
        edge(700., 100.),
        Some(Edge::Window {
            row: first,
            before: Some(w2)
        })
    );
    assert_eq!(
        edge(700., 290.),
        Some(Edge::Row {
            output: OUTPUT,
            before: Some(first)
        })
    );
}

#[test]
fn edges_next_to_window_are_no_ops() {
    let layout = two_rows();
    let first = row_of(&layout, 1);
    let w1 = layout.window_for_view(ViewId(1)).unwrap();
    let w2 = layout.window_for_view(ViewId(2)).unwrap();
    let w3 = layout.window_for_view(ViewId(3)).unwrap();

    let between = Edge::Window {
        row: first,
        before: Some(w1),
    };
    assert!(layout.edge_belongs_to_window(between, w1));
    assert!(layout.edge_belongs_to_window(between, w2));
    assert!(!layout.edge_belongs_to_window(between, w3));

    let after_first = Edge::Row {
        output: OUTPUT,
        before: Some(first),
    };
    assert!(layout.edge_belongs_to_window(after_first, w3));
    assert!(!layout.edge_belongs_to_window(after_first, w1));

    let start = Edge::Row {
        output: OUTPUT,
        before: None,
    };
    assert!(!layout.edge_belongs_to_window(start, w3));
}

#[test]
fn drop_window_between_windows() {
    let mut layout = two_rows();
    let first = row_of(&layout, 1);
    let w1 = layout.window_for_view(ViewId(1)).unwrap();
    let w3 = layout.window_for_view(ViewId(3)).unwrap();

    let edge = Edge::Window {
        row: first,
        before: Some(w1),
    };
    assert!(layout.move_window_to_edge(w3, edge));
    layout.verify_invariants();
    assert_eq!(view_order(&layout, OUTPUT), [[1, 3, 2]]);

    // Dropping back onto its own seam does nothing.
    assert!(!layout.move_window_to_edge(w3, edge));
}

#[test]
fn drop_window_between_rows() {
    let mut layout = two_rows();
    let w2 = layout.window_for_view(ViewId(2)).unwrap();

    let edge = Edge::Row {
        output: OUTPUT,
        before: None,
    };
    assert!(layout.move_window_to_edge(w2, edge));
    layout.verify_invariants();
    assert_eq!(view_order(&layout, OUTPUT), [vec![2], vec![1], vec![3]]);
    assert_eq!(layout.row(row_of(&layout, 2)).unwrap().size(), 300);
}

#[test]
fn stale_edges_are_rejected() {
    let mut layout = two_rows();
    let second = row_of(&layout, 3);
    let w1 = layout.window_for_view(ViewId(1)).unwrap();

    layout.remove_window_for_view(ViewId(3));
    let edge = Edge::Window {
        row: second,
        before: None,
    };
    assert!(!layout.is_edge_valid(edge));
    assert!(!layout.move_window_to_edge(w1, edge));
    assert_eq!(layout.resize_target(edge), None);
    layout.verify_invariants();
}

#[test]
fn edge_nearest_to_maps_sides() {
    let layout = two_rows();
    let first = row_of(&layout, 1);
    let w1 = layout.window_for_view(ViewId(1)).unwrap();
    let w2 = layout.window_for_view(ViewId(2)).unwrap();

    // Window 2 spans x 320..620, y 10..310.
    let edge = |x: f64, y: f64| layout.edge_nearest_to(w2, Point::from((x, y)));
    assert_eq!(
        edge(330., 150.),
        Some(Edge::Window {
            row: first,
            before: Some(w1)
        })
    );
    assert_eq!(
        edge(610., 150.),
        Some(Edge::Window {
            row: first,
            before: Some(w2)
        })
    );
    assert_eq!(
        edge(450., 300.),
        Some(Edge::Row {
            output: OUTPUT,
            before: Some(first)
        })
    );
    assert_eq!(
        edge(450., 15.),
        Some(Edge::Row {
            output: OUTPUT,
            before: None
        })
    );
}

#[test]
fn removed_output_moves_rows_to_lowest_remaining() {
    let mut layout = check_ops([
        output(1000, 800),
        Op::AddOutput {
            id: 2,
            w: 1200,
            h: 800,
        },
        Op::AddOutput {
            id: 3,
            w: 1200,
            h: 800,
        },
        win(1, 300, 300),
        Op::AddWindow {
            view: 2,
            output: 3,
            w: 300,
            h: 300,
        },
        Op::AddWindow {
            view: 3,
            output: 3,
            w: 300,
            h: 300,
        },
    ]);

    let evacuation = layout.remove_output(OutputId(3));
    layout.verify_invariants();
    assert_eq!(
        evacuation,
        Evacuation {
            target: Some(OUTPUT),
            views: vec![ViewId(2), ViewId(3)],
        }
    );
    assert_eq!(view_order(&layout, OUTPUT), [[1], [2], [3]]);
    assert_eq!(layout.view_output(ViewId(3)), Some(OUTPUT));
    assert!(layout.grid(OutputId(3)).is_none());
}

#[test]
fn removing_last_output_drops_windows() {
    let mut layout = check_ops([output(1000, 800), win(1, 300, 300), win(2, 300, 300)]);

    let evacuation = layout.remove_output(OUTPUT);
    layout.verify_invariants();
    assert_eq!(evacuation.target, None);
    assert_eq!(evacuation.views, [ViewId(1), ViewId(2)]);
    assert!(!layout.has_view(ViewId(1)));
    assert_eq!(layout.outputs().count(), 0);

    assert_eq!(layout.remove_output(OUTPUT), Evacuation::default());
}

#[test]
fn output_resize_clamps_rows_to_page() {
    let mut layout = check_ops([output(1000, 800), win(1, 0, 0)]);
    let row = row_of(&layout, 1);
    assert_eq!(layout.row(row).unwrap().size(), 790);

    layout.update_output_size(OUTPUT, Size::from((500, 400)));
    layout.verify_invariants();
    assert_eq!(layout.row(row).unwrap().size(), 390);
    assert_eq!(window_of(&layout, 1).size(), 480);

    layout.update_output_size(OUTPUT, Size::from((1000, 800)));
    layout.verify_invariants();
    assert_eq!(layout.row(row).unwrap().size(), 790);
    assert_eq!(window_of(&layout, 1).size(), 980);
}

#[test]
fn update_options_relayouts() {
    let mut layout = check_ops([output(1000, 800), win(1, 500, 300)]);
    assert_eq!(window_of(&layout, 1).size(), 500);

    layout.update_options(Options {
        minimize_empty_space: true,
        window_spacing: 20,
        ..Options::default()
    });
    layout.verify_invariants();
    assert_eq!(window_of(&layout, 1).size(), 960);
    assert_eq!(window_of(&layout, 1).origin(), 20);
}

#[test]
fn geometry_requests_reapply_row() {
    let mut layout = check_ops([output(1000, 800), win(1, 500, 300)]);
    layout.take_configures();

    assert!(layout.deny_geometry_request(ViewId(1)));
    let configures = layout.take_configures();
    assert_eq!(configures.len(), 1);
    assert_eq!(configures[0].view, ViewId(1));

    assert!(!layout.deny_geometry_request(ViewId(9)));
}

#[test]
fn detached_window_round_trip() {
    let mut layout = two_rows();
    let first = row_of(&layout, 1);
    let w3 = layout.window_for_view(ViewId(3)).unwrap();

    let detached = layout.remove_window(w3);
    assert_eq!(detached.key(), w3);
    assert_eq!(layout.window(w3).unwrap().row(), None);
    assert_eq!(layout.rows_of(OUTPUT).count(), 1);

    layout.insert_window_after(detached, first, None);
    layout.verify_invariants();
    assert_eq!(view_order(&layout, OUTPUT), [[3, 1, 2]]);
}

fn arbitrary_view() -> impl Strategy<Value = u64> {
    1..=5u64
}

fn arbitrary_output() -> impl Strategy<Value = u64> {
    1..=3u64
}

fn arbitrary_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (arbitrary_output(), 400..1600i32, 400..1200i32)
            .prop_map(|(id, w, h)| Op::AddOutput { id, w, h }),
        arbitrary_output().prop_map(Op::RemoveOutput),
        (arbitrary_output(), 400..1600i32, 400..1200i32)
            .prop_map(|(id, w, h)| Op::ResizeOutput { id, w, h }),
        (arbitrary_view(), arbitrary_output(), 0..1200i32, 0..900i32).prop_map(
            |(view, output, w, h)| Op::AddWindow { view, output, w, h }
        ),
        arbitrary_view().prop_map(Op::RemoveWindow),
        (arbitrary_view(), arbitrary_direction())
            .prop_map(|(view, direction)| Op::MoveWindow { view, direction }),
        arbitrary_view().prop_map(Op::MoveRowBack),
        arbitrary_view().prop_map(Op::MoveRowForward),
        (arbitrary_view(), -400..400i32).prop_map(|(view, delta)| Op::ResizeRow { view, delta }),
        (arbitrary_view(), -400..400i32)
            .prop_map(|(view, delta)| Op::ResizeWindow { view, delta }),
        (
            arbitrary_view(),
            arbitrary_output(),
            0f64..1600.,
            0f64..1200.
        )
            .prop_map(|(view, output, x, y)| Op::DropWindow { view, output, x, y }),
        (arbitrary_output(), -2000f64..2000.)
            .prop_map(|(output, amount)| Op::Scroll { output, amount }),
        arbitrary_view().prop_map(Op::ScrollToView),
        (any::<bool>(), any::<bool>()).prop_map(|(horizontal, minimize_empty_space)| {
            Op::SetOptions {
                horizontal,
                minimize_empty_space,
            }
        }),
        Just(Op::TakeConfigures),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn random_operations_keep_invariants(
        ops in proptest::collection::vec(arbitrary_op(), 1..60),
    ) {
        let mut layout = check_ops(ops);

        // Every window gets a configure with its final geometry.
        let configures = layout.take_configures();
        for configure in configures {
            let (geometry, visible) = layout.view_geometry(configure.view).unwrap();
            prop_assert_eq!(configure.geometry, geometry);
            prop_assert_eq!(configure.visible, visible);
        }
    }

    #[test]
    fn scroll_stays_in_bounds(
        heights in proptest::collection::vec(64..900i32, 0..6),
        amounts in proptest::collection::vec(-3000f64..3000., 1..10),
    ) {
        let mut ops = vec![output(1000, 800)];
        for (view, h) in (1..).zip(heights) {
            ops.push(win(view, 300, h));
        }
        let mut layout = check_ops(ops);
        let empty = layout.grid(OUTPUT).unwrap().is_empty();

        for amount in amounts {
            layout.scroll_grid(OUTPUT, amount);
            layout.verify_invariants();
            if empty {
                prop_assert_eq!(layout.grid(OUTPUT).unwrap().scroll(), 0.);
            }
        }
    }
}
