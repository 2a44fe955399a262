use guide_lib::{
  buffer::{
    GuideBuffer,
    RopeView,
  },
  compose::{
    ComposeOptions,
    GuideSpan,
    compose_spans,
  },
  config::GuideConfig,
  extent::{
    ExtentPolicy,
    find_extent,
  },
  guides::{
    HostState,
    IndentGuides,
  },
  indent::{
    Level,
    LevelFinder,
  },
  marks::MarkRegistry,
  position::Position,
  render::{
    MarkKind,
    decorate_line,
    render_spans,
  },
};
use quickcheck::TestResult;
use ropey::Rope;

fn view(text: &str, tab_width: usize) -> RopeView {
  RopeView::new(Rope::from(text), tab_width).unwrap()
}

const C_LIKE: &str = "function f() {\n\tif (x) {\n\t\treturn 1;\n\t}\n}\n";

const LISPY: &str = "(defun f ()\n  (let ((x 1))\n    (g x)\n\n    (h x)))\n\n\n(defun k ())\n";

#[test]
fn tab_indented_block_draws_one_guide() {
  let buffer = view(C_LIKE, 8).with_cursor(Position::new(2, 2));
  let mut finder = LevelFinder::new();

  let level = finder.find_level_start(&buffer, 2).unwrap();
  assert_eq!(level, Level { line: 1, column: 8 });
  assert_eq!(
    find_extent(&buffer, level, 100, ExtentPolicy::Ordinary),
    2
  );

  let spans = compose_spans(&mut finder, &buffer, 2, &ComposeOptions::default());
  assert_eq!(spans, vec![GuideSpan {
    start_line: 2,
    end_line:   2,
    column:     8,
    depth:      0,
  }]);

  let marks = render_spans(&buffer, &spans, '|');
  assert_eq!(marks.len(), 1);
  assert_eq!(marks[0].line, 2);
  assert_eq!(marks[0].char_idx, 1);
  assert_eq!(marks[0].kind, MarkKind::Replace);
  assert_eq!(marks[0].guide_columns().collect::<Vec<_>>(), vec![8]);

  let shown: String = decorate_line(&buffer.line(2), &marks, buffer.tab_width())
    .into_iter()
    .map(|chunk| chunk.text)
    .collect();
  assert_eq!(shown, "        |       return 1;");
}

#[test]
fn uniform_block_extent_ignores_the_policy() {
  for len in 1..6 {
    let body: String = (0..len).map(|n| format!("    line {n}\n")).collect();
    let text = format!("head\n{body}tail\n");
    let buffer = view(&text, 4);
    let level = Level { line: 0, column: 0 };
    for policy in [ExtentPolicy::Ordinary, ExtentPolicy::TailBrace] {
      assert_eq!(find_extent(&buffer, level, usize::MAX, policy), len);
    }
  }
}

#[test]
fn tail_brace_extent_runs_past_inner_blank_lines() {
  let buffer = view(LISPY, 8);
  let mut finder = LevelFinder::new();

  let tail_brace = ComposeOptions {
    policy: ExtentPolicy::TailBrace,
    ..Default::default()
  };
  let spans = compose_spans(&mut finder, &buffer, 2, &tail_brace);
  assert_eq!(spans, vec![GuideSpan {
    start_line: 2,
    end_line:   4,
    column:     2,
    depth:      0,
  }]);

  let spans = compose_spans(&mut finder, &buffer, 2, &ComposeOptions::default());
  assert_eq!(spans[0].end_line, 6);
}

#[test]
fn lisp_context_selects_the_tail_brace_policy() {
  let buffer = view(LISPY, 8).with_cursor(Position::new(2, 4));
  let mut guides = IndentGuides::new(GuideConfig::default());

  guides.render_now(&buffer, &HostState::new("emacs-lisp"));
  let lines: Vec<_> = guides.marks().marks().iter().map(|mark| mark.line).collect();
  assert_eq!(lines, vec![2, 3, 4]);

  guides.render_now(&buffer, &HostState::new("rust"));
  let lines: Vec<_> = guides.marks().marks().iter().map(|mark| mark.line).collect();
  assert_eq!(lines, vec![2, 3, 4, 5, 6]);
}

#[test]
fn blank_line_inside_a_block_keeps_the_guide() {
  let text = "def f():\n    a = 1\n\n    b = 2\nc\n";
  let buffer = view(text, 4);
  let mut finder = LevelFinder::new();

  let expected = vec![GuideSpan {
    start_line: 1,
    end_line:   3,
    column:     0,
    depth:      0,
  }];
  for cursor_line in 1..=3 {
    let spans = compose_spans(&mut finder, &buffer, cursor_line, &ComposeOptions::default());
    assert_eq!(spans, expected, "cursor on line {cursor_line}");
  }

  let marks = render_spans(&buffer, &expected, '|');
  let blank = marks.iter().find(|mark| mark.line == 2).unwrap();
  assert_eq!(blank.kind, MarkKind::Append);
  assert_eq!(blank.text(), "|");
}

#[test]
fn blank_line_at_the_viewport_bottom_keeps_the_guide() {
  let buffer = view("head\n  a\n\n  b\ntail\n", 4).with_viewport(0, 3);
  let spans = compose_spans(&mut LevelFinder::new(), &buffer, 1, &ComposeOptions::default());
  assert_eq!(spans, vec![GuideSpan {
    start_line: 1,
    end_line:   2,
    column:     0,
    depth:      0,
  }]);

  let marks = render_spans(&buffer, &spans, '|');
  assert_eq!(marks.iter().map(|mark| mark.line).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn recursive_levels_are_drawn_shallower_outward() {
  let text = "a\n  b\n    c\n      d\n      e\n    f\n  g\nh\n";
  let buffer = view(text, 4);
  let options = ComposeOptions {
    recursive: true,
    ..Default::default()
  };
  let spans = compose_spans(&mut LevelFinder::new(), &buffer, 3, &options);

  let columns: Vec<_> = spans.iter().map(|span| (span.depth, span.column)).collect();
  assert_eq!(columns, vec![(0, 4), (1, 2), (2, 0)]);

  let marks = render_spans(&buffer, &spans, '|');
  let on_line_3: Vec<usize> = marks
    .iter()
    .filter(|mark| mark.line == 3)
    .flat_map(|mark| mark.guide_columns().collect::<Vec<_>>())
    .collect();
  assert_eq!(on_line_3, vec![0, 2, 4]);
}

fn indented_text(indents: &[u8], tabs: bool) -> String {
  indents
    .iter()
    .map(|indent| {
      match (*indent % 5) as usize {
        0 => "top\n".to_string(),
        depth if tabs => format!("{}x\n", "\t".repeat(depth)),
        depth => format!("{}x\n\n", "  ".repeat(depth)),
      }
    })
    .collect()
}

quickcheck::quickcheck! {
    fn rendering_twice_yields_identical_marks(indents: Vec<u8>, cursor: usize, tabs: bool, recursive: bool) -> TestResult {
        if indents.is_empty() {
            return TestResult::discard();
        }
        let text = indented_text(&indents, tabs);
        let buffer = view(&text, 4);
        let cursor_line = cursor % buffer.line_count();
        let buffer = buffer.with_cursor(Position::new(cursor_line, 0));
        let options = ComposeOptions { recursive, ..Default::default() };

        let mut registry = MarkRegistry::new();
        let mut finder = LevelFinder::new();

        let spans = compose_spans(&mut finder, &buffer, cursor_line, &options);
        registry.commit(render_spans(&buffer, &spans, '|'));
        let first = registry.marks().to_vec();
        registry.clear();

        let spans = compose_spans(&mut finder, &buffer, cursor_line, &options);
        registry.commit(render_spans(&buffer, &spans, '|'));
        TestResult::from_bool(registry.marks() == first.as_slice())
    }

    fn recursive_columns_strictly_decrease(indents: Vec<u8>, cursor: usize) -> TestResult {
        if indents.is_empty() {
            return TestResult::discard();
        }
        let text = indented_text(&indents, false);
        let buffer = view(&text, 4);
        let cursor_line = cursor % buffer.line_count();
        let options = ComposeOptions { recursive: true, ..Default::default() };
        let spans = compose_spans(&mut LevelFinder::new(), &buffer, cursor_line, &options);
        TestResult::from_bool(spans.windows(2).all(|pair| {
            pair[0].depth < pair[1].depth && pair[0].column > pair[1].column
        }))
    }
}
