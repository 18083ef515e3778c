use crate::series::PercentChange;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, TimeDelta};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    style::{Color, Modifier, Style},
    symbols,
    text::Line,
    widgets::{Axis, Block, Chart, Dataset, GraphType},
};

const X_AXIS_TITLE: &str = "Date";
const Y_AXIS_TITLE: &str = "Daily % Change";
const Y_TICKS: u32 = 5;
const CLOSE_HINT: &str = " q / Esc / Enter to close ";

// x is the day offset from the first date of the series.
#[derive(Debug, Clone)]
pub struct ChartData {
    title: String,
    origin: NaiveDate,
    segments: Vec<Vec<(f64, f64)>>,
    grid: Vec<[(f64, f64); 2]>,
    x_days: [i32; 2],
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl ChartData {
    pub fn from_changes(changes: &[PercentChange], year: i32) -> Option<Self> {
        let origin = changes.first()?.date;
        let mut first_day = i32::MAX;
        let mut last_day = i32::MIN;

        let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        for change in changes {
            match change.value {
                Some(value) if value.is_finite() => {
                    let day = day_offset(origin, change.date);
                    first_day = first_day.min(day);
                    last_day = last_day.max(day);
                    current.push((f64::from(day), value));
                }
                _ => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        if segments.is_empty() {
            return None;
        }

        let (y_min, y_max) = segments
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), &(_, y)| {
                (low.min(y), high.max(y))
            });
        let x_days = if first_day == last_day {
            [first_day - 1, last_day + 1]
        } else {
            [first_day, last_day]
        };
        let x_bounds = x_days.map(f64::from);
        let y_bounds = padded_bounds(y_min, y_max, 0.05);
        let grid = grid_lines(x_bounds, y_bounds);

        Some(Self {
            title: format!(
                "Daily % Change in Deposits & Withdrawals (All Categories) for {year}"
            ),
            origin,
            segments,
            grid,
            x_days,
            x_bounds,
            y_bounds,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn x_labels(&self) -> Vec<String> {
        let [start, end] = self.x_days;
        [start, start + (end - start) / 2, end]
            .into_iter()
            .map(|day| self.date_at(day).format("%Y-%m-%d").to_string())
            .collect()
    }

    fn y_labels(&self) -> Vec<String> {
        y_ticks(self.y_bounds)
            .into_iter()
            .map(|y| format!("{y:.1}%"))
            .collect()
    }

    fn date_at(&self, day: i32) -> NaiveDate {
        self.origin
            .checked_add_signed(TimeDelta::days(i64::from(day)))
            .unwrap_or(self.origin)
    }
}

fn day_offset(origin: NaiveDate, date: NaiveDate) -> i32 {
    date.num_days_from_ce() - origin.num_days_from_ce()
}

fn padded_bounds(min: f64, max: f64, ratio: f64) -> [f64; 2] {
    if (max - min).abs() < f64::EPSILON {
        return [min - 1.0, max + 1.0];
    }
    let pad = (max - min) * ratio;
    [min - pad, max + pad]
}

fn y_ticks([low, high]: [f64; 2]) -> Vec<f64> {
    let step = (high - low) / f64::from(Y_TICKS - 1);
    (0..Y_TICKS)
        .map(|idx| step.mul_add(f64::from(idx), low))
        .collect()
}

fn grid_lines(x_bounds: [f64; 2], y_bounds: [f64; 2]) -> Vec<[(f64, f64); 2]> {
    let [x_low, x_high] = x_bounds;
    let [y_low, y_high] = y_bounds;
    let horizontal = y_ticks(y_bounds)
        .into_iter()
        .map(|y| [(x_low, y), (x_high, y)]);
    let vertical = [x_low, (x_low + x_high) / 2.0, x_high]
        .into_iter()
        .map(|x| [(x, y_low), (x, y_high)]);
    horizontal.chain(vertical).collect()
}

pub fn draw_chart(frame: &mut Frame, data: &ChartData) {
    let grid_style = Style::default().fg(Color::DarkGray);
    let line_style = Style::default().fg(Color::Cyan);
    let axis_style = Style::default().fg(Color::Gray);

    let mut datasets: Vec<Dataset<'_>> = data
        .grid
        .iter()
        .map(|line| {
            Dataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(grid_style)
                .data(line)
        })
        .collect();
    datasets.extend(data.segments.iter().map(|segment| {
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(line_style)
            .data(segment)
    }));

    let block = Block::bordered()
        .title(Line::from(data.title()).centered())
        .title_bottom(Line::from(CLOSE_HINT).centered())
        .title_style(Style::default().add_modifier(Modifier::BOLD));

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(X_AXIS_TITLE)
                .style(axis_style)
                .bounds(data.x_bounds)
                .labels(data.x_labels()),
        )
        .y_axis(
            Axis::default()
                .title(Y_AXIS_TITLE)
                .style(axis_style)
                .bounds(data.y_bounds)
                .labels(data.y_labels()),
        )
        .legend_position(None);

    frame.render_widget(chart, frame.area());
}

pub fn show_chart(data: &ChartData) -> Result<()> {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::try_init().context("failed to initialize terminal")?;
    let result = run_viewer(&mut terminal, data);
    ratatui::restore();
    result
}

fn run_viewer(terminal: &mut DefaultTerminal, data: &ChartData) -> Result<()> {
    loop {
        terminal
            .draw(|frame| draw_chart(frame, data))
            .context("failed to draw chart")?;
        match event::read().context("failed to read terminal event")? {
            Event::Key(key) if key.kind == KeyEventKind::Press && closes_viewer(key) => {
                return Ok(());
            }
            _ => {}
        }
    }
}

fn closes_viewer(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn change(month: u32, day: u32, value: Option<f64>) -> PercentChange {
        PercentChange {
            date: date(month, day),
            value,
        }
    }

    #[test]
    fn first_undefined_point_is_skipped() {
        let changes = [
            change(1, 2, None),
            change(1, 3, Some(50.0)),
            change(1, 4, Some(-25.0)),
        ];

        let data = ChartData::from_changes(&changes, 2024).unwrap();

        assert_eq!(data.segments, vec![vec![(1.0, 50.0), (2.0, -25.0)]]);
        assert_eq!(data.x_bounds, [1.0, 2.0]);
        assert_eq!(
            data.title(),
            "Daily % Change in Deposits & Withdrawals (All Categories) for 2024"
        );
    }

    #[test]
    fn non_finite_changes_split_the_line() {
        let changes = [
            change(1, 2, None),
            change(1, 3, Some(10.0)),
            change(1, 4, Some(f64::INFINITY)),
            change(1, 5, Some(f64::NAN)),
            change(1, 8, Some(-10.0)),
            change(1, 9, Some(5.0)),
        ];

        let data = ChartData::from_changes(&changes, 2024).unwrap();

        assert_eq!(
            data.segments,
            vec![vec![(1.0, 10.0)], vec![(6.0, -10.0), (7.0, 5.0)]]
        );
    }

    #[test]
    fn nothing_to_draw_yields_none() {
        assert!(ChartData::from_changes(&[], 2024).is_none());
        assert!(ChartData::from_changes(&[change(1, 2, None)], 2024).is_none());
    }

    #[test]
    fn flat_series_gets_nonzero_span() {
        let changes = [change(1, 2, None), change(1, 3, Some(0.0))];

        let data = ChartData::from_changes(&changes, 2024).unwrap();

        assert_eq!(data.y_bounds, [-1.0, 1.0]);
        assert_eq!(data.x_bounds, [0.0, 2.0]);
    }

    #[test]
    fn offsets_cross_month_and_year_ends() {
        let changes = [
            PercentChange {
                date: NaiveDate::from_ymd_opt(2023, 12, 29).unwrap(),
                value: Some(1.0),
            },
            PercentChange {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                value: Some(2.0),
            },
            change(3, 1, Some(3.0)),
        ];

        let data = ChartData::from_changes(&changes, 2024).unwrap();

        assert_eq!(data.segments, vec![vec![(0.0, 1.0), (4.0, 2.0), (63.0, 3.0)]]);
        assert_eq!(
            data.x_labels(),
            vec!["2023-12-29", "2024-01-29", "2024-03-01"]
        );
    }

    #[test]
    fn y_ticks_span_bounds_evenly() {
        assert_eq!(y_ticks([-10.0, 30.0]), vec![-10.0, 0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn labels_map_back_to_dates() {
        let changes = [
            change(1, 2, None),
            change(1, 3, Some(1.0)),
            change(1, 13, Some(2.0)),
        ];

        let data = ChartData::from_changes(&changes, 2024).unwrap();

        assert_eq!(
            data.x_labels(),
            vec!["2024-01-03", "2024-01-08", "2024-01-13"]
        );
        assert_eq!(data.y_labels().len(), usize::try_from(Y_TICKS).unwrap());
    }

    #[test]
    fn grid_covers_every_tick() {
        let changes = [change(1, 2, Some(1.0)), change(1, 5, Some(3.0))];

        let data = ChartData::from_changes(&changes, 2024).unwrap();
        let ticks = usize::try_from(Y_TICKS).unwrap();

        assert_eq!(data.grid.len(), ticks + 3);
        for [(x0, _), (x1, _)] in &data.grid[..ticks] {
            assert_eq!((*x0, *x1), (0.0, 3.0));
        }
    }

    #[test]
    fn renders_title_and_axes() {
        let changes = [
            change(1, 2, None),
            change(1, 3, Some(50.0)),
            change(1, 4, Some(-20.0)),
        ];
        let data = ChartData::from_changes(&changes, 2024).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        terminal.draw(|frame| draw_chart(frame, &data)).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Daily % Change in Deposits & Withdrawals"));
        assert!(rendered.contains(X_AXIS_TITLE));
        assert!(rendered.contains("2024-01-03"));
    }

    #[test]
    fn close_keys() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert!(closes_viewer(key(KeyCode::Char('q'))));
        assert!(closes_viewer(key(KeyCode::Esc)));
        assert!(closes_viewer(key(KeyCode::Enter)));
        assert!(!closes_viewer(key(KeyCode::Char('c'))));
        assert!(closes_viewer(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
    }
}
