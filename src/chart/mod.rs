//! Maps shaped data onto scales and draws it onto a [`Surface`].

pub mod scale;
pub mod surface;
pub mod svg;
pub mod theme;
pub mod tooltip;

use crate::config::ChartConfig;
use crate::format::truncate_unicode;
use crate::shape::ShapedData;

use scale::{LinearScale, format_tick};
use surface::{Anchor, Mark, Point, Surface};
use theme::{Theme, class_fragment};
use tooltip::TooltipFields;

pub const X_LABEL: &str = "test time (s)";
pub const DELAY_LABEL: &str = "delay (s)";
pub const UNITS_LABEL: &str = "unit count";

/// Hover target for one timeline event: the page shows the band with `id`
/// while the pointer is over `label`.
#[derive(Clone, Debug, PartialEq)]
pub struct EventBand {
    pub id: String,
    pub label: String,
    pub full_label: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Clone, Debug)]
pub struct Scales {
    pub x: LinearScale,
    pub delay: LinearScale,
    pub units: LinearScale,
    pub cpu: LinearScale,
}

impl Scales {
    pub fn for_data(data: &ShapedData, config: &ChartConfig) -> Self {
        let width = config.inner_width();
        let height = config.inner_height();
        let headroom = config.domain_headroom;

        let x_max = data.max_event_end().or_else(|| data.max_timestamp());
        Scales {
            x: LinearScale::from_max(x_max, headroom, (0.0, width)),
            delay: LinearScale::from_max(data.max_delay(), headroom, (height, 0.0)),
            units: LinearScale::from_max(data.max_unit_count().map(f64::from), 1.0, (height, 0.0)),
            cpu: LinearScale::new((0.0, 100.0), (height, 0.0)),
        }
    }
}

/// Draws the whole chart and returns the event bands for the page to wire
/// up.
pub fn render<S: Surface>(
    data: &ShapedData,
    config: &ChartConfig,
    theme: &Theme,
    cpu_processes: &[String],
    surface: &mut S,
) -> Vec<EventBand> {
    let _span = tracing::debug_span!("render").entered();

    let scales = Scales::for_data(data, config);
    let width = config.inner_width();
    let height = config.inner_height();

    surface.draw(Mark::GroupStart {
        class: "canvas".into(),
        offset: Some(Point::new(config.margin_left, config.margin_top)),
    });

    draw_axes(surface, &scales, config);
    draw_delay_points(surface, data, &scales, config);
    draw_unit_lines(surface, data, &scales);
    draw_cpu_lines(surface, data, &scales, theme, cpu_processes);
    draw_axis_labels(surface, config);
    draw_legend(surface, width);
    let bands = draw_event_bands(surface, data, &scales, height, config.label_max_width);

    surface.draw(Mark::GroupEnd);

    tracing::debug!(
        points = data.sorted_starts.len(),
        segments = data.segment_count(),
        cpu_series = data.cpu.len(),
        events = bands.len(),
        "chart rendered"
    );
    bands
}

fn draw_axes<S: Surface>(surface: &mut S, scales: &Scales, config: &ChartConfig) {
    let width = config.inner_width();
    let height = config.inner_height();
    let count = config.tick_count;

    surface.draw(Mark::GroupStart {
        class: "x axis".into(),
        offset: Some(Point::new(0.0, height)),
    });
    let step = scales.x.tick_step(count);
    for tick in scales.x.ticks(count) {
        let x = scales.x.apply(tick);
        surface.draw(Mark::Line {
            from: Point::new(x, 0.0),
            to: Point::new(x, -height),
            class: "tick".into(),
        });
        surface.draw(Mark::Text {
            at: Point::new(x, 12.0),
            text: format_tick(tick, step),
            class: "tick-label".into(),
            anchor: Anchor::Middle,
            rotated: false,
        });
    }
    surface.draw(Mark::GroupEnd);

    surface.draw(Mark::GroupStart {
        class: "y axis left".into(),
        offset: None,
    });
    let step = scales.delay.tick_step(count);
    for tick in scales.delay.ticks(count) {
        let y = scales.delay.apply(tick);
        surface.draw(Mark::Line {
            from: Point::new(0.0, y),
            to: Point::new(width, y),
            class: "tick".into(),
        });
        surface.draw(Mark::Text {
            at: Point::new(-3.0, y),
            text: format_tick(tick, step),
            class: "tick-label".into(),
            anchor: Anchor::End,
            rotated: false,
        });
    }
    surface.draw(Mark::GroupEnd);

    surface.draw(Mark::GroupStart {
        class: "y axis nogrid".into(),
        offset: Some(Point::new(width, 0.0)),
    });
    let step = scales.units.tick_step(count);
    for tick in scales.units.ticks(count) {
        let y = scales.units.apply(tick);
        surface.draw(Mark::Line {
            from: Point::new(0.0, y),
            to: Point::new(-width, y),
            class: "tick".into(),
        });
        surface.draw(Mark::Text {
            at: Point::new(3.0, y),
            text: format_tick(tick, step),
            class: "tick-label".into(),
            anchor: Anchor::Start,
            rotated: false,
        });
    }
    surface.draw(Mark::GroupEnd);
}

fn draw_delay_points<S: Surface>(
    surface: &mut S,
    data: &ShapedData,
    scales: &Scales,
    config: &ChartConfig,
) {
    for record in &data.sorted_starts {
        surface.draw(Mark::Circle {
            center: Point::new(
                scales.x.apply(record.completion_time),
                scales.delay.apply(record.delay),
            ),
            radius: config.point_radius,
            class: "delaypoint".into(),
            tooltip: record.tooltip_fields(),
        });
    }
}

fn draw_unit_lines<S: Surface>(surface: &mut S, data: &ShapedData, scales: &Scales) {
    for segment in data.segments() {
        if segment.is_empty() {
            continue;
        }
        let points = segment
            .iter()
            .map(|r| {
                Point::new(
                    scales.x.apply(r.completion_time),
                    scales.units.apply(f64::from(r.starting_count)),
                )
            })
            .collect();
        surface.draw(Mark::Path {
            points,
            class: "line-starting-count".into(),
            stroke: None,
            title: None,
        });
    }

    if data.sorted_starts.is_empty() {
        return;
    }
    let points = data
        .sorted_starts
        .iter()
        .map(|r| {
            Point::new(
                scales.x.apply(r.completion_time),
                scales.units.apply(f64::from(r.running_count)),
            )
        })
        .collect();
    surface.draw(Mark::Path {
        points,
        class: "line-running-count".into(),
        stroke: None,
        title: None,
    });
}

fn draw_cpu_lines<S: Surface>(
    surface: &mut S,
    data: &ShapedData,
    scales: &Scales,
    theme: &Theme,
    cpu_processes: &[String],
) {
    for series in &data.cpu {
        let tag_index = cpu_processes
            .iter()
            .position(|p| *p == series.process)
            .unwrap_or(0);
        let points = series
            .points
            .iter()
            .map(|&(ts, cpu)| Point::new(scales.x.apply(ts), scales.cpu.apply(cpu)))
            .collect();
        surface.draw(Mark::Path {
            points,
            class: format!("cpu-usage {}-cpu-usage", class_fragment(&series.process)),
            stroke: Some(theme.cpu_color(tag_index).to_string()),
            title: Some(format!("{} {} cpu", series.machine, series.process)),
        });
    }
}

fn draw_axis_labels<S: Surface>(surface: &mut S, config: &ChartConfig) {
    let width = config.inner_width();
    let height = config.inner_height();

    surface.draw(Mark::Text {
        at: Point::new(width / 2.0, height + config.margin_bottom),
        text: X_LABEL.into(),
        class: "axis-label".into(),
        anchor: Anchor::Middle,
        rotated: false,
    });
    // Rotated labels are positioned in the rotated frame: x runs up the
    // chart, y runs right.
    surface.draw(Mark::Text {
        at: Point::new(-height / 2.0, -config.margin_left + 8.0),
        text: DELAY_LABEL.into(),
        class: "axis-label".into(),
        anchor: Anchor::Middle,
        rotated: true,
    });
    surface.draw(Mark::Text {
        at: Point::new(-height / 2.0, width + config.margin_right / 2.0 + 8.0),
        text: UNITS_LABEL.into(),
        class: "axis-label".into(),
        anchor: Anchor::Middle,
        rotated: true,
    });
}

fn draw_legend<S: Surface>(surface: &mut S, width: f64) {
    let x = width / 2.0;
    surface.draw(Mark::GroupStart {
        class: "legend".into(),
        offset: None,
    });
    surface.draw(Mark::Circle {
        center: Point::new(x, 0.0),
        radius: 2.0,
        class: "delaypoint".into(),
        tooltip: Vec::new(),
    });
    let entries = [
        ("delay between start-trigger and real-start", 0.0, None),
        ("units running", 15.0, Some("line-running-count")),
        ("units starting", 30.0, Some("line-starting-count")),
    ];
    for (label, y, line_class) in entries {
        surface.draw(Mark::Text {
            at: Point::new(x + 5.0, y),
            text: label.into(),
            class: "legend-label".into(),
            anchor: Anchor::Start,
            rotated: false,
        });
        if let Some(class) = line_class {
            surface.draw(Mark::Line {
                from: Point::new(x - 5.0, y),
                to: Point::new(x + 3.0, y),
                class: class.into(),
            });
        }
    }
    surface.draw(Mark::GroupEnd);
}

fn draw_event_bands<S: Surface>(
    surface: &mut S,
    data: &ShapedData,
    scales: &Scales,
    height: f64,
    label_max_width: usize,
) -> Vec<EventBand> {
    let mut bands = Vec::with_capacity(data.events.len());
    for (i, event) in data.events.iter().enumerate() {
        let id = format!("event-band-{i}");
        let x0 = scales.x.apply(event.start);
        let x1 = scales.x.apply(event.end);
        surface.draw(Mark::Rect {
            origin: Point::new(x0, 0.0),
            width: (x1 - x0).max(0.0),
            height,
            class: "timeline-focus".into(),
            id: Some(id.clone()),
            hidden: true,
        });
        bands.push(EventBand {
            id,
            label: truncate_unicode(&event.label, label_max_width),
            full_label: event.label.clone(),
            start: event.start,
            end: event.end,
        });
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorsConfig;
    use crate::dataset::{Dataset, EventRecord, ProcessStatsRecord, StartRecord};
    use crate::shape::{ShapeOptions, shape};

    fn sample() -> ShapedData {
        let mut data = Dataset {
            start: [0.0, 5.0, 30.0, 32.0]
                .iter()
                .enumerate()
                .map(|(i, &t)| {
                    let mut r = StartRecord::new(t, 1.0 + i as f64);
                    r.running_count = i as u32 + 1;
                    r
                })
                .collect(),
            event_log: vec![
                EventRecord {
                    cmd: "sleep".into(),
                    args: Some(vec!["10".into()]),
                    start_time: 20.0,
                    end_time: 30.0,
                },
                EventRecord {
                    cmd: "start".into(),
                    args: Some(vec!["4".into(), "100".into()]),
                    start_time: 0.0,
                    end_time: 40.0,
                },
            ],
            ..Dataset::default()
        };
        data.machine_stats.insert(
            "core-01".into(),
            vec![
                ProcessStatsRecord {
                    timestamp: 10.0,
                    process: "systemd".into(),
                    cpu_usage: 20.0,
                    rss: None,
                },
                ProcessStatsRecord {
                    timestamp: 10.0,
                    process: "fleetd".into(),
                    cpu_usage: 50.0,
                    rss: None,
                },
            ],
        );
        shape(&data, &ShapeOptions::default())
    }

    fn render_marks(data: &ShapedData) -> (Vec<Mark>, Vec<EventBand>) {
        let theme = Theme::from_config(&ColorsConfig::default());
        let mut marks: Vec<Mark> = Vec::new();
        let processes = ShapeOptions::default().cpu_processes;
        let bands = render(data, &ChartConfig::default(), &theme, &processes, &mut marks);
        (marks, bands)
    }

    fn count_class(marks: &[Mark], class: &str) -> usize {
        marks.iter().filter(|m| m.class() == Some(class)).count()
    }

    #[test]
    fn draws_every_series() {
        let (marks, _) = render_marks(&sample());
        // Four data points plus the legend dot.
        assert_eq!(count_class(&marks, "delaypoint"), 5);
        assert_eq!(
            marks
                .iter()
                .filter(|m| matches!(m, Mark::Path { class, .. } if class == "line-starting-count"))
                .count(),
            2
        );
        assert_eq!(
            marks
                .iter()
                .filter(|m| matches!(m, Mark::Path { class, .. } if class == "line-running-count"))
                .count(),
            1
        );
        assert_eq!(count_class(&marks, "cpu-usage systemd-cpu-usage"), 1);
        assert_eq!(count_class(&marks, "cpu-usage fleetd-cpu-usage"), 1);
        assert_eq!(count_class(&marks, "timeline-focus"), 2);
    }

    #[test]
    fn groups_are_balanced() {
        let (marks, _) = render_marks(&sample());
        let opens = marks.iter().filter(|m| matches!(m, Mark::GroupStart { .. })).count();
        let closes = marks.iter().filter(|m| matches!(m, Mark::GroupEnd)).count();
        assert_eq!(opens, closes);
    }

    #[test]
    fn bands_follow_event_order() {
        let (marks, bands) = render_marks(&sample());
        assert_eq!(bands[0].label, "start 4 100");
        assert_eq!(bands[0].id, "event-band-0");
        assert_eq!(bands[1].label, "sleep 10");

        let width = ChartConfig::default().inner_width();
        let rect = marks
            .iter()
            .find_map(|m| match m {
                Mark::Rect { id: Some(id), origin, width: w, hidden, .. } if id == "event-band-0" => {
                    Some((origin.x, *w, *hidden))
                }
                _ => None,
            })
            .unwrap();
        // x domain is [0, 40 * 1.01], the band spans 0..40.
        assert!(rect.0.abs() < 1e-9);
        assert!((rect.1 - width / 1.01).abs() < 1e-6);
        assert!(rect.2);
    }

    #[test]
    fn points_map_into_plot_area() {
        let (marks, _) = render_marks(&sample());
        let config = ChartConfig::default();
        for mark in &marks {
            if let Mark::Circle { center, tooltip, .. } = mark
                && !tooltip.is_empty()
            {
                assert!(center.x >= 0.0 && center.x <= config.inner_width());
                assert!(center.y >= 0.0 && center.y <= config.inner_height());
            }
        }
    }

    #[test]
    fn empty_dataset_still_renders_axes() {
        let shaped = shape(&Dataset::default(), &ShapeOptions::default());
        let (marks, bands) = render_marks(&shaped);
        assert!(bands.is_empty());
        assert!(count_class(&marks, "tick") > 0);
        assert_eq!(count_class(&marks, "delaypoint"), 1);
        assert!(!marks.iter().any(|m| matches!(m, Mark::Path { .. })));
    }

    #[test]
    fn x_scale_falls_back_without_events() {
        let data = Dataset {
            start: vec![StartRecord::new(50.0, 1.0)],
            ..Dataset::default()
        };
        let shaped = shape(&data, &ShapeOptions::default());
        let scales = Scales::for_data(&shaped, &ChartConfig::default());
        assert!((scales.x.domain().1 - 50.5).abs() < 1e-9);
    }
}
