use crate::dataset::EventRecord;

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineEvent {
    pub label: String,
    pub start: f64,
    pub end: f64,
}

/// `Cmd` followed by its arguments, single-space separated. Missing or
/// empty `Args` give the bare command without a trailing space.
pub fn event_label(event: &EventRecord) -> String {
    let mut label = event.cmd.clone();
    for arg in event.args.iter().flatten() {
        label.push(' ');
        label.push_str(arg);
    }
    label.trim().to_string()
}

/// Events in start-time order. Ties keep their log order.
pub fn timeline_events(events: &[EventRecord]) -> Vec<TimelineEvent> {
    let mut timeline: Vec<TimelineEvent> = events
        .iter()
        .map(|ev| TimelineEvent {
            label: event_label(ev),
            start: ev.start_time,
            end: ev.end_time,
        })
        .collect();
    timeline.sort_by(|a, b| a.start.total_cmp(&b.start));
    timeline
}
