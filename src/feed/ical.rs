//! iCalendar (RFC 5545) serialization for the school calendar.
//!
//! Hand-rolled line building: the output is a small, fixed subset of the
//! RFC and the serializer must stay byte-stable across regenerations so
//! subscribed clients update events instead of duplicating them.

use chrono::{DateTime, Duration, Utc};

use crate::{
    config::FeedConfig,
    domain::{CalendarEvent, Language},
    error::{AppError, Result},
};

const CRLF: &str = "\r\n";

/// Serialize a full calendar feed. A malformed event is skipped with a
/// logged diagnostic; the rest of the feed is still emitted.
pub fn calendar_feed(events: &[CalendarEvent], config: &FeedConfig, now: DateTime<Utc>) -> String {
    let mut lines = header_lines(config);

    for event in events {
        match event_lines(event, config, now) {
            Ok(mut event_block) => lines.append(&mut event_block),
            Err(e) => {
                tracing::warn!("Skipping event {} in calendar feed: {}", event.id, e);
            }
        }
    }

    lines.push("END:VCALENDAR".to_string());
    finish(lines)
}

/// Serialize one event as a standalone .ics document, for the
/// "add to calendar" download.
pub fn single_event(event: &CalendarEvent, config: &FeedConfig, now: DateTime<Utc>) -> Result<String> {
    let mut lines = header_lines(config);
    lines.append(&mut event_lines(event, config, now)?);
    lines.push("END:VCALENDAR".to_string());
    Ok(finish(lines))
}

fn header_lines(config: &FeedConfig) -> Vec<String> {
    vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//Ysgol Bryncelyn//Parent Portal//EN".to_string(),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
        format!("X-WR-CALNAME:{}", config.calendar_name),
        format!("X-WR-CALDESC:{}", config.calendar_description),
        format!("X-WR-TIMEZONE:{}", config.timezone),
    ]
}

fn event_lines(
    event: &CalendarEvent,
    config: &FeedConfig,
    now: DateTime<Utc>,
) -> Result<Vec<String>> {
    if let Some(end) = event.end {
        if end < event.start {
            return Err(AppError::Validation(format!(
                "Event {} ends before it starts",
                event.id
            )));
        }
    }

    let mut lines = vec![
        "BEGIN:VEVENT".to_string(),
        // Stable across regenerations so clients deduplicate.
        format!("UID:{}@{}", event.id, config.uid_domain),
        format!("DTSTAMP:{}", format_utc(now)),
    ];

    if event.all_day {
        // All-day DTEND is exclusive, so a single-day event runs to the
        // following date.
        let start_date = event.start.date_naive();
        let end_date = event
            .end
            .map(|e| e.date_naive())
            .unwrap_or(start_date)
            .succ_opt()
            .ok_or_else(|| {
                AppError::Validation(format!("Event {} date out of range", event.id))
            })?;
        lines.push(format!("DTSTART;VALUE=DATE:{}", start_date.format("%Y%m%d")));
        lines.push(format!("DTEND;VALUE=DATE:{}", end_date.format("%Y%m%d")));
    } else {
        lines.push(format!("DTSTART:{}", format_utc(event.start)));
        let end = event.end.unwrap_or(event.start + Duration::hours(1));
        lines.push(format!("DTEND:{}", format_utc(end)));
    }

    lines.push(format!("SUMMARY:{}", event.title.text(Language::En)));
    lines.push(format!(
        "DESCRIPTION:{}",
        escape_text(event.description.text(Language::En))
    ));

    // Omitted entirely when absent; an empty LOCATION: line would be
    // filtered out below anyway.
    if let Some(location) = &event.location {
        if !location.is_empty() {
            lines.push(format!("LOCATION:{}", location));
        }
    }

    lines.push(format!("LAST-MODIFIED:{}", format_utc(event.updated_at)));
    lines.push("STATUS:CONFIRMED".to_string());
    lines.push("END:VEVENT".to_string());
    Ok(lines)
}

fn finish(mut lines: Vec<String>) -> String {
    lines.retain(|l| !l.is_empty());
    let mut out = lines.join(CRLF);
    out.push_str(CRLF);
    out
}

/// Compact UTC form used by DTSTAMP and friends.
fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Embedded newlines become the literal two-character sequence `\n`.
fn escape_text(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventTag, Localized};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn make_event() -> CalendarEvent {
        let created = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        CalendarEvent {
            id: Uuid::parse_str("6f2c63e4-9f0a-4f6e-8d11-000000000001").unwrap(),
            title: Localized::new("Sports Day", "Diwrnod Chwaraeon"),
            description: Localized::new("Races on the lower field.\nBring sun cream.", ""),
            start: Utc.with_ymd_and_hms(2025, 6, 20, 0, 0, 0).unwrap(),
            end: None,
            all_day: true,
            tags: vec![EventTag::Event],
            location: None,
            linked_news_id: None,
            attachment_url: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn config() -> FeedConfig {
        FeedConfig::default()
    }

    #[test]
    fn all_day_event_gets_exclusive_dtend() {
        let ics = single_event(&make_event(), &config(), Utc::now()).unwrap();

        assert!(ics.contains("DTSTART;VALUE=DATE:20250620\r\n"));
        assert!(ics.contains("DTEND;VALUE=DATE:20250621\r\n"));
    }

    #[test]
    fn uid_is_stable_and_only_dtstamp_varies() {
        let event = make_event();
        let cfg = config();
        let t1 = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();

        let a = single_event(&event, &cfg, t1).unwrap();
        let b = single_event(&event, &cfg, t2).unwrap();

        let strip_stamp = |s: &str| -> String {
            s.lines()
                .filter(|l| !l.starts_with("DTSTAMP:"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_ne!(a, b);
        assert_eq!(strip_stamp(&a), strip_stamp(&b));
        assert!(a.contains("UID:6f2c63e4-9f0a-4f6e-8d11-000000000001@ysgolbryncelyn.cymru"));
    }

    #[test]
    fn description_newlines_are_escaped() {
        let ics = single_event(&make_event(), &config(), Utc::now()).unwrap();

        assert!(ics.contains("DESCRIPTION:Races on the lower field.\\nBring sun cream."));
    }

    #[test]
    fn absent_location_emits_no_location_line() {
        let ics = single_event(&make_event(), &config(), Utc::now()).unwrap();
        assert!(!ics.contains("LOCATION"));

        let mut located = make_event();
        located.location = Some("School hall".to_string());
        let ics = single_event(&located, &config(), Utc::now()).unwrap();
        assert!(ics.contains("LOCATION:School hall\r\n"));
    }

    #[test]
    fn lines_are_crlf_separated_with_no_blanks() {
        let ics = calendar_feed(&[make_event()], &config(), Utc::now());

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(!ics.contains("\r\n\r\n"));
    }

    #[test]
    fn inverted_event_is_skipped_but_feed_survives() {
        let good = make_event();
        let mut bad = make_event();
        bad.id = Uuid::new_v4();
        bad.end = Some(bad.start - Duration::days(1));

        let ics = calendar_feed(&[bad.clone(), good.clone()], &config(), Utc::now());

        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        assert!(ics.contains(&format!("UID:{}@", good.id)));
        assert!(!ics.contains(&format!("UID:{}@", bad.id)));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn timed_event_uses_compact_utc_form() {
        let mut event = make_event();
        event.all_day = false;
        event.start = Utc.with_ymd_and_hms(2025, 6, 20, 18, 30, 0).unwrap();
        event.end = Some(Utc.with_ymd_and_hms(2025, 6, 20, 20, 0, 0).unwrap());

        let ics = single_event(&event, &config(), Utc::now()).unwrap();

        assert!(ics.contains("DTSTART:20250620T183000Z\r\n"));
        assert!(ics.contains("DTEND:20250620T200000Z\r\n"));
    }

    #[test]
    fn summary_prefers_english() {
        let ics = single_event(&make_event(), &config(), Utc::now()).unwrap();
        assert!(ics.contains("SUMMARY:Sports Day\r\n"));

        let mut welsh_only = make_event();
        welsh_only.title = Localized::new("", "Eisteddfod yr Ysgol");
        let ics = single_event(&welsh_only, &config(), Utc::now()).unwrap();
        assert!(ics.contains("SUMMARY:Eisteddfod yr Ysgol\r\n"));
    }
}
