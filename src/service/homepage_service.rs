use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    config::ContentConfig,
    domain::{CalendarEvent, EventTag, HomepageContent, HomepageItem, HomepageStats, NewsPost},
    error::Result,
    repository::{EventRepository, NewsRepository},
    service::lifecycle_service::{is_event_active, is_news_active, should_archive_urgent_alert},
};

const NEWS_BASE_PRIORITY: i32 = 50;
const EVENT_BASE_PRIORITY: i32 = 40;
const LINKED_CONTENT_BONUS: i32 = 5;

/// Base 50, plus a recency bonus that decays in steps, plus a small bonus
/// when the post points at a calendar event.
pub fn calculate_news_priority(post: &NewsPost, now: DateTime<Utc>) -> i32 {
    let age_days = (now - post.date).num_days();
    let recency_bonus = if age_days <= 1 {
        20
    } else if age_days <= 3 {
        15
    } else if age_days <= 7 {
        10
    } else if age_days <= 14 {
        5
    } else {
        0
    };

    let linked_bonus = if post.linked_event_id.is_some() {
        LINKED_CONTENT_BONUS
    } else {
        0
    };

    NEWS_BASE_PRIORITY + recency_bonus + linked_bonus
}

/// Base 40, plus a proximity bonus keyed to days until the event, plus the
/// first matching tag bonus, plus a small bonus for a linked news post.
pub fn calculate_event_priority(event: &CalendarEvent, now: DateTime<Utc>) -> i32 {
    let days_until = (event.start - now).num_days();
    let proximity_bonus = if days_until <= 1 {
        25
    } else if days_until <= 3 {
        20
    } else if days_until <= 7 {
        15
    } else if days_until <= 14 {
        10
    } else if days_until <= 30 {
        5
    } else {
        0
    };

    let linked_bonus = if event.linked_news_id.is_some() {
        LINKED_CONTENT_BONUS
    } else {
        0
    };

    EVENT_BASE_PRIORITY + proximity_bonus + tag_bonus(&event.tags) + linked_bonus
}

/// First matching tag wins, checked in priority order.
fn tag_bonus(tags: &[EventTag]) -> i32 {
    const TAG_BONUSES: [(EventTag, i32); 4] = [
        (EventTag::ParentsEvening, 15),
        (EventTag::Inset, 10),
        (EventTag::Holiday, 8),
        (EventTag::Trip, 5),
    ];

    TAG_BONUSES
        .iter()
        .find(|(tag, _)| tags.contains(tag))
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0)
}

/// Rank the live content for the homepage. Pure function of its inputs and
/// the supplied clock; the caller owns fetching and the clock.
pub fn build_homepage_content(
    news: &[NewsPost],
    events: &[CalendarEvent],
    config: &ContentConfig,
    now: DateTime<Utc>,
) -> HomepageContent {
    let active_news: Vec<&NewsPost> = news
        .iter()
        .filter(|p| p.published && is_news_active(p, config, now))
        .collect();

    // At most one urgent alert: the most recent unexpired urgent post.
    let urgent_alert = active_news
        .iter()
        .filter(|p| p.is_urgent && !should_archive_urgent_alert(p, config, now))
        .max_by_key(|p| p.date)
        .map(|p| (*p).clone());

    // Urgent posts never compete as ordinary news, lapsed or not; a lapsed
    // urgent post stays hidden until the next cleanup archives it.
    let mut news_candidates: Vec<HomepageItem> = active_news
        .iter()
        .filter(|p| !p.is_urgent)
        .map(|p| HomepageItem::News {
            priority: calculate_news_priority(p, now),
            post: (*p).clone(),
        })
        .collect();
    news_candidates.sort_by(compare_items);
    news_candidates.truncate(config.max_news_items);

    let mut event_candidates: Vec<HomepageItem> = events
        .iter()
        .filter(|e| is_event_active(e, config, now))
        .filter(|e| e.start.date_naive() >= now.date_naive())
        .map(|e| HomepageItem::Event {
            priority: calculate_event_priority(e, now),
            event: e.clone(),
        })
        .collect();
    event_candidates.sort_by(compare_items);
    event_candidates.truncate(config.max_event_items);

    let mut items = news_candidates;
    items.append(&mut event_candidates);
    items.sort_by(compare_items);
    items.truncate(config.max_total_items);

    let total_news = items
        .iter()
        .filter(|i| matches!(i, HomepageItem::News { .. }))
        .count();
    let total_events = items.len() - total_news;
    let urgent_alerts = usize::from(urgent_alert.is_some());

    HomepageContent {
        urgent_alert,
        items,
        stats: HomepageStats {
            total_news,
            total_events,
            urgent_alerts,
        },
    }
}

/// Priority descending. Ties: an event sorts before a news item; equal
/// news by date descending (newest first); equal events by start ascending
/// (soonest first).
fn compare_items(a: &HomepageItem, b: &HomepageItem) -> Ordering {
    b.priority().cmp(&a.priority()).then_with(|| match (a, b) {
        (HomepageItem::Event { event: ea, .. }, HomepageItem::Event { event: eb, .. }) => {
            ea.start.cmp(&eb.start)
        }
        (HomepageItem::News { post: pa, .. }, HomepageItem::News { post: pb, .. }) => {
            pb.date.cmp(&pa.date)
        }
        (HomepageItem::Event { .. }, HomepageItem::News { .. }) => Ordering::Less,
        (HomepageItem::News { .. }, HomepageItem::Event { .. }) => Ordering::Greater,
    })
}

pub struct HomepageService {
    news_repo: Arc<dyn NewsRepository>,
    event_repo: Arc<dyn EventRepository>,
    config: ContentConfig,
}

impl HomepageService {
    pub fn new(
        news_repo: Arc<dyn NewsRepository>,
        event_repo: Arc<dyn EventRepository>,
        config: ContentConfig,
    ) -> Self {
        Self {
            news_repo,
            event_repo,
            config,
        }
    }

    pub async fn homepage_content(&self) -> Result<HomepageContent> {
        let news = self.news_repo.list_published().await?;
        let events = self.event_repo.list().await?;
        Ok(build_homepage_content(
            &news,
            &events,
            &self.config,
            Utc::now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Localized;
    use chrono::Duration;
    use uuid::Uuid;

    fn post(slug: &str, days_old: i64) -> NewsPost {
        let now = Utc::now();
        NewsPost {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            title: Localized::new(slug, ""),
            body: Localized::default(),
            date: now - Duration::days(days_old),
            is_urgent: false,
            published: true,
            linked_event_id: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn event(days_ahead: i64, tags: Vec<EventTag>) -> CalendarEvent {
        let now = Utc::now();
        CalendarEvent {
            id: Uuid::new_v4(),
            title: Localized::new("Event", ""),
            description: Localized::default(),
            start: now + Duration::days(days_ahead),
            end: None,
            all_day: true,
            tags,
            location: None,
            linked_news_id: None,
            attachment_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn news_priority_decays_with_age() {
        let now = Utc::now();
        assert_eq!(calculate_news_priority(&post("a", 0), now), 70);
        assert_eq!(calculate_news_priority(&post("b", 3), now), 65);
        assert_eq!(calculate_news_priority(&post("c", 7), now), 60);
        assert_eq!(calculate_news_priority(&post("d", 14), now), 55);
        assert_eq!(calculate_news_priority(&post("e", 20), now), 50);

        let mut linked = post("f", 20);
        linked.linked_event_id = Some(Uuid::new_v4());
        assert_eq!(calculate_news_priority(&linked, now), 55);
    }

    #[test]
    fn parents_evening_outranks_plain_event_at_same_distance() {
        let now = Utc::now();
        let parents_evening = event(2, vec![EventTag::ParentsEvening]);
        let plain = event(2, vec![EventTag::Event]);

        assert_eq!(calculate_event_priority(&parents_evening, now), 75);
        assert_eq!(calculate_event_priority(&plain, now), 60);
    }

    #[test]
    fn first_matching_tag_wins() {
        let now = Utc::now();
        // Trip listed first, but Parents Evening carries the higher bonus
        // and is checked first.
        let both = event(40, vec![EventTag::Trip, EventTag::ParentsEvening]);
        assert_eq!(calculate_event_priority(&both, now), 55);
    }

    #[test]
    fn urgent_post_becomes_alert_not_list_item() {
        let config = ContentConfig::default();
        let now = Utc::now();
        let mut urgent = post("urgent", 0);
        urgent.is_urgent = true;

        let content = build_homepage_content(&[urgent.clone(), post("plain", 2)], &[], &config, now);

        let alert = content.urgent_alert.expect("urgent alert expected");
        assert_eq!(alert.slug, "urgent");
        assert_eq!(content.items.len(), 1);
        assert!(matches!(
            &content.items[0],
            HomepageItem::News { post, .. } if post.slug == "plain"
        ));
        assert_eq!(content.stats.urgent_alerts, 1);
    }

    #[test]
    fn lapsed_urgent_post_is_suppressed_entirely() {
        let config = ContentConfig::default();
        let now = Utc::now();
        let mut lapsed = post("lapsed", 10);
        lapsed.is_urgent = true;

        let content = build_homepage_content(&[lapsed], &[], &config, now);

        assert!(content.urgent_alert.is_none());
        assert!(content.items.is_empty());
    }

    #[test]
    fn most_recent_urgent_post_wins_the_alert_slot() {
        let config = ContentConfig::default();
        let now = Utc::now();
        let mut older = post("older", 3);
        older.is_urgent = true;
        let mut newer = post("newer", 1);
        newer.is_urgent = true;

        let content = build_homepage_content(&[older, newer], &[], &config, now);

        assert_eq!(content.urgent_alert.unwrap().slug, "newer");
        assert!(content.items.is_empty());
    }

    #[test]
    fn caps_apply_per_type_before_merge() {
        let config = ContentConfig {
            max_news_items: 2,
            max_event_items: 2,
            max_total_items: 3,
            ..ContentConfig::default()
        };
        let now = Utc::now();

        let news = vec![post("a", 0), post("b", 1), post("c", 2)];
        let events = vec![
            event(1, vec![EventTag::ParentsEvening]),
            event(2, vec![EventTag::Event]),
            event(3, vec![EventTag::Event]),
        ];

        let content = build_homepage_content(&news, &events, &config, now);

        assert_eq!(content.items.len(), 3);
        // Parents Evening tomorrow: 40 + 25 + 15 = 80, tops the merged list.
        assert!(matches!(
            &content.items[0],
            HomepageItem::Event { priority: 80, .. }
        ));
    }

    #[test]
    fn ties_break_event_first_then_recency_direction() {
        let config = ContentConfig::default();
        let now = Utc::now();

        // A day-old news post (50+20=70) against an event 7 days out with
        // a Parents Evening tag (40+15+15=70).
        let news = vec![post("tie", 1)];
        let events = vec![event(7, vec![EventTag::ParentsEvening])];

        let content = build_homepage_content(&news, &events, &config, now);

        assert_eq!(content.items.len(), 2);
        assert!(matches!(content.items[0], HomepageItem::Event { .. }));
        assert!(matches!(content.items[1], HomepageItem::News { .. }));
    }

    #[test]
    fn past_events_do_not_surface() {
        let config = ContentConfig::default();
        let now = Utc::now();
        let events = vec![event(-2, vec![EventTag::Event]), event(5, vec![])];

        let content = build_homepage_content(&[], &events, &config, now);

        assert_eq!(content.items.len(), 1);
        assert_eq!(content.stats.total_events, 1);
    }

    #[test]
    fn unpublished_news_is_invisible() {
        let config = ContentConfig::default();
        let now = Utc::now();
        let mut draft = post("draft", 0);
        draft.published = false;
        let mut draft_urgent = post("draft-urgent", 0);
        draft_urgent.published = false;
        draft_urgent.is_urgent = true;

        let content = build_homepage_content(&[draft, draft_urgent], &[], &config, now);

        assert!(content.urgent_alert.is_none());
        assert!(content.items.is_empty());
    }
}
