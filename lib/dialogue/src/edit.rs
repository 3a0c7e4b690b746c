//! Resolving an edit request to one of the user's recent events.

use copper_almanac_core::{EditIntent, StoredEvent};

/// Picks the target event for an edit request, if one can be determined
/// without asking.
///
/// Resolution order: an explicit "last" reference, then a title
/// fragment the user gave, then the only recent event when there is
/// exactly one. `None` means the caller should offer a selection.
pub struct EventEditResolver;

impl EventEditResolver {
    #[must_use]
    pub fn resolve(
        recent: &[StoredEvent],
        message: &str,
        intent: &EditIntent,
    ) -> Option<StoredEvent> {
        if intent.event_reference.as_deref() == Some("last")
            || message.to_lowercase().contains("last")
        {
            return recent.first().cloned();
        }

        if let Some(identifier) = &intent.extracted_info.event_identifier {
            let identifier = identifier.to_lowercase();
            if let Some(event) = recent
                .iter()
                .find(|event| event.title.to_lowercase().contains(&identifier))
            {
                return Some(event.clone());
            }
        }

        if recent.len() == 1 {
            return recent.first().cloned();
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use copper_almanac_core::{EditFields, EventId};

    fn event(id: &str, title: &str) -> StoredEvent {
        StoredEvent {
            event_id: EventId::new(id),
            title: title.to_string(),
            date: "Friday".to_string(),
            time: "2pm".to_string(),
            duration: "1h".to_string(),
            created_at: Utc::now(),
            calendar_url: None,
        }
    }

    fn intent() -> EditIntent {
        EditIntent {
            is_edit: true,
            ..Default::default()
        }
    }

    #[test]
    fn last_reference_picks_the_newest_event() {
        let recent = vec![event("2", "Newest"), event("1", "Older")];
        let mut with_reference = intent();
        with_reference.event_reference = Some("last".to_string());

        let target =
            EventEditResolver::resolve(&recent, "change the time", &with_reference).expect("target");
        assert_eq!(target.title, "Newest");
    }

    #[test]
    fn the_word_last_in_the_message_also_counts() {
        let recent = vec![event("2", "Newest"), event("1", "Older")];
        let target = EventEditResolver::resolve(&recent, "move my last event to 4pm", &intent())
            .expect("target");
        assert_eq!(target.title, "Newest");
    }

    #[test]
    fn title_fragment_matches_case_insensitively() {
        let recent = vec![event("2", "Team sync"), event("1", "Dentist visit")];
        let mut with_identifier = intent();
        with_identifier.extracted_info = EditFields {
            event_identifier: Some("DENTIST".to_string()),
            ..Default::default()
        };

        let target = EventEditResolver::resolve(&recent, "change the dentist appointment time", &with_identifier)
            .expect("target");
        assert_eq!(target.title, "Dentist visit");
    }

    #[test]
    fn a_single_recent_event_is_selected_unconditionally() {
        let recent = vec![event("1", "Only one")];
        let target =
            EventEditResolver::resolve(&recent, "change the time to 4pm", &intent()).expect("target");
        assert_eq!(target.title, "Only one");
    }

    #[test]
    fn ambiguity_yields_none() {
        let recent = vec![event("2", "Team sync"), event("1", "Dentist visit")];
        assert!(EventEditResolver::resolve(&recent, "change the time to 4pm", &intent()).is_none());
    }

    #[test]
    fn unmatched_identifier_with_multiple_events_yields_none() {
        let recent = vec![event("2", "Team sync"), event("1", "Dentist visit")];
        let mut with_identifier = intent();
        with_identifier.extracted_info = EditFields {
            event_identifier: Some("standup".to_string()),
            ..Default::default()
        };
        assert!(EventEditResolver::resolve(&recent, "move the standup", &with_identifier).is_none());
    }
}
