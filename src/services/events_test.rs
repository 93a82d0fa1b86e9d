#[cfg(test)]
mod events_tests {
    use std::collections::HashSet;

    use crate::error::ServiceError;
    use crate::models::event::{EventMutation, RoomEvent};
    use crate::services::events::{apply_mutation, generate_event_id, MutationOutcome};

    fn existing_event(id: &str) -> RoomEvent {
        RoomEvent {
            id: id.to_string(),
            date: "2024-05-01".to_string(),
            room: "R1".to_string(),
            start_time: "10:00".to_string(),
            end_time: "11:00".to_string(),
            event_name: "Seminar".to_string(),
            created_by: "admin1".to_string(),
        }
    }

    fn create_mutation() -> EventMutation {
        EventMutation {
            action: "create".to_string(),
            date: Some("2024-05-01".to_string()),
            room: Some("R1".to_string()),
            start_time: Some("10:00".to_string()),
            end_time: Some("11:00".to_string()),
            event_name: Some("Seminar".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_appends_with_fresh_id_and_attribution() {
        let current = vec![existing_event("evt-1")];
        let (next, outcome) = apply_mutation(&current, &create_mutation(), "admin2").unwrap();

        assert_eq!(next.len(), current.len() + 1);

        let created = match outcome {
            MutationOutcome::Created(event) => event,
            other => panic!("expected Created, got {:?}", other),
        };
        assert_ne!(created.id, "evt-1");
        assert_eq!(created.date, "2024-05-01");
        assert_eq!(created.room, "R1");
        assert_eq!(created.start_time, "10:00");
        assert_eq!(created.end_time, "11:00");
        assert_eq!(created.event_name, "Seminar");
        assert_eq!(created.created_by, "admin2");

        // The created event is retrievable from the new collection by id
        assert!(next.iter().any(|e| e.id == created.id));
        // Input collection untouched
        assert_eq!(current.len(), 1);
    }

    #[test]
    fn test_create_requires_every_field() {
        let current: Vec<RoomEvent> = Vec::new();

        for field in ["date", "room", "startTime", "endTime", "eventName"] {
            let mut mutation = create_mutation();
            match field {
                "date" => mutation.date = None,
                "room" => mutation.room = Some("".to_string()),
                "startTime" => mutation.start_time = Some("   ".to_string()),
                "endTime" => mutation.end_time = None,
                "eventName" => mutation.event_name = Some("".to_string()),
                _ => unreachable!(),
            }

            let result = apply_mutation(&current, &mutation, "admin1");
            assert!(
                matches!(result, Err(ServiceError::InvalidInput(_))),
                "missing {} should be invalid input",
                field
            );
        }
    }

    #[test]
    fn test_events_may_overlap_in_same_room() {
        // Unlike weekly slots, events do not enforce interval exclusion
        let current = vec![existing_event("evt-1")];
        let (next, _) = apply_mutation(&current, &create_mutation(), "admin1").unwrap();

        assert_eq!(next.len(), 2);
        assert!(next.iter().all(|e| e.room == "R1"
            && e.date == "2024-05-01"
            && e.start_time == "10:00"));
    }

    #[test]
    fn test_update_patches_only_supplied_fields() {
        let current = vec![existing_event("evt-1"), existing_event("evt-2")];
        let mutation = EventMutation {
            action: "update".to_string(),
            id: Some("evt-1".to_string()),
            event_name: Some("Workshop".to_string()),
            ..Default::default()
        };

        let (next, outcome) = apply_mutation(&current, &mutation, "admin2").unwrap();

        let updated = match outcome {
            MutationOutcome::Updated(event) => event,
            other => panic!("expected Updated, got {:?}", other),
        };
        assert_eq!(updated.event_name, "Workshop");

        // Everything else on evt-1 is unchanged, including attribution
        assert_eq!(updated.date, "2024-05-01");
        assert_eq!(updated.room, "R1");
        assert_eq!(updated.start_time, "10:00");
        assert_eq!(updated.end_time, "11:00");
        assert_eq!(updated.created_by, "admin1");

        // The other event is byte-identical
        let untouched = next.iter().find(|e| e.id == "evt-2").unwrap();
        assert_eq!(*untouched, existing_event("evt-2"));
    }

    #[test]
    fn test_update_treats_empty_fields_as_keep() {
        let current = vec![existing_event("evt-1")];
        let mutation = EventMutation {
            action: "update".to_string(),
            id: Some("evt-1".to_string()),
            date: Some("".to_string()),
            room: Some("  ".to_string()),
            event_name: Some("Workshop".to_string()),
            ..Default::default()
        };

        let (next, _) = apply_mutation(&current, &mutation, "admin1").unwrap();
        let event = &next[0];
        assert_eq!(event.date, "2024-05-01");
        assert_eq!(event.room, "R1");
        assert_eq!(event.event_name, "Workshop");
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let current = vec![existing_event("evt-1")];
        let mutation = EventMutation {
            action: "update".to_string(),
            id: Some("evt-missing".to_string()),
            event_name: Some("Workshop".to_string()),
            ..Default::default()
        };

        let result = apply_mutation(&current, &mutation, "admin1");
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        // Input collection untouched
        assert_eq!(current, vec![existing_event("evt-1")]);
    }

    #[test]
    fn test_update_without_id_is_invalid_input() {
        let mutation = EventMutation {
            action: "update".to_string(),
            event_name: Some("Workshop".to_string()),
            ..Default::default()
        };

        let result = apply_mutation(&[existing_event("evt-1")], &mutation, "admin1");
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn test_delete_removes_matching_event() {
        let current = vec![existing_event("evt-1"), existing_event("evt-2")];
        let mutation = EventMutation {
            action: "delete".to_string(),
            id: Some("evt-1".to_string()),
            ..Default::default()
        };

        let (next, outcome) = apply_mutation(&current, &mutation, "admin1").unwrap();

        assert_eq!(outcome, MutationOutcome::Deleted("evt-1".to_string()));
        assert_eq!(next.len(), current.len() - 1);
        assert!(!next.iter().any(|e| e.id == "evt-1"));
    }

    #[test]
    fn test_delete_unknown_id_is_not_found() {
        let current = vec![existing_event("evt-1")];
        let mutation = EventMutation {
            action: "delete".to_string(),
            id: Some("evt-missing".to_string()),
            ..Default::default()
        };

        let result = apply_mutation(&current, &mutation, "admin1");
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert_eq!(current.len(), 1);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let current = vec![existing_event("evt-1")];
        let mutation = EventMutation {
            action: "upsert".to_string(),
            id: Some("evt-1".to_string()),
            ..Default::default()
        };

        let result = apply_mutation(&current, &mutation, "admin1");
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids: HashSet<String> = (0..100).map(|_| generate_event_id()).collect();
        assert_eq!(ids.len(), 100);
    }
}
