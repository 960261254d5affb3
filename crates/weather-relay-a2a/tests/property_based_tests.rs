//! Property-based tests for reply aggregation
//!
//! Whatever mix of events a provider returns, the aggregated answer is the
//! text of its message events in arrival order.

use futures::stream;
use proptest::prelude::*;
use weather_relay_a2a::{
    A2aResult, Event, Message, Part, Task, TaskStatusUpdateEvent, aggregate_text,
};

/// One event of a generated reply
#[derive(Debug, Clone)]
enum ReplyItem {
    Message(Vec<String>),
    Task,
    StatusUpdate,
}

// Strategy for text parts, empty strings included
fn text_part_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex(".{0,12}").unwrap()
}

fn message_strategy() -> impl Strategy<Value = ReplyItem> {
    prop::collection::vec(text_part_strategy(), 1..4).prop_map(ReplyItem::Message)
}

fn other_event_strategy() -> impl Strategy<Value = ReplyItem> {
    prop_oneof![Just(ReplyItem::Task), Just(ReplyItem::StatusUpdate)]
}

fn to_event(item: &ReplyItem) -> Event {
    let task = Task::new("task-1", "ctx-1");
    match item {
        ReplyItem::Message(parts) => {
            let mut message = Message::agent(parts[0].clone());
            for part in &parts[1..] {
                message = message.with_part(Part::text(part.clone()));
            }
            Event::Message(message)
        }
        ReplyItem::Task => Event::Task(task),
        ReplyItem::StatusUpdate => {
            Event::StatusUpdate(TaskStatusUpdateEvent::for_task(&task, true))
        }
    }
}

fn aggregate(items: &[ReplyItem]) -> String {
    let events: Vec<A2aResult<Event>> = items.iter().map(|item| Ok(to_event(item))).collect();
    tokio_test::block_on(aggregate_text(stream::iter(events)))
        .expect("aggregation should succeed")
}

proptest! {
    /// Property: the answer is every message's text parts, concatenated in order
    #[test]
    fn prop_aggregate_preserves_order(
        items in prop::collection::vec(
            prop_oneof![message_strategy(), other_event_strategy()],
            0..40,
        )
    ) {
        let expected: String = items
            .iter()
            .filter_map(|item| match item {
                ReplyItem::Message(parts) => Some(parts.concat()),
                _ => None,
            })
            .collect();

        prop_assert_eq!(aggregate(&items), expected);
    }

    /// Property: replies without message events aggregate to the empty string
    #[test]
    fn prop_aggregate_without_messages_is_empty(
        items in prop::collection::vec(other_event_strategy(), 0..20)
    ) {
        prop_assert_eq!(aggregate(&items), "");
    }

    /// Property: non-message events never change the answer
    #[test]
    fn prop_non_message_events_are_ignored(
        messages in prop::collection::vec(message_strategy(), 1..8),
        noise in prop::collection::vec(other_event_strategy(), 1..8),
    ) {
        let mut mixed = Vec::new();
        for (i, message) in messages.iter().enumerate() {
            if let Some(other) = noise.get(i) {
                mixed.push(other.clone());
            }
            mixed.push(message.clone());
        }

        prop_assert_eq!(aggregate(&mixed), aggregate(&messages));
    }
}
