//! Folding response events into a single text answer.

use futures::{Stream, StreamExt};
use tracing::debug;

use crate::error::A2aResult;
use crate::types::Event;

/// Concatenate the text parts of every message event, in order.
///
/// Non-message events contribute nothing. The first error in the stream is
/// returned and the rest of the stream is not read.
pub async fn aggregate_text<S>(events: S) -> A2aResult<String>
where
    S: Stream<Item = A2aResult<Event>>,
{
    let mut events = std::pin::pin!(events);
    let mut text = String::new();

    while let Some(event) = events.next().await {
        match event? {
            Event::Message(message) => {
                for part in message.text_parts() {
                    text.push_str(part);
                }
            }
            other @ (Event::Task(_) | Event::StatusUpdate(_) | Event::ArtifactUpdate(_)) => {
                debug!(kind = other.kind(), "Skipping non-message event");
            }
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::A2aError;
    use crate::types::{Message, Part, Task, TaskStatusUpdateEvent};
    use futures::stream;

    fn events(items: Vec<A2aResult<Event>>) -> impl Stream<Item = A2aResult<Event>> {
        stream::iter(items)
    }

    #[tokio::test]
    async fn test_no_messages_yields_empty_text() {
        let task = Task::new("t1", "c1");
        let text = aggregate_text(events(vec![
            Ok(Event::Task(task.clone())),
            Ok(Event::StatusUpdate(TaskStatusUpdateEvent::for_task(&task, true))),
        ]))
        .await
        .unwrap();
        assert_eq!(text, "");

        assert_eq!(aggregate_text(events(Vec::new())).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_concatenates_in_order() {
        let first = Message::agent("A").with_part(Part::text("B"));
        let second = Message::agent("C");

        let text = aggregate_text(events(vec![
            Ok(Event::Message(first)),
            Ok(Event::Task(Task::new("t1", "c1"))),
            Ok(Event::Message(second)),
        ]))
        .await
        .unwrap();
        assert_eq!(text, "ABC");
    }

    #[tokio::test]
    async fn test_non_text_parts_are_skipped() {
        let message = Message::agent("sunny").with_part(Part::data(serde_json::json!({"f": 80})));
        let text = aggregate_text(events(vec![Ok(Event::Message(message))]))
            .await
            .unwrap();
        assert_eq!(text, "sunny");
    }

    #[tokio::test]
    async fn test_error_stops_aggregation() {
        let result = aggregate_text(events(vec![
            Ok(Event::Message(Message::agent("partial"))),
            Err(A2aError::protocol_error("connection reset")),
            Ok(Event::Message(Message::agent("never read"))),
        ]))
        .await;
        assert!(result.is_err());
    }
}
