//! SQLite event store implementation.

use crate::{Error, Event, EventKind, Result, TaskId};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use std::path::Path;

/// Summary of a task derived from its events.
#[derive(Debug, Clone)]
pub struct TaskSummary {
    pub id: TaskId,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub message_count: usize,
}

/// SQLite-backed event store.
pub struct EventStore {
    conn: Connection,
}

impl EventStore {
    /// Open or create an event store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory event store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                task_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                kind TEXT NOT NULL,
                data TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_events_task
                ON events(task_id, timestamp);
            "#,
        )?;
        Ok(())
    }

    /// Append an event to the store.
    pub fn append(&self, event: &Event) -> Result<()> {
        self.conn.execute(
            "INSERT INTO events (id, task_id, timestamp, kind, data) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.id.to_string(),
                event.task_id.to_string(),
                event.timestamp.to_rfc3339(),
                event_kind_name(&event.kind),
                serde_json::to_string(&event.kind)?,
            ],
        )?;
        Ok(())
    }

    /// Load all events for a task, ordered by timestamp.
    pub fn load_task(&self, task_id: TaskId) -> Result<Vec<Event>> {
        self.query_events(
            "SELECT id, task_id, timestamp, data FROM events
             WHERE task_id = ?1 ORDER BY timestamp",
            params![task_id.to_string()],
        )
    }

    /// Load events for a task, optionally filtered by kind name
    /// ("message", "tool_call", ...).
    pub fn load_events(&self, task_id: TaskId, kind: Option<&str>) -> Result<Vec<Event>> {
        match kind {
            None => self.load_task(task_id),
            Some(kind) => self.query_events(
                "SELECT id, task_id, timestamp, data FROM events
                 WHERE task_id = ?1 AND kind = ?2 ORDER BY timestamp",
                params![task_id.to_string(), kind],
            ),
        }
    }

    fn query_events(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(sql)?;

        let events = stmt
            .query_map(params, |row| {
                let id: String = row.get(0)?;
                let task_id: String = row.get(1)?;
                let timestamp: String = row.get(2)?;
                let data: String = row.get(3)?;
                Ok((id, task_id, timestamp, data))
            })?
            .filter_map(|r| r.ok())
            .filter_map(|(id, task_id, timestamp, data)| {
                Some(Event {
                    id: id.parse().ok()?,
                    task_id: TaskId(task_id.parse().ok()?),
                    timestamp: timestamp.parse().ok()?,
                    kind: serde_json::from_str(&data).ok()?,
                })
            })
            .collect();

        Ok(events)
    }

    /// Summaries for all tasks, most recent first.
    pub fn list_tasks(&self) -> Result<Vec<TaskSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT task_id,
                    MIN(timestamp),
                    MAX(CASE WHEN kind = 'task_end' THEN timestamp END),
                    SUM(CASE WHEN kind = 'message' THEN 1 ELSE 0 END)
             FROM events
             GROUP BY task_id
             ORDER BY MIN(timestamp) DESC",
        )?;

        let summaries = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let started_at: String = row.get(1)?;
                let ended_at: Option<String> = row.get(2)?;
                let message_count: i64 = row.get(3)?;
                Ok((id, started_at, ended_at, message_count))
            })?
            .filter_map(|r| r.ok())
            .filter_map(|(id, started_at, ended_at, message_count)| {
                Some(TaskSummary {
                    id: TaskId(id.parse().ok()?),
                    started_at: started_at.parse().ok()?,
                    ended_at: ended_at.and_then(|t| t.parse().ok()),
                    message_count: message_count.max(0) as usize,
                })
            })
            .collect();

        Ok(summaries)
    }

    /// Find a task by an id prefix. Errors when the prefix matches no
    /// task or more than one.
    pub fn find_task(&self, prefix: &str) -> Result<TaskId> {
        let matches: Vec<TaskId> = self
            .list_tasks()?
            .into_iter()
            .map(|s| s.id)
            .filter(|id| id.to_string().starts_with(prefix))
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(Error::NotFound(format!("no task matching '{prefix}'"))),
            _ => Err(Error::NotFound(format!(
                "multiple tasks match '{prefix}', use a longer prefix"
            ))),
        }
    }
}

fn event_kind_name(kind: &EventKind) -> &'static str {
    match kind {
        EventKind::TaskStart { .. } => "task_start",
        EventKind::TaskEnd => "task_end",
        EventKind::Message { .. } => "message",
        EventKind::ToolCall { .. } => "tool_call",
        EventKind::ToolResult { .. } => "tool_result",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    fn start_task(store: &EventStore) -> TaskId {
        let id = TaskId::new();
        store
            .append(&Event::new(
                id,
                EventKind::TaskStart {
                    context_id: "ctx".into(),
                },
            ))
            .unwrap();
        id
    }

    #[test]
    fn append_and_load_round_trip() {
        let store = EventStore::in_memory().unwrap();
        let id = start_task(&store);

        store
            .append(&Event::message(id, Role::User, "what's the weather?"))
            .unwrap();
        store
            .append(&Event::tool_call(
                id,
                "weather_forecast",
                serde_json::json!({"location": "Berlin, Germany"}),
            ))
            .unwrap();
        store.append(&Event::new(id, EventKind::TaskEnd)).unwrap();

        let events = store.load_task(id).unwrap();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0].kind, EventKind::TaskStart { .. }));
        assert!(matches!(events[3].kind, EventKind::TaskEnd));
    }

    #[test]
    fn kind_filter() {
        let store = EventStore::in_memory().unwrap();
        let id = start_task(&store);
        store
            .append(&Event::message(id, Role::User, "hello"))
            .unwrap();

        let messages = store.load_events(id, Some("message")).unwrap();
        assert_eq!(messages.len(), 1);
        let calls = store.load_events(id, Some("tool_call")).unwrap();
        assert!(calls.is_empty());
    }

    #[test]
    fn list_tasks_counts_messages() {
        let store = EventStore::in_memory().unwrap();
        let id = start_task(&store);
        store
            .append(&Event::message(id, Role::User, "hi"))
            .unwrap();
        store
            .append(&Event::message(id, Role::Assistant, "hello"))
            .unwrap();

        let tasks = store.list_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, id);
        assert_eq!(tasks[0].message_count, 2);
        assert!(tasks[0].ended_at.is_none());

        store.append(&Event::new(id, EventKind::TaskEnd)).unwrap();
        let tasks = store.list_tasks().unwrap();
        assert!(tasks[0].ended_at.is_some());
    }

    #[test]
    fn find_task_by_prefix() {
        let store = EventStore::in_memory().unwrap();
        let id = start_task(&store);

        let prefix = &id.to_string()[..8];
        assert_eq!(store.find_task(prefix).unwrap(), id);
        assert!(store.find_task("zzzzzzzz").is_err());
    }
}
