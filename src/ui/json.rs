//! NDJSON output: one JSON object per line on stdout

use std::io::{self, Write};

use serde_json::{Map, Value};

/// Write a single NDJSON event.
pub fn write_event(out: &mut impl Write, event: &Value) -> io::Result<()> {
    let line = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Build `{"event": <event>, "command": <command>, ...fields}`.
///
/// `fields` must be a JSON object; anything else is ignored.
pub fn event(event: &str, command: &str, fields: Value) -> Value {
    let mut map = Map::new();
    map.insert("event".to_string(), Value::from(event));
    map.insert("command".to_string(), Value::from(command));
    if let Value::Object(extra) = fields {
        map.extend(extra);
    }
    Value::Object(map)
}

/// Convenience helper that writes to stdout.
pub fn emit(event: Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, &event)
}
