use crate::domain::entities::ResponseOutcome;
use crate::domain::value_objects::Payload;
use colored::Color;
use serde_json::{Map, Value};
use std::io::{self, Write};

const INDENT: &str = "  ";

/// Formats response payloads for the terminal.
///
/// Output depends only on the payload, the requested fields and the color
/// flag handed in at construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Field filtering applies to JSON bodies only; raw text passes through.
    pub fn render(&self, payload: &Payload, fields: Option<&str>) -> String {
        match payload {
            Payload::Text(text) => text.clone(),
            Payload::Json(value) => match fields {
                Some(fields) => self.render_value(&extract_fields(value, fields)),
                None => self.render_value(value),
            },
        }
    }

    pub fn render_value(&self, value: &Value) -> String {
        if self.color {
            let mut out = String::new();
            write_colored(&mut out, value, 0);
            out
        } else {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }

    /// Wraps `text` in ANSI codes when this renderer colors its output.
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            paint(text, color)
        } else {
            text.to_string()
        }
    }

    /// Writes an outcome: success body to `out`, error line to `err` and any
    /// error body to `out`. Returns whether the outcome was a success.
    pub fn write_outcome<O: Write, E: Write>(
        &self,
        outcome: &ResponseOutcome,
        fields: Option<&str>,
        out: &mut O,
        err: &mut E,
    ) -> io::Result<bool> {
        match outcome {
            ResponseOutcome::Success { payload, .. } => {
                writeln!(out, "{}", self.render(payload, fields))?;
                Ok(true)
            }
            ResponseOutcome::HttpError {
                status,
                reason,
                body,
            } => {
                let line = format!("HTTPError: {} {}", status.as_u16(), reason);
                writeln!(err, "{}", self.paint(&line, Color::Red))?;
                if let Some(body) = body {
                    writeln!(out, "{}", self.render(body, None))?;
                }
                Ok(false)
            }
            ResponseOutcome::TransportError { reason } => {
                let line = format!("URLError: {reason}");
                writeln!(err, "{}", self.paint(&line, Color::Red))?;
                Ok(false)
            }
        }
    }

    pub fn print_outcome(&self, outcome: &ResponseOutcome, fields: Option<&str>) -> io::Result<bool> {
        self.write_outcome(
            outcome,
            fields,
            &mut io::stdout().lock(),
            &mut io::stderr().lock(),
        )
    }
}

/// Projects `value` onto the comma-separated `fields`.
///
/// Arrays are projected element by element; missing keys (and non-object
/// elements) yield `null`. Scalars are returned unchanged.
pub fn extract_fields(value: &Value, fields: &str) -> Value {
    let names: Vec<&str> = fields.split(',').collect();
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|item| pick(item, &names)).collect()),
        Value::Object(_) => pick(value, &names),
        other => other.clone(),
    }
}

fn pick(item: &Value, names: &[&str]) -> Value {
    let mut picked = Map::new();
    for name in names {
        let value = item.get(*name).cloned().unwrap_or(Value::Null);
        picked.insert((*name).to_string(), value);
    }
    Value::Object(picked)
}

/// Mirrors `serde_json::to_string_pretty` layout, coloring keys and leaves.
fn write_colored(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_colored(out, item, depth + 1);
            }
            newline(out, depth);
            out.push(']');
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                let key = Value::String(key.clone()).to_string();
                out.push_str(&paint_bold(&key, Color::Blue));
                out.push_str(": ");
                write_colored(out, item, depth + 1);
            }
            newline(out, depth);
            out.push('}');
        }
        leaf => out.push_str(&color_leaf(leaf)),
    }
}

fn color_leaf(leaf: &Value) -> String {
    let color = match leaf {
        Value::String(_) => Color::Green,
        Value::Number(_) => Color::Yellow,
        Value::Bool(_) => Color::Magenta,
        _ => Color::BrightBlack,
    };
    paint(&leaf.to_string(), color)
}

// Escape codes are written directly so the result does not depend on
// `colored::control` state.
fn paint(text: &str, color: Color) -> String {
    format!("\x1b[{}m{text}\x1b[0m", color.to_fg_str())
}

fn paint_bold(text: &str, color: Color) -> String {
    format!("\x1b[1;{}m{text}\x1b[0m", color.to_fg_str())
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;
    use serde_json::json;

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn extracts_requested_fields_from_object() {
        let body = json!({"id": 1, "name": "bob", "extra": "z"});
        assert_eq!(
            extract_fields(&body, "id,name"),
            json!({"id": 1, "name": "bob"})
        );
    }

    #[test]
    fn missing_field_becomes_null() {
        let body = json!({"id": 1});
        assert_eq!(
            extract_fields(&body, "id,email"),
            json!({"id": 1, "email": null})
        );
    }

    #[test]
    fn extraction_maps_over_arrays_in_order() {
        let body = json!([
            {"id": 1, "name": "a", "x": 0},
            {"id": 2},
            {"id": 3, "name": "c"},
        ]);
        assert_eq!(
            extract_fields(&body, "name"),
            json!([{"name": "a"}, {"name": null}, {"name": "c"}])
        );
    }

    #[test]
    fn fields_keep_requested_order() {
        let body = json!({"a": 1, "b": 2});
        let rendered = Renderer::new(false).render(&Payload::Json(body), Some("b,a"));
        assert_eq!(rendered, "{\n  \"b\": 2,\n  \"a\": 1\n}");
    }

    #[test]
    fn raw_text_ignores_fields() {
        let payload = Payload::Text("htp yeet".into());
        assert_eq!(Renderer::new(false).render(&payload, Some("id")), "htp yeet");
        assert_eq!(Renderer::new(true).render(&payload, Some("id")), "htp yeet");
    }

    #[test]
    fn plain_output_is_two_space_pretty_json() {
        let payload = Payload::Json(json!({"user_id": 42069, "tags": ["a"], "meta": {}}));
        assert_eq!(
            Renderer::new(false).render(&payload, None),
            "{\n  \"user_id\": 42069,\n  \"tags\": [\n    \"a\"\n  ],\n  \"meta\": {}\n}"
        );
    }

    #[test]
    fn colored_output_matches_plain_layout() {
        let value = json!({
            "username": "fluffy \"f\"",
            "user_id": 42069,
            "ratio": 0.5,
            "active": true,
            "deleted_at": null,
            "roles": ["admin", {"scope": []}, []],
            "nested": {"deep": {"k": -1}},
            "empty": {},
        });

        let plain = Renderer::new(false).render_value(&value);
        let colored = Renderer::new(true).render_value(&value);
        assert!(colored.contains('\u{1b}'));
        assert_eq!(strip_ansi(&colored), plain);

        for scalar in [json!(1), json!("s"), json!([]), json!(null)] {
            assert_eq!(
                strip_ansi(&Renderer::new(true).render_value(&scalar)),
                Renderer::new(false).render_value(&scalar)
            );
        }
    }

    #[test]
    fn color_flag_ignores_global_colored_state() {
        colored::control::set_override(false);
        let rendered = Renderer::new(true).render_value(&json!({"a": 1}));
        colored::control::unset_override();

        assert!(rendered.contains("\u{1b}["));
        assert_eq!(strip_ansi(&rendered), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn non_ascii_is_written_as_utf8() {
        let value = json!({"name": "café ☕"});
        assert_eq!(
            Renderer::new(false).render_value(&value),
            "{\n  \"name\": \"café ☕\"\n}"
        );
        assert_eq!(
            strip_ansi(&Renderer::new(true).render_value(&value)),
            Renderer::new(false).render_value(&value)
        );
    }

    fn write(renderer: Renderer, outcome: &ResponseOutcome, fields: Option<&str>) -> (bool, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = renderer
            .write_outcome(outcome, fields, &mut out, &mut err)
            .unwrap();
        (
            ok,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn http_error_splits_status_line_and_body() {
        let outcome = ResponseOutcome::HttpError {
            status: StatusCode::NOT_FOUND,
            reason: "Not Found".into(),
            body: Some(Payload::Json(json!({"error": "no such user"}))),
        };

        let (ok, out, err) = write(Renderer::new(false), &outcome, Some("id"));
        assert!(!ok);
        assert_eq!(err, "HTTPError: 404 Not Found\n");
        assert_eq!(out, "{\n  \"error\": \"no such user\"\n}\n");
    }

    #[test]
    fn http_error_without_body_writes_nothing_to_stdout() {
        let outcome = ResponseOutcome::HttpError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            reason: "Internal Server Error".into(),
            body: None,
        };

        let (ok, out, err) = write(Renderer::new(false), &outcome, None);
        assert!(!ok);
        assert!(out.is_empty());
        assert_eq!(err, "HTTPError: 500 Internal Server Error\n");
    }

    #[test]
    fn transport_error_only_reports_on_stderr() {
        let outcome = ResponseOutcome::TransportError {
            reason: "Connection refused (os error 111)".into(),
        };

        let (ok, out, err) = write(Renderer::new(true), &outcome, None);
        assert!(!ok);
        assert!(out.is_empty());
        assert!(err.contains('\u{1b}'));
        assert_eq!(strip_ansi(&err), "URLError: Connection refused (os error 111)\n");
    }

    #[test]
    fn success_applies_fields() {
        let outcome = ResponseOutcome::Success {
            status: StatusCode::OK,
            payload: Payload::Json(json!([{"id": 1, "name": "a"}, {"id": 2}])),
        };

        let (ok, out, err) = write(Renderer::new(false), &outcome, Some("id"));
        assert!(ok);
        assert!(err.is_empty());
        assert_eq!(out, "[\n  {\n    \"id\": 1\n  },\n  {\n    \"id\": 2\n  }\n]\n");
    }
}
