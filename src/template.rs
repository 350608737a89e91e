//! Message template rendering.
//!
//! Templates use `{}`-style placeholders: `{project_name}`, `{url}`,
//! `{title}`, `{message}`, and `{tag[<key>]}` for lookups into the
//! event's tags. `{{` and `}}` render as literal braces. Rendering is
//! pure and all-or-nothing; a bad placeholder fails the whole render
//! with no partial output.

use crate::core::NotificationEvent;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder field `{0}`")]
    UnknownField(String),

    #[error("event has no tag `{0}`")]
    UnknownTag(String),

    #[error("unterminated placeholder in template")]
    Unterminated,

    #[error("stray `}}` outside a placeholder")]
    StrayBrace,
}

/// Renders `template` against an event.
///
/// # Arguments
/// * `template` - the raw template with `{}`-style placeholders
/// * `event` - the event supplying title, message, tags and url
/// * `project_name` - the host project the event belongs to
pub fn render(
    template: &str,
    event: &NotificationEvent,
    project_name: &str,
) -> Result<String, TemplateError> {
    let tags = event.tag_map();
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(TemplateError::StrayBrace),
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => field.push(ch),
                        None => return Err(TemplateError::Unterminated),
                    }
                }
                out.push_str(resolve(&field, event, project_name, &tags)?);
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Looks up one placeholder field on the event.
fn resolve<'a>(
    field: &str,
    event: &'a NotificationEvent,
    project_name: &'a str,
    tags: &HashMap<&'a str, &'a str>,
) -> Result<&'a str, TemplateError> {
    if let Some(key) = field
        .strip_prefix("tag[")
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return tags
            .get(key)
            .copied()
            .ok_or_else(|| TemplateError::UnknownTag(key.to_string()));
    }

    match field {
        "project_name" => Ok(project_name),
        "url" => Ok(&event.absolute_url),
        "title" => Ok(&event.title),
        "message" => Ok(&event.message),
        _ => Err(TemplateError::UnknownField(field.to_string())),
    }
}
