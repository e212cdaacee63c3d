//! Minimal TwiML document builder.
//!
//! Only the verbs the voice webhook emits are modelled. Rendering follows the
//! provider's helper libraries: an XML declaration, a single `<Response>` root,
//! verbs in insertion order, text escaped for element content and attribute
//! values escaped for double-quoted attributes.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Say(String),
    Gather(Gather),
    Hangup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gather {
    pub input: String,
    pub action: String,
    pub speech_timeout: String,
}

impl Gather {
    /// Speech-only gather that posts back to `action`, ending on natural pause.
    pub fn speech(action: impl Into<String>) -> Self {
        Self {
            input: "speech".to_string(),
            action: action.into(),
            speech_timeout: "auto".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(&mut self, text: impl Into<String>) -> &mut Self {
        self.verbs.push(Verb::Say(text.into()));
        self
    }

    pub fn gather(&mut self, gather: Gather) -> &mut Self {
        self.verbs.push(Verb::Gather(gather));
        self
    }

    pub fn hangup(&mut self) -> &mut Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    pub fn to_xml(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VoiceResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        if self.verbs.is_empty() {
            return f.write_str("<Response />");
        }
        f.write_str("<Response>")?;
        for verb in &self.verbs {
            match verb {
                Verb::Say(text) => write!(f, "<Say>{}</Say>", escape_text(text))?,
                Verb::Gather(gather) => {
                    write!(
                        f,
                        r#"<Gather input="{}" action="{}" speechTimeout="{}" />"#,
                        escape_attr(&gather.input),
                        escape_attr(&gather.action),
                        escape_attr(&gather.speech_timeout),
                    )?;
                }
                Verb::Hangup => f.write_str("<Hangup />")?,
            }
        }
        f.write_str("</Response>")
    }
}

impl IntoResponse for VoiceResponse {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "text/xml")], self.to_xml()).into_response()
    }
}

fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(raw: &str) -> String {
    escape_text(raw).replace('"', "&quot;")
}
