/// Text markup interpreted by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Legacy Telegram markdown: `*bold*`, `_italic_`
    Markdown,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Markdown => "Markdown",
        }
    }
}

/// Inline button attached to a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
    /// Opens the URL in the user's browser
    Link { label: String, url: String },
    /// Opens the URL inside the chat client as a web app
    WebApp { label: String, url: String },
}

impl Button {
    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Button::Link {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn web_app(label: impl Into<String>, url: impl Into<String>) -> Self {
        Button::WebApp {
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Button::Link { url, .. } | Button::WebApp { url, .. } => url,
        }
    }

    pub fn is_web_app(&self) -> bool {
        matches!(self, Button::WebApp { .. })
    }
}

/// Outbound message: text plus zero or more button rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub rows: Vec<Vec<Button>>,
}

impl Reply {
    /// Plain text, no markup, no buttons
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
            rows: Vec::new(),
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: Some(ParseMode::Markdown),
            rows: Vec::new(),
        }
    }

    /// Append a row; empty rows are dropped
    pub fn with_row(mut self, row: Vec<Button>) -> Self {
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    pub fn has_web_app(&self) -> bool {
        self.buttons().any(Button::is_web_app)
    }
}
