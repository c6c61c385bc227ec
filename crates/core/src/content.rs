//! Popup contents and their rendering.

use nextbus_api_types::DepartureRecord;

use crate::config::Messages;

const TIME_FORMAT: &str = "%H:%M";

/// What a popup shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PopupContent {
    /// The startup hint on the self marker.
    Hint,

    /// Stops or departures could not be fetched.
    Unavailable,

    /// Upcoming departures of a stop.
    Departures(DepartureBoard),
}

impl PopupContent {
    pub fn to_html(&self, messages: &Messages) -> String {
        match self {
            PopupContent::Hint => escape(&messages.hint),
            PopupContent::Unavailable => format!("<p>{}</p>", escape(&messages.unavailable)),
            PopupContent::Departures(board) => board.to_html(messages),
        }
    }

    pub fn to_text(&self, messages: &Messages) -> String {
        match self {
            PopupContent::Hint => messages.hint.clone(),
            PopupContent::Unavailable => messages.unavailable.clone(),
            PopupContent::Departures(board) => board.to_text(messages),
        }
    }
}

/// Departures of one stop, in the order the service returned them.
///
/// An empty board renders the "no departures" message and no attribution;
/// a non-empty one ends with exactly one attribution line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepartureBoard {
    departures: Vec<DepartureRecord>,
}

impl DepartureBoard {
    pub fn from_records(departures: Vec<DepartureRecord>) -> Self {
        Self { departures }
    }

    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.departures.len()
    }

    pub fn departures(&self) -> &[DepartureRecord] {
        &self.departures
    }

    /// One `"<name> <HH:MM>[ → <direction>]"` line per departure.
    pub fn lines(&self) -> Vec<String> {
        self.departures
            .iter()
            .map(|departure| {
                let mut line = format!("{} {}", departure.name, departure.time.format(TIME_FORMAT));
                if let Some(direction) = departure.direction() {
                    line.push_str(" → ");
                    line.push_str(direction);
                }
                line
            })
            .collect()
    }

    pub fn to_text(&self, messages: &Messages) -> String {
        if self.is_empty() {
            return messages.no_departures.clone();
        }

        let mut lines = self.lines();
        lines.push(messages.attribution.clone());
        lines.join("\n")
    }

    pub fn to_html(&self, messages: &Messages) -> String {
        if self.is_empty() {
            return format!("<p>{}</p>", escape(&messages.no_departures));
        }

        let mut html = String::new();
        for departure in &self.departures {
            html.push_str(&format!(
                "<p><strong>{}</strong> {}",
                escape(&departure.name),
                departure.time.format(TIME_FORMAT)
            ));
            if let Some(direction) = departure.direction() {
                html.push_str(" → ");
                html.push_str(&escape(direction));
            }
            html.push_str("</p>");
        }

        let attribution = match &messages.attribution_url {
            Some(url) => format!("<a href=\"{}\">{}</a>", escape(url), escape(&messages.attribution)),
            None => escape(&messages.attribution),
        };
        html.push_str(&format!("<p style=\"font-size: 75%;\">{}</p>", attribution));
        html
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn departure(name: &str, time: (u32, u32), direction: Option<&str>) -> DepartureRecord {
        DepartureRecord {
            name: name.into(),
            time: NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
            direction: direction.map(Into::into),
            has_direction: direction.map(|_| true),
        }
    }

    #[test]
    fn test_empty_board_has_fallback_and_no_attribution() {
        let messages = Messages::default();
        let board = DepartureBoard::from_records(Vec::new());

        assert_eq!(board.to_text(&messages), messages.no_departures);
        let html = board.to_html(&messages);
        assert!(html.contains(&messages.no_departures));
        assert!(!html.contains(&messages.attribution));
    }

    #[test]
    fn test_lines_and_single_attribution() {
        let messages = Messages::default();
        let board = DepartureBoard::from_records(vec![
            departure("Bus 2A", (21, 5), Some("Skejby")),
            departure("Bus 3A", (21, 12), None),
        ]);

        assert_eq!(board.lines(), vec!["Bus 2A 21:05 → Skejby", "Bus 3A 21:12"]);

        let text = board.to_text(&messages);
        assert_eq!(text.matches(&messages.attribution).count(), 1);
        assert!(text.ends_with(&messages.attribution));

        let html = board.to_html(&messages);
        assert_eq!(html.matches(&messages.attribution).count(), 1);
        assert!(html.starts_with("<p><strong>Bus 2A</strong> 21:05 → Skejby</p>"));
    }

    #[test]
    fn test_html_escapes_service_text() {
        let messages = Messages::default();
        let board = DepartureBoard::from_records(vec![departure("<b>Bus</b>", (8, 0), Some("A & B"))]);

        let html = board.to_html(&messages);
        assert!(html.contains("&lt;b&gt;Bus&lt;/b&gt;"));
        assert!(html.contains("A &amp; B"));
    }

    #[test]
    fn test_tooltip_contents() {
        let messages = Messages::default();
        assert_eq!(PopupContent::Hint.to_text(&messages), "Du kan flytte mig!");
        assert_eq!(
            PopupContent::Unavailable.to_html(&messages),
            "<p>Undskyld! Jeg kan ikke læse afgangstavlen lige nu.</p>"
        );
    }
}
