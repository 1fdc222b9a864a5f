//! Turns a prediction payload into a view model and renders it as HTML or text.
//!
//! Every string in a [`PredictionResponse`] comes from a remote service and is
//! treated as untrusted: HTML output escapes text and attribute values, link
//! targets are limited to `http`/`https`, and text output drops control
//! characters.

use std::fmt;

use shared::protocol::{Doctor, PredictionResponse};
use url::Url;

pub const PLACEHOLDER_MESSAGE: &str = "Your results will appear here.";
pub const NO_RESULTS_MESSAGE: &str =
    "No doctors found matching your criteria. Try a broader location.";
pub const RATING_DECORATOR: &str = "⭐";
const LOCATIONS_HEADING: &str = "Doctor Locations:";

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub predicted_condition: String,
    pub specialist: String,
    pub heading: String,
    pub cards: Vec<ProviderCard>,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCard {
    pub name: String,
    pub rating: String,
    pub open_now_status: String,
    pub address: String,
    pub phone: String,
    pub website: ActionLink,
    pub map: ActionLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionLink {
    Active { label: &'static str, href: String },
    Inert { label: &'static str },
}

impl ActionLink {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active { label, .. } | Self::Inert { label } => *label,
        }
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Active { href, .. } => Some(href.as_str()),
            Self::Inert { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl ResultView {
    pub fn from_response(response: &PredictionResponse) -> Self {
        let cards = response.doctors.iter().map(ProviderCard::from_doctor).collect();
        let markers = response
            .doctors
            .iter()
            .filter_map(|doctor| {
                let (lat, lng) = doctor.coordinates()?;
                Some(MapMarker {
                    name: doctor.name.clone(),
                    lat,
                    lng,
                })
            })
            .collect();

        Self {
            predicted_condition: response.predicted_disease.clone(),
            specialist: response.specialist.clone(),
            heading: format!("Top 5 {}s near you:", response.specialist),
            cards,
            markers,
        }
    }

    pub fn has_providers(&self) -> bool {
        !self.cards.is_empty()
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<section class=\"prediction-summary\">");
        html.push_str(&format!(
            "<p class=\"predicted-condition\"><strong>Predicted Condition:</strong> {}</p>",
            escape_html(&self.predicted_condition)
        ));
        html.push_str(&format!(
            "<h3 class=\"recommended-specialist\">Recommended Specialist: <strong>{}</strong></h3>",
            escape_html(&self.specialist)
        ));
        html.push_str("</section>");
        html.push_str(&format!(
            "<h4 class=\"providers-heading\">{}</h4>",
            escape_html(&self.heading)
        ));

        if self.cards.is_empty() {
            html.push_str(&format!(
                "<p class=\"no-results\">{}</p>",
                escape_html(NO_RESULTS_MESSAGE)
            ));
            return html;
        }

        for card in &self.cards {
            card.write_html(&mut html);
        }

        if !self.markers.is_empty() {
            html.push_str(&format!(
                "<section class=\"provider-locations\"><h4>{}</h4><ul>",
                escape_html(LOCATIONS_HEADING)
            ));
            for marker in &self.markers {
                html.push_str(&format!(
                    "<li data-lat=\"{}\" data-lng=\"{}\">{}</li>",
                    marker.lat,
                    marker.lng,
                    escape_html(&marker.name)
                ));
            }
            html.push_str("</ul></section>");
        }
        html
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Predicted Condition: {}",
            sanitize_text(&self.predicted_condition)
        )?;
        writeln!(
            f,
            "Recommended Specialist: {}",
            sanitize_text(&self.specialist)
        )?;
        writeln!(f)?;
        writeln!(f, "{}", sanitize_text(&self.heading))?;

        if self.cards.is_empty() {
            return writeln!(f, "{NO_RESULTS_MESSAGE}");
        }

        for card in &self.cards {
            writeln!(f)?;
            write!(f, "{card}")?;
        }

        if !self.markers.is_empty() {
            writeln!(f)?;
            writeln!(f, "{LOCATIONS_HEADING}")?;
            for marker in &self.markers {
                writeln!(
                    f,
                    "  {} ({}, {})",
                    sanitize_text(&marker.name),
                    marker.lat,
                    marker.lng
                )?;
            }
        }
        Ok(())
    }
}

impl ProviderCard {
    pub fn from_doctor(doctor: &Doctor) -> Self {
        let website = match doctor.website.as_deref().and_then(safe_href) {
            Some(href) => ActionLink::Active {
                label: "Visit Website",
                href,
            },
            None => ActionLink::Inert {
                label: "Website N/A",
            },
        };
        let map = match safe_href(&doctor.gmaps_url) {
            Some(href) => ActionLink::Active {
                label: "View on Map",
                href,
            },
            None => ActionLink::Inert {
                label: "View on Map",
            },
        };

        Self {
            name: doctor.name.clone(),
            rating: format!("{} {RATING_DECORATOR}", doctor.rating),
            open_now_status: doctor.open_now_status.clone(),
            address: doctor.address.clone(),
            phone: doctor.phone.clone(),
            website,
            map,
        }
    }

    fn write_html(&self, html: &mut String) {
        html.push_str("<article class=\"provider-card\">");
        html.push_str(&format!(
            "<h4 class=\"provider-name\">{}</h4>",
            escape_html(&self.name)
        ));
        html.push_str(&format!(
            "<p class=\"provider-meta\"><strong>{}</strong> | {}</p>",
            escape_html(&self.rating),
            escape_html(&self.open_now_status)
        ));
        html.push_str(&format!(
            "<p class=\"provider-address\"><strong>Address:</strong> {}</p>",
            escape_html(&self.address)
        ));
        html.push_str(&format!(
            "<p class=\"provider-phone\"><strong>Phone:</strong> {}</p>",
            escape_html(&self.phone)
        ));
        html.push_str("<div class=\"provider-actions\">");
        write_link_html(html, &self.website);
        write_link_html(html, &self.map);
        html.push_str("</div></article>");
    }
}

impl fmt::Display for ProviderCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", sanitize_text(&self.name))?;
        writeln!(
            f,
            "  {} | {}",
            sanitize_text(&self.rating),
            sanitize_text(&self.open_now_status)
        )?;
        writeln!(f, "  Address: {}", sanitize_text(&self.address))?;
        writeln!(f, "  Phone: {}", sanitize_text(&self.phone))?;
        for link in [&self.website, &self.map] {
            match link.href() {
                Some(href) => writeln!(f, "  {}: {}", link.label(), sanitize_text(href))?,
                None => writeln!(f, "  {}", link.label())?,
            }
        }
        Ok(())
    }
}

fn write_link_html(html: &mut String, link: &ActionLink) {
    match link {
        ActionLink::Active { label, href } => html.push_str(&format!(
            "<a class=\"action-link\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            escape_html(href),
            escape_html(label)
        )),
        ActionLink::Inert { label } => html.push_str(&format!(
            "<span class=\"action-link disabled\" aria-disabled=\"true\">{}</span>",
            escape_html(label)
        )),
    }
}

pub fn render_error_html(message: &str) -> String {
    format!(
        "<p class=\"error-message\" role=\"alert\">{}</p>",
        escape_html(message)
    )
}

pub fn render_placeholder_html() -> String {
    format!(
        "<p class=\"placeholder\">{}</p>",
        escape_html(PLACEHOLDER_MESSAGE)
    )
}

/// Escapes text for both element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Strips control characters so remote text cannot drive a terminal.
pub fn sanitize_text(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_control()).collect()
}

fn safe_href(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = Url::parse(raw).ok()?;
    match parsed.scheme() {
        "http" | "https" => Some(raw.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
