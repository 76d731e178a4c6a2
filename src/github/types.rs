use chrono::NaiveDateTime;
use serde::Deserialize;

const GITHUB_DATE: &str = "%Y-%m-%dT%H:%M:%SZ";
const DISPLAY_DATE: &str = "%d/%m/%Y %H:%M:%S";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Owner {
    pub login: String,
}

/// the slice of a repository object the `github?` route shows
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub full_name: String,
    pub id: u64,
    pub owner: Owner,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EventRepo {
    pub name: String,
}

/// one entry of `users/<user>/events/public`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub repo: EventRepo,
    pub created_at: String,
}

pub fn parse_repositories(json: &str) -> Result<Vec<Repository>, String> {
    serde_json::from_str(json).map_err(|e| e.to_string())
}

pub fn parse_events(json: &str) -> Result<Vec<Event>, String> {
    serde_json::from_str(json).map_err(|e| e.to_string())
}

/// `2024-03-01T12:30:05Z` -> `01/03/2024 12:30:05`
pub fn reformat_date(raw: &str) -> Result<String, String> {
    NaiveDateTime::parse_from_str(raw, GITHUB_DATE)
        .map(|date| date.format(DISPLAY_DATE).to_string())
        .map_err(|e| format!("Text '{}' could not be parsed: {}", raw, e))
}

pub fn render_repositories(repos: &[Repository]) -> String {
    let mut html = String::new();
    for repo in repos {
        html.push_str(&format!("Full Name: {}<br>", repo.full_name));
        html.push_str(&format!("ID: {}<br>", repo.id));
        html.push_str(&format!("Owner Login: {}<br>", repo.owner.login));
        html.push_str("<hr>");
    }
    html
}

/// fails on the first event whose date does not parse
pub fn render_events(events: &[Event]) -> Result<String, String> {
    let mut html = String::new();
    for event in events {
        let date = reformat_date(&event.created_at)?;
        html.push_str(&format!("Type: {}<br>", event.kind));
        html.push_str(&format!("Repo: {}<br>", event.repo.name));
        html.push_str(&format!("Date: {}<br>", date));
        html.push_str("<hr>");
    }
    Ok(html)
}
