//! `{placeholder}` expansion for message bodies

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{Local, NaiveDateTime};
use regex::{Captures, Regex};
use tracing::debug;

use crate::api::SlackApi;
use crate::error::Result;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("valid placeholder regex"));

/// Shown for `{user}` when `auth.test` carries no user name
pub const UNKNOWN_USER: &str = "unknown";

/// Values available to a template at send time
#[derive(Debug, Clone)]
pub struct TemplateVariables {
    values: HashMap<&'static str, String>,
}

impl TemplateVariables {
    pub fn new(now: NaiveDateTime, user: Option<&str>) -> Self {
        let date = now.format("%Y-%m-%d").to_string();
        let time = now.format("%H:%M").to_string();
        let user = user
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(UNKNOWN_USER)
            .to_string();

        let mut values = HashMap::new();
        values.insert("datetime", format!("{} {}", date, time));
        values.insert("date", date);
        values.insert("time", time);
        values.insert("user", user);
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Replace every known `{key}`; unknown keys are left as written
    pub fn render(&self, message: &str) -> String {
        PLACEHOLDER
            .replace_all(message, |caps: &Captures| match self.get(&caps[1]) {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Expand placeholders using the current local time and the token's user
pub async fn expand_variables<A: SlackApi + ?Sized>(message: &str, api: &A) -> Result<String> {
    let identity = api.auth_test().await?;
    let variables = TemplateVariables::new(Local::now().naive_local(), identity.user.as_deref());
    let rendered = variables.render(message);
    debug!("Expanded message ({} -> {} chars)", message.len(), rendered.len());
    Ok(rendered)
}
