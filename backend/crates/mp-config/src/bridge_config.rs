//! Bridge-wide naming rules: how remote accounts become local identities and
//! how their display names are rendered.

use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_DISPLAYNAME_TEMPLATE, DEFAULT_USERNAME_TEMPLATE,
    DISPLAYNAME_PLACEHOLDER, UNKNOWN_USER_NAME, USERID_PLACEHOLDER, USERNAME_PLACEHOLDER,
};

use mp_core::BridgeMode;

use std::str::FromStr;

use serde::Deserialize;

/// Whether puppets publish structured contact metadata on their profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProfileMetadataMode {
    /// Ask the homeserver whether it supports arbitrary profile fields
    #[default]
    Auto,
    Enabled,
    Disabled,
}

impl FromStr for ProfileMetadataMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "enabled" | "true" => Ok(Self::Enabled),
            "disabled" | "false" => Ok(Self::Disabled),
            _ => Err(()),
        }
    }
}

/// Inputs for rendering a puppet display name
#[derive(Debug, Clone, Copy)]
pub struct DisplaynameParams<'a> {
    pub display_name: &'a str,
    pub username: &'a str,
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub mode: BridgeMode,
    /// Localpart template, `{userid}` is replaced by the decimal remote ID
    pub username_template: String,
    /// Supports `{displayname}`, `{username}` and `{userid}`
    pub displayname_template: String,
    pub profile_metadata: ProfileMetadataMode,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mode: BridgeMode::default(),
            username_template: String::from(DEFAULT_USERNAME_TEMPLATE),
            displayname_template: String::from(DEFAULT_DISPLAYNAME_TEMPLATE),
            profile_metadata: ProfileMetadataMode::default(),
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let placeholders = self.username_template.matches(USERID_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(ConfigError::bridge(format!(
                "bridge.username_template must contain {} exactly once, found {}",
                USERID_PLACEHOLDER, placeholders
            )));
        }

        let literal = self.username_template.replace(USERID_PLACEHOLDER, "");
        if let Some(c) = literal.chars().find(|c| !is_localpart_char(*c)) {
            return Err(ConfigError::bridge(format!(
                "bridge.username_template contains {c:?}, which is not allowed in a localpart"
            )));
        }

        if self.displayname_template.trim().is_empty() {
            return Err(ConfigError::bridge("bridge.displayname_template is empty"));
        }

        Ok(())
    }

    /// Render the localpart for a remote user ID (or a pattern standing in for one)
    pub fn format_username(&self, userid: &str) -> String {
        self.username_template.replace(USERID_PLACEHOLDER, userid)
    }

    /// Split the username template around `{userid}`
    pub fn username_affixes(&self) -> (&str, &str) {
        self.username_template
            .split_once(USERID_PLACEHOLDER)
            .unwrap_or((self.username_template.as_str(), ""))
    }

    /// Render a display name. `{displayname}` falls back to the username, then
    /// to a fixed placeholder, so a puppet is never left nameless.
    pub fn format_displayname(&self, params: DisplaynameParams<'_>) -> String {
        let display_name = [params.display_name, params.username]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_USER_NAME);

        let id = params.id.to_string();
        render(
            &self.displayname_template,
            &[
                (DISPLAYNAME_PLACEHOLDER, display_name),
                (USERNAME_PLACEHOLDER, params.username),
                (USERID_PLACEHOLDER, &id),
            ],
        )
    }
}

/// Single-pass placeholder substitution, so values are never re-expanded
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    'outer: while !rest.is_empty() {
        for (placeholder, value) in values {
            if let Some(tail) = rest.strip_prefix(placeholder) {
                out.push_str(value);
                rest = tail;
                continue 'outer;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}

fn is_localpart_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '=' | '-' | '/')
}
