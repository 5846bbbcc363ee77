//! Placeholder reconciliation for translated text
//!
//! Source strings carry i18next-style placeholders (`{{count}}`,
//! `{{boardName}}`) that must reach the translated string byte for byte.
//! Chat models routinely mangle them: they add spaces (`{{ count }}`), drop
//! a brace (`{count}`), or switch to another templating style
//! (`%{count}`). This module repairs what it can.
//!
//! # Example
//!
//! ```ignore
//! Source:      "Flashing {{boardName}}"
//! Translated:  "Flashen von { boardName }"
//! Reconciled:  "Flashen von {{boardName}}"
//! ```
//!
//! Repair is best-effort. When no heuristic applies the placeholder is left
//! unresolved and reported, never treated as an error.

use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern is valid"));

/// A placeholder found in a source string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Canonical form, e.g. `{{count}}`
    pub token: String,
    /// Variable name, e.g. `count`
    pub name: String,
}

impl Placeholder {
    /// Mangled spellings a model may produce, in the order they are tried.
    /// A variant is tried before any variant it contains as a substring.
    fn variants(&self) -> [String; 5] {
        let name = &self.name;
        [
            format!("{{{{ {} }}}}", name),
            format!("%{{{}}}", name),
            format!("%{{ {} }}", name),
            format!("{{{}}}", name),
            format!("{{ {} }}", name),
        ]
    }
}

/// Result of reconciling one translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Translated text with placeholders repaired where possible
    pub text: String,
    /// Canonical placeholders that are still absent from `text`
    pub unresolved: Vec<String>,
}

/// Extract the distinct placeholders of `source`, in order of first occurrence
pub fn extract_placeholders(source: &str) -> Vec<Placeholder> {
    let mut found: Vec<Placeholder> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(source) {
        let token = caps[0].to_string();
        if found.iter().any(|p| p.token == token) {
            continue;
        }
        found.push(Placeholder {
            token,
            name: caps[1].to_string(),
        });
    }
    found
}

/// True for text that is nothing but a placeholder, e.g. `{{count}}`
pub fn is_placeholder_only(text: &str) -> bool {
    text.starts_with("{{") && text.ends_with("}}")
}

/// Text that must not be sent to a provider: a bare placeholder, or fewer
/// than two characters
pub fn should_bypass_translation(text: &str) -> bool {
    is_placeholder_only(text) || text.chars().count() < 2
}

/// Make every placeholder of `source` appear verbatim in `translated`
pub fn reconcile(source: &str, translated: &str) -> String {
    reconcile_detailed(source, translated).text
}

/// Like [`reconcile`], also reporting placeholders that could not be restored
pub fn reconcile_detailed(source: &str, translated: &str) -> Reconciled {
    let placeholders = extract_placeholders(source);
    let mut result = translated.to_string();
    let mut unresolved = Vec::new();

    for placeholder in &placeholders {
        if result.contains(&placeholder.token) {
            continue;
        }

        if let Some(variant) = placeholder
            .variants()
            .into_iter()
            .find(|variant| result.contains(variant.as_str()))
        {
            result = result.replace(&variant, &placeholder.token);
            continue;
        }

        // Last resort: the model left the surrounding text untouched, so
        // put the untranslated source back in its place.
        let fragment = source.replacen(&placeholder.token, "", 1);
        if !fragment.is_empty() && result.contains(&fragment) {
            result = result.replacen(&fragment, source, 1);
        }

        if !result.contains(&placeholder.token) {
            unresolved.push(placeholder.token.clone());
        }
    }

    Reconciled {
        text: result,
        unresolved,
    }
}
