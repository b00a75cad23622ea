//! Wire-token ⇄ display-name transcoding.
//!
//! Chat networks embed references in message text as opaque tokens:
//! `<@U123>` for users, `<#C42|general>` for channels, `<!everyone>` for
//! broadcasts, `<https://…|label>` for links. Everything here is a pure text
//! transform over an injected [`Directory`]; a failed lookup degrades to the
//! raw id rather than dropping the token.
//!
//! Each token occurrence is replaced exactly once and replaced text is never
//! re-scanned, so a display name that happens to look like a token cannot
//! trigger a second round of substitution.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::directory::Directory;

/// Any `<...>` wire token: optional `@`/`#`/`!` sigil, body, optional label.
static WIRE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([@#!])?([^>|]+)(?:\|([^>]+))?>").unwrap());

/// A lone user reference, as typed as a command target.
static USER_TARGET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<@(\w+)>$").unwrap());

/// A lone channel reference, optionally carrying its name after `|`.
static CHANNEL_TARGET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<#(\w+)\|?(\w*)>$").unwrap());

/// `@name` / `#name` words in display text, for the encode direction.
static DISPLAY_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"([@#])(\w+)").unwrap());

/// Broadcast keywords the network understands without a directory entry.
const BROADCAST_WORDS: [&str; 4] = ["channel", "group", "everyone", "here"];

/// Replace every wire token in `text` with its display form.
///
/// `<@ID>` → `@name`, `<#ID|name>` → `#name`, `<!word>` → `@word` for the
/// broadcast set (other `!` tokens are left intact), and bare link tokens
/// lose their `mailto:` prefix and render as `label (link)` when labeled.
pub fn render(text: &str, dir: &dyn Directory) -> String {
    let mut out = text.to_string();

    let tokens: Vec<(String, Option<String>, String, Option<String>)> = WIRE_TOKEN
        .captures_iter(text)
        .map(|cap| {
            (
                cap[0].to_string(),
                cap.get(1).map(|m| m.as_str().to_string()),
                cap[2].to_string(),
                cap.get(3).map(|m| m.as_str().to_string()),
            )
        })
        .collect();

    for (whole, sigil, body, label) in tokens {
        let replacement = match sigil.as_deref() {
            Some("@") => {
                let name = dir.user_name(&body).unwrap_or(body);
                format!("@{name}")
            }
            Some("#") => {
                let name = dir.channel_name(&body).unwrap_or(body);
                format!("#{name}")
            }
            Some("!") => {
                if BROADCAST_WORDS.contains(&body.as_str()) {
                    format!("@{body}")
                } else {
                    continue;
                }
            }
            _ => {
                let link = body.replace("mailto:", "");
                match label {
                    Some(label) if !label.is_empty() => format!("{label} ({link})"),
                    _ => link,
                }
            }
        };
        out = out.replacen(&whole, &replacement, 1);
    }

    out
}

/// Inverse of [`render`]: wrap `@name`/`#name` words back into wire tokens.
///
/// Broadcast words are always wrapped (`@everyone` → `<!everyone>`), even
/// with no directory entry. Names the directory cannot resolve stay literal.
pub fn encode(text: &str, dir: &dyn Directory) -> String {
    DISPLAY_REF
        .replace_all(text, |cap: &regex::Captures<'_>| {
            let name = &cap[2];
            match &cap[1] {
                "@" => {
                    if BROADCAST_WORDS.contains(&name) {
                        format!("<!{name}>")
                    } else if let Some(id) = dir.user_id(name) {
                        format!("<@{id}>")
                    } else {
                        cap[0].to_string()
                    }
                }
                _ => {
                    if let Some(id) = dir.channel_id(name) {
                        format!("<#{id}|{name}>")
                    } else {
                        cap[0].to_string()
                    }
                }
            }
        })
        .into_owned()
}

/// Normalize a single command target to its canonical store key.
///
/// A lone `<@ID>` or `<#ID|name>` token resolves to the referent's display
/// name (falling back to the raw id on a directory miss); anything else
/// passes through. The result is always trimmed and lower-cased, so raw
/// names and mentions of the same referent collapse to one key.
pub fn resolve_target(token: &str, dir: &dyn Directory) -> String {
    let token = token.trim();

    let resolved = if let Some(cap) = USER_TARGET.captures(token) {
        dir.user_name(&cap[1]).unwrap_or_else(|| cap[1].to_string())
    } else if let Some(cap) = CHANNEL_TARGET.captures(token) {
        dir.channel_name(&cap[1])
            .unwrap_or_else(|| cap[1].to_string())
    } else {
        token.to_string()
    };

    resolved.trim().to_lowercase()
}
