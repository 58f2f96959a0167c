//! Placeholder expansion for prompts, greetings and chat content.
//!
//! `{{user}}` stands for the end-user's name and `{{char}}` for the
//! active character's name.

pub const USER_TOKEN: &str = "{{user}}";
pub const CHAR_TOKEN: &str = "{{char}}";

/// Replace placeholder tokens in one left-to-right pass.
///
/// A token whose replacement is `None` is left untouched. Replacement
/// text is copied verbatim and never scanned again, so a user named
/// `{{char}}` stays `{{char}}`.
pub fn expand(input: &str, user_name: Option<&str>, char_name: Option<&str>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find("{{") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match (user_name, char_name) {
            (Some(name), _) if tail.starts_with(USER_TOKEN) => {
                out.push_str(name);
                rest = &tail[USER_TOKEN.len()..];
            }
            (_, Some(name)) if tail.starts_with(CHAR_TOKEN) => {
                out.push_str(name);
                rest = &tail[CHAR_TOKEN.len()..];
            }
            _ => {
                // Advance one brace so "{{{user}}" still matches at the next offset
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
