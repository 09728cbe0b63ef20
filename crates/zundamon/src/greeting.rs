//! Zundamon's self-introduction.

/// What Zundamon says when asked to introduce itself.
pub const GREETING: &str = "ぼくはずんだもん！ずんだの精霊なのだ！よろしくなのだ！";

/// Display label for the greeting.
pub const GREETING_NAME: &str = "ずんだもんの挨拶";

/// Longer description of the greeting.
pub const GREETING_DESCRIPTION: &str = "ずんだもんが挨拶をするのだ！";

pub fn greeting() -> &'static str {
    tracing::info!("Returning greeting: {GREETING}");
    GREETING
}
