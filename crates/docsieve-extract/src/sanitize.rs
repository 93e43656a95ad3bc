use once_cell::sync::Lazy;
use regex::Regex;

static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").unwrap());

/// Collapse newline runs to one newline, then space runs to one space.
///
/// Tabs, carriage returns and other whitespace are left alone.
pub fn sanitize<S: AsRef<str>>(text: Option<S>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    let lines = NEWLINE_RUNS.replace_all(text.as_ref(), "\n");
    SPACE_RUNS.replace_all(&lines, " ").into_owned()
}
