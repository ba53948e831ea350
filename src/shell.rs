//! POSIX shell quoting for displaying commands.
//!
//! Commands are always executed from an argument vector. Quoting is only
//! used to print a command line that a user can copy into a shell.

use std::borrow::Cow;

fn is_safe(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | ',' | '=' | '@' | '%' | '+')
}

/// Wrap `arg` in single quotes, escaping embedded single quotes.
pub fn quote_always(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Quote `arg` only if it contains characters the shell would interpret.
pub fn quote(arg: &str) -> Cow<'_, str> {
    if !arg.is_empty() && arg.chars().all(is_safe) {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(quote_always(arg))
    }
}

/// Render an argument vector as a single shell command line.
pub fn join<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| quote(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
