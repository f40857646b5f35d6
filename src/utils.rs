//! # Utility Functions Module
//!
//! Helpers for building optimizer command lines.

use std::path::Path;

/// Converts an iterable of string-like items to `Vec<String>`.
///
/// # Example
/// ```rust
/// use screenshot_compressor::utils::to_string_vec;
///
/// let threads = 4;
/// let args = to_string_vec(["--threads", &threads.to_string()]);
/// assert_eq!(args, vec!["--threads", "4"]);
/// ```
pub fn to_string_vec<T, I>(items: I) -> Vec<String>
where
    T: ToString,
    I: IntoIterator<Item = T>,
{
    items.into_iter().map(|item| item.to_string()).collect()
}

/// Builds a `Vec<String>` from heterogeneous items.
///
/// # Example
/// ```rust
/// use screenshot_compressor::args;
///
/// let threads = 4;
/// let args = args!["--recursive", "--threads", threads];
/// assert_eq!(args, vec!["--recursive", "--threads", "4"]);
/// ```
#[macro_export]
macro_rules! args {
    [$($item:expr),* $(,)?] => {
        $crate::utils::to_string_vec([$($item.to_string()),*])
    };
}

/// Render a program and its arguments as a single shell-like line.
/// Arguments containing whitespace are single-quoted.
pub fn format_command(program: &Path, args: &[String]) -> String {
    std::iter::once(program.display().to_string())
        .chain(args.iter().map(|arg| quote(arg)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '\'') {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string_vec_mixed_types() {
        let num = 8;
        let result = to_string_vec(["--threads", &num.to_string(), "--recursive"]);
        assert_eq!(result, vec!["--threads", "8", "--recursive"]);
    }

    #[test]
    fn test_to_string_vec_empty() {
        let result: Vec<String> = to_string_vec(Vec::<&str>::new());
        assert!(result.is_empty());
    }

    #[test]
    fn test_args_macro() {
        let threads = 6usize;
        let result = args!["--opt", "max", "--threads", threads];
        assert_eq!(result, vec!["--opt", "max", "--threads", "6"]);
    }

    #[test]
    fn test_format_command_quotes_spaces() {
        let args = to_string_vec(["--dir", "/home/me/Compressed screenshots", "a.png"]);
        assert_eq!(
            format_command(Path::new("/usr/bin/oxipng"), &args),
            "/usr/bin/oxipng --dir '/home/me/Compressed screenshots' a.png"
        );
    }
}
