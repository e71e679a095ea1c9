//! Post-processing of minted output.
//!
//! minted writes a TeX command appearing in the code as
//! `{\PYGZbs{}emph}`. Wrapping rewrites it as `{\wrapper{\PYGZbs{}emph}}` so
//! the document can give such commands a look of their own.

use std::path::Path;

use crate::error::{Error, Result};

/// The command prefix minted uses.
pub const MINTED_PREFIX: &str = "PYG";

/// Wraps every listed command, returning the new text and the number of
/// replacements.
pub fn wrap_commands<S: AsRef<str>>(
    text: &str,
    prefix: &str,
    wrapper: &str,
    commands: &[S],
) -> Result<(String, usize)> {
    if commands.is_empty() {
        return Err(Error::NothingToWrap);
    }
    let mut text = text.to_string();
    let mut count = 0;
    for command in commands {
        let command = command.as_ref();
        let find = format!(r"{{\{prefix}Zbs{{}}{command}}}");
        let replace = format!(r"{{\{wrapper}{{\{prefix}Zbs{{}}{command}}}}}");
        count += text.matches(&find).count();
        text = text.replace(&find, &replace);
    }
    Ok((text, count))
}

/// Wraps commands in the file at `path`, in place.
pub fn wrap_file<S: AsRef<str>>(
    path: &Path,
    prefix: &str,
    wrapper: &str,
    commands: &[S],
) -> Result<usize> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, count) = wrap_commands(&text, prefix, wrapper, commands)?;
    std::fs::write(path, text).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), count, "wrapped commands");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::{MINTED_PREFIX, wrap_commands, wrap_file};

    #[test]
    fn wraps_each_command() {
        let text = r"\PYG{k}{x} {\PYGZbs{}emph}{a} {\PYGZbs{}textbf} {\PYGZbs{}emphasis}";
        let (wrapped, count) =
            wrap_commands(text, MINTED_PREFIX, "CDRWrap", &["emph", "textbf"]).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            wrapped,
            r"\PYG{k}{x} {\CDRWrap{\PYGZbs{}emph}}{a} {\CDRWrap{\PYGZbs{}textbf}} {\PYGZbs{}emphasis}"
        );
    }

    #[test]
    fn needs_a_command() {
        let none: [&str; 0] = [];
        assert!(wrap_commands("x", MINTED_PREFIX, "W", &none).is_err());
    }

    #[test]
    fn rewrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tex");
        std::fs::write(&path, "{\\PYZbs{}foo}\n{\\PYZbs{}foo}\n").unwrap();
        assert_eq!(wrap_file(&path, "PY", "W", &["foo"]).unwrap(), 2);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\\W{\\PYZbs{}foo}}\n{\\W{\\PYZbs{}foo}}\n"
        );
    }
}
