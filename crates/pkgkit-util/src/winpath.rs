//! Translation between Windows, Unix and Cygwin path spellings.
//!
//! The translators work on free text: a PATH-like list, a line of a shell
//! script, an environment assignment. Anything that does not look like a
//! path is copied through untouched.

use regex_lite::Regex;

/// Mount point under which Cygwin exposes Windows drives.
pub const CYGDRIVE_PREFIX: &str = "/cygdrive";

/// Drive letter, colon, separators, then everything up to a character that
/// cannot appear in a Windows path (or a list/line separator).
const WIN_PATH_PATTERN: &str = r#"[a-zA-Z]:[/\\]+[^:*?"<>|;\r\n]*"#;

/// Direction of a path translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    WinToUnix,
    UnixToWin,
    WinToCygwin,
    CygwinToWin,
}

impl Translation {
    /// Apply this translation, using `cygdrive` as the Cygwin mount prefix.
    #[must_use]
    pub fn translate(self, text: &str, cygdrive: &str) -> String {
        match self {
            Self::WinToUnix => win_path_to_unix(text, ""),
            Self::UnixToWin => unix_path_to_win(text, ""),
            Self::WinToCygwin => win_path_to_unix(text, cygdrive),
            Self::CygwinToWin => unix_path_to_win(text, cygdrive),
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Characters that, directly before a drive letter, mean we are in the
/// middle of a word, URL or another path rather than at the start of one.
fn blocks_win_path(prev: u8) -> bool {
    prev.is_ascii_alphanumeric() || matches!(prev, b':' | b'/' | b'\\')
}

fn blocks_unix_path(prev: u8) -> bool {
    prev.is_ascii_alphanumeric() || matches!(prev, b'/' | b'\\' | b'.' | b'_' | b'-' | b'~')
}

/// Whether `next` may follow a bare drive root such as `C:\`.
fn ends_drive_root(next: Option<u8>) -> bool {
    match next {
        None => true,
        Some(b) => b == b';' || b.is_ascii_whitespace(),
    }
}

fn push_collapsed(out: &mut String, body: &str) {
    let mut prev_sep = false;
    for c in body.chars() {
        if is_separator(c) {
            if !prev_sep {
                out.push('/');
            }
            prev_sep = true;
        } else {
            out.push(c);
            prev_sep = false;
        }
    }
}

/// Convert a Windows path, or a `;`-separated list of them, to Unix form.
///
/// `C:\a\b` becomes `{root_prefix}/C/a/b`. No `/cygdrive` is added unless
/// passed as `root_prefix` (see [`win_path_to_cygwin`]). A `;` sitting
/// between two translated paths becomes `:`.
#[must_use]
pub fn win_path_to_unix(text: &str, root_prefix: &str) -> String {
    let Ok(re) = Regex::new(WIN_PATH_PATTERN) else {
        return text.to_string();
    };

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + root_prefix.len());
    let mut copied = 0;
    let mut search = 0;
    let mut after_path = false;

    while let Some(m) = re.find_at(text, search) {
        let start = m.start();
        if start > 0 && blocks_win_path(bytes[start - 1]) {
            search = start + 1;
            continue;
        }

        let mut end = m.end();
        // In `C:\a D:\b` the body runs into the next drive letter.
        if bytes.get(end) == Some(&b':') && bytes[end - 1].is_ascii_alphabetic() {
            end -= 1;
        }
        let body = &text[start + 2..end];
        // A bare drive root only counts when nothing path-like follows it.
        if body.trim_start_matches(is_separator).is_empty()
            && !(end == m.end() && ends_drive_root(bytes.get(end).copied()))
        {
            search = start + 1;
            continue;
        }

        let gap = &text[copied..start];
        if after_path && gap == ";" {
            out.push(':');
        } else {
            out.push_str(gap);
        }
        out.push_str(root_prefix);
        out.push('/');
        out.push(char::from(bytes[start]));
        push_collapsed(&mut out, body);

        copied = end;
        search = end;
        after_path = true;
    }

    out.push_str(&text[copied..]);
    out
}

/// Whether `text` is already spelled the Windows way.
///
/// Either it is a `;`-separated list, or it starts with a drive letter and
/// has no other colon.
fn is_windows_spelling(text: &str) -> bool {
    text.len() > 1
        && (text.contains(';')
            || (text.as_bytes()[1] == b':' && text.matches(':').count() == 1))
}

/// Convert a Unix path, or a `:`-separated list of them, to Windows form.
///
/// `{root_prefix}/c/a/b` becomes `c:\a\b`. Input already in Windows
/// spelling only has its forward slashes flipped. A `:` sitting between two
/// translated paths becomes `;`.
#[must_use]
pub fn unix_path_to_win(text: &str, root_prefix: &str) -> String {
    if is_windows_spelling(text) {
        return text.replace('/', "\\");
    }

    let pattern = format!(
        r#"{}/([a-zA-Z])(/[^:*?"<>|;\r\n]*)"#,
        regex_lite::escape(root_prefix)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return text.to_string();
    };

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut search = 0;
    let mut after_path = false;

    while let Some(caps) = re.captures_at(text, search) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        let start = whole.start();
        if start > 0 && blocks_unix_path(bytes[start - 1]) {
            search = start + 1;
            continue;
        }

        let gap = &text[copied..start];
        if after_path && gap == ":" {
            out.push(';');
        } else {
            out.push_str(gap);
        }
        out.push_str(&caps[1]);
        out.push(':');
        out.push_str(&caps[2].replace('/', "\\"));

        copied = whole.end();
        search = whole.end();
        after_path = true;
    }

    out.push_str(&text[copied..]);
    out
}

/// [`win_path_to_unix`] with the `/cygdrive` prefix.
#[must_use]
pub fn win_path_to_cygwin(text: &str) -> String {
    win_path_to_unix(text, CYGDRIVE_PREFIX)
}

/// [`unix_path_to_win`] for `/cygdrive/...` paths.
#[must_use]
pub fn cygwin_path_to_win(text: &str) -> String {
    unix_path_to_win(text, CYGDRIVE_PREFIX)
}

/// Apply `translator` to each `\n`-separated line of `text`.
pub fn translate_stream<F>(text: &str, translator: F) -> String
where
    F: Fn(&str) -> String,
{
    text.split('\n')
        .map(translator)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    // (windows, unix, cygwin)
    const CASES: &[(&str, &str, &str)] = &[
        (
            r"z:\miniconda\Scripts\pip.exe",
            "/z/miniconda/Scripts/pip.exe",
            "/cygdrive/z/miniconda/Scripts/pip.exe",
        ),
        (
            r"z:\miniconda;z:\Documents (x86)\pip.exe;C:\test",
            "/z/miniconda:/z/Documents (x86)/pip.exe:/C/test",
            "/cygdrive/z/miniconda:/cygdrive/z/Documents (x86)/pip.exe:/cygdrive/C/test",
        ),
    ];

    #[test]
    fn test_win_to_unix() {
        for (win, unix, _) in CASES {
            assert_eq!(win_path_to_unix(win, ""), *unix);
        }
    }

    #[test]
    fn test_unix_to_win() {
        for (win, unix, _) in CASES {
            assert_eq!(unix_path_to_win(unix, ""), *win);
        }
    }

    #[test]
    fn test_cygwin_both_ways() {
        for (win, _, cyg) in CASES {
            assert_eq!(win_path_to_cygwin(win), *cyg);
            assert_eq!(cygwin_path_to_win(cyg), *win);
        }
    }

    #[test]
    fn test_unix_round_trip_is_identity() {
        for path in ["/c/Users/me/env", "/D/pkgs/numpy-1.26/lib", "/x/a b/c.txt", "/c/"] {
            let win = unix_path_to_win(path, "");
            assert_eq!(win_path_to_unix(&win, ""), path, "via {win}");
        }
    }

    #[test]
    fn test_cygwin_round_trip_is_identity() {
        for path in ["/cygdrive/d/", "/cygdrive/c/tools/bin"] {
            let win = cygwin_path_to_win(path);
            assert_eq!(win_path_to_cygwin(&win), path, "via {win}");
        }
    }

    #[test]
    fn test_forward_slash_and_repeated_separators() {
        assert_eq!(win_path_to_unix("C:/tools//bin", ""), "/C/tools/bin");
        assert_eq!(win_path_to_unix(r"C:\\tools\bin", ""), "/C/tools/bin");
    }

    #[test]
    fn test_paths_embedded_in_text() {
        assert_eq!(
            win_path_to_unix(r#"set "PREFIX=C:\envs\py3" && run"#, ""),
            r#"set "PREFIX=/C/envs/py3" && run"#
        );
        assert_eq!(
            unix_path_to_win("export PREFIX=/c/envs/py3", ""),
            r"export PREFIX=c:\envs\py3"
        );
    }

    #[test]
    fn test_space_separated_paths_keep_drive_letter() {
        assert_eq!(win_path_to_unix(r"C:\a D:\b", ""), "/C/a /D/b");
    }

    #[test]
    fn test_urls_and_words_are_not_paths() {
        assert_eq!(win_path_to_unix("file:///C:/x", ""), "file:///C:/x");
        assert_eq!(win_path_to_unix(r"abc:\x", ""), r"abc:\x");
        assert_eq!(unix_path_to_win("/usr/b/lib", ""), "/usr/b/lib");
    }

    #[test]
    fn test_bare_drive_root() {
        assert_eq!(win_path_to_unix(r"C:\", ""), "/C/");
        assert_eq!(win_path_to_unix(r"C:\;D:\x", ""), "/C/:/D/x");
        assert_eq!(win_path_to_unix("cd C:/\nls", ""), "cd /C/\nls");
        // inside a URL or followed by more path syntax it is not a path
        assert_eq!(win_path_to_unix("file:///C:/", ""), "file:///C:/");
        assert_eq!(win_path_to_unix(r"C:\:x", ""), r"C:\:x");
    }

    #[test]
    fn test_already_windows_only_flips_slashes() {
        assert_eq!(unix_path_to_win("C:/Users/me", ""), r"C:\Users\me");
        assert_eq!(unix_path_to_win("a;b/c", ""), r"a;b\c");
    }

    #[test]
    fn test_plain_unix_paths_untouched() {
        assert_eq!(unix_path_to_win("/usr/local/bin", ""), "/usr/local/bin");
        assert_eq!(win_path_to_unix("/usr/local/bin", ""), "/usr/local/bin");
    }

    #[test]
    fn test_translate_stream() {
        let script = "@echo off\r\nset P=C:\\envs\\a\nset Q=D:\\b\n";
        let translated = translate_stream(script, win_path_to_cygwin);
        assert_eq!(
            translated,
            "@echo off\r\nset P=/cygdrive/C/envs/a\nset Q=/cygdrive/D/b\n"
        );
    }

    #[test]
    fn test_translation_enum() {
        assert_eq!(
            Translation::WinToCygwin.translate(r"c:\x", "/mnt"),
            "/mnt/c/x"
        );
        assert_eq!(Translation::CygwinToWin.translate("/mnt/c/x", "/mnt"), r"c:\x");
        assert_eq!(Translation::WinToUnix.translate(r"c:\x", "/mnt"), "/c/x");
        assert_eq!(Translation::UnixToWin.translate("/c/x", "/mnt"), r"c:\x");
    }
}
