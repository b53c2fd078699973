//! build file parsing
//!
//! a build file is either a json object (`{"Commands": [{"Name": .., "Args": [..]}]}`)
//! or a line-oriented text form:
//!
//! ```text
//! # comments run to end of line
//! MKDIR /etc /var/lib
//! COPY bin/* /usr/bin/
//! COPY ["with space", "/opt/"]
//! CHMOD -R \
//!     u+x /usr/bin
//! ```

use std::path::Path;

use crate::error::{Error, Result};
use crate::stream::read_input;
use crate::types::{Command, Tarfile};

/// read and parse a build file; `-` reads standard input
pub fn load_tarfile(path: &Path) -> Result<Tarfile> {
    let data = read_input(path)?;
    parse_tarfile(&data)
}

/// parse either form, chosen by the first non-whitespace byte
pub fn parse_tarfile(data: &[u8]) -> Result<Tarfile> {
    let text = std::str::from_utf8(data)
        .map_err(|e| Error::InvalidSpec(format!("build file is not utf-8 ({})", e)))?;
    let text = text.trim_ascii();

    if text.starts_with('{') {
        return serde_json::from_str(text)
            .map_err(|e| Error::InvalidSpec(format!("{:?} ({})", text, e)));
    }

    parse_text(text)
}

fn parse_text(text: &str) -> Result<Tarfile> {
    let text = strip_comments(text);
    let text = join_continuations(&text);
    let text = elide_json_newlines(&text);

    let mut commands = Vec::new();
    for line in text.split('\n') {
        let line = line.trim_ascii();
        if line.is_empty() {
            continue;
        }
        commands.push(parse_line(line)?);
    }

    Ok(Tarfile::new(commands))
}

fn parse_line(line: &str) -> Result<Command> {
    let invalid = || Error::InvalidSpec(format!("invalid command: {:?}", line));

    let (name, args) = line.split_once(' ').ok_or_else(invalid)?;
    let args = args.trim_ascii();
    if name.is_empty() || args.is_empty() || !name.bytes().all(|c| c.is_ascii_uppercase()) {
        return Err(invalid());
    }

    let args = if args.starts_with('[') {
        serde_json::from_str::<Vec<String>>(args)
            .map_err(|e| Error::InvalidSpec(format!("invalid command: {:?} ({})", line, e)))?
    } else {
        args.split(' ')
            .map(str::trim_ascii)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect()
    };

    Ok(Command {
        name: name.to_string(),
        args,
    })
}

/// drop everything from `#` to the end of its line, keeping the newline
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_comment = false;
    for c in text.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
                out.push(c);
            }
        } else if c == '#' {
            in_comment = true;
        } else {
            out.push(c);
        }
    }
    out
}

/// remove every backslash-newline pair
fn join_continuations(text: &str) -> String {
    text.replace("\\\n", "")
}

/// newlines between `[` and the next `]` do not end a line
fn elide_json_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_array = false;
    for c in text.chars() {
        if in_array {
            if c == '\n' {
                continue;
            }
            if c == ']' {
                in_array = false;
            }
        } else if c == '[' {
            in_array = true;
        }
        out.push(c);
    }
    out
}
