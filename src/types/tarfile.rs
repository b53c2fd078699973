use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ModeChange;
use crate::error::{Error, Result};

/// a parsed build file: commands in declaration order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tarfile {
    #[serde(rename = "Commands", alias = "commands", default)]
    pub commands: Vec<Command>,
}

/// a single named command with its raw string arguments
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(rename = "Args", alias = "args", default)]
    pub args: Vec<String>,
}

impl Command {
    pub fn new<S: Into<String>>(name: impl Into<String>, args: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// the directives a build file may use
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Directive {
    Mkdir,
    Copy,
    Chmod,
    Chown,
}

impl Directive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Directive::Mkdir => "MKDIR",
            Directive::Copy => "COPY",
            Directive::Chmod => "CHMOD",
            Directive::Chown => "CHOWN",
        }
    }

    /// usage line reported when arguments have the wrong shape
    pub fn usage(&self) -> &'static str {
        match self {
            Directive::Mkdir => "MKDIR <path>...",
            Directive::Copy => "COPY <src>... <dest>",
            Directive::Chmod => "CHMOD [-R] <mode> <glob>...",
            Directive::Chown => "CHOWN [-R] (<user> | <user>:<group> | :<group>) <glob>...",
        }
    }
}

impl FromStr for Directive {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MKDIR" => Ok(Directive::Mkdir),
            "COPY" => Ok(Directive::Copy),
            "CHMOD" => Ok(Directive::Chmod),
            "CHOWN" => Ok(Directive::Chown),
            _ => Err(Error::InvalidSpec(format!("invalid command {:?}", s))),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Tarfile {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    /// check every command before any of them runs
    ///
    /// CHMOD and CHOWN need a mode or owner followed by at least one glob,
    /// and a CHMOD mode must parse. a single-argument COPY is expanded to copy the entry into place under
    /// the same name. returns the directive of each command, in order.
    pub fn validate(&mut self) -> Result<Vec<Directive>> {
        self.commands.iter_mut().map(validate_command).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn validate_command(cmd: &mut Command) -> Result<Directive> {
    let directive: Directive = cmd.name.parse()?;
    if cmd.args.is_empty() {
        return Err(Error::InvalidSpec(format!(
            "invalid command: {:?} requires arguments",
            cmd.name
        )));
    }
    match directive {
        Directive::Copy if cmd.args.len() == 1 => {
            let src = cmd.args[0].clone();
            cmd.args.push(src);
        }
        Directive::Chmod | Directive::Chown => {
            let usage = || Error::Usage(directive.usage().to_string());
            let (_, args) = strip_recursive(&cmd.args);
            let (first, globs) = args.split_first().ok_or_else(usage)?;
            if globs.is_empty() {
                return Err(usage());
            }
            if directive == Directive::Chmod {
                first.parse::<ModeChange>().map_err(|_| usage())?;
            }
        }
        Directive::Mkdir | Directive::Copy => {}
    }
    Ok(directive)
}

/// split a leading `-R` off CHMOD/CHOWN arguments
pub(crate) fn strip_recursive(args: &[String]) -> (bool, &[String]) {
    match args.split_first() {
        Some((flag, rest)) if flag == "-R" => (true, rest),
        _ => (false, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_known_directives() {
        let mut spec = Tarfile::new(vec![
            Command::new("MKDIR", ["a"]),
            Command::new("COPY", ["a", "b"]),
            Command::new("CHMOD", ["0755", "a"]),
            Command::new("CHOWN", ["app", "a"]),
        ]);
        let directives = spec.validate().unwrap();
        assert_eq!(
            directives,
            vec![
                Directive::Mkdir,
                Directive::Copy,
                Directive::Chmod,
                Directive::Chown
            ]
        );
    }

    #[test]
    fn test_validate_expands_single_copy() {
        let mut spec = Tarfile::new(vec![Command::new("COPY", ["etc"])]);
        spec.validate().unwrap();
        assert_eq!(spec.commands[0].args, vec!["etc", "etc"]);
    }

    #[test]
    fn test_validate_rejects_unknown() {
        let mut spec = Tarfile::new(vec![
            Command::new("MKDIR", ["a"]),
            Command::new("DELETE", ["a"]),
        ]);
        let err = spec.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidSpec(ref m) if m.contains("DELETE")));
    }

    #[test]
    fn test_validate_rejects_missing_args() {
        for name in ["MKDIR", "COPY", "CHMOD", "CHOWN"] {
            let mut spec = Tarfile::new(vec![Command::new(name, Vec::<String>::new())]);
            assert!(spec.validate().is_err(), "{name} without args should fail");
        }
    }

    #[test]
    fn test_validate_mode_and_owner_shape() {
        for (name, args) in [
            ("CHMOD", vec!["0755"]),
            ("CHMOD", vec!["-R", "0755"]),
            ("CHMOD", vec!["-R"]),
            ("CHMOD", vec!["rwx", "bin"]),
            ("CHOWN", vec!["app"]),
            ("CHOWN", vec!["-R", "app:app"]),
        ] {
            let mut spec = Tarfile::new(vec![Command::new(name, args.clone())]);
            match spec.validate().unwrap_err() {
                Error::Usage(msg) => assert!(msg.starts_with(name), "{msg}"),
                other => panic!("{name} {args:?}: unexpected {other:?}"),
            }
        }

        let mut spec = Tarfile::new(vec![
            Command::new("CHMOD", ["-R", "u+x", "bin", "sbin"]),
            Command::new("CHOWN", [":staff", "srv"]),
        ]);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_strip_recursive() {
        let a: Vec<String> = vec!["-R".into(), "x".into()];
        assert_eq!(strip_recursive(&a), (true, &a[1..]));
        let b: Vec<String> = vec!["x".into(), "-R".into()];
        assert_eq!(strip_recursive(&b), (false, &b[..]));
    }

    #[test]
    fn test_json_field_names() {
        let spec = Tarfile::new(vec![Command::new("COPY", ["a", "b"])]);
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"Commands":[{"Name":"COPY","Args":["a","b"]}]}"#);
    }

    #[test]
    fn test_command_display() {
        assert_eq!(
            Command::new("CHMOD", ["-R", "0755", "bin"]).to_string(),
            "CHMOD -R 0755 bin"
        );
    }

    #[test]
    fn test_directive_roundtrip() {
        for d in [
            Directive::Mkdir,
            Directive::Copy,
            Directive::Chmod,
            Directive::Chown,
        ] {
            assert_eq!(d.as_str().parse::<Directive>().unwrap(), d);
        }
        assert!("copy".parse::<Directive>().is_err());
    }
}
