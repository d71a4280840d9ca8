//! Line-based prompts for `--interactive` mode.
//!
//! [`Prompter`] is generic over its input and output so the prompt flow can
//! be driven from a byte buffer in tests. Invalid answers are reported and
//! asked again; end of input is an error.

use std::collections::HashSet;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use yansi::Paint;

use crate::formats::parse_file_formats;

/// File name used when a save prompt is answered with a directory.
pub const DEFAULT_SAVE_NAME: &str = "duplicates.json";

/// What to do with the groups after a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Remove every copy except the keep-candidate.
    Delete,
    /// Write the groups to a JSON file.
    Save,
    /// Leave everything as it is.
    Exit,
}

impl NextAction {
    fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "" | "delete" | "d" => Some(Self::Delete),
            "save" | "s" => Some(Self::Save),
            "exit" | "e" | "quit" | "q" => Some(Self::Exit),
            _ => None,
        }
    }
}

impl fmt::Display for NextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Delete => "delete",
            Self::Save => "save",
            Self::Exit => "exit",
        })
    }
}

/// Asks questions on `output` and reads answers from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Wrap an input and output stream.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{} ", question.bold())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim().to_string())
    }

    fn complain(&mut self, message: impl fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{}", message.to_string().yellow())
    }

    /// Ask for the directory to search. A blank answer means `cwd`.
    pub fn search_path(&mut self, cwd: &Path) -> io::Result<PathBuf> {
        loop {
            let answer = self.ask(
                "Enter the folder path to search in (leave blank to use current directory):",
            )?;
            let path = if answer.is_empty() {
                cwd.to_path_buf()
            } else {
                cwd.join(answer)
            };

            if path.is_dir() {
                return Ok(path);
            }
            self.complain(format_args!(
                "{} is not a directory. Please enter another path",
                path.display()
            ))?;
        }
    }

    /// Ask for an extension filter until one parses.
    pub fn file_formats(&mut self) -> io::Result<Option<HashSet<String>>> {
        loop {
            let answer = self.ask(
                "Filter by file extension? Press enter for all files, or enter comma-separated \
                 extensions (.jpg) or groups (photo, video, text, audio):",
            )?;
            match parse_file_formats(&answer) {
                Ok(formats) => return Ok(formats),
                Err(e) => self.complain(e)?,
            }
        }
    }

    /// Ask what to do with the results. A blank answer means delete.
    pub fn next_action(&mut self) -> io::Result<NextAction> {
        loop {
            let answer = self.ask("What would you like to do next? [delete/save/exit] (delete):")?;
            match NextAction::parse(&answer) {
                Some(action) => return Ok(action),
                None => self.complain(format_args!(
                    "'{answer}' is not one of delete, save, exit"
                ))?,
            }
        }
    }

    /// Ask where to save the results.
    ///
    /// Relative answers resolve against `cwd`. A directory gets
    /// [`DEFAULT_SAVE_NAME`] appended and any other path without a `json`
    /// extension gets one. Targets that already exist, or whose parent
    /// directory does not, are refused.
    pub fn save_path(&mut self, cwd: &Path) -> io::Result<PathBuf> {
        loop {
            let answer = self.ask("Enter the path and/or file name to save the file to:")?;
            let path = resolve_save_path(&cwd.join(&answer));

            if path.exists() {
                self.complain(format_args!(
                    "The file `{}` already exists. Please delete this file, or enter a new path",
                    path.display()
                ))?;
                continue;
            }

            match path.parent() {
                Some(parent) if parent.is_dir() => return Ok(path),
                parent => self.complain(format_args!(
                    "The directory {} for that file does not exist. Please create the \
                     directory, or enter a new path",
                    parent.unwrap_or(Path::new("")).display()
                ))?,
            }
        }
    }
}

/// Turn a save prompt answer into a JSON file path.
#[must_use]
pub fn resolve_save_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.join(DEFAULT_SAVE_NAME);
    }

    let has_json_suffix = path
        .extension()
        .is_some_and(|ext| ext.to_string_lossy().to_lowercase().ends_with("json"));
    if has_json_suffix {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".json");
        PathBuf::from(name)
    }
}
