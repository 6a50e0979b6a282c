//! Loading a `.env` file into the process environment.
//!
//! Values run from the first `=` to the end of the line, so a mnemonic
//! credential can be written unquoted (`PRIVATE_KEY=word word word`).
//! Surrounding single or double quotes are stripped. Variables already
//! set in the process environment keep their value. A malformed line is
//! warned about and skipped; it never blocks the rest of the file.

use std::env;
use std::fs;
use std::io;
use std::path::Path;

/// Load `path` into the process environment. A missing file is not an
/// error; an unreadable or partially malformed one warns on stderr and
/// contributes what it can.
pub fn load(path: &Path) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return,
        Err(e) => {
            eprintln!(
                "Warning: {}: {}; continuing without it",
                path.display(),
                e
            );
            return;
        }
    };

    let (pairs, warnings) = parse(&contents);
    for warning in warnings {
        eprintln!("Warning: {}: {}", path.display(), warning);
    }
    for (key, value) in pairs {
        if env::var_os(&key).is_none() {
            env::set_var(&key, value);
        }
    }
}

/// Parse dotenv-style contents into key/value pairs plus warnings for
/// lines that could not be understood.
fn parse(contents: &str) -> (Vec<(String, String)>, Vec<String>) {
    let mut pairs = Vec::new();
    let mut warnings = Vec::new();

    for (index, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line).trim_start();

        let Some((key, value)) = line.split_once('=') else {
            warnings.push(format!("line {}: no '=' separator, skipped", index + 1));
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            warnings.push(format!("line {}: empty variable name, skipped", index + 1));
            continue;
        }

        pairs.push((key.to_string(), unquote(value.trim()).to_string()));
    }

    (pairs, warnings)
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
