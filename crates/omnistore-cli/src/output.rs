// Copyright (C) 2026  Omnistore Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Terminal output helpers
//!
//! Results go to stdout as JSON so they can be piped; status lines go to
//! stderr.

use console::style;
use serde::Serialize;

/// Print a success line to stderr with a green check mark
pub fn success(msg: &str) {
    eprintln!("{} {}", style("✔").for_stderr().green().bold(), msg);
}

/// Print an error line to stderr with a red cross
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✘").for_stderr().red().bold(), msg);
}

/// Print a warning line to stderr with a yellow marker
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("!").for_stderr().yellow().bold(), msg);
}

/// Print a key-value detail line to stderr
pub fn detail(key: &str, value: &str) {
    eprintln!("  {}: {}", key, style(value).for_stderr().cyan());
}

/// Print a value to stdout as pretty JSON
pub fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
