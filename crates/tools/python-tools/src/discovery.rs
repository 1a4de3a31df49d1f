//! Locating a tool's own configuration file at or above the target directory.
//!
//! The nearest directory wins. Within one directory, candidates are tried in
//! the order given. Shared files (`setup.cfg`, `tox.ini`, `pyproject.toml`)
//! only count when they contain the tool's section header.

use std::path::{Path, PathBuf};

/// One file name a tool reads its settings from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub file: &'static str,
    /// Section header the file must contain, e.g. `[tool.mypy]`.
    pub section: Option<&'static str>,
}

const fn own(file: &'static str) -> Candidate {
    Candidate {
        file,
        section: None,
    }
}

const fn shared(file: &'static str, section: &'static str) -> Candidate {
    Candidate {
        file,
        section: Some(section),
    }
}

pub const FLAKE8_CONFIGS: &[Candidate] = &[
    own(".flake8"),
    shared("setup.cfg", "[flake8]"),
    shared("tox.ini", "[flake8]"),
];

pub const MYPY_CONFIGS: &[Candidate] = &[
    own("mypy.ini"),
    own(".mypy.ini"),
    shared("pyproject.toml", "[tool.mypy]"),
    shared("setup.cfg", "[mypy]"),
];

pub const PYTEST_CONFIGS: &[Candidate] = &[
    own("pytest.ini"),
    own(".pytest.ini"),
    shared("pyproject.toml", "[tool.pytest.ini_options]"),
    shared("tox.ini", "[pytest]"),
    shared("setup.cfg", "[tool:pytest]"),
];

/// Find the nearest matching config file for `start`, searching upwards.
pub fn find_config(start: &Path, candidates: &[Candidate]) -> Option<PathBuf> {
    let start = std::path::absolute(start).unwrap_or_else(|_| start.to_path_buf());
    start.ancestors().find_map(|dir| {
        candidates
            .iter()
            .map(|c| (dir.join(c.file), c.section))
            .find(|(path, section)| matches(path, *section))
            .map(|(path, _)| path)
    })
}

fn matches(path: &Path, section: Option<&str>) -> bool {
    if !path.is_file() {
        return false;
    }
    let Some(section) = section else {
        return true;
    };
    match std::fs::read_to_string(path) {
        Ok(body) => body.lines().any(|line| line.trim() == section),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "skipping unreadable config candidate");
            false
        }
    }
}
