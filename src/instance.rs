use crate::board::Board;
use std::fmt;
use std::fs;
use std::io;

/// Error type for instance loading.
#[derive(Debug)]
pub enum InstanceError {
    /// IO error when reading from file
    Io(io::Error),
    /// Malformed instance content
    Invalid(String),
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceError::Io(err) => write!(f, "IO error: {}", err),
            InstanceError::Invalid(msg) => write!(f, "Invalid instance: {}", msg),
        }
    }
}

impl From<io::Error> for InstanceError {
    fn from(err: io::Error) -> Self {
        InstanceError::Io(err)
    }
}

impl From<String> for InstanceError {
    fn from(err: String) -> Self {
        InstanceError::Invalid(err)
    }
}

/// A solve instance: an initial configuration and the goal it must reach.
#[derive(Debug, Clone)]
pub struct Instance {
    pub initial: Board,
    pub goal: Board,
}

impl Instance {
    /// Parse an instance from text: three rows of four labels for the
    /// initial board, a blank line, then three rows for the goal board.
    pub fn from_text(contents: &str) -> Result<Self, InstanceError> {
        let mut blocks: Vec<String> = Vec::new();
        let mut current = String::new();

        for line in contents.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    blocks.push(current.clone());
                    current.clear();
                }
                continue;
            }
            current.push_str(line);
            current.push('\n');
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        if blocks.len() != 2 {
            return Err(InstanceError::Invalid(format!(
                "expected an initial and a goal board, found {} board block(s)",
                blocks.len()
            )));
        }

        let initial = Board::from_text(&blocks[0]).map_err(|e| format!("initial board: {}", e))?;
        let goal = Board::from_text(&blocks[1]).map_err(|e| format!("goal board: {}", e))?;

        Ok(Instance { initial, goal })
    }

    /// Parse an instance from a text file.
    pub fn from_file(path: &str) -> Result<Self, InstanceError> {
        let contents = fs::read_to_string(path)?;
        Self::from_text(&contents)
    }
}
