//! Text index buffers.
//!
//! One or more unsigned integers per line, separated by whitespace and/or
//! commas. Everything after `#` on a line is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{Result, TopologyError};

/// Load a text index buffer from a file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<u16>> {
    let file = File::open(path)?;
    read(file)
}

/// Read a text index buffer.
pub fn read<R: Read>(reader: R) -> Result<Vec<u16>> {
    let mut indices = Vec::new();

    for (i, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => &line,
        };

        for token in content
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let value: u64 = token.parse().map_err(|_| TopologyError::Parse {
                line: i + 1,
                token: token.to_string(),
            })?;
            let index = u16::try_from(value).map_err(|_| TopologyError::IndexOutOfRange {
                line: i + 1,
                value,
            })?;
            indices.push(index);
        }
    }

    Ok(indices)
}
