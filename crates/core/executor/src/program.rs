//! Programs that can be executed by the Intcode machine.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Memory;

/// A program that can be executed by the Intcode machine.
///
/// Holds the initial memory image. Every run works on its own copy of the image, so a `Program`
/// can be shared freely between runs and threads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// The initial memory image.
    pub image: Vec<i64>,
}

/// An error encountered while loading a program.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source file could not be read.
    #[error("failed to read program {path}: {source}")]
    Io {
        /// The path that was read.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The source contained no integers.
    #[error("program source is empty")]
    Empty,
    /// A token was not a signed decimal integer.
    #[error("token {index} is not an integer: {token:?}")]
    InvalidToken {
        /// The 0-based position of the token.
        index: usize,
        /// The offending text.
        token: String,
    },
    /// A patch targeted a cell the machine can never address.
    #[error("patch address {address} is out of range")]
    PatchOutOfRange {
        /// The requested address.
        address: usize,
    },
}

impl Program {
    /// Create a new [Program].
    #[must_use]
    pub fn new(image: Vec<i64>) -> Self {
        Self { image }
    }

    /// Load a program from a file containing a single line of comma-separated integers.
    ///
    /// Only the first line is considered.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        source.lines().next().unwrap_or_default().parse()
    }

    /// A fresh copy of the initial image, ready to be executed.
    #[must_use]
    pub fn memory_image(&self) -> Memory {
        Memory::new(self.image.clone())
    }

    /// Return a copy of the program with the cell at `address` replaced by `value`.
    ///
    /// The image is extended with zeroes if `address` is past the end. Addresses the machine
    /// could never reach are rejected.
    pub fn with_patch(&self, address: usize, value: i64) -> Result<Self, LoadError> {
        if address >= Memory::MAX_LEN {
            return Err(LoadError::PatchOutOfRange { address });
        }
        let mut image = self.image.clone();
        if address >= image.len() {
            image.resize(address + 1, 0);
        }
        image[address] = value;
        Ok(Self { image })
    }

    /// The number of cells in the image.
    #[must_use]
    pub fn len(&self) -> usize {
        self.image.len()
    }

    /// Whether the image is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }
}

impl FromStr for Program {
    type Err = LoadError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let source = source.trim();
        if source.is_empty() {
            return Err(LoadError::Empty);
        }
        let image = source
            .split(',')
            .enumerate()
            .map(|(index, token)| {
                let token = token.trim();
                token
                    .parse::<i64>()
                    .map_err(|_| LoadError::InvalidToken { index, token: token.to_string() })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { image })
    }
}

impl From<Vec<i64>> for Program {
    fn from(image: Vec<i64>) -> Self {
        Self::new(image)
    }
}

impl From<&[i64]> for Program {
    fn from(image: &[i64]) -> Self {
        Self::new(image.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse() {
        let program: Program = "1,9,10,3,2,3,11,0,99,30,40,50\n".parse().unwrap();
        assert_eq!(program.image, vec![1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50]);
    }

    #[test]
    fn test_parse_negative_and_large() {
        let program: Program = "104,1125899906842624,99,-7".parse().unwrap();
        assert_eq!(program.image, vec![104, 1_125_899_906_842_624, 99, -7]);
    }

    #[test]
    fn test_parse_trims_tokens() {
        let program: Program = " 1, 0 ,0,0,99 ".parse().unwrap();
        assert_eq!(program.len(), 5);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("".parse::<Program>(), Err(LoadError::Empty)));
        assert!(matches!("\n".parse::<Program>(), Err(LoadError::Empty)));
        match "1,2,x,4".parse::<Program>() {
            Err(LoadError::InvalidToken { index, token }) => {
                assert_eq!(index, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert!(matches!("1,,2".parse::<Program>(), Err(LoadError::InvalidToken { index: 1, .. })));
    }

    #[test]
    fn test_from_file_reads_first_line() {
        let path = std::env::temp_dir().join(format!("intcode-program-{}.txt", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "3,0,4,0,99").unwrap();
        writeln!(file, "not part of the program").unwrap();
        drop(file);

        let program = Program::from_file(&path).unwrap();
        assert_eq!(program.image, vec![3, 0, 4, 0, 99]);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_missing_file() {
        let err = Program::from_file("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn test_memory_image_is_a_copy() {
        let program = Program::new(vec![1, 2, 3]);
        let mut memory = program.memory_image();
        memory.write(0, 100).unwrap();
        assert_eq!(program.image, vec![1, 2, 3]);
        assert_eq!(program.memory_image().as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_with_patch() {
        let program = Program::new(vec![1, 2, 3]);
        assert_eq!(program.with_patch(0, 2).unwrap().image, vec![2, 2, 3]);
        assert_eq!(program.with_patch(4, 9).unwrap().image, vec![1, 2, 3, 0, 9]);
        assert_eq!(program.image, vec![1, 2, 3]);
    }

    #[test]
    fn test_with_patch_out_of_range() {
        let program = Program::new(vec![99]);
        for address in [Memory::MAX_LEN, usize::MAX] {
            let err = program.with_patch(address, 1).unwrap_err();
            assert!(matches!(err, LoadError::PatchOutOfRange { address: a } if a == address));
        }
        assert_eq!(program.image, vec![99]);
    }
}
