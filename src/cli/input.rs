use std::io::{self, Read};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read expression file '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read expression from stdin: {0}")]
    Stdin(#[source] io::Error),
}

/// Resolve a command line expression argument
///
/// `-` reads standard input, `@path` reads a file, anything else is the
/// expression itself.
pub fn read_input(argument: &str) -> Result<String, InputError> {
    if argument == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(InputError::Stdin)?;
        return Ok(text);
    }

    match argument.strip_prefix('@') {
        Some(path) => {
            let path = PathBuf::from(path);
            std::fs::read_to_string(&path).map_err(|source| InputError::File { path, source })
        }
        None => Ok(argument.to_string()),
    }
}
