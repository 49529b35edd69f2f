/*!
   Running external commands, such as the relayer CLI, and decoding
   their output.
*/

use eyre::eyre;
use serde::de::DeserializeOwned;
use std::process::Command;
use std::str;
use tracing::{debug, trace};

use crate::error::{handle_exec_error, handle_generic_error, Error};

pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

pub fn simple_exec(desc: &str, command_path: &str, args: &[&str]) -> Result<ExecOutput, Error> {
    debug!(
        "Executing command for {}: {} {}",
        desc,
        command_path,
        itertools::join(args, " ")
    );

    let output = Command::new(command_path)
        .args(args)
        .output()
        .map_err(handle_exec_error(command_path))?;

    let stdout = str::from_utf8(&output.stdout)
        .map_err(handle_generic_error)?
        .to_string();

    let stderr = str::from_utf8(&output.stderr)
        .map_err(handle_generic_error)?
        .to_string();

    if output.status.success() {
        trace!(
            "command for {} executed successfully with stdout: {}, stderr: {}",
            desc,
            stdout,
            stderr
        );

        Ok(ExecOutput { stdout, stderr })
    } else {
        Err(Error::generic(eyre!(
            "command for {} exited with error status {:?} and message: {}",
            desc,
            output.status.code(),
            stderr
        )))
    }
}

/**
   Decode output that carries one JSON document per line, as printed by
   the query commands of the relayer CLI. Blank lines are skipped.
*/
pub fn parse_json_lines<T: DeserializeOwned>(output: &str) -> Result<Vec<T>, Error> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).map_err(handle_generic_error))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Entry {
        id: String,
    }

    #[test]
    fn parses_each_line() {
        let output = "{\"id\":\"a\"}\n\n  {\"id\":\"b\"}  \n";

        let entries: Vec<Entry> = parse_json_lines(output).unwrap();

        assert_eq!(
            entries,
            vec![
                Entry { id: "a".to_string() },
                Entry { id: "b".to_string() }
            ]
        );
    }

    #[test]
    fn empty_output_has_no_entries() {
        let entries: Vec<Entry> = parse_json_lines("").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn invalid_line_fails() {
        assert!(parse_json_lines::<Entry>("{\"id\":\"a\"}\nnot json").is_err());
    }

    #[test]
    fn missing_command_is_reported() {
        let err = simple_exec("missing", "surely-not-a-command-on-path", &[]).err();
        assert!(err.is_some());
    }
}
