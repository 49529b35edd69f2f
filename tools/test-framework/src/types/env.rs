/*!
   Types for exporting the discovered topology into environment variables.
*/

use core::convert::AsRef;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fs::write;
use std::path::Path;

use crate::error::Error;

/**
    This trait is implemented by data types that can export the contained
    information as environment variables.

    Using this, test framework can export them as `.env` files, which users
    can then manually `source` them in the terminal to interact with the
    test chains and relayer when the tests are suspended.
*/
pub trait ExportEnv {
    /**
       Export the environment variables using the given [`EnvWriter`].
    */
    fn export_env(&self, writer: &mut impl EnvWriter);
}

/**
   The exported environment variables are stored in a data type that
   implements this trait.
*/
pub trait EnvWriter {
    /**
       Write an environment variable with the given key and value.

       Note that overlapping keys will be overridden with the new value.
    */
    fn write_env(&mut self, key: &str, value: &str);
}

/**
   Create an [`EnvWriter`] that adds a prefix to the keys of the exported envs.
*/
pub fn prefix_writer<'a, Writer: EnvWriter>(
    prefix: &str,
    writer: &'a mut Writer,
) -> impl EnvWriter + 'a {
    PrefixEnvWriter {
        prefix: prefix.to_string(),
        writer,
    }
}

/**
   A wrapper that implements [`EnvWriter`] by adding a prefix to the key
   before writing to the underlying [`EnvWriter`].
*/
pub struct PrefixEnvWriter<'a, Writer> {
    prefix: String,
    writer: &'a mut Writer,
}

impl EnvWriter for BTreeMap<String, String> {
    fn write_env(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }
}

impl<'a, Writer: EnvWriter> EnvWriter for PrefixEnvWriter<'a, Writer> {
    fn write_env(&mut self, key: &str, value: &str) {
        self.writer
            .write_env(&format!("{}_{}", self.prefix, key), value);
    }
}

/**
   Export each element under its position, i.e. `0_KEY`, `1_KEY`, ...
*/
impl<T: ExportEnv> ExportEnv for [T] {
    fn export_env(&self, writer: &mut impl EnvWriter) {
        for (i, item) in self.iter().enumerate() {
            item.export_env(&mut prefix_writer(&i.to_string(), writer));
        }
    }
}

impl<T: ExportEnv> ExportEnv for Vec<T> {
    fn export_env(&self, writer: &mut impl EnvWriter) {
        self.as_slice().export_env(writer);
    }
}

/**
   Retrieve the environment variables exported by a type implementing
   `ExportEnv`, and export them as a string containing the variables
   in the form of `KEY=VALUE` on each line.
*/
pub fn format_env(exporter: &impl ExportEnv) -> String {
    let mut envs = BTreeMap::new();
    exporter.export_env(&mut envs);

    envs.iter()
        .map(|(key, value)| format!("{key}={value}"))
        .join("\n")
}

/**
   Retrieve the environment variables exported by a type implementing
   `ExportEnv`, and save them as a `.env` file to the given file path.
*/
pub fn write_env(path: impl AsRef<Path>, exporter: &impl ExportEnv) -> Result<(), Error> {
    write(path, format_env(exporter))?;

    Ok(())
}
