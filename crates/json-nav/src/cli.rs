//! Logic behind the `json-nav` binary.
//!
//! The binary only parses arguments and does I/O; every command is run here
//! against the input text so it can be tested without a process.

use clap::Subcommand;
use json_nav_path::{parse_validated, Path};

use crate::address;
use crate::codec::{Codec, JsonCodec};
use crate::config::EditorConfig;
use crate::error::Error;
use crate::mutate::{self, InsertKey};
use crate::search;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the node at PATH
    Get { path: String },
    /// Replace the node at PATH with a JSON value
    Set { path: String, value: String },
    /// Remove the node at PATH
    Delete { path: String },
    /// Insert a JSON value under PARENT. KEY is an object key, an array
    /// index, or `-` to append
    Insert {
        parent: String,
        key: String,
        value: String,
    },
    /// Rename the object member at PATH
    Rename { path: String, new_key: String },
    /// List leaf paths matching QUERY, ignoring case
    Search { query: String },
    /// List every path in the document
    Paths,
}

/// Run `command` against the document in `input`.
///
/// Reads return the addressed node, mutations return the whole resulting
/// document, and listings return one canonical path per line.
///
/// ```
/// use json_nav::cli::{run, Command};
/// use json_nav::EditorConfig;
///
/// let config = EditorConfig { pretty: false, ..EditorConfig::default() };
/// let out = run(
///     &Command::Set { path: "b[0]".into(), value: "99".into() },
///     r#"{"a":1,"b":[10,20]}"#,
///     &config,
/// )
/// .unwrap();
/// assert_eq!(out, r#"{"a":1,"b":[99,20]}"#);
/// ```
pub fn run(command: &Command, input: &str, config: &EditorConfig) -> Result<String, Error> {
    let codec = JsonCodec::from(config);
    let doc = codec.deserialize(input)?;

    let edited = match command {
        Command::Get { path } => {
            let node = mutate::get(&doc, &parse(path)?)?;
            return Ok(codec.serialize(node)?);
        }
        Command::Search { query } => {
            let found = search::search(&doc, query);
            return Ok(lines(found.matches()));
        }
        Command::Paths => {
            let paths = address::paths(&doc);
            return Ok(lines(paths.iter().filter(|p| !p.is_root())));
        }
        Command::Set { path, value } => {
            mutate::set(&doc, &parse(path)?, codec.deserialize(value)?)?
        }
        Command::Delete { path } => mutate::delete(&doc, &parse(path)?)?,
        Command::Insert { parent, key, value } => {
            let key: InsertKey = key.parse().unwrap_or_else(|never| match never {});
            mutate::insert(&doc, &parse(parent)?, key, codec.deserialize(value)?)?
        }
        Command::Rename { path, new_key } => mutate::rename_key(&doc, &parse(path)?, new_key)?,
    };
    Ok(codec.serialize(&edited)?)
}

fn parse(text: &str) -> Result<Path, Error> {
    Ok(parse_validated(text)?)
}

fn lines<'a>(paths: impl Iterator<Item = &'a Path>) -> String {
    paths.map(Path::to_string).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MutationError;

    const DOC: &str = r#"{"name":"Ada","tags":["x","y"],"meta":{"age":36}}"#;

    fn compact() -> EditorConfig {
        EditorConfig {
            pretty: false,
            ..EditorConfig::default()
        }
    }

    fn run_compact(command: Command) -> Result<String, Error> {
        run(&command, DOC, &compact())
    }

    #[test]
    fn test_get() {
        let out = run_compact(Command::Get { path: "meta".into() }).unwrap();
        assert_eq!(out, r#"{"age":36}"#);
        let out = run_compact(Command::Get { path: "".into() }).unwrap();
        assert_eq!(out, DOC);
    }

    #[test]
    fn test_insert_append_and_index() {
        let out = run_compact(Command::Insert {
            parent: "tags".into(),
            key: "-".into(),
            value: "\"z\"".into(),
        })
        .unwrap();
        assert_eq!(out, r#"{"name":"Ada","tags":["x","y","z"],"meta":{"age":36}}"#);

        let out = run_compact(Command::Insert {
            parent: "tags".into(),
            key: "0".into(),
            value: "null".into(),
        })
        .unwrap();
        assert_eq!(out, r#"{"name":"Ada","tags":[null,"x","y"],"meta":{"age":36}}"#);
    }

    #[test]
    fn test_rename_keeps_position() {
        let out = run_compact(Command::Rename {
            path: "name".into(),
            new_key: "first".into(),
        })
        .unwrap();
        assert_eq!(out, r#"{"first":"Ada","tags":["x","y"],"meta":{"age":36}}"#);
    }

    #[test]
    fn test_listings() {
        let out = run_compact(Command::Search { query: "Y".into() }).unwrap();
        assert_eq!(out, "tags[1]");
        let out = run_compact(Command::Paths).unwrap();
        assert_eq!(out, "name\ntags\ntags[0]\ntags[1]\nmeta\nmeta.age");
    }

    #[test]
    fn test_errors() {
        let err = run_compact(Command::Delete { path: "tags[5]".into() }).unwrap_err();
        assert!(matches!(
            err,
            Error::Mutation(MutationError::IndexOutOfBounds { index: 5, len: 2, .. })
        ));
        let err = run_compact(Command::Get { path: "a..b".into() }).unwrap_err();
        assert!(matches!(err, Error::Path(_)));
        let err = run(&Command::Paths, "{", &compact()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_pretty_output_by_default() {
        let out = run(&Command::Get { path: "meta".into() }, DOC, &EditorConfig::default()).unwrap();
        assert_eq!(out, "{\n  \"age\": 36\n}");
    }
}
