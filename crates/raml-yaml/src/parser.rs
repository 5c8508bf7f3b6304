//! Event-driven builder for `Yaml` trees with a custom-tag hook.

use crate::{Error, Result, SourceInfo};
use std::collections::HashMap;
use std::path::Path;
use yaml_rust2::Yaml;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, ScanError, TScalarStyle};
use yaml_rust2::yaml::Hash;

/// Hook for application-defined local tags such as `!include`.
///
/// Called for every scalar carrying a `!name` tag. Returning `None` leaves the
/// scalar to be typed as if it were untagged.
pub trait TagHandler {
    fn handle_scalar(
        &mut self,
        tag: &str,
        argument: &str,
        location: &SourceInfo,
    ) -> Option<Result<Yaml>>;

    /// Whether `tag` is handled at all. Handled tags on mappings and
    /// sequences are rejected.
    fn handles(&self, tag: &str) -> bool;
}

/// Handler that leaves every tag alone.
pub struct NoTags;

impl TagHandler for NoTags {
    fn handle_scalar(&mut self, _: &str, _: &str, _: &SourceInfo) -> Option<Result<Yaml>> {
        None
    }

    fn handles(&self, _: &str) -> bool {
        false
    }
}

/// Parse YAML text without tag handling.
///
/// Only the first document of a stream is used; empty input yields
/// `Yaml::Null`.
///
/// # Example
///
/// ```rust
/// use raml_yaml::parse;
///
/// let yaml = parse("title: My API").unwrap();
/// assert_eq!(yaml["title"].as_str(), Some("My API"));
/// ```
pub fn parse(content: &str) -> Result<Yaml> {
    parse_with(content, None, &mut NoTags)
}

/// Parse YAML text, handing local tags to `handler`.
///
/// `file` only labels source locations; it is never read.
pub fn parse_with(
    content: &str,
    file: Option<&Path>,
    handler: &mut dyn TagHandler,
) -> Result<Yaml> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = YamlBuilder::new(file, handler);

    parser
        .load(&mut builder, false)
        .map_err(|err| syntax_error(&err, file))?;

    builder.result()
}

fn syntax_error(err: &ScanError, file: Option<&Path>) -> Error {
    Error::Syntax {
        message: err.info().to_string(),
        location: SourceInfo::from_marker(err.marker()).with_file(file),
    }
}

/// Builder that implements MarkedEventReceiver to construct a `Yaml` tree.
struct YamlBuilder<'h> {
    file: Option<&'h Path>,

    handler: &'h mut dyn TagHandler,

    /// Stack of collections being constructed
    stack: Vec<BuildNode>,

    /// Completed anchored values by anchor id
    anchors: HashMap<usize, Yaml>,

    root: Option<Yaml>,

    /// First failure; later events are ignored once set
    error: Option<Error>,
}

enum BuildNode {
    Sequence {
        anchor: usize,
        items: Vec<Yaml>,
    },
    Mapping {
        anchor: usize,
        entries: Hash,
        pending_key: Option<Yaml>,
    },
}

impl<'h> YamlBuilder<'h> {
    fn new(file: Option<&'h Path>, handler: &'h mut dyn TagHandler) -> Self {
        Self {
            file,
            handler,
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<Yaml> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.root.unwrap_or(Yaml::Null)),
        }
    }

    fn location(&self, marker: &Marker) -> SourceInfo {
        SourceInfo::from_marker(marker).with_file(self.file)
    }

    fn push_complete(&mut self, node: Yaml, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }

        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(BuildNode::Sequence { items, .. }) => items.push(node),
            Some(BuildNode::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => {
                    entries.insert(key, node);
                }
                None => *pending_key = Some(node),
            },
        }
    }

    fn reject_collection_tag(&mut self, tag: Option<&Tag>, marker: &Marker) -> bool {
        match tag {
            Some(tag) if is_local(tag) && self.handler.handles(&tag.suffix) => {
                self.error = Some(Error::InvalidInclude {
                    location: self.location(marker),
                });
                true
            }
            _ => false,
        }
    }

    fn scalar(
        &mut self,
        value: String,
        style: TScalarStyle,
        tag: Option<Tag>,
        marker: &Marker,
    ) -> Result<Yaml> {
        if let Some(tag) = &tag {
            if is_local(tag) {
                let location = self.location(marker);
                if let Some(resolved) = self.handler.handle_scalar(&tag.suffix, &value, &location)
                {
                    return resolved;
                }
            } else if is_core(tag) {
                return Ok(core_scalar(&tag.suffix, value));
            }
        }

        if style == TScalarStyle::Plain {
            Ok(Yaml::from_str(&value))
        } else {
            Ok(Yaml::String(value))
        }
    }
}

impl MarkedEventReceiver for YamlBuilder<'_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Scalar(value, style, anchor, tag) => {
                match self.scalar(value, style, tag, &marker) {
                    Ok(node) => self.push_complete(node, anchor),
                    Err(err) => self.error = Some(err),
                }
            }

            Event::SequenceStart(anchor, tag) => {
                if !self.reject_collection_tag(tag.as_ref(), &marker) {
                    self.stack.push(BuildNode::Sequence {
                        anchor,
                        items: Vec::new(),
                    });
                }
            }

            Event::SequenceEnd => {
                if let Some(BuildNode::Sequence { anchor, items }) = self.stack.pop() {
                    self.push_complete(Yaml::Array(items), anchor);
                }
            }

            Event::MappingStart(anchor, tag) => {
                if !self.reject_collection_tag(tag.as_ref(), &marker) {
                    self.stack.push(BuildNode::Mapping {
                        anchor,
                        entries: Hash::new(),
                        pending_key: None,
                    });
                }
            }

            Event::MappingEnd => {
                if let Some(BuildNode::Mapping {
                    anchor, entries, ..
                }) = self.stack.pop()
                {
                    self.push_complete(Yaml::Hash(entries), anchor);
                }
            }

            Event::Alias(id) => {
                let node = self.anchors.get(&id).cloned().unwrap_or(Yaml::BadValue);
                self.push_complete(node, 0);
            }

            _ => {}
        }
    }
}

/// `!name` tags, as opposed to `!!type` core tags.
fn is_local(tag: &Tag) -> bool {
    tag.handle == "!"
}

fn is_core(tag: &Tag) -> bool {
    matches!(tag.handle.as_str(), "!!" | "tag:yaml.org,2002:")
}

/// Apply a YAML core-schema tag (`!!str`, `!!int`, ...) to a scalar.
fn core_scalar(suffix: &str, value: String) -> Yaml {
    match suffix {
        "bool" => value.parse::<bool>().map_or(Yaml::BadValue, Yaml::Boolean),
        "int" => value.parse::<i64>().map_or(Yaml::BadValue, Yaml::Integer),
        "float" => match value.parse::<f64>() {
            Ok(_) => Yaml::Real(value),
            Err(_) => Yaml::BadValue,
        },
        "null" => match value.as_str() {
            "~" | "null" => Yaml::Null,
            _ => Yaml::BadValue,
        },
        _ => Yaml::String(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every tagged scalar it sees and replaces `!upper` values.
    #[derive(Default)]
    struct Upper {
        seen: Vec<(String, String)>,
    }

    impl TagHandler for Upper {
        fn handle_scalar(
            &mut self,
            tag: &str,
            argument: &str,
            _location: &SourceInfo,
        ) -> Option<Result<Yaml>> {
            self.seen.push((tag.to_string(), argument.to_string()));
            (tag == "upper").then(|| Ok(Yaml::String(argument.to_uppercase())))
        }

        fn handles(&self, tag: &str) -> bool {
            tag == "upper"
        }
    }

    #[test]
    fn test_parse_scalar_types() {
        let yaml = parse("s: hello\ni: 42\nf: 1.5\nb: true\nn: ~\nq: '42'").unwrap();
        assert_eq!(yaml["s"].as_str(), Some("hello"));
        assert_eq!(yaml["i"].as_i64(), Some(42));
        assert_eq!(yaml["f"].as_f64(), Some(1.5));
        assert_eq!(yaml["b"].as_bool(), Some(true));
        assert!(yaml["n"].is_null());
        assert_eq!(yaml["q"].as_str(), Some("42"));
    }

    #[test]
    fn test_mapping_keeps_insertion_order() {
        let yaml = parse("zeta: 1\nalpha: 2\nmid: 3").unwrap();
        let keys: Vec<&str> = yaml
            .as_hash()
            .unwrap()
            .keys()
            .filter_map(Yaml::as_str)
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_nested_structure() {
        let yaml = parse(
            r#"
resources:
  /users:
    get:
      responses:
        200:
          body: {}
  /groups: {}
"#,
        )
        .unwrap();

        let users = &yaml["resources"]["/users"];
        assert!(users.as_hash().is_some());
        assert!(users["get"]["responses"].as_hash().unwrap().contains_key(&Yaml::Integer(200)));
        assert_eq!(yaml["resources"].as_hash().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_input_is_null() {
        assert_eq!(parse("").unwrap(), Yaml::Null);
    }

    #[test]
    fn test_only_first_document() {
        let yaml = parse("a: 1\n---\nb: 2").unwrap();
        assert_eq!(yaml["a"].as_i64(), Some(1));
        assert!(yaml["b"].is_badvalue());
    }

    #[test]
    fn test_aliases_resolve_to_anchored_value() {
        let yaml = parse("base: &b\n  x: 1\ncopy: *b").unwrap();
        assert_eq!(yaml["copy"]["x"].as_i64(), Some(1));
    }

    #[test]
    fn test_core_tags() {
        let yaml = parse("a: !!str 123\nb: !!int '7'\nc: !!bool nope").unwrap();
        assert_eq!(yaml["a"].as_str(), Some("123"));
        assert_eq!(yaml["b"].as_i64(), Some(7));
        assert!(yaml["c"].is_badvalue());
    }

    #[test]
    fn test_handler_receives_literal_argument() {
        let mut handler = Upper::default();
        let yaml = parse_with("a: !upper shout\nb: !other keep", None, &mut handler).unwrap();
        assert_eq!(yaml["a"].as_str(), Some("SHOUT"));
        assert_eq!(yaml["b"].as_str(), Some("keep"));
        assert_eq!(
            handler.seen,
            vec![
                ("upper".to_string(), "shout".to_string()),
                ("other".to_string(), "keep".to_string()),
            ]
        );
    }

    #[test]
    fn test_handled_tag_on_mapping_rejected() {
        let mut handler = Upper::default();
        let err = parse_with("a: !upper {x: 1}", None, &mut handler).unwrap_err();
        assert!(matches!(err, Error::InvalidInclude { .. }));
    }

    #[test]
    fn test_syntax_error_carries_file() {
        let err = parse_with("a: [1, 2", Some(Path::new("api.raml")), &mut NoTags).unwrap_err();
        match err {
            Error::Syntax { location, .. } => {
                assert_eq!(location.file.as_deref(), Some(Path::new("api.raml")));
                assert!(location.line >= 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
