//! Line-oriented markup parser

use std::path::Path;

use super::{MarkupError, DEFAULT_MAX_PROPERTY_LEN, MAX_PROPERTIES, PROPERTY_NAMES, REQUIRED_PROPERTIES};
use crate::config::RguiConfig;
use crate::foundation::math::Vec2;
use crate::ui::element::{Color, Element};
use crate::ui::tree::{ElementId, ElementTree};

/// Position of the scanner within one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagState {
    BeforeTag,
    InTag,
    InProperty,
    TagEnd,
}

/// One scanned line
#[derive(Debug)]
enum Line {
    Tag { depth: i32, properties: Vec<String> },
    Close,
}

/// Builds an [`ElementTree`] from markup text
#[derive(Debug, Clone)]
pub struct MarkupParser {
    max_property_len: usize,
    max_elements: usize,
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::from_config(&RguiConfig::default())
    }
}

impl MarkupParser {
    /// Create a parser with explicit limits
    pub fn new(max_property_len: usize, max_elements: usize) -> Self {
        Self { max_property_len, max_elements }
    }

    /// Create a parser using the limits from `config`
    pub fn from_config(config: &RguiConfig) -> Self {
        let max_property_len = if config.max_property_len == 0 {
            DEFAULT_MAX_PROPERTY_LEN
        } else {
            config.max_property_len
        };
        Self::new(max_property_len, config.max_elements)
    }

    /// Read and parse a markup file
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ElementTree, MarkupError> {
        let path = path.as_ref();
        log::info!("Loading markup from {}", path.display());
        let source = std::fs::read_to_string(path)?;
        self.parse_str(&source)
    }

    /// Parse markup text into a fresh tree
    ///
    /// The returned tree has its root set. On error nothing built so far is
    /// returned.
    pub fn parse_str(&self, source: &str) -> Result<ElementTree, MarkupError> {
        let mut tree = ElementTree::new(self.max_elements);
        let mut prev: Option<ElementId> = None;
        let mut prev_depth: i32 = -1;

        let raw_lines: Vec<&str> = source.split('\n').collect();
        let last = raw_lines.len() - 1;

        for (index, raw) in raw_lines.into_iter().enumerate() {
            let line_no = index + 1;
            let terminated = index < last;
            let text = raw.strip_suffix('\r').unwrap_or(raw);

            if !terminated && text.is_empty() {
                break;
            }

            match self.scan_line(text, line_no)? {
                Line::Close => {
                    return match tree.root() {
                        Some(_) => {
                            log::debug!("Parsed {} elements", tree.len());
                            Ok(tree)
                        }
                        None => Err(MarkupError::EmptyDocument),
                    };
                }
                Line::Tag { depth, properties } => {
                    if !terminated {
                        return Err(MarkupError::UnexpectedEof { line: line_no });
                    }
                    let id = Self::build_element(&mut tree, &properties, line_no)?;
                    Self::place(&mut tree, id, prev, prev_depth, depth, line_no)?;
                    prev = Some(id);
                    prev_depth = depth;
                }
            }
        }

        match tree.root() {
            Some(_) => Err(MarkupError::UnexpectedEof { line: last + 1 }),
            None => Err(MarkupError::EmptyDocument),
        }
    }

    fn scan_line(&self, text: &str, line: usize) -> Result<Line, MarkupError> {
        let mut state = TagState::BeforeTag;
        let mut depth = 0;
        let mut closing = false;
        let mut properties: Vec<String> = Vec::new();
        let mut buffer = String::new();

        for ch in text.chars() {
            match state {
                TagState::BeforeTag => match ch {
                    '\t' => depth += 1,
                    '<' => state = TagState::InTag,
                    '>' => {
                        closing = true;
                        state = TagState::TagEnd;
                    }
                    _ => return Err(MarkupError::UnexpectedCharacter { line, ch }),
                },
                TagState::InTag => match ch {
                    '"' => {
                        if properties.len() == MAX_PROPERTIES {
                            return Err(MarkupError::TooManyProperties { line, max: MAX_PROPERTIES });
                        }
                        state = TagState::InProperty;
                    }
                    '>' => state = TagState::TagEnd,
                    ' ' | '\t' => {}
                    _ => return Err(MarkupError::UnexpectedCharacter { line, ch }),
                },
                TagState::InProperty => {
                    if ch == '"' {
                        properties.push(std::mem::take(&mut buffer));
                        state = TagState::InTag;
                    } else if buffer.len() + ch.len_utf8() > self.max_property_len {
                        return Err(MarkupError::PropertyOverflow { line, max: self.max_property_len });
                    } else {
                        buffer.push(ch);
                    }
                }
                // Anything after the closing bracket is ignored
                TagState::TagEnd => break,
            }
        }

        match state {
            TagState::BeforeTag => Err(MarkupError::EmptyLine { line }),
            TagState::InTag => Err(MarkupError::UnterminatedTag { line }),
            TagState::InProperty => Err(MarkupError::UnterminatedProperty { line }),
            TagState::TagEnd if closing => Ok(Line::Close),
            TagState::TagEnd => Ok(Line::Tag { depth, properties }),
        }
    }

    fn build_element(tree: &mut ElementTree, properties: &[String], line: usize) -> Result<ElementId, MarkupError> {
        if properties.len() < REQUIRED_PROPERTIES {
            return Err(MarkupError::MissingProperty { line, property: PROPERTY_NAMES[properties.len()] });
        }

        let [x, y] = parse_integers::<i32, 2>(&properties[2], PROPERTY_NAMES[2], line)?;
        let [w, h] = parse_integers::<i32, 2>(&properties[3], PROPERTY_NAMES[3], line)?;
        let [r, g, b, a] = parse_integers::<u8, 4>(&properties[4], PROPERTY_NAMES[4], line)?;
        let texture = properties.get(5).map_or("", String::as_str);
        let data = properties.get(6).map_or("", String::as_str);

        let mut element = Element::new(Vec2::new(x, y), Vec2::new(w, h), texture, Color::from_rgba(r, g, b, a), &properties[1])
            .map_err(|source| MarkupError::Tree { line, source })?
            .with_type(properties[0].as_str());
        if !data.is_empty() {
            element = element.with_data(Box::new(data.to_string()));
        }

        tree.insert(element).map_err(|source| MarkupError::Tree { line, source })
    }

    /// Attach `id` according to its depth relative to the previous tag
    fn place(
        tree: &mut ElementTree,
        id: ElementId,
        prev: Option<ElementId>,
        prev_depth: i32,
        depth: i32,
        line: usize,
    ) -> Result<(), MarkupError> {
        let delta = depth - prev_depth;
        if delta > 1 {
            return Err(MarkupError::DepthJump { line, from: prev_depth, to: depth });
        }

        let parent = match prev {
            None => {
                return tree.set_root(id).map_err(|source| MarkupError::Tree { line, source });
            }
            Some(prev) if delta == 1 => Some(prev),
            Some(prev) => {
                // Climb to the previous element at this depth, then take its parent
                let mut anchor = Some(prev);
                for _ in 0..-delta {
                    anchor = anchor.and_then(|a| tree.get(a)).and_then(Element::parent);
                }
                anchor.and_then(|a| tree.get(a)).and_then(Element::parent)
            }
        };

        match parent {
            Some(parent) => tree
                .add_child(parent, id)
                .map_err(|source| MarkupError::Tree { line, source }),
            None => Err(MarkupError::MultipleRoots { line }),
        }
    }
}

fn parse_integers<T: std::str::FromStr + Copy + Default, const N: usize>(
    text: &str,
    property: &'static str,
    line: usize,
) -> Result<[T; N], MarkupError> {
    let invalid = || MarkupError::InvalidNumber { line, property, text: text.to_string() };

    let mut values = [T::default(); N];
    let mut fields = text.split_whitespace();
    for value in &mut values {
        *value = fields.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
    }
    if fields.next().is_some() {
        return Err(invalid());
    }
    Ok(values)
}
