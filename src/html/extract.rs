//! Extraction of translatable text from a parsed document.
//!
//! The extractor walks the DOM depth-first and produces an ordered sequence
//! of [`TextUnit`]s, one per non-empty text node. The order is what the
//! orchestrator later relies on to map translated fragments back onto the
//! original nodes, so extraction must be deterministic for a given document.

use markup5ever_rcdom::{Handle, NodeData};

use crate::config::constants;

/// One piece of translatable text and its location in the live document.
///
/// A unit keeps a handle to the exact text node it was read from, so a
/// translated value can be written back in place. The `text` field is the
/// value at extraction time; the sequence is only valid as long as the
/// document is not mutated by anyone else.
#[derive(Debug, Clone)]
pub struct TextUnit {
    index: usize,
    text: String,
    node: Handle,
}

impl TextUnit {
    /// Position of this unit in the extracted sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The text value captured at extraction time.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Replaces the referenced node's contents in place.
    pub fn set_text(&self, value: &str) {
        if let NodeData::Text { ref contents } = self.node.data {
            let mut contents = contents.borrow_mut();
            contents.clear();
            contents.push_slice(value);
        }
    }
}

/// Collects every translatable text node under `root` in document order.
///
/// A `script`, `style`, or `noscript` element contributes nothing and is not
/// descended into. For every other element, direct child text nodes with
/// non-whitespace content are collected first, then child elements are
/// visited in order. The traversal is read-only and restartable: calling it
/// twice on an unchanged document yields the same sequence.
pub fn extract_text_units(root: &Handle) -> Vec<TextUnit> {
    let mut units = Vec::new();
    collect_units(root, &mut units);
    units
}

fn collect_units(node: &Handle, units: &mut Vec<TextUnit>) {
    if let NodeData::Element { ref name, .. } = node.data {
        if constants::SKIP_ELEMENTS.contains(&name.local.as_ref()) {
            return;
        }
    }

    for child in node.children.borrow().iter() {
        if let NodeData::Text { ref contents } = child.data {
            let text = contents.borrow().to_string();
            if !text.trim().is_empty() {
                units.push(TextUnit {
                    index: units.len(),
                    text,
                    node: child.clone(),
                });
            }
        }
    }

    for child in node.children.borrow().iter() {
        if matches!(child.data, NodeData::Element { .. }) {
            collect_units(child, units);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{html_to_dom, serialize_document};

    fn extract_texts(html: &str) -> Vec<String> {
        let dom = html_to_dom(html.as_bytes(), String::new());
        extract_text_units(&dom.document)
            .iter()
            .map(|unit| unit.text().to_string())
            .collect()
    }

    #[test]
    fn collects_nested_text_in_order() {
        assert_eq!(
            extract_texts("<div>Hello<span>World</span></div>"),
            vec!["Hello", "World"]
        );
    }

    #[test]
    fn direct_text_precedes_child_elements() {
        assert_eq!(
            extract_texts("<div>A<span>B</span>C</div>"),
            vec!["A", "C", "B"]
        );
    }

    #[test]
    fn script_style_noscript_are_skipped() {
        let texts = extract_texts(
            "<div>Hello<script>var x = 1;</script><style>p { color: red; }</style>\
             <noscript>enable JS</noscript><span>World</span></div>",
        );

        assert_eq!(texts, vec!["Hello", "World"]);
    }

    #[test]
    fn whitespace_only_nodes_are_excluded() {
        assert!(extract_texts("<div>  \n\t  <span>   </span></div>").is_empty());
    }

    #[test]
    fn empty_document_yields_nothing() {
        assert!(extract_texts("").is_empty());
    }

    #[test]
    fn indices_match_sequence_positions() {
        let dom = html_to_dom(
            b"<ul><li>one</li><li>two</li><li>three</li></ul>",
            String::new(),
        );
        let units = extract_text_units(&dom.document);

        assert_eq!(units.len(), 3);
        for (i, unit) in units.iter().enumerate() {
            assert_eq!(unit.index(), i);
        }
    }

    #[test]
    fn set_text_mutates_the_document() {
        let dom = html_to_dom(b"<p>original</p>", String::new());
        let units = extract_text_units(&dom.document);
        units[0].set_text("replaced");

        let out = String::from_utf8(serialize_document(dom, String::new())).unwrap();
        assert!(out.contains("replaced"));
        assert!(!out.contains("original"));
    }

    #[test]
    fn extraction_is_restartable() {
        let dom = html_to_dom(b"<div>Hello<span>World</span></div>", String::new());
        let first: Vec<String> = extract_text_units(&dom.document)
            .iter()
            .map(|u| u.text().to_string())
            .collect();
        let second: Vec<String> = extract_text_units(&dom.document)
            .iter()
            .map(|u| u.text().to_string())
            .collect();

        assert_eq!(first, second);
    }
}
