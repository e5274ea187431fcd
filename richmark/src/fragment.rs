//! HTML fragment adaptation.
//!
//! Turns an HTML string into the ordered list of top-level DOM nodes it
//! parses to, without the `html`/`head`/`body` scaffolding a full document
//! parse would add. The embedding stage uses this to splice transformer
//! output into a rendered document; it is public because replacement markup
//! often comes from callers.

use kuchikikiki::NodeRef;
use markup5ever::{QualName, local_name, ns};
use tendril::TendrilSink;

/// Parse `html` in a body fragment context and return its top-level nodes
/// in document order.
///
/// Every call re-parses the input and returns freshly allocated nodes that
/// are detached from any parent, so callers may mutate or splice them
/// without affecting other results.
///
/// # Arguments
///
/// * `html` - The markup to parse; the empty string yields an empty vector
///
/// # Returns
///
/// The parsed element, text, and comment nodes, in order, with no document
/// wrapper around them.
///
/// # Examples
///
/// ```
/// let nodes = richmark::fragment::nodes("<b>hi</b> there");
/// assert_eq!(nodes.len(), 2);
/// ```
#[must_use]
pub fn nodes(html: &str) -> Vec<NodeRef> {
  if html.is_empty() {
    return Vec::new();
  }

  let document = kuchikikiki::parse_fragment(
    QualName::new(None, ns!(html), local_name!("body")),
    Vec::new(),
  )
  .one(html);

  // The fragment algorithm wraps parsed content in a synthetic root
  // element; its children are the fragment itself.
  let Some(root) = document.first_child() else {
    return Vec::new();
  };

  let children: Vec<NodeRef> = root.children().collect();
  for child in &children {
    child.detach();
  }

  children
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_yields_empty_sequence() {
    assert!(nodes("").is_empty());
  }

  #[test]
  fn test_mixed_content_preserves_order() {
    let parsed = nodes("<b>hi</b> there");

    assert_eq!(parsed.len(), 2);

    let element = parsed[0].as_element().map(|e| e.name.local.clone());
    assert_eq!(element, Some(local_name!("b")));
    assert_eq!(parsed[0].text_contents(), "hi");

    assert!(parsed[1].as_text().is_some());
    assert_eq!(parsed[1].text_contents(), " there");
  }

  #[test]
  fn test_no_document_wrapper_nodes() {
    let parsed = nodes("<div><p>nested</p></div>");

    assert_eq!(parsed.len(), 1);
    let name = parsed[0].as_element().map(|e| e.name.local.clone());
    assert_eq!(name, Some(local_name!("div")));
  }

  #[test]
  fn test_nodes_are_detached() {
    let parsed = nodes("<span>x</span>");

    assert_eq!(parsed.len(), 1);
    assert!(parsed[0].parent().is_none());
  }

  #[test]
  fn test_repeated_calls_yield_fresh_nodes() {
    let first = nodes("<p>same input</p>");
    let second = nodes("<p>same input</p>");

    // NodeRef equality is identity, not structure.
    assert!(first[0] != second[0]);
  }

  #[test]
  fn test_body_level_context_keeps_block_elements() {
    let parsed = nodes("<table><tr><td>cell</td></tr></table>");

    assert_eq!(parsed.len(), 1);
    let name = parsed[0].as_element().map(|e| e.name.local.clone());
    assert_eq!(name, Some(local_name!("table")));
  }
}
