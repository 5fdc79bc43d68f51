//! NTCIR topic XML reading
//!
//! Expected document structure (MathML prefix is irrelevant, elements are
//! matched by local name):
//!
//! ```text
//! <topics>
//!   <topic>
//!     <num>NTCIR11-Math-1</num>
//!     <query>
//!       <keyword>prime</keyword>
//!       <formula><m:math><m:semantics><m:apply>...</m:apply></m:semantics></m:math></formula>
//!     </query>
//!   </topic>
//! </topics>
//! ```
//!
//! Formula expressions are taken from `formula/math/semantics/apply`; a topic
//! without any falls back to `formula/math/semantics/cerror`. Each formula is
//! kept as its verbatim source markup.

use mathrun_core::{Error, Result, TopicId};
use roxmltree::{Document, Node, ParsingOptions};

/// A topic as written in the XML, before variant expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTopic {
    /// Topic id (`<num>`)
    pub id: TopicId,
    /// Keyword texts in document order
    pub keywords: Vec<String>,
    /// Formula markup in document order
    pub formulas: Vec<String>,
}

fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Elements at a child path below `node`, in document order
fn select<'a, 'input: 'a>(node: Node<'a, 'input>, path: &[&'static str]) -> Vec<Node<'a, 'input>> {
    let mut current = vec![node];
    for &step in path {
        current = current
            .into_iter()
            .flat_map(|n| children_named(n, step))
            .collect();
    }
    current
}

fn formula_markup(xml: &str, topic: Node<'_, '_>, leaf: &'static str) -> Vec<String> {
    select(topic, &["query", "formula", "math", "semantics", leaf])
        .into_iter()
        .map(|n| xml[n.range()].to_string())
        .collect()
}

/// Parse every topic of a topic document
///
/// # Errors
///
/// Returns `Error::Topics` if the document is not well-formed XML, the root
/// element is not `<topics>`, or a topic has no `<num>`.
pub fn parse_topics(xml: &str) -> Result<Vec<RawTopic>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| Error::topics(format!("invalid topic XML: {}", e)))?;

    let root = doc.root_element();
    if root.tag_name().name() != "topics" {
        return Err(Error::topics(format!(
            "expected <topics> root element, found <{}>",
            root.tag_name().name()
        )));
    }

    root.children()
        .filter(Node::is_element)
        .enumerate()
        .map(|(index, topic)| -> Result<RawTopic> {
            let id = children_named(topic, "num")
                .next()
                .map(|num| num.text().unwrap_or("").trim().to_string())
                .filter(|id| !id.is_empty())
                .ok_or_else(|| Error::topics(format!("topic #{} has no <num>", index + 1)))?;

            let keywords = select(topic, &["query", "keyword"])
                .into_iter()
                .map(|k| k.text().unwrap_or("").to_string())
                .collect();

            let mut formulas = formula_markup(xml, topic, "apply");
            if formulas.is_empty() {
                formulas = formula_markup(xml, topic, "cerror");
            }

            Ok(RawTopic {
                id: TopicId::new(id),
                keywords,
                formulas,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<topics xmlns:m="http://www.w3.org/1998/Math/MathML">
  <topic>
    <num>NTCIR11-Math-1</num>
    <query>
      <keyword>prime</keyword>
      <keyword>number theorem</keyword>
      <formula id="f1.1"><m:math><m:semantics><m:apply><m:ci>x</m:ci></m:apply></m:semantics></m:math></formula>
      <formula id="f1.2"><m:math><m:semantics><m:apply><m:ci>y</m:ci></m:apply></m:semantics></m:math></formula>
    </query>
  </topic>
  <topic>
    <num>NTCIR11-Math-2</num>
    <query>
      <formula><m:math><m:semantics><m:cerror><m:csymbol>fragment</m:csymbol></m:cerror></m:semantics></m:math></formula>
    </query>
  </topic>
  <topic>
    <num>NTCIR11-Math-3</num>
    <query>
      <keyword>only words</keyword>
    </query>
  </topic>
</topics>"#;

    #[test]
    fn test_parse_ids_in_order() {
        let topics = parse_topics(SAMPLE).unwrap();
        let ids: Vec<&str> = topics.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["NTCIR11-Math-1", "NTCIR11-Math-2", "NTCIR11-Math-3"]);
    }

    #[test]
    fn test_parse_keywords() {
        let topics = parse_topics(SAMPLE).unwrap();
        assert_eq!(topics[0].keywords, vec!["prime", "number theorem"]);
        assert!(topics[1].keywords.is_empty());
    }

    #[test]
    fn test_formula_is_verbatim_apply_markup() {
        let topics = parse_topics(SAMPLE).unwrap();
        assert_eq!(
            topics[0].formulas,
            vec![
                "<m:apply><m:ci>x</m:ci></m:apply>",
                "<m:apply><m:ci>y</m:ci></m:apply>"
            ]
        );
    }

    #[test]
    fn test_cerror_fallback() {
        let topics = parse_topics(SAMPLE).unwrap();
        assert_eq!(
            topics[1].formulas,
            vec!["<m:cerror><m:csymbol>fragment</m:csymbol></m:cerror>"]
        );
    }

    #[test]
    fn test_topic_without_formula() {
        let topics = parse_topics(SAMPLE).unwrap();
        assert!(topics[2].formulas.is_empty());
    }

    #[test]
    fn test_missing_num_is_error() {
        let err = parse_topics("<topics><topic><query/></topic></topics>").unwrap_err();
        assert!(err.to_string().contains("has no <num>"));
    }

    #[test]
    fn test_wrong_root_is_error() {
        let err = parse_topics("<queries/>").unwrap_err();
        assert!(matches!(err, Error::Topics { .. }));
    }

    #[test]
    fn test_malformed_xml_is_error() {
        assert!(parse_topics("<topics><topic>").is_err());
    }

    #[test]
    fn test_unprefixed_mathml_is_accepted() {
        let xml = r#"<topics><topic><num>1</num><query><formula><math xmlns="http://www.w3.org/1998/Math/MathML"><semantics><apply><ci>z</ci></apply></semantics></math></formula></query></topic></topics>"#;
        let topics = parse_topics(xml).unwrap();
        assert_eq!(topics[0].formulas, vec!["<apply><ci>z</ci></apply>"]);
    }
}
