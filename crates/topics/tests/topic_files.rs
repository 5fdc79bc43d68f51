//! Topic files read from disk

use mathrun_core::{Error, QueryVariant, TopicId};
use mathrun_topics::{TopicSource, VariantPolicy};
use std::io::Write;
use tempfile::NamedTempFile;

const TOPICS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<topics xmlns:m="http://www.w3.org/1998/Math/MathML">
  <topic>
    <num>NTCIR11-Math-7</num>
    <query>
      <keyword>integral</keyword>
      <formula><m:math><m:semantics><m:apply><m:int/></m:apply></m:semantics></m:math></formula>
    </query>
  </topic>
  <topic>
    <num>NTCIR11-Math-8</num>
    <query>
      <keyword>limit</keyword>
      <keyword>sequence</keyword>
    </query>
  </topic>
</topics>
"#;

fn topic_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_ntcir_topics() {
    let file = topic_file(TOPICS);
    let source = TopicSource::load(file.path(), VariantPolicy::ntcir()).unwrap();

    assert_eq!(source.len(), 2);
    let first = &source.topics()[0];
    assert_eq!(first.id, TopicId::from("NTCIR11-Math-7"));
    assert_eq!(
        first.variants,
        vec![
            QueryVariant::new("integral", "<m:apply><m:int/></m:apply>"),
            QueryVariant::keywords_only("integral"),
        ]
    );

    let second = &source.topics()[1];
    assert_eq!(second.variants, vec![QueryVariant::keywords_only("limit sequence")]);
}

#[test]
fn test_load_wiki_topics() {
    let file = topic_file(TOPICS);
    let source = TopicSource::load(file.path(), VariantPolicy::wiki()).unwrap();

    assert_eq!(source.variant_count(), 1);
    assert_eq!(
        source.topics()[0].variants,
        vec![QueryVariant::new("", "<m:apply><m:int/></m:apply>")]
    );
    assert!(source.topics()[1].variants.is_empty());
}

#[test]
fn test_load_missing_file() {
    let err = TopicSource::load(
        std::path::Path::new("/nonexistent/queries.xml"),
        VariantPolicy::ntcir(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Topics { .. }));
    assert!(err.to_string().contains("/nonexistent/queries.xml"));
}
