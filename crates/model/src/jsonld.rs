//! Just enough JSON-LD: expanded form in, expanded form out.
//!
//! Documents carrying `@context` are rejected because compaction and context
//! processing are not implemented. Lists, named graphs and `@reverse` are
//! rejected as well.

use std::collections::BTreeMap;

use oxigraph::model::{BlankNode, Literal, NamedNode, Subject, Term, Triple};
use oxiri::{Iri, IriParseError};
use serde_json::{Map, Number, Value};

use crate::error::{ModelError, ModelResult};
use crate::graph::Graph;
use crate::vocab::{rdf, xsd};

const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

/// Parses an expanded JSON-LD document.
pub fn parse(body: &[u8], base_iri: &str) -> ModelResult<Graph> {
    let document: Value = serde_json::from_slice(body).map_err(|e| invalid(e.to_string()))?;
    let mut graph = Graph::new();

    let nodes = match document {
        Value::Array(nodes) => nodes,
        Value::Object(mut object) => match object.remove("@graph") {
            Some(Value::Array(nodes)) => {
                reject_context(&object)?;
                nodes
            }
            Some(_) => return Err(invalid("@graph must be an array")),
            None => vec![Value::Object(object)],
        },
        _ => return Err(invalid("document must be a node object or an array")),
    };

    for node in &nodes {
        let object = node
            .as_object()
            .ok_or_else(|| invalid("top-level entries must be node objects"))?;
        parse_node(object, base_iri, &mut graph)?;
    }

    Ok(graph)
}

/// Serializes `graph` as an array of expanded node objects, one per subject.
pub fn serialize(graph: &Graph) -> ModelResult<Vec<u8>> {
    let mut nodes: BTreeMap<String, Map<String, Value>> = BTreeMap::new();

    for triple in graph.sorted() {
        let id = subject_id(&triple.subject);
        let node = nodes.entry(id.clone()).or_insert_with(|| {
            let mut node = Map::new();
            node.insert("@id".to_string(), Value::String(id));
            node
        });

        if triple.predicate.as_ref() == rdf::TYPE {
            if let Term::NamedNode(class) = &triple.object {
                push(node, "@type", Value::String(class.as_str().to_string()));
                continue;
            }
        }
        push(node, triple.predicate.as_str(), object_value(&triple.object));
    }

    let document = Value::Array(nodes.into_values().map(Value::Object).collect());
    serde_json::to_vec_pretty(&document).map_err(|e| invalid(e.to_string()))
}

fn parse_node(object: &Map<String, Value>, base_iri: &str, graph: &mut Graph) -> ModelResult<Subject> {
    reject_context(object)?;

    let subject: Subject = match object.get("@id") {
        Some(Value::String(id)) => resource(id, base_iri)?,
        Some(_) => return Err(invalid("@id must be a string")),
        None => BlankNode::default().into(),
    };

    for (key, value) in object {
        match key.as_str() {
            "@id" => {}
            "@type" => {
                for class in as_array(value) {
                    let class = class
                        .as_str()
                        .ok_or_else(|| invalid("@type values must be strings"))?;
                    graph.insert(Triple::new(
                        subject.clone(),
                        rdf::TYPE.into_owned(),
                        named_node(class, base_iri)?,
                    ));
                }
            }
            k if k.starts_with('@') => {
                return Err(invalid(format!("keyword {k} is not supported")));
            }
            predicate => {
                let predicate = named_node(predicate, base_iri)?;
                for item in as_array(value) {
                    let object = parse_object(item, base_iri, graph)?;
                    graph.insert(Triple::new(subject.clone(), predicate.clone(), object));
                }
            }
        }
    }

    Ok(subject)
}

fn parse_object(value: &Value, base_iri: &str, graph: &mut Graph) -> ModelResult<Term> {
    match value {
        Value::String(s) => Ok(Literal::new_simple_literal(s).into()),
        Value::Bool(b) => Ok(Literal::new_typed_literal(
            b.to_string(),
            NamedNode::new_unchecked(XSD_BOOLEAN),
        )
        .into()),
        Value::Number(n) => Ok(number_literal(n).into()),
        Value::Object(object) if object.contains_key("@value") => value_object(object),
        Value::Object(object) if object.contains_key("@list") => {
            Err(invalid("@list is not supported"))
        }
        Value::Object(object) => {
            let only_id = object.len() == 1 && object.contains_key("@id");
            if only_id {
                let id = object
                    .get("@id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| invalid("@id must be a string"))?;
                Ok(Term::from(resource(id, base_iri)?))
            } else {
                Ok(Term::from(parse_node(object, base_iri, graph)?))
            }
        }
        Value::Null => Err(invalid("null values are not supported")),
        Value::Array(_) => Err(invalid("nested arrays are not supported")),
    }
}

fn value_object(object: &Map<String, Value>) -> ModelResult<Term> {
    let lexical = match object.get("@value") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) if !object.contains_key("@type") => {
            return Ok(number_literal(n).into());
        }
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(invalid("@value must be a string, number or boolean")),
    };

    let literal = match (object.get("@type"), object.get("@language")) {
        (Some(_), Some(_)) => return Err(invalid("@type and @language are exclusive")),
        (Some(Value::String(datatype)), None) => {
            let datatype = NamedNode::new(datatype.as_str()).map_err(|e| ModelError::InvalidIri {
                iri: datatype.clone(),
                message: e.to_string(),
            })?;
            Literal::new_typed_literal(lexical, datatype)
        }
        (None, Some(Value::String(language))) => {
            Literal::new_language_tagged_literal(lexical, language.as_str())
                .map_err(|e| invalid(e.to_string()))?
        }
        (None, None) => Literal::new_simple_literal(lexical),
        _ => return Err(invalid("@type and @language must be strings")),
    };
    Ok(literal.into())
}

fn number_literal(n: &Number) -> Literal {
    let datatype = if n.is_i64() || n.is_u64() {
        XSD_INTEGER
    } else {
        XSD_DOUBLE
    };
    Literal::new_typed_literal(n.to_string(), NamedNode::new_unchecked(datatype))
}

fn object_value(term: &Term) -> Value {
    let mut object = Map::new();
    match term {
        Term::NamedNode(node) => {
            object.insert("@id".to_string(), Value::String(node.as_str().to_string()));
        }
        Term::BlankNode(node) => {
            object.insert("@id".to_string(), Value::String(format!("_:{}", node.as_str())));
        }
        Term::Literal(literal) => {
            object.insert("@value".to_string(), Value::String(literal.value().to_string()));
            if let Some(language) = literal.language() {
                object.insert("@language".to_string(), Value::String(language.to_string()));
            } else if literal.datatype() != xsd::STRING {
                object.insert(
                    "@type".to_string(),
                    Value::String(literal.datatype().as_str().to_string()),
                );
            }
        }
        #[allow(unreachable_patterns)]
        other => {
            object.insert("@value".to_string(), Value::String(other.to_string()));
        }
    }
    Value::Object(object)
}

fn subject_id(subject: &Subject) -> String {
    match subject {
        Subject::NamedNode(node) => node.as_str().to_string(),
        Subject::BlankNode(node) => format!("_:{}", node.as_str()),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

fn resource(id: &str, base_iri: &str) -> ModelResult<Subject> {
    match id.strip_prefix("_:") {
        Some(label) => BlankNode::new(label)
            .map(Subject::from)
            .map_err(|e| invalid(e.to_string())),
        None => named_node(id, base_iri).map(Subject::from),
    }
}

fn named_node(reference: &str, base_iri: &str) -> ModelResult<NamedNode> {
    let invalid_iri = |e: IriParseError| ModelError::InvalidIri {
        iri: reference.to_string(),
        message: e.to_string(),
    };
    let iri = Iri::parse(base_iri)
        .map_err(invalid_iri)?
        .resolve(reference)
        .map_err(invalid_iri)?;
    Ok(NamedNode::new_unchecked(iri.into_inner()))
}

fn reject_context(object: &Map<String, Value>) -> ModelResult<()> {
    if object.contains_key("@context") {
        return Err(invalid(
            "@context is not supported; send expanded JSON-LD",
        ));
    }
    Ok(())
}

fn as_array(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn push(node: &mut Map<String, Value>, key: &str, value: Value) {
    match node.get_mut(key) {
        Some(Value::Array(items)) => items.push(value),
        _ => {
            node.insert(key.to_string(), Value::Array(vec![value]));
        }
    }
}

fn invalid(message: impl Into<String>) -> ModelError {
    ModelError::JsonLd {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8080/rest/r1";

    #[test]
    fn test_parse_expanded_node() {
        let body = br#"[{
            "@id": "",
            "@type": ["http://example.com/ResourceInteraction"],
            "http://purl.org/dc/terms/title": [{"@value": "hello", "@language": "en"}],
            "http://example.com/target": [{"@id": "urn:x"}]
        }]"#;
        let graph = parse(body, BASE).unwrap();
        assert_eq!(graph.len(), 3);
        let subject = NamedNode::new_unchecked(BASE);
        assert!(graph.contains(&Triple::new(
            subject.clone(),
            NamedNode::new_unchecked("http://example.com/target"),
            NamedNode::new_unchecked("urn:x"),
        )));
    }

    #[test]
    fn test_context_is_rejected() {
        let body = br#"{"@context": {"dc": "http://purl.org/dc/terms/"}, "dc:title": "x"}"#;
        assert!(matches!(parse(body, BASE), Err(ModelError::JsonLd { .. })));
    }

    #[test]
    fn test_serialize_groups_by_subject() {
        let graph = parse(
            br#"{"@id": "", "@type": "http://example.com/T", "http://example.com/n": 3}"#,
            BASE,
        )
        .unwrap();
        let bytes = serialize(&graph).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        let nodes = value.as_array().unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0]["@id"], BASE);
        assert_eq!(nodes[0]["@type"][0], "http://example.com/T");
        assert_eq!(nodes[0]["http://example.com/n"][0]["@value"], "3");
    }

    #[test]
    fn test_relative_references_match_turtle() {
        let base = "http://localhost:8080/rest/c/m";
        let references = [
            "",
            "#frag",
            "/other",
            "sibling",
            "../sib",
            "?q=1",
            "//other.example/x",
            "urn:x",
        ];
        for reference in references {
            let turtle = format!("<> <http://example.com/p> <{reference}> .");
            let expected = crate::RdfSerialization::Turtle
                .parse(turtle.as_bytes(), base)
                .unwrap();

            let body = format!(
                r#"{{"@id": "", "http://example.com/p": [{{"@id": "{reference}"}}]}}"#
            );
            let graph = parse(body.as_bytes(), base).unwrap();

            assert_eq!(graph, expected, "reference {reference:?}");
        }
    }

    #[test]
    fn test_dot_segments_are_removed() {
        let graph = parse(
            br#"{"@id": "../sib", "@type": "http://example.com/T"}"#,
            BASE,
        )
        .unwrap();
        let subject = graph.iter().next().unwrap().subject.to_string();
        assert_eq!(subject, "<http://localhost:8080/sib>");
    }
}
