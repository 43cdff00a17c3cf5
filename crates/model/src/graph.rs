//! An in-memory RDF graph with set semantics.

use std::collections::HashSet;

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{NamedNodeRef, SubjectRef, Term, Triple};

use crate::error::{ModelError, ModelResult};

/// A set of RDF triples.
///
/// Insertion order is not preserved. Use [`Graph::sorted`] when a stable
/// enumeration is needed (serialization, digests).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: HashSet<Triple>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Inserts a triple, returning `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn remove(&mut self, triple: &Triple) -> bool {
        self.triples.remove(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Keeps only the triples matching `f`.
    pub fn retain(&mut self, f: impl FnMut(&Triple) -> bool) {
        self.triples.retain(f);
    }

    /// Returns the objects of every `(subject, predicate, ?)` triple.
    pub fn objects<'a>(
        &'a self,
        subject: SubjectRef<'a>,
        predicate: NamedNodeRef<'a>,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.subject.as_ref() == subject && t.predicate.as_ref() == predicate)
            .map(|t| &t.object)
    }

    /// Returns the triples that use `predicate`, in any subject.
    pub fn with_predicate<'a>(
        &'a self,
        predicate: NamedNodeRef<'a>,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.predicate.as_ref() == predicate)
    }

    /// Returns the triples in `self` that are not in `other`.
    pub fn difference(&self, other: &Graph) -> Graph {
        self.triples
            .difference(&other.triples)
            .cloned()
            .collect()
    }

    /// Returns the triples sorted by their N-Triples rendering.
    pub fn sorted(&self) -> Vec<&Triple> {
        let mut triples: Vec<&Triple> = self.triples.iter().collect();
        triples.sort_by_cached_key(|t| t.to_string());
        triples
    }

    /// Renders the graph as sorted N-Triples.
    ///
    /// The output is canonical for graphs without blank nodes, which makes
    /// it suitable both for persistence and for content digests.
    pub fn to_ntriples(&self) -> String {
        let mut lines: Vec<String> = self.triples.iter().map(|t| format!("{t} .\n")).collect();
        lines.sort();
        lines.concat()
    }

    /// Parses N-Triples previously produced by [`Graph::to_ntriples`].
    pub fn from_ntriples(data: &str) -> ModelResult<Self> {
        let mut graph = Graph::new();
        for quad in RdfParser::from_format(RdfFormat::NTriples).for_reader(data.as_bytes()) {
            let quad = quad.map_err(|e| ModelError::rdf_syntax("N-Triples", e))?;
            graph.insert(Triple::new(quad.subject, quad.predicate, quad.object));
        }
        Ok(graph)
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = std::collections::hash_set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::collections::hash_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{Literal, NamedNode};

    fn node(iri: &str) -> NamedNode {
        NamedNode::new_unchecked(iri)
    }

    #[test]
    fn test_set_semantics() {
        let mut graph = Graph::new();
        let t = Triple::new(
            node("http://example.com/s"),
            node("http://example.com/p"),
            Literal::new_simple_literal("v"),
        );
        assert!(graph.insert(t.clone()));
        assert!(!graph.insert(t.clone()));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_objects_filters_by_subject_and_predicate() {
        let s = node("http://example.com/s");
        let p = node("http://example.com/p");
        let graph: Graph = vec![
            Triple::new(s.clone(), p.clone(), node("http://example.com/a")),
            Triple::new(s.clone(), p.clone(), node("http://example.com/b")),
            Triple::new(node("http://example.com/other"), p.clone(), node("http://example.com/c")),
        ]
        .into_iter()
        .collect();

        let objects: Vec<_> = graph.objects(s.as_ref().into(), p.as_ref()).collect();
        assert_eq!(objects.len(), 2);
    }

    #[test]
    fn test_ntriples_is_sorted_and_parses_back() {
        let graph: Graph = vec![
            Triple::new(node("http://example.com/b"), node("http://example.com/p"), Literal::new_simple_literal("2")),
            Triple::new(node("http://example.com/a"), node("http://example.com/p"), Literal::new_simple_literal("1")),
        ]
        .into_iter()
        .collect();

        let text = graph.to_ntriples();
        assert!(text.starts_with("<http://example.com/a>"));
        assert_eq!(Graph::from_ntriples(&text).unwrap(), graph);
    }

    #[test]
    fn test_difference() {
        let t1 = Triple::new(node("http://example.com/s"), node("http://example.com/p"), node("http://example.com/1"));
        let t2 = Triple::new(node("http://example.com/s"), node("http://example.com/p"), node("http://example.com/2"));
        let a: Graph = vec![t1.clone(), t2.clone()].into_iter().collect();
        let b: Graph = vec![t1].into_iter().collect();
        let diff = a.difference(&b);
        assert_eq!(diff.len(), 1);
        assert!(diff.contains(&t2));
    }
}
