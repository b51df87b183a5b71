//! Line-oriented triple loader.
//!
//! Accepts N-Triples plus the small Turtle subset hand-written ontologies
//! tend to use: `@prefix` / `PREFIX` declarations, prefixed names and the
//! `a` keyword, one statement per line. Always available; full Turtle and
//! RDF/XML go through the `rdf` feature.

use crate::config::RDF_TYPE;
use crate::error::{OntologyError, Result};
use crate::graph::Triple;
use ahash::AHashMap;
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{anychar, char, none_of, space0, space1},
    combinator::{all_consuming, map, opt, peek, recognize, value},
    multi::many0,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

// ============================================================================
// Terms
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Term<'a> {
    Iri(&'a str),
    Prefixed(&'a str, &'a str),
    TypeKeyword,
    Blank(&'a str),
    Literal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Statement<'a> {
    Prefix(&'a str, &'a str),
    Triple(Term<'a>, Term<'a>, Term<'a>),
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

// Dots are left out so that a statement-ending '.' never joins the name.
fn is_local_char(c: char) -> bool {
    is_name_char(c) || c == '%'
}

/// Parse an IRI reference <...>
fn parse_iri(input: &str) -> IResult<&str, &str> {
    delimited(char('<'), take_while(|c| c != '>'), char('>'))(input)
}

/// Parse a prefixed name prefix:local
fn parse_prefixed(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, prefix) = take_while(is_name_char)(input)?;
    let (input, _) = char(':')(input)?;
    let (input, local) = take_while(is_local_char)(input)?;
    Ok((input, (prefix, local)))
}

fn parse_literal(input: &str) -> IResult<&str, ()> {
    let body = recognize(tuple((
        char('"'),
        many0(alt((
            recognize(preceded(char('\\'), anychar)),
            recognize(none_of("\"\\")),
        ))),
        char('"'),
    )));
    let suffix = alt((
        value((), preceded(char('@'), take_while1(is_name_char))),
        value((), preceded(tag("^^"), alt((value((), parse_iri), value((), parse_prefixed))))),
    ));
    value((), pair(body, opt(suffix)))(input)
}

fn parse_term(input: &str) -> IResult<&str, Term<'_>> {
    alt((
        map(parse_iri, Term::Iri),
        map(preceded(tag("_:"), take_while1(is_name_char)), Term::Blank),
        value(Term::Literal, parse_literal),
        value(Term::TypeKeyword, terminated(char('a'), peek(space1))),
        map(parse_prefixed, |(prefix, local)| Term::Prefixed(prefix, local)),
    ))(input)
}

fn parse_prefix_declaration(input: &str) -> IResult<&str, Statement<'_>> {
    let (input, _) = alt((tag("@prefix"), tag_no_case("PREFIX")))(input)?;
    let (input, _) = space1(input)?;
    let (input, prefix) = terminated(take_while(is_name_char), char(':'))(input)?;
    let (input, _) = space0(input)?;
    let (input, iri) = parse_iri(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = opt(char('.'))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Statement::Prefix(prefix, iri)))
}

fn parse_triple(input: &str) -> IResult<&str, Statement<'_>> {
    let (input, subject) = parse_term(input)?;
    let (input, _) = space1(input)?;
    let (input, predicate) = parse_term(input)?;
    let (input, _) = space1(input)?;
    let (input, object) = parse_term(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = char('.')(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = opt(preceded(char('#'), take_while(|_: char| true)))(input)?;
    Ok((input, Statement::Triple(subject, predicate, object)))
}

fn parse_statement(input: &str) -> std::result::Result<Statement<'_>, String> {
    all_consuming(alt((parse_prefix_declaration, parse_triple)))(input)
        .map(|(_, statement)| statement)
        .map_err(|e| format!("invalid statement: {e}"))
}

// ============================================================================
// Loader
// ============================================================================

/// Parses triples whose three terms resolve to IRIs. Statements with a
/// literal or blank-node term carry no hierarchy information and are
/// skipped.
pub fn parse_triples(content: &str) -> Result<Vec<Triple>> {
    let mut prefixes: AHashMap<String, String> = [
        ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
        ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
        ("owl", "http://www.w3.org/2002/07/owl#"),
        ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let mut triples = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let statement = parse_statement(line).map_err(|message| OntologyError::Parse {
            line: number + 1,
            message,
        })?;
        match statement {
            Statement::Prefix(prefix, iri) => {
                prefixes.insert(prefix.to_string(), iri.to_string());
            }
            Statement::Triple(subject, predicate, object) => {
                let resolve = |term: &Term<'_>| -> Result<Option<String>> {
                    match term {
                        Term::Iri(iri) => Ok(Some(iri.to_string())),
                        Term::TypeKeyword => Ok(Some(RDF_TYPE.to_string())),
                        Term::Prefixed(prefix, local) => match prefixes.get(*prefix) {
                            Some(namespace) => Ok(Some(format!("{namespace}{local}"))),
                            None => Err(OntologyError::Parse {
                                line: number + 1,
                                message: format!("undeclared prefix '{prefix}:'"),
                            }),
                        },
                        Term::Blank(_) | Term::Literal => Ok(None),
                    }
                };
                if let (Some(s), Some(p), Some(o)) =
                    (resolve(&subject)?, resolve(&predicate)?, resolve(&object)?)
                {
                    triples.push(Triple::new(s, p, o));
                }
            }
        }
    }
    Ok(triples)
}
