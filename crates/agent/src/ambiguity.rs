//! Generic-term ambiguity detection.
//!
//! Words like "ticket" or "record" do not name a table. When the operator
//! uses one without anything that pins the record type down, the planner
//! must ask instead of picking a table itself. This check is deterministic
//! and runs before the reasoning provider is consulted.

use recordpilot_core::message::{ConversationTurn, TurnRole};
use serde::Serialize;

/// A concrete record type a generic term may stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub label: &'static str,
    /// Words or phrases that select this candidate.
    pub qualifiers: &'static [&'static str],
}

/// A word that does not identify a record type on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenericTerm {
    pub term: &'static str,
    pub candidates: &'static [Candidate],
}

const INCIDENT: Candidate = Candidate {
    label: "Incident",
    qualifiers: &["incident", "inc", "outage"],
};
const CHANGE_REQUEST: Candidate = Candidate {
    label: "Change Request",
    qualifiers: &["change", "change request", "chg"],
};
const PROBLEM: Candidate = Candidate {
    label: "Problem",
    qualifiers: &["problem", "prb"],
};
const REQUESTED_ITEM: Candidate = Candidate {
    label: "Requested Item",
    qualifiers: &["requested item", "ritm", "catalog", "service request"],
};
const USER: Candidate = Candidate {
    label: "User",
    qualifiers: &["user", "email", "username"],
};
const CHANGE_TASK: Candidate = Candidate {
    label: "Change Task",
    qualifiers: &["change task", "ctask"],
};
const CATALOG_TASK: Candidate = Candidate {
    label: "Catalog Task",
    qualifiers: &["catalog task", "sctask", "fulfillment"],
};
const CONFIGURATION_ITEM: Candidate = Candidate {
    label: "Configuration Item",
    qualifiers: &["configuration item", "ci", "cmdb", "server", "asset"],
};

/// The catalog, in matching order.
pub static CATALOG: &[GenericTerm] = &[
    GenericTerm {
        term: "ticket",
        candidates: &[INCIDENT, CHANGE_REQUEST, PROBLEM],
    },
    GenericTerm {
        term: "request",
        candidates: &[REQUESTED_ITEM, CHANGE_REQUEST, INCIDENT],
    },
    GenericTerm {
        term: "record",
        candidates: &[INCIDENT, USER, CHANGE_REQUEST, PROBLEM],
    },
    GenericTerm {
        term: "task",
        candidates: &[INCIDENT, CHANGE_TASK, CATALOG_TASK],
    },
    GenericTerm {
        term: "item",
        candidates: &[REQUESTED_ITEM, CONFIGURATION_ITEM],
    },
];

/// Record types outside the catalog. Naming one of these means the
/// operator was specific, even if a generic word also appears.
const OTHER_RECORD_TYPES: &[&str] = &[
    "business rule",
    "script include",
    "client script",
    "ui policy",
    "ui action",
    "access control",
    "acl",
    "knowledge article",
    "article",
    "catalog item",
    "group",
    "role",
    "application",
    "scope",
    "update set",
    "scheduled job",
    "system property",
    "notification",
];

/// Words that may sit right before a generic term without turning it into
/// part of a longer type name ("a ticket", "create ticket", "open tickets").
const NON_COMPOUND_WORDS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "my", "our", "your", "their", "its",
    "some", "any", "all", "every", "each", "one", "another", "same", "new", "old", "open",
    "opened", "closed", "active", "inactive", "pending", "existing", "recent", "latest", "last",
    "first", "next", "urgent", "critical", "high", "low", "following", "which", "what", "for",
    "of", "on", "about", "from", "with", "in", "into", "to", "by", "create", "raise", "log",
    "file", "submit", "make", "add", "update", "modify", "edit", "change", "close", "resolve",
    "find", "show", "list", "get", "view", "check", "search", "delete", "me", "us", "and", "or",
];

/// A generic term that nothing in the conversation qualifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    pub term: &'static str,
    pub candidates: Vec<&'static str>,
}

impl Ambiguity {
    /// The clarifying question, enumerating the candidates.
    pub fn question(&self) -> String {
        let options = match self.candidates.as_slice() {
            [] => String::new(),
            [only] => (*only).to_string(),
            [first, second] => format!("{first} or {second}"),
            [init @ .., last] => format!("{}, or {last}", init.join(", ")),
        };
        format!(
            "\"{}\" could refer to more than one record type. Did you mean: {options}?",
            self.term
        )
    }
}

/// Lower-cased words; `_` is kept so table names stay whole.
fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Word-boundary phrase match, singular or plural.
fn mentions(padded: &str, phrase: &str) -> bool {
    padded.contains(&format!(" {phrase} ")) || padded.contains(&format!(" {phrase}s "))
}

/// A table identifier (`sys_user`) or record number (`INC0010001`) names
/// the record type by itself.
fn names_table_directly(token: &str) -> bool {
    let is_identifier = token.contains('_')
        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && token.chars().any(|c| c.is_ascii_alphabetic());

    let letters = token.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    let digits = token.len() - letters;
    let is_record_number = (2..=6).contains(&letters)
        && digits >= 4
        && token[letters..].chars().all(|c| c.is_ascii_digit());

    is_identifier || is_record_number
}

/// Whether `term` occurs as a bare head noun.
///
/// An occurrence directly preceded by another noun ("business rule record")
/// belongs to a longer type name. A sentence-initial occurrence ("Request
/// access to ...") is read as a verb.
fn used_as_head_noun(tokens: &[String], term: &str) -> bool {
    let plural = format!("{term}s");
    tokens.iter().enumerate().any(|(i, token)| {
        if token != term && *token != plural {
            return false;
        }
        let Some(previous) = i.checked_sub(1).map(|p| tokens[p].as_str()) else {
            return false;
        };
        NON_COMPOUND_WORDS.contains(&previous) || previous.chars().any(|c| c.is_ascii_digit())
    })
}

/// Check the current request against the catalog.
///
/// Qualifiers are looked for in the current text and every earlier
/// operator turn, so an answer to a previous clarifying question counts.
/// Requests that name a record type the catalog does not cover are left to
/// the planner.
pub fn detect(current_text: &str, history: &[ConversationTurn]) -> Option<Ambiguity> {
    let current = tokens(current_text);

    let term = CATALOG
        .iter()
        .find(|entry| used_as_head_noun(&current, entry.term))?;

    let mut scope = current;
    for turn in history.iter().filter(|t| t.role == TurnRole::Operator) {
        scope.extend(tokens(&turn.text));
    }
    if scope.iter().any(|t| names_table_directly(t)) {
        return None;
    }

    let scope_padded = format!(" {} ", scope.join(" "));
    if OTHER_RECORD_TYPES
        .iter()
        .any(|other| mentions(&scope_padded, other))
    {
        return None;
    }

    let qualified = term
        .candidates
        .iter()
        .flat_map(|c| c.qualifiers.iter())
        .any(|q| mentions(&scope_padded, q));
    if qualified {
        return None;
    }

    Some(Ambiguity {
        term: term.term,
        candidates: term.candidates.iter().map(|c| c.label).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_ticket_is_ambiguous() {
        let ambiguity = detect("Create a ticket", &[]).unwrap();
        assert_eq!(ambiguity.term, "ticket");
        assert_eq!(
            ambiguity.candidates,
            vec!["Incident", "Change Request", "Problem"]
        );
        let question = ambiguity.question();
        assert!(question.contains("Incident, Change Request, or Problem"));
        assert!(question.ends_with('?'));
    }

    #[test]
    fn plural_and_case_insensitive() {
        assert!(detect("Show me all open TICKETS", &[]).is_some());
    }

    #[test]
    fn qualified_request_passes() {
        assert_eq!(detect("Create a P1 incident for a Server Outage", &[]), None);
        assert_eq!(detect("Create a ticket for the outage", &[]), None);
        assert_eq!(detect("Open a change request ticket", &[]), None);
    }

    #[test]
    fn unrelated_request_passes() {
        assert_eq!(detect("Find the user with email admin@example.com", &[]), None);
    }

    #[test]
    fn earlier_operator_turn_qualifies() {
        let history = vec![
            ConversationTurn::operator("I need to work on a problem"),
            ConversationTurn::system("Sure, what should I do?"),
        ];
        assert_eq!(detect("Create a ticket", &history), None);
    }

    #[test]
    fn system_turns_do_not_qualify() {
        let history = vec![ConversationTurn::system(
            "Did you mean an Incident or a Change Request?",
        )];
        assert!(detect("Create a ticket", &history).is_some());
    }

    #[test]
    fn table_names_and_numbers_qualify() {
        assert_eq!(detect("Update the record in sys_user", &[]), None);
        assert_eq!(detect("Close ticket INC0010001", &[]), None);
    }

    #[test]
    fn word_boundaries_respected() {
        // "requested" is not "request", "itemized" is not "item".
        assert_eq!(detect("List itemized costs requested today", &[]), None);
    }

    #[test]
    fn compound_type_names_pass() {
        assert_eq!(detect("Find the business rule record named Foo", &[]), None);
        assert_eq!(detect("Show the script include record for Foo", &[]), None);
        assert_eq!(detect("Deactivate the knowledge article item KB about VPN", &[]), None);
    }

    #[test]
    fn other_record_type_anywhere_passes() {
        assert_eq!(detect("Find the record for business rule Foo", &[]), None);
        let history = vec![ConversationTurn::operator("I'm cleaning up client scripts")];
        assert_eq!(detect("Delete that record", &history), None);
    }

    #[test]
    fn generic_term_as_verb_passes() {
        assert_eq!(detect("Request access to the finance app", &[]), None);
    }

    #[test]
    fn bare_generic_terms_still_ask() {
        assert_eq!(detect("Create ticket", &[]).unwrap().term, "ticket");
        assert_eq!(detect("Open a new urgent ticket", &[]).unwrap().term, "ticket");
        assert_eq!(detect("Find the record named Foo", &[]).unwrap().term, "record");
        assert_eq!(detect("Create a P1 ticket", &[]).unwrap().term, "ticket");
    }

    #[test]
    fn two_candidates_question() {
        let ambiguity = Ambiguity {
            term: "item",
            candidates: vec!["Requested Item", "Configuration Item"],
        };
        assert!(
            ambiguity
                .question()
                .contains("Did you mean: Requested Item or Configuration Item?")
        );
    }
}
