//! Cycle-guarded lookup of a reference through chains of aliases.

use dtp_types::reference::single_reference;
use dtp_types::{Group, Token, TokenNode};
use tracing::trace;

use crate::error::{ResolveError, ResolveResult};

const BASE_PREFIX: &str = "base.";

/// A reference followed to the token that carries a concrete value.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution<'a> {
    /// Path of the final token as found in the tree.
    pub path: String,
    pub token: &'a Token,
    /// Paths of the alias tokens passed through on the way, in order.
    pub via: Vec<String>,
}

/// Find the token a reference path names.
///
/// Tries the path as given, then without a leading `base.`, then with one
/// added. Only tokens match; groups and literals do not.
pub fn find_token<'a>(root: &'a Group, path: &str) -> Option<(String, &'a Token)> {
    let mut candidates = vec![path.to_string()];
    match path.strip_prefix(BASE_PREFIX) {
        Some(stripped) => candidates.push(stripped.to_string()),
        None => candidates.push(format!("{BASE_PREFIX}{path}")),
    }
    candidates.into_iter().find_map(|candidate| {
        match root.lookup(&candidate) {
            Some(TokenNode::Token(token)) => Some((candidate, token)),
            _ => None,
        }
    })
}

/// Follow `path` through alias tokens (whose value is exactly one reference).
///
/// Returns `Ok(None)` when the first hop does not resolve. When a later hop
/// does not resolve, the last token reached is returned. Revisiting a token
/// is a [`ResolveError::CyclicReference`].
pub fn follow<'a>(root: &'a Group, path: &str) -> ResolveResult<Option<Resolution<'a>>> {
    let mut visited: Vec<String> = Vec::new();
    let mut current = path.to_string();
    let mut last: Option<(String, &'a Token)> = None;

    loop {
        let Some((found, token)) = find_token(root, &current) else {
            break;
        };
        if visited.contains(&found) {
            visited.push(found);
            return Err(ResolveError::CyclicReference { chain: visited });
        }
        visited.push(found.clone());
        let next = token.value().as_str().and_then(single_reference).map(str::to_string);
        last = Some((found, token));
        match next {
            Some(next) => {
                trace!(from = %current, to = %next, "following alias");
                current = next;
            }
            None => break,
        }
    }

    Ok(last.map(|(path, token)| {
        visited.pop();
        Resolution {
            path,
            token,
            via: visited,
        }
    }))
}
