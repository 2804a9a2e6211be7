//! Token-level inspection of SQL text handed to migration units.
//!
//! Uses the sqlparser tokenizer rather than a regex so that keywords inside
//! string literals, quoted identifiers, and comments are never matched.

use crate::error::{DbError, DbResult};
use sqlparser::dialect::DuckDbDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

/// Leading keywords that begin a transaction-control statement.
const TRANSACTION_KEYWORDS: &[&str] = &[
    "BEGIN",
    "COMMIT",
    "END",
    "ROLLBACK",
    "ABORT",
    "SAVEPOINT",
    "RELEASE",
];

fn tokenize(sql: &str) -> DbResult<Vec<Token>> {
    let dialect = DuckDbDialect {};
    Tokenizer::new(&dialect, sql)
        .tokenize()
        .map_err(|e| DbError::InvalidSql(e.to_string()))
}

fn significant(tokens: Vec<Token>) -> impl Iterator<Item = Token> {
    tokens
        .into_iter()
        .filter(|t| !matches!(t, Token::Whitespace(_) | Token::EOF))
}

fn bare_keyword(token: &Token) -> Option<String> {
    match token {
        Token::Word(w) if w.quote_style.is_none() => Some(w.value.to_ascii_uppercase()),
        _ => None,
    }
}

/// Return the first transaction-control statement found in `sql`, if any.
///
/// Only the first word of each `;`-separated statement is inspected, so
/// `CASE ... END` and columns named `commit` inside a statement are fine.
pub fn find_transaction_control(sql: &str) -> DbResult<Option<String>> {
    let mut at_start = true;
    let mut pending_start = false;

    for token in significant(tokenize(sql)?) {
        if token == Token::SemiColon {
            at_start = true;
            pending_start = false;
            continue;
        }

        let keyword = bare_keyword(&token);
        if pending_start {
            if keyword.as_deref() == Some("TRANSACTION") {
                return Ok(Some("START TRANSACTION".to_string()));
            }
            pending_start = false;
        }

        if at_start {
            at_start = false;
            match keyword.as_deref() {
                Some("START") => pending_start = true,
                Some(k) if TRANSACTION_KEYWORDS.contains(&k) => return Ok(Some(k.to_string())),
                _ => {}
            }
        }
    }

    Ok(None)
}

/// Reject `sql` if it contains a transaction-control statement.
pub fn ensure_no_transaction_control(sql: &str) -> DbResult<()> {
    match find_transaction_control(sql)? {
        Some(statement) => Err(DbError::TransactionControl { statement }),
        None => Ok(()),
    }
}

/// True when `sql` holds nothing but whitespace, comments, and semicolons.
pub fn is_blank(sql: &str) -> DbResult<bool> {
    Ok(significant(tokenize(sql)?).all(|t| t == Token::SemiColon))
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
