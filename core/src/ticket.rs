//! Ticket identifier generation.
//!
//! A ticket identifier is an opaque value with no semantic meaning beyond
//! identity. Ticket lookup is a public, unauthenticated operation, so the
//! identifier must not be guessable: the random component carries 62 bits of
//! entropy from the thread RNG. The embedded timestamp is incidental and not
//! load-bearing.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters used for the random component (36 symbols, ~5.17 bits each).
const TICKET_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of the random component; 12 symbols over a 36-character alphabet
/// is 62 bits of entropy.
const TICKET_RANDOM_LEN: usize = 12;

/// Opaque, unique identifier of an issued ticket.
///
/// Issued exactly once, inside the approval transition (or the atomic
/// auto-approval creation); never reassigned and never reused.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Generate a fresh ticket identifier: `TKT-<unix-millis>-<12 random
    /// characters from [A-Z0-9]>`.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let token: String = (0..TICKET_RANDOM_LEN)
            .map(|_| char::from(TICKET_ALPHABET[rng.gen_range(0..TICKET_ALPHABET.len())]))
            .collect();
        Self(format!("TKT-{}-{token}", chrono::Utc::now().timestamp_millis()))
    }

    /// Wrap a ticket identifier received from the outside (lookup paths,
    /// storage rows). No validation: unknown identifiers simply match
    /// nothing.
    #[must_use]
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn assert_well_formed(ticket: &TicketId) {
        let parts: Vec<&str> = ticket.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TKT");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), TICKET_RANDOM_LEN);
        assert!(
            parts[2]
                .bytes()
                .all(|b| TICKET_ALPHABET.contains(&b))
        );
    }

    #[test]
    fn generated_tickets_are_well_formed() {
        assert_well_formed(&TicketId::generate());
    }

    #[test]
    fn no_duplicates_in_a_large_batch() {
        let tickets: HashSet<TicketId> = (0..10_000).map(|_| TicketId::generate()).collect();
        assert_eq!(tickets.len(), 10_000);
    }

    proptest! {
        // The generator takes no input, but the property should hold on
        // every draw, not just one.
        #[test]
        fn always_well_formed(_seed in 0u64..1000) {
            assert_well_formed(&TicketId::generate());
        }
    }
}
