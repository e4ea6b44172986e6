//! Stimulus sequences.
//!
//! A trial is driven by an ordered stream of events written as symbols:
//! a letter presents a memorandum, a digit (or the characters following `9`
//! in ASCII for bursts longer than ten) is one distractor operation, and `#`
//! starts recall. The standard complex-span list for 3 memoranda and 2
//! operations reads `A01B01C01#`.

use std::fmt;

use crate::config::{MAX_OPERATIONS, RECALL_MARKER};
use crate::error::{Result, SimulationError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stimulus {
    /// Present the memorandum with this 0-based index.
    Memorandum(usize),
    /// Operation number `j` (0-based) of the current burst.
    Operation(usize),
    /// End of the list: serial recall.
    Recall,
}

impl Stimulus {
    pub fn from_symbol(symbol: char) -> Result<Self> {
        match symbol {
            'A'..='Z' => Ok(Stimulus::Memorandum(symbol as usize - 'A' as usize)),
            c if c == RECALL_MARKER => Ok(Stimulus::Recall),
            c if ('0'..='@').contains(&c) => Ok(Stimulus::Operation(c as usize - '0' as usize)),
            c => Err(SimulationError::UnknownSymbol(c)),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Stimulus::Memorandum(i) => (b'A' + i as u8) as char,
            Stimulus::Operation(j) => (b'0' + j as u8) as char,
            Stimulus::Recall => RECALL_MARKER,
        }
    }
}

/// An ordered list of events ending with [`Stimulus::Recall`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StimulusSequence {
    events: Vec<Stimulus>,
}

impl StimulusSequence {
    /// `memoranda` letters, each followed by `operations` operations, then recall.
    pub fn standard(memoranda: usize, operations: usize) -> Result<Self> {
        if operations > MAX_OPERATIONS {
            return Err(SimulationError::TooManyOperations {
                got: operations,
                max: MAX_OPERATIONS,
            });
        }
        let mut events = Vec::with_capacity(memoranda * (operations + 1) + 1);
        for i in 0..memoranda {
            events.push(Stimulus::Memorandum(i));
            events.extend((0..operations).map(Stimulus::Operation));
        }
        events.push(Stimulus::Recall);
        Ok(Self { events })
    }

    /// Parse a textual sequence. Whitespace is ignored and anything after the
    /// first recall marker is dropped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut events = Vec::new();
        for c in text.chars().filter(|c| !c.is_whitespace()) {
            let stimulus = Stimulus::from_symbol(c)?;
            events.push(stimulus);
            if stimulus == Stimulus::Recall {
                return Ok(Self { events });
            }
        }
        Err(SimulationError::MissingRecall)
    }

    pub fn events(&self) -> &[Stimulus] {
        &self.events
    }

    /// Memoranda presented before recall.
    pub fn memoranda(&self) -> usize {
        self.events
            .iter()
            .filter(|s| matches!(s, Stimulus::Memorandum(_)))
            .count()
    }
}

impl fmt::Display for StimulusSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.events {
            write!(f, "{}", s.symbol())?;
        }
        Ok(())
    }
}
