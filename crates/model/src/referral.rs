use std::collections::BTreeMap;

use crate::address::Address;

/// Directed forest of referee→referrer edges.
///
/// Each referee has at most one referrer, assigned once. Self-references and
/// assignments that would make an address its own ancestor are rejected, so
/// ancestor chains always terminate.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferralGraph {
    referrer_of: BTreeMap<Address, Address>,
}

impl ReferralGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the referrer of `referee`, if one was ever assigned.
    pub fn referrer_of(&self, referee: &Address) -> Option<&Address> {
        self.referrer_of.get(referee)
    }

    /// Number of edges in the forest.
    pub fn len(&self) -> usize {
        self.referrer_of.len()
    }

    /// Whether the forest has no edges.
    pub fn is_empty(&self) -> bool {
        self.referrer_of.is_empty()
    }

    /// Assign a referrer to `referee`.
    ///
    /// Re-assigning the same referrer is a no-op. A different referrer fails
    /// with [`RefererAlreadySet`](crate::Error::RefererAlreadySet);
    /// self-referral or an assignment that would make `referee` its own
    /// ancestor fails with [`InvalidReferer`](crate::Error::InvalidReferer).
    pub fn assign(&mut self, referee: Address, referrer: Address) -> crate::Result<()> {
        if referrer == referee {
            return Err(crate::Error::InvalidReferer);
        }
        if let Some(current) = self.referrer_of.get(&referee) {
            if *current == referrer {
                return Ok(());
            }
            return Err(crate::Error::RefererAlreadySet);
        }
        if self.ancestors(&referrer).any(|ancestor| *ancestor == referee) {
            return Err(crate::Error::InvalidReferer);
        }
        self.referrer_of.insert(referee, referrer);
        Ok(())
    }

    /// Iterate the ancestor chain of `referee`, nearest first.
    ///
    /// The chain has no depth limit; termination is guaranteed by the forest
    /// invariant upheld by [`assign`](Self::assign).
    pub fn ancestors<'a>(&'a self, referee: &'a Address) -> Ancestors<'a> {
        Ancestors {
            graph: self,
            current: referee,
        }
    }
}

/// Iterator over an ancestor chain, returned by [`ReferralGraph::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    graph: &'a ReferralGraph,
    current: &'a Address,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Address;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.graph.referrer_of.get(self.current)?;
        self.current = next;
        Some(next)
    }
}
