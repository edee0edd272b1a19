//! Breeding - DNA inventory and the pairs a collection still needs

/// A stack of DNA items as listed by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnaStack {
    pub item_id: u64,
    pub name: String,
    pub amount: u32,
    /// Whether the DNA can take the mother role
    pub can_mom: bool,
}

impl DnaStack {
    /// Whether the skip list names this stack by id or by name
    pub fn is_skipped(&self, skip_list: &[String]) -> bool {
        skip_list.iter().any(|entry| {
            let entry = entry.trim();
            entry == self.name || entry.parse::<u64>().ok() == Some(self.item_id)
        })
    }
}

/// A (father, mother) template pair required by an unfinished collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeededPair {
    pub father: u64,
    pub mother: u64,
}

impl NeededPair {
    pub const fn new(father: u64, mother: u64) -> Self {
        Self { father, mother }
    }

    /// Decode a collection target: high digits are the father template,
    /// the last three digits the mother template
    pub const fn from_collection_code(code: u64) -> Self {
        Self {
            father: code / 1000,
            mother: code % 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_code_split() {
        assert_eq!(NeededPair::from_collection_code(101_102), NeededPair::new(101, 102));
        assert_eq!(NeededPair::from_collection_code(1_205_007), NeededPair::new(1205, 7));
        assert_eq!(NeededPair::from_collection_code(42), NeededPair::new(0, 42));
    }

    #[test]
    fn test_skip_list_by_id_or_name() {
        let dna = DnaStack {
            item_id: 134,
            name: "Dragon".into(),
            amount: 1,
            can_mom: true,
        };

        assert!(dna.is_skipped(&["134".into()]));
        assert!(dna.is_skipped(&["Dragon".into()]));
        assert!(!dna.is_skipped(&["135".into(), "Cat".into()]));
        assert!(!dna.is_skipped(&[]));
    }
}
