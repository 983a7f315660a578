use bit_set::BitSet;

/// Set of field indices explicitly provided at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    container: BitSet,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize) {
        self.container.insert(index);
    }

    pub fn contains(&self, index: usize) -> bool {
        self.container.contains(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.container.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn len(&self) -> usize {
        self.container.len()
    }
}

impl FromIterator<usize> for FieldSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self {
            container: BitSet::from_iter(iter),
        }
    }
}
