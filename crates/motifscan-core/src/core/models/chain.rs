use super::ids::GroupId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: char,                     // Chain identifier (e.g., 'A', 'B')
    pub(crate) groups: Vec<GroupId>,  // Residue instances in file order
}

impl Chain {
    pub(crate) fn new(id: char) -> Self {
        Self {
            id,
            groups: Vec::new(),
        }
    }

    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }
}
