use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, GroupId};
use super::residue::{Group, ResidueType};
use nalgebra::Point3;
use slotmap::SlotMap;
use std::collections::HashMap;

/// Classification code reported when a structure carries none.
pub const UNKNOWN_CLASSIFICATION: &str = "unknown";

/// An in-memory protein structure: chains of residue instances ("groups") holding atoms.
///
/// This is the only view of a target structure the matching engine needs. It is built once
/// by a structure provider and then shared read-only across worker threads.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// The structure identifier (e.g., a PDB code).
    id: String,
    /// The structure-level classification code (e.g., an EC number), if known.
    classification: Option<String>,
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residue instances.
    groups: SlotMap<GroupId, Group>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
    /// Lookup map for finding groups by chain, sequence number and insertion code.
    group_id_map: HashMap<(ChainId, isize, Option<char>), GroupId>,
}

impl Structure {
    /// Creates a new, empty structure with the given identifier.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the classification code, falling back to `"unknown"` when absent.
    pub fn classification(&self) -> &str {
        self.classification
            .as_deref()
            .unwrap_or(UNKNOWN_CLASSIFICATION)
    }

    pub fn set_classification(&mut self, code: Option<String>) {
        self.classification = code.filter(|c| !c.trim().is_empty());
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn groups_iter(&self) -> impl Iterator<Item = (GroupId, &Group)> {
        self.groups.iter()
    }

    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chains.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Adds a new chain or returns the existing one with the same identifier.
    pub fn add_chain(&mut self, id: char) -> ChainId {
        *self
            .chain_id_map
            .entry(id)
            .or_insert_with(|| self.chains.insert(Chain::new(id)))
    }

    /// Adds a residue instance to a chain or returns the existing one.
    ///
    /// This method is idempotent for a given `(chain, number, insertion_code)` key.
    ///
    /// # Return
    ///
    /// Returns `None` if the chain does not exist.
    pub fn add_group(
        &mut self,
        chain_id: ChainId,
        residue_type: ResidueType,
        name: &str,
        number: isize,
        insertion_code: Option<char>,
    ) -> Option<GroupId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, number, insertion_code);

        let group_id = *self.group_id_map.entry(key).or_insert_with(|| {
            let group = Group::new(residue_type, name, number, insertion_code, chain_id);
            self.groups.insert(group)
        });

        if !chain.groups.contains(&group_id) {
            chain.groups.push(group_id);
        }
        Some(group_id)
    }

    /// Adds an atom to a residue instance.
    ///
    /// # Return
    ///
    /// Returns `None` if the group does not exist.
    pub fn add_atom(
        &mut self,
        group_id: GroupId,
        name: &str,
        serial: usize,
        position: Point3<f64>,
    ) -> Option<AtomId> {
        if !self.groups.contains_key(group_id) {
            return None;
        }
        let atom = Atom::new(name, serial, group_id, position);
        let atom_name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        self.groups.get_mut(group_id)?.add_atom(&atom_name, atom_id);
        Some(atom_id)
    }

    /// Iterates over residue instances of one type, in chain order then file order.
    pub fn groups_of_type(
        &self,
        residue_type: ResidueType,
    ) -> impl Iterator<Item = (GroupId, &Group)> + '_ {
        self.chains.values().flat_map(move |chain| {
            chain.groups.iter().filter_map(move |&group_id| {
                self.groups
                    .get(group_id)
                    .filter(|g| g.residue_type == residue_type)
                    .map(|g| (group_id, g))
            })
        })
    }

    /// Iterates over the atoms with a given name inside one residue instance.
    pub fn atoms_named<'a>(
        &'a self,
        group_id: GroupId,
        name: &'a str,
    ) -> impl Iterator<Item = (AtomId, &'a Atom)> + 'a {
        self.groups
            .get(group_id)
            .into_iter()
            .flat_map(|g| g.atoms.iter())
            .filter_map(move |&atom_id| {
                self.atoms
                    .get(atom_id)
                    .filter(|a| a.name == name)
                    .map(|a| (atom_id, a))
            })
    }

    /// Iterates over the atoms of one residue instance in file order.
    pub fn group_atoms(&self, group_id: GroupId) -> impl Iterator<Item = &Atom> + '_ {
        self.groups
            .get(group_id)
            .into_iter()
            .flat_map(|g| g.atoms.iter())
            .filter_map(|&atom_id| self.atoms.get(atom_id))
    }

    /// Finds the first residue instance with the given type and residue identifier
    /// (sequence number plus insertion code), searching all chains in order.
    pub fn find_group(&self, residue_type: ResidueType, residue_id: &str) -> Option<GroupId> {
        let residue_id = residue_id.trim();
        self.groups_of_type(residue_type)
            .find(|(_, g)| g.residue_id() == residue_id)
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_chain_structure() -> Structure {
        let mut s = Structure::new("1ABC");
        let a = s.add_chain('A');
        let b = s.add_chain('B');
        let his = s
            .add_group(a, ResidueType::Histidine, "HIS", 57, None)
            .unwrap();
        s.add_atom(his, "CA", 1, Point3::new(0.0, 0.0, 0.0));
        s.add_atom(his, "NE2", 2, Point3::new(1.0, 0.0, 0.0));
        let ser = s.add_group(a, ResidueType::Serine, "SER", 195, None).unwrap();
        s.add_atom(ser, "OG", 3, Point3::new(3.0, 0.0, 0.0));
        let his_b = s
            .add_group(b, ResidueType::Histidine, "HIS", 57, Some('A'))
            .unwrap();
        s.add_atom(his_b, "NE2", 4, Point3::new(9.0, 0.0, 0.0));
        s
    }

    #[test]
    fn classification_falls_back_to_unknown() {
        let mut s = Structure::new("1ABC");
        assert_eq!(s.classification(), "unknown");
        s.set_classification(Some("3.4.21.4".to_string()));
        assert_eq!(s.classification(), "3.4.21.4");
        s.set_classification(Some("  ".to_string()));
        assert_eq!(s.classification(), "unknown");
    }

    #[test]
    fn add_chain_and_group_are_idempotent() {
        let mut s = Structure::new("X");
        let a1 = s.add_chain('A');
        let a2 = s.add_chain('A');
        assert_eq!(a1, a2);
        let g1 = s.add_group(a1, ResidueType::Serine, "SER", 1, None).unwrap();
        let g2 = s.add_group(a1, ResidueType::Serine, "SER", 1, None).unwrap();
        assert_eq!(g1, g2);
        assert_eq!(s.chain(a1).unwrap().groups().len(), 1);
    }

    #[test]
    fn add_atom_to_missing_group_returns_none() {
        let mut s = Structure::new("X");
        assert!(s
            .add_atom(GroupId::default(), "CA", 1, Point3::origin())
            .is_none());
    }

    #[test]
    fn groups_of_type_spans_chains() {
        let s = two_chain_structure();
        let numbers: Vec<_> = s
            .groups_of_type(ResidueType::Histidine)
            .map(|(_, g)| g.residue_id())
            .collect();
        assert_eq!(numbers, vec!["57".to_string(), "57A".to_string()]);
        assert_eq!(s.groups_of_type(ResidueType::AsparticAcid).count(), 0);
    }

    #[test]
    fn atoms_named_filters_within_group() {
        let s = two_chain_structure();
        let (his, _) = s.groups_of_type(ResidueType::Histidine).next().unwrap();
        let names: Vec<_> = s.atoms_named(his, "NE2").map(|(_, a)| a.serial).collect();
        assert_eq!(names, vec![2]);
        assert_eq!(s.atoms_named(his, "OG").count(), 0);
    }

    #[test]
    fn find_group_matches_type_and_residue_id() {
        let s = two_chain_structure();
        assert!(s.find_group(ResidueType::Serine, "195").is_some());
        assert!(s.find_group(ResidueType::Histidine, "57A").is_some());
        assert!(s.find_group(ResidueType::Histidine, "195").is_none());
    }
}
