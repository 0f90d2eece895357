use super::ids::{AtomId, ChainId};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub id: isize,                          // Residue sequence number from source file
    pub insertion_code: Option<char>,       // PDB insertion code (column 27)
    pub name: String,                       // Name of the residue (e.g., "ALA", "HOH")
    pub chain_id: ChainId,                  // ID of the parent chain
    pub is_hetero: bool,                    // Whether the residue came from HETATM records
    pub(crate) atoms: Vec<AtomId>,          // Atoms in file order, alternates grouped together
    atom_name_map: HashMap<String, AtomId>, // Map from atom name to its selected conformer
    alternates: Vec<(String, AtomId)>,      // Later conformers of an already present name
}

impl Residue {
    pub(crate) fn new(
        id: isize,
        insertion_code: Option<char>,
        name: &str,
        chain_id: ChainId,
        is_hetero: bool,
    ) -> Self {
        Self {
            id,
            insertion_code,
            name: name.to_string(),
            chain_id,
            is_hetero,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
            alternates: Vec::new(),
        }
    }

    /// Appends an atom. A repeated name is an alternate conformer: it is placed
    /// right after the previous conformers of that name, and becomes the one
    /// returned by [`Self::get_atom_id_by_name`] only when `select` is set.
    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId, select: bool) {
        match self.atom_name_map.get(atom_name).copied() {
            Some(existing) => {
                let position = self
                    .atoms
                    .iter()
                    .rposition(|&id| id == existing || self.is_conformer_of(id, atom_name))
                    .map_or(self.atoms.len(), |i| i + 1);
                self.atoms.insert(position, atom_id);
                self.alternates.push((atom_name.to_string(), atom_id));
                if select {
                    self.atom_name_map.insert(atom_name.to_string(), atom_id);
                }
            }
            None => {
                self.atoms.push(atom_id);
                self.atom_name_map.insert(atom_name.to_string(), atom_id);
            }
        }
    }

    fn is_conformer_of(&self, atom_id: AtomId, atom_name: &str) -> bool {
        self.alternates
            .iter()
            .any(|(name, id)| *id == atom_id && name == atom_name)
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    /// The atom called `name`; for disordered atoms, the selected conformer.
    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn add_atom_records_order_and_name_lookup() {
        let mut ids: SlotMap<AtomId, ()> = SlotMap::with_key();
        let n = ids.insert(());
        let ca = ids.insert(());

        let mut residue = Residue::new(12, Some('A'), "GLY", ChainId::default(), false);
        residue.add_atom("N", n, true);
        residue.add_atom("CA", ca, true);

        assert_eq!(residue.atoms(), &[n, ca]);
        assert_eq!(residue.get_atom_id_by_name("CA"), Some(ca));
        assert_eq!(residue.get_atom_id_by_name("CB"), None);
        assert_eq!(residue.insertion_code, Some('A'));
    }

    #[test]
    fn alternate_conformers_stay_next_to_each_other() {
        let mut ids: SlotMap<AtomId, ()> = SlotMap::with_key();
        let ca_a = ids.insert(());
        let cb = ids.insert(());
        let ca_b = ids.insert(());
        let ca_c = ids.insert(());

        let mut residue = Residue::new(5, None, "SER", ChainId::default(), false);
        residue.add_atom("CA", ca_a, true);
        residue.add_atom("CB", cb, true);
        residue.add_atom("CA", ca_b, true);
        residue.add_atom("CA", ca_c, false);

        assert_eq!(residue.atoms(), &[ca_a, ca_b, ca_c, cb]);
        assert_eq!(residue.get_atom_id_by_name("CA"), Some(ca_b));
        assert_eq!(residue.get_atom_id_by_name("CB"), Some(cb));
    }
}
