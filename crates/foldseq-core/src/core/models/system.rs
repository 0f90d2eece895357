use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::Residue;
use nalgebra::{Point3, Rotation3, Vector3};
use slotmap::SlotMap;
use std::collections::HashMap;

/// Key identifying a residue inside its chain. HETATM and ATOM residues may share
/// a sequence number, so the hetero flag is part of the identity.
type ResidueKey = (ChainId, bool, isize, Option<char>);

/// Represents one structure frame with its chains, residues, and atoms.
///
/// Storage is arena-based; traversal helpers always walk the hierarchy in
/// file order (chain, then residue, then atom), which is the order used both
/// for atom selection and for writing the frame back out.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms using a slot map for efficient ID management.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues using a slot map for efficient ID management.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains using a slot map for efficient ID management.
    chains: SlotMap<ChainId, Chain>,
    /// Chains in the order they were first encountered.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding residues by chain, hetero flag, sequence number and insertion code.
    residue_id_map: HashMap<ResidueKey, ResidueId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Returns the number of atoms in the system.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Retrieves an immutable reference to a residue by its ID.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Retrieves an immutable reference to a chain by its ID.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over all chains in the order they were added.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    /// Finds a chain ID by its single-character identifier.
    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue ID by its chain, record kind, sequence number and insertion code.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain containing the residue.
    /// * `is_hetero` - Whether the residue was read from HETATM records.
    /// * `residue_number` - The sequence number of the residue.
    /// * `insertion_code` - The insertion code, if any.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if the residue exists, otherwise `None`.
    pub fn find_residue_by_id(
        &self,
        chain_id: ChainId,
        is_hetero: bool,
        residue_number: isize,
        insertion_code: Option<char>,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, is_hetero, residue_number, insertion_code))
            .copied()
    }

    /// Adds a new chain to the system or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given ID already exists,
    /// it returns the existing chain ID without creating a duplicate.
    pub fn add_chain(&mut self, id: char) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(&id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id));
        self.chain_id_map.insert(id, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Adds a new residue to a chain or returns the existing one.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain to add the residue to.
    /// * `residue_number` - The sequence number of the residue.
    /// * `insertion_code` - The insertion code, if any.
    /// * `name` - The name of the residue.
    /// * `is_hetero` - Whether the residue is made of HETATM records.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if successful, otherwise `None` (the chain doesn't exist).
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
        is_hetero: bool,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, is_hetero, residue_number, insertion_code);

        let residue_id = *self.residue_id_map.entry(key).or_insert_with(|| {
            let residue = Residue::new(residue_number, insertion_code, name, chain_id, is_hetero);
            self.residues.insert(residue)
        });

        if !chain.residues.contains(&residue_id) {
            chain.residues.push(residue_id);
        }

        Some(residue_id)
    }

    /// Adds an atom to a specific residue.
    ///
    /// An atom whose name is already present in the residue is kept as an
    /// alternate conformer. The conformer with the highest occupancy (the
    /// earliest one on ties) is the one returned by name-based selection.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (the residue doesn't exist).
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, atom: Atom) -> Option<AtomId> {
        let selected_occupancy = self
            .residues
            .get(residue_id)?
            .get_atom_id_by_name(&atom.name)
            .and_then(|id| self.atoms.get(id))
            .map(|existing| existing.occupancy);
        let select = selected_occupancy.is_none_or(|occupancy| atom.occupancy > occupancy);

        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        self.residues
            .get_mut(residue_id)?
            .add_atom(&name, atom_id, select);

        Some(atom_id)
    }

    /// Returns all atom IDs in file order (chain, residue, atom).
    pub fn atom_ids_in_order(&self) -> Vec<AtomId> {
        self.chains_iter()
            .flat_map(|(_, chain)| chain.residues().iter())
            .filter_map(|&residue_id| self.residues.get(residue_id))
            .flat_map(|residue| residue.atoms().iter().copied())
            .collect()
    }

    /// Returns, residue by residue in file order, the atom called `name`.
    ///
    /// Each residue contributes at most one atom: for disordered atoms, the
    /// selected (highest occupancy) conformer. The comparison is made against the
    /// trimmed atom name, so `"CA"` matches both alpha carbons and calcium ions
    /// named `CA`.
    pub fn atom_ids_by_name(&self, name: &str) -> Vec<AtomId> {
        self.chains_iter()
            .flat_map(|(_, chain)| chain.residues().iter())
            .filter_map(|&residue_id| self.residues.get(residue_id))
            .filter_map(|residue| residue.get_atom_id_by_name(name))
            .collect()
    }

    /// Collects the positions of the given atoms, skipping unknown IDs.
    pub fn positions_of(&self, ids: &[AtomId]) -> Vec<Point3<f64>> {
        ids.iter()
            .filter_map(|&id| self.atoms.get(id).map(|atom| atom.position))
            .collect()
    }

    /// Applies the rigid transform `p' = R * p + t` to every atom in the system.
    pub fn apply_transform(&mut self, rotation: &Rotation3<f64>, translation: &Vector3<f64>) {
        for (_, atom) in self.atoms.iter_mut() {
            atom.position = rotation * atom.position + translation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    struct TestRefs {
        chain_a_id: ChainId,
        gly_id: ResidueId,
        gly_ca_id: AtomId,
        ala_ca_id: AtomId,
        ion_id: AtomId,
    }

    fn create_standard_test_system() -> (MolecularSystem, TestRefs) {
        let mut system = MolecularSystem::new();
        let chain_a_id = system.add_chain('A');

        let gly_id = system
            .add_residue(chain_a_id, 1, None, "GLY", false)
            .unwrap();
        system
            .add_atom_to_residue(gly_id, Atom::new(1, "N", gly_id, Point3::new(0.0, 0.0, 0.0)))
            .unwrap();
        let gly_ca_id = system
            .add_atom_to_residue(gly_id, Atom::new(2, "CA", gly_id, Point3::new(1.4, 0.0, 0.0)))
            .unwrap();

        let ala_id = system
            .add_residue(chain_a_id, 2, None, "ALA", false)
            .unwrap();
        let ala_ca_id = system
            .add_atom_to_residue(ala_id, Atom::new(3, "CA", ala_id, Point3::new(2.0, 1.0, 0.0)))
            .unwrap();

        let chain_b_id = system.add_chain('B');
        let ion_res = system
            .add_residue(chain_b_id, 101, None, "CA", true)
            .unwrap();
        let ion_id = system
            .add_atom_to_residue(ion_res, Atom::new(4, "CA", ion_res, Point3::new(9.0, 9.0, 9.0)))
            .unwrap();

        (
            system,
            TestRefs {
                chain_a_id,
                gly_id,
                gly_ca_id,
                ala_ca_id,
                ion_id,
            },
        )
    }

    #[test]
    fn add_chain_is_idempotent() {
        let (mut system, refs) = create_standard_test_system();
        assert_eq!(system.add_chain('A'), refs.chain_a_id);
        assert_eq!(system.chains_iter().count(), 2);
    }

    #[test]
    fn add_residue_is_idempotent_and_respects_insertion_codes() {
        let (mut system, refs) = create_standard_test_system();
        let again = system
            .add_residue(refs.chain_a_id, 1, None, "GLY", false)
            .unwrap();
        assert_eq!(again, refs.gly_id);

        let inserted = system
            .add_residue(refs.chain_a_id, 1, Some('A'), "SER", false)
            .unwrap();
        assert_ne!(inserted, refs.gly_id);
        assert_eq!(
            system.find_residue_by_id(refs.chain_a_id, false, 1, Some('A')),
            Some(inserted)
        );
        assert_eq!(system.chain(refs.chain_a_id).unwrap().residues().len(), 3);
    }

    #[test]
    fn add_residue_fails_for_unknown_chain() {
        let mut system = MolecularSystem::new();
        let result = system.add_residue(ChainId::default(), 1, None, "GLY", false);
        assert!(result.is_none());
    }

    #[test]
    fn atom_ids_by_name_walks_file_order_across_chains() {
        let (system, refs) = create_standard_test_system();
        let selected = system.atom_ids_by_name("CA");
        assert_eq!(selected, vec![refs.gly_ca_id, refs.ala_ca_id, refs.ion_id]);
    }

    #[test]
    fn positions_of_returns_positions_in_requested_order() {
        let (system, refs) = create_standard_test_system();
        let positions = system.positions_of(&[refs.ala_ca_id, refs.gly_ca_id]);
        assert_eq!(
            positions,
            vec![Point3::new(2.0, 1.0, 0.0), Point3::new(1.4, 0.0, 0.0)]
        );
    }

    #[test]
    fn hetero_residue_sharing_a_number_is_kept_separate() {
        let (mut system, refs) = create_standard_test_system();
        let water = system
            .add_residue(refs.chain_a_id, 1, None, "HOH", true)
            .unwrap();

        assert_ne!(water, refs.gly_id);
        assert_eq!(system.residue(water).unwrap().name, "HOH");
        assert_eq!(system.residue(refs.gly_id).unwrap().name, "GLY");
        assert_eq!(
            system.find_residue_by_id(refs.chain_a_id, true, 1, None),
            Some(water)
        );
        assert_eq!(
            system.find_residue_by_id(refs.chain_a_id, false, 1, None),
            Some(refs.gly_id)
        );
    }

    #[test]
    fn selection_uses_highest_occupancy_conformer() {
        let (mut system, refs) = create_standard_test_system();
        let mut low = Atom::new(10, "CB", refs.gly_id, Point3::new(0.0, 0.0, 0.0));
        low.occupancy = 0.4;
        low.alt_loc = Some('A');
        let mut high = Atom::new(11, "CB", refs.gly_id, Point3::new(1.0, 1.0, 1.0));
        high.occupancy = 0.6;
        high.alt_loc = Some('B');

        let low_id = system.add_atom_to_residue(refs.gly_id, low).unwrap();
        let high_id = system.add_atom_to_residue(refs.gly_id, high).unwrap();

        assert_eq!(system.atom_ids_by_name("CB"), vec![high_id]);
        let gly = system.residue(refs.gly_id).unwrap();
        assert!(gly.atoms().contains(&low_id));
        assert_eq!(system.atom_count(), 6);
    }

    #[test]
    fn apply_transform_moves_every_atom() {
        let (mut system, refs) = create_standard_test_system();
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let translation = Vector3::new(0.0, 0.0, 5.0);

        system.apply_transform(&rotation, &translation);

        let moved = system.atom(refs.gly_ca_id).unwrap().position;
        assert!((moved - Point3::new(0.0, 1.4, 5.0)).norm() < 1e-12);
        let ion = system.atom(refs.ion_id).unwrap().position;
        assert!((ion - Point3::new(-9.0, 9.0, 14.0)).norm() < 1e-12);
        assert_eq!(system.atom_count(), 4);
    }
}
