use super::atom::Atom;
use super::ids::{AtomId, ChainId, ResidueId};
use super::system::MolecularSystem;
use nalgebra::Point3;

/// Incremental constructor used by file readers.
///
/// Records are fed in file order: a chain is started, then a residue within
/// it, then atoms within that residue. Starting an already known chain or
/// residue resumes it instead of creating a duplicate.
#[derive(Default)]
pub struct MolecularSystemBuilder {
    system: MolecularSystem,

    // --- Builder-specific state for efficient construction ---
    current_chain: Option<ChainId>,
    current_residue: Option<ResidueId>,
}

impl MolecularSystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_chain(&mut self, id: char) -> &mut Self {
        self.current_chain = Some(self.system.add_chain(id));
        self.current_residue = None;
        self
    }

    pub fn start_residue(
        &mut self,
        id: isize,
        insertion_code: Option<char>,
        name: &str,
        is_hetero: bool,
    ) -> &mut Self {
        self.current_residue = self
            .current_chain
            .and_then(|chain| {
                self.system
                    .add_residue(chain, id, insertion_code, name, is_hetero)
            });
        self
    }

    /// Adds an atom to the current residue.
    ///
    /// `configure` receives the freshly created atom so callers can fill in the
    /// remaining record fields. Returns `None` when no residue has been started.
    pub fn add_atom(
        &mut self,
        serial: usize,
        name: &str,
        position: Point3<f64>,
        configure: impl FnOnce(&mut Atom),
    ) -> Option<AtomId> {
        let residue_id = self.current_residue?;
        let mut atom = Atom::new(serial, name, residue_id, position);
        configure(&mut atom);
        self.system.add_atom_to_residue(residue_id, atom)
    }

    pub fn build(self) -> MolecularSystem {
        self.system
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_groups_atoms_into_chains_and_residues() {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_chain('A').start_residue(1, None, "GLY", false);
        builder.add_atom(1, "N", Point3::new(0.0, 0.0, 0.0), |_| {});
        builder.add_atom(2, "CA", Point3::new(1.0, 0.0, 0.0), |atom| {
            atom.element = "C".to_string();
        });
        builder.start_residue(2, None, "ALA", false);
        builder.add_atom(3, "CA", Point3::new(2.0, 0.0, 0.0), |_| {});

        let system = builder.build();
        assert_eq!(system.atom_count(), 3);
        let chain_id = system.find_chain_by_id('A').unwrap();
        assert_eq!(system.chain(chain_id).unwrap().residues().len(), 2);

        let ca_ids = system.atom_ids_by_name("CA");
        assert_eq!(ca_ids.len(), 2);
        assert_eq!(system.atom(ca_ids[0]).unwrap().element, "C");
    }

    #[test]
    fn add_atom_without_residue_is_rejected() {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_chain('A');
        assert!(builder.add_atom(1, "CA", Point3::origin(), |_| {}).is_none());
        assert_eq!(builder.build().atom_count(), 0);
    }

    #[test]
    fn resuming_a_chain_appends_to_existing_residues() {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_chain('A').start_residue(1, None, "GLY", false);
        builder.add_atom(1, "CA", Point3::origin(), |_| {});
        builder.start_chain('B').start_residue(1, None, "GLY", false);
        builder.add_atom(2, "CA", Point3::origin(), |_| {});
        builder.start_chain('A').start_residue(2, None, "HOH", true);
        builder.add_atom(3, "O", Point3::origin(), |_| {});

        let system = builder.build();
        let chain_a = system.find_chain_by_id('A').unwrap();
        assert_eq!(system.chain(chain_a).unwrap().residues().len(), 2);
        assert_eq!(system.chains_iter().count(), 2);
    }

    #[test]
    fn hetero_residue_with_polymer_number_gets_its_own_residue() {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_chain('A').start_residue(1, None, "ALA", false);
        builder.add_atom(1, "CA", Point3::origin(), |_| {});
        builder.start_residue(1, None, "HOH", true);
        builder.add_atom(2, "O", Point3::origin(), |_| {});

        let system = builder.build();
        let chain_a = system.find_chain_by_id('A').unwrap();
        let residues = system.chain(chain_a).unwrap().residues();
        assert_eq!(residues.len(), 2);
        assert_eq!(system.residue(residues[1]).unwrap().name, "HOH");
    }
}
