use crate::core::models::builder::StructureBuilder;
use crate::core::models::chain::Compound;
use crate::core::models::group::GroupType;
use crate::core::models::header::{
    CrystalCell, CrystallographicInfo, ExperimentalTechnique, PdbHeader,
};
use crate::core::models::structure::Structure;
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub(crate) struct ChainFixture {
    pub id: &'static str,
    pub internal_id: Option<&'static str>,
    pub compound: bool,
    pub amino: usize,
    pub nucleotide: usize,
    pub hetatm: usize,
    pub seqres: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct EntryFixture {
    pub header: PdbHeader,
    pub nr_models: usize,
    pub biological_assembly: bool,
    pub chains: Vec<ChainFixture>,
}

impl EntryFixture {
    /// An X-ray entry with one protein chain `A` and one water chain `W`.
    pub fn xray() -> Self {
        Self {
            header: PdbHeader {
                id_code: Some("1ABC".to_string()),
                authors: Some("Doe, J., Roe, R.".to_string()),
                classification: Some("HYDROLASE".to_string()),
                description: Some("Lysozyme C".to_string()),
                title: Some("Crystal Structure of Lysozyme".to_string()),
                dep_date: NaiveDate::from_ymd_opt(2001, 5, 17),
                mod_date: NaiveDate::from_ymd_opt(2011, 7, 13),
                experimental_techniques: BTreeSet::from([ExperimentalTechnique::XRayDiffraction]),
                resolution: 2.00,
                crystallographic_info: Some(CrystallographicInfo {
                    space_group: Some("P 21 21 21".to_string()),
                    cell: Some(CrystalCell {
                        a: 10.0,
                        b: 20.0,
                        c: 30.0,
                        alpha: 90.0,
                        beta: 90.0,
                        gamma: 90.0,
                    }),
                }),
            },
            nr_models: 1,
            biological_assembly: false,
            chains: vec![
                ChainFixture {
                    id: "A",
                    internal_id: Some("A"),
                    compound: true,
                    amino: 3,
                    nucleotide: 0,
                    hetatm: 1,
                    seqres: 3,
                },
                ChainFixture {
                    id: "W",
                    internal_id: Some("C"),
                    compound: false,
                    amino: 0,
                    nucleotide: 0,
                    hetatm: 2,
                    seqres: 0,
                },
            ],
        }
    }

    /// A solution NMR ensemble with a single protein chain.
    pub fn nmr() -> Self {
        let mut entry = Self::xray();
        entry.header.experimental_techniques =
            BTreeSet::from([ExperimentalTechnique::SolutionNmr]);
        entry.header.resolution = crate::core::models::header::DEFAULT_RESOLUTION;
        entry.header.crystallographic_info = None;
        entry.nr_models = 20;
        entry.chains.truncate(1);
        entry
    }

    pub fn chain_mut(&mut self, id: &str) -> &mut ChainFixture {
        self.chains
            .iter_mut()
            .find(|c| c.id == id)
            .expect("fixture chain must exist")
    }

    pub fn cell_mut(&mut self) -> &mut CrystalCell {
        self.header
            .crystallographic_info
            .as_mut()
            .and_then(|info| info.cell.as_mut())
            .expect("fixture must carry a cell")
    }

    pub fn build(&self) -> Structure {
        let mut builder = StructureBuilder::new(self.header.clone());
        builder
            .nr_models(self.nr_models)
            .biological_assembly(self.biological_assembly);

        for (mol_id, fixture) in self.chains.iter().enumerate() {
            let compound = fixture.compound.then(|| Compound {
                mol_id: mol_id as u32 + 1,
                name: Some(format!("MOLECULE {}", fixture.id)),
            });
            let chain = builder
                .start_chain(fixture.id, fixture.internal_id, compound)
                .expect("fixture chain ids must be unique");

            let mut number = 1;
            let groups = [
                (fixture.amino, "ALA", GroupType::AminoAcid),
                (fixture.nucleotide, "DA", GroupType::Nucleotide),
                (fixture.hetatm, "HOH", GroupType::Hetatm),
            ];
            for (count, name, group_type) in groups {
                for _ in 0..count {
                    builder.add_atom_group(chain, name, number, None, group_type);
                    number += 1;
                }
            }
            for i in 0..fixture.seqres {
                builder.add_seqres_group(chain, "ALA", i as isize + 1, GroupType::AminoAcid);
            }
        }
        builder.build()
    }
}
