use chrono::NaiveDate;
use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Resolution reported for entries that carry no physical resolution
/// (e.g. NMR ensembles).
pub const DEFAULT_RESOLUTION: f64 = 99.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum ExperimentalTechnique {
    XRayDiffraction,
    SolutionNmr,
    SolidStateNmr,
    ElectronMicroscopy,
    ElectronCrystallography,
    FiberDiffraction,
    NeutronDiffraction,
    SolutionScattering,
    PowderDiffraction,
    InfraredSpectroscopy,
    FluorescenceTransfer,
}

static TECHNIQUE_NAMES: Map<&'static str, ExperimentalTechnique> = phf_map! {
    "X-RAY DIFFRACTION" => ExperimentalTechnique::XRayDiffraction,
    "SOLUTION NMR" => ExperimentalTechnique::SolutionNmr,
    "SOLID-STATE NMR" => ExperimentalTechnique::SolidStateNmr,
    "ELECTRON MICROSCOPY" => ExperimentalTechnique::ElectronMicroscopy,
    "ELECTRON CRYSTALLOGRAPHY" => ExperimentalTechnique::ElectronCrystallography,
    "FIBER DIFFRACTION" => ExperimentalTechnique::FiberDiffraction,
    "NEUTRON DIFFRACTION" => ExperimentalTechnique::NeutronDiffraction,
    "SOLUTION SCATTERING" => ExperimentalTechnique::SolutionScattering,
    "POWDER DIFFRACTION" => ExperimentalTechnique::PowderDiffraction,
    "INFRARED SPECTROSCOPY" => ExperimentalTechnique::InfraredSpectroscopy,
    "FLUORESCENCE TRANSFER" => ExperimentalTechnique::FluorescenceTransfer,
};

impl ExperimentalTechnique {
    pub fn name(&self) -> &'static str {
        match self {
            ExperimentalTechnique::XRayDiffraction => "X-RAY DIFFRACTION",
            ExperimentalTechnique::SolutionNmr => "SOLUTION NMR",
            ExperimentalTechnique::SolidStateNmr => "SOLID-STATE NMR",
            ExperimentalTechnique::ElectronMicroscopy => "ELECTRON MICROSCOPY",
            ExperimentalTechnique::ElectronCrystallography => "ELECTRON CRYSTALLOGRAPHY",
            ExperimentalTechnique::FiberDiffraction => "FIBER DIFFRACTION",
            ExperimentalTechnique::NeutronDiffraction => "NEUTRON DIFFRACTION",
            ExperimentalTechnique::SolutionScattering => "SOLUTION SCATTERING",
            ExperimentalTechnique::PowderDiffraction => "POWDER DIFFRACTION",
            ExperimentalTechnique::InfraredSpectroscopy => "INFRARED SPECTROSCOPY",
            ExperimentalTechnique::FluorescenceTransfer => "FLUORESCENCE TRANSFER",
        }
    }

    /// Techniques whose entries carry a crystal lattice (unit cell and space group).
    pub fn is_crystallographic(&self) -> bool {
        matches!(
            self,
            ExperimentalTechnique::XRayDiffraction
                | ExperimentalTechnique::ElectronCrystallography
                | ExperimentalTechnique::NeutronDiffraction
                | ExperimentalTechnique::PowderDiffraction
        )
    }

    pub fn is_nmr(&self) -> bool {
        matches!(
            self,
            ExperimentalTechnique::SolutionNmr | ExperimentalTechnique::SolidStateNmr
        )
    }

    /// Electron techniques report resolution from a different record location
    /// in mmCIF, so it is not comparable across formats.
    pub fn is_electron_based(&self) -> bool {
        matches!(
            self,
            ExperimentalTechnique::ElectronMicroscopy
                | ExperimentalTechnique::ElectronCrystallography
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown experimental technique: '{0}'")]
pub struct ParseTechniqueError(pub String);

impl FromStr for ExperimentalTechnique {
    type Err = ParseTechniqueError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TECHNIQUE_NAMES
            .get(s.trim().to_uppercase().as_str())
            .copied()
            .ok_or_else(|| ParseTechniqueError(s.to_string()))
    }
}

impl TryFrom<String> for ExperimentalTechnique {
    type Error = ParseTechniqueError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ExperimentalTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CrystalCell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrystallographicInfo {
    #[serde(default)]
    pub space_group: Option<String>,
    #[serde(default)]
    pub cell: Option<CrystalCell>,
}

/// Entry-level metadata shared by both file formats.
#[derive(Debug, Clone, PartialEq)]
pub struct PdbHeader {
    pub id_code: Option<String>,
    pub authors: Option<String>,
    pub classification: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub dep_date: Option<NaiveDate>,
    pub mod_date: Option<NaiveDate>,
    pub experimental_techniques: BTreeSet<ExperimentalTechnique>,
    pub resolution: f64,
    pub crystallographic_info: Option<CrystallographicInfo>,
}

impl Default for PdbHeader {
    fn default() -> Self {
        Self {
            id_code: None,
            authors: None,
            classification: None,
            description: None,
            title: None,
            dep_date: None,
            mod_date: None,
            experimental_techniques: BTreeSet::new(),
            resolution: DEFAULT_RESOLUTION,
            crystallographic_info: None,
        }
    }
}

impl PdbHeader {
    pub fn has_technique(&self, technique: ExperimentalTechnique) -> bool {
        self.experimental_techniques.contains(&technique)
    }

    pub fn is_nmr(&self) -> bool {
        self.experimental_techniques.iter().any(|t| t.is_nmr())
    }

    pub fn is_crystallographic(&self) -> bool {
        self.experimental_techniques
            .iter()
            .any(|t| t.is_crystallographic())
    }

    pub fn is_electron_based(&self) -> bool {
        self.experimental_techniques
            .iter()
            .any(|t| t.is_electron_based())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technique_names_parse_case_insensitively() {
        assert_eq!(
            "x-ray diffraction".parse::<ExperimentalTechnique>().unwrap(),
            ExperimentalTechnique::XRayDiffraction
        );
        assert_eq!(
            " SOLUTION NMR ".parse::<ExperimentalTechnique>().unwrap(),
            ExperimentalTechnique::SolutionNmr
        );
        assert!("X-RAY".parse::<ExperimentalTechnique>().is_err());
    }

    #[test]
    fn technique_flags_follow_the_method() {
        assert!(ExperimentalTechnique::XRayDiffraction.is_crystallographic());
        assert!(ExperimentalTechnique::ElectronCrystallography.is_crystallographic());
        assert!(!ExperimentalTechnique::ElectronMicroscopy.is_crystallographic());
        assert!(ExperimentalTechnique::SolidStateNmr.is_nmr());
        assert!(!ExperimentalTechnique::XRayDiffraction.is_nmr());
        assert!(ExperimentalTechnique::ElectronMicroscopy.is_electron_based());
        assert!(!ExperimentalTechnique::NeutronDiffraction.is_electron_based());
    }

    #[test]
    fn header_flags_aggregate_over_technique_set() {
        let mut header = PdbHeader::default();
        assert!(!header.is_nmr());
        assert!(!header.is_crystallographic());

        header
            .experimental_techniques
            .insert(ExperimentalTechnique::SolutionNmr);
        header
            .experimental_techniques
            .insert(ExperimentalTechnique::XRayDiffraction);
        assert!(header.is_nmr());
        assert!(header.is_crystallographic());
        assert!(!header.is_electron_based());
    }

    #[test]
    fn default_header_uses_sentinel_resolution() {
        assert_eq!(PdbHeader::default().resolution, DEFAULT_RESOLUTION);
    }
}
