use crate::core::io::source::RecordFormat;
use crate::core::models::header::ExperimentalTechnique;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every field checked by the equivalence rules.
///
/// The kebab-case names are used in diagnostics and as keys of the
/// exception table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    // --- Structure-level predicates ---
    IsNmr,
    IsCrystallographic,
    NrModels,
    PdbCode,
    BiologicalAssembly,

    // --- Header ---
    IdCode,
    Authors,
    Classification,
    Description,
    DepDate,
    ModDate,
    ExperimentalTechniques,
    Resolution,
    Title,
    NmrResolution,
    CrystallographicInfo,
    SpaceGroup,
    CrystalCell,
    CellA,
    CellB,
    CellC,
    CellAlpha,
    CellBeta,
    CellGamma,

    // --- Chains ---
    ChainCount,
    ChainPresence,
    ChainId,
    ChainIdLength,
    InternalChainId,
    Compound,
    Parent,
    AtomLength,
    AminoAcidCount,
    AtomLengthMin,
    SeqResLength,
    AtomGroupsSize,
    GroupTypeSum,
    GroupTypeSumVsAtomLength,
}

impl Field {
    pub const ALL: [Field; 38] = [
        Field::IsNmr,
        Field::IsCrystallographic,
        Field::NrModels,
        Field::PdbCode,
        Field::BiologicalAssembly,
        Field::IdCode,
        Field::Authors,
        Field::Classification,
        Field::Description,
        Field::DepDate,
        Field::ModDate,
        Field::ExperimentalTechniques,
        Field::Resolution,
        Field::Title,
        Field::NmrResolution,
        Field::CrystallographicInfo,
        Field::SpaceGroup,
        Field::CrystalCell,
        Field::CellA,
        Field::CellB,
        Field::CellC,
        Field::CellAlpha,
        Field::CellBeta,
        Field::CellGamma,
        Field::ChainCount,
        Field::ChainPresence,
        Field::ChainId,
        Field::ChainIdLength,
        Field::InternalChainId,
        Field::Compound,
        Field::Parent,
        Field::AtomLength,
        Field::AminoAcidCount,
        Field::AtomLengthMin,
        Field::SeqResLength,
        Field::AtomGroupsSize,
        Field::GroupTypeSum,
        Field::GroupTypeSumVsAtomLength,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::IsNmr => "is-nmr",
            Field::IsCrystallographic => "is-crystallographic",
            Field::NrModels => "nr-models",
            Field::PdbCode => "pdb-code",
            Field::BiologicalAssembly => "biological-assembly",
            Field::IdCode => "id-code",
            Field::Authors => "authors",
            Field::Classification => "classification",
            Field::Description => "description",
            Field::DepDate => "dep-date",
            Field::ModDate => "mod-date",
            Field::ExperimentalTechniques => "experimental-techniques",
            Field::Resolution => "resolution",
            Field::Title => "title",
            Field::NmrResolution => "nmr-resolution",
            Field::CrystallographicInfo => "crystallographic-info",
            Field::SpaceGroup => "space-group",
            Field::CrystalCell => "crystal-cell",
            Field::CellA => "cell-a",
            Field::CellB => "cell-b",
            Field::CellC => "cell-c",
            Field::CellAlpha => "cell-alpha",
            Field::CellBeta => "cell-beta",
            Field::CellGamma => "cell-gamma",
            Field::ChainCount => "chain-count",
            Field::ChainPresence => "chain-presence",
            Field::ChainId => "chain-id",
            Field::ChainIdLength => "chain-id-length",
            Field::InternalChainId => "internal-chain-id",
            Field::Compound => "compound",
            Field::Parent => "parent",
            Field::AtomLength => "atom-length",
            Field::AminoAcidCount => "amino-acid-count",
            Field::AtomLengthMin => "atom-length-min",
            Field::SeqResLength => "seqres-length",
            Field::AtomGroupsSize => "atom-groups-size",
            Field::GroupTypeSum => "group-type-sum",
            Field::GroupTypeSumVsAtomLength => "group-type-sum-vs-atom-length",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown field name: '{0}'")]
pub struct ParseFieldError(pub String);

impl FromStr for Field {
    type Err = ParseFieldError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Field::ALL
            .iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| ParseFieldError(s.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two inputs being compared.
///
/// Neither side is treated as ground truth; `A` is the structure derived from
/// the PDB format and `B` the one derived from mmCIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    A,
    B,
}

impl Representation {
    pub fn format(&self) -> RecordFormat {
        match self {
            Representation::A => RecordFormat::Pdb,
            Representation::B => RecordFormat::MmCif,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::A => write!(f, "representation A ({})", self.format()),
            Representation::B => write!(f, "representation B ({})", self.format()),
        }
    }
}

/// A value observed (or required) by a rule, kept typed for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Techniques(BTreeSet<ExperimentalTechnique>),
    Absent,
    Present,
    AtLeast(i64),
    AtMost(i64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Date(d) => write!(f, "{}", d),
            Value::Techniques(set) => {
                let names: Vec<_> = set.iter().map(|t| t.name()).collect();
                write!(f, "[{}]", names.join(", "))
            }
            Value::Absent => f.write_str("<absent>"),
            Value::Present => f.write_str("<present>"),
            Value::AtLeast(n) => write!(f, "≥{}", n),
            Value::AtMost(n) => write!(f, "≤{}", n),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<BTreeSet<ExperimentalTechnique>> for Value {
    fn from(value: BTreeSet<ExperimentalTechnique>) -> Self {
        Value::Techniques(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Absent, Into::into)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Discrepancy {
    /// The two representations disagree on the value of the field.
    Differs { a: Value, b: Value },
    /// One representation violates a constraint that holds on its own.
    Violates {
        representation: Representation,
        actual: Value,
        expected: Value,
    },
}

/// The first rule that failed for an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub field: Field,
    pub chain_id: Option<String>,
    pub discrepancy: Discrepancy,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed for '{}'", self.field)?;
        if let Some(chain_id) = &self.chain_id {
            write!(f, " (chain {})", chain_id)?;
        }
        match &self.discrepancy {
            Discrepancy::Differs { a, b } => write!(
                f,
                ": {} = {}, {} = {}",
                Representation::A,
                a,
                Representation::B,
                b
            ),
            Discrepancy::Violates {
                representation,
                actual,
                expected,
            } => write!(
                f,
                ": {} has {}, expected {}",
                representation, actual, expected
            ),
        }
    }
}

/// A mismatch suppressed by an entry in the exception table.
#[derive(Debug, Clone, PartialEq)]
pub struct WaivedMismatch {
    pub mismatch: Mismatch,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOutcome {
    Pass,
    Fail(Mismatch),
}

impl ComparisonOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, ComparisonOutcome::Pass)
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            ComparisonOutcome::Pass => None,
            ComparisonOutcome::Fail(m) => Some(m),
        }
    }
}

impl From<Result<(), Mismatch>> for ComparisonOutcome {
    fn from(result: Result<(), Mismatch>) -> Self {
        match result {
            Ok(()) => ComparisonOutcome::Pass,
            Err(m) => ComparisonOutcome::Fail(m),
        }
    }
}

/// The result of comparing one entry (or one chain pair).
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub outcome: ComparisonOutcome,
    pub waived: Vec<WaivedMismatch>,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        self.outcome.is_pass()
    }
}
