use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::clifford::Clifford;
use crate::pauli::Pauli;
use crate::pauli_table::PauliTable;
use crate::sparse_pauli_op::SparsePauliOp;
use crate::stabilizer_table::StabilizerTable;
use num_complex::Complex64;

impl Serialize for Pauli {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{self:#}"))
    }
}

impl<'de> Deserialize<'de> for Pauli {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        string.parse().map_err(de::Error::custom)
    }
}

impl Serialize for Clifford {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Clifford {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        string.parse().map_err(de::Error::custom)
    }
}

impl Serialize for PauliTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.label_iter())
    }
}

impl<'de> Deserialize<'de> for PauliTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let labels = Vec::<String>::deserialize(deserializer)?;
        PauliTable::from_labels(&labels).map_err(de::Error::custom)
    }
}

impl Serialize for StabilizerTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.label_iter())
    }
}

impl<'de> Deserialize<'de> for StabilizerTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let labels = Vec::<String>::deserialize(deserializer)?;
        StabilizerTable::from_labels(&labels).map_err(de::Error::custom)
    }
}

impl Serialize for SparsePauliOp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.label_iter().map(|(label, coeff)| (label, [coeff.re, coeff.im])))
    }
}

impl<'de> Deserialize<'de> for SparsePauliOp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let terms = Vec::<(String, [f64; 2])>::deserialize(deserializer)?;
        SparsePauliOp::from_list(
            terms
                .into_iter()
                .map(|(label, [re, im])| (label, Complex64::new(re, im))),
        )
        .map_err(de::Error::custom)
    }
}
