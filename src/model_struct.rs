use crate::config::ModelConfig;
use crate::error::{Result, TbError};
use crate::hopping::HoppingTable;
use crate::lattice::LatticeVector;
use crate::sparse::HoppingMatrix;
use crate::Model;
use ndarray::*;
use num_complex::Complex64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Model {
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }
    #[inline(always)]
    pub fn occ(&self) -> Option<usize> {
        self.occ
    }
    /// Fractional orbital positions, one row per orbital.
    #[inline(always)]
    pub fn pos(&self) -> &Array2<f64> {
        &self.pos
    }
    /// Lattice vectors as columns.
    #[inline(always)]
    pub fn uc(&self) -> Option<&Array2<f64>> {
        self.uc.as_ref()
    }
    /// The reduced hopping table.
    #[inline(always)]
    pub fn hoppings(&self) -> &HoppingTable {
        &self.hoppings
    }
    /// Cartesian orbital positions, `uc · pos`, when the unit cell is known.
    pub fn cartesian_pos(&self) -> Option<Array2<f64>> {
        self.uc.as_ref().map(|uc| self.pos.dot(&uc.t()))
    }
}

/// Flat record used to (de)serialize a [`Model`].
///
/// Loading goes through [`Model::new`] with `contains_cc = false`, so the
/// stored table is re-validated and re-folded like any derived model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    pub size: usize,
    pub occ: Option<usize>,
    pub pos: Array2<f64>,
    pub uc: Option<Array2<f64>>,
    pub hoppings: Vec<HoppingData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoppingData {
    pub g: LatticeVector,
    /// `(row, col, value)` of every non-zero entry.
    pub entries: Vec<(usize, usize, Complex64)>,
}

impl From<&Model> for ModelData {
    fn from(model: &Model) -> Self {
        ModelData {
            size: model.size,
            occ: model.occ,
            pos: model.pos.clone(),
            uc: model.uc.clone(),
            hoppings: model
                .hoppings
                .iter()
                .map(|(g, hop)| HoppingData {
                    g: *g,
                    entries: hop.iter_nonzero().collect(),
                })
                .collect(),
        }
    }
}

impl TryFrom<ModelData> for Model {
    type Error = TbError;
    fn try_from(data: ModelData) -> Result<Model> {
        let shape = (data.size, data.size);
        let mut table = HoppingTable::new(data.size);
        for HoppingData { g, entries } in data.hoppings {
            let h_mat = HoppingMatrix::from_triplets(shape, entries)?;
            table.accumulate_matrix(g, &h_mat)?;
        }
        Model::new(table, ModelConfig::derived(data.size, data.occ, data.pos, data.uc))
    }
}

impl Serialize for Model {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ModelData::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Model, D::Error> {
        let data = ModelData::deserialize(deserializer)?;
        Model::try_from(data).map_err(serde::de::Error::custom)
    }
}
