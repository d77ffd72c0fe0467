use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Flat string-keyed map as received from the engine for one output unit.
///
/// Keys are case sensitive. Array values arrive positionally encoded
/// (`Files0`, `Files1`, ...) and sparse 2-D values comma-indexed
/// (`how0,0`); [`DecodedRecord::decode`] folds both back into structure.
pub type WireRecord = HashMap<String, String>;

/// Structured view of one tagged record, with disjoint scalar and array
/// field namespaces.
///
/// A field name lives in exactly one of the three maps: a name is either a
/// scalar, an array family, or (rarely, `filelog -i` output) a 2-D matrix
/// family, never more than one. Built once from a [`WireRecord`]; scalar
/// fields may be overwritten and whole array fields replaced afterwards,
/// which is how form fields are cleared or rewritten before resubmission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedRecord {
    pub(crate) fields: BTreeMap<String, String>,
    pub(crate) array_fields: BTreeMap<String, Vec<String>>,
    pub(crate) matrix_fields: BTreeMap<String, Vec<Vec<String>>>,
}

impl DecodedRecord {
    /// Decode a wire record into structured fields.
    ///
    /// Deterministic and total: malformed suffix encodings degrade to
    /// scalar fields rather than failing. See the decode module for the
    /// classification rules.
    pub fn decode(wire: &WireRecord) -> DecodedRecord {
        crate::decode::decode(wire)
    }

    /// Value of a scalar field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Elements of an array field, in positional order.
    pub fn array_field(&self, name: &str) -> Option<&[String]> {
        self.array_fields.get(name).map(Vec::as_slice)
    }

    /// Rows of a matrix field.
    pub fn matrix_field(&self, name: &str) -> Option<&[Vec<String>]> {
        self.matrix_fields.get(name).map(Vec::as_slice)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn array_fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.array_fields
    }

    pub fn matrix_fields(&self) -> &BTreeMap<String, Vec<Vec<String>>> {
        &self.matrix_fields
    }

    /// Overwrite (or add) a scalar field.
    ///
    /// Used to rewrite form fields before resubmission. Does not touch the
    /// array namespace; a name that decoded as an array stays an array.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Replace (or add) a whole array field.
    pub fn set_array_field(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.array_fields.insert(name.into(), values);
    }

    /// Re-emit the record in wire form, positional suffixes restored.
    ///
    /// This is the shape form-submission commands expect back after fields
    /// have been rewritten.
    pub fn flatten(&self) -> WireRecord {
        let mut wire = WireRecord::new();
        for (name, value) in &self.fields {
            wire.insert(name.clone(), value.clone());
        }
        for (name, values) in &self.array_fields {
            for (i, value) in values.iter().enumerate() {
                wire.insert(format!("{}{}", name, i), value.clone());
            }
        }
        for (name, rows) in &self.matrix_fields {
            for (i, row) in rows.iter().enumerate() {
                for (j, value) in row.iter().enumerate() {
                    wire.insert(format!("{}{},{}", name, i, j), value.clone());
                }
            }
        }
        wire
    }
}
