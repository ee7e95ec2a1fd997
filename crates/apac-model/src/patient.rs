//! Raw patient rows as delivered by the CSV collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical column names of the patient extract.
pub mod keys {
    pub const NAME: &str = "Nome";
    pub const MOTHER: &str = "Mae";
    pub const BIRTH_DATE: &str = "Data_Nascimento";
    pub const CONSULTATION_DATE: &str = "Data_Horario";
    pub const RACE: &str = "Raca_Cor";
    pub const SEX: &str = "Sexo";
    pub const PHYSICIAN: &str = "Nome_Medico_Solicitante";
    pub const FACILITY: &str = "Nome_Unidade_Solicitante";
    pub const STREET: &str = "Rua";
    pub const STREET_NUMBER: &str = "Nro";
    pub const POSTAL_CODE: &str = "CEP";
    pub const NEIGHBORHOOD: &str = "Bairro";
    pub const PHONE_AREA_CODE: &str = "DDD";
    pub const PHONE: &str = "Contato 1";
    pub const EMAIL: &str = "Email";
    pub const CPF: &str = "CPF";
    pub const CNS: &str = "Cartão SUS";
    pub const CID: &str = "CID";
}

/// One patient row keyed by canonical column name.
///
/// Absent keys read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRow {
    values: BTreeMap<String, String>,
}

impl PatientRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PatientRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
