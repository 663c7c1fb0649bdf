//! Equipment monitoring entries.
//!
//! Metric values are kept exactly as typed into the form (numeric-as-string);
//! they are only interpreted when rendered for display.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{require_iso_date, Record, RecordId};

/// Message shown next to the date input when it is left empty.
pub const DATE_REQUIRED_MESSAGE: &str = "Күні міндетті";

/// Number of machines in the fleet.
pub const EQUIPMENT_COUNT: usize = 10;

/// One machine that can be selected in the monitoring form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equipment {
    pub code: String,
    pub name: String,
}

/// The fixed equipment list: `EQ-1001` ... `EQ-10010`.
pub fn equipment_list() -> Vec<Equipment> {
    (1..=EQUIPMENT_COUNT)
        .map(|i| Equipment {
            code: format!("EQ-100{}", i),
            name: format!("Жабдық {}", i),
        })
        .collect()
}

/// Measured fields of a monitoring entry, in form/column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricField {
    Asic,
    Fan,
    LoadCore,
    LoadMem,
    LoadDisk,
    PowerNow,
    EnergyDay,
    Hashrate,
    Efficiency,
    Uptime,
    ErrHw,
    ActivePct,
}

impl MetricField {
    pub const ALL: [MetricField; 12] = [
        MetricField::Asic,
        MetricField::Fan,
        MetricField::LoadCore,
        MetricField::LoadMem,
        MetricField::LoadDisk,
        MetricField::PowerNow,
        MetricField::EnergyDay,
        MetricField::Hashrate,
        MetricField::Efficiency,
        MetricField::Uptime,
        MetricField::ErrHw,
        MetricField::ActivePct,
    ];

    /// Wire name of the field.
    pub fn key(&self) -> &'static str {
        match self {
            MetricField::Asic => "asic",
            MetricField::Fan => "fan",
            MetricField::LoadCore => "loadCore",
            MetricField::LoadMem => "loadMem",
            MetricField::LoadDisk => "loadDisk",
            MetricField::PowerNow => "powerNow",
            MetricField::EnergyDay => "energyDay",
            MetricField::Hashrate => "hashrate",
            MetricField::Efficiency => "efficiency",
            MetricField::Uptime => "uptime",
            MetricField::ErrHw => "errHw",
            MetricField::ActivePct => "activePct",
        }
    }

    /// Input placeholder, also used as the column header.
    pub fn label(&self) -> &'static str {
        match self {
            MetricField::Asic => "ASIC(°C)",
            MetricField::Fan => "Вентилятор(%)",
            MetricField::LoadCore => "Ядро(%)",
            MetricField::LoadMem => "Жад(%)",
            MetricField::LoadDisk => "Диск(%)",
            MetricField::PowerNow => "Энергия(Вт)",
            MetricField::EnergyDay => "Энергия(кВт·сағ)",
            MetricField::Hashrate => "Hashrate(TH/s)",
            MetricField::Efficiency => "Эффективтік(TH/kWh)",
            MetricField::Uptime => "Uptime(сағ)",
            MetricField::ErrHw => "HW қате",
            MetricField::ActivePct => "Белсенді(%)",
        }
    }

    pub fn from_key(key: &str) -> Option<MetricField> {
        MetricField::ALL.iter().copied().find(|f| f.key() == key)
    }
}

/// One equipment measurement for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringEntry {
    #[serde(default)]
    pub id: RecordId,
    /// Equipment code, e.g. `EQ-1001`.
    pub eq: String,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub asic: String,
    #[serde(default)]
    pub fan: String,
    #[serde(default)]
    pub load_core: String,
    #[serde(default)]
    pub load_mem: String,
    #[serde(default)]
    pub load_disk: String,
    #[serde(default)]
    pub power_now: String,
    #[serde(default)]
    pub energy_day: String,
    #[serde(default)]
    pub hashrate: String,
    #[serde(default)]
    pub efficiency: String,
    #[serde(default)]
    pub uptime: String,
    #[serde(default)]
    pub err_hw: String,
    #[serde(default)]
    pub active_pct: String,
}

impl MonitoringEntry {
    /// Empty entry for `eq` with no date and no metrics.
    pub fn blank(eq: &str) -> Self {
        Self {
            eq: eq.to_string(),
            ..Self::default()
        }
    }

    pub fn metric(&self, field: MetricField) -> &str {
        match field {
            MetricField::Asic => &self.asic,
            MetricField::Fan => &self.fan,
            MetricField::LoadCore => &self.load_core,
            MetricField::LoadMem => &self.load_mem,
            MetricField::LoadDisk => &self.load_disk,
            MetricField::PowerNow => &self.power_now,
            MetricField::EnergyDay => &self.energy_day,
            MetricField::Hashrate => &self.hashrate,
            MetricField::Efficiency => &self.efficiency,
            MetricField::Uptime => &self.uptime,
            MetricField::ErrHw => &self.err_hw,
            MetricField::ActivePct => &self.active_pct,
        }
    }

    pub fn metric_mut(&mut self, field: MetricField) -> &mut String {
        match field {
            MetricField::Asic => &mut self.asic,
            MetricField::Fan => &mut self.fan,
            MetricField::LoadCore => &mut self.load_core,
            MetricField::LoadMem => &mut self.load_mem,
            MetricField::LoadDisk => &mut self.load_disk,
            MetricField::PowerNow => &mut self.power_now,
            MetricField::EnergyDay => &mut self.energy_day,
            MetricField::Hashrate => &mut self.hashrate,
            MetricField::Efficiency => &mut self.efficiency,
            MetricField::Uptime => &mut self.uptime,
            MetricField::ErrHw => &mut self.err_hw,
            MetricField::ActivePct => &mut self.active_pct,
        }
    }

    /// Look up a field by its wire name (`eq`, `date` or a metric key).
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "eq" => Some(self.eq.as_str()),
            "date" => Some(self.date.as_str()),
            _ => MetricField::from_key(name).map(|f| self.metric(f)),
        }
    }

    /// Mutable access by wire name. `id` is not settable through here.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "eq" => Some(&mut self.eq),
            "date" => Some(&mut self.date),
            _ => MetricField::from_key(name).map(move |f| self.metric_mut(f)),
        }
    }
}

impl Record for MonitoringEntry {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn timestamp(&self) -> &str {
        &self.date
    }

    fn category(&self) -> &str {
        &self.eq
    }

    fn validate(&self) -> Result<()> {
        require_iso_date("date", &self.date, DATE_REQUIRED_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;

    #[test]
    fn test_equipment_list() {
        let list = equipment_list();
        assert_eq!(list.len(), 10);
        assert_eq!(list[0].code, "EQ-1001");
        assert_eq!(list[0].name, "Жабдық 1");
        assert_eq!(list[9].code, "EQ-10010");
    }

    #[test]
    fn test_camel_case_wire_names() {
        let mut entry = MonitoringEntry::blank("EQ-1002");
        entry.date = "2024-03-01".to_string();
        entry.power_now = "3250".to_string();
        entry.active_pct = "98".to_string();

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["powerNow"], "3250");
        assert_eq!(value["activePct"], "98");
        assert_eq!(value["eq"], "EQ-1002");
    }

    #[test]
    fn test_field_lookup_by_name() {
        let mut entry = MonitoringEntry::blank("EQ-1003");
        *entry.field_mut("hashrate").unwrap() = "110.5".to_string();
        assert_eq!(entry.field("hashrate"), Some("110.5"));
        assert_eq!(entry.field("eq"), Some("EQ-1003"));
        assert_eq!(entry.field("id"), None);
        assert_eq!(entry.field("bogus"), None);
    }

    #[test]
    fn test_metric_keys_round_trip() {
        for field in MetricField::ALL {
            assert_eq!(MetricField::from_key(field.key()), Some(field));
        }
    }

    #[test]
    fn test_date_required() {
        let entry = MonitoringEntry::blank("EQ-1001");
        assert_eq!(
            entry.validate(),
            Err(LogError::validation("date", DATE_REQUIRED_MESSAGE))
        );
    }
}
