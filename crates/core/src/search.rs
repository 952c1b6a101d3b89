//! Linear search over inspection records.

use crate::inspection::{InspectionRecord, InspectionStatus};

/// Filter for the inspection list. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectionFilter {
    /// Case-insensitive substring of project name, address or responsible party.
    pub query: Option<String>,
    pub status: Option<InspectionStatus>,
}

impl InspectionFilter {
    pub fn matches(&self, record: &InspectionRecord) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let needle = query.to_lowercase();
                [&record.project_name, &record.address, &record.responsible]
                    .into_iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }

    /// Keep the matching records, preserving their order.
    pub fn apply(&self, records: Vec<InspectionRecord>) -> Vec<InspectionRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}
